//! Build script for xipflash-firmware
//!
//! - Sets up linker search paths and scripts for the selected chip
//! - Validates flash.toml at compile time
//! - Copies the payload into OUT_DIR and generates `config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const SECTOR_SIZE: i64 = 4096;

/// Values taken from flash.toml
struct FlashConfig {
    flash_size: i64,
    payload_path: PathBuf,
    payload_offset: i64,
    verify: bool,
    reboot_after_flash: bool,
    reboot_delay_ms: i64,
}

fn main() {
    setup_linker();
    let config = validate_config();
    let payload_len = copy_payload(&config);
    check_payload_fits(&config, payload_len);
    generate_config(&config, payload_len);
}

/// Copy the chip's memory layout to OUT_DIR and add the linker scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let rp2040 = env::var_os("CARGO_FEATURE_RP2040").is_some();

    let memory_x: &[u8] = if rp2040 {
        include_bytes!("memory-rp2040.x")
    } else {
        include_bytes!("memory-rp235x.x")
    };
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if rp2040 {
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    }
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory-rp2040.x");
    println!("cargo:rerun-if-changed=memory-rp235x.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate flash.toml and extract its values
fn validate_config() -> FlashConfig {
    println!("cargo:rerun-if-changed=flash.toml");

    let config_path = Path::new("flash.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: flash.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a flash.toml configuration file.          ║\n\
            ║  Please create one in the xipflash-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read flash.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in flash.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let flash_size = require_integer(&config, "flash", "size", &mut errors);
    let payload_path = require_string(&config, "payload", "path", &mut errors);
    let payload_offset = require_integer(&config, "payload", "offset", &mut errors);
    let verify = optional_bool(&config, "payload", "verify", true, &mut errors);
    let reboot_after_flash = optional_bool(&config, "reboot", "after_flash", true, &mut errors);
    let reboot_delay_ms = optional_integer(&config, "reboot", "delay_ms", 100, &mut errors);

    if let Some(size) = flash_size {
        if size <= 0 || size % SECTOR_SIZE != 0 {
            errors.push(format!("[flash] size must be a positive multiple of {}", SECTOR_SIZE));
        }
        if size > u32::MAX as i64 {
            errors.push("[flash] size does not fit in 32 bits".to_string());
        }
    }
    if let Some(offset) = payload_offset {
        if offset < 0 || offset % SECTOR_SIZE != 0 {
            errors.push(format!(
                "[payload] offset must be a non-negative multiple of {}",
                SECTOR_SIZE
            ));
        }
    }
    if !(0..=10_000).contains(&reboot_delay_ms) {
        errors.push("[reboot] delay_ms must be 0-10000".to_string());
    }

    report_errors(&errors);

    println!("cargo:warning=flash.toml validated successfully");

    // Only reached with no errors, so every required key is present
    FlashConfig {
        flash_size: flash_size.unwrap(),
        payload_path: PathBuf::from(payload_path.unwrap()),
        payload_offset: payload_offset.unwrap(),
        verify,
        reboot_after_flash,
        reboot_delay_ms,
    }
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn require_integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match lookup(config, section, key) {
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn require_string(
    config: &toml::Value,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match lookup(config, section, key) {
        Some(toml::Value::String(v)) => Some(v.clone()),
        Some(_) => {
            errors.push(format!("[{}] {} must be a string", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

fn optional_integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match lookup(config, section, key) {
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
        None => default,
    }
}

fn optional_bool(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: bool,
    errors: &mut Vec<String>,
) -> bool {
    match lookup(config, section, key) {
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            default
        }
        None => default,
    }
}

fn report_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid flash.toml                                       ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copy the payload next to the generated config, returning its length
fn copy_payload(config: &FlashConfig) -> i64 {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    println!("cargo:rerun-if-changed={}", config.payload_path.display());

    let bytes = match fs::read(&config.payload_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read payload                                   ║\n\
                ║                                                                  ║\n\
                ║  Path:  {:<56} ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                config.payload_path.display(),
                e
            );
        }
    };

    fs::write(out_dir.join("payload.bin"), &bytes).unwrap();
    bytes.len() as i64
}

fn check_payload_fits(config: &FlashConfig, payload_len: i64) {
    if config.payload_offset + payload_len > config.flash_size {
        report_errors(&[format!(
            "payload ({} bytes at {:#x}) runs past the end of flash",
            payload_len, config.payload_offset
        )]);
    }
    if payload_len == 0 {
        println!("cargo:warning=payload is empty, nothing will be written");
    }
}

/// Emit the constants the firmware includes from `config.rs`
fn generate_config(config: &FlashConfig, payload_len: i64) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("config.rs")).unwrap();

    writeln!(f, "// Generated by build.rs from flash.toml").unwrap();
    writeln!(f, "pub const FLASH_SIZE: u32 = {:#x};", config.flash_size).unwrap();
    writeln!(f, "pub const PAYLOAD_OFFSET: u32 = {:#x};", config.payload_offset).unwrap();
    writeln!(f, "pub const PAYLOAD_LEN: usize = {};", payload_len).unwrap();
    writeln!(f, "pub const VERIFY: bool = {};", config.verify).unwrap();
    writeln!(f, "pub const REBOOT_AFTER_FLASH: bool = {};", config.reboot_after_flash).unwrap();
    writeln!(f, "pub const REBOOT_DELAY_MS: u64 = {};", config.reboot_delay_ms).unwrap();
}
