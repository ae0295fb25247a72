//! Build-time configuration
//!
//! Generated by build.rs from flash.toml; edit flash.toml and rebuild to
//! change any of these.

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Image written to flash, copied from the path set in flash.toml
///
/// Placed in `.data` so the runtime copies it to RAM at startup. The ROM
/// program routine reads it with XIP switched off.
#[link_section = ".data.payload"]
pub static PAYLOAD: [u8; PAYLOAD_LEN] = *include_bytes!(concat!(env!("OUT_DIR"), "/payload.bin"));
