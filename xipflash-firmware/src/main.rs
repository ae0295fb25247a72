//! xipflash - Payload Flasher Firmware
//!
//! Plays the host for the payload flasher module: brings the chip up,
//! creates the flash engine, loads the module into a namespace and calls
//! its `init` export, which rewrites flash from under the running program
//! and resets into the result.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use xipflash_core::FlashGeometry;
use xipflash_hal_rp::{ram, RpXipFlash, WatchdogReset};
use {defmt_rtt as _, panic_probe as _};

use crate::debug::DefmtSink;
use crate::module::{module_init, Host, HostNamespace};

mod config;
mod debug;
mod module;

/// Boot ROM image definition (RP2350 will not boot without one)
#[cfg(feature = "rp235xa")]
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

// The engine keeps the boot2 copy and the resolved ROM table, so it lives
// for the whole program at a fixed address
static XIP_FLASH: StaticCell<RpXipFlash> = StaticCell::new();
static NAMESPACE: StaticCell<HostNamespace> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("xipflash firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let geometry = FlashGeometry::new(config::FLASH_SIZE);
    // SAFETY: the only engine, created once on core 0 with core 1 parked
    let flash = XIP_FLASH.init(unsafe { ram::xip_flash(geometry) });
    // Take the boot2 copy now, while nothing else is touching flash
    flash.ensure_boot2_copied();
    info!(
        "Flash engine ready: {} KiB, {} sectors",
        geometry.size() / 1024,
        geometry.sector_count()
    );

    let namespace = NAMESPACE.init(HostNamespace::new());
    if let Err(e) = xipflash_core::module::load(namespace, module_init) {
        error!("Module init failed: {}", e);
        return;
    }
    for name in namespace.names() {
        debug!("Module export: {=str}", name);
    }

    let mut host = Host {
        flash,
        sink: DefmtSink,
        reset: WatchdogReset::new(p.WATCHDOG),
    };

    if let Err(e) = namespace.call("init", &mut host) {
        error!("Calling init failed: {}", e);
    }

    // Only reached with reboot disabled in flash.toml
    info!("Done, idling");
    loop {
        cortex_m::asm::wfi();
    }
}
