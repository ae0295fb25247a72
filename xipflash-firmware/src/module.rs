//! The payload flasher, as a loadable module
//!
//! `module_init` is the entry the host hands control to. It exports:
//!
//! - `init`: write the payload, optionally verify it, optionally reboot
//! - `verify`: compare flash against the payload
//! - `reboot`: reset through the watchdog

use defmt::*;
use xipflash_core::{dprintln, Namespace, NamespaceError, Payload};
use xipflash_hal::SystemReset;
use xipflash_hal_rp::{ram, RpXipFlash, WatchdogReset};

use crate::config;
use crate::debug::DefmtSink;

/// Room for every export plus a few spare slots
pub const NAMESPACE_CAPACITY: usize = 4;

pub type HostNamespace = Namespace<Host, NAMESPACE_CAPACITY>;

/// State the host shares with module callables
pub struct Host {
    pub flash: &'static mut RpXipFlash,
    pub sink: DefmtSink,
    pub reset: WatchdogReset,
}

pub fn module_init(ns: &mut HostNamespace) -> Result<(), NamespaceError> {
    ns.register("init", init)?;
    ns.register("verify", verify)?;
    ns.register("reboot", reboot)
}

fn payload() -> Payload<'static> {
    Payload::new(&config::PAYLOAD, config::PAYLOAD_OFFSET)
}

fn init(host: &mut Host) {
    let payload = payload();
    info!(
        "Flashing {} byte payload at {=u32:#x}",
        payload.len(),
        payload.offset()
    );

    if let Err(e) = ram::flash_payload(host.flash, &payload) {
        error!("Flash failed: {}", e);
        return;
    }
    dprintln!(
        &mut host.sink,
        "wrote {} bytes at {:#x}",
        payload.len(),
        payload.offset()
    );

    if config::VERIFY {
        verify(host);
    }

    if config::REBOOT_AFTER_FLASH {
        embassy_time::block_for(embassy_time::Duration::from_millis(config::REBOOT_DELAY_MS));
        reboot(host);
    }
}

fn verify(host: &mut Host) {
    let payload = payload();
    match host.flash.verify_payload(&payload) {
        Ok(()) => dprintln!(&mut host.sink, "verify ok"),
        Err(e) => {
            dprintln!(&mut host.sink, "verify failed: {}", e);
            warn!("Verify failed: {}", e);
        }
    }
}

fn reboot(host: &mut Host) {
    info!("Rebooting");
    host.reset.reboot()
}
