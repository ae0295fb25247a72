//! Watchdog-triggered reboot

use embassy_rp::pac;
use embassy_rp::peripherals::WATCHDOG;
use embassy_rp::watchdog::Watchdog;
use embassy_rp::Peri;
use xipflash_hal::SystemReset;

use crate::chip::psm_wdsel;

/// Scratch register the boot ROM checks for a watchdog boot vector
const BOOT_VECTOR_SCRATCH: usize = 4;

/// Full system reset through the watchdog
pub struct WatchdogReset {
    watchdog: Watchdog,
}

impl WatchdogReset {
    pub fn new(watchdog: Peri<'static, WATCHDOG>) -> Self {
        Self {
            watchdog: Watchdog::new(watchdog),
        }
    }
}

impl SystemReset for WatchdogReset {
    fn reboot(&mut self) -> ! {
        // Boot normally rather than into a stale watchdog vector
        self.watchdog.set_scratch(BOOT_VECTOR_SCRATCH, 0);
        self.watchdog.stop();

        // Reset everything apart from the oscillators
        pac::PSM
            .wdsel()
            .write(|w| w.0 = psm_wdsel::ALL & !(psm_wdsel::ROSC | psm_wdsel::XOSC));

        // Fire even with a debugger attached
        self.watchdog.pause_on_debug(false);
        self.watchdog.trigger_reset();

        loop {
            cortex_m::asm::nop();
        }
    }
}
