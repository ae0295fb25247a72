//! Hardware state the ROM flash routines clobber
//!
//! `connect_internal_flash` and `flash_exit_xip` reset the QSPI pads and, on
//! RP2350, rewrite QMI window 1. Pad tuning done by boot2 or the application
//! and the setup of a PSRAM on chip select 1 have to survive, so they are
//! captured before the XIP exit and put back after re-entry.

use xipflash_hal::pads::QSPI_PAD_COUNT;
use xipflash_hal::{Cs1ReadState, Cs1Window, QspiPad, QspiPads};

/// Saved pad and window-1 configuration for one flash operation
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareSnapshot {
    qspi_pads: [u32; QSPI_PAD_COUNT],
    cs1: Option<Cs1ReadState>,
}

impl HardwareSnapshot {
    /// Capture the current configuration
    ///
    /// Cleans the XIP cache first so pending writes to a CS1 device reach
    /// it before the ROM flushes the cache.
    #[inline(always)]
    pub fn save<H: QspiPads + Cs1Window>(hw: &mut H) -> Self {
        hw.clean_pending_writes();

        let mut qspi_pads = [0; QSPI_PAD_COUNT];
        for pad in QspiPad::ALL {
            qspi_pads[pad.index()] = hw.read_pad(pad);
        }

        Self {
            qspi_pads,
            cs1: hw.read_state(),
        }
    }

    /// Put the captured configuration back
    ///
    /// Window 1 is only restored verbatim when no CS1 device is configured.
    /// With a device present the ROM has already sent it a real XIP exit,
    /// so the saved read setup is stale; instead the write format/command
    /// go back to their serial defaults.
    #[inline(always)]
    pub fn restore<H: QspiPads + Cs1Window>(self, hw: &mut H) {
        for pad in QspiPad::ALL {
            hw.write_pad(pad, self.qspi_pads[pad.index()]);
        }

        if let Some(cs1) = self.cs1 {
            if hw.cs1_device_configured() {
                hw.reset_write_config();
            } else {
                hw.write_read_state(&cs1);
            }
        }
    }

    /// Saved pad control words, in [`QspiPad::ALL`] order
    pub fn qspi_pads(&self) -> &[u32; QSPI_PAD_COUNT] {
        &self.qspi_pads
    }

    /// Saved window-1 read configuration (RP2350 only)
    pub fn cs1(&self) -> Option<&Cs1ReadState> {
        self.cs1.as_ref()
    }
}
