//! Second chip-select memory window
//!
//! RP2350 exposes a second QMI window (M1) that can map a PSRAM or a second
//! flash on chip select 1. The ROM's XIP-exit routine rewrites this window,
//! so the engine has to put it back afterwards. RP2040 has no such window and
//! its backend reports none.

/// Documented reset value of `QMI_M1_WFMT`
pub const QMI_M1_WFMT_RESET: u32 = 0x0000_1000;

/// Documented reset value of `QMI_M1_WCMD` (02h serial page program)
pub const QMI_M1_WCMD_RESET: u32 = 0x0000_a002;

/// Read-side configuration of window 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cs1ReadState {
    /// `M1_TIMING`
    pub timing: u32,
    /// `M1_RCMD`
    pub rcmd: u32,
    /// `M1_RFMT`
    pub rfmt: u32,
}

/// Access to the window-1 interface registers
pub trait Cs1Window {
    /// Write back any dirty XIP cache lines belonging to the CS1 device
    ///
    /// Must run before the ROM flushes the cache, otherwise pending writes
    /// to an attached PSRAM are lost.
    fn clean_pending_writes(&mut self);

    /// Current read configuration, or `None` if the chip has no window 1
    fn read_state(&self) -> Option<Cs1ReadState>;

    /// Overwrite the read configuration
    fn write_read_state(&mut self, state: &Cs1ReadState);

    /// Put `M1_WFMT`/`M1_WCMD` back to their reset values
    fn reset_write_config(&mut self);

    /// Whether the device descriptor reports a device on chip select 1
    fn cs1_device_configured(&self) -> bool;
}
