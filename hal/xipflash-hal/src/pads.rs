//! QSPI pad configuration
//!
//! The boot ROM flash routines reprogram the QSPI pads (drive strength,
//! slew, pulls) while they run. The engine saves and restores them so a
//! tuned configuration survives a flash operation.

/// Number of QSPI IO pads
pub const QSPI_PAD_COUNT: usize = 6;

/// QSPI IO pads, in register order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QspiPad {
    /// Serial clock
    Sclk = 0,
    /// Data line 0
    Sd0 = 1,
    /// Data line 1
    Sd1 = 2,
    /// Data line 2
    Sd2 = 3,
    /// Data line 3
    Sd3 = 4,
    /// Chip select
    Ss = 5,
}

impl QspiPad {
    /// All pads, in register order
    pub const ALL: [QspiPad; QSPI_PAD_COUNT] = [
        QspiPad::Sclk,
        QspiPad::Sd0,
        QspiPad::Sd1,
        QspiPad::Sd2,
        QspiPad::Sd3,
        QspiPad::Ss,
    ];

    /// Index of the pad within the pad register array
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// QSPI pad control registers
pub trait QspiPads {
    /// Read the raw control word for `pad`
    fn read_pad(&self, pad: QspiPad) -> u32;

    /// Write the raw control word for `pad`
    fn write_pad(&mut self, pad: QspiPad, value: u32);
}
