//! Boot ROM routines
//!
//! The flash routines live in the boot ROM at addresses that differ between
//! ROM revisions, so they are located at run time through the ROM's own
//! lookup table using two-character codes.

use core::num::NonZeroUsize;

/// Two-character ROM table code, as stored in the ROM
pub type RomFnTableCode = [u8; 2];

/// Boot ROM routines used by the flash engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RomFunction {
    /// Restore the QSPI pads and IO muxing to the internal flash
    ConnectInternalFlash = 0,
    /// Take the flash out of XIP mode and into serial command mode
    FlashExitXip = 1,
    /// Erase a range of flash
    FlashRangeErase = 2,
    /// Program a range of flash
    FlashRangeProgram = 3,
    /// Flush the XIP cache and release the CSn IO force
    FlashFlushCache = 4,
}

impl RomFunction {
    /// Number of routines
    pub const COUNT: usize = 5;

    /// ROM table code for the routine
    pub const fn code(self) -> RomFnTableCode {
        match self {
            RomFunction::ConnectInternalFlash => *b"IF",
            RomFunction::FlashExitXip => *b"EX",
            RomFunction::FlashRangeErase => *b"RE",
            RomFunction::FlashRangeProgram => *b"RP",
            RomFunction::FlashFlushCache => *b"FC",
        }
    }

    /// Slot index in a per-routine table
    #[inline(always)]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Human-readable routine name
    pub const fn name(self) -> &'static str {
        match self {
            RomFunction::ConnectInternalFlash => "connect_internal_flash",
            RomFunction::FlashExitXip => "flash_exit_xip",
            RomFunction::FlashRangeErase => "flash_range_erase",
            RomFunction::FlashRangeProgram => "flash_range_program",
            RomFunction::FlashFlushCache => "flash_flush_cache",
        }
    }
}

/// Entry address of a located ROM routine (never null)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RomEntry(NonZeroUsize);

impl RomEntry {
    /// Wrap a lookup result; a null address means "not found"
    pub fn new(addr: usize) -> Option<Self> {
        NonZeroUsize::new(addr).map(Self)
    }

    /// Raw entry address
    #[inline(always)]
    pub fn addr(self) -> usize {
        self.0.get()
    }
}

/// Arguments of a single ROM routine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomCall<'a> {
    /// `connect_internal_flash()`
    ConnectInternalFlash,
    /// `flash_exit_xip()`
    FlashExitXip,
    /// `flash_range_erase(addr, count, block_size, block_cmd)`
    FlashRangeErase {
        /// Flash offset, sector aligned
        offset: u32,
        /// Byte count, a multiple of the sector size
        count: usize,
        /// Block size for the block erase command
        block_size: u32,
        /// Block erase opcode
        block_cmd: u8,
    },
    /// `flash_range_program(addr, data, count)`
    FlashRangeProgram {
        /// Flash offset, page aligned
        offset: u32,
        /// Bytes to program, a multiple of the page size
        data: &'a [u8],
    },
    /// `flash_flush_cache()`
    FlashFlushCache,
}

impl RomCall<'_> {
    /// The routine this call invokes
    pub fn function(&self) -> RomFunction {
        match self {
            RomCall::ConnectInternalFlash => RomFunction::ConnectInternalFlash,
            RomCall::FlashExitXip => RomFunction::FlashExitXip,
            RomCall::FlashRangeErase { .. } => RomFunction::FlashRangeErase,
            RomCall::FlashRangeProgram { .. } => RomFunction::FlashRangeProgram,
            RomCall::FlashFlushCache => RomFunction::FlashFlushCache,
        }
    }
}

/// Boot ROM access
pub trait Bootrom {
    /// Locate `function` in the ROM table
    ///
    /// Returns `None` if this ROM does not export the routine.
    fn lookup(&self, function: RomFunction) -> Option<RomEntry>;

    /// Call the routine at `entry` with `call`'s arguments
    ///
    /// `entry` must be the result of `lookup(call.function())` on this ROM.
    fn invoke(&mut self, entry: RomEntry, call: RomCall<'_>);
}
