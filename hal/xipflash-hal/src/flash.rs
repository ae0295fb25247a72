//! Flash geometry and errors
//!
//! Sizes and opcodes shared by every backend, plus the error type returned
//! by the engine's argument validation.

/// Smallest erasable unit
pub const SECTOR_SIZE: u32 = 4096;

/// Smallest programmable unit
pub const PAGE_SIZE: u32 = 256;

/// Block size handed to the ROM erase routine.
///
/// The ROM uses the block command for every 64KB-aligned run of at least
/// this size and falls back to 4KB sector erases for the rest.
pub const BLOCK_SIZE: u32 = 1 << 16;

/// 64KB block erase opcode (D8h)
pub const BLOCK_ERASE_CMD: u8 = 0xd8;

/// Value of an erased flash byte
pub const ERASED_BYTE: u8 = 0xff;

/// Errors from flash erase/program requests
///
/// All of these are detected before the engine touches any hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Offset is not a multiple of the operation's granularity
    Unaligned,
    /// Range extends past the end of the flash device
    OutOfBounds,
    /// Data length differs from the range length
    LengthMismatch,
    /// Source data is mapped from the flash being written, so the ROM could
    /// not read it once XIP is down
    SourceInFlash,
    /// Read-back differs from what was written
    VerifyMismatch {
        /// First offset whose content differs
        offset: u32,
    },
}

impl core::fmt::Display for FlashError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlashError::Unaligned => f.write_str("unaligned flash offset"),
            FlashError::OutOfBounds => f.write_str("range exceeds flash size"),
            FlashError::LengthMismatch => f.write_str("data length differs from range length"),
            FlashError::SourceInFlash => f.write_str("source data lives in XIP flash"),
            FlashError::VerifyMismatch { offset } => {
                write!(f, "verify mismatch at offset {:#x}", offset)
            }
        }
    }
}

/// Read access to flash contents
///
/// Backends read through an uncached alias of the XIP window, so the result
/// reflects the device and not a stale cache line. Only valid while XIP mode
/// is active, i.e. outside an erase/program sequence.
pub trait FlashRead {
    /// Copy `buf.len()` bytes starting at flash offset `offset` into `buf`
    fn read(&self, offset: u32, buf: &mut [u8]);

    /// Whether any byte of `data` is fetched through the XIP window
    ///
    /// Such a buffer reads as garbage, or faults, while the flash is out of
    /// XIP mode. An empty slice is never mapped.
    fn is_flash_mapped(&self, data: &[u8]) -> bool;
}
