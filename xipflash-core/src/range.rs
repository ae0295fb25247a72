//! Flash address ranges and their validation
//!
//! The ROM routines do not check their arguments; a misaligned or
//! out-of-range request turns into whatever the flash chip does with it.
//! Requests are therefore checked here, before any hardware is touched.

use xipflash_hal::flash::{PAGE_SIZE, SECTOR_SIZE};
use xipflash_hal::FlashError;

/// A byte range in the flash device's address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashRange {
    /// Offset from the start of flash (not an XIP address)
    pub offset: u32,
    /// Length in bytes
    pub length: usize,
}

impl FlashRange {
    /// Create a range of `length` bytes starting at `offset`
    pub const fn new(offset: u32, length: usize) -> Self {
        Self { offset, length }
    }

    /// Whether the range covers no bytes
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last byte, or `None` if that is not representable
    pub fn end(&self) -> Option<u64> {
        (self.offset as u64).checked_add(self.length as u64)
    }
}

/// Size of the attached flash device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashGeometry {
    size: u32,
}

impl FlashGeometry {
    /// Geometry of a device of `size` bytes
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Device size in bytes
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of erase sectors on the device
    pub const fn sector_count(&self) -> u32 {
        self.size / SECTOR_SIZE
    }

    /// Check an erase request and widen it to whole sectors
    ///
    /// The offset must be sector aligned. The length is rounded up, since
    /// the device cannot erase less than a sector anyway.
    pub fn erase_extent(&self, range: FlashRange) -> Result<FlashRange, FlashError> {
        if range.offset % SECTOR_SIZE != 0 {
            return Err(FlashError::Unaligned);
        }
        let sector = SECTOR_SIZE as u64;
        let rounded = (range.length as u64)
            .div_ceil(sector)
            .checked_mul(sector)
            .ok_or(FlashError::OutOfBounds)?;
        let end = (range.offset as u64)
            .checked_add(rounded)
            .ok_or(FlashError::OutOfBounds)?;
        if end > self.size as u64 {
            return Err(FlashError::OutOfBounds);
        }
        Ok(FlashRange::new(range.offset, rounded as usize))
    }

    /// Check a program request
    ///
    /// The offset must be page aligned; a trailing partial page is allowed.
    pub fn check_program(&self, range: FlashRange) -> Result<(), FlashError> {
        if range.offset % PAGE_SIZE != 0 {
            return Err(FlashError::Unaligned);
        }
        self.check_bounds(range)
    }

    /// Check that `range` lies inside the device
    pub fn check_bounds(&self, range: FlashRange) -> Result<(), FlashError> {
        match range.end() {
            Some(end) if end <= self.size as u64 => Ok(()),
            _ => Err(FlashError::OutOfBounds),
        }
    }
}
