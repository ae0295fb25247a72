//! ROM routine locator
//!
//! Resolves boot ROM routines on first use and caches the entries for the
//! rest of the program. Higher layers only see typed routine handles, never
//! raw addresses.

use xipflash_hal::flash::{BLOCK_ERASE_CMD, BLOCK_SIZE};
use xipflash_hal::{Bootrom, RomCall, RomEntry, RomFunction};

/// ROM lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RomError {
    /// The ROM does not export this routine
    Missing(RomFunction),
}

impl core::fmt::Display for RomError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RomError::Missing(function) => {
                write!(f, "boot ROM has no {} routine", function.name())
            }
        }
    }
}

/// Lazily resolved table of ROM routine entries
pub struct RomFunctionTable<R> {
    rom: R,
    slots: [Option<RomEntry>; RomFunction::COUNT],
}

impl<R: Bootrom> RomFunctionTable<R> {
    /// Create an empty table over `rom`
    pub fn new(rom: R) -> Self {
        Self {
            rom,
            slots: [None; RomFunction::COUNT],
        }
    }

    /// Entry for `function`, looking it up on first use
    pub fn resolve(&mut self, function: RomFunction) -> Result<RomEntry, RomError> {
        if let Some(entry) = self.slots[function.slot()] {
            return Ok(entry);
        }
        let entry = self
            .rom
            .lookup(function)
            .ok_or(RomError::Missing(function))?;
        self.slots[function.slot()] = Some(entry);
        Ok(entry)
    }

    /// Whether `function` has already been resolved
    pub fn is_resolved(&self, function: RomFunction) -> bool {
        self.slots[function.slot()].is_some()
    }

    /// Resolve `function` or abort
    ///
    /// A missing flash routine means the image is running on a ROM it was
    /// not built for. Nothing has been touched yet, and carrying on would
    /// mean calling through a null pointer with XIP disabled.
    fn require(&mut self, function: RomFunction) -> RomEntry {
        match self.resolve(function) {
            Ok(entry) => entry,
            Err(err) => panic!("{}", err),
        }
    }

    /// Routines shared by every flash operation. Panics if any is missing.
    pub fn xip_routines(&mut self) -> XipRoutines {
        XipRoutines {
            connect_internal_flash: self.require(RomFunction::ConnectInternalFlash),
            flash_exit_xip: self.require(RomFunction::FlashExitXip),
            flash_flush_cache: self.require(RomFunction::FlashFlushCache),
        }
    }

    /// The range erase routine. Panics if missing.
    pub fn erase_routine(&mut self) -> EraseRoutine {
        EraseRoutine(self.require(RomFunction::FlashRangeErase))
    }

    /// The range program routine. Panics if missing.
    pub fn program_routine(&mut self) -> ProgramRoutine {
        ProgramRoutine(self.require(RomFunction::FlashRangeProgram))
    }

    /// The underlying ROM, for invoking resolved routines
    #[inline(always)]
    pub fn bootrom_mut(&mut self) -> &mut R {
        &mut self.rom
    }
}

/// Resolved connect / exit-XIP / flush-cache routines
#[derive(Debug, Clone, Copy)]
pub struct XipRoutines {
    connect_internal_flash: RomEntry,
    flash_exit_xip: RomEntry,
    flash_flush_cache: RomEntry,
}

impl XipRoutines {
    /// Reconnect the QSPI pads to the internal flash
    #[inline(always)]
    pub fn connect_internal_flash<R: Bootrom>(&self, rom: &mut R) {
        rom.invoke(self.connect_internal_flash, RomCall::ConnectInternalFlash);
    }

    /// Drop the flash out of XIP mode
    #[inline(always)]
    pub fn exit_xip<R: Bootrom>(&self, rom: &mut R) {
        rom.invoke(self.flash_exit_xip, RomCall::FlashExitXip);
    }

    /// Flush the XIP cache; also releases the CSn IO force left by
    /// erase and program
    #[inline(always)]
    pub fn flush_cache<R: Bootrom>(&self, rom: &mut R) {
        rom.invoke(self.flash_flush_cache, RomCall::FlashFlushCache);
    }
}

/// Resolved range erase routine
#[derive(Debug, Clone, Copy)]
pub struct EraseRoutine(RomEntry);

impl EraseRoutine {
    /// Erase `count` bytes at `offset` using 64KB block erases where possible
    #[inline(always)]
    pub fn erase<R: Bootrom>(&self, rom: &mut R, offset: u32, count: usize) {
        rom.invoke(
            self.0,
            RomCall::FlashRangeErase {
                offset,
                count,
                block_size: BLOCK_SIZE,
                block_cmd: BLOCK_ERASE_CMD,
            },
        );
    }
}

/// Resolved range program routine
#[derive(Debug, Clone, Copy)]
pub struct ProgramRoutine(RomEntry);

impl ProgramRoutine {
    /// Program `data` (whole pages) at `offset`
    #[inline(always)]
    pub fn program<R: Bootrom>(&self, rom: &mut R, offset: u32, data: &[u8]) {
        rom.invoke(self.0, RomCall::FlashRangeProgram { offset, data });
    }
}
