//! Flash erase/program engine
//!
//! Sequences one flash operation while the program keeps running from the
//! flash being written:
//!
//! ```text
//!  resolve ROM routines ─► copy boot2 ─► save pads/QMI
//!        ┌───────────── interrupts masked ─────────────┐
//!        │ barrier ─► connect ─► exit XIP ─► erase/program ─► flush │
//!        │ ─► boot2 (re-enter XIP) ─► restore pads/QMI            │
//!        └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing between masking and XIP re-entry may be fetched from flash. The
//! masked path is `#[inline(always)]` down to the trait calls so the backend
//! can pin the whole thing in RAM by wrapping it in a single
//! `#[link_section]` function.

use core::sync::atomic::{fence, Ordering};

use xipflash_hal::flash::{ERASED_BYTE, PAGE_SIZE};
use xipflash_hal::{Boot2Source, Bootrom, Cs1Window, FlashError, FlashRead, InterruptControl, QspiPads};

use crate::boot2::Boot2Cell;
use crate::guard::InterruptGuard;
use crate::range::{FlashGeometry, FlashRange};
use crate::rom::{EraseRoutine, ProgramRoutine, RomFunctionTable, XipRoutines};
use crate::snapshot::HardwareSnapshot;

const PAGE: usize = PAGE_SIZE as usize;

/// Flash self-programming handle
///
/// Holds the chip backend plus the two pieces of state that outlive a
/// single operation: the resolved ROM table and the boot2 copy. Create one
/// for the life of the program and keep it at a fixed address.
pub struct XipFlash<R, I, H> {
    rom: RomFunctionTable<R>,
    irq: I,
    hw: H,
    boot2: Boot2Cell,
    geometry: FlashGeometry,
}

struct EraseStep {
    routine: EraseRoutine,
    offset: u32,
    count: usize,
}

struct ProgramStep<'a> {
    routine: ProgramRoutine,
    offset: u32,
    /// Whole pages taken straight from the caller's buffer
    body: &'a [u8],
    /// Trailing partial page, padded to a full page, or empty
    tail: &'a [u8],
}

impl ProgramStep<'_> {
    #[inline(always)]
    fn run<R: Bootrom>(&self, rom: &mut R) {
        if !self.body.is_empty() {
            self.routine.program(rom, self.offset, self.body);
        }
        if !self.tail.is_empty() {
            let tail_offset = self.offset + self.body.len() as u32;
            self.routine.program(rom, tail_offset, self.tail);
        }
    }
}

/// Split `data` into its whole pages and a partial last page
///
/// The partial page is copied into `page`, which starts out erased, so
/// programming it leaves the bytes after the data untouched.
fn stage_pages<'a>(data: &'a [u8], page: &'a mut [u8; PAGE]) -> (&'a [u8], &'a [u8]) {
    let whole = data.len() - data.len() % PAGE;
    let (body, rest) = data.split_at(whole);
    if rest.is_empty() {
        return (body, &[]);
    }
    page[..rest.len()].copy_from_slice(rest);
    (body, &page[..])
}

impl<R, I, H> XipFlash<R, I, H>
where
    R: Bootrom,
    I: InterruptControl,
    H: QspiPads + Cs1Window + Boot2Source + FlashRead,
{
    /// Create a handle over a device described by `geometry`
    ///
    /// No hardware is touched until the first operation.
    pub fn new(rom: R, irq: I, hw: H, geometry: FlashGeometry) -> Self {
        Self {
            rom: RomFunctionTable::new(rom),
            irq,
            hw,
            boot2: Boot2Cell::new(),
            geometry,
        }
    }

    /// Device geometry
    pub fn geometry(&self) -> FlashGeometry {
        self.geometry
    }

    /// The boot2 copy cache
    pub fn boot2(&self) -> &Boot2Cell {
        &self.boot2
    }

    /// The ROM routine table
    pub fn rom_table(&self) -> &RomFunctionTable<R> {
        &self.rom
    }

    /// Take the boot2 copy now rather than on the first operation
    pub fn ensure_boot2_copied(&mut self) {
        self.boot2.ensure_copied(&mut self.hw);
    }

    /// Erase the sectors covering `range`
    ///
    /// `range.offset` must be sector aligned; the length is rounded up to
    /// whole sectors. Afterwards every byte of the widened range reads as
    /// `0xff`.
    #[inline(always)]
    pub fn erase_range(&mut self, range: FlashRange) -> Result<(), FlashError> {
        let extent = self.geometry.erase_extent(range)?;
        if extent.is_empty() {
            return Ok(());
        }

        let xip = self.rom.xip_routines();
        let erase = EraseStep {
            routine: self.rom.erase_routine(),
            offset: extent.offset,
            count: extent.length,
        };
        self.run(xip, Some(erase), None);
        Ok(())
    }

    /// Program `data` into `range`, which must already be erased
    ///
    /// `range.offset` must be page aligned and `data.len()` must equal
    /// `range.length`. A trailing partial page is padded with `0xff`.
    ///
    /// The ROM reads `data` after XIP has been switched off, so it must live
    /// in RAM. A buffer in the XIP window (a `const` or a plain `static`
    /// slice, for instance) is rejected with [`FlashError::SourceInFlash`].
    #[inline(always)]
    pub fn program_range(&mut self, range: FlashRange, data: &[u8]) -> Result<(), FlashError> {
        self.check_source(range, data)?;
        self.geometry.check_program(range)?;
        if range.is_empty() {
            return Ok(());
        }

        let xip = self.rom.xip_routines();
        let routine = self.rom.program_routine();
        let mut page = [ERASED_BYTE; PAGE];
        let (body, tail) = stage_pages(data, &mut page);
        let program = ProgramStep {
            routine,
            offset: range.offset,
            body,
            tail,
        };
        self.run(xip, None, Some(program));
        Ok(())
    }

    /// Erase the sectors covering `range` and program `data` into it, in a
    /// single XIP exit
    ///
    /// `range.offset` must be sector aligned and `data.len()` must equal
    /// `range.length`. Bytes between the end of `data` and the end of its
    /// last sector are left erased. As with [`program_range`], `data` must
    /// not be in the XIP window.
    ///
    /// [`program_range`]: XipFlash::program_range
    #[inline(always)]
    pub fn erase_and_program_range(
        &mut self,
        range: FlashRange,
        data: &[u8],
    ) -> Result<(), FlashError> {
        self.check_source(range, data)?;
        let extent = self.geometry.erase_extent(range)?;
        if extent.is_empty() {
            return Ok(());
        }

        let xip = self.rom.xip_routines();
        let erase = EraseStep {
            routine: self.rom.erase_routine(),
            offset: extent.offset,
            count: extent.length,
        };
        let routine = self.rom.program_routine();
        let mut page = [ERASED_BYTE; PAGE];
        let (body, tail) = stage_pages(data, &mut page);
        let program = ProgramStep {
            routine,
            offset: range.offset,
            body,
            tail,
        };
        self.run(xip, Some(erase), Some(program));
        Ok(())
    }

    /// Read `buf.len()` bytes of flash starting at `offset`
    pub fn read(&self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        self.geometry
            .check_bounds(FlashRange::new(offset, buf.len()))?;
        self.hw.read(offset, buf);
        Ok(())
    }

    #[inline(always)]
    fn check_source(&self, range: FlashRange, data: &[u8]) -> Result<(), FlashError> {
        if data.len() != range.length {
            return Err(FlashError::LengthMismatch);
        }
        if self.hw.is_flash_mapped(data) {
            return Err(FlashError::SourceInFlash);
        }
        Ok(())
    }

    #[inline(always)]
    fn run(&mut self, xip: XipRoutines, erase: Option<EraseStep>, program: Option<ProgramStep<'_>>) {
        let boot2 = self.boot2.ensure_copied(&mut self.hw);
        let snapshot = HardwareSnapshot::save(&mut self.hw);

        let guard = InterruptGuard::acquire(&mut self.irq);
        // No flash accesses may be reordered past this point
        fence(Ordering::SeqCst);

        let rom = self.rom.bootrom_mut();
        xip.connect_internal_flash(rom);
        xip.exit_xip(rom);

        if let Some(step) = erase {
            step.routine.erase(rom, step.offset, step.count);
            xip.flush_cache(rom);
        }
        if let Some(step) = program {
            step.run(rom);
            xip.flush_cache(rom);
        }

        self.hw.enter_xip(boot2);
        snapshot.restore(&mut self.hw);
        drop(guard);
    }
}
