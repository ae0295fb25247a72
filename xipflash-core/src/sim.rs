//! Simulated RP-series chip for host tests
//!
//! Models just enough of the boot ROM, NOR flash, QSPI pads, QMI window 1,
//! boot2 and PRIMASK to check the engine's sequencing. The ROM routines
//! assert their preconditions (interrupts masked, XIP exited, whole pages
//! and sectors) so a sequencing bug shows up as a test panic.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use xipflash_hal::boot2::BOOT2_SIZE_WORDS;
use xipflash_hal::flash::{ERASED_BYTE, PAGE_SIZE, SECTOR_SIZE};
use xipflash_hal::pads::QSPI_PAD_COUNT;
use xipflash_hal::qmi::{QMI_M1_WCMD_RESET, QMI_M1_WFMT_RESET};
use xipflash_hal::{
    Boot2Image, Boot2Source, Bootrom, Cs1ReadState, Cs1Window, FlashRead, InterruptControl,
    MaskState, QspiPad, QspiPads, RomCall, RomEntry, RomFunction,
};

use crate::engine::XipFlash;
use crate::range::FlashGeometry;

/// Pad value the ROM leaves behind after connecting the flash
const ROM_PAD_DEFAULT: u32 = 0x0000_0050;

/// Pad values as boot2 might have tuned them
const TUNED_PADS: [u32; QSPI_PAD_COUNT] = [0x67, 0x62, 0x62, 0x62, 0x62, 0x5a];

/// Something observable the engine did to the chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Masked,
    Restored { masked: bool },
    Rom(RomFunction),
    Erase { offset: u32, count: usize },
    Program { offset: u32, len: usize },
    Boot2Copied,
    EnterXip,
    CacheCleaned,
    PadWritten(QspiPad),
    Cs1ReadRestored,
    Cs1WriteReset,
}

/// QMI window 1 registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimCs1 {
    pub timing: u32,
    pub rcmd: u32,
    pub rfmt: u32,
    pub wfmt: u32,
    pub wcmd: u32,
}

impl SimCs1 {
    /// Clean 03h serial read setup written by the ROM's XIP exit
    pub const ROM_EXIT_DEFAULT: SimCs1 = SimCs1 {
        timing: 0x4000_0000,
        rcmd: 0x0000_0003,
        rfmt: 0x0000_1000,
        wfmt: QMI_M1_WFMT_RESET,
        wcmd: QMI_M1_WCMD_RESET,
    };

    /// Quad PSRAM setup as an application would leave it
    const PSRAM: SimCs1 = SimCs1 {
        timing: 0x6007_3112,
        rcmd: 0x0000_f5eb,
        rfmt: 0x000b_22a2,
        wfmt: 0x0000_22a2,
        wcmd: 0x0000_0038,
    };
}

/// Chip state shared by all simulated peripherals
pub struct SimChip {
    pub flash: Vec<u8>,
    pub masked: bool,
    pub xip_active: bool,
    pub cs_forced: bool,
    pub pads: [u32; QSPI_PAD_COUNT],
    /// `None` on RP2040, which has no window 1
    pub cs1: Option<SimCs1>,
    pub cs1_device: bool,
    pub boot2: [u32; BOOT2_SIZE_WORDS],
    pub boot2_copies: usize,
    pub xip_entries: usize,
    pub cache_cleans: usize,
    pub lookups: usize,
    pub block_erases: usize,
    pub sector_erases: usize,
    /// Host buffers standing in for data linked into flash, as address ranges
    pub flash_mapped: Vec<(usize, usize)>,
    pub events: Vec<Event>,
}

/// Handle to a shared [`SimChip`]
#[derive(Clone)]
pub struct Sim(Rc<RefCell<SimChip>>);

impl SimChip {
    fn new(size: usize, cs1: Option<SimCs1>, cs1_device: bool) -> Sim {
        let mut boot2 = [0u32; BOOT2_SIZE_WORDS];
        for (i, word) in boot2.iter_mut().enumerate() {
            *word = 0x4b32_0000 | i as u32;
        }
        Sim(Rc::new(RefCell::new(SimChip {
            flash: vec![ERASED_BYTE; size],
            masked: false,
            xip_active: true,
            cs_forced: false,
            pads: TUNED_PADS,
            cs1,
            cs1_device,
            boot2,
            boot2_copies: 0,
            xip_entries: 0,
            cache_cleans: 0,
            lookups: 0,
            block_erases: 0,
            sector_erases: 0,
            flash_mapped: Vec::new(),
            events: Vec::new(),
        })))
    }

    /// An RP2040 with `size` bytes of flash
    pub fn rp2040(size: usize) -> Sim {
        Self::new(size, None, false)
    }

    /// An RP2350 with `size` bytes of flash, optionally with a PSRAM on CS1
    pub fn rp2350(size: usize, cs1_device: bool) -> Sim {
        Self::new(size, Some(SimCs1::PSRAM), cs1_device)
    }

    fn rom_erase(&mut self, offset: u32, count: usize, block_size: u32) {
        assert_eq!(offset % SECTOR_SIZE, 0, "erase offset not sector aligned");
        assert_eq!(count % SECTOR_SIZE as usize, 0, "erase count not whole sectors");

        // Same walk as the ROM: block command on aligned runs, else sectors
        let mut addr = offset as usize;
        let goal = offset as usize + count;
        while addr < goal {
            let step = if addr % block_size as usize == 0 && goal - addr >= block_size as usize {
                self.block_erases += 1;
                block_size as usize
            } else {
                self.sector_erases += 1;
                SECTOR_SIZE as usize
            };
            self.flash[addr..addr + step].fill(ERASED_BYTE);
            addr += step;
        }
    }

    fn is_mapped(&self, data: &[u8]) -> bool {
        let start = data.as_ptr() as usize;
        let end = start + data.len();
        !data.is_empty()
            && self
                .flash_mapped
                .iter()
                .any(|&(lo, hi)| start < hi && lo < end)
    }

    fn rom_program(&mut self, offset: u32, data: &[u8]) {
        assert_eq!(offset % PAGE_SIZE, 0, "program offset not page aligned");
        assert_eq!(data.len() % PAGE_SIZE as usize, 0, "program count not whole pages");

        let start = offset as usize;
        for (cell, byte) in self.flash[start..start + data.len()].iter_mut().zip(data) {
            // NOR programming can only clear bits
            *cell &= *byte;
        }
    }
}

impl Sim {
    pub fn borrow(&self) -> Ref<'_, SimChip> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, SimChip> {
        self.0.borrow_mut()
    }

    pub fn bootrom(&self) -> SimBootrom {
        SimBootrom {
            chip: self.clone(),
            missing: [false; RomFunction::COUNT],
        }
    }

    /// Treat `data` as if it had been linked into the XIP window
    pub fn map_into_flash(&self, data: &[u8]) {
        let start = data.as_ptr() as usize;
        self.borrow_mut().flash_mapped.push((start, start + data.len()));
    }

    pub fn interrupts(&self) -> SimInterrupts {
        SimInterrupts { chip: self.clone() }
    }

    pub fn hardware(&self) -> SimHardware {
        SimHardware { chip: self.clone() }
    }

    pub fn xip_flash(&self) -> XipFlash<SimBootrom, SimInterrupts, SimHardware> {
        self.xip_flash_with(self.bootrom())
    }

    pub fn xip_flash_without(
        &self,
        function: RomFunction,
    ) -> XipFlash<SimBootrom, SimInterrupts, SimHardware> {
        let mut rom = self.bootrom();
        rom.remove(function);
        self.xip_flash_with(rom)
    }

    fn xip_flash_with(&self, rom: SimBootrom) -> XipFlash<SimBootrom, SimInterrupts, SimHardware> {
        let size = self.borrow().flash.len() as u32;
        XipFlash::new(rom, self.interrupts(), self.hardware(), FlashGeometry::new(size))
    }
}

pub struct SimBootrom {
    chip: Sim,
    missing: [bool; RomFunction::COUNT],
}

impl SimBootrom {
    /// Make `function` absent from this ROM's table
    pub fn remove(&mut self, function: RomFunction) {
        self.missing[function.slot()] = true;
    }

    fn entry_for(&self, function: RomFunction) -> Option<RomEntry> {
        if self.missing[function.slot()] {
            return None;
        }
        RomEntry::new(0x2000 + function.slot() * 0x40)
    }
}

impl Bootrom for SimBootrom {
    fn lookup(&self, function: RomFunction) -> Option<RomEntry> {
        self.chip.borrow_mut().lookups += 1;
        self.entry_for(function)
    }

    fn invoke(&mut self, entry: RomEntry, call: RomCall<'_>) {
        assert_eq!(self.entry_for(call.function()), Some(entry), "entry/call mismatch");
        let mut chip = self.chip.borrow_mut();
        assert!(chip.masked, "ROM flash routine called with interrupts enabled");

        match call {
            RomCall::ConnectInternalFlash => {
                chip.pads = [ROM_PAD_DEFAULT; QSPI_PAD_COUNT];
                chip.events.push(Event::Rom(RomFunction::ConnectInternalFlash));
            }
            RomCall::FlashExitXip => {
                chip.xip_active = false;
                if let Some(cs1) = chip.cs1.as_mut() {
                    // The ROM resets the read side only; write registers keep
                    // whatever mode the application had set
                    cs1.timing = SimCs1::ROM_EXIT_DEFAULT.timing;
                    cs1.rcmd = SimCs1::ROM_EXIT_DEFAULT.rcmd;
                    cs1.rfmt = SimCs1::ROM_EXIT_DEFAULT.rfmt;
                }
                chip.events.push(Event::Rom(RomFunction::FlashExitXip));
            }
            RomCall::FlashRangeErase {
                offset,
                count,
                block_size,
                block_cmd,
            } => {
                assert!(!chip.xip_active, "erase while in XIP mode");
                assert_eq!(block_cmd, 0xd8);
                chip.rom_erase(offset, count, block_size);
                chip.cs_forced = true;
                chip.events.push(Event::Erase { offset, count });
            }
            RomCall::FlashRangeProgram { offset, data } => {
                assert!(!chip.xip_active, "program while in XIP mode");
                assert!(!chip.is_mapped(data), "program source fetched from flash with XIP down");
                chip.rom_program(offset, data);
                chip.cs_forced = true;
                chip.events.push(Event::Program {
                    offset,
                    len: data.len(),
                });
            }
            RomCall::FlashFlushCache => {
                chip.cs_forced = false;
                chip.events.push(Event::Rom(RomFunction::FlashFlushCache));
            }
        }
    }
}

pub struct SimInterrupts {
    chip: Sim,
}

impl InterruptControl for SimInterrupts {
    fn save_and_disable(&mut self) -> MaskState {
        let mut chip = self.chip.borrow_mut();
        let previous = MaskState::from_raw(chip.masked as u32);
        chip.masked = true;
        chip.events.push(Event::Masked);
        previous
    }

    fn restore(&mut self, state: MaskState) {
        let mut chip = self.chip.borrow_mut();
        chip.masked = state.raw() != 0;
        let masked = chip.masked;
        chip.events.push(Event::Restored { masked });
    }
}

pub struct SimHardware {
    chip: Sim,
}

impl QspiPads for SimHardware {
    fn read_pad(&self, pad: QspiPad) -> u32 {
        self.chip.borrow().pads[pad.index()]
    }

    fn write_pad(&mut self, pad: QspiPad, value: u32) {
        let mut chip = self.chip.borrow_mut();
        chip.pads[pad.index()] = value;
        chip.events.push(Event::PadWritten(pad));
    }
}

impl Cs1Window for SimHardware {
    fn clean_pending_writes(&mut self) {
        let mut chip = self.chip.borrow_mut();
        chip.cache_cleans += 1;
        chip.events.push(Event::CacheCleaned);
    }

    fn read_state(&self) -> Option<Cs1ReadState> {
        self.chip.borrow().cs1.map(|cs1| Cs1ReadState {
            timing: cs1.timing,
            rcmd: cs1.rcmd,
            rfmt: cs1.rfmt,
        })
    }

    fn write_read_state(&mut self, state: &Cs1ReadState) {
        let mut chip = self.chip.borrow_mut();
        let cs1 = chip.cs1.as_mut().expect("no window 1 on this chip");
        cs1.timing = state.timing;
        cs1.rcmd = state.rcmd;
        cs1.rfmt = state.rfmt;
        chip.events.push(Event::Cs1ReadRestored);
    }

    fn reset_write_config(&mut self) {
        let mut chip = self.chip.borrow_mut();
        let cs1 = chip.cs1.as_mut().expect("no window 1 on this chip");
        cs1.wfmt = QMI_M1_WFMT_RESET;
        cs1.wcmd = QMI_M1_WCMD_RESET;
        chip.events.push(Event::Cs1WriteReset);
    }

    fn cs1_device_configured(&self) -> bool {
        self.chip.borrow().cs1_device
    }
}

impl Boot2Source for SimHardware {
    fn copy_boot2(&mut self, image: &mut Boot2Image) {
        let mut chip = self.chip.borrow_mut();
        assert!(chip.xip_active, "boot2 copied while XIP is down");
        *image.words_mut() = chip.boot2;
        chip.boot2_copies += 1;
        chip.events.push(Event::Boot2Copied);
    }

    fn enter_xip(&mut self, image: &Boot2Image) {
        let mut chip = self.chip.borrow_mut();
        assert!(chip.masked, "XIP re-entered with interrupts enabled");
        assert!(!chip.cs_forced, "XIP re-entered with CSn still forced");
        assert_eq!(image.words(), &chip.boot2, "boot2 copy is corrupt");
        chip.xip_active = true;
        chip.xip_entries += 1;
        chip.events.push(Event::EnterXip);
    }
}

impl FlashRead for SimHardware {
    fn read(&self, offset: u32, buf: &mut [u8]) {
        let chip = self.chip.borrow();
        assert!(chip.xip_active, "flash read while XIP is down");
        let start = offset as usize;
        buf.copy_from_slice(&chip.flash[start..start + buf.len()]);
    }

    fn is_flash_mapped(&self, data: &[u8]) -> bool {
        self.chip.borrow().is_mapped(data)
    }
}
