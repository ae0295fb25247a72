//! Boot ROM lookup and calls
//!
//! Lookups go through `embassy_rp::rom_data`. On RP2040 each routine has its
//! own accessor; on RP2350 the ROM table is searched by code with the Arm
//! secure-mode mask, which also reaches the data entries.

use core::mem::transmute;

use embassy_rp::rom_data;
use xipflash_hal::{Bootrom, RomCall, RomEntry, RomFunction};

type RomFnVoid = unsafe extern "C" fn();
type RomFnErase = unsafe extern "C" fn(u32, usize, u32, u8);
type RomFnProgram = unsafe extern "C" fn(u32, *const u8, usize);

#[cfg(feature = "rp2040")]
fn lookup_func(function: RomFunction) -> usize {
    match function {
        RomFunction::ConnectInternalFlash => rom_data::connect_internal_flash::ptr() as usize,
        RomFunction::FlashExitXip => rom_data::flash_exit_xip::ptr() as usize,
        RomFunction::FlashRangeErase => rom_data::flash_range_erase::ptr() as usize,
        RomFunction::FlashRangeProgram => rom_data::flash_range_program::ptr() as usize,
        RomFunction::FlashFlushCache => rom_data::flash_flush_cache::ptr() as usize,
    }
}

#[cfg(feature = "rp235xa")]
fn lookup_func(function: RomFunction) -> usize {
    rom_data::rom_table_lookup(function.code(), crate::chip::bootrom::FUNC_ARM_SEC)
}

/// Flash device info halfword the RP2350 ROM booted with
///
/// The ROM data entry holds a pointer to the halfword, not the halfword
/// itself. Returns `None` if the ROM does not publish it.
///
/// # Safety
///
/// Must run on an RP2350 in Arm secure mode.
#[cfg(feature = "rp235xa")]
pub unsafe fn flash_devinfo() -> Option<u16> {
    use crate::chip::bootrom::{DATA, FLASH_DEVINFO16_PTR};

    let entry = rom_data::rom_table_lookup(FLASH_DEVINFO16_PTR, DATA);
    follow_devinfo(entry as *const *const u16)
}

/// # Safety
///
/// `entry` must be null or point at a readable pointer that is itself null
/// or points at a readable halfword.
#[cfg(any(feature = "rp235xa", test))]
unsafe fn follow_devinfo(entry: *const *const u16) -> Option<u16> {
    if entry.is_null() {
        return None;
    }
    let devinfo = entry.read_volatile();
    if devinfo.is_null() {
        return None;
    }
    Some(devinfo.read_volatile())
}

/// Whether a `FLASH_DEVINFO` value declares a device on chip select 1
#[cfg(any(feature = "rp235xa", test))]
pub fn cs1_device_present(devinfo: u16) -> bool {
    const CS1_SIZE_MASK: u16 = 0xf000;
    const CS1_SIZE_SHIFT: u32 = 12;
    const SIZE_NONE: u16 = 0;

    (devinfo & CS1_SIZE_MASK) >> CS1_SIZE_SHIFT != SIZE_NONE
}

/// The chip's boot ROM
pub struct RpBootrom {
    _private: (),
}

impl RpBootrom {
    /// # Safety
    ///
    /// The routines called through this handle take the flash out of XIP
    /// mode. The caller must only invoke them from RAM-resident code with
    /// interrupts masked, which `XipFlash` on the RAM entry points does.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Bootrom for RpBootrom {
    fn lookup(&self, function: RomFunction) -> Option<RomEntry> {
        let entry = RomEntry::new(lookup_func(function));

        #[cfg(feature = "defmt")]
        match entry {
            Some(entry) => defmt::debug!("ROM {=str} at {=usize:#x}", function.name(), entry.addr()),
            None => defmt::warn!("ROM {=str} not found", function.name()),
        }

        entry
    }

    #[inline(always)]
    fn invoke(&mut self, entry: RomEntry, call: RomCall<'_>) {
        // SAFETY: `entry` came from `lookup` for the routine `call` names, so
        // the signature matches; preconditions are upheld by the engine
        unsafe {
            match call {
                RomCall::ConnectInternalFlash | RomCall::FlashExitXip | RomCall::FlashFlushCache => {
                    let f: RomFnVoid = transmute(entry.addr());
                    f();
                }
                RomCall::FlashRangeErase {
                    offset,
                    count,
                    block_size,
                    block_cmd,
                } => {
                    let f: RomFnErase = transmute(entry.addr());
                    f(offset, count, block_size, block_cmd);
                }
                RomCall::FlashRangeProgram { offset, data } => {
                    let f: RomFnProgram = transmute(entry.addr());
                    f(offset, data.as_ptr(), data.len());
                }
            }
        }
    }
}
