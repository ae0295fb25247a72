//! RAM-resident flash entry points
//!
//! Each function here is placed in `.data.ram_func`, which `cortex-m-rt`
//! copies to RAM at startup. The engine's masked path is
//! `#[inline(always)]` all the way down, so it is compiled into these
//! bodies and nothing in the XIP-down window is fetched from flash.

use xipflash_core::{FlashGeometry, FlashRange, Payload, XipFlash};
use xipflash_hal::FlashError;

use crate::{CortexMInterrupts, RpBootrom, RpHardware};

/// The engine over this chip's backend
pub type RpXipFlash = XipFlash<RpBootrom, CortexMInterrupts, RpHardware>;

/// Build the engine handle for a flash device of `geometry`
///
/// # Safety
///
/// Create at most one, from core 0 with core 1 parked, and keep it for
/// the life of the program.
pub unsafe fn xip_flash(geometry: FlashGeometry) -> RpXipFlash {
    XipFlash::new(
        RpBootrom::new(),
        CortexMInterrupts::new(),
        RpHardware::new(),
        geometry,
    )
}

#[link_section = ".data.ram_func"]
#[inline(never)]
pub fn erase_range(flash: &mut RpXipFlash, range: FlashRange) -> Result<(), FlashError> {
    flash.erase_range(range)
}

#[link_section = ".data.ram_func"]
#[inline(never)]
pub fn program_range(
    flash: &mut RpXipFlash,
    range: FlashRange,
    data: &[u8],
) -> Result<(), FlashError> {
    flash.program_range(range, data)
}

#[link_section = ".data.ram_func"]
#[inline(never)]
pub fn erase_and_program_range(
    flash: &mut RpXipFlash,
    range: FlashRange,
    data: &[u8],
) -> Result<(), FlashError> {
    flash.erase_and_program_range(range, data)
}

#[link_section = ".data.ram_func"]
#[inline(never)]
pub fn flash_payload(flash: &mut RpXipFlash, payload: &Payload<'_>) -> Result<(), FlashError> {
    flash.flash_payload(payload)
}
