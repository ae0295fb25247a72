//! Per-chip memory map constants the PAC does not describe

/// Start of the cached XIP window
pub const XIP_BASE: usize = 0x1000_0000;

/// End of the XIP address space (cached, uncached and maintenance aliases)
pub const XIP_END: usize = 0x2000_0000;

/// Uncached, non-allocating alias of the XIP window
#[cfg(feature = "rp2040")]
pub const XIP_NOCACHE_NOALLOC_BASE: usize = 0x1300_0000;
#[cfg(feature = "rp235xa")]
pub const XIP_NOCACHE_NOALLOC_BASE: usize = 0x1400_0000;

/// Where the boot2 image lives once the ROM has finished booting
///
/// RP2040 runs boot2 straight out of the first flash page; the RP2350 ROM
/// leaves its copy in boot RAM.
#[cfg(feature = "rp2040")]
pub const BOOT2_BASE: usize = XIP_BASE;
#[cfg(feature = "rp235xa")]
pub const BOOT2_BASE: usize = 0x400e_0000;

/// XIP cache maintenance window (RP2350)
#[cfg(feature = "rp235xa")]
pub mod xip_cache {
    pub const MAINTENANCE_BASE: usize = 0x1800_0000;
    pub const SIZE: usize = 16 * 1024;
    pub const LINE_SIZE: usize = 8;
    /// Clean by set/way
    pub const OP_CLEAN_BY_SET_WAY: usize = 1;
    /// Offset of the set/way range. Sits above the QMI address range to
    /// avoid erratum RP2350-E11.
    pub const SET_WAY_OFFSET: usize = 0x0400_0000 - SIZE;
}

/// `PSM.WDSEL` bits
pub mod psm_wdsel {
    #[cfg(feature = "rp2040")]
    pub const ALL: u32 = 0x0001_ffff;
    #[cfg(feature = "rp235xa")]
    pub const ALL: u32 = 0x01ff_ffff;
    pub const ROSC: u32 = 1 << 0;
    pub const XOSC: u32 = 1 << 1;
}

/// Boot ROM lookup masks and codes (RP2350)
#[cfg(feature = "rp235xa")]
pub mod bootrom {
    /// Arm secure-mode function entry
    pub const FUNC_ARM_SEC: u32 = 0x0004;
    /// Data entry
    pub const DATA: u32 = 0x0040;

    /// Pointer to the `FLASH_DEVINFO` halfword the ROM boots with
    pub const FLASH_DEVINFO16_PTR: [u8; 2] = *b"FD";
}

/// Whether `len` bytes at address `start` overlap the XIP address space
pub const fn in_xip_window(start: usize, len: usize) -> bool {
    len != 0 && start < XIP_END && start + len > XIP_BASE
}
