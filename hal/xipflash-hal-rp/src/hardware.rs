//! QSPI pads, QMI window 1, boot2 and flash reads

use core::mem::transmute;
use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

use embassy_rp::pac;
use xipflash_hal::{Boot2Image, Boot2Source, Cs1ReadState, Cs1Window, FlashRead, QspiPad, QspiPads};

use crate::chip;

/// Register-level access to the flash interface of the chip
pub struct RpHardware {
    #[cfg(feature = "rp235xa")]
    cs1_device: bool,
}

impl RpHardware {
    /// # Safety
    ///
    /// Nothing else may drive the QSPI pads, the QMI or the XIP cache while
    /// this handle exists.
    #[cfg(feature = "rp2040")]
    pub unsafe fn new() -> Self {
        Self {}
    }

    /// # Safety
    ///
    /// Nothing else may drive the QSPI pads, the QMI or the XIP cache while
    /// this handle exists.
    #[cfg(feature = "rp235xa")]
    pub unsafe fn new() -> Self {
        let cs1_device = crate::rom::flash_devinfo().is_some_and(crate::rom::cs1_device_present);
        #[cfg(feature = "defmt")]
        defmt::debug!("CS1 device configured: {}", cs1_device);
        Self { cs1_device }
    }
}

impl QspiPads for RpHardware {
    #[inline(always)]
    fn read_pad(&self, pad: QspiPad) -> u32 {
        pac::PADS_QSPI.gpio(pad.index()).read().0
    }

    #[inline(always)]
    fn write_pad(&mut self, pad: QspiPad, value: u32) {
        pac::PADS_QSPI
            .gpio(pad.index())
            .write_value(pac::pads::regs::GpioCtrl(value));
    }
}

#[cfg(feature = "rp2040")]
impl Cs1Window for RpHardware {
    #[inline(always)]
    fn clean_pending_writes(&mut self) {}

    #[inline(always)]
    fn read_state(&self) -> Option<Cs1ReadState> {
        None
    }

    #[inline(always)]
    fn write_read_state(&mut self, _state: &Cs1ReadState) {}

    #[inline(always)]
    fn reset_write_config(&mut self) {}

    #[inline(always)]
    fn cs1_device_configured(&self) -> bool {
        false
    }
}

#[cfg(feature = "rp235xa")]
impl Cs1Window for RpHardware {
    #[inline(always)]
    fn clean_pending_writes(&mut self) {
        use chip::xip_cache::*;

        let base = MAINTENANCE_BASE + SET_WAY_OFFSET + OP_CLEAN_BY_SET_WAY;
        for line in (0..SIZE).step_by(LINE_SIZE) {
            // SAFETY: byte writes to the maintenance window only trigger
            // cache operations
            unsafe { ptr::write_volatile((base + line) as *mut u8, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }

    #[inline(always)]
    fn read_state(&self) -> Option<Cs1ReadState> {
        let m1 = pac::QMI.mem(1);
        Some(Cs1ReadState {
            timing: m1.timing().read().0,
            rcmd: m1.rcmd().read().0,
            rfmt: m1.rfmt().read().0,
        })
    }

    #[inline(always)]
    fn write_read_state(&mut self, state: &Cs1ReadState) {
        let m1 = pac::QMI.mem(1);
        m1.timing().write(|w| w.0 = state.timing);
        m1.rcmd().write(|w| w.0 = state.rcmd);
        m1.rfmt().write(|w| w.0 = state.rfmt);
    }

    #[inline(always)]
    fn reset_write_config(&mut self) {
        use xipflash_hal::qmi::{QMI_M1_WCMD_RESET, QMI_M1_WFMT_RESET};

        let m1 = pac::QMI.mem(1);
        m1.wfmt().write(|w| w.0 = QMI_M1_WFMT_RESET);
        m1.wcmd().write(|w| w.0 = QMI_M1_WCMD_RESET);
    }

    #[inline(always)]
    fn cs1_device_configured(&self) -> bool {
        self.cs1_device
    }
}

impl Boot2Source for RpHardware {
    fn copy_boot2(&mut self, image: &mut Boot2Image) {
        let src = chip::BOOT2_BASE as *const u32;
        for (i, word) in image.words_mut().iter_mut().enumerate() {
            // SAFETY: boot2 occupies the first 64 words at BOOT2_BASE and is
            // readable while XIP is active
            *word = unsafe { ptr::read_volatile(src.add(i)) };
        }
    }

    #[inline(always)]
    fn enter_xip(&mut self, image: &Boot2Image) {
        compiler_fence(Ordering::SeqCst);
        // SAFETY: `image` is a RAM copy of boot2, which reconfigures the
        // flash interface for XIP and returns
        unsafe {
            let boot2: unsafe extern "C" fn() = transmute(image.entry_address());
            boot2();
        }
    }
}

impl FlashRead for RpHardware {
    fn read(&self, offset: u32, buf: &mut [u8]) {
        let src = (chip::XIP_NOCACHE_NOALLOC_BASE + offset as usize) as *const u8;
        for (i, byte) in buf.iter_mut().enumerate() {
            // SAFETY: the engine bounds-checks `offset` against the device
            // size before reading
            *byte = unsafe { ptr::read_volatile(src.add(i)) };
        }
    }

    #[inline(always)]
    fn is_flash_mapped(&self, data: &[u8]) -> bool {
        chip::in_xip_window(data.as_ptr() as usize, data.len())
    }
}
