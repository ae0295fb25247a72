//! One-shot boot2 copyout

use core::cell::OnceCell;
use core::sync::atomic::{compiler_fence, Ordering};

use xipflash_hal::{Boot2Image, Boot2Source};

/// Write-once RAM copy of the second-stage bootloader
///
/// The copy must be taken while XIP is still active (boot2 is read out of
/// the flash window on RP2040), i.e. before the first flash operation.
/// After that it never changes.
#[derive(Debug, Default)]
pub struct Boot2Cell {
    image: OnceCell<Boot2Image>,
}

impl Boot2Cell {
    /// An empty cell
    pub const fn new() -> Self {
        Self {
            image: OnceCell::new(),
        }
    }

    /// Capture boot2 from `source` unless already captured
    ///
    /// Returns the cached image; `source` is read at most once over the
    /// cell's lifetime.
    #[inline(always)]
    pub fn ensure_copied<S: Boot2Source>(&self, source: &mut S) -> &Boot2Image {
        self.image.get_or_init(|| {
            let mut image = Boot2Image::zeroed();
            source.copy_boot2(&mut image);
            compiler_fence(Ordering::SeqCst);
            image
        })
    }

    /// Whether the image has been captured
    pub fn is_valid(&self) -> bool {
        self.image.get().is_some()
    }

    /// The captured image, if any
    pub fn get(&self) -> Option<&Boot2Image> {
        self.image.get()
    }
}
