//! Second-stage bootloader copyout
//!
//! After `flash_exit_xip` the flash interface is left in a slow serial
//! mode. The second-stage bootloader (boot2) knows how to put it back into
//! the fast XIP mode it was running in, but it sits in flash and cannot be
//! fetched while flash is busy, so a copy is kept in RAM.

/// Size of the boot2 image in 32-bit words
pub const BOOT2_SIZE_WORDS: usize = 64;

/// RAM copy of the boot2 image
///
/// Word aligned so its address is a valid code address once the Thumb bit
/// is set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(C, align(4))]
pub struct Boot2Image {
    words: [u32; BOOT2_SIZE_WORDS],
}

impl Default for Boot2Image {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Boot2Image {
    /// An all-zero image, to be filled by [`Boot2Source::copy_boot2`]
    pub const fn zeroed() -> Self {
        Self {
            words: [0; BOOT2_SIZE_WORDS],
        }
    }

    /// Image contents
    pub fn words(&self) -> &[u32; BOOT2_SIZE_WORDS] {
        &self.words
    }

    /// Mutable image contents
    pub fn words_mut(&mut self) -> &mut [u32; BOOT2_SIZE_WORDS] {
        &mut self.words
    }

    /// Call address of the copy: its first byte with the Thumb bit set
    #[inline(always)]
    pub fn entry_address(&self) -> usize {
        self.words.as_ptr() as usize | 1
    }
}

/// Boot2 capture and execution
pub trait Boot2Source {
    /// Copy the boot2 image from its fixed location into `image`
    fn copy_boot2(&mut self, image: &mut Boot2Image);

    /// Run the RAM copy to re-enter XIP mode; returns once XIP is active
    fn enter_xip(&mut self, image: &Boot2Image);
}
