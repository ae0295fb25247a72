//! Embedded payload flashing
//!
//! A payload is a raw image placed verbatim at a fixed flash offset. There is
//! no header or checksum; verification is a plain read-back compare.

use xipflash_hal::{
    Boot2Source, Bootrom, Cs1Window, FlashError, FlashRead, InterruptControl, QspiPads,
};

use crate::engine::XipFlash;
use crate::range::FlashRange;

/// Read-back chunk size used by verification
const VERIFY_CHUNK: usize = 64;

/// A raw image and where it goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    bytes: &'a [u8],
    offset: u32,
}

impl<'a> Payload<'a> {
    /// `bytes` to be written at flash offset `offset`
    pub const fn new(bytes: &'a [u8], offset: u32) -> Self {
        Self { bytes, offset }
    }

    /// Image contents
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Flash offset of the first byte
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Image length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Flash range the payload occupies
    pub fn range(&self) -> FlashRange {
        FlashRange::new(self.offset, self.bytes.len())
    }
}

impl<R, I, H> XipFlash<R, I, H>
where
    R: Bootrom,
    I: InterruptControl,
    H: QspiPads + Cs1Window + Boot2Source + FlashRead,
{
    /// Erase the sectors under `payload` and write it, in one XIP exit
    #[inline(always)]
    pub fn flash_payload(&mut self, payload: &Payload<'_>) -> Result<(), FlashError> {
        self.erase_and_program_range(payload.range(), payload.bytes())
    }

    /// Compare flash contents against `payload`
    ///
    /// Returns [`FlashError::VerifyMismatch`] with the first differing
    /// offset.
    pub fn verify_payload(&self, payload: &Payload<'_>) -> Result<(), FlashError> {
        let mut buf = [0u8; VERIFY_CHUNK];
        let mut offset = payload.offset();
        for expected in payload.bytes().chunks(VERIFY_CHUNK) {
            let actual = &mut buf[..expected.len()];
            self.read(offset, actual)?;
            if let Some(pos) = actual.iter().zip(expected).position(|(a, e)| a != e) {
                return Err(FlashError::VerifyMismatch {
                    offset: offset + pos as u32,
                });
            }
            offset += expected.len() as u32;
        }
        Ok(())
    }
}
