//! Global interrupt masking
//!
//! The engine brackets the whole XIP-exit window with a masked section;
//! nothing else may run while flash cannot be fetched from.

/// Interrupt mask state captured before a critical section
///
/// Opaque to the engine. Backends encode whatever they need to put the mask
/// back exactly as it was (PRIMASK on Cortex-M).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MaskState(u32);

impl MaskState {
    /// Wrap a backend-specific raw mask value
    #[inline(always)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw mask value as given to [`MaskState::from_raw`]
    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Global interrupt control
pub trait InterruptControl {
    /// Disable all maskable interrupts, returning the previous state
    fn save_and_disable(&mut self) -> MaskState;

    /// Put the mask back to `state`
    ///
    /// Interrupts are only re-enabled if they were enabled when `state`
    /// was captured.
    fn restore(&mut self, state: MaskState);
}
