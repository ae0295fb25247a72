//! PRIMASK interrupt control

use cortex_m::interrupt;
use cortex_m::register::primask;
use xipflash_hal::{InterruptControl, MaskState};

const ENABLED: u32 = 1;
const DISABLED: u32 = 0;

/// Masks interrupts on the executing core through PRIMASK
pub struct CortexMInterrupts {
    _private: (),
}

impl CortexMInterrupts {
    /// # Safety
    ///
    /// Only this core may be running; PRIMASK does not stop the other one.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl InterruptControl for CortexMInterrupts {
    #[inline(always)]
    fn save_and_disable(&mut self) -> MaskState {
        let state = if primask::read().is_active() {
            ENABLED
        } else {
            DISABLED
        };
        interrupt::disable();
        MaskState::from_raw(state)
    }

    #[inline(always)]
    fn restore(&mut self, state: MaskState) {
        if state.raw() == ENABLED {
            // SAFETY: interrupts were enabled when `state` was captured
            unsafe { interrupt::enable() }
        }
    }
}
