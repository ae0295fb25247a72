//! System reset

/// Full system reset, used to restart into freshly written code
pub trait SystemReset {
    /// Reset the chip. Never returns.
    fn reboot(&mut self) -> !;
}
