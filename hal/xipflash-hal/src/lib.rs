//! xipflash Hardware Abstraction Layer
//!
//! This crate defines the seams between the board-agnostic flash engine
//! (`xipflash-core`) and a chip backend (`xipflash-hal-rp`, or the simulated
//! chip used by the host tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  xipflash-firmware (host + payload)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  xipflash-core (erase/program engine)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  xipflash-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  xipflash-hal-rp (RP2040 / RP2350)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`rom::Bootrom`] - Boot ROM routine lookup and invocation
//! - [`irq::InterruptControl`] - Global interrupt masking
//! - [`pads::QspiPads`] - QSPI pad electrical configuration
//! - [`qmi::Cs1Window`] - Second chip-select memory window
//! - [`boot2::Boot2Source`] - Second-stage bootloader copyout and re-entry
//! - [`flash::FlashRead`] - Reading flash through the XIP alias
//! - [`debug::DebugSink`] - Human-readable status output
//! - [`reset::SystemReset`] - Full system reset

#![no_std]
#![deny(unsafe_code)]

pub mod boot2;
pub mod debug;
pub mod flash;
pub mod irq;
pub mod pads;
pub mod qmi;
pub mod reset;
pub mod rom;

// Re-export key traits at crate root for convenience
pub use boot2::{Boot2Image, Boot2Source};
pub use debug::DebugSink;
pub use flash::{FlashError, FlashRead};
pub use irq::{InterruptControl, MaskState};
pub use pads::{QspiPad, QspiPads};
pub use qmi::{Cs1ReadState, Cs1Window};
pub use reset::SystemReset;
pub use rom::{Bootrom, RomCall, RomEntry, RomFunction};
