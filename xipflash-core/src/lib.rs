//! Board-agnostic core of the XIP flash self-programming engine
//!
//! This crate contains everything that does not touch registers directly:
//!
//! - ROM routine locator with lazily resolved, cached entries
//! - Scoped interrupt guard
//! - One-shot boot2 copyout cell
//! - QSPI pad / QMI window-1 snapshot and restore policy
//! - The erase/program sequencer itself
//! - Payload writer, no-heap debug formatter and host namespace
//!
//! Every step between masking interrupts and re-entering XIP mode is
//! `#[inline(always)]` so that a backend can monomorphise the whole sequence
//! into a single RAM-resident function.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod boot2;
pub mod debug;
pub mod engine;
pub mod guard;
pub mod module;
pub mod payload;
pub mod range;
pub mod rom;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod sim;

pub use boot2::Boot2Cell;
pub use engine::XipFlash;
pub use guard::InterruptGuard;
pub use module::{Namespace, NamespaceError};
pub use payload::Payload;
pub use range::{FlashGeometry, FlashRange};
pub use rom::{RomError, RomFunctionTable};
pub use snapshot::HardwareSnapshot;

pub use xipflash_hal::FlashError;
