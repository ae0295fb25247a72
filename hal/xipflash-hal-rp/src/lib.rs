//! RP2040 / RP2350 backend for the XIP flash engine
//!
//! This crate provides the implementations of the `xipflash-hal` traits for
//! the two RP-series chips, on top of the `embassy-rp` PAC and ROM table:
//!
//! - Boot ROM routine lookup and calls
//! - PRIMASK-based interrupt control
//! - QSPI pad and QMI window-1 access, boot2 copyout, uncached flash reads
//! - Watchdog-triggered full system reset
//! - RAM-resident entry points for the erase/program sequences
//!
//! Select the chip with the `rp2040` or `rp235xa` feature.

#![no_std]

#[cfg(not(any(feature = "rp2040", feature = "rp235xa")))]
compile_error!("enable exactly one of the `rp2040` or `rp235xa` features");

#[cfg(all(feature = "rp2040", feature = "rp235xa"))]
compile_error!("the `rp2040` and `rp235xa` features are mutually exclusive");

pub mod chip;
pub mod hardware;
pub mod irq;
pub mod ram;
pub mod rom;
pub mod watchdog;

pub use hardware::RpHardware;
pub use irq::CortexMInterrupts;
pub use ram::RpXipFlash;
pub use rom::RpBootrom;
pub use watchdog::WatchdogReset;
