//! No-heap debug formatting
//!
//! Formats into a fixed `heapless::String` and hands finished chunks to a
//! [`DebugSink`]. Text longer than the buffer is split across several sink
//! writes rather than truncated.

use core::fmt::{self, Write};

use heapless::String;
use xipflash_hal::DebugSink;

/// Line buffer capacity
pub const LINE_CAPACITY: usize = 96;

struct ChunkWriter<'a, S: DebugSink + ?Sized> {
    sink: &'a mut S,
    line: String<LINE_CAPACITY>,
}

impl<S: DebugSink + ?Sized> ChunkWriter<'_, S> {
    fn flush(&mut self) {
        if !self.line.is_empty() {
            self.sink.write_str(&self.line);
            self.line.clear();
        }
    }
}

impl<S: DebugSink + ?Sized> Write for ChunkWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.line.push(c).is_err() {
                self.flush();
                // An empty buffer always has room for one char
                self.line.push(c).map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}

/// Format `args` into `sink`
pub fn print<S: DebugSink + ?Sized>(sink: &mut S, args: fmt::Arguments<'_>) {
    let mut writer = ChunkWriter {
        sink,
        line: String::new(),
    };
    // Formatting into the chunk writer cannot fail
    let _ = writer.write_fmt(args);
    writer.flush();
}

/// `print!`-style output to a [`DebugSink`]
#[macro_export]
macro_rules! dprint {
    ($sink:expr, $($arg:tt)*) => {
        $crate::debug::print($sink, ::core::format_args!($($arg)*))
    };
}

/// `println!`-style output to a [`DebugSink`]
#[macro_export]
macro_rules! dprintln {
    ($sink:expr) => {
        $crate::debug::print($sink, ::core::format_args!("\n"))
    };
    ($sink:expr, $($arg:tt)*) => {
        $crate::debug::print(
            $sink,
            ::core::format_args!("{}\n", ::core::format_args!($($arg)*)),
        )
    };
}
