//! Debug output
//!
//! A sink for human-readable progress text. Formatting happens in
//! `xipflash-core` without a heap; the sink only forwards finished text to
//! whatever print channel the platform has.

/// Destination for formatted debug text
pub trait DebugSink {
    /// Emit a chunk of text
    fn write_str(&mut self, s: &str);
}
