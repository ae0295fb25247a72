//! Debug text over defmt/RTT

use xipflash_hal::DebugSink;

/// Forwards formatted debug text to the RTT log, one line per record
pub struct DefmtSink;

impl DebugSink for DefmtSink {
    fn write_str(&mut self, s: &str) {
        let line = s.trim_end_matches('\n');
        if !line.is_empty() {
            defmt::println!("{=str}", line);
        }
    }
}
