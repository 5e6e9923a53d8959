//! In-RAM ring of recent log lines.
//!
//! Every firmware log message is mirrored here next to the RTT output, so
//! the most recent history can be read from a halted core with a debugger
//! even when no probe was attached while it was written. The ring is plain
//! data; the global instance and the `log_*!` macros live in the binary.

use heapless::String;

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 48;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Message, truncated to `LOG_MSG_LEN - 1` characters.
    pub message: String<LOG_MSG_LEN>,
    /// Milliseconds since boot.
    pub timestamp_ms: u32,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u32,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars().take(LOG_MSG_LEN - 1) {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Circular buffer of log entries.
pub struct LogBuffer {
    entries: [LogEntry; LOG_ENTRIES],
    head: usize, // Next write position
    count: usize,
    /// Warn and Error entries ever pushed, including overwritten ones.
    problems: u32,
}

impl LogBuffer {
    pub const fn new() -> Self {
        Self {
            entries: [const {
                LogEntry {
                    level: LogLevel::Info,
                    message: String::new(),
                    timestamp_ms: 0,
                }
            }; LOG_ENTRIES],
            head: 0,
            count: 0,
            problems: 0,
        }
    }

    /// Push a new log entry. Oldest entry is dropped if buffer is full.
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        if entry.level >= LogLevel::Warn {
            self.problems = self.problems.saturating_add(1);
        }
        self.entries[self.head] = entry;
        self.head = (self.head + 1) % LOG_ENTRIES;
        if self.count < LOG_ENTRIES {
            self.count += 1;
        }
    }

    #[inline]
    pub const fn len(&self) -> usize { self.count }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    #[inline]
    pub const fn problems(&self) -> u32 { self.problems }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        let start = if self.count < LOG_ENTRIES { 0 } else { self.head };
        (0..self.count).map(move |i| &self.entries[(start + i) % LOG_ENTRIES])
    }
}

impl Default for LogBuffer {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        level: LogLevel,
        n: u32,
    ) -> LogEntry {
        let mut msg: String<16> = String::new();
        core::fmt::Write::write_fmt(&mut msg, format_args!("msg {n}")).ok();
        LogEntry::new(level, &msg, n)
    }

    #[test]
    fn test_push_and_iter_in_order() {
        let mut buffer = LogBuffer::new();
        assert!(buffer.is_empty());
        assert!(buffer.iter().next().is_none());
        for n in 0..3 {
            buffer.push(entry(LogLevel::Info, n));
        }
        let stamps: Vec<u32> = buffer.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![0, 1, 2]);
        assert_eq!(buffer.iter().last().map(|e| e.message.as_str()), Some("msg 2"));
    }

    #[test]
    fn test_wraps_oldest_first() {
        let mut buffer = LogBuffer::new();
        let total = LOG_ENTRIES as u32 + 5;
        for n in 0..total {
            buffer.push(entry(LogLevel::Debug, n));
        }
        assert_eq!(buffer.len(), LOG_ENTRIES);
        let stamps: Vec<u32> = buffer.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps.first(), Some(&5));
        assert_eq!(stamps.last(), Some(&(total - 1)));
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_truncates_long_messages() {
        let long = "x".repeat(LOG_MSG_LEN * 2);
        let e = LogEntry::new(LogLevel::Error, &long, 0);
        assert_eq!(e.message.len(), LOG_MSG_LEN - 1);
    }

    #[test]
    fn test_counts_problems() {
        let mut buffer = LogBuffer::new();
        buffer.push(entry(LogLevel::Info, 0));
        buffer.push(entry(LogLevel::Warn, 1));
        buffer.push(entry(LogLevel::Error, 2));
        buffer.push(entry(LogLevel::Debug, 3));
        assert_eq!(buffer.problems(), 2);
        assert_eq!(LogLevel::Warn.prefix(), 'W');
    }
}
