//! Global log ring and the `log_*!` macros.
//!
//! Each macro formats once into a `heapless::String` for the ring and
//! forwards the same arguments to `defmt` for RTT. Arguments must therefore
//! implement both `core::fmt::Display` and `defmt::Format` and use plain
//! `{}` placeholders.
//!
//! # Usage
//!
//! ```ignore
//! log_info!("Fuel gauge starting");
//! log_warn!("T{} reading out of range", tank);
//! log_error!("Display init failed");
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use fuel_gauge_pico2::log_buffer::{LogBuffer, LogEntry};

pub use fuel_gauge_pico2::log_buffer::{LOG_MSG_LEN, LogLevel};

/// Global log buffer protected by a mutex.
pub static LOG_BUFFER: Mutex<CriticalSectionRawMutex, LogBuffer> = Mutex::new(LogBuffer::new());

/// Milliseconds since boot, truncated to 32 bits.
#[inline]
pub fn current_timestamp_ms() -> u32 { embassy_time::Instant::now().as_millis() as u32 }

/// Push a log entry to the global buffer.
///
/// Never blocks: if the mutex is held, the entry is dropped.
pub fn push_log(
    level: LogLevel,
    message: &str,
) {
    let entry = LogEntry::new(level, message, current_timestamp_ms());
    if let Ok(mut buffer) = LOG_BUFFER.try_lock() {
        buffer.push(entry);
    }
}

/// Warn and Error lines logged since boot, or `None` if the ring is busy.
pub fn problem_count() -> Option<u32> { LOG_BUFFER.try_lock().ok().map(|buffer| buffer.problems()) }

/// Replay the ring over RTT, oldest first.
///
/// Used when the firmware parks, so a probe attached afterwards still sees
/// what led up to it.
pub fn dump_logs() {
    let Ok(buffer) = LOG_BUFFER.try_lock() else {
        return;
    };
    if buffer.is_empty() {
        return;
    }
    defmt::info!("Last {} log lines:", buffer.len());
    for entry in buffer.iter() {
        defmt::info!("[{}] {} {}", entry.timestamp_ms, entry.level.prefix(), entry.message.as_str());
    }
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::logging::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::logging::push_log($crate::logging::LogLevel::Info, buf.as_str());
        defmt::info!($($arg)*);
    }};
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::logging::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::logging::push_log($crate::logging::LogLevel::Warn, buf.as_str());
        defmt::warn!($($arg)*);
    }};
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::logging::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::logging::push_log($crate::logging::LogLevel::Error, buf.as_str());
        defmt::error!($($arg)*);
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let mut buf: heapless::String<{ $crate::logging::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $crate::logging::push_log($crate::logging::LogLevel::Debug, buf.as_str());
        defmt::debug!($($arg)*);
    }};
}
