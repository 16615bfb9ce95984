//! Peak memory usage of the process.

use std::fmt;

/// Reports the peak memory usage of the process in bytes.
pub trait MemoryProbe: Send + Sync + fmt::Debug {
    /// Peak resident memory in bytes.
    fn peak_usage(&self) -> u64;
}

/// Reads the peak resident set size from the operating system.
///
/// On Linux this is `VmHWM` from `/proc/self/status`. Platforms without a
/// readable source report 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl MemoryProbe for ProcessMemory {
    fn peak_usage(&self) -> u64 {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => parse_status(&status).unwrap_or(0),
            Err(err) => {
                tracing::debug!(error = %err, "peak memory unavailable");
                0
            }
        }
    }
}

/// Memory probe that always reports the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMemory(pub u64);

impl MemoryProbe for FixedMemory {
    fn peak_usage(&self) -> u64 {
        self.0
    }
}

/// Extract the peak RSS in bytes from a `/proc/<pid>/status` document.
fn parse_status(status: &str) -> Option<u64> {
    // Kernels without VmHWM still report the current RSS.
    field_kib(status, "VmHWM:")
        .or_else(|| field_kib(status, "VmRSS:"))
        .map(|kib| kib * 1024)
}

fn field_kib(status: &str, key: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "Name:\tworker\nVmPeak:\t  20000 kB\nVmHWM:\t    5120 kB\nVmRSS:\t    4096 kB\n";

    #[test]
    fn test_parse_status_prefers_hwm() {
        assert_eq!(parse_status(STATUS), Some(5120 * 1024));
    }

    #[test]
    fn test_parse_status_falls_back_to_rss() {
        assert_eq!(parse_status("VmRSS:\t 8 kB\n"), Some(8192));
    }

    #[test]
    fn test_parse_status_missing_fields() {
        assert_eq!(parse_status("Name:\tworker\n"), None);
    }

    #[test]
    fn test_fixed_memory() {
        assert_eq!(FixedMemory(42).peak_usage(), 42);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_memory_reports_usage() {
        assert!(ProcessMemory.peak_usage() > 0);
    }
}
