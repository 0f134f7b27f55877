//! Resident memory of the current process.

use sysinfo::{Pid, System};

const MB: f64 = 1024.0 * 1024.0;

/// Reads this process's resident set size. Probes are cheap to create;
/// each worker keeps its own.
#[derive(Debug)]
pub struct MemoryProbe {
    system: System,
    pid: Option<Pid>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Resident memory in MB, or 0 when the platform cannot report it.
    pub fn resident_mb(&mut self) -> f64 {
        let Some(pid) = self.pid else {
            return 0.0;
        };
        if !self.system.refresh_process(pid) {
            return 0.0;
        }
        self.system
            .process(pid)
            .map_or(0.0, |p| p.memory() as f64 / MB)
    }
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}
