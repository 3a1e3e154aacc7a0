#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// One reading of this process, taken at the end of a run phase.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub total_time: Duration,
}

#[cfg(feature = "cli")]
struct Readings {
    system: System,
    peak_memory_mb: u64,
    phase_started: Instant,
}

/// Logs process CPU and memory between conversion phases.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    pid: Option<Pid>,
    started: Instant,
    readings: Mutex<Readings>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            let pid = sysinfo::get_current_pid().ok();
            if pid.is_none() {
                tracing::warn!("System monitoring unavailable: cannot determine current PID");
            }
            pid
        } else {
            None
        };

        let now = Instant::now();
        Self {
            pid,
            started: now,
            readings: Mutex::new(Readings {
                system: System::new(),
                peak_memory_mb: 0,
                phase_started: now,
            }),
        }
    }

    /// False when disabled or when the process could not be identified.
    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }

    /// Samples the process and starts timing the next phase.
    pub fn sample(&self) -> Option<PhaseSample> {
        let pid = self.pid?;
        let mut readings = self.readings.lock().ok()?;

        readings.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let process = readings.system.process(pid)?;
        let cpu_usage = process.cpu_usage();
        let memory_mb = process.memory() / 1024 / 1024;

        readings.peak_memory_mb = readings.peak_memory_mb.max(memory_mb);
        let now = Instant::now();
        let phase_time = now.duration_since(readings.phase_started);
        readings.phase_started = now;

        Some(PhaseSample {
            cpu_usage,
            memory_mb,
            peak_memory_mb: readings.peak_memory_mb,
            phase_time,
            total_time: now.duration_since(self.started),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "{} took {:?} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                phase,
                sample.phase_time,
                sample.cpu_usage,
                sample.memory_mb,
                sample.peak_memory_mb
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(sample) = self.sample() {
            tracing::info!(
                "Run finished in {:?}, peak memory {}MB",
                sample.total_time,
                sample.peak_memory_mb
            );
        }
    }
}

#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            tracing::warn!("System monitoring needs the `cli` feature; ignoring");
        }
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}
}
