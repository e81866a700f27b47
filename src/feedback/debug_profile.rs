//! Diagnostic snapshot embedded in feedback issues.

use std::time::Duration;

use sysinfo::System;

use crate::app_dirs;

/// Produces the opaque debug profile text attached to feedback.
///
/// Called on the UI thread only when the user opted in; it may be slow.
pub trait DebugProfileSource {
    fn make_debug_profile(&self) -> String;
}

impl<F> DebugProfileSource for F
where
    F: Fn() -> String,
{
    fn make_debug_profile(&self) -> String {
        self()
    }
}

/// Profile built from a live `sysinfo` snapshot of the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemDebugProfile;

impl DebugProfileSource for SystemDebugProfile {
    fn make_debug_profile(&self) -> String {
        DebugProfileSnapshot::capture().render()
    }
}

/// Host facts gathered for a debug profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugProfileSnapshot {
    pub app_version: String,
    pub build: &'static str,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub arch: String,
    pub uptime: Duration,
    pub cpu_brand: Option<String>,
    pub cpu_count: usize,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub process_memory_bytes: Option<u64>,
    pub logs_dir: Option<String>,
}

impl DebugProfileSnapshot {
    pub fn capture() -> Self {
        let system = System::new_all();
        let process_memory_bytes = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| system.process(pid))
            .map(|process| process.memory());
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            build: if cfg!(debug_assertions) {
                "debug"
            } else {
                "release"
            },
            os: System::long_os_version().or_else(System::name),
            kernel: System::kernel_version(),
            arch: std::env::consts::ARCH.to_string(),
            uptime: Duration::from_secs(System::uptime()),
            cpu_brand: system
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty()),
            cpu_count: system.cpus().len(),
            memory_total_bytes: system.total_memory(),
            memory_used_bytes: system.used_memory(),
            process_memory_bytes,
            logs_dir: app_dirs::logs_dir()
                .ok()
                .map(|path| path.display().to_string()),
        }
    }

    /// Render as a Markdown bullet list, one fact per line.
    pub fn render(&self) -> String {
        let unknown = || "unknown".to_string();
        let mut lines = vec![
            format!("* App version: {} ({})", self.app_version, self.build),
            format!(
                "* OS: {} ({})",
                self.os.clone().unwrap_or_else(unknown),
                self.arch
            ),
            format!("* Kernel: {}", self.kernel.clone().unwrap_or_else(unknown)),
            format!("* Uptime: {}", format_uptime(self.uptime)),
            format!(
                "* CPU: {} ({} logical cores)",
                self.cpu_brand.clone().unwrap_or_else(unknown),
                self.cpu_count
            ),
            format!(
                "* Memory: {} used / {} total",
                format_bytes(self.memory_used_bytes),
                format_bytes(self.memory_total_bytes)
            ),
        ];
        if let Some(bytes) = self.process_memory_bytes {
            lines.push(format!("* Process memory: {}", format_bytes(bytes)));
        }
        if let Some(dir) = &self.logs_dir {
            lines.push(format!("* Logs: {dir}"));
        }
        lines.join("\n")
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else {
        format!("{hours}h {minutes}m")
    }
}
