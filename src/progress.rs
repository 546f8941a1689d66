//! Bundle progress reporting.
//!
//! Reports which archive entry is being processed so users can follow a long
//! run. Progress is emitted on **stderr** so stdout stays reserved for the
//! final summary.

use std::io::Write;

/// A single progress event for a bundle run.
#[derive(Clone, Debug)]
pub enum BundleProgressEvent {
    /// Entry `n` of `total` is about to be extracted.
    Started { entry: String, n: u64, total: u64 },
    /// Entry finished; `chunks` pages were emitted.
    Finished { entry: String, chunks: u64 },
    /// Entry failed and was skipped (`--keep-going`).
    Skipped { entry: String, reason: String },
}

/// Reports bundle progress. Implementations write to stderr (human or JSON).
pub trait BundleProgressReporter {
    fn report(&self, event: BundleProgressEvent);
}

/// Human-friendly progress on stderr: "bundle  1,234 / 5,000  docs/act.pdf".
pub struct StderrProgress;

impl BundleProgressReporter for StderrProgress {
    fn report(&self, event: BundleProgressEvent) {
        let line = match &event {
            BundleProgressEvent::Started { entry, n, total } => format!(
                "bundle  {} / {}  {}\n",
                format_number(*n),
                format_number(*total),
                entry
            ),
            BundleProgressEvent::Finished { entry, chunks } => {
                format!("bundle  done  {}  ({} chunks)\n", entry, format_number(*chunks))
            }
            BundleProgressEvent::Skipped { entry, reason } => {
                format!("bundle  skipped  {}: {}\n", entry, reason)
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl BundleProgressReporter for JsonProgress {
    fn report(&self, event: BundleProgressEvent) {
        let obj = match &event {
            BundleProgressEvent::Started { entry, n, total } => serde_json::json!({
                "event": "progress",
                "phase": "started",
                "entry": entry,
                "n": n,
                "total": total
            }),
            BundleProgressEvent::Finished { entry, chunks } => serde_json::json!({
                "event": "progress",
                "phase": "finished",
                "entry": entry,
                "chunks": chunks
            }),
            BundleProgressEvent::Skipped { entry, reason } => serde_json::json!({
                "event": "progress",
                "phase": "skipped",
                "entry": entry,
                "reason": reason
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl BundleProgressReporter for NoProgress {
    fn report(&self, _event: BundleProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn BundleProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
