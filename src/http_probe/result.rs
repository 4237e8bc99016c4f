/// Which side of the batch a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// The login check.
    System,
    /// A URL download probe.
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Success,
    Failed,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Success => f.write_str("Success"),
            ProbeStatus::Failed => f.write_str("Failed"),
        }
    }
}

/// Outcome of a single probe attempt.
///
/// Only the constructors below build one, so `error_message` is set exactly
/// when the status is `Failed`, and a failed probe never reports throughput.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub kind: ProbeKind,
    /// Probe name for the login check, target URL for network probes.
    pub label: String,
    pub elapsed_ms: u64,
    pub status: ProbeStatus,
    pub error_message: Option<String>,
    /// Bytes per second, 0 when the response size or duration is unknown.
    pub throughput_bytes_per_sec: f64,
}

impl ProbeResult {
    pub fn success(kind: ProbeKind, label: impl Into<String>, elapsed_ms: u64, throughput: f64) -> Self {
        ProbeResult {
            kind,
            label: label.into(),
            elapsed_ms,
            status: ProbeStatus::Success,
            error_message: None,
            throughput_bytes_per_sec: throughput,
        }
    }

    pub fn failure(
        kind: ProbeKind,
        label: impl Into<String>,
        elapsed_ms: u64,
        error_message: impl Into<String>,
    ) -> Self {
        ProbeResult {
            kind,
            label: label.into(),
            elapsed_ms,
            status: ProbeStatus::Failed,
            error_message: Some(error_message.into()),
            throughput_bytes_per_sec: 0.0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// Bytes per second for `content_length` bytes received in `elapsed_ms`.
pub fn throughput(content_length: Option<u64>, elapsed_ms: u64) -> f64 {
    match content_length {
        Some(len) if len > 0 && elapsed_ms > 0 => (len as f64 / elapsed_ms as f64) * 1000.0,
        _ => 0.0,
    }
}
