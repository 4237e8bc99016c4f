use std::time::Instant;

use super::Authenticator;
use crate::http_probe::prelude::*;
use crate::http_probe::report;

/// Times one login attempt against `authenticator`.
/// A login error becomes a `Failed` result carrying its message.
pub async fn probe_login(authenticator: &dyn Authenticator, name: &str) -> ProbeResult {
    let start = Instant::now();
    let outcome = authenticator.login().await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => ProbeResult::success(ProbeKind::System, name, elapsed_ms, 0.0),
        Err(e) => ProbeResult::failure(ProbeKind::System, name, elapsed_ms, report(&e)),
    }
}
