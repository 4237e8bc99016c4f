pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::probe::probe_url;
    pub use super::result::{ProbeKind, ProbeResult, ProbeStatus, throughput};
}

use std::fmt::Write;

/// Flattens an error and its sources into a single line.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
