use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;

use crate::http_probe::prelude::*;
use crate::login::Authenticator;
use crate::login::probe::probe_login;

/// Runs one batch: the login check plus one download per target, all at once.
pub struct Runner {
    client: Client,
    authenticator: Arc<dyn Authenticator>,
    login_name: String,
    targets: Vec<String>,
}

impl Runner {
    pub fn new(
        client: Client,
        authenticator: Arc<dyn Authenticator>,
        login_name: impl Into<String>,
        targets: Vec<String>,
    ) -> Self {
        Runner {
            client,
            authenticator,
            login_name: login_name.into(),
            targets,
        }
    }

    /// Starts every probe without waiting on the others, then waits for all of them.
    /// Returns the login result first, followed by the URL results in target order.
    pub async fn run(&self) -> Vec<ProbeResult> {
        let start = Instant::now();
        let mut handles = Vec::with_capacity(self.targets.len() + 1);

        let authenticator = self.authenticator.clone();
        let login_name = self.login_name.clone();
        let handle = tokio::spawn(async move { probe_login(authenticator.as_ref(), &login_name).await });
        handles.push((ProbeKind::System, self.login_name.clone(), handle));

        for url in &self.targets {
            let client = self.client.clone();
            let target = url.clone();
            let handle = tokio::spawn(async move { probe_url(client, &target).await });
            handles.push((ProbeKind::Network, url.clone(), handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (kind, label, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Probe task for {label} did not complete: {e}");
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    ProbeResult::failure(kind, label, elapsed_ms, format!("probe task failed: {e}"))
                }
            };
            log_result(&result);
            results.push(result);
        }

        log::info!(
            "Batch of {} probes finished in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        results
    }
}

fn log_result(result: &ProbeResult) {
    if result.is_success() {
        log::debug!(
            "✅ {} in {}ms ({:.2} B/s)",
            result.label,
            result.elapsed_ms,
            result.throughput_bytes_per_sec
        );
    } else {
        log::warn!(
            "❌ {} failed after {}ms: {}",
            result.label,
            result.elapsed_ms,
            result.error_message.as_deref().unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::http_probe::probe::test_server::{ok_with_body, serve_once};
    use crate::login::AuthError;
    use crate::login::probe::fakes::{AcceptingLogin, RejectingLogin};

    struct PanickingLogin;

    #[async_trait]
    impl Authenticator for PanickingLogin {
        async fn login(&self) -> Result<(), AuthError> {
            panic!("authenticator exploded");
        }
    }

    fn client() -> Client {
        Client::builder()
            .timeout(Duration::from_millis(2000))
            .no_proxy()
            .build()
            .expect("Failed to create client")
    }

    #[tokio::test]
    async fn test_run_collects_every_probe_in_order() {
        let first = serve_once(ok_with_body(&"a".repeat(2048))).await;
        let second = serve_once(ok_with_body("b")).await;
        let targets = vec![first.clone(), "tu.netlogo.org".to_string(), second.clone()];
        let runner = Runner::new(
            client(),
            Arc::new(RejectingLogin("invalid credentials")),
            "P1 (Login)",
            targets,
        );

        let results = runner.run().await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].kind, ProbeKind::System);
        assert_eq!(results[0].status, ProbeStatus::Failed);
        assert_eq!(results[0].error_message.as_deref(), Some("invalid credentials"));

        let labels: Vec<&str> = results[1..].iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec![first.as_str(), "tu.netlogo.org", second.as_str()]);
        assert!(results[1..].iter().all(|r| r.kind == ProbeKind::Network));
        assert_eq!(results[1].status, ProbeStatus::Success);
        assert_eq!(results[2].status, ProbeStatus::Failed);
        assert_eq!(results[3].status, ProbeStatus::Success);

        for result in &results {
            assert_eq!(result.error_message.is_some(), result.status == ProbeStatus::Failed);
        }
    }

    #[tokio::test]
    async fn test_run_without_targets_only_logs_in() {
        let auth = AcceptingLogin {
            delay: Duration::from_millis(5),
        };
        let runner = Runner::new(client(), Arc::new(auth), "P1 (Login)", vec![]);

        let results = runner.run().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ProbeKind::System);
        assert_eq!(results[0].status, ProbeStatus::Success);
    }

    #[tokio::test]
    async fn test_panicking_probe_becomes_failed_result() {
        let runner = Runner::new(
            client(),
            Arc::new(PanickingLogin),
            "P1 (Login)",
            vec!["tu.netlogo.org".to_string()],
        );

        let results = runner.run().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, ProbeKind::System);
        assert_eq!(results[0].label, "P1 (Login)");
        assert_eq!(results[0].status, ProbeStatus::Failed);
        assert!(results[0].error_message.as_ref().unwrap().starts_with("probe task failed"));
        assert_eq!(results[1].kind, ProbeKind::Network);
    }
}
