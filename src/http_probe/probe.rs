use std::time::Instant;

use reqwest::{
    Client,
    header::{CONTENT_LENGTH, HeaderMap},
};

use super::prelude::*;
use super::report;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// The declared size of the response, if the server sent a numeric `Content-Length`.
fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(CONTENT_LENGTH)?.to_str().ok()?.trim().parse().ok()
}

async fn fetch(client: &Client, url: &str) -> Result<Option<u64>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    let content_length = declared_content_length(response.headers());

    // Drain the body so the measurement covers the full download
    response.bytes().await?;
    Ok(content_length)
}

/// Downloads `url` once and measures how long it took.
///
/// The timeout is whatever the client was built with. Any failure (bad URL,
/// DNS, connect, timeout, non-2xx status) is folded into a `Failed` result.
pub async fn probe_url(client: Client, url: &str) -> ProbeResult {
    let start = Instant::now();
    match fetch(&client, url).await {
        Ok(content_length) => {
            let elapsed = elapsed_ms(start);
            ProbeResult::success(
                ProbeKind::Network,
                url,
                elapsed,
                throughput(content_length, elapsed),
            )
        }
        Err(e) => ProbeResult::failure(ProbeKind::Network, url, elapsed_ms(start), report(&e)),
    }
}
