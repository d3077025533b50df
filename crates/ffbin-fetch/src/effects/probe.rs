use std::time::Instant;

use futures_util::StreamExt;
use tracing::debug;

use crate::core::{format_speed, throughput};
use crate::data::{ProbeOptions, ProbeResult, Source};
use crate::effects::http::HttpClient;

/// Measure how fast `source` serves the reference file.
///
/// The whole body is read so that throttling applied after the first bytes
/// is reflected in the figure. Never fails: a non-2xx status, a transport
/// error or the deadline passing all yield a zero-throughput result.
pub async fn probe<C: HttpClient>(client: &C, source: &Source, options: &ProbeOptions) -> ProbeResult {
    let url = source.probe_url();
    let started = Instant::now();

    let outcome = tokio::time::timeout(options.timeout, read_body(client, &url, &options.headers)).await;

    let result = match outcome {
        Ok(Ok(bytes)) => ProbeResult {
            source: source.clone(),
            throughput_bps: throughput(bytes, started.elapsed()),
            succeeded: true,
        },
        Ok(Err(reason)) => {
            debug!(source = %source.name, %url, %reason, "probe failed");
            ProbeResult::failed(source.clone())
        }
        Err(_) => {
            debug!(source = %source.name, %url, timeout = ?options.timeout, "probe timed out");
            ProbeResult::failed(source.clone())
        }
    };

    debug!(
        source = %source.name,
        succeeded = result.succeeded,
        speed = %format_speed(result.throughput_bps),
        "probe finished"
    );
    result
}

async fn read_body<C: HttpClient>(
    client: &C,
    url: &str,
    headers: &[(String, String)],
) -> Result<u64, String> {
    let response = client.stream(url, headers).await.map_err(|e| e.to_string())?;
    if !response.is_success() {
        return Err(format!("HTTP {}", response.status));
    }

    let mut body = response.body;
    let mut received = 0u64;
    while let Some(chunk) = body.next().await {
        received += chunk.map_err(|e| e.to_string())?.len() as u64;
    }
    Ok(received)
}
