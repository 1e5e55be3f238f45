use crate::error::{Error, Result};
use metrics::{counter, describe_counter};
use std::time::Duration;
use tracing::{debug, info, warn};
use ureq::http::StatusCode;

/// How the endpoint answered a batch that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// `204 No Content`.
    Accepted,
    /// Any other non-error status. Logged, the upload carries on.
    UnexpectedStatus(u16),
}

/// Totals over a completed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub batches: usize,
    pub points: usize,
    pub bytes: usize,
    pub warnings: usize,
}

/// Progress of one batch, handed to the callback of
/// [`Batcher::upload_with_progress`].
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub lines: usize,
    pub outcome: &'a Result<BatchOutcome>,
}

/// Builder for the [`Batcher`].
#[derive(Debug, Clone)]
pub struct Builder {
    url: String,
    batch_size: usize,
    timeout: Duration,
}

impl Builder {
    /// Writes go to `url`, e.g. `http://localhost:8086/write?db=testdb`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            batch_size: 1000,
            timeout: Duration::from_secs(10),
        }
    }

    /// Maximum number of lines per request.
    ///
    /// Default is 1000.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Global timeout of a single request.
    ///
    /// Default is 10s.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Batcher> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".to_owned()));
        }

        describe_counter!("testdata_batches_total", "Batches sent to the write endpoint.");
        describe_counter!("testdata_points_total", "Lines sent to the write endpoint.");
        describe_counter!("testdata_bytes_total", "Request body bytes sent.");
        describe_counter!(
            "testdata_unexpected_status_total",
            "Batches answered with a non-204, non-error status."
        );

        Ok(Batcher {
            url: self.url,
            batch_size: self.batch_size,
            timeout: self.timeout,
        })
    }
}

/// Sequential line-protocol uploader.
///
/// Batches are sent one at a time and the first failure ends the upload.
/// Batches that were accepted before the failure stay written.
#[derive(Debug)]
pub struct Batcher {
    url: String,
    batch_size: usize,
    timeout: Duration,
}

impl Batcher {
    pub fn upload(&self, lines: &[String]) -> Result<UploadSummary> {
        self.upload_with_progress(lines, |_| {})
    }

    /// Upload `lines` in order, calling `on_batch` once per batch after the
    /// endpoint answered (or failed to).
    pub fn upload_with_progress<F>(&self, lines: &[String], mut on_batch: F) -> Result<UploadSummary>
    where
        F: FnMut(BatchProgress<'_>),
    {
        let batches = partition(lines, self.batch_size)?;
        let total = batches.len();
        let mut summary = UploadSummary::default();

        info!(url = %self.url, batches = total, points = lines.len(), "starting upload");

        for (i, batch) in batches.into_iter().enumerate() {
            let body = batch.join("\n");
            let outcome = self.write(&body);

            on_batch(BatchProgress {
                number: i + 1,
                total,
                lines: batch.len(),
                outcome: &outcome,
            });

            match outcome? {
                BatchOutcome::Accepted => {}
                BatchOutcome::UnexpectedStatus(status) => {
                    warn!("Expected 204 status, got {}", status);
                    counter!("testdata_unexpected_status_total").increment(1);
                    summary.warnings += 1;
                }
            }

            counter!("testdata_batches_total").increment(1);
            counter!("testdata_points_total").increment(batch.len() as u64);
            counter!("testdata_bytes_total").increment(body.len() as u64);

            summary.batches += 1;
            summary.points += batch.len();
            summary.bytes += body.len();
        }

        Ok(summary)
    }

    /// Send one newline-joined batch.
    fn write(&self, body: &str) -> Result<BatchOutcome> {
        debug!(bytes = body.len(), "writing batch");

        let mut response = ureq::post(&self.url)
            .config()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .content_type("text/plain")
            .header("User-Agent", "influxdb-testdata")
            .send(body.as_bytes())?;

        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            let status = status.as_u16();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|source| Error::Response { status, source })?;
            return Err(Error::Endpoint { status, body });
        }

        if status == StatusCode::NO_CONTENT {
            Ok(BatchOutcome::Accepted)
        } else {
            Ok(BatchOutcome::UnexpectedStatus(status.as_u16()))
        }
    }
}

/// Split `lines` into contiguous chunks of at most `batch_size` lines.
///
/// Only the last chunk may be shorter.
pub fn partition(lines: &[String], batch_size: usize) -> Result<Vec<&[String]>> {
    if batch_size == 0 {
        return Err(Error::Config("batch size must be at least 1".to_owned()));
    }
    Ok(lines.chunks(batch_size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("cpu value={} {}", i, i)).collect()
    }

    #[test]
    fn partition_sizes() {
        let lines = lines(2500);
        let batches = partition(&lines, 1000).unwrap();

        let sizes: Vec<_> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, [1000, 1000, 500]);
    }

    #[test]
    fn partition_is_lossless_and_ordered() {
        let lines = lines(1234);

        for batch_size in [1, 7, 100, 1234, 5000] {
            let batches = partition(&lines, batch_size).unwrap();
            assert!(batches.iter().all(|b| b.len() <= batch_size));
            assert!(batches.iter().all(|b| !b.is_empty()));
            assert_eq!(batches.concat(), lines);
        }
    }

    #[test]
    fn partition_empty_input() {
        assert!(partition(&[], 10).unwrap().is_empty());
    }

    #[test]
    fn partition_rejects_zero() {
        assert!(matches!(partition(&lines(3), 0), Err(Error::Config(_))));
    }

    #[test]
    fn builder_rejects_zero_batch_size() {
        let result = Builder::new("http://localhost:8086/write?db=testdb")
            .batch_size(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn empty_upload_sends_nothing() {
        // nothing listens here; an attempted request would fail
        let batcher = Builder::new("http://127.0.0.1:9/write?db=testdb")
            .build()
            .unwrap();

        let summary = batcher.upload(&[]).unwrap();
        assert_eq!(summary, UploadSummary::default());
    }
}
