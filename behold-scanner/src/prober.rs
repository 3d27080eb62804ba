use crate::classifier::{ProbeOutcome, ProbeResponse, classify};
use crate::encoding::{TextDecoder, charset_from_content_type};
use crate::error::{Result, ScanError};
use crate::result::ProbeResult;
use crate::site::SiteDescriptor;
use futures::future::join_all;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Called with (worker_id, site name) right before a site is probed
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
/// Called with every result as soon as its worker produces it
pub type ResultCallback = Arc<dyn Fn(&ProbeResult) + Send + Sync>;

/// Split `len` items into exactly `groups` contiguous ranges.
///
/// Every range but the last holds `len / groups` items; the last one absorbs
/// the remainder. Ranges never overlap and together cover `0..len`.
pub fn partition(len: usize, groups: usize) -> Vec<Range<usize>> {
    if groups == 0 {
        return Vec::new();
    }

    let size = len / groups;
    (0..groups)
        .map(|i| {
            let start = i * size;
            let end = if i + 1 == groups { len } else { start + size };
            start..end
        })
        .collect()
}

pub struct Prober {
    client: Client,
    decoder: Arc<TextDecoder>,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
    cancelled: Arc<AtomicBool>,
}

impl Prober {
    pub fn new() -> Result<Self> {
        Self::with_settings(Duration::from_millis(DEFAULT_TIMEOUT_MS), DEFAULT_USER_AGENT)
    }

    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(10)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            decoder: Arc::new(TextDecoder::default()),
            progress_callback: None,
            result_callback: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_decoder(mut self, decoder: TextDecoder) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    /// Share a cancellation flag; workers stop before their next site once it is set.
    pub fn with_cancellation(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn cancellation(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Probe every site for `username` using `concurrency` workers.
    ///
    /// Returns once all workers have finished, in the order results were
    /// drained from the collector.
    pub async fn probe(
        &self,
        sites: &[Arc<SiteDescriptor>],
        username: &str,
        concurrency: usize,
    ) -> Result<Vec<ProbeResult>> {
        if username.trim().is_empty() {
            return Err(ScanError::InvalidInput("username must not be empty".to_string()));
        }
        if concurrency == 0 {
            return Err(ScanError::InvalidInput(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if sites.is_empty() {
            return Ok(Vec::new());
        }

        let workers = concurrency.min(sites.len());
        info!(
            "Probing {} sites for '{}' with {} workers",
            sites.len(),
            username,
            workers
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult>();
        let mut worker_handles = Vec::with_capacity(workers);

        for (worker_id, range) in partition(sites.len(), workers).into_iter().enumerate() {
            let group: Vec<Arc<SiteDescriptor>> = sites[range].to_vec();
            let client = self.client.clone();
            let decoder = self.decoder.clone();
            let username = username.to_string();
            let tx = tx.clone();
            let progress_cb = self.progress_callback.clone();
            let result_cb = self.result_callback.clone();
            let cancelled = self.cancelled.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started with {} sites", worker_id, group.len());

                for site in group {
                    if cancelled.load(Ordering::Relaxed) {
                        debug!("Worker {} cancelled", worker_id);
                        break;
                    }

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, site.name.clone());
                    }

                    let mut result = Self::probe_site(&client, &decoder, site, &username).await;
                    result.worker_id = worker_id;

                    if let Some(ref callback) = result_cb {
                        callback(&result);
                    }

                    if tx.send(result).is_err() {
                        warn!("Worker {}: result collector closed", worker_id);
                        break;
                    }
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }

        // Only worker clones remain, so the channel closes once they all finish
        drop(tx);

        for outcome in join_all(worker_handles).await {
            outcome?;
        }

        let mut results = Vec::with_capacity(sites.len());
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        info!(
            "Probe complete. {} of {} sites report '{}'",
            results.iter().filter(|r| r.found).count(),
            results.len(),
            username
        );
        Ok(results)
    }

    /// Probe a single site. Per-site failures end up inside the result.
    async fn probe_site(
        client: &Client,
        decoder: &TextDecoder,
        site: Arc<SiteDescriptor>,
        username: &str,
    ) -> ProbeResult {
        let url = match site.profile_url(username) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping {}: {}", site.name, e);
                let template = site.profile_url_template.clone();
                return ProbeResult::with_error(site, template, e.to_string());
            }
        };

        let outcome = Self::fetch(client, &url).await;

        let mut result = match classify(&site, &outcome, decoder) {
            Ok(found) => ProbeResult::new(site, url, found),
            Err(e) => {
                warn!("Could not classify {}: {}", url, e);
                ProbeResult::with_error(site, url, e.to_string())
            }
        };
        result.status_code = outcome.status_code();

        if let ProbeOutcome::TransportFailure(reason) = outcome {
            debug!("Request to {} failed: {}", result.resolved_url, reason);
            result.error = Some(reason);
        }

        result
    }

    async fn fetch(client: &Client, url: &str) -> ProbeOutcome {
        debug!("Fetching {}", url);

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::TransportFailure(e.to_string()),
        };

        let status_code = response.status().as_u16();
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type)
            .map(String::from);

        match response.bytes().await {
            Ok(body) => ProbeOutcome::Response(ProbeResponse {
                status_code,
                body: body.to_vec(),
                charset,
            }),
            Err(e) => ProbeOutcome::TransportFailure(e.to_string()),
        }
    }
}
