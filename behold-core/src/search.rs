use crate::report::SearchReport;
use behold_scanner::prober::{DEFAULT_TIMEOUT_MS, DEFAULT_USER_AGENT};
use behold_scanner::{
    ProbeResult, Prober, ProgressCallback, ResultCallback, ScanError, SiteDescriptor, TextDecoder,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// Options for configuring a username search
pub struct SearchOptions {
    pub username: String,
    pub threads: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub show_progress_bars: bool,
    /// Print `[-]` lines as well as `[+]` lines
    pub show_misses: bool,
}

impl SearchOptions {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            threads: 1,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress_bars: false,
            show_misses: true,
        }
    }
}

/// Callback for lines that would be printed as results stream in
pub type SearchLineCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Format the live progress line for a result
pub fn format_result_line(result: &ProbeResult) -> String {
    let marker = format!("[{}]", result.marker());
    let marker = if result.found {
        marker.green().bold()
    } else {
        marker.red()
    };
    format!("{} {}", marker, result.resolved_url)
}

/// Show the site each worker is about to probe as the bar's message
pub fn site_progress_callback(progress_bar: Arc<ProgressBar>) -> ProgressCallback {
    Arc::new(move |worker_id: usize, site: String| {
        progress_bar.set_message(format!("worker {}: {}", worker_id, site));
    })
}

/// Run a search over `sites` and aggregate the outcome.
///
/// Lines go to `line_callback` when given, otherwise to stdout (through the
/// progress bar when one is shown).
pub async fn execute_search(
    options: SearchOptions,
    sites: &[Arc<SiteDescriptor>],
    decoder: TextDecoder,
    cancelled: Option<Arc<AtomicBool>>,
    line_callback: Option<SearchLineCallback>,
) -> Result<SearchReport, ScanError> {
    let SearchOptions {
        username,
        threads,
        timeout,
        user_agent,
        show_progress_bars,
        show_misses,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new(sites.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} sites {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(Arc::new(pb))
    } else {
        None
    };

    let pb_clone = progress_bar.clone();
    let result_callback: ResultCallback = Arc::new(move |result: &ProbeResult| {
        if result.found || show_misses {
            let line = format_result_line(result);
            match (&line_callback, &pb_clone) {
                (Some(callback), _) => callback(line),
                (None, Some(pb)) => pb.println(line),
                (None, None) => println!("{}", line),
            }
        }
        if let Some(ref pb) = pb_clone {
            pb.inc(1);
        }
    });

    let mut prober = Prober::with_settings(timeout, &user_agent)?
        .with_decoder(decoder)
        .with_result_callback(result_callback);
    if let Some(ref pb) = progress_bar {
        prober = prober.with_progress_callback(site_progress_callback(pb.clone()));
    }
    if let Some(cancelled) = cancelled {
        prober = prober.with_cancellation(cancelled);
    }

    let outcome = prober.probe(sites, &username, threads).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    Ok(SearchReport::aggregate(&username, outcome?))
}
