use crate::site::SiteDescriptor;
use std::sync::Arc;

/// Outcome of probing one site for one username
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub site: Arc<SiteDescriptor>,
    pub found: bool,
    pub resolved_url: String,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub worker_id: usize,
}

impl ProbeResult {
    pub fn new(site: Arc<SiteDescriptor>, resolved_url: String, found: bool) -> Self {
        Self {
            site,
            found,
            resolved_url,
            status_code: None,
            error: None,
            worker_id: 0,
        }
    }

    pub fn with_error(site: Arc<SiteDescriptor>, resolved_url: String, error: String) -> Self {
        Self {
            site,
            found: false,
            resolved_url,
            status_code: None,
            error: Some(error),
            worker_id: 0,
        }
    }

    /// Progress marker: `+` when found, `-` otherwise
    pub fn marker(&self) -> char {
        if self.found { '+' } else { '-' }
    }
}
