// Found / not-found decisions for a single probe

use crate::encoding::TextDecoder;
use crate::error::ClassifyError;
use crate::site::{ClassificationMode, IndicatorMeaning, SiteDescriptor};

/// A response that made it back from the site
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// Charset declared in the Content-Type header, if any
    pub charset: Option<String>,
}

impl ProbeResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
            charset: None,
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }
}

/// What a probe produced: a response, or a transport-level failure
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Response(ProbeResponse),
    TransportFailure(String),
}

impl ProbeOutcome {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Response(response) => Some(response.status_code),
            ProbeOutcome::TransportFailure(_) => None,
        }
    }
}

/// Decide whether `outcome` means the profile exists on `site`.
///
/// Rules, in order:
/// 1. transport failure => not found
/// 2. 404 => not found
/// 3. indicator configured => decode the body and apply the indicator's meaning
/// 4. 200 => found
/// 5. anything else => not found
pub fn classify(
    site: &SiteDescriptor,
    outcome: &ProbeOutcome,
    decoder: &TextDecoder,
) -> Result<bool, ClassifyError> {
    let response = match outcome {
        ProbeOutcome::Response(response) => response,
        ProbeOutcome::TransportFailure(_) => return Ok(false),
    };

    if response.status_code == 404 {
        return Ok(false);
    }

    let indicator = match (&site.error_indicator, site.mode) {
        (Some(indicator), _) => Some(indicator),
        // Message mode without an indicator never passes validation
        (None, ClassificationMode::Message) => return Ok(false),
        (None, ClassificationMode::StatusCode) => None,
    };

    if let Some(indicator) = indicator {
        let (body, _) = decoder.decode(&response.body, response.charset.as_deref())?;
        let seen = body.contains(indicator.text.as_str());

        match indicator.meaning {
            IndicatorMeaning::Absent if seen => return Ok(false),
            IndicatorMeaning::Absent => {}
            IndicatorMeaning::Present => return Ok(seen && response.status_code == 200),
        }
    }

    Ok(response.status_code == 200)
}
