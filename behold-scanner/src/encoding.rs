// Text decoding for response bodies

use crate::error::{ClassifyError, Result, ScanError};
use encoding_rs::Encoding;
use std::borrow::Cow;
use tracing::debug;

pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "latin-1"];

/// Ordered list of candidate encodings tried against a response body.
#[derive(Debug, Clone)]
pub struct TextDecoder {
    candidates: Vec<&'static Encoding>,
}

impl TextDecoder {
    /// Build a decoder from WHATWG encoding labels such as `utf-8` or `latin-1`.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let mut candidates = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                ScanError::InvalidInput(format!("unknown text encoding '{}'", label))
            })?;
            if !candidates.contains(&encoding) {
                candidates.push(encoding);
            }
        }

        if candidates.is_empty() {
            return Err(ScanError::InvalidInput(
                "at least one text encoding is required".to_string(),
            ));
        }

        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[&'static Encoding] {
        &self.candidates
    }

    /// Decode `body`, trying the declared charset first and then each
    /// candidate in order. The first encoding with no malformed sequences wins.
    pub fn decode<'a>(
        &self,
        body: &'a [u8],
        declared: Option<&str>,
    ) -> std::result::Result<(Cow<'a, str>, &'static Encoding), ClassifyError> {
        let declared = declared.and_then(|label| Encoding::for_label(label.trim().as_bytes()));

        for encoding in declared.into_iter().chain(self.candidates.iter().copied()) {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(body) {
                debug!("Decoded {} bytes as {}", body.len(), encoding.name());
                return Ok((text, encoding));
            }
        }

        let tried: Vec<&str> = declared
            .into_iter()
            .chain(self.candidates.iter().copied())
            .map(|e| e.name())
            .collect();
        Err(ClassifyError::Decode(tried.join(", ")))
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self {
            candidates: vec![encoding_rs::UTF_8, encoding_rs::WINDOWS_1252],
        }
    }
}

/// Pull the `charset` parameter out of a Content-Type header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}
