use crate::error::SiteError;
use serde::{Deserialize, Serialize};

/// Placeholder the username is substituted into.
pub const USERNAME_SLOT: &str = "{}";

/// How a site signals that a profile is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// The body is searched for the site's indicator text
    Message,
    /// The status code decides; an indicator is checked only if configured
    StatusCode,
}

impl ClassificationMode {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "message" => Some(ClassificationMode::Message),
            "status_code" | "status-code" => Some(ClassificationMode::StatusCode),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationMode::Message => "message",
            ClassificationMode::StatusCode => "status_code",
        }
    }
}

/// What it means when the indicator text shows up in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMeaning {
    /// Indicator present => the profile does not exist
    #[default]
    Absent,
    /// Indicator present => the profile exists
    Present,
}

impl IndicatorMeaning {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "absent" => Some(IndicatorMeaning::Absent),
            "present" => Some(IndicatorMeaning::Present),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorMeaning::Absent => "absent",
            IndicatorMeaning::Present => "present",
        }
    }
}

/// Text searched for in a response body, with its explicit meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorIndicator {
    pub text: String,
    pub meaning: IndicatorMeaning,
}

impl ErrorIndicator {
    pub fn absent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meaning: IndicatorMeaning::Absent,
        }
    }

    pub fn present(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meaning: IndicatorMeaning::Present,
        }
    }
}

/// Static description of how to probe one website for a username.
///
/// Built through [`SiteDescriptor::new`], which enforces the template and
/// indicator rules. Fields stay public for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub main_url: String,
    pub profile_url_template: String,
    pub error_url: Option<String>,
    pub error_indicator: Option<ErrorIndicator>,
    pub mode: ClassificationMode,
    pub nsfw: Option<bool>,
}

impl SiteDescriptor {
    pub fn new(
        name: impl Into<String>,
        main_url: impl Into<String>,
        profile_url_template: impl Into<String>,
        mode: ClassificationMode,
        error_indicator: Option<ErrorIndicator>,
    ) -> Result<Self, SiteError> {
        let name = name.into();
        let main_url = main_url.into();
        let profile_url_template = profile_url_template.into();

        if name.trim().is_empty() {
            return Err(SiteError::MissingField("name"));
        }
        if main_url.trim().is_empty() {
            return Err(SiteError::MissingField("main_url"));
        }
        validate_template(&profile_url_template)?;

        let site = Self {
            name,
            main_url,
            profile_url_template,
            error_url: None,
            error_indicator: error_indicator.filter(|i| !i.text.is_empty()),
            mode,
            nsfw: None,
        };
        site.check_indicator()?;
        Ok(site)
    }

    pub fn with_error_url(mut self, error_url: Option<String>) -> Self {
        self.error_url = error_url;
        self
    }

    pub fn with_nsfw(mut self, nsfw: Option<bool>) -> Self {
        self.nsfw = nsfw;
        self
    }

    fn check_indicator(&self) -> Result<(), SiteError> {
        if self.mode == ClassificationMode::Message && self.error_indicator.is_none() {
            return Err(SiteError::MissingIndicator);
        }
        Ok(())
    }

    /// Build the profile URL for `username`.
    pub fn profile_url(&self, username: &str) -> Result<String, SiteError> {
        validate_template(&self.profile_url_template)?;
        Ok(self.profile_url_template.replacen(USERNAME_SLOT, username, 1))
    }

    pub fn is_nsfw(&self) -> bool {
        self.nsfw.unwrap_or(false)
    }
}

/// A template is well formed when it has exactly one username slot.
pub fn validate_template(template: &str) -> Result<(), SiteError> {
    if template.trim().is_empty() {
        return Err(SiteError::MissingField("user_url"));
    }
    let slots = template.matches(USERNAME_SLOT).count();
    if slots != 1 {
        return Err(SiteError::BadTemplate {
            template: template.to_string(),
            slots,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_substitution() {
        let site = SiteDescriptor::new(
            "GitHub",
            "https://www.github.com/",
            "https://github.com/{}",
            ClassificationMode::StatusCode,
            None,
        )
        .unwrap();
        assert_eq!(site.profile_url("dogle").unwrap(), "https://github.com/dogle");
    }

    #[test]
    fn test_template_without_slot_is_rejected() {
        let result = SiteDescriptor::new(
            "Broken",
            "https://broken.example",
            "https://broken.example/users",
            ClassificationMode::StatusCode,
            None,
        );
        assert_eq!(
            result.unwrap_err(),
            SiteError::BadTemplate {
                template: "https://broken.example/users".to_string(),
                slots: 0
            }
        );
    }

    #[test]
    fn test_template_with_two_slots_is_rejected() {
        let err = validate_template("https://{}.example.com/{}").unwrap_err();
        assert!(matches!(err, SiteError::BadTemplate { slots: 2, .. }));
    }

    #[test]
    fn test_message_mode_requires_indicator() {
        let result = SiteDescriptor::new(
            "NoIndicator",
            "https://example.com",
            "https://example.com/{}",
            ClassificationMode::Message,
            None,
        );
        assert_eq!(result.unwrap_err(), SiteError::MissingIndicator);
    }

    #[test]
    fn test_empty_indicator_counts_as_unset() {
        let site = SiteDescriptor::new(
            "Empty",
            "https://example.com",
            "https://example.com/{}",
            ClassificationMode::StatusCode,
            Some(ErrorIndicator::absent("")),
        )
        .unwrap();
        assert!(site.error_indicator.is_none());

        let result = SiteDescriptor::new(
            "EmptyMessage",
            "https://example.com",
            "https://example.com/{}",
            ClassificationMode::Message,
            Some(ErrorIndicator::present("")),
        );
        assert_eq!(result.unwrap_err(), SiteError::MissingIndicator);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(
            ClassificationMode::from_label("Status_Code"),
            Some(ClassificationMode::StatusCode)
        );
        assert_eq!(
            ClassificationMode::from_label("message"),
            Some(ClassificationMode::Message)
        );
        assert_eq!(ClassificationMode::from_label("response_url"), None);
        assert_eq!(IndicatorMeaning::from_label("PRESENT"), Some(IndicatorMeaning::Present));
        assert_eq!(IndicatorMeaning::default(), IndicatorMeaning::Absent);
    }
}
