// Aggregated search results and their serializations

use behold_scanner::ProbeResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// One row of the report: the site's descriptor fields plus the outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub main_url: String,
    pub user_url: String,
    pub error_url: Option<String>,
    pub error_type: String,
    pub nsfw: Option<bool>,
    pub users_found: bool,
    pub error_message: Option<String>,
    pub error_message_means: Option<String>,
    pub profile_url: String,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl From<ProbeResult> for ReportEntry {
    fn from(result: ProbeResult) -> Self {
        let site = &result.site;
        Self {
            name: site.name.clone(),
            main_url: site.main_url.clone(),
            user_url: site.profile_url_template.clone(),
            error_url: site.error_url.clone(),
            error_type: site.mode.as_str().to_string(),
            nsfw: site.nsfw,
            users_found: result.found,
            error_message: site.error_indicator.as_ref().map(|i| i.text.clone()),
            error_message_means: site
                .error_indicator
                .as_ref()
                .map(|i| i.meaning.as_str().to_string()),
            profile_url: result.resolved_url,
            status_code: result.status_code,
            error: result.error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub username: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

impl SearchReport {
    /// Drain results into a report. Entries keep the order they arrive in.
    pub fn aggregate(username: &str, results: impl IntoIterator<Item = ProbeResult>) -> Self {
        Self {
            username: username.to_string(),
            generated_at: Utc::now(),
            entries: results.into_iter().map(ReportEntry::from).collect(),
        }
    }

    pub fn found(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.users_found)
    }

    pub fn found_count(&self) -> usize {
        self.found().count()
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn render_report(report: &SearchReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Csv => Ok(generate_csv_report(report)),
    }
}

pub fn generate_text_report(report: &SearchReport) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Username: {}\n", report.username));
    out.push_str(&format!("  Sites checked: {}\n", report.len()));
    out.push_str(&format!("  Profiles found: {}\n", report.found_count()));
    out.push_str(&format!("  Sites with errors: {}\n", report.error_count()));
    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut found: Vec<&ReportEntry> = report.found().collect();
    found.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if found.is_empty() {
        out.push_str("No profiles found.\n");
    } else {
        out.push_str("## Found\n");
        for entry in found {
            out.push_str(&format!("  [+] {}: {}\n", entry.name, entry.profile_url));
        }
    }

    let errors: Vec<&ReportEntry> = report.entries.iter().filter(|e| e.error.is_some()).collect();
    if !errors.is_empty() {
        out.push_str("\n## Errors\n");
        for entry in errors {
            if let Some(ref error) = entry.error {
                out.push_str(&format!("  [!] {}: {}\n", entry.name, error));
            }
        }
    }

    out
}

pub const CSV_HEADER: &[&str] = &[
    "name",
    "main_url",
    "user_url",
    "error_url",
    "error_type",
    "nsfw",
    "users_found",
    "error_message",
    "error_message_means",
    "profile_url",
    "status_code",
    "error",
];

/// One row per site, header first. Missing values are empty cells.
pub fn generate_csv_report(report: &SearchReport) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");

    for entry in &report.entries {
        let status = entry.status_code.map(|s| s.to_string()).unwrap_or_default();
        let cells = [
            csv_field(&entry.name),
            csv_field(&entry.main_url),
            csv_field(&entry.user_url),
            csv_field(entry.error_url.as_deref().unwrap_or("")),
            csv_field(&entry.error_type),
            Cow::Borrowed(match entry.nsfw {
                Some(true) => "true",
                Some(false) => "false",
                None => "",
            }),
            Cow::Borrowed(if entry.users_found { "true" } else { "false" }),
            csv_field(entry.error_message.as_deref().unwrap_or("")),
            csv_field(entry.error_message_means.as_deref().unwrap_or("")),
            csv_field(&entry.profile_url),
            Cow::Owned(status),
            csv_field(entry.error.as_deref().unwrap_or("")),
        ];
        out.push_str(&cells.join(","));
        out.push_str("\r\n");
    }

    out
}

/// Quote a cell when it holds a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn generate_json_report(report: &SearchReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Behold",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": report.generated_at.to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "username": report.username,
                "sites_checked": report.len(),
                "profiles_found": report.found_count(),
                "errors": report.error_count()
            },
            "results": report.entries
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
