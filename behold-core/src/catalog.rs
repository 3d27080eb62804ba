// Site catalog and NSFW table loading

use crate::config::BeholdConfig;
use crate::domain::extract_domain;
use crate::error::CatalogError;
use behold_scanner::{ClassificationMode, ErrorIndicator, IndicatorMeaning, SiteDescriptor, SiteError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Domain -> NSFW flag. First entry for a domain wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NsfwTable {
    domains: HashMap<String, bool>,
}

#[derive(Deserialize)]
struct NsfwEntry {
    site: Option<String>,
    nsfw: Option<bool>,
}

impl NsfwTable {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let value = read_json(path)?;
        Self::from_value(value, path)
    }

    fn from_value(value: Value, path: &Path) -> Result<Self, CatalogError> {
        let entries = match value {
            Value::Object(mut root) => match root.remove("data") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(CatalogError::Malformed {
                        path: path.to_path_buf(),
                        reason: "expected a 'data' array".to_string(),
                    });
                }
            },
            _ => {
                return Err(CatalogError::Malformed {
                    path: path.to_path_buf(),
                    reason: "expected a JSON object".to_string(),
                });
            }
        };

        let mut table = NsfwTable::default();
        for entry in entries {
            let Ok(NsfwEntry {
                site: Some(site),
                nsfw: Some(nsfw),
            }) = serde_json::from_value::<NsfwEntry>(entry)
            else {
                continue;
            };
            if let Some(domain) = extract_domain(&site) {
                table.domains.entry(domain).or_insert(nsfw);
            }
        }

        debug!("Loaded {} NSFW table entries", table.len());
        Ok(table)
    }

    pub fn insert(&mut self, domain: impl Into<String>, nsfw: bool) {
        self.domains.entry(domain.into()).or_insert(nsfw);
    }

    /// NSFW flag for the domain of `url`, if the table knows it
    pub fn lookup(&self, url: &str) -> Option<bool> {
        extract_domain(url).and_then(|domain| self.domains.get(&domain).copied())
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// One raw catalog entry, exactly as written in the sites file
#[derive(Debug, Deserialize)]
struct SiteEntry {
    main_url: Option<String>,
    user_url: Option<String>,
    error_url: Option<String>,
    error_type: Option<String>,
    error_message: Option<String>,
    error_message_means: Option<String>,
}

/// A catalog entry that was dropped, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSite {
    pub name: String,
    pub reason: String,
}

/// Everything the loader produced for one run
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub sites: Vec<Arc<SiteDescriptor>>,
    pub skipped: Vec<SkippedSite>,
    pub nsfw_excluded: Vec<String>,
}

impl Catalog {
    /// Load both catalog files named by `config`.
    pub fn load(config: &BeholdConfig, include_nsfw: bool) -> Result<Self, CatalogError> {
        let nsfw_table = NsfwTable::load(&config.sites_nsfw_json_filepath)?;
        let sites = read_json(&config.sites_json_filepath)?;
        Self::from_value(sites, &config.sites_json_filepath, &nsfw_table, include_nsfw)
    }

    /// Build descriptors from a parsed sites file. Invalid entries are
    /// recorded in `skipped`; NSFW sites are dropped unless `include_nsfw`.
    pub fn from_value(
        value: Value,
        path: &Path,
        nsfw_table: &NsfwTable,
        include_nsfw: bool,
    ) -> Result<Self, CatalogError> {
        let Value::Object(entries) = value else {
            return Err(CatalogError::Malformed {
                path: path.to_path_buf(),
                reason: "expected a JSON object keyed by site name".to_string(),
            });
        };

        let mut catalog = Catalog::default();

        for (name, raw) in entries {
            let site = serde_json::from_value::<SiteEntry>(raw)
                .map_err(|e| e.to_string())
                .and_then(|entry| build_descriptor(&name, entry, nsfw_table).map_err(|e| e.to_string()));

            match site {
                Ok(site) if site.is_nsfw() && !include_nsfw => {
                    debug!("Excluding NSFW site {}", name);
                    catalog.nsfw_excluded.push(name);
                }
                Ok(site) => catalog.sites.push(Arc::new(site)),
                Err(reason) => {
                    warn!("Skipping site '{}': {}", name, reason);
                    catalog.skipped.push(SkippedSite { name, reason });
                }
            }
        }

        info!(
            "Catalog loaded: {} sites, {} skipped, {} NSFW excluded",
            catalog.sites.len(),
            catalog.skipped.len(),
            catalog.nsfw_excluded.len()
        );
        Ok(catalog)
    }
}

fn build_descriptor(
    name: &str,
    entry: SiteEntry,
    nsfw_table: &NsfwTable,
) -> Result<SiteDescriptor, SiteError> {
    let main_url = entry.main_url.ok_or(SiteError::MissingField("main_url"))?;
    let user_url = entry.user_url.ok_or(SiteError::MissingField("user_url"))?;
    let error_type = entry.error_type.ok_or(SiteError::MissingField("error_type"))?;

    let mode = ClassificationMode::from_label(&error_type)
        .ok_or_else(|| SiteError::UnknownMode(error_type.clone()))?;

    let meaning = match entry.error_message_means {
        Some(label) => {
            IndicatorMeaning::from_label(&label).ok_or(SiteError::UnknownMeaning(label))?
        }
        None => IndicatorMeaning::default(),
    };

    let indicator = entry.error_message.map(|text| ErrorIndicator { text, meaning });
    let nsfw = nsfw_table.lookup(&main_url);

    Ok(SiteDescriptor::new(name, main_url, user_url, mode, indicator)?
        .with_error_url(entry.error_url)
        .with_nsfw(nsfw))
}

fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
