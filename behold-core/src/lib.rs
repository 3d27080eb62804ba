pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod search;

use colored::Colorize;

pub use catalog::{Catalog, NsfwTable, SkippedSite};
pub use config::BeholdConfig;
pub use error::{CatalogError, ConfigError};
pub use report::{ReportFormat, SearchReport};
pub use search::{SearchOptions, execute_search};

const BANNER: &str = r#"
  _          _           _     _
 | |__   ___| |__   ___ | | __| |
 | '_ \ / _ \ '_ \ / _ \| |/ _` |
 | |_) |  __/ | | | (_) | | (_| |
 |_.__/ \___|_| |_|\___/|_|\__,_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "find a username across the web".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
