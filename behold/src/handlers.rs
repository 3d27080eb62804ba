use anyhow::{Context, bail};
use behold_core::catalog::Catalog;
use behold_core::config::{
    BeholdConfig, CONFIG_FILE_NAME, DEFAULT_CONFIG_DIR, default_asset_paths, default_config_path,
    expand_path, install_defaults, validate_output_path,
};
use behold_core::report::{ReportFormat, generate_text_report, render_report, save_report};
use behold_core::search::{SearchOptions, execute_search};
use behold_scanner::prober::DEFAULT_TIMEOUT_MS;
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, debug, warn};

/// Only a case-insensitive "true" turns NSFW sites on.
pub fn parse_nsfw_arg(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

pub fn parse_threads_arg(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("the number of threads must be at least 1".to_string()),
        Ok(threads) => Ok(threads),
        Err(_) => Err(format!("'{}' is not a valid number of threads", value)),
    }
}

/// Log to stderr: warnings by default, everything down to debug with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub async fn handle_search(args: &ArgMatches) -> anyhow::Result<()> {
    let username = args
        .get_one::<String>("username")
        .context("a username is required (-u/--username)")?;
    let threads = args.get_one::<usize>("threads").copied().unwrap_or(1);
    let include_nsfw = args
        .get_one::<String>("nsfw")
        .is_some_and(|v| parse_nsfw_arg(v));
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_label(f))
        .unwrap_or(ReportFormat::Csv);
    let timeout_ms = args
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    let quiet = args.get_flag("quiet");
    let output_path: Option<PathBuf> = args
        .get_one::<String>("output_filepath")
        .map(|p| expand_path(p));
    let config_path = args
        .get_one::<String>("config")
        .map(|p| expand_path(p))
        .unwrap_or_else(default_config_path);

    // Everything that can be wrong with the run is checked before the first request
    if let Some(ref path) = output_path {
        validate_output_path(path)?;
    }

    let config = BeholdConfig::load(&config_path).with_context(|| {
        format!(
            "could not load config (run `behold init` to install the defaults into {})",
            DEFAULT_CONFIG_DIR
        )
    })?;
    let decoder = config.decoder()?;
    let catalog = Catalog::load(&config, include_nsfw)?;

    if catalog.sites.is_empty() {
        bail!(
            "no usable sites in {}",
            config.sites_json_filepath.display()
        );
    }

    if !quiet {
        println!(
            "{} Searching {} sites for {} with {} worker(s)",
            "→".blue(),
            catalog.sites.len().to_string().bright_white(),
            username.bright_white().bold(),
            threads
        );
        if !catalog.skipped.is_empty() {
            println!(
                "{} Skipped {} invalid site definition(s), run with -v for details",
                "⚠".yellow(),
                catalog.skipped.len()
            );
        }
        if !catalog.nsfw_excluded.is_empty() {
            println!(
                "{} Excluded {} NSFW site(s), pass --nsfw true to include them",
                "ℹ".blue(),
                catalog.nsfw_excluded.len()
            );
        }
        println!();
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let interrupt = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after in-flight requests");
            interrupt.store(true, Ordering::Relaxed);
        }
    });

    let mut options = SearchOptions::new(username.as_str());
    options.threads = threads;
    options.timeout = Duration::from_millis(timeout_ms);
    options.show_progress_bars = !quiet;
    options.show_misses = !quiet;
    if let Some(ref user_agent) = config.user_agent {
        options.user_agent = user_agent.clone();
    }

    let report = execute_search(options, &catalog.sites, decoder, Some(cancelled), None)
        .await
        .context("search failed")?;
    debug!("Search finished with {} entries", report.len());

    println!();
    print!("{}", generate_text_report(&report));

    if let Some(ref path) = output_path {
        let content = render_report(&report, format).context("could not render report")?;
        save_report(&content, path)
            .with_context(|| format!("could not write report to {}", path.display()))?;
        println!();
        println!(
            "{} Report saved to: {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(())
}

pub fn handle_init(args: &ArgMatches) -> anyhow::Result<()> {
    let raw_dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");
    let config_dir = expand_path(raw_dir);

    print_divider();
    println!("{}", "  BEHOLD INITIALIZATION".bright_white().bold());
    print_divider();
    println!();
    println!(
        "{} Target: {}",
        "→".blue(),
        config_dir.display().to_string().bright_white()
    );
    println!();

    let existing: Vec<PathBuf> = default_asset_paths(&config_dir)
        .into_iter()
        .filter(|p| p.exists())
        .collect();

    if !existing.is_empty() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Configuration files already exist:");
        for path in &existing {
            println!(
                "  {} {}",
                "•".yellow(),
                path.display().to_string().bright_white()
            );
        }
        println!();
        println!("{}", "This operation will overwrite them.".yellow());

        let response = print_prompt("Do you want to continue? [y/N]:")?;
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    let written = install_defaults(&config_dir)?;
    for path in &written {
        println!(
            "  {} {}",
            "✓".green(),
            path.display().to_string().bright_white()
        );
    }

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!(
        "{} Try it: behold -u <USERNAME> -c {}",
        "ℹ".blue(),
        config_dir.join(CONFIG_FILE_NAME).display()
    );
    println!();

    Ok(())
}
