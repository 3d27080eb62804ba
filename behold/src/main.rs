use behold::commands::command_argument_builder;
use behold::handlers::{handle_init, handle_search, init_tracing};
use behold_core::print_banner;
use clap::error::ErrorKind;
use colored::Colorize;

#[tokio::main]
async fn main() {
    let matches = match command_argument_builder().try_get_matches() {
        Ok(matches) => matches,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            let rendered = e.render().to_string();
            eprintln!(
                "{} {}",
                "✗".red().bold(),
                rendered.trim_start_matches("error: ").trim_end()
            );
            std::process::exit(1);
        }
    };

    init_tracing(matches.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !matches.get_flag("quiet") {
        print_banner();
    }

    let outcome = match matches.subcommand() {
        Some(("init", init_matches)) => handle_init(init_matches),
        Some(_) => unreachable!("clap should ensure we don't get here"),
        None => handle_search(&matches).await,
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
