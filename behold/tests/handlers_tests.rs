use behold::commands::command_argument_builder;
use behold::handlers::*;
use clap::error::ErrorKind;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Argument Parsing Tests
// ============================================================================

#[test]
fn test_search_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle"])
        .unwrap();

    assert_eq!(matches.get_one::<String>("username").unwrap(), "dogle");
    assert_eq!(*matches.get_one::<usize>("threads").unwrap(), 1);
    assert_eq!(*matches.get_one::<u64>("timeout").unwrap(), 1000);
    assert_eq!(matches.get_one::<String>("format").unwrap(), "csv");
    assert_eq!(matches.get_one::<String>("nsfw").unwrap(), "false");
    assert!(matches.get_one::<String>("output_filepath").is_none());
    assert!(matches.get_one::<String>("config").is_none());
    assert!(!matches.get_flag("quiet"));
    assert!(!matches.get_flag("verbose"));
}

#[test]
fn test_search_all_options() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "behold",
            "--username",
            "dogle",
            "--nsfw",
            "TRUE",
            "-o",
            "/tmp/out.json",
            "-t",
            "8",
            "-f",
            "json",
            "-c",
            "/etc/behold/config.json",
            "--timeout",
            "2500",
            "-q",
            "-v",
        ])
        .unwrap();

    assert_eq!(*matches.get_one::<usize>("threads").unwrap(), 8);
    assert_eq!(*matches.get_one::<u64>("timeout").unwrap(), 2500);
    assert_eq!(matches.get_one::<String>("format").unwrap(), "json");
    assert_eq!(
        matches.get_one::<String>("output_filepath").unwrap(),
        "/tmp/out.json"
    );
    assert!(parse_nsfw_arg(matches.get_one::<String>("nsfw").unwrap()));
    assert!(matches.get_flag("quiet"));
    assert!(matches.get_flag("verbose"));
}

#[test]
fn test_username_is_required_for_search() {
    let err = command_argument_builder()
        .try_get_matches_from(["behold", "-t", "2"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_zero_threads_rejected() {
    let err = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-t", "0"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_non_numeric_threads_rejected() {
    let err = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-t", "many"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn test_unknown_format_rejected() {
    let err = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-f", "xml"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn test_init_does_not_need_username() {
    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "init", "/tmp/behold-config", "-f"])
        .unwrap();

    let (name, init) = matches.subcommand().unwrap();
    assert_eq!(name, "init");
    assert_eq!(init.get_one::<String>("PATH").unwrap(), "/tmp/behold-config");
    assert!(init.get_flag("force"));
}

#[test]
fn test_init_default_path() {
    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "init"])
        .unwrap();
    let init = matches.subcommand_matches("init").unwrap();
    assert_eq!(init.get_one::<String>("PATH").unwrap(), "~/.config/behold/");
    assert!(!init.get_flag("force"));
}

// ============================================================================
// Value Parser Tests
// ============================================================================

#[test]
fn test_parse_nsfw_arg() {
    assert!(parse_nsfw_arg("true"));
    assert!(parse_nsfw_arg("True"));
    assert!(parse_nsfw_arg(" TRUE "));
    assert!(!parse_nsfw_arg("false"));
    assert!(!parse_nsfw_arg("yes"));
    assert!(!parse_nsfw_arg("1"));
    assert!(!parse_nsfw_arg(""));
}

#[test]
fn test_parse_threads_arg() {
    assert_eq!(parse_threads_arg("1"), Ok(1));
    assert_eq!(parse_threads_arg("16"), Ok(16));
    assert!(parse_threads_arg("0").is_err());
    assert!(parse_threads_arg("-3").is_err());
    assert!(parse_threads_arg("1.5").is_err());
    assert!(parse_threads_arg("four").is_err());
}

// ============================================================================
// Handler Tests
// ============================================================================

#[test]
fn test_handle_init_force_installs_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("behold");
    let target_arg = target.to_string_lossy().to_string();

    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "init", target_arg.as_str(), "-f"])
        .unwrap();
    handle_init(matches.subcommand_matches("init").unwrap()).unwrap();

    for name in ["config.json", "sites.json", "sites_nsfw.json"] {
        assert!(target.join(name).exists(), "{} missing", name);
    }
}

#[tokio::test]
async fn test_handle_search_rejects_unwritable_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("missing/dir/out.csv");
    let output_arg = output.to_string_lossy().to_string();

    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-q", "-o", output_arg.as_str()])
        .unwrap();

    let err = handle_search(&matches).await.unwrap_err();
    assert!(format!("{:#}", err).contains("out.csv"));
}

#[tokio::test]
async fn test_handle_search_reports_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("nope.json");
    let config_arg = config.to_string_lossy().to_string();

    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-q", "-c", config_arg.as_str()])
        .unwrap();

    let err = handle_search(&matches).await.unwrap_err();
    assert!(format!("{:#}", err).contains("behold init"));
}

#[tokio::test]
async fn test_handle_search_requires_usable_sites() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("sites.json"), "{}").unwrap();
    fs::write(temp_dir.path().join("nsfw.json"), r#"{"data": []}"#).unwrap();
    let config = temp_dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"sites_json_filepath": "sites.json", "sites_nsfw_json_filepath": "nsfw.json"}"#,
    )
    .unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let matches = command_argument_builder()
        .try_get_matches_from(["behold", "-u", "dogle", "-q", "-c", config_arg.as_str()])
        .unwrap();

    let err = handle_search(&matches).await.unwrap_err();
    assert!(err.to_string().contains("no usable sites"));
}
