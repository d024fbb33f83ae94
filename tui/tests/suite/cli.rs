use clap::Parser;
use martin_tui::Cli;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn defaults_leave_everything_to_config() {
    let cli = Cli::try_parse_from(["martin"]).unwrap();
    assert_eq!(cli.config, None);
    assert_eq!(cli.log_level, None);
}

#[test]
fn config_and_log_level_overrides() {
    let cli = Cli::try_parse_from([
        "martin",
        "--config",
        "/tmp/martin.toml",
        "--log-level",
        "martin_core=debug",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/martin.toml")));
    assert_eq!(cli.log_level.as_deref(), Some("martin_core=debug"));
}

#[test]
fn unknown_flags_are_rejected() {
    assert!(Cli::try_parse_from(["martin", "--sheet", "contacts"]).is_err());
}
