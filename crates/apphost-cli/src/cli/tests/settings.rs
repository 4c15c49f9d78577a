//! Tests for the settings subcommands.

use super::parse;
use crate::cli::{CliCommand, SettingsCommand};

fn settings(args: &[&str]) -> SettingsCommand {
    let mut full = vec!["apphost", "settings"];
    full.extend_from_slice(args);
    match parse(&full) {
        CliCommand::Settings { command } => command,
        _ => panic!("expected Settings"),
    }
}

#[test]
fn cli_parse_settings_list() {
    assert!(matches!(settings(&["list"]), SettingsCommand::List));
}

#[test]
fn cli_parse_settings_get_set() {
    match settings(&["get", "log.level"]) {
        SettingsCommand::Get { key } => assert_eq!(key, "log.level"),
        _ => panic!("expected Get"),
    }
    match settings(&["set", "install.timeout_secs", "30"]) {
        SettingsCommand::Set { key, value } => {
            assert_eq!(key, "install.timeout_secs");
            assert_eq!(value, "30");
        }
        _ => panic!("expected Set"),
    }
}

#[test]
fn cli_parse_settings_default() {
    match settings(&["default", "install.keep_failed"]) {
        SettingsCommand::Default { key } => assert_eq!(key, "install.keep_failed"),
        _ => panic!("expected Default"),
    }
}

#[test]
fn cli_parse_settings_reset() {
    assert!(matches!(
        settings(&["reset"]),
        SettingsCommand::Reset { yes: false }
    ));
    assert!(matches!(
        settings(&["reset", "--yes"]),
        SettingsCommand::Reset { yes: true }
    ));
}
