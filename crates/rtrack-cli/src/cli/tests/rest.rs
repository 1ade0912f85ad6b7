//! Tests for status, completions, man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::{CommandFactory, Parser};

#[test]
fn cli_parse_status_default_days() {
    match parse(&["rtrack", "status"]) {
        CliCommand::Status { data, days } => {
            assert!(data.is_none());
            assert_eq!(days, 14);
        }
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_parse_status_days_and_data() {
    match parse(&["rtrack", "status", "--days", "30", "--data", "t.json"]) {
        CliCommand::Status { data, days } => {
            assert_eq!(days, 30);
            assert_eq!(data.as_deref(), Some(std::path::Path::new("t.json")));
        }
        _ => panic!("expected Status with --days"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["rtrack", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["rtrack", "man"]), CliCommand::Man));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["rtrack"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
