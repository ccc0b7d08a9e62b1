//! Tests for checksum, manifest, completions and man.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use hashfetch_core::checksum::HashAlgorithm;
use std::path::Path;

#[test]
fn cli_parse_checksum_default_sha256() {
    match parse(&["hashfetch", "checksum", "/tmp/file.iso"]) {
        CliCommand::Checksum { path, algo } => {
            assert_eq!(path, Path::new("/tmp/file.iso"));
            assert_eq!(algo, HashAlgorithm::Sha256);
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_checksum_algo() {
    match parse(&["hashfetch", "checksum", "x", "--algo", "md5"]) {
        CliCommand::Checksum { algo, .. } => assert_eq!(algo, HashAlgorithm::Md5),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_checksum_rejects_unknown_algo() {
    assert!(Cli::try_parse_from(["hashfetch", "checksum", "x", "--algo", "crc32"]).is_err());
}

#[test]
fn cli_parse_manifest_default_sha512() {
    match parse(&["hashfetch", "manifest", "Data", "manifest.json"]) {
        CliCommand::Manifest { dir, output, algo } => {
            assert_eq!(dir, Path::new("Data"));
            assert_eq!(output, Path::new("manifest.json"));
            assert_eq!(algo, HashAlgorithm::Sha512);
        }
        _ => panic!("expected Manifest"),
    }
}

#[test]
fn cli_parse_completions_and_man() {
    match parse(&["hashfetch", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(matches!(parse(&["hashfetch", "man"]), CliCommand::Man));
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
