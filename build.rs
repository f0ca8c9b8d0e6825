//! Build script for `git-fancy`.
//!
//! Defines a `VERSION_WITH_GIT` environment variable exposing the crate
//! version augmented with the current Git revision and dirty state.

use std::{io, process::Command};

fn main() {
    define_version_with_git();
}

/// Defines a variable containing the version with the Git revision.
///
/// `VERSION_WITH_GIT` contains at least the cargo version. When the build is
/// done from a Git checkout that is not a clean worktree checked out at a tag
/// matching *exactly* the cargo version prefixed by `v`, the current Git
/// revision and dirty state are appended to the version as a tag. For
/// instance:
///
/// * Cargo version 1.0.0 on tag v1.0.0, clean state => `1.0.0`
/// * Cargo version 1.0.0 on any other commit, dirty state =>
///   `1.0.0+abcd1234-modified`
fn define_version_with_git() {
    let cargo_version = env!("CARGO_PKG_VERSION");
    let version = version_with_git(cargo_version)
        .unwrap_or_else(|_| String::from(cargo_version));

    println!("cargo:rustc-env=VERSION_WITH_GIT={version}");
}

fn version_with_git(cargo_version: &str) -> io::Result<String> {
    if git_describe()? == format!("v{cargo_version}") {
        Ok(String::from(cargo_version))
    } else {
        let revision = git_revision()?;
        if git_is_dirty()? {
            Ok(format!("{cargo_version}+{revision}-modified"))
        } else {
            Ok(format!("{cargo_version}+{revision}"))
        }
    }
}

fn git_describe() -> io::Result<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty=-modified"])
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

fn git_revision() -> io::Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

fn git_is_dirty() -> io::Result<bool> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .output()?;
    Ok(!output.stdout.is_empty())
}
