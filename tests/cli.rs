// git-fancy - A guided Git commit assistant.
// Copyright (C) 2025 Jean-Philippe Cugnet <jean-philippe@cugnet.eu>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3 of the License.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Integration tests for the non-interactive CLI surface.
//!
//! The interactive flows are covered by the state-machine tests inside the
//! crate, driven by a scripted prompt. These tests exercise what can be
//! asserted without a terminal: store-backed listing and exporting, the
//! not-a-repository precondition, and the exit-code contract.

#![allow(clippy::pedantic, clippy::restriction)]

use assert_cmd::Command;
use assert_fs::{TempDir, prelude::*};
use eyre::Result;
use indoc::indoc;
use predicates::prelude::*;

////////////////////////////////////////////////////////////////////////////////
//                                  Helpers                                   //
////////////////////////////////////////////////////////////////////////////////

fn setup_repo() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;

    let git_init = std::process::Command::new("git")
        .args(["init", "-q"])
        .current_dir(temp_dir.path())
        .output()?;
    assert!(git_init.status.success(), "git init failed");

    Ok(temp_dir)
}

fn git_fancy(temp_dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("git-fancy")?;
    cmd.current_dir(temp_dir.path());
    Ok(cmd)
}

fn install_formats(temp_dir: &TempDir) -> Result<()> {
    temp_dir.child(".git-fancy").create_dir_all()?;
    temp_dir.child(".git-fancy/formats.json").write_str(indoc! {r#"
        {
            "mine": {
                "feat": "[feat]",
                "fix": "fix:"
            }
        }
    "#})?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                                Precondition                                //
////////////////////////////////////////////////////////////////////////////////

#[test]
fn run_outside_a_repository_fails_with_the_usage_exit_code() -> Result<()> {
    let temp_dir = TempDir::new()?;

    git_fancy(&temp_dir)?
        .arg("run")
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("not a git repository"));

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                                  Formats                                   //
////////////////////////////////////////////////////////////////////////////////

#[test]
fn format_list_reports_when_no_formats_exist() -> Result<()> {
    let temp_dir = setup_repo()?;

    git_fancy(&temp_dir)?
        .args(["format", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No formats available"));

    Ok(())
}

#[test]
fn format_list_shows_the_stored_format_names() -> Result<()> {
    let temp_dir = setup_repo()?;
    install_formats(&temp_dir)?;

    git_fancy(&temp_dir)?
        .args(["format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- mine"));

    Ok(())
}

#[test]
fn format_export_prints_the_format_as_json() -> Result<()> {
    let temp_dir = setup_repo()?;
    install_formats(&temp_dir)?;

    git_fancy(&temp_dir)?
        .args(["format", "export", "mine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"feat\": \"[feat]\""));

    Ok(())
}

#[test]
fn format_export_all_prints_every_type_and_prefix() -> Result<()> {
    let temp_dir = setup_repo()?;
    install_formats(&temp_dir)?;

    git_fancy(&temp_dir)?
        .args(["format", "export-all"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("- mine:")
                .and(predicate::str::contains("feat: [feat]"))
                .and(predicate::str::contains("fix: fix:")),
        );

    Ok(())
}

#[test]
fn format_remove_on_a_missing_name_performs_no_write() -> Result<()> {
    let temp_dir = setup_repo()?;

    git_fancy(&temp_dir)?
        .args(["format", "remove", "nope"])
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist"));

    temp_dir
        .child(".git-fancy/formats.json")
        .assert(predicate::path::missing());

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                                  Settings                                  //
////////////////////////////////////////////////////////////////////////////////

#[test]
fn settings_get_displays_the_default_record() -> Result<()> {
    let temp_dir = setup_repo()?;

    git_fancy(&temp_dir)?
        .args(["settings", "get"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Commit message style:")
                .and(predicate::str::contains("clean")),
        );

    Ok(())
}

#[test]
fn settings_get_reads_an_existing_settings_file() -> Result<()> {
    let temp_dir = setup_repo()?;
    temp_dir.child(".git-fancy").create_dir_all()?;
    temp_dir.child(".git-fancy/settings.json").write_str(indoc! {r#"
        {
            "logSettings": false,
            "triggerGitAdd": true,
            "triggerNpm": false,
            "triggerMessageFormatter": true,
            "triggerPush": true,
            "commitMessageStyle": "compact"
        }
    "#})?;

    git_fancy(&temp_dir)?
        .args(["settings", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compact"));

    Ok(())
}
