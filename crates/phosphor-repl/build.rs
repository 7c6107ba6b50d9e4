//! Stamps the binary with its source revision and build day, shown by
//! `phosphor --version`.

use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let repo_root = manifest_dir.join("../..");

    watch_git_head(&repo_root.join(".git"));

    let revision = describe_revision(&repo_root).unwrap_or_else(|| "unknown".into());
    println!("cargo::rustc-env=PHOSPHOR_GIT_HASH={revision}");
    println!(
        "cargo::rustc-env=PHOSPHOR_BUILD_DATE={}",
        chrono::Utc::now().date_naive()
    );
}

/// Rebuild when the checked-out commit moves. Source tarballs have no `.git`.
fn watch_git_head(git_dir: &Path) {
    for watched in ["HEAD", "refs/heads"] {
        let path = git_dir.join(watched);
        if path.exists() {
            println!("cargo::rerun-if-changed={}", path.display());
        }
    }
}

/// Abbreviated commit, suffixed `-dirty` when the tree has local edits.
fn describe_revision(repo_root: &Path) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}
