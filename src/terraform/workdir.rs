//! Per-run copies of a Terraform directory.
//!
//! Every run applies from its own copy so concurrent runs never share a
//! `.terraform` directory, lock file or local state.

use std::path::Path;

use tempfile::TempDir;

use crate::error::{Error, Result};

/// Copies `src` into a fresh temp directory.
///
/// Skips `.terraform`, local state files and other hidden entries, except
/// the provider lock file.
pub fn copy_to_temp(src: &Path) -> Result<TempDir> {
    let dest = tempfile::Builder::new()
        .prefix("pipeline-smoke-")
        .tempdir()
        .map_err(Error::Io)?;

    copy_dir(src, dest.path())?;

    tracing::debug!(from = ?src, to = ?dest.path(), "copied terraform directory");

    Ok(dest)
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if is_skipped(&name) {
            continue;
        }

        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir(&target)?;
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn is_skipped(name: &str) -> bool {
    if name == ".terraform.lock.hcl" {
        return false;
    }
    name.starts_with('.') || name.starts_with("terraform.tfstate")
}
