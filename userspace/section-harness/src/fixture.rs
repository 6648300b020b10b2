// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backing-object fixtures consumed by the conformance scenarios.
//!
//! Fixture errors abort only the current scenario; the runner records them
//! and skips dependents. Creation uses the create-new disposition, so a
//! leftover path from a prior run is a fixture error rather than silent
//! reuse.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;

use section_host::BackingObject;

/// Creates a fresh regular file under `dir` and wraps it as a backing object.
pub fn create_backing_file(dir: &Path, name: &str) -> Result<BackingObject> {
    let path = dir.join(name);
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("create backing file {}", path.display()))?;
    Ok(BackingObject::from_file(file))
}

/// Creates a fresh directory under `dir` and wraps it as a backing object.
pub fn create_backing_dir(dir: &Path, name: &str) -> Result<BackingObject> {
    let path = dir.join(name);
    fs::create_dir(&path)
        .with_context(|| format!("create backing directory {}", path.display()))?;
    let handle =
        File::open(&path).with_context(|| format!("open backing directory {}", path.display()))?;
    Ok(BackingObject::from_dir(handle))
}

/// Generates `len` pseudo-random payload bytes.
pub fn random_data(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen()).collect()
}
