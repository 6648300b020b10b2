// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Read-only comparisons between mapped bytes and expected contents.
//!
//! The two checks are deliberately distinct: an initial mismatch means the
//! mapping never reflected the file, while a stale mapping means an ordinary
//! I/O write performed after mapping failed to show through the live view.
//! All mutation is delegated to the file-I/O collaborators; nothing here
//! writes.

use thiserror::Error;

/// Coherency failures, distinguished by phase.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoherencyError {
    /// Mapped bytes differed from the written sequence at initial mapping.
    #[error("initial mapping mismatch at offset {offset}")]
    InitialMismatch {
        /// First differing byte offset.
        offset: usize,
    },
    /// Mapped range length differed from the expected sequence length.
    #[error("mapped length {actual} does not match expected length {expected}")]
    LengthMismatch {
        /// Observed mapped length.
        actual: usize,
        /// Expected sequence length.
        expected: usize,
    },
    /// A post-mapping ordinary-I/O write is not visible through the view.
    #[error("stale mapping: bytes at offset {offset} do not reflect the post-mapping write")]
    StaleMapping {
        /// File offset of the write that failed to show through.
        offset: usize,
    },
}

/// Checks that freshly mapped bytes equal the sequence written before mapping.
pub fn check_initial(mapped: &[u8], expected: &[u8]) -> Result<(), CoherencyError> {
    if mapped.len() != expected.len() {
        return Err(CoherencyError::LengthMismatch {
            actual: mapped.len(),
            expected: expected.len(),
        });
    }
    match mapped.iter().zip(expected).position(|(a, b)| a != b) {
        Some(offset) => Err(CoherencyError::InitialMismatch { offset }),
        None => Ok(()),
    }
}

/// Checks that a 4-byte little-endian value written through ordinary I/O at
/// `offset`, after the view was mapped, is visible through the same view.
pub fn check_after_write(mapped: &[u8], offset: usize, value: u32) -> Result<(), CoherencyError> {
    let expected = value.to_le_bytes();
    let end = offset
        .checked_add(expected.len())
        .ok_or(CoherencyError::StaleMapping { offset })?;
    let window = mapped
        .get(offset..end)
        .ok_or(CoherencyError::StaleMapping { offset })?;
    if window != expected {
        return Err(CoherencyError::StaleMapping { offset });
    }
    Ok(())
}
