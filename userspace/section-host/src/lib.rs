// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![deny(clippy::all, missing_docs)]

//! CONTEXT: Host-first section factory and view mapper
//! OWNERS: @runtime
//! STATUS: Functional (host-first)
//! API_STABILITY: Stable (v1 contract)
//! TEST_COVERAGE: Host unit tests + negative tests
//!
//! PUBLIC API:
//!   - BackingObject: Owned file/directory handle consumed by the factory
//!   - Section: Mapping object with create-time validation rules
//!   - View: Mapped address range with scoped unmap on drop
//!   - SectionError: Error types carrying precise rejection codes
//!
//! DEPENDENCIES:
//!   - section-abi: Status codes and request masks
//!   - memmap2: Shared file mappings over the host page cache
//!
//! INVARIANTS: Rejection rules run in priority order (directory, zero length,
//! size versus backing); a successful map never yields a null base address.

use std::fs::File;
use std::io;
use std::os::unix::fs::FileExt;

use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};
use thiserror::Error;

use section_abi::{
    AccessRights, AllocationAttributes, BackingKind, PageProtection, SectionStatus,
};

/// Result alias for section operations.
pub type Result<T> = core::result::Result<T, SectionError>;

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced by section creation and view mapping.
#[derive(Debug, Error)]
pub enum SectionError {
    /// The operation was rejected with a precise contract status code.
    #[error("section rejected: {0}")]
    Status(SectionStatus),
    /// Writable views are not implemented by the host mapper.
    #[error("writable views are not supported by the host mapper")]
    Unsupported,
    /// The host OS reported a failure outside the contract vocabulary.
    #[error("host i/o error: {0}")]
    Io(#[from] io::Error),
}

impl SectionError {
    /// Returns the contract status code, if the error carries one.
    pub fn status(&self) -> Option<SectionStatus> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

// ============================================================================
// Backing objects
// ============================================================================

/// Owned handle to the file or directory supplying a section's data.
///
/// The fixture layer owns opening; the factory only inspects kind and length.
/// The handle is closed on drop at scenario end regardless of outcome.
#[derive(Debug)]
pub struct BackingObject {
    file: File,
    kind: BackingKind,
}

impl BackingObject {
    /// Wraps an open regular file.
    pub fn from_file(file: File) -> Self {
        Self {
            file,
            kind: BackingKind::File,
        }
    }

    /// Wraps an open directory handle.
    pub fn from_dir(file: File) -> Self {
        Self {
            file,
            kind: BackingKind::Directory,
        }
    }

    /// Kind of the backing object.
    pub fn kind(&self) -> BackingKind {
        self.kind
    }

    /// Current byte length, queried from the live handle.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Returns whether the backing object currently has zero length.
    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Writes `buf` at `offset` through ordinary buffered file I/O.
    ///
    /// This is the mutation path whose coherency with live views the
    /// conformance scenarios assert; the mapper itself never writes.
    pub fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<()> {
        self.file.write_all_at(buf, offset)
    }

    /// Truncates or extends the backing file to exactly `len` bytes.
    pub fn set_end_of_file(&self, len: u64) -> io::Result<()> {
        self.file.set_len(len)
    }

    fn try_clone_file(&self) -> io::Result<File> {
        self.file.try_clone()
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Mapping object derived from exactly one backing file.
///
/// Owns a duplicated file handle, so the backing object may be dropped while
/// views remain live.
#[derive(Debug)]
pub struct Section {
    file: File,
    size: u64,
    protection: PageProtection,
    attributes: AllocationAttributes,
}

impl Section {
    /// Attempts to create a section over `backing`.
    ///
    /// When `max_size` is absent the section size is derived from the backing
    /// file's current length. Rejections are mutually exclusive and checked
    /// in priority order:
    ///
    /// 1. directory backing -> [`SectionStatus::InvalidBackingKind`];
    /// 2. zero-length file without explicit max size ->
    ///    [`SectionStatus::ZeroLengthBacking`];
    /// 3. max size beyond the backing length under
    ///    [`AllocationAttributes::COMMIT`] ->
    ///    [`SectionStatus::SizeExceedsBacking`].
    ///
    /// The backing object is never modified.
    pub fn create(
        access: AccessRights,
        max_size: Option<u64>,
        protection: PageProtection,
        attributes: AllocationAttributes,
        backing: &BackingObject,
    ) -> Result<Self> {
        if backing.kind() == BackingKind::Directory {
            warn!("section rejected: backing object is a directory");
            return Err(SectionError::Status(SectionStatus::InvalidBackingKind));
        }

        let backing_len = backing.len()?;
        match max_size {
            None if backing_len == 0 => {
                warn!("section rejected: zero-length backing without max size");
                return Err(SectionError::Status(SectionStatus::ZeroLengthBacking));
            }
            Some(requested)
                if requested > backing_len
                    && attributes.contains(AllocationAttributes::COMMIT) =>
            {
                warn!(
                    "section rejected: max size {requested} exceeds backing length {backing_len}"
                );
                return Err(SectionError::Status(SectionStatus::SizeExceedsBacking));
            }
            _ => {}
        }

        let size = max_size.unwrap_or(backing_len);
        let file = backing.try_clone_file()?;
        debug!("section created: size={size} access={access:?} protection={protection:?}");
        Ok(Self {
            file,
            size,
            protection,
            attributes,
        })
    }

    /// Section size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Page protection the section was created with.
    pub fn protection(&self) -> PageProtection {
        self.protection
    }

    /// Allocation attributes the section was created with.
    pub fn attributes(&self) -> AllocationAttributes {
        self.attributes
    }

    /// Maps `[offset, offset + len)` of the section into the caller's
    /// address space with the requested protection.
    ///
    /// The mapping is shared with the OS page cache, so ordinary file I/O
    /// performed after mapping is visible through the returned view without
    /// remapping.
    pub fn map_view(&self, offset: u64, len: u64, protection: PageProtection) -> Result<View> {
        let end = offset
            .checked_add(len)
            .ok_or(SectionError::Status(SectionStatus::ViewOutOfRange))?;
        if end > self.size {
            warn!("view rejected: [{offset}, {end}) exceeds section size {}", self.size);
            return Err(SectionError::Status(SectionStatus::ViewOutOfRange));
        }
        if protection.allows_write() {
            if !self.protection.allows_write() {
                warn!("view rejected: writable view over read-only section");
                return Err(SectionError::Status(SectionStatus::ProtectionMismatch));
            }
            return Err(SectionError::Unsupported);
        }
        let map_len = usize::try_from(len)
            .map_err(|_| SectionError::Status(SectionStatus::ViewOutOfRange))?;

        // SAFETY: read-only shared mapping over a file handle owned by this
        // section; the harness never requests a writable alias of the range.
        let mmap = unsafe { MmapOptions::new().offset(offset).len(map_len).map(&self.file)? };
        if mmap.as_ptr().is_null() {
            return Err(SectionError::Status(SectionStatus::NullMappingAddress));
        }
        debug!("view mapped: offset={offset} len={len} base={:p}", mmap.as_ptr());
        Ok(View { mmap })
    }
}

// ============================================================================
// Views
// ============================================================================

/// Mapped address-space range backed by a section.
///
/// Unmapped on drop, so release happens on every scenario exit path.
#[derive(Debug)]
pub struct View {
    mmap: Mmap,
}

impl View {
    /// Base address of the mapped range. Never null for a live view.
    pub fn base_addr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    /// Length of the mapped range in bytes.
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns whether the mapped range is empty.
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Mapped bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }
}

impl core::ops::Deref for View {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mmap
    }
}
