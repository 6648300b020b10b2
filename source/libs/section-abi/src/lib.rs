// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]

//! CONTEXT: Shared vocabulary for file-backed section mapping conformance
//! OWNERS: @runtime
//! STATUS: Functional (host-first)
//! API_STABILITY: Stable (v1 contract)
//! TEST_COVERAGE: Host unit tests
//!
//! PUBLIC API:
//!   - SectionStatus: Discriminated rejection codes for create/map operations
//!   - AccessRights, AllocationAttributes: Request bitmasks
//!   - PageProtection, BackingKind: Protection and backing-object enums
//!
//! DEPENDENCIES:
//!   - bitflags: Rights and attribute masks
//!
//! INVARIANTS: Status codes are mutually exclusive; the factory checks them in
//! a fixed priority order so scenarios can assert one precise code per input.

use core::fmt;

/// Discriminated status codes surfaced by section creation and view mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionStatus {
    /// Backing file has zero length and no explicit maximum size was given.
    ZeroLengthBacking,
    /// Backing object is a directory, which can never back a section.
    InvalidBackingKind,
    /// Explicit maximum size exceeds the backing file's current length under
    /// a committed (fixed-extent) attribute mode.
    SizeExceedsBacking,
    /// Requested view range does not fit inside the section.
    ViewOutOfRange,
    /// Requested view protection exceeds what the section permits.
    ProtectionMismatch,
    /// The native mapping call reported success but handed back a null base
    /// address. Treated as an integrity violation, never tolerated.
    NullMappingAddress,
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthBacking => f.write_str("backing file has zero length"),
            Self::InvalidBackingKind => f.write_str("backing object is a directory"),
            Self::SizeExceedsBacking => f.write_str("maximum size exceeds backing file length"),
            Self::ViewOutOfRange => f.write_str("view range exceeds section size"),
            Self::ProtectionMismatch => f.write_str("view protection exceeds section protection"),
            Self::NullMappingAddress => f.write_str("mapping succeeded with null base address"),
        }
    }
}

bitflags::bitflags! {
    /// Access-rights mask requested when creating a section.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AccessRights: u32 {
        /// Read pages through views of the section.
        const READ = 1 << 0;
        /// Write pages through views of the section.
        const WRITE = 1 << 1;
        /// Execute pages mapped from the section.
        const EXECUTE = 1 << 2;
    }
}

impl AccessRights {
    /// Full access mask used by conformance scenarios.
    pub const ALL_ACCESS: Self = Self::all();
}

bitflags::bitflags! {
    /// Allocation attributes requested when creating a section.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AllocationAttributes: u32 {
        /// Section extent is fixed and fully committed at creation time; the
        /// declared maximum must fit inside existing backing file data.
        const COMMIT = 1 << 0;
        /// Section extent is reserved but growable; the declared maximum is
        /// not validated against the backing file length.
        const RESERVE = 1 << 1;
    }
}

/// Page protection requested for a section or a mapped view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageProtection {
    /// Pages are readable only.
    ReadOnly,
    /// Pages are readable and writable.
    ReadWrite,
}

impl PageProtection {
    /// Returns whether this protection permits writes through the mapping.
    pub const fn allows_write(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// Kind of object backing a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackingKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}
