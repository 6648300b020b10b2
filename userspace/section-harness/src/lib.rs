// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs)]

//! CONTEXT: Scenario runner and coherency checks for mapping conformance
//! OWNERS: @runtime
//! STATUS: Functional (host-first)
//! API_STABILITY: Unstable
//! TEST_COVERAGE: Host unit tests
//!
//! PUBLIC API:
//!   - scenario::Runner: Ordered named scenarios with pass/fail/skip records
//!   - coherency: Read-only byte comparisons for mapped views
//!   - fixture: Backing file/directory creation and test payloads
//!
//! DEPENDENCIES:
//!   - section-abi, section-host: Contract vocabulary and the mapper under test
//!   - anyhow: Fixture error context
//!   - rand: Pseudo-random test payloads

pub mod coherency;
pub mod fixture;
pub mod scenario;

pub use coherency::CoherencyError;
pub use scenario::{Outcome, Runner, ScenarioRecord, Summary};
