// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for LineOA integration tests.
//!
//! - [`MockResponder`]: scripted AI responder that records its calls
//! - [`TestHarness`]: store, bus, responder and pipeline wired together
//! - [`SlowStorage`]: backend wrapper with delayed reads

pub mod harness;
pub mod mock_responder;
pub mod slow_storage;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_responder::MockResponder;
pub use slow_storage::SlowStorage;
