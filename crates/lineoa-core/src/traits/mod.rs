// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend seams: record storage and reply generation, both on top of
//! [`PluginAdapter`].

pub mod adapter;
pub mod responder;
pub mod storage;

pub use adapter::PluginAdapter;
pub use responder::ResponderAdapter;
pub use storage::StorageAdapter;
