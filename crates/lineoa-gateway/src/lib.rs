// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP console API.
//!
//! A thin JSON layer over the console views. Pipeline invocations started
//! here run on the server's task tracker, so a client hanging up never
//! cancels a turn and shutdown can drain them.

pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;

pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, ServerConfig, router, start_server};
