//! Bulk operations against a photo service speaking an internal
//! positional-array RPC protocol.
//!
//! The workspace splits along capability seams:
//!
//! * [`snapops_api`] — the transport trait the service is reached through,
//!   plus a scripted in-memory mock behind the `mock` feature.
//! * [`snapops_decode`] — opcode-keyed grammars turning raw positional
//!   payloads into typed entities.
//! * [`snapops_batch`] — chunked, rate-limited, failure-isolated execution
//!   and cursor-draining pagination, both cooperatively cancellable.
//! * [`snapops_config`] — chunk sizes and concurrency budgets, loaded from
//!   a config file and the environment.
//!
//! This crate ties them together into [`Operations`]: named listings and
//! bulk actions with per-chunk failure isolation.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use snapops::{CancelToken, Operations, Settings};
//! use snapops::api::PhotosApi;
//!
//! async fn trash_everything(api: Arc<dyn PhotosApi>) -> snapops::Result<()> {
//!     let ops = Operations::new(api, Settings::default(), CancelToken::new());
//!     if let Some(items) = ops.get_all_timeline_items().await?.into_complete() {
//!         ops.move_to_trash(&items).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod ops;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::ops::{Backfill, Operations, Report};

pub use snapops_api as api;
pub use snapops_batch as batch;
pub use snapops_config as config;
pub use snapops_decode as decode;

pub use snapops_batch::{CancelToken, Run};
pub use snapops_config::Settings;
