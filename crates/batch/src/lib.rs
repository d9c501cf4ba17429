//! Bounded-concurrency batch execution and cursor-draining pagination.
//!
//! This crate is deliberately ignorant of the photo service: it operates on
//! whatever capability it is given. The two building blocks are
//! [`Executor::execute`] (chunked, rate-limited, failure-isolated execution)
//! and [`collect_all`] (draining a paginated listing), both cooperatively
//! cancellable through a shared [`CancelToken`].
//!
//! All concurrency here is logically concurrent I/O multiplexed by
//! suspension points within the calling task; the in-flight pool's
//! membership is only ever mutated between suspension points. A
//! reimplementation on true parallelism would need to treat that membership
//! as a critical section.

mod cancel;
mod chunk;
mod collect;
mod execute;

pub use crate::cancel::{CancelToken, Run};
pub use crate::chunk::split_into_chunks;
pub use crate::collect::collect_all;
pub use crate::execute::{ChunkOutcome, Executor, Limits};
