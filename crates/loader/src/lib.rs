//! Resource pools + async asset loading.
//! L1: handle-addressed pools with FIFO slot reuse.
//! L2: background decode on a worker pool, install on the owning thread.
//!
//! The rule the whole crate is built around: decoding is cheap to
//! parallelize, GPU objects are not. Workers decode in parallel and hand
//! results to a [`CompletionQueue`]; the one thread that owns the graphics
//! context drains it each tick via [`AssetLoader::pump`], constructs the
//! GPU-resident objects through its [`RenderBackend`], and files them into
//! [`ResourcePool`]s where they stay addressable by [`Handle`] or name.
//! Batch callbacks fire through [`BatchReport`] once every item of a
//! request, successes and failures alike, has been accounted for.

pub mod backend;
pub mod barrier;
pub mod error;
pub mod facade;
pub mod handle;
pub mod pool;
pub mod queue;
pub mod request;
pub mod workers;

pub use backend::{HeadlessBackend, RenderBackend};
pub use barrier::{BatchId, BatchReport, LoadOutcome};
pub use error::{ConstructError, DecodeError, LoadError};
pub use facade::AssetLoader;
pub use handle::Handle;
pub use pool::ResourcePool;
pub use queue::{Completion, CompletionQueue};
pub use request::{AssetKind, AssetSpec, DecodedAsset};
pub use workers::{InlineWorkers, WorkerPool};
