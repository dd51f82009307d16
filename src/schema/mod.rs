//! External schema data: collaborator interface, per-call snapshot and a
//! prefix-keyed cache.
//!
//! - `info`      : column, source and policy records.
//! - `callbacks` : the async [`SchemaCallbacks`] seam and an in-memory schema.
//! - `snapshot`  : everything one validate/suggest call needs, fetched up front.
//! - `cache`     : moka-backed memoization keyed by query prefix.
mod cache;
mod callbacks;
mod info;
mod snapshot;

pub use cache::*;
pub use callbacks::*;
pub use info::*;
pub use snapshot::*;
