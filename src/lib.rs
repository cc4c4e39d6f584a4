//! Two todo stores with different update disciplines, and a harness that
//! exercises copy-on-write versus direct mutation.
//!
//! - [`SnapshotStore`]: every operation produces a new [`TodoSnapshot`] that shares untouched items with the previous one.
//! - [`ProxyStore`]: operations write in place through a guard that notifies subscribers once per operation.
//! - [`MutabilityHarness`]: records what direct mutation, copy-on-write mutation, a leaked reference and an asynchronous update look like from the outside.
//!
//! ```rust
//! use statelab::{IdPolicy, ProxyStore, SnapshotStore, TodoId, TodoStore};
//!
//! let a = SnapshotStore::new(IdPolicy::Monotonic);
//! let b = ProxyStore::new(IdPolicy::Monotonic);
//! for s in [&a as &dyn TodoStore, &b] {
//!     s.add_todo("write tests");
//!     s.toggle_todo(TodoId(1));
//! }
//! assert_eq!(a.todos(), b.todos());
//! ```
mod app;
mod config;
mod deep;
mod error;
mod harness;
mod proxy_store;
mod snapshot_store;
mod subscription;
mod todo;

pub mod logging;
pub mod timer;

pub use app::*;
pub use config::*;
pub use deep::*;
pub use error::*;
pub use harness::*;
pub use proxy_store::*;
pub use snapshot_store::*;
pub use subscription::*;
pub use todo::*;
