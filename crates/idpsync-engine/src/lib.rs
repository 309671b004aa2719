//! Sync engine for idpsync.
//!
//! The engine turns two [`idpsync_model::Snapshot`]s, the desired state from
//! the identity provider's directory and the current state of the target, into
//! a [`SyncPlan`]: the exact set of user and group actions that make the target
//! match the source. Planning is pure; no I/O happens here. Loading and
//! applying are abstracted behind the [`SnapshotLoader`] and [`ActionApplier`]
//! traits so backends stay swappable and the planner stays testable.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod apply;
pub mod diff;
pub mod error;
pub mod loader;
pub mod plan;
pub mod report;

pub use apply::{ActionApplier, ApplyError, Operation};
pub use diff::diff;
pub use error::LoadError;
pub use loader::SnapshotLoader;
pub use plan::{GroupChange, MembershipDelta, SyncPlan};
pub use report::SyncReport;
