//! Snapshot inspector: a point-in-time breakdown of cash and holdings per
//! account, replayed with the same rules as the wealth engine.

mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;


pub use snapshot_model::{LineType, SnapshotLine};
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::SnapshotServiceTrait;
