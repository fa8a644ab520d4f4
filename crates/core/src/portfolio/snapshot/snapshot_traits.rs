use chrono::NaiveDate;

use super::snapshot_model::SnapshotLine;
use crate::errors::Result;

pub trait SnapshotServiceTrait: Send + Sync {
    /// Cash and holding lines as of the end of `target_date`.
    ///
    /// Prices come from the cache only; this never triggers a download.
    fn inspect(&self, target_date: NaiveDate) -> Result<Vec<SnapshotLine>>;
}
