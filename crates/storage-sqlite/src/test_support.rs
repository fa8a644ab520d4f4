use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{open, DbPool, WriteHandle};

/// A migrated database in a temp directory; the directory lives as long
/// as the returned guard.
pub(crate) fn test_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let (pool, writer) = open(&db_path.to_string_lossy()).expect("Failed to open database");
    (pool, writer, temp_dir)
}
