use super::{DbConnection, DbPool};
use crate::errors::{IntoCore, StorageError};
use diesel::SqliteConnection;
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};
use worthline_core::errors::{DatabaseError, Error, Result};

// Job return values are type-erased so one channel carries every job type.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

/// Handle for sending write jobs to the single writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Runs `job` on the writer's dedicated connection inside an immediate
    /// transaction. An `Err` from the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_gone("Writer actor stopped accepting jobs"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_gone("Writer actor dropped the reply channel"))??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Writer actor returned an unexpected type".to_string()))
    }
}

fn writer_gone(message: &str) -> Error {
    Error::Database(DatabaseError::Internal(message.to_string()))
}

/// Spawns the background task that serializes every database write.
///
/// The actor holds one pooled connection for its whole lifetime and stops
/// when the last `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let conn = pool.get().into_core().inspect_err(|e| {
        error!("Writer actor could not acquire a connection: {}", e);
    })?;

    let (tx, rx) = mpsc::channel::<Envelope>(1024);
    tokio::spawn(run(conn, rx));

    Ok(WriteHandle { tx })
}

async fn run(mut conn: DbConnection, mut rx: mpsc::Receiver<Envelope>) {
    while let Some((job, reply_tx)) = rx.recv().await {
        let result: Result<AnyBox> = conn
            .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
            .map_err(Error::from);

        // The requester may have gone away; nothing to do then.
        let _ = reply_tx.send(result);
    }
    debug!("Writer actor shutting down");
}
