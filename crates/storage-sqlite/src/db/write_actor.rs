use super::{DbConnection, DbPool};
use crate::errors::{IntoCore, StorageError};
use diesel::SqliteConnection;
use fxdeals_core::errors::{DatabaseError, Error, Result};
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

/// Jobs queued before the sender waits.
const WRITER_QUEUE_CAPACITY: usize = 1024;

// A job takes the writer's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes `job` on the writer actor's dedicated connection, inside its
    /// own `IMMEDIATE` transaction.
    ///
    /// Each call is a separate transaction: a failing job rolls back only its
    /// own writes. A stopped actor is reported as a database error.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        // Erase the job's return type so one channel carries every kind of job.
        let erased: Job<AnyBox> = Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox));
        self.tx
            .send((erased, ret_tx))
            .await
            .map_err(|_| writer_stopped("receiving channel was closed"))?;

        let boxed = ret_rx
            .await
            .map_err(|_| writer_stopped("reply sender was dropped"))??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Database(DatabaseError::Internal(
                "Failed to downcast writer actor result".to_string(),
            )))
    }
}

fn writer_stopped(detail: &str) -> Error {
    Error::Database(DatabaseError::Internal(format!(
        "Writer actor is not running: {}",
        detail
    )))
}

/// Spawns a background Tokio task that acts as the single writer to the database.
///
/// The actor holds one pooled connection and processes jobs serially. If the
/// connection cannot be acquired, the pending job fails and the next job retries.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(WRITER_QUEUE_CAPACITY);

    tokio::spawn(async move {
        let mut conn: Option<DbConnection> = None;

        while let Some((job, reply_tx)) = rx.recv().await {
            if conn.is_none() {
                match pool.get().into_core() {
                    Ok(c) => conn = Some(c),
                    Err(e) => {
                        error!("Writer actor could not acquire a connection: {}", e);
                        let _ = reply_tx.send(Err(e));
                        continue;
                    }
                }
            }
            let Some(c) = conn.as_mut() else { continue };

            let result: Result<AnyBox> = c
                .immediate_transaction::<_, StorageError, _>(|tx_conn| {
                    job(tx_conn).map_err(StorageError::from)
                })
                .map_err(Error::from);

            // The requester may have gone away (request cancelled); nothing to do then.
            let _ = reply_tx.send(result);
        }
        debug!("Writer actor stopped: all handles dropped");
    });

    WriteHandle { tx }
}
