//! Join-barrier over a group of spawned stage tasks.

use crate::error::{PipelineError, Result};
use crate::stages::StageOutcome;
use parking_lot::Mutex;
use std::future::Future;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// Stage tasks that are awaited together.
///
/// Tasks can be spawned through a shared reference, which lets lane
/// factories running inside the lane registry add their tasks. Joining
/// consumes the group; every task must have been spawned by then.
#[derive(Debug)]
pub struct TaskGroup {
    name: &'static str,
    tasks: Mutex<JoinSet<Result<StageOutcome>>>,
}

impl TaskGroup {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Result<StageOutcome>> + Send + 'static,
    {
        self.tasks.lock().spawn(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for every task and sum what they processed.
    ///
    /// The first failure is returned immediately; dropping the remaining
    /// set aborts the tasks still running. An empty group succeeds at once.
    pub async fn join_all(self) -> Result<StageOutcome> {
        let name = self.name;
        let mut tasks = self.tasks.into_inner();
        let spawned = tasks.len();
        let mut total = StageOutcome::default();

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(result) => result,
                Err(join_error) => Err(Self::join_failure(name, join_error)),
            };

            match outcome {
                Ok(outcome) => total.processed += outcome.processed,
                Err(err) => {
                    error!(group = name, error = %err, "stage task failed");
                    return Err(err);
                }
            }
        }

        debug!(group = name, tasks = spawned, processed = total.processed, "task group joined");

        Ok(total)
    }

    fn join_failure(group: &str, join_error: JoinError) -> PipelineError {
        if join_error.is_cancelled() {
            return PipelineError::StageCancelled {
                group: group.to_string(),
            };
        }

        let payload = join_error.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        PipelineError::StagePanicked {
            group: group.to_string(),
            message,
        }
    }
}
