//! Bounded sequential task runner.
//!
//! Each task is awaited to completion before the next starts. The first
//! failure stops the batch; tasks after it are reported as skipped.

use std::fmt;
use std::future::Future;

use crowdsale_sdk::TxHash;

use crate::error::{Error, Result};

/// Default upper bound on tasks per batch.
pub const DEFAULT_MAX_TASKS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done(TxHash),
    Failed(String),
    Skipped,
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Done(hash) => write!(f, "done ({hash})"),
            TaskOutcome::Failed(reason) => write!(f, "failed: {reason}"),
            TaskOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub label: String,
    pub outcome: TaskOutcome,
}

/// An ordered list of labelled tasks.
#[derive(Debug)]
pub struct SequentialTasks<T> {
    batch: &'static str,
    tasks: Vec<(String, T)>,
}

impl<T> SequentialTasks<T> {
    pub fn new(batch: &'static str, limit: usize, tasks: Vec<(String, T)>) -> Result<Self> {
        if tasks.len() > limit {
            return Err(Error::TooManyTasks {
                batch,
                count: tasks.len(),
                limit,
            });
        }
        Ok(Self { batch, tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task through `step`, in order.
    pub async fn run<F, Fut>(self, mut step: F) -> Result<Vec<TaskReport>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<TxHash>>,
    {
        let batch = self.batch;
        let total = self.tasks.len();
        let mut reports = Vec::with_capacity(total);
        let mut failure: Option<(String, Error)> = None;

        for (index, (label, task)) in self.tasks.into_iter().enumerate() {
            if failure.is_some() {
                reports.push(TaskReport {
                    label,
                    outcome: TaskOutcome::Skipped,
                });
                continue;
            }
            match step(task).await {
                Ok(hash) => {
                    tracing::debug!(batch, task = %label, position = index + 1, total, tx = %hash, "Task done");
                    reports.push(TaskReport {
                        label,
                        outcome: TaskOutcome::Done(hash),
                    });
                }
                Err(e) => {
                    tracing::error!(batch, task = %label, position = index + 1, total, "Task failed: {e}");
                    reports.push(TaskReport {
                        label: label.clone(),
                        outcome: TaskOutcome::Failed(e.to_string()),
                    });
                    failure = Some((label, e));
                }
            }
        }

        match failure {
            None => Ok(reports),
            Some((task, source)) => {
                let skipped = reports
                    .iter()
                    .filter(|r| r.outcome == TaskOutcome::Skipped)
                    .count();
                if skipped > 0 {
                    tracing::warn!(batch, skipped, "Remaining tasks not attempted");
                }
                Err(Error::Task {
                    batch,
                    task,
                    reports,
                    source: Box::new(source),
                })
            }
        }
    }
}
