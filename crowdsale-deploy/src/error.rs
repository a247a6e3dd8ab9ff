//! Workflow errors.
//!
//! Configuration and prerequisite problems are detected before any chain
//! interaction; chain failures propagate from the SDK unchanged.

use std::path::PathBuf;

use crate::store::Stage;
use crate::tasks::TaskReport;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid data in {file}: `{field}` is missing or falsy")]
    InvalidConfig { file: String, field: String },
    #[error("invalid data in {file}: {reason}")]
    BadConfig { file: String, reason: String },
    #[error("invalid data: {file} has no `{field}` (run `{command}` first)")]
    MissingPrerequisite {
        file: String,
        field: String,
        command: &'static str,
    },
    #[error("cannot run `{stage}` while the deployment is at `{current}`; it needs `{required}` (use --force to re-run)")]
    OutOfOrder {
        stage: Stage,
        current: Stage,
        required: Stage,
    },
    #[error("{file} has schema version {found}; this build understands up to {supported}")]
    UnsupportedVersion {
        file: String,
        found: u32,
        supported: u32,
    },
    #[error("node exposes {available} accounts, {needed} required")]
    NotEnoughAccounts { needed: usize, available: usize },
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{batch} has {count} tasks, limit is {limit}")]
    TooManyTasks {
        batch: &'static str,
        count: usize,
        limit: usize,
    },
    #[error("{batch} task `{task}` failed")]
    Task {
        batch: &'static str,
        task: String,
        reports: Vec<TaskReport>,
        #[source]
        source: Box<Error>,
    },
    #[error(transparent)]
    Chain(#[from] crowdsale_sdk::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
