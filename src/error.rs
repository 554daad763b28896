//! Error types shared by every stage and topology.

use crate::stages::Item;

/// Errors that can abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A write arrived after the queue's completion was signaled
    #[error("Queue '{queue}' is completed and rejects item {item}")]
    QueueCompleted { queue: String, item: Item },

    /// A second writer was requested from a single-writer queue
    #[error("Queue '{queue}' was declared single-writer and already issued its writer")]
    WriterMultiplicity { queue: String },

    /// A second reader was requested from a single-reader queue
    #[error("Queue '{queue}' was declared single-reader and already issued its reader")]
    ReaderMultiplicity { queue: String },

    /// Run parameters outside the accepted ranges
    #[error("Invalid run configuration: {0}")]
    InvalidConfiguration(String),

    /// Environment or CLI configuration could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Fault injected into a transform for failure-propagation runs
    #[error("Injected fault in lane {lane} while processing item {item}")]
    InjectedFault { lane: u64, item: Item },

    /// A stage task panicked
    #[error("Stage task in group '{group}' panicked: {message}")]
    StagePanicked { group: String, message: String },

    /// A stage task was cancelled before it finished
    #[error("Stage task in group '{group}' was cancelled")]
    StageCancelled { group: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
