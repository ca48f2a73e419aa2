use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Malformed shortcuts store at byte {offset}: {reason}")]
    MalformedStore { offset: usize, reason: String },

    #[error("No shortcut at position {position} (store has {count} entries)")]
    EntryNotFound { position: usize, count: usize },

    #[error("Field '{field}' at byte {offset} is not valid UTF-8")]
    EncodingError {
        field: String,
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),

    #[error("Shortcuts store not found: {0}")]
    StoreNotFound(String),

    #[error("Shortcuts store is locked by {} (lock file {})", describe_holder(.holder), .path.display())]
    Locked {
        path: PathBuf,
        /// Process id recorded by the holder, when it could be read
        holder: Option<u32>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl StoreError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        StoreError::MalformedStore {
            offset,
            reason: reason.into(),
        }
    }
}

fn describe_holder(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!("process {}", pid),
        None => "another process".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
