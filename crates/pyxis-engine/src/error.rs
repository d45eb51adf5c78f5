use uuid::Uuid;

/// Failures reported by a [`TextContainer`](crate::sync::TextContainer).
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("Position {pos} is out of range for text of length {len}")]
    OutOfRange { pos: usize, len: usize },
    #[error("Cannot decode container payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Snapshot cannot be imported into a container that already has history")]
    Diverged,
    #[error("Missing operations from peer {peer}: expected counter {expected}, got {found}")]
    Gap { peer: u64, expected: u64, found: u64 },
}

/// Failures raised by persistence hooks.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to write {what} for document {id}: {source}")]
    Write {
        what: &'static str,
        id: Uuid,
        source: std::io::Error,
    },
    #[error("Persistence worker has stopped")]
    WorkerGone,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}
