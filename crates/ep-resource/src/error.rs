use ep_core::TaskId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource {name:?} must have positive capacity")]
    ZeroCapacity { name: String },

    #[error("{requester} requested zero capacity")]
    ZeroAmount { requester: TaskId },

    #[error("{requester} requested {requested} but {name:?} only has {capacity} in total")]
    CapacityExceeded {
        name:      String,
        requester: TaskId,
        requested: u32,
        capacity:  u32,
    },

    #[error("{requester} already holds or awaits capacity on {name:?}")]
    DuplicateRequester { name: String, requester: TaskId },

    #[error("{requester} has no pending request on {name:?}")]
    UnknownRequester { name: String, requester: TaskId },

    #[error("{holder} holds no claim on {name:?}")]
    NotClaiming { name: String, holder: TaskId },
}

pub type ResourceResult<T> = Result<T, ResourceError>;
