use ep_core::{GeoPoint, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("path track must contain at least one waypoint")]
    EmptyPath,

    #[error("no server sites configured")]
    NoServers,

    #[error("no server has a usable distance from {0}")]
    NoReachableServer(GeoPoint),

    #[error("mobility monitor of {0} has been cancelled")]
    Cancelled(TaskId),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
