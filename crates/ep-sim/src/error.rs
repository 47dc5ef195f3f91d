use ep_core::{CoreError, ServerId, TaskId};
use ep_mobility::MobilityError;
use ep_resource::ResourceError;
use ep_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("{0} does not exist")]
    UnknownServer(ServerId),

    #[error("{0} does not exist")]
    UnknownTask(TaskId),

    #[error("engine invariant violated: {0}")]
    Invariant(String),
}

pub type SimResult<T> = Result<T, SimError>;
