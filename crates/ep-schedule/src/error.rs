use ep_core::SimTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot schedule at {requested}: clock is already at {now}")]
    InvalidTime {
        requested: f64,
        now:       SimTime,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
