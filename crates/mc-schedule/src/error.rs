use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("placement parse error: {0}")]
    Parse(String),

    #[error("invalid timer period {0}")]
    InvalidPeriod(f64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
