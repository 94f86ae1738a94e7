use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("team identifier is empty")]
    EmptyTeam,

    #[error("league is empty")]
    EmptyLeague,

    #[error("team plays itself: {0}")]
    SameTeam(String),

    #[error("negative goal count in {field}: {value}")]
    NegativeGoals { field: &'static str, value: i32 },

    #[error("implausible goal count in {field}: {value} (max {max})")]
    ImplausibleGoals {
        field: &'static str,
        value: i32,
        max: i32,
    },

    #[error("half-time {side} goals ({half_time}) exceed full-time goals ({full_time})")]
    HalfTimeExceedsFullTime {
        side: &'static str,
        half_time: i32,
        full_time: i32,
    },

    #[error("blend weight must lie in [0, 1]: {0}")]
    BlendWeightOutOfRange(f64),

    #[error("lookback window for {0} must be at least 1")]
    EmptyWindow(&'static str),
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
