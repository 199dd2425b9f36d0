use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedkitError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },
}
