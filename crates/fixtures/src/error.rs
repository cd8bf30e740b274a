//! Error types for fixture construction

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    #[error("Wrong gender argument: {0}")]
    InvalidGender(String),

    #[error("Unknown contract type: {0}")]
    UnknownContractType(String),

    #[error("Candidate has no contract type selected")]
    NoContractType,

    #[error("Unknown address preset: {0}")]
    UnknownAddressPreset(String),
}

pub type FixtureResult<T> = Result<T, FixtureError>;
