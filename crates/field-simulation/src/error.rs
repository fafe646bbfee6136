use field_physics::GridError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimulationError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
