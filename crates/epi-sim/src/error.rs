use thiserror::Error;

use epi_core::PersonId;
use epi_map::MapError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{person} carries {got} disease states but the roster has {expected}")]
    DiseaseCoverage {
        person:   PersonId,
        expected: usize,
        got:      usize,
    },

    #[error("{0} was never placed on the map")]
    Unplaced(PersonId),

    #[error(transparent)]
    Map(#[from] MapError),
}

pub type SimResult<T> = Result<T, SimError>;
