use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Weight vector names '{0}' but the price matrix has no such column")]
    MissingColumn(String),

    #[error("Price matrix column '{0}' has no weight assigned")]
    UnweightedColumn(String),

    #[error("Duplicate price series for symbol '{0}'")]
    DuplicateSymbol(String),

    #[error("Not enough observations: got {got}, need at least {need}")]
    NotEnoughObservations { got: usize, need: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}
