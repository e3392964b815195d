use crate::grid::Position;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExplorerError {
    /// The judge sent a position or snapshot outside the declared bounds.
    #[error("malformed observation: {0}")]
    MalformedObservation(String),
    /// No route exists on the current map knowledge. The phase retries next turn.
    #[error("no path from {from} to {to}")]
    SearchExhausted { from: Position, to: Position },
    #[error("a step was requested but no path is planned")]
    EmptyPath,
}
