use crate::strategy::StrategyKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{kind} needs at least {required} price points, got {available}")]
    InsufficientData {
        kind: StrategyKind,
        required: usize,
        available: usize,
    },

    #[error("Price series is not strictly date-ascending at index {index}")]
    UnorderedSeries { index: usize },
}
