use crate::domain::{ContainerType, Decimal, MarkupMode, RateLineId};
use thiserror::Error;

/// Errors surfaced by the markup engine before or during a computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("Batch of {requested} rate lines exceeds the maximum of {max}")]
    CapacityExceeded { requested: usize, max: usize },
    #[error("Batch contains no rate lines")]
    EmptyBatch,
    #[error(
        "Constraint conflict on {rate_line_id} {container}: floor {floor} is above ceiling {ceiling}"
    )]
    ConstraintConflict {
        rate_line_id: RateLineId,
        container: ContainerType,
        floor: Decimal,
        ceiling: Decimal,
    },
    #[error("{required} markup requested while {active} mode is active")]
    ModeInactive {
        required: MarkupMode,
        active: MarkupMode,
    },
    #[error("{operation} is not available in {mode} mode")]
    Unsupported {
        operation: &'static str,
        mode: MarkupMode,
    },
    #[error("Unknown rate line: {0}")]
    UnknownRateLine(RateLineId),
    #[error("No AI results to apply")]
    NoBatchResults,
    #[error("Price for {rate_line_id} {container} is out of range")]
    Overflow {
        rate_line_id: RateLineId,
        container: ContainerType,
    },
}

impl MarkupError {
    pub fn overflow(rate_line_id: &RateLineId, container: ContainerType) -> Self {
        MarkupError::Overflow {
            rate_line_id: rate_line_id.clone(),
            container,
        }
    }
}
