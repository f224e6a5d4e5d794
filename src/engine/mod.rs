//! Pure computation engine(s) for rate markup.

pub mod ai;
pub mod batch;
pub mod constraint;
pub mod controller;
pub mod fixed;
pub mod percentage;
pub mod rng;

pub use ai::{psychological_round, AiMarkupEngine, AiMarkupInputs};
pub use batch::{
    apply_results, AiResult, BatchJob, BatchProcessor, BatchProgress, BatchRun, BatchStatus,
    CancelFlag,
};
pub use constraint::{resolve_ceiling, resolve_floor, PriceWindow};
pub use controller::{parse_markup_input, AiModeState, MarkupModeController, PendingInputs};
pub use fixed::FixedMarkupCalculator;
pub use percentage::{PercentStep, PercentageMarkupCalculator};
pub use rng::{MarkupRng, ScriptedRng, SeededRng};
