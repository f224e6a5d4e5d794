pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod render;

pub use config::{Config, ConflictPolicy};
pub use datasource::{CsvRateSource, MockRateSource, RateSource, RateSourceError};
pub use domain::{
    Bound, Combinator, ContainerType, Decimal, MarkupMode, PriceMap, RateLine, RateLineId,
    Strategy,
};
pub use engine::{
    AiMarkupEngine, AiMarkupInputs, AiResult, BatchJob, BatchProcessor, BatchStatus, CancelFlag,
    MarkupModeController, MarkupRng, ScriptedRng, SeededRng,
};
pub use error::MarkupError;
pub use orchestration::{QuoteRequest, QuoteSession, SessionError};
