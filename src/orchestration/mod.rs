pub mod session;

pub use session::{QuoteRequest, QuoteSession, SessionError};
