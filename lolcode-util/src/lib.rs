//! Shared infrastructure for the LOLCODE pipeline: source spans, arena
//! indexing, and the error type every later stage returns.

pub mod error;
pub mod index_vec;
pub mod span;

pub use error::{LolError, LolResult};
pub use span::Span;
