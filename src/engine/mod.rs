//! Deterministic rule engines: the fallback ("mock mode") substitutes for
//! the three LLM calls. Pure functions of the email's strings, total, with
//! no error states.

pub mod classifier;
pub mod drafter;
pub mod extractor;

pub use classifier::classify;
pub use drafter::draft;
pub use extractor::extract;
