//! Chat: session state and query routing.

pub mod router;
pub mod session;

pub use router::QueryRouter;
pub use session::{ChatRole, ChatTurn, SessionState};
