//! Turn orchestration: the session context, the two-call turn loop,
//! and the sink seam that lets any surface consume turn events.

pub mod prompt;
pub mod session;
pub mod sink;
pub mod turn;

pub use session::Session;
pub use sink::{NullSink, TurnEvent, TurnSink};
pub use turn::{run_turn, HISTORY_WINDOW};
