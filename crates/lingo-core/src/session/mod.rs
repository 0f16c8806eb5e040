//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Dialogue turn types (`Sender`, `DialogueTurn`)
//! - `model`: Live session state (`SessionState`, `SessionPhase`)
//! - `event`: Notifications published while a session runs (`SessionEvent`)

mod event;
mod message;
mod model;

// Re-export public API
pub use event::{NoticeLevel, SessionEvent};
pub use message::{DialogueTurn, Sender};
pub use model::{SessionPhase, SessionState};
