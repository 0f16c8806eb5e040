//! Application layer: session orchestration and the study views built on it.

pub mod deferred;
pub mod dialogue_feed;
pub mod display;
pub mod pronunciation;
pub mod reply;
pub mod session;
pub mod translation;
pub mod word_review;

pub use crate::deferred::DeferredTasks;
pub use crate::dialogue_feed::{DialogueFeed, Key, KeyPress, RenderedTurn, TypoHint};
pub use crate::display::{DisplayEnvironment, FullscreenChange, HeadlessDisplay};
pub use crate::reply::ReplyGenerator;
pub use crate::session::{SceneSessionController, SessionContext, SessionOptions};
pub use crate::word_review::{ReviewMode, WordReviewPanel};
