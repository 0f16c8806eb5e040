//! Scene session orchestration.
//!
//! A [`SceneSessionController`] owns one learning session. Views never hold
//! the controller itself; they hold a [`SessionContext`], a weak handle that
//! stops working once the controller is dropped.

mod context;
mod controller;

pub use context::SessionContext;
pub use controller::{SceneSessionController, SessionOptions};
