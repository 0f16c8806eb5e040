//! Scene domain module.
//!
//! # Module Structure
//!
//! - `model`: Scene records (`Scene`, `Character`, `Word`)
//! - `catalog`: The static scene catalog (`SceneCatalog`)
//! - `script`: Canned opening scripts, reply pools and quick phrases

mod catalog;
mod model;
mod script;

pub use catalog::{DEFAULT_SCENE_ID, SceneCatalog};
pub use model::{Character, Scene, Word};
pub use script::{CannedReply, GENERIC_REPLY, ScriptLine, opening_script, quick_phrases, reply_pool};
