//! # Contracts
//!
//! Frozen interface contracts shared by every shot-sync crate: the timeline
//! data model, identifiers, sync settings, the external scene store trait and
//! frame-change notifications.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Integer frames on every clock
//! - The master scene's clock drives the edit timeline; each shot scene has its own clock
//! - A strip maps its visible master interval `[frame_final_start, frame_final_end)`
//!   onto the shot clock

mod blueprint;
mod error;
mod ids;
mod settings;
mod store;
mod sync;
mod timeline;
mod tool;

pub use blueprint::*;
pub use error::*;
pub use ids::{BrushId, MaterialId, ObjectId, SceneId, StripId};
pub use settings::SyncSettings;
pub use store::SceneStore;
pub use sync::*;
pub use timeline::*;
pub use tool::*;
