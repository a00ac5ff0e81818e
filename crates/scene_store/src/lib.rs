//! # Scene Store
//!
//! In-memory stand-in for the host application's scene data.
//!
//! Responsibilities:
//! - Implement the `SceneStore` contract over plain owned data
//! - Build a store from a `ProjectBlueprint`
//! - Provide the editing operations tests and the CLI need (scenes, strips,
//!   mutes, objects, brushes, modes, materials)

pub mod error;
pub mod factory;
pub mod memory;

pub use contracts::{ProjectBlueprint, SceneStore};
pub use error::{Result, SceneStoreError};
pub use factory::SceneFactory;
pub use memory::{
    MemoryStore, ObjectData, PaintSettings, SceneData, DEFAULT_BRUSH, DEFAULT_SHOT_RANGE,
};
