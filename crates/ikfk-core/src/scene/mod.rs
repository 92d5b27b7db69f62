//! Interfaces to the host application that owns the rig.
//!
//! The matchers never own scene state. They read and write transforms
//! through [`SceneGraph`], move the playhead through [`Timeline`], commit
//! keys through [`Keying`] and ask [`Selection`] what the user picked.

pub mod memory;

use std::fmt;

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::Transform;

pub use memory::MemoryScene;

/// Opaque handle to an object in the host scene.
///
/// Handles are issued by the scene provider and stay valid for the editing
/// session; names are resolved to handles once, when modules are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which relatives [`SceneGraph::list_relatives`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeFilter {
    /// Direct children only.
    Children,
    /// Every descendant, depth first.
    AllDescendants,
    /// Every ancestor, nearest first.
    Ancestors,
}

/// An animatable channel group of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Translation.
    Translate,
    /// Rotation.
    Rotate,
    /// Scale.
    Scale,
}

/// Transform queries and edits against the host scene.
pub trait SceneGraph {
    /// Resolves an object name to its handle.
    fn find(&self, name: &str) -> Option<ObjectId>;

    /// Returns the name of an object.
    fn name(&self, id: ObjectId) -> Result<String>;

    /// Returns the object's world matrix.
    fn world_transform(&self, id: ObjectId) -> Result<DMat4>;

    /// Returns the object's matrix relative to its parent.
    fn local_transform(&self, id: ObjectId) -> Result<DMat4>;

    /// Replaces the object's world matrix.
    fn set_world_transform(&mut self, id: ObjectId, matrix: DMat4) -> Result<()>;

    /// Returns the object's parent, if it has one.
    fn parent(&self, id: ObjectId) -> Result<Option<ObjectId>>;

    /// Lists relatives of an object.
    fn list_relatives(&self, id: ObjectId, filter: RelativeFilter) -> Result<Vec<ObjectId>>;

    /// Returns the object's world position.
    fn world_translation(&self, id: ObjectId) -> Result<DVec3> {
        Ok(self.world_transform(id)?.w_axis.truncate())
    }

    /// Moves the object in world space, keeping its world rotation and scale.
    fn set_world_translation(&mut self, id: ObjectId, position: DVec3) -> Result<()> {
        let mut world = self.world_transform(id)?;
        world.w_axis = position.extend(1.0);
        self.set_world_transform(id, world)
    }

    /// Rotates the object in world space, keeping its world position and scale.
    fn set_world_rotation(&mut self, id: ObjectId, rotation: DQuat) -> Result<()> {
        let world = Transform::from_matrix(self.world_transform(id)?).with_rotation(rotation);
        self.set_world_transform(id, world.to_matrix())
    }
}

/// The host's animation timeline.
pub trait Timeline {
    /// Returns the frame the scene is currently evaluated at.
    fn current_frame(&self) -> i32;

    /// Moves the playhead and re-evaluates the scene.
    fn set_current_frame(&mut self, frame: i32);

    /// Returns the playback range as `(start, end)`, both inclusive.
    fn playback_range(&self) -> (i32, i32);
}

/// Keyframe edits.
pub trait Keying {
    /// Removes every key on `ids` at exactly `frame`.
    fn remove_key(&mut self, ids: &[ObjectId], frame: i32) -> Result<()>;

    /// Keys the current value of `channels` on `ids` at `frame`.
    fn set_key(&mut self, ids: &[ObjectId], channels: &[Channel], frame: i32) -> Result<()>;
}

/// The user's current object selection.
pub trait Selection {
    /// Returns the selected objects in selection order.
    fn selected_object_ids(&self) -> Vec<ObjectId>;
}

/// Everything the batch and bake entry points need from the host.
pub trait Host: SceneGraph + Timeline + Keying + Selection {}

impl<T: SceneGraph + Timeline + Keying + Selection> Host for T {}
