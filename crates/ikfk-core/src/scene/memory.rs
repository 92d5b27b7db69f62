//! In-process scene used for headless matching, demos and tests.
//!
//! Objects form a parent/child arena of local matrices. Keys are stored per
//! object and frame and evaluated stepped: moving the playhead applies the
//! last key at or before the new frame.

use std::collections::{BTreeMap, HashMap};

use glam::DMat4;

use super::{Channel, Keying, ObjectId, RelativeFilter, SceneGraph, Selection, Timeline};
use crate::error::{IkFkError, Result};
use crate::transform::{try_inverse, Transform};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ObjectId>,
    local: DMat4,
}

/// A keyed value on one object at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// Channels this key drives.
    pub channels: Vec<Channel>,
    /// Local transform captured when the key was set.
    pub value: Transform,
}

/// An in-memory host scene.
#[derive(Debug, Clone)]
pub struct MemoryScene {
    nodes: Vec<Node>,
    names: HashMap<String, ObjectId>,
    keys: BTreeMap<ObjectId, BTreeMap<i32, Key>>,
    current_frame: i32,
    playback_range: (i32, i32),
    selection: Vec<ObjectId>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            names: HashMap::new(),
            keys: BTreeMap::new(),
            current_frame: 1,
            playback_range: (1, 24),
            selection: Vec::new(),
        }
    }
}

impl MemoryScene {
    /// Creates an empty scene at frame 1 with a 1..=24 playback range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the playback range.
    #[must_use]
    pub fn with_playback_range(mut self, start: i32, end: i32) -> Self {
        self.playback_range = (start, end);
        self
    }

    /// Adds an object with a transform relative to `parent`.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        parent: Option<ObjectId>,
        local: DMat4,
    ) -> Result<ObjectId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(IkFkError::ObjectExists(name));
        }
        if let Some(parent) = parent {
            self.node(parent)?;
        }

        let index = u32::try_from(self.nodes.len())
            .map_err(|_| IkFkError::InvalidHierarchy("scene is full".to_string()))?;
        let id = ObjectId(index);
        self.names.insert(name.clone(), id);
        self.nodes.push(Node {
            name,
            parent,
            local,
        });
        Ok(id)
    }

    /// Adds an object placed at a world transform under `parent`.
    pub fn add_world(
        &mut self,
        name: impl Into<String>,
        parent: Option<ObjectId>,
        world: DMat4,
    ) -> Result<ObjectId> {
        let id = self.add(name, parent, DMat4::IDENTITY)?;
        self.set_world_transform(id, world)?;
        Ok(id)
    }

    /// Replaces the current selection.
    pub fn select(&mut self, ids: &[ObjectId]) {
        self.selection = ids.to_vec();
    }

    /// Clears the current selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Stores a key with an explicit value, without touching the object.
    pub fn insert_key(&mut self, id: ObjectId, frame: i32, value: Transform) -> Result<()> {
        self.node(id)?;
        self.keys.entry(id).or_default().insert(
            frame,
            Key {
                channels: vec![Channel::Translate, Channel::Rotate, Channel::Scale],
                value,
            },
        );
        Ok(())
    }

    /// Returns the key on `id` at exactly `frame`.
    #[must_use]
    pub fn key(&self, id: ObjectId, frame: i32) -> Option<&Key> {
        self.keys.get(&id).and_then(|k| k.get(&frame))
    }

    /// Returns the keyed frames of an object in ascending order.
    #[must_use]
    pub fn keyed_frames(&self, id: ObjectId) -> Vec<i32> {
        self.keys
            .get(&id)
            .map(|k| k.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the number of objects in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: ObjectId) -> Result<&Node> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(IkFkError::UnknownObject(id))
    }

    fn node_mut(&mut self, id: ObjectId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(IkFkError::UnknownObject(id))
    }

    fn parent_world(&self, id: ObjectId) -> Result<DMat4> {
        match self.node(id)?.parent {
            Some(parent) => self.world_transform(parent),
            None => Ok(DMat4::IDENTITY),
        }
    }

    /// Applies the last key at or before the current frame to every keyed
    /// object.
    fn evaluate(&mut self) {
        let frame = self.current_frame;
        let updates: Vec<(ObjectId, Key)> = self
            .keys
            .iter()
            .filter_map(|(id, keys)| {
                keys.range(..=frame)
                    .next_back()
                    .or_else(|| keys.iter().next())
                    .map(|(_, key)| (*id, key.clone()))
            })
            .collect();

        for (id, key) in updates {
            let Ok(node) = self.node_mut(id) else {
                continue;
            };
            let mut local = Transform::from_matrix(node.local);
            for channel in &key.channels {
                match channel {
                    Channel::Translate => local.translation = key.value.translation,
                    Channel::Rotate => local.rotation = key.value.rotation,
                    Channel::Scale => local.scale = key.value.scale,
                }
            }
            node.local = local.to_matrix();
        }
    }
}

impl SceneGraph for MemoryScene {
    fn find(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    fn name(&self, id: ObjectId) -> Result<String> {
        Ok(self.node(id)?.name.clone())
    }

    fn world_transform(&self, id: ObjectId) -> Result<DMat4> {
        let node = self.node(id)?;
        Ok(self.parent_world(id)? * node.local)
    }

    fn local_transform(&self, id: ObjectId) -> Result<DMat4> {
        Ok(self.node(id)?.local)
    }

    fn set_world_transform(&mut self, id: ObjectId, matrix: DMat4) -> Result<()> {
        let parent_world = self.parent_world(id)?;
        let parent_inverse = try_inverse(&parent_world, "parent world matrix")?;
        self.node_mut(id)?.local = parent_inverse * matrix;
        Ok(())
    }

    fn parent(&self, id: ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.node(id)?.parent)
    }

    fn list_relatives(&self, id: ObjectId, filter: RelativeFilter) -> Result<Vec<ObjectId>> {
        self.node(id)?;
        let children_of = |parent: ObjectId| {
            self.nodes
                .iter()
                .enumerate()
                .filter(move |(_, n)| n.parent == Some(parent))
                .filter_map(|(i, _)| u32::try_from(i).ok().map(ObjectId))
        };

        let relatives = match filter {
            RelativeFilter::Children => children_of(id).collect(),
            RelativeFilter::AllDescendants => {
                let mut out = Vec::new();
                let mut stack: Vec<ObjectId> = children_of(id).collect();
                stack.reverse();
                while let Some(next) = stack.pop() {
                    out.push(next);
                    let mut children: Vec<ObjectId> = children_of(next).collect();
                    children.reverse();
                    stack.extend(children);
                }
                out
            }
            RelativeFilter::Ancestors => {
                let mut out = Vec::new();
                let mut current = self.node(id)?.parent;
                while let Some(parent) = current {
                    out.push(parent);
                    current = self.node(parent)?.parent;
                }
                out
            }
        };
        Ok(relatives)
    }
}

impl Timeline for MemoryScene {
    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn set_current_frame(&mut self, frame: i32) {
        self.current_frame = frame;
        self.evaluate();
    }

    fn playback_range(&self) -> (i32, i32) {
        self.playback_range
    }
}

impl Keying for MemoryScene {
    fn remove_key(&mut self, ids: &[ObjectId], frame: i32) -> Result<()> {
        for id in ids {
            self.node(*id)?;
            if let Some(keys) = self.keys.get_mut(id) {
                keys.remove(&frame);
            }
        }
        Ok(())
    }

    fn set_key(&mut self, ids: &[ObjectId], channels: &[Channel], frame: i32) -> Result<()> {
        for id in ids {
            let value = Transform::from_matrix(self.node(*id)?.local);
            let key = self.keys.entry(*id).or_default().entry(frame).or_insert(Key {
                channels: Vec::new(),
                value,
            });
            key.value = value;
            for channel in channels {
                if !key.channels.contains(channel) {
                    key.channels.push(*channel);
                }
            }
        }
        Ok(())
    }
}

impl Selection for MemoryScene {
    fn selected_object_ids(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }
}
