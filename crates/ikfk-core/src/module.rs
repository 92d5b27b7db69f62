//! Limb modules: one switchable root-mid-tip chain with its IK controls.

use serde::{Deserialize, Serialize};

use crate::error::{IkFkError, Result};
use crate::scene::{ObjectId, RelativeFilter, SceneGraph};

/// Which side of a symmetric rig a module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Side {
    /// Left side.
    Left,
    /// Right side, mirrored.
    Right,
    /// Center line.
    #[default]
    Center,
}

impl Side {
    /// Parses a side tag: `L`, `R` or `C`, optionally followed by an index
    /// (`"R0"`, `"L12"`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.chars().next()? {
            'L' => Some(Side::Left),
            'R' => Some(Side::Right),
            'C' => Some(Side::Center),
            _ => None,
        }
    }

    /// Reads the side from a module name of the form `<limb>_<side><index>`,
    /// for example `arm_R0`. A namespace prefix (`rig:arm_L0`) is ignored.
    #[must_use]
    pub fn from_module_name(name: &str) -> Option<Self> {
        let short = name.rsplit(':').next().unwrap_or(name);
        short.split('_').nth(1).and_then(Self::from_tag)
    }

    /// Returns true if aim frames on this side are built mirrored.
    #[must_use]
    pub fn is_mirrored(self) -> bool {
        self == Side::Right
    }
}

/// Object names making up one limb, resolved against a scene with
/// [`LimbModule::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimbNames {
    /// FK joints in root, mid, tip order.
    pub fk: [String; 3],
    /// Pole-vector target.
    pub pole: String,
    /// IK chain controls; the last one is the IK handle.
    pub ik: Vec<String>,
}

/// One IK/FK pair.
///
/// The FK joint order is positional and fixed once built: index 0 is the
/// root, 1 the mid joint, 2 the tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimbModule {
    name: String,
    fk: [ObjectId; 3],
    pole: ObjectId,
    ik: Vec<ObjectId>,
    side: Side,
}

impl LimbModule {
    /// Creates a module from resolved handles.
    ///
    /// # Errors
    ///
    /// Returns [`IkFkError::InvalidModule`] if `fk` does not hold exactly
    /// three joints or `ik` is empty.
    pub fn new(
        name: impl Into<String>,
        fk: &[ObjectId],
        pole: ObjectId,
        ik: Vec<ObjectId>,
        side: Side,
    ) -> Result<Self> {
        let name = name.into();
        let fk: [ObjectId; 3] = fk.try_into().map_err(|_| {
            IkFkError::InvalidModule(format!(
                "'{name}' needs exactly 3 FK joints, got {}",
                fk.len()
            ))
        })?;
        if ik.is_empty() {
            return Err(IkFkError::InvalidModule(format!(
                "'{name}' needs at least one IK control"
            )));
        }

        Ok(Self {
            name,
            fk,
            pole,
            ik,
            side,
        })
    }

    /// Builds a module by looking every object up by name.
    ///
    /// The side is read from the module name (see
    /// [`Side::from_module_name`]) and defaults to [`Side::Center`].
    ///
    /// # Errors
    ///
    /// Returns [`IkFkError::ObjectNotFound`] for the first name the scene
    /// does not know, or [`IkFkError::InvalidModule`] if `names.ik` is empty.
    pub fn resolve<S: SceneGraph + ?Sized>(
        scene: &S,
        name: impl Into<String>,
        names: &LimbNames,
    ) -> Result<Self> {
        let lookup = |object: &str| {
            scene
                .find(object)
                .ok_or_else(|| IkFkError::ObjectNotFound(object.to_string()))
        };

        let name = name.into();
        let fk = names
            .fk
            .iter()
            .map(|n| lookup(n.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let pole = lookup(&names.pole)?;
        let ik = names
            .ik
            .iter()
            .map(|n| lookup(n.as_str()))
            .collect::<Result<Vec<_>>>()?;
        let side = Side::from_module_name(&name).unwrap_or_default();

        Self::new(name, &fk, pole, ik, side)
    }

    /// Returns the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the FK joints in root, mid, tip order.
    #[must_use]
    pub fn fk_joints(&self) -> &[ObjectId; 3] {
        &self.fk
    }

    /// Returns the FK root joint.
    #[must_use]
    pub fn root(&self) -> ObjectId {
        self.fk[0]
    }

    /// Returns the FK mid joint.
    #[must_use]
    pub fn mid(&self) -> ObjectId {
        self.fk[1]
    }

    /// Returns the FK tip joint.
    #[must_use]
    pub fn tip(&self) -> ObjectId {
        self.fk[2]
    }

    /// Returns the pole-vector target.
    #[must_use]
    pub fn pole(&self) -> ObjectId {
        self.pole
    }

    /// Returns the IK chain controls.
    #[must_use]
    pub fn ik_chain(&self) -> &[ObjectId] {
        &self.ik
    }

    /// Returns the IK handle driven by the matchers.
    #[must_use]
    pub fn ik_handle(&self) -> ObjectId {
        // Never empty, checked in `new`.
        self.ik[self.ik.len() - 1]
    }

    /// Returns the module's side.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns true if aim frames for this module are built mirrored.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.side.is_mirrored()
    }

    /// Returns every object belonging to this module.
    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.fk
            .iter()
            .copied()
            .chain(std::iter::once(self.pole))
            .chain(self.ik.iter().copied())
    }

    /// Checks that the FK joints are parented root, mid, tip in the scene.
    ///
    /// # Errors
    ///
    /// Returns [`IkFkError::InvalidHierarchy`] if the mid joint is not below
    /// the root or the tip is not below the mid joint.
    pub fn validate_hierarchy<S: SceneGraph + ?Sized>(&self, scene: &S) -> Result<()> {
        for pair in self.fk.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            let descendants = scene.list_relatives(upper, RelativeFilter::AllDescendants)?;
            if !descendants.contains(&lower) {
                return Err(IkFkError::InvalidHierarchy(format!(
                    "in '{}', {} is not below {}",
                    self.name,
                    scene.name(lower)?,
                    scene.name(upper)?
                )));
            }
        }
        Ok(())
    }
}
