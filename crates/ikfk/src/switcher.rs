//! Session object bundling the registered modules with their options.

use ikfk_core::{
    FrameRange, Host, LimbModule, LimbNames, Result, SceneGraph, Selection, SelectionSet,
    SwitchOptions,
};

use crate::bake::{bake, BakeReport};
use crate::batch::{match_modules, BatchReport};
use crate::matcher::MatchDirection;

/// The IK/FK switch for one editing session.
///
/// Holds the modules found in the scene and the options every action runs
/// with. Options are only changed through [`Switcher::set_options`].
#[derive(Debug, Clone, Default)]
pub struct Switcher {
    modules: SelectionSet,
    options: SwitchOptions,
}

impl Switcher {
    /// Creates an empty switcher with the given options.
    pub fn new(options: SwitchOptions) -> Self {
        Self {
            modules: SelectionSet::new(),
            options,
        }
    }

    /// Returns the current options.
    pub fn options(&self) -> &SwitchOptions {
        &self.options
    }

    /// Replaces the options.
    pub fn set_options(&mut self, options: SwitchOptions) {
        self.options = options;
    }

    /// Returns the registered modules.
    pub fn modules(&self) -> &SelectionSet {
        &self.modules
    }

    /// Registers a module built from resolved handles.
    pub fn register(&mut self, module: LimbModule) -> Result<()> {
        log::debug!("registering module '{}'", module.name());
        self.modules.insert(module)
    }

    /// Resolves a module by object names, checks its FK hierarchy and
    /// registers it.
    pub fn register_names<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &S,
        name: &str,
        names: &LimbNames,
    ) -> Result<()> {
        let module = LimbModule::resolve(scene, name, names)?;
        module.validate_hierarchy(scene)?;
        self.register(module)
    }

    /// Forgets every registered module, ahead of a re-scan.
    pub fn clear(&mut self) {
        self.modules.clear();
    }

    /// Matches the targeted modules in `direction`.
    pub fn match_modules<H, S>(
        &self,
        host: &mut H,
        direction: MatchDirection,
        names: Option<&[S]>,
    ) -> BatchReport
    where
        H: SceneGraph + Selection + ?Sized,
        S: AsRef<str>,
    {
        match_modules(host, &self.modules, direction, names, &self.options)
    }

    /// Snaps the IK controls of the targeted modules onto their FK pose.
    pub fn snap_ik_to_fk<H, S>(&self, host: &mut H, names: Option<&[S]>) -> BatchReport
    where
        H: SceneGraph + Selection + ?Sized,
        S: AsRef<str>,
    {
        self.match_modules(host, MatchDirection::IkToFk, names)
    }

    /// Snaps the FK joints of the targeted modules onto their IK pose.
    pub fn snap_fk_to_ik<H, S>(&self, host: &mut H, names: Option<&[S]>) -> BatchReport
    where
        H: SceneGraph + Selection + ?Sized,
        S: AsRef<str>,
    {
        self.match_modules(host, MatchDirection::FkToIk, names)
    }

    /// Bakes the IK controls onto the FK animation ("IK follows FK").
    pub fn bake_ik_to_fk<H, S>(
        &self,
        host: &mut H,
        names: Option<&[S]>,
        range: Option<FrameRange>,
    ) -> Result<BakeReport>
    where
        H: Host + ?Sized,
        S: AsRef<str>,
    {
        bake(
            host,
            &self.modules,
            MatchDirection::IkToFk,
            names,
            range,
            &self.options,
        )
    }

    /// Bakes the FK joints onto the IK animation ("FK follows IK").
    pub fn bake_fk_to_ik<H, S>(
        &self,
        host: &mut H,
        names: Option<&[S]>,
        range: Option<FrameRange>,
    ) -> Result<BakeReport>
    where
        H: Host + ?Sized,
        S: AsRef<str>,
    {
        bake(
            host,
            &self.modules,
            MatchDirection::FkToIk,
            names,
            range,
            &self.options,
        )
    }
}
