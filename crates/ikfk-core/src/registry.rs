//! Registry of limb modules for one editing session.

use std::collections::{BTreeMap, HashMap};

use crate::error::{IkFkError, Result};
use crate::module::LimbModule;
use crate::scene::ObjectId;

/// Modules keyed by name, plus a reverse map from every constituent object
/// to the module that owns it.
///
/// The reverse map turns an object selection into the set of modules to
/// operate on.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    /// Map from module name -> module.
    modules: BTreeMap<String, LimbModule>,
    /// Map from object -> owning module name.
    owners: HashMap<ObjectId, String>,
}

impl SelectionSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module.
    ///
    /// Returns an error if a module with the same name already exists.
    pub fn insert(&mut self, module: LimbModule) -> Result<()> {
        if self.modules.contains_key(module.name()) {
            return Err(IkFkError::ModuleExists(module.name().to_string()));
        }
        self.insert_or_replace(module);
        Ok(())
    }

    /// Registers a module, replacing any module of the same name.
    ///
    /// Returns the replaced module.
    pub fn insert_or_replace(&mut self, module: LimbModule) -> Option<LimbModule> {
        let previous = self.remove(module.name());
        let name = module.name().to_string();
        for object in module.objects() {
            self.owners.insert(object, name.clone());
        }
        self.modules.insert(name, module);
        previous
    }

    /// Gets a module by name.
    pub fn get(&self, name: &str) -> Option<&LimbModule> {
        self.modules.get(name)
    }

    /// Gets a module by name, failing if it is not registered.
    pub fn get_required(&self, name: &str) -> Result<&LimbModule> {
        self.get(name)
            .ok_or_else(|| IkFkError::ModuleNotFound(name.to_string()))
    }

    /// Checks if a module with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Removes a module by name, along with its reverse entries.
    pub fn remove(&mut self, name: &str) -> Option<LimbModule> {
        let module = self.modules.remove(name)?;
        self.owners.retain(|_, owner| owner != name);
        Some(module)
    }

    /// Removes all modules.
    pub fn clear(&mut self) {
        self.modules.clear();
        self.owners.clear();
    }

    /// Returns the name of the module owning `object`.
    pub fn owner_of(&self, object: ObjectId) -> Option<&str> {
        self.owners.get(&object).map(String::as_str)
    }

    /// Returns the modules touched by `selected`, once each, in the order
    /// they were first hit. Objects outside every module are ignored.
    pub fn modules_for_selection(&self, selected: &[ObjectId]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for object in selected {
            if let Some(owner) = self.owner_of(*object) {
                if !names.iter().any(|n| n == owner) {
                    names.push(owner.to_string());
                }
            }
        }
        names
    }

    /// Picks the modules an operation should run on.
    ///
    /// An explicit, non-empty list wins. Otherwise the modules owning the
    /// selected objects are used, and if the selection hits no module every
    /// registered module is used. Explicit names are returned as given, even
    /// if they are not registered, so the caller can report them.
    pub fn resolve_targets<S: AsRef<str>>(
        &self,
        explicit: Option<&[S]>,
        selected: &[ObjectId],
    ) -> Vec<String> {
        if let Some(names) = explicit.filter(|n| !n.is_empty()) {
            return names.iter().map(|n| n.as_ref().to_string()).collect();
        }

        let from_selection = self.modules_for_selection(selected);
        if !from_selection.is_empty() {
            return from_selection;
        }

        self.names().map(str::to_string).collect()
    }

    /// Returns the registered module names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Returns an iterator over all modules.
    pub fn iter(&self) -> impl Iterator<Item = &LimbModule> {
        self.modules.values()
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
