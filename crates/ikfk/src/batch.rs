//! Matching several modules at once.

use ikfk_core::{IkFkError, SceneGraph, Selection, SelectionSet, SwitchOptions};

use crate::matcher::{match_module, MatchDirection};

/// Outcome of [`match_modules`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Modules that were matched, in processing order.
    pub matched: Vec<String>,
    /// Modules that failed, with the reason. A failure never stops the
    /// remaining modules.
    pub failures: Vec<(String, IkFkError)>,
}

impl BatchReport {
    /// Returns true if every targeted module was matched.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the failure recorded for `module`, if any.
    pub fn failure(&self, module: &str) -> Option<&IkFkError> {
        self.failures
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, err)| err)
    }
}

/// Matches every targeted module in `direction`.
///
/// Targets are `names` when given and non-empty, otherwise the modules
/// owning the host's selected objects, otherwise every registered module.
pub fn match_modules<H, S>(
    host: &mut H,
    set: &SelectionSet,
    direction: MatchDirection,
    names: Option<&[S]>,
    options: &SwitchOptions,
) -> BatchReport
where
    H: SceneGraph + Selection + ?Sized,
    S: AsRef<str>,
{
    let targets = set.resolve_targets(names, &host.selected_object_ids());
    let mut report = BatchReport::default();

    for name in targets {
        let result = set
            .get_required(&name)
            .and_then(|module| match_module(host, module, direction, options));
        match result {
            Ok(()) => report.matched.push(name),
            Err(err) => {
                log::warn!("matching '{name}' ({direction:?}) failed: {err}");
                report.failures.push((name, err));
            }
        }
    }

    report
}
