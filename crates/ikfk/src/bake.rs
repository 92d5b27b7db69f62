//! Baking one representation onto the other across a frame range.
//!
//! Frames are processed strictly in order: each matcher call reads the scene
//! as left by the previous frame's writes and keys.

use std::ops::ControlFlow;

use ikfk_core::{FrameRange, Host, IkFkError, LimbModule, Result, SelectionSet, SwitchOptions};

use crate::matcher::{match_module, MatchDirection};

/// A module that could not be matched or keyed on one frame.
#[derive(Debug)]
pub struct FrameFailure {
    /// Frame of the failure, `None` if the module was never looked up.
    pub frame: Option<i32>,
    /// Module name.
    pub module: String,
    /// Reason.
    pub error: IkFkError,
}

/// Outcome of [`bake`].
#[derive(Debug)]
pub struct BakeReport {
    /// Frames that were requested.
    pub range: FrameRange,
    /// Modules that took part.
    pub modules: Vec<String>,
    /// Last frame that was fully processed.
    pub last_frame: Option<i32>,
    /// Number of frames fully processed.
    pub frames_baked: usize,
    /// Number of module keys committed.
    pub keys_set: usize,
    /// Per-frame failures; the bake carried on past each of them.
    pub failures: Vec<FrameFailure>,
    /// True if the progress callback stopped the bake early.
    pub cancelled: bool,
}

impl BakeReport {
    /// Returns true if every frame was baked for every module.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty() && self.frames_baked == self.range.len()
    }
}

/// Picks the frames to bake: an explicit range, then the configured one,
/// then the host's playback range.
pub fn resolve_range<H: Host + ?Sized>(
    host: &H,
    range: Option<FrameRange>,
    options: &SwitchOptions,
) -> Result<FrameRange> {
    match range.or(options.frame_range) {
        Some(range) => Ok(range),
        None => {
            let (start, end) = host.playback_range();
            FrameRange::new(start, end)
        }
    }
}

/// Bakes `direction` over a frame range for the targeted modules.
///
/// See [`bake_with`].
pub fn bake<H, S>(
    host: &mut H,
    set: &SelectionSet,
    direction: MatchDirection,
    names: Option<&[S]>,
    range: Option<FrameRange>,
    options: &SwitchOptions,
) -> Result<BakeReport>
where
    H: Host + ?Sized,
    S: AsRef<str>,
{
    bake_with(host, set, direction, names, range, options, |_| {
        ControlFlow::Continue(())
    })
}

/// Bakes `direction` over a frame range, calling `on_frame` after each
/// completed frame. Returning [`ControlFlow::Break`] stops before the next
/// frame.
///
/// For every frame the playhead is moved, each module is matched, and the
/// driven objects get their key at that frame replaced. Modules are targeted
/// as in [`crate::match_modules`].
///
/// # Errors
///
/// Returns [`IkFkError::InvalidRange`] before touching the timeline if the
/// resolved range is inverted. Failures of single modules are collected in
/// the report instead.
pub fn bake_with<H, S, F>(
    host: &mut H,
    set: &SelectionSet,
    direction: MatchDirection,
    names: Option<&[S]>,
    range: Option<FrameRange>,
    options: &SwitchOptions,
    mut on_frame: F,
) -> Result<BakeReport>
where
    H: Host + ?Sized,
    S: AsRef<str>,
    F: FnMut(i32) -> ControlFlow<()>,
{
    let range = resolve_range(host, range, options)?;

    let mut failures = Vec::new();
    let mut modules: Vec<&LimbModule> = Vec::new();
    for name in set.resolve_targets(names, &host.selected_object_ids()) {
        match set.get_required(&name) {
            Ok(module) => modules.push(module),
            Err(error) => {
                log::warn!("bake: {error}");
                failures.push(FrameFailure {
                    frame: None,
                    module: name,
                    error,
                });
            }
        }
    }

    let mut report = BakeReport {
        range,
        modules: modules.iter().map(|m| m.name().to_string()).collect(),
        last_frame: None,
        frames_baked: 0,
        keys_set: 0,
        failures,
        cancelled: false,
    };

    log::info!(
        "baking {direction:?} for {} module(s) over frames {}..={}",
        modules.len(),
        range.start(),
        range.end()
    );

    for frame in range.frames() {
        host.set_current_frame(frame);
        log::debug!("bake: frame {frame}");

        for module in &modules {
            let driven = direction.driven_objects(module);
            let result = match_module(host, module, direction, options).and_then(|()| {
                host.remove_key(&driven, frame)?;
                host.set_key(&driven, &options.key_channels, frame)
            });
            match result {
                Ok(()) => report.keys_set += 1,
                Err(error) => {
                    log::warn!("bake: '{}' at frame {frame}: {error}", module.name());
                    report.failures.push(FrameFailure {
                        frame: Some(frame),
                        module: module.name().to_string(),
                        error,
                    });
                }
            }
        }

        report.frames_baked += 1;
        report.last_frame = Some(frame);

        if on_frame(frame).is_break() {
            report.cancelled = frame != range.end();
            break;
        }
    }

    log::info!(
        "bake finished: {} frame(s), {} key(s), {} failure(s){}",
        report.frames_baked,
        report.keys_set,
        report.failures.len(),
        if report.cancelled { ", cancelled" } else { "" }
    );
    Ok(report)
}
