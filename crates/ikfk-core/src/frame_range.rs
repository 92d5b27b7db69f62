//! Inclusive frame ranges for baking.

use serde::{Deserialize, Serialize};

use crate::error::{IkFkError, Result};

/// An inclusive `[start, end]` range of integer frames with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFrameRange")]
pub struct FrameRange {
    start: i32,
    end: i32,
}

#[derive(Deserialize)]
struct RawFrameRange {
    start: i32,
    end: i32,
}

impl TryFrom<RawFrameRange> for FrameRange {
    type Error = IkFkError;

    fn try_from(raw: RawFrameRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl FrameRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`IkFkError::InvalidRange`] if `start > end`.
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(IkFkError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range holding a single frame.
    #[must_use]
    pub fn single(frame: i32) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    /// First frame.
    #[must_use]
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Last frame, inclusive.
    #[must_use]
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of frames in the range.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        usize::try_from(i64::from(self.end) - i64::from(self.start) + 1).unwrap_or(usize::MAX)
    }

    /// Returns true if `frame` lies inside the range.
    #[must_use]
    pub fn contains(&self, frame: i32) -> bool {
        (self.start..=self.end).contains(&frame)
    }

    /// Iterates the frames in ascending order.
    pub fn frames(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}
