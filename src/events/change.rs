//! # Coarse change codes for catch-all listeners.
//!
//! Every engine event collapses into exactly one [`ChangeCode`]; payload flags
//! select between sibling codes (animated vs. not, partial vs. fully rendered).
//! The mapping lives on each payload type ([`Payload::change_code`](crate::Payload::change_code))
//! and on [`MapEvent::change_code`](crate::MapEvent::change_code).
//!
//! ## Wire codes
//! Codes also have a stable `u8` value matching the engine's integer
//! constants, in declaration order:
//! ```text
//!  0 REGION_WILL_CHANGE                  8 WILL_START_RENDERING_FRAME
//!  1 REGION_WILL_CHANGE_ANIMATED         9 DID_FINISH_RENDERING_FRAME
//!  2 REGION_IS_CHANGING                 10 DID_FINISH_RENDERING_FRAME_FULLY_RENDERED
//!  3 REGION_DID_CHANGE                  11 WILL_START_RENDERING_MAP
//!  4 REGION_DID_CHANGE_ANIMATED         12 DID_FINISH_RENDERING_MAP
//!  5 WILL_START_LOADING_MAP             13 DID_FINISH_RENDERING_MAP_FULLY_RENDERED
//!  6 DID_FINISH_LOADING_MAP             14 DID_FINISH_LOADING_STYLE
//!  7 DID_FAIL_LOADING_MAP               15 SOURCE_DID_CHANGE
//! ```

use std::fmt;

use crate::error::DispatchError;

/// Coarse classification of an engine event and its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChangeCode {
    RegionWillChange = 0,
    RegionWillChangeAnimated = 1,
    RegionIsChanging = 2,
    RegionDidChange = 3,
    RegionDidChangeAnimated = 4,
    WillStartLoadingMap = 5,
    DidFinishLoadingMap = 6,
    DidFailLoadingMap = 7,
    WillStartRenderingFrame = 8,
    DidFinishRenderingFrame = 9,
    DidFinishRenderingFrameFullyRendered = 10,
    WillStartRenderingMap = 11,
    DidFinishRenderingMap = 12,
    DidFinishRenderingMapFullyRendered = 13,
    DidFinishLoadingStyle = 14,
    SourceDidChange = 15,
}

impl ChangeCode {
    /// Every code, ordered by wire value.
    pub const ALL: [ChangeCode; 16] = [
        ChangeCode::RegionWillChange,
        ChangeCode::RegionWillChangeAnimated,
        ChangeCode::RegionIsChanging,
        ChangeCode::RegionDidChange,
        ChangeCode::RegionDidChangeAnimated,
        ChangeCode::WillStartLoadingMap,
        ChangeCode::DidFinishLoadingMap,
        ChangeCode::DidFailLoadingMap,
        ChangeCode::WillStartRenderingFrame,
        ChangeCode::DidFinishRenderingFrame,
        ChangeCode::DidFinishRenderingFrameFullyRendered,
        ChangeCode::WillStartRenderingMap,
        ChangeCode::DidFinishRenderingMap,
        ChangeCode::DidFinishRenderingMapFullyRendered,
        ChangeCode::DidFinishLoadingStyle,
        ChangeCode::SourceDidChange,
    ];

    /// Returns the stable wire value.
    #[inline]
    pub fn as_raw(self) -> u8 {
        self as u8
    }

    /// Returns the upper snake-case name (`"REGION_DID_CHANGE"`).
    pub fn as_label(self) -> &'static str {
        match self {
            ChangeCode::RegionWillChange => "REGION_WILL_CHANGE",
            ChangeCode::RegionWillChangeAnimated => "REGION_WILL_CHANGE_ANIMATED",
            ChangeCode::RegionIsChanging => "REGION_IS_CHANGING",
            ChangeCode::RegionDidChange => "REGION_DID_CHANGE",
            ChangeCode::RegionDidChangeAnimated => "REGION_DID_CHANGE_ANIMATED",
            ChangeCode::WillStartLoadingMap => "WILL_START_LOADING_MAP",
            ChangeCode::DidFinishLoadingMap => "DID_FINISH_LOADING_MAP",
            ChangeCode::DidFailLoadingMap => "DID_FAIL_LOADING_MAP",
            ChangeCode::WillStartRenderingFrame => "WILL_START_RENDERING_FRAME",
            ChangeCode::DidFinishRenderingFrame => "DID_FINISH_RENDERING_FRAME",
            ChangeCode::DidFinishRenderingFrameFullyRendered => {
                "DID_FINISH_RENDERING_FRAME_FULLY_RENDERED"
            }
            ChangeCode::WillStartRenderingMap => "WILL_START_RENDERING_MAP",
            ChangeCode::DidFinishRenderingMap => "DID_FINISH_RENDERING_MAP",
            ChangeCode::DidFinishRenderingMapFullyRendered => {
                "DID_FINISH_RENDERING_MAP_FULLY_RENDERED"
            }
            ChangeCode::DidFinishLoadingStyle => "DID_FINISH_LOADING_STYLE",
            ChangeCode::SourceDidChange => "SOURCE_DID_CHANGE",
        }
    }
}

impl fmt::Display for ChangeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl From<ChangeCode> for u8 {
    fn from(code: ChangeCode) -> Self {
        code.as_raw()
    }
}

impl TryFrom<u8> for ChangeCode {
    type Error = DispatchError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        ChangeCode::ALL
            .get(usize::from(raw))
            .copied()
            .ok_or(DispatchError::UnknownChangeCode { raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_ordered_by_raw_value() {
        for (i, code) in ChangeCode::ALL.iter().enumerate() {
            assert_eq!(usize::from(code.as_raw()), i, "{code} out of place");
        }
    }

    #[test]
    fn test_try_from_raw() {
        assert_eq!(ChangeCode::try_from(3u8).ok(), Some(ChangeCode::RegionDidChange));
        assert_eq!(ChangeCode::try_from(15u8).ok(), Some(ChangeCode::SourceDidChange));

        let err = ChangeCode::try_from(16u8).unwrap_err();
        assert_eq!(err.as_label(), "unknown_change_code");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ChangeCode::RegionWillChange.to_string(), "REGION_WILL_CHANGE");
        assert_eq!(
            ChangeCode::DidFinishRenderingFrameFullyRendered.as_label(),
            "DID_FINISH_RENDERING_FRAME_FULLY_RENDERED"
        );
    }
}
