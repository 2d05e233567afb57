//! Caption style definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Caption layouts understood by the render worker.
///
/// The backend never interprets the style; it is forwarded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionStyle {
    /// Captions along the bottom edge
    #[default]
    Bottom,
    /// Captions inside a bar at the top of the frame
    TopBar,
    /// Word-by-word highlighted captions
    Karaoke,
}

impl CaptionStyle {
    pub const ALL: &'static [CaptionStyle] = &[
        CaptionStyle::Bottom,
        CaptionStyle::TopBar,
        CaptionStyle::Karaoke,
    ];

    /// Wire name sent to the render worker.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStyle::Bottom => "bottom",
            CaptionStyle::TopBar => "top-bar",
            CaptionStyle::Karaoke => "karaoke",
        }
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptionStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bottom" => Ok(CaptionStyle::Bottom),
            "top-bar" | "top_bar" => Ok(CaptionStyle::TopBar),
            "karaoke" => Ok(CaptionStyle::Karaoke),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown caption style: {0} (expected bottom, top-bar or karaoke)")]
pub struct StyleParseError(String);
