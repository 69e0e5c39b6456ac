use std::fmt;

use thiserror::Error;

/// Border between two quadrants of a sectioned layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionBorder {
    /// Between the top-left and top-right quadrants.
    Top,
    /// Between the bottom-left and bottom-right quadrants.
    Bottom,
    /// Between the top-left and bottom-left quadrants.
    Left,
    /// Between the top-right and bottom-right quadrants.
    Right,
}

impl SectionBorder {
    /// Every border in the order crossings are carved.
    pub const ALL: [SectionBorder; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

impl fmt::Display for SectionBorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Reasons a level could not be generated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Levels are numbered from one.
    #[error("level numbers start at 1")]
    InvalidLevel,
    /// The level dimensions cannot hold the selected layout.
    #[error("maze of {width}x{height} is below the {minimum}x{minimum} minimum")]
    DimensionsTooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Smallest accepted width and height.
        minimum: u32,
    },
    /// No floor tile could host the player spawn point.
    #[error("no floor tile available for the start in a {width}x{height} maze")]
    NoStartTile {
        /// Maze width.
        width: u32,
        /// Maze height.
        height: u32,
    },
    /// No floor tile connected to the start could host the exit.
    #[error("no floor tile reachable from the start can hold the exit in a {width}x{height} maze")]
    NoExitTile {
        /// Maze width.
        width: u32,
        /// Maze height.
        height: u32,
    },
    /// A quadrant border could not be crossed.
    #[error("could not carve a passage across the {border} section border")]
    SectionsDisconnected {
        /// Border that stayed closed.
        border: SectionBorder,
    },
}
