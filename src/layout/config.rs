//! Options for constraint synthesis

use crate::parser::ast::Orientation;

use super::types::{Attribute, FormatAlignment};

/// Which attribute pair the horizontal axis uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatDirection {
    /// leading/trailing, follows the host's writing direction
    #[default]
    LeadingToTrailing,
    /// left/right regardless of writing direction
    LeftToRight,
    /// right/left regardless of writing direction
    RightToLeft,
}

/// What plain adjacency (`[a][b]`, `|[a]`) means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adjacency {
    /// Same as `-`: standard spacing between views, standard margin to the container
    #[default]
    StandardSpacing,
    /// Edges touch: constant 0
    Flush,
}

/// Configuration options for one parse call
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Used only when the format has no `H:`/`V:` prefix
    pub orientation: Orientation,

    /// Horizontal attribute pair
    pub direction: FormatDirection,

    /// Alignment flags, passed through to the result
    pub alignment: FormatAlignment,

    /// Gap between sibling views for `-`
    pub standard_spacing: f64,

    /// Gap between a view and the container edge for `|-`
    pub superview_margin: f64,

    /// Meaning of elements written next to each other
    pub adjacency: Adjacency,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            direction: FormatDirection::LeadingToTrailing,
            alignment: FormatAlignment::empty(),
            standard_spacing: 8.0,
            superview_margin: 20.0,
            adjacency: Adjacency::StandardSpacing,
        }
    }
}

impl LayoutOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orientation used when the format has no prefix
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the horizontal attribute pair
    pub fn with_direction(mut self, direction: FormatDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the alignment flags
    pub fn with_alignment(mut self, alignment: FormatAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the spacing between sibling views
    pub fn with_standard_spacing(mut self, spacing: f64) -> Self {
        self.standard_spacing = spacing;
        self
    }

    /// Set the spacing to the container edges
    pub fn with_superview_margin(mut self, margin: f64) -> Self {
        self.superview_margin = margin;
        self
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Attributes every constraint of a parse along `orientation` uses
    pub fn axis(&self, orientation: Orientation) -> Axis {
        match orientation {
            Orientation::Vertical => Axis {
                leading: Attribute::Top,
                trailing: Attribute::Bottom,
                size: Attribute::Height,
                reversed: false,
            },
            Orientation::Horizontal => {
                let (leading, trailing) = match self.direction {
                    FormatDirection::LeadingToTrailing => (Attribute::Leading, Attribute::Trailing),
                    FormatDirection::LeftToRight => (Attribute::Left, Attribute::Right),
                    FormatDirection::RightToLeft => (Attribute::Right, Attribute::Left),
                };
                Axis {
                    leading,
                    trailing,
                    size: Attribute::Width,
                    reversed: self.direction == FormatDirection::RightToLeft,
                }
            }
        }
    }
}

/// Attribute selection for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    /// Edge the format starts from
    pub leading: Attribute,
    /// Edge the format ends at
    pub trailing: Attribute,
    pub size: Attribute,
    /// Leading edge has the larger coordinate, so gaps are subtracted
    pub reversed: bool,
}
