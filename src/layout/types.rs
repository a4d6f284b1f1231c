//! Constraint records produced by the synthesizer

use std::fmt;

use bitflags::bitflags;

use crate::parser::ast::{Orientation, Relation};

/// Layout attribute of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    Width,
    Height,
    /// Second attribute of a constant constraint (`a.width == 50`)
    NotAnAttribute,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::NotAnAttribute => "none",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Constraint priority, 1..=1000
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(pub f64);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const DEFAULT_HIGH: Priority = Priority(750.0);
    pub const DEFAULT_LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE: Priority = Priority(50.0);

    /// Priority if `value` lies in the valid range
    pub fn new(value: f64) -> Option<Self> {
        if value > 0.0 && value <= Self::REQUIRED.0 {
            Some(Priority(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// One side of a constraint: a caller-supplied view handle or the container
#[derive(Debug, Clone, PartialEq)]
pub enum Participant<V> {
    /// The enclosing container named by `|`
    Superview,
    View(V),
}

impl<V> Participant<V> {
    pub fn view(&self) -> Option<&V> {
        match self {
            Participant::View(v) => Some(v),
            Participant::Superview => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Participant<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Superview => write!(f, "superview"),
            Participant::View(v) => write!(f, "{}", v),
        }
    }
}

/// A single linear relation:
/// `first.first_attribute RELATION second.second_attribute * multiplier + constant`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRecord<V> {
    pub first: Participant<V>,
    pub first_attribute: Attribute,
    pub relation: Relation,
    /// None for constant constraints
    pub second: Option<Participant<V>>,
    pub second_attribute: Attribute,
    pub multiplier: f64,
    pub constant: f64,
    pub priority: Priority,
}

impl<V> ConstraintRecord<V> {
    /// Relation between two attributes: `first.attr REL second.attr + constant`
    pub fn between(
        first: Participant<V>,
        first_attribute: Attribute,
        relation: Relation,
        second: Participant<V>,
        second_attribute: Attribute,
        constant: f64,
    ) -> Self {
        Self {
            first,
            first_attribute,
            relation,
            second: Some(second),
            second_attribute,
            multiplier: 1.0,
            constant,
            priority: Priority::REQUIRED,
        }
    }

    /// Relation to a constant: `first.attr REL constant`
    pub fn constant(
        first: Participant<V>,
        first_attribute: Attribute,
        relation: Relation,
        constant: f64,
    ) -> Self {
        Self {
            first,
            first_attribute,
            relation,
            second: None,
            second_attribute: Attribute::NotAnAttribute,
            multiplier: 1.0,
            constant,
            priority: Priority::REQUIRED,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl<V: fmt::Display> fmt::Display for ConstraintRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} {} ", self.first, self.first_attribute, self.relation)?;
        match &self.second {
            Some(second) => {
                write!(f, "{}.{}", second, self.second_attribute)?;
                if self.multiplier != 1.0 {
                    write!(f, " * {}", self.multiplier)?;
                }
                if self.constant > 0.0 {
                    write!(f, " + {}", self.constant)?;
                } else if self.constant < 0.0 {
                    write!(f, " - {}", -self.constant)?;
                }
            }
            None => write!(f, "{}", self.constant)?,
        }
        if !self.priority.is_required() {
            write!(f, " @{}", self.priority.0)?;
        }
        Ok(())
    }
}

bitflags! {
    /// Alignment flags of the format options
    ///
    /// Passed through unconsumed: the synthesizer never turns these into
    /// constraints. Bit positions follow the attribute numbering hosts use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatAlignment: u32 {
        const ALL_LEFT = 1 << 1;
        const ALL_RIGHT = 1 << 2;
        const ALL_TOP = 1 << 3;
        const ALL_BOTTOM = 1 << 4;
        const ALL_LEADING = 1 << 5;
        const ALL_TRAILING = 1 << 6;
        const ALL_CENTER_X = 1 << 9;
        const ALL_CENTER_Y = 1 << 10;
        const ALL_LAST_BASELINE = 1 << 11;
        const ALL_FIRST_BASELINE = 1 << 12;
    }
}

impl Default for FormatAlignment {
    fn default() -> Self {
        Self::empty()
    }
}

impl FormatAlignment {
    /// Flag for a lowercase name such as `top` or `center_x`
    pub fn from_option_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::ALL_LEFT),
            "right" => Some(Self::ALL_RIGHT),
            "top" => Some(Self::ALL_TOP),
            "bottom" => Some(Self::ALL_BOTTOM),
            "leading" => Some(Self::ALL_LEADING),
            "trailing" => Some(Self::ALL_TRAILING),
            "center_x" => Some(Self::ALL_CENTER_X),
            "center_y" => Some(Self::ALL_CENTER_Y),
            "last_baseline" | "baseline" => Some(Self::ALL_LAST_BASELINE),
            "first_baseline" => Some(Self::ALL_FIRST_BASELINE),
            _ => None,
        }
    }
}

/// Everything one parse call yields
#[derive(Debug, Clone, PartialEq)]
pub struct FormatLayout<V> {
    /// Orientation in effect (explicit prefix or the default)
    pub orientation: Orientation,
    /// Alignment flags from the options, untouched
    pub alignment: FormatAlignment,
    /// View names in the order they appear along the axis
    pub views: Vec<String>,
    pub constraints: Vec<ConstraintRecord<V>>,
}
