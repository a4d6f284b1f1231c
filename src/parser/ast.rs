//! Token sequence produced by the VFL tokenizer
//!
//! A visual format string folds into a flat, ordered list of [`Token`]s. The
//! order is the order of elements along the axis, so consumers walk the list
//! front to back.

use std::fmt;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (ASCII alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis a format string lays its elements out along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// `H:` - leading to trailing
    #[default]
    Horizontal,
    /// `V:` - top to bottom
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "H"),
            Orientation::Vertical => write!(f, "V"),
        }
    }
}

/// Relation between the two sides of a predicate or constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relation {
    #[default]
    Equal,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Relation {
    /// Relation that holds after both sides are negated
    pub fn mirrored(self) -> Self {
        match self {
            Relation::Equal => Relation::Equal,
            Relation::LessThanOrEqual => Relation::GreaterThanOrEqual,
            Relation::GreaterThanOrEqual => Relation::LessThanOrEqual,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Equal => write!(f, "=="),
            Relation::LessThanOrEqual => write!(f, "<="),
            Relation::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Size attribute a cross-view predicate may name explicitly (`b.height`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAttribute {
    Width,
    Height,
}

impl SizeAttribute {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            _ => None,
        }
    }
}

impl fmt::Display for SizeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeAttribute::Width => write!(f, "width"),
            SizeAttribute::Height => write!(f, "height"),
        }
    }
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Literal number: `50`, `-5`
    Literal(f64),
    /// Bare name: a metric, or a view when the metrics table has no such entry
    Metric(Identifier),
    /// Explicit view reference: `b.width`, `b*2`, `b.height*0.5`
    View {
        name: Identifier,
        attribute: Option<SizeAttribute>,
        multiplier: f64,
    },
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{}", n),
            Operand::Metric(name) => write!(f, "{}", name),
            Operand::View {
                name,
                attribute,
                multiplier,
            } => {
                write!(f, "{}", name)?;
                if let Some(attr) = attribute {
                    write!(f, ".{}", attr)?;
                }
                if *multiplier != 1.0 {
                    write!(f, "*{}", multiplier)?;
                }
                Ok(())
            }
        }
    }
}

/// Priority as written: `@750` or `@high`
#[derive(Debug, Clone, PartialEq)]
pub enum PriorityValue {
    Literal(f64),
    Metric(Identifier),
}

impl fmt::Display for PriorityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityValue::Literal(n) => write!(f, "{}", n),
            PriorityValue::Metric(name) => write!(f, "{}", name),
        }
    }
}

/// A single sizing or spacing expression: `>=50@750`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub relation: Relation,
    pub object: Operand,
    pub priority: Option<PriorityValue>,
}

impl Predicate {
    /// Equality predicate without a priority, as produced by `-20-`
    pub fn simple(object: Operand) -> Self {
        Self {
            relation: Relation::Equal,
            object,
            priority: None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relation != Relation::Equal {
            write!(f, "{}", self.relation)?;
        }
        write!(f, "{}", self.object)?;
        if let Some(priority) = &self.priority {
            write!(f, "@{}", priority)?;
        }
        Ok(())
    }
}

/// Bracketed view: `[name]` or `[name(predicates)]`
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    pub name: Spanned<Identifier>,
    pub predicates: Vec<Spanned<Predicate>>,
    /// True when the view's size along the axis is constrained by the format
    pub is_variable: bool,
}

/// Connection between two elements
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    /// `-` was written; false for plain adjacency (`[a][b]`, `|[a]`)
    pub dashed: bool,
    /// Predicates of `-20-` or `-(>=20@750)-`
    pub explicit: Option<Vec<Spanned<Predicate>>>,
}

impl Gap {
    /// Elements written next to each other with nothing in between
    pub fn adjacent() -> Self {
        Self {
            dashed: false,
            explicit: None,
        }
    }

    /// A bare `-`
    pub fn standard() -> Self {
        Self {
            dashed: true,
            explicit: None,
        }
    }
}

/// One element of the token sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `H:` / `V:` prefix
    Orientation(Orientation),
    /// `|`
    SuperviewConnector,
    /// `[name(...)]`
    ViewSpec(ViewSpec),
    /// Connection between the previous and next element
    Gap(Gap),
    /// Priority of the short connection form `-20@750-`, applies to the preceding gap
    Priority(PriorityValue),
}

impl Token {
    /// Name of the view for a view-spec token
    pub fn view_name(&self) -> Option<&str> {
        match self {
            Token::ViewSpec(spec) => Some(spec.name.node.as_str()),
            _ => None,
        }
    }
}
