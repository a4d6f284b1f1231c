//! VFL Layout - Visual Format Language parser and constraint synthesizer
//!
//! This library turns compact layout descriptions such as
//! `H:|-[button]-[field(>=120)]-|` into ordered, structured constraint
//! records. Views are opaque handles of any `Clone` type supplied by the
//! host, which also applies the records to its own layout system.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use vfl_layout::{parse, LayoutOptions};
//!
//! let views: HashMap<String, u32> = [("a".to_string(), 1), ("b".to_string(), 2)]
//!     .into_iter()
//!     .collect();
//!
//! let records = parse("H:[a]-[b]", &LayoutOptions::default(), &HashMap::new(), &views).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].to_string(), "2.leading == 1.trailing + 8");
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod parser;

pub use config::{Config, ConfigError};
pub use error::ParseError;
pub use layout::{
    Adjacency, Attribute, ConstraintRecord, FormatAlignment, FormatDirection, FormatLayout,
    LayoutOptions, Metrics, Participant, Priority, Views,
};
pub use parser::{tokenize, Orientation, Relation, Token};

/// One parse request: a format string with the tables it is resolved against
///
/// Borrowed read-only for the duration of the call.
#[derive(Debug, Clone, Copy)]
pub struct FormatSpec<'a, V> {
    pub format: &'a str,
    pub options: &'a LayoutOptions,
    pub metrics: &'a Metrics,
    pub views: &'a Views<V>,
}

impl<'a, V: Clone> FormatSpec<'a, V> {
    pub fn new(
        format: &'a str,
        options: &'a LayoutOptions,
        metrics: &'a Metrics,
        views: &'a Views<V>,
    ) -> Self {
        Self {
            format,
            options,
            metrics,
            views,
        }
    }

    /// Tokenize and synthesize, returning only the constraint records
    pub fn parse(&self) -> Result<Vec<ConstraintRecord<V>>, ParseError> {
        self.parse_layout().map(|layout| layout.constraints)
    }

    /// Tokenize and synthesize, returning the full layout
    pub fn parse_layout(&self) -> Result<FormatLayout<V>, ParseError> {
        let tokens = tokenize(self.format)?;
        layout::synthesize_layout(&tokens, self.metrics, self.views, self.options)
    }
}

/// Parse a visual format into constraint records
///
/// This is the main entry point for the library. Parsing is all-or-nothing:
/// the first error is returned and no records accompany it.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use vfl_layout::{parse, LayoutOptions, ParseError};
///
/// let views: HashMap<String, &str> = HashMap::new();
/// let err = parse("H:[missing]", &LayoutOptions::default(), &HashMap::new(), &views).unwrap_err();
/// assert!(matches!(err, ParseError::UnknownView { .. }));
/// ```
pub fn parse<V: Clone>(
    format: &str,
    options: &LayoutOptions,
    metrics: &Metrics,
    views: &Views<V>,
) -> Result<Vec<ConstraintRecord<V>>, ParseError> {
    FormatSpec::new(format, options, metrics, views).parse()
}

/// Parse a visual format, keeping orientation, alignment and view order
/// alongside the records
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use vfl_layout::{parse_layout, LayoutOptions, Orientation};
///
/// let views: HashMap<String, char> = [("top".to_string(), 't'), ("bottom".to_string(), 'b')]
///     .into_iter()
///     .collect();
///
/// let options = LayoutOptions::default();
/// let layout = parse_layout("V:|[top]-[bottom]|", &options, &HashMap::new(), &views).unwrap();
/// assert_eq!(layout.orientation, Orientation::Vertical);
/// assert_eq!(layout.views, vec!["top", "bottom"]);
/// assert_eq!(layout.constraints.len(), 3);
/// ```
pub fn parse_layout<V: Clone>(
    format: &str,
    options: &LayoutOptions,
    metrics: &Metrics,
    views: &Views<V>,
) -> Result<FormatLayout<V>, ParseError> {
    FormatSpec::new(format, options, metrics, views).parse_layout()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views(names: &[&'static str]) -> Views<&'static str> {
        names.iter().map(|n| (n.to_string(), *n)).collect()
    }

    fn parse_with(format: &str, names: &[&'static str]) -> Vec<ConstraintRecord<&'static str>> {
        parse(format, &LayoutOptions::default(), &Metrics::new(), &views(names)).unwrap()
    }

    #[test]
    fn test_pair_yields_one_spacing_record() {
        let records = parse_with("H:[a]-[b]", &["a", "b"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].constant, 8.0);
        assert_eq!(records[0].first, Participant::View("b"));
        assert_eq!(records[0].second, Some(Participant::View("a")));
    }

    #[test]
    fn test_single_view_between_bars() {
        let records = parse_with("H:|[a]|", &["a"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].second, Some(Participant::Superview));
        assert_eq!(records[0].first_attribute, Attribute::Leading);
        assert_eq!(records[1].second, Some(Participant::Superview));
        assert_eq!(records[1].first_attribute, Attribute::Trailing);
    }

    #[test]
    fn test_fixed_width_record() {
        let records = parse_with("H:[a(50)]", &["a"]);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.first, Participant::View("a"));
        assert_eq!(record.first_attribute, Attribute::Width);
        assert_eq!(record.relation, Relation::Equal);
        assert_eq!(record.constant, 50.0);
        assert_eq!(record.second, None);
    }

    #[test]
    fn test_prioritized_width_record() {
        let records = parse_with("H:[a(>=50@750)]", &["a"]);
        assert_eq!(records[0].relation, Relation::GreaterThanOrEqual);
        assert_eq!(records[0].constant, 50.0);
        assert_eq!(records[0].priority.value(), 750.0);
    }

    #[test]
    fn test_unknown_view_and_metric() {
        let empty: Views<&str> = Views::new();
        let options = LayoutOptions::default();
        let err = parse("H:[missing]", &options, &Metrics::new(), &empty).unwrap_err();
        assert!(matches!(err, ParseError::UnknownView { ref name, .. } if name == "missing"));

        let err = parse("H:[a(spacing)]", &options, &Metrics::new(), &views(&["a"])).unwrap_err();
        assert!(matches!(err, ParseError::UnknownMetric { ref name, .. } if name == "spacing"));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let metrics: Metrics = [("pad".to_string(), 4.0)].into_iter().collect();
        let names = views(&["a", "b", "c"]);
        let options = LayoutOptions::default();
        let format = "H:|-pad-[a(>=40)]-(>=8@500)-[b(==a)][c]-|";
        let first = parse(format, &options, &metrics, &names).unwrap();
        let second = parse(format, &options, &metrics, &names).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_orientation_vertical() {
        let options = LayoutOptions::default().with_orientation(Orientation::Vertical);
        let records = parse("[a]-[b]", &options, &Metrics::new(), &views(&["a", "b"])).unwrap();
        assert_eq!(records[0].first_attribute, Attribute::Top);
        assert_eq!(records[0].second_attribute, Attribute::Bottom);
    }

    #[test]
    fn test_chain_order() {
        let records = parse_with("H:[a]-[b]-[c]", &["a", "b", "c"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first, Participant::View("b"));
        assert_eq!(records[1].first, Participant::View("c"));
    }

    #[test]
    fn test_format_spec_matches_free_function() {
        let options = LayoutOptions::default();
        let metrics = Metrics::new();
        let names = views(&["a"]);
        let spec = FormatSpec::new("|-[a]-|", &options, &metrics, &names);
        assert_eq!(spec.parse().unwrap(), parse_with("|-[a]-|", &["a"]));
    }

    #[test]
    fn test_error_leaves_no_partial_output() {
        let result = parse(
            "H:|-[a]-[b]-[ghost]",
            &LayoutOptions::default(),
            &Metrics::new(),
            &views(&["a", "b"]),
        );
        assert!(matches!(result, Err(ParseError::UnknownView { .. })));
    }
}
