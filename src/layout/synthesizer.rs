//! Constraint synthesis
//!
//! Walks the token sequence once, front to back, and emits records in the
//! same order: the leading container edge, then for every view its
//! connection to the previous element followed by its own size predicates,
//! and finally the trailing container edge.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::referenced_views;

use super::config::{Adjacency, Axis, LayoutOptions};
use super::types::{Attribute, ConstraintRecord, FormatLayout, Participant, Priority};

/// Named numeric substitutions
pub type Metrics = HashMap<String, f64>;

/// Named view handles
pub type Views<V> = HashMap<String, V>;

/// Name that denotes the enclosing container and cannot be used for a view
pub const SUPERVIEW_NAME: &str = "superview";

/// Synthesize the ordered constraint list for a token sequence
pub fn synthesize<V: Clone>(
    tokens: &[Spanned<Token>],
    metrics: &Metrics,
    views: &Views<V>,
    options: &LayoutOptions,
) -> Result<Vec<ConstraintRecord<V>>, ParseError> {
    synthesize_layout(tokens, metrics, views, options).map(|layout| layout.constraints)
}

/// Synthesize constraints along with the orientation, alignment and view order
pub fn synthesize_layout<V: Clone>(
    tokens: &[Spanned<Token>],
    metrics: &Metrics,
    views: &Views<V>,
    options: &LayoutOptions,
) -> Result<FormatLayout<V>, ParseError> {
    let orientation = match tokens.first().map(|t| &t.node) {
        Some(Token::Orientation(orientation)) => *orientation,
        _ => options.orientation,
    };

    let mut synthesizer = Synthesizer {
        metrics,
        views,
        options,
        axis: options.axis(orientation),
        records: Vec::new(),
    };
    synthesizer.run(tokens)?;

    debug!(
        %orientation,
        records = synthesizer.records.len(),
        "synthesized constraints"
    );

    Ok(FormatLayout {
        orientation,
        alignment: options.alignment,
        views: referenced_views(tokens),
        constraints: synthesizer.records,
    })
}

/// Spacing resolved from one gap predicate (or the standard value)
struct Spacing {
    relation: Relation,
    value: f64,
    priority: Priority,
}

struct Synthesizer<'a, V> {
    metrics: &'a Metrics,
    views: &'a Views<V>,
    options: &'a LayoutOptions,
    axis: Axis,
    records: Vec<ConstraintRecord<V>>,
}

impl<'a, V: Clone> Synthesizer<'a, V> {
    fn run(&mut self, tokens: &[Spanned<Token>]) -> Result<(), ParseError> {
        let mut previous: Option<Participant<V>> = None;
        let mut pending: Option<Gap> = None;

        for token in tokens {
            match &token.node {
                Token::Orientation(_) => {}
                Token::Gap(gap) => pending = Some(gap.clone()),
                Token::Priority(value) => {
                    if let Some(gap) = pending.as_mut() {
                        apply_connection_priority(gap, value, &token.span);
                    }
                }
                Token::SuperviewConnector => match previous.take() {
                    None => previous = Some(Participant::Superview),
                    Some(Participant::View(view)) => {
                        let gap = pending.take().unwrap_or_else(Gap::adjacent);
                        self.connect_to_superview(view, &gap)?;
                        previous = Some(Participant::Superview);
                    }
                    Some(Participant::Superview) => {
                        return Err(ParseError::UnexpectedToken {
                            position: token.span.start,
                            found: "'|'".to_string(),
                            expected: vec!["'['".to_string()],
                        })
                    }
                },
                Token::ViewSpec(spec) => {
                    let view = self.resolve_view(&spec.name)?;
                    trace!(view = %spec.name.node, variable = spec.is_variable, "resolved view");

                    if let Some(prev) = previous.take() {
                        let gap = pending.take().unwrap_or_else(Gap::adjacent);
                        match prev {
                            Participant::Superview => self.connect_from_superview(&view, &gap)?,
                            Participant::View(prev) => self.connect_views(&prev, &view, &gap)?,
                        }
                    }

                    for predicate in &spec.predicates {
                        self.size_predicate(&view, predicate)?;
                    }
                    previous = Some(Participant::View(view));
                }
            }
        }
        Ok(())
    }

    /// `[prev]-gap-[next]`: next.leading REL prev.trailing + gap
    fn connect_views(&mut self, prev: &V, next: &V, gap: &Gap) -> Result<(), ParseError> {
        for spacing in self.spacings(gap, self.options.standard_spacing)? {
            let record = self.spacing_record(
                Participant::View(next.clone()),
                self.axis.leading,
                Participant::View(prev.clone()),
                self.axis.trailing,
                spacing,
                self.axis.reversed,
            );
            self.records.push(record);
        }
        Ok(())
    }

    /// `|-gap-[view]`: view.leading REL superview.leading + gap
    fn connect_from_superview(&mut self, view: &V, gap: &Gap) -> Result<(), ParseError> {
        for spacing in self.spacings(gap, self.options.superview_margin)? {
            let record = self.spacing_record(
                Participant::View(view.clone()),
                self.axis.leading,
                Participant::Superview,
                self.axis.leading,
                spacing,
                self.axis.reversed,
            );
            self.records.push(record);
        }
        Ok(())
    }

    /// `[view]-gap-|`: view.trailing REL' superview.trailing - gap
    fn connect_to_superview(&mut self, view: V, gap: &Gap) -> Result<(), ParseError> {
        for spacing in self.spacings(gap, self.options.superview_margin)? {
            let record = self.spacing_record(
                Participant::View(view.clone()),
                self.axis.trailing,
                Participant::Superview,
                self.axis.trailing,
                spacing,
                !self.axis.reversed,
            );
            self.records.push(record);
        }
        Ok(())
    }

    /// Build an edge-to-edge record; `inverted` negates the gap, which
    /// mirrors the relation
    fn spacing_record(
        &self,
        first: Participant<V>,
        first_attribute: Attribute,
        second: Participant<V>,
        second_attribute: Attribute,
        spacing: Spacing,
        inverted: bool,
    ) -> ConstraintRecord<V> {
        let (relation, constant) = if inverted {
            (spacing.relation.mirrored(), -spacing.value)
        } else {
            (spacing.relation, spacing.value)
        };
        ConstraintRecord::between(
            first,
            first_attribute,
            relation,
            second,
            second_attribute,
            constant,
        )
        .with_priority(spacing.priority)
    }

    /// Resolve the spacings a gap stands for; `standard` is the platform
    /// value for the gap's position
    fn spacings(&self, gap: &Gap, standard: f64) -> Result<Vec<Spacing>, ParseError> {
        let predicates = match &gap.explicit {
            Some(predicates) => predicates,
            None => {
                let value = match (gap.dashed, self.options.adjacency) {
                    (false, Adjacency::Flush) => 0.0,
                    _ => standard,
                };
                return Ok(vec![Spacing {
                    relation: Relation::Equal,
                    value,
                    priority: Priority::REQUIRED,
                }]);
            }
        };

        predicates
            .iter()
            .map(|predicate| {
                let value = match &predicate.node.object {
                    Operand::Literal(n) => *n,
                    Operand::Metric(name) => self.metric(name, &predicate.span)?,
                    Operand::View { .. } => {
                        return Err(ParseError::invalid_predicate(
                            predicate.node.to_string(),
                            predicate.span.clone(),
                        ))
                    }
                };
                Ok(Spacing {
                    relation: predicate.node.relation,
                    value,
                    priority: self.priority(predicate)?,
                })
            })
            .collect()
    }

    /// `[view(predicate)]`: a size constraint on the view along the axis
    fn size_predicate(
        &mut self,
        view: &V,
        predicate: &Spanned<Predicate>,
    ) -> Result<(), ParseError> {
        let size = self.axis.size;
        let span = &predicate.span;
        let relation = predicate.node.relation;
        let priority = self.priority(predicate)?;
        let first = Participant::View(view.clone());

        let record = match &predicate.node.object {
            Operand::Literal(n) => ConstraintRecord::constant(first, size, relation, *n),
            Operand::Metric(name) => match self.metrics.get(name.as_str()) {
                Some(value) => ConstraintRecord::constant(first, size, relation, *value),
                // A bare name that is not a metric may name another view: `[a(==b)]`
                None if self.names_view(name) => {
                    let other = self.resolve_view(&Spanned::new(name.clone(), span.clone()))?;
                    let second = Participant::View(other);
                    ConstraintRecord::between(first, size, relation, second, size, 0.0)
                }
                None => return Err(ParseError::unknown_metric(name.as_str(), span.clone())),
            },
            Operand::View {
                name,
                attribute,
                multiplier,
            } => {
                let other = self.resolve_view(&Spanned::new(name.clone(), span.clone()))?;
                let second_attribute = match attribute {
                    Some(SizeAttribute::Width) => Attribute::Width,
                    Some(SizeAttribute::Height) => Attribute::Height,
                    None => size,
                };
                ConstraintRecord::between(
                    first,
                    size,
                    relation,
                    Participant::View(other),
                    second_attribute,
                    0.0,
                )
                .with_multiplier(*multiplier)
            }
        };

        self.records.push(record.with_priority(priority));
        Ok(())
    }

    /// Whether a bare name refers to a view (or the reserved container name)
    fn names_view(&self, name: &Identifier) -> bool {
        self.views.contains_key(name.as_str()) || name.as_str() == SUPERVIEW_NAME
    }

    fn resolve_view(&self, name: &Spanned<Identifier>) -> Result<V, ParseError> {
        if name.node.as_str() == SUPERVIEW_NAME {
            return Err(ParseError::ReservedViewName {
                name: name.node.0.clone(),
                span: name.span.clone(),
            });
        }
        self.views
            .get(name.node.as_str())
            .cloned()
            .ok_or_else(|| ParseError::unknown_view(name.node.as_str(), name.span.clone()))
    }

    fn metric(&self, name: &Identifier, span: &Span) -> Result<f64, ParseError> {
        self.metrics
            .get(name.as_str())
            .copied()
            .ok_or_else(|| ParseError::unknown_metric(name.as_str(), span.clone()))
    }

    fn priority(&self, predicate: &Spanned<Predicate>) -> Result<Priority, ParseError> {
        let value = match &predicate.node.priority {
            None => return Ok(Priority::REQUIRED),
            Some(PriorityValue::Literal(n)) => *n,
            Some(PriorityValue::Metric(name)) => self.metric(name, &predicate.span)?,
        };
        Priority::new(value).ok_or_else(|| {
            ParseError::invalid_predicate(predicate.node.to_string(), predicate.span.clone())
        })
    }
}

/// Fold the priority of `-20@750-` into the gap's predicate
fn apply_connection_priority(gap: &mut Gap, value: &PriorityValue, span: &Span) {
    if let Some(predicates) = gap.explicit.as_mut() {
        for predicate in predicates.iter_mut().filter(|p| p.node.priority.is_none()) {
            predicate.node.priority = Some(value.clone());
            predicate.span.end = predicate.span.end.max(span.end);
        }
    }
}
