//! Error types for tokenizing and synthesizing visual formats

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::parser::ast::Span;
use crate::parser::lexer::{Lexeme, PredicateGroup};

/// Everything that can go wrong in one parse call
///
/// Parsing is all-or-nothing: the first error aborts and no constraints are
/// returned alongside it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("format string is empty")]
    EmptyFormat,

    /// Grammar violation at a byte offset
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: Vec<String>,
    },

    /// `[` without a matching `]`
    #[error("unterminated '[' at position {position}")]
    UnterminatedBracket { position: usize },

    /// `[]` or `[(...)]`
    #[error("missing view name in brackets at position {position}")]
    EmptyViewName { position: usize },

    #[error("unknown view '{name}'")]
    UnknownView { name: String, span: Span },

    #[error("unknown metric '{name}'")]
    UnknownMetric { name: String, span: Span },

    /// Malformed relation, operand or priority
    #[error("invalid predicate '{text}'")]
    InvalidPredicate { text: String, span: Span },

    /// The container's name used as a view
    #[error("'{name}' is reserved for the enclosing container and cannot name a view")]
    ReservedViewName { name: String, span: Span },
}

impl ParseError {
    pub fn unknown_view(name: impl Into<String>, span: Span) -> Self {
        Self::UnknownView {
            name: name.into(),
            span,
        }
    }

    pub fn unknown_metric(name: impl Into<String>, span: Span) -> Self {
        Self::UnknownMetric {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_predicate(text: impl Into<String>, span: Span) -> Self {
        Self::InvalidPredicate {
            text: text.into(),
            span,
        }
    }

    /// Get the source span of the error
    pub fn span(&self) -> Span {
        match self {
            Self::EmptyFormat => 0..0,
            Self::UnexpectedToken { position, .. }
            | Self::UnterminatedBracket { position }
            | Self::EmptyViewName { position } => *position..*position + 1,
            Self::UnknownView { span, .. }
            | Self::UnknownMetric { span, .. }
            | Self::InvalidPredicate { span, .. }
            | Self::ReservedViewName { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn report(&self, source: &str, filename: &str) -> String {
        let message = self.to_string();
        if source.is_empty() {
            return message;
        }

        // Labels must cover at least one byte of the source
        let span = self.span();
        let start = span.start.min(source.len() - 1);
        let end = span.end.min(source.len()).max(start + 1);

        let label = match self {
            Self::UnexpectedToken { expected, .. } if !expected.is_empty() => {
                format!("expected {}", expected.join(", "))
            }
            _ => message.clone(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_message(&message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }

    /// Convert a grammar error, attributing errors inside a parenthesised
    /// predicate list to that predicate list
    pub(crate) fn from_rich(
        err: Rich<'_, Lexeme>,
        source: &str,
        groups: &[PredicateGroup],
    ) -> Self {
        let span = err.span().into_range();

        if let Some(group) = groups.iter().find(|g| g.covers(span.start)) {
            let text = source
                .get(group.contents.clone())
                .unwrap_or_default()
                .trim()
                .to_string();
            return Self::InvalidPredicate {
                text,
                span: group.contents.clone(),
            };
        }

        let found = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format_lexeme(tok),
                None => "end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
            #[allow(unreachable_patterns)]
            _ => "invalid input".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_lexeme(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        Self::UnexpectedToken {
            position: span.start,
            found,
            expected,
        }
    }
}

/// Format a lexeme for human-readable error messages
fn format_lexeme(lexeme: &Lexeme) -> String {
    match lexeme {
        Lexeme::Ident(s) => format!("identifier '{}'", s),
        Lexeme::Number(n) => format!("number {}", n),
        Lexeme::HorizontalPrefix => "'H:'".to_string(),
        Lexeme::VerticalPrefix => "'V:'".to_string(),
        Lexeme::Pipe => "'|'".to_string(),
        Lexeme::Dash => "'-'".to_string(),
        Lexeme::BracketOpen => "'['".to_string(),
        Lexeme::BracketClose => "']'".to_string(),
        Lexeme::ParenOpen => "'('".to_string(),
        Lexeme::ParenClose => "')'".to_string(),
        Lexeme::Comma => "','".to_string(),
        Lexeme::At => "'@'".to_string(),
        Lexeme::Dot => "'.'".to_string(),
        Lexeme::Star => "'*'".to_string(),
        Lexeme::Equal => "'=='".to_string(),
        Lexeme::LessOrEqual => "'<='".to_string(),
        Lexeme::GreaterOrEqual => "'>='".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_view_display() {
        let err = ParseError::unknown_view("missing", 3..10);
        assert_eq!(err.to_string(), "unknown view 'missing'");
        assert_eq!(err.span(), 3..10);
    }

    #[test]
    fn test_position_errors_span_one_byte() {
        let err = ParseError::UnterminatedBracket { position: 4 };
        assert_eq!(err.span(), 4..5);
        assert!(err.to_string().contains("position 4"));
    }

    #[test]
    fn test_report_names_source() {
        let source = "H:[a]-[missing]";
        let err = ParseError::unknown_view("missing", 7..14);
        let report = err.report(source, "format");
        assert!(report.contains("unknown view 'missing'"));
        assert!(report.contains("format"));
    }

    #[test]
    fn test_report_tolerates_span_past_end() {
        let err = ParseError::UnterminatedBracket { position: 5 };
        let report = err.report("[a]-[", "format");
        assert!(report.contains("unterminated"));
    }

    #[test]
    fn test_empty_format_report() {
        let report = ParseError::EmptyFormat.report("", "format");
        assert!(report.contains("empty"));
    }
}
