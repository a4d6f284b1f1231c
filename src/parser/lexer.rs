//! Lexer for the Visual Format Language using logos

use logos::Logos;

use crate::error::ParseError;
use crate::parser::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Lexeme {
    // Orientation prefixes (longer than a one-letter identifier, so they win)
    #[token("H:")]
    HorizontalPrefix,
    #[token("V:")]
    VerticalPrefix,

    // Superview connector
    #[token("|")]
    Pipe,

    // Connection
    #[token("-")]
    Dash,

    // Delimiters
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token("@")]
    At,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,

    // Relations (longer first)
    #[token("==")]
    #[token("=")]
    Equal,
    #[token("<=")]
    LessOrEqual,
    #[token(">=")]
    GreaterOrEqual,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// Lex a format string into lexemes with spans
///
/// Unlike a lossy token stream, any character that starts no lexeme is an
/// error at its byte offset.
pub fn lex(input: &str) -> Result<Vec<(Lexeme, Span)>, ParseError> {
    let mut lexemes = Vec::new();
    for (result, span) in Lexeme::lexer(input).spanned() {
        match result {
            Ok(lexeme) => lexemes.push((lexeme, span)),
            Err(()) => {
                return Err(ParseError::UnexpectedToken {
                    position: span.start,
                    found: format!("'{}'", &input[span.clone()]),
                    expected: Vec::new(),
                })
            }
        }
    }
    Ok(lexemes)
}

/// Inner range of one parenthesised predicate list: from just after `(` to
/// just before `)` (or to the end of the enclosing element when unclosed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateGroup {
    pub open: usize,
    pub contents: Span,
}

impl PredicateGroup {
    /// Whether an error at `position` belongs to this group
    ///
    /// An error on the `(` itself means the whole group is misplaced, which
    /// is a grammar error rather than a malformed predicate.
    pub fn covers(&self, position: usize) -> bool {
        position > self.open && position <= self.contents.end
    }
}

/// Check bracket structure before grammar parsing
///
/// Reports `[` without a matching `]` and brackets that hold no identifier,
/// and collects the predicate groups so grammar errors inside them can be
/// reported as malformed predicates.
pub fn check_delimiters(lexemes: &[(Lexeme, Span)]) -> Result<Vec<PredicateGroup>, ParseError> {
    let mut groups = Vec::new();
    let mut open_bracket: Option<usize> = None;
    let mut open_paren: Option<usize> = None;

    for (index, (lexeme, span)) in lexemes.iter().enumerate() {
        match lexeme {
            Lexeme::BracketOpen => {
                if let Some(position) = open_bracket {
                    return Err(ParseError::UnterminatedBracket { position });
                }
                // `[[` is reported as unterminated on the next iteration
                match lexemes.get(index + 1) {
                    None => return Err(ParseError::UnterminatedBracket { position: span.start }),
                    Some((Lexeme::Ident(_) | Lexeme::BracketOpen, _)) => {}
                    Some(_) => {
                        return Err(ParseError::EmptyViewName {
                            position: span.start,
                        })
                    }
                }
                open_bracket = Some(span.start);
            }
            Lexeme::BracketClose => {
                if open_bracket.take().is_none() {
                    return Err(ParseError::UnexpectedToken {
                        position: span.start,
                        found: "']'".to_string(),
                        expected: Vec::new(),
                    });
                }
                if let Some(open) = open_paren.take() {
                    groups.push(PredicateGroup {
                        open,
                        contents: open + 1..span.start,
                    });
                }
            }
            Lexeme::ParenOpen => {
                if open_paren.is_none() {
                    open_paren = Some(span.start);
                }
            }
            Lexeme::ParenClose => {
                if let Some(open) = open_paren.take() {
                    groups.push(PredicateGroup {
                        open,
                        contents: open + 1..span.start,
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(position) = open_bracket {
        return Err(ParseError::UnterminatedBracket { position });
    }
    if let Some(open) = open_paren {
        let end = lexemes.last().map(|(_, span)| span.end).unwrap_or(open + 1);
        groups.push(PredicateGroup {
            open,
            contents: open + 1..end,
        });
    }
    Ok(groups)
}
