//! Tokenizer implementation using chumsky
//!
//! The grammar folds lexemes into the ordered [`Token`] sequence:
//!
//! ```text
//! format     ::= orientation? (superview connection)? view (connection view)*
//!                (connection superview)?
//! view       ::= "[" ident predicates? "]"
//! connection ::= ε | "-" | "-" simple ("@" priority)? "-" | "-" predicates "-"
//! predicates ::= "(" predicate ("," predicate)* ")"
//! predicate  ::= relation? object ("@" priority)?
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::lexer::{self, Lexeme};

/// Tokenize a visual format string
pub fn tokenize(format: &str) -> Result<Vec<Spanned<Token>>, ParseError> {
    if format.trim().is_empty() {
        return Err(ParseError::EmptyFormat);
    }

    let lexemes = lexer::lex(format)?;
    let groups = lexer::check_delimiters(&lexemes)?;
    let len = format.len();

    let token_iter = lexemes
        .into_iter()
        .map(|(tok, span)| (tok, SimpleSpan::from(span)));

    // Turn the lexeme iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Lexeme, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let tokens = format_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => ParseError::from_rich(err, format, &groups),
            None => ParseError::UnexpectedToken {
                position: len,
                found: "end of input".to_string(),
                expected: Vec::new(),
            },
        })?;

    tracing::trace!(format, tokens = tokens.len(), "tokenized visual format");
    Ok(tokens)
}

/// Names of every bracketed view in textual order, duplicates removed
pub fn referenced_views(tokens: &[Spanned<Token>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        if let Some(name) = token.node.view_name() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn format_parser<'a, I>(
) -> impl Parser<'a, I, Vec<Spanned<Token>>, extra::Err<Rich<'a, Lexeme>>> + Clone
where
    I: ValueInput<'a, Token = Lexeme, Span = SimpleSpan>,
{
    let identifier = select! {
        Lexeme::Ident(s) => Identifier::new(s),
    }
    .map_with(|id, e| Spanned::new(id, span_range(&e.span())));

    let number = select! {
        Lexeme::Number(n) => n,
    };

    let relation = choice((
        just(Lexeme::Equal).to(Relation::Equal),
        just(Lexeme::LessOrEqual).to(Relation::LessThanOrEqual),
        just(Lexeme::GreaterOrEqual).to(Relation::GreaterThanOrEqual),
    ));

    let priority_value = choice((
        number.clone().map(PriorityValue::Literal),
        identifier.clone().map(|id| PriorityValue::Metric(id.node)),
    ));

    let priority = just(Lexeme::At).ignore_then(priority_value);

    // Number with an optional leading minus: `-5`
    let signed_number = just(Lexeme::Dash)
        .or_not()
        .then(number.clone())
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    // Named operand: `b`, `b.width`, `b*2`, `spacing`
    let named_operand = identifier
        .clone()
        .then(just(Lexeme::Dot).ignore_then(identifier.clone()).or_not())
        .then(just(Lexeme::Star).ignore_then(number.clone()).or_not())
        .try_map(|((name, attribute), multiplier), span: SimpleSpan| {
            let attribute = match attribute {
                Some(attr) => match SizeAttribute::from_str(attr.node.as_str()) {
                    Some(a) => Some(a),
                    None => {
                        return Err(Rich::custom(
                            span,
                            format!(
                                "'{}' is not a view attribute. Expected width or height",
                                attr.node
                            ),
                        ))
                    }
                },
                None => None,
            };
            if attribute.is_none() && multiplier.is_none() {
                Ok(Operand::Metric(name.node))
            } else {
                Ok(Operand::View {
                    name: name.node,
                    attribute,
                    multiplier: multiplier.unwrap_or(1.0),
                })
            }
        });

    let operand = choice((signed_number.map(Operand::Literal), named_operand));

    let predicate = relation
        .or_not()
        .then(operand)
        .then(priority.clone().or_not())
        .map_with(|((relation, object), priority), e| {
            Spanned::new(
                Predicate {
                    relation: relation.unwrap_or_default(),
                    object,
                    priority,
                },
                span_range(&e.span()),
            )
        });

    let predicate_list = predicate
        .separated_by(just(Lexeme::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Lexeme::ParenOpen), just(Lexeme::ParenClose));

    // View: `[name]` or `[name(predicates)]`
    let view = identifier
        .clone()
        .then(predicate_list.clone().or_not())
        .delimited_by(just(Lexeme::BracketOpen), just(Lexeme::BracketClose))
        .map_with(|(name, predicates), e| {
            let is_variable = predicates.is_some();
            Spanned::new(
                Token::ViewSpec(ViewSpec {
                    name,
                    predicates: predicates.unwrap_or_default(),
                    is_variable,
                }),
                span_range(&e.span()),
            )
        });

    // Short connection value: `-20-`, `-spacing-`, `-20@750-`
    let simple_predicate = choice((
        number.map(Operand::Literal),
        identifier.clone().map(|id| Operand::Metric(id.node)),
    ))
    .map_with(|object, e| Spanned::new(Predicate::simple(object), span_range(&e.span())));

    let short_gap = simple_predicate
        .then(priority.map_with(|p, e| Spanned::new(p, span_range(&e.span()))).or_not())
        .map(|(predicate, priority)| (Some(vec![predicate]), priority));

    let dashed_connection = just(Lexeme::Dash)
        .ignore_then(
            choice((
                predicate_list
                    .clone()
                    .map(|predicates| (Some(predicates), None::<Spanned<PriorityValue>>)),
                short_gap,
            ))
            .then_ignore(just(Lexeme::Dash))
            .or_not(),
        )
        .map_with(|explicit, e| {
            let (explicit, priority) = explicit.unwrap_or((None, None));
            let mut tokens = vec![Spanned::new(
                Token::Gap(Gap {
                    dashed: true,
                    explicit,
                }),
                span_range(&e.span()),
            )];
            if let Some(priority) = priority {
                tokens.push(Spanned::new(Token::Priority(priority.node), priority.span));
            }
            tokens
        });

    // Adjacent elements: `[a][b]`, `|[a]`
    let adjacent = empty().map_with(|_, e| {
        vec![Spanned::new(
            Token::Gap(Gap::adjacent()),
            span_range(&e.span()),
        )]
    });

    let connection = dashed_connection.or(adjacent);

    let orientation = choice((
        just(Lexeme::HorizontalPrefix).to(Orientation::Horizontal),
        just(Lexeme::VerticalPrefix).to(Orientation::Vertical),
    ))
    .map_with(|o, e| Spanned::new(Token::Orientation(o), span_range(&e.span())));

    let superview = just(Lexeme::Pipe)
        .map_with(|_, e| Spanned::new(Token::SuperviewConnector, span_range(&e.span())));

    let leading = superview.clone().then(connection.clone()).or_not();

    let chain = view.clone().then(
        connection
            .clone()
            .then(view)
            .repeated()
            .collect::<Vec<_>>(),
    );

    let trailing = connection.then(superview).or_not();

    orientation
        .or_not()
        .then(leading)
        .then(chain)
        .then(trailing)
        .then_ignore(end())
        .map(|(((orientation, leading), (first, rest)), trailing)| {
            let mut tokens = Vec::new();
            tokens.extend(orientation);
            if let Some((bar, gap)) = leading {
                tokens.push(bar);
                tokens.extend(gap);
            }
            tokens.push(first);
            for (gap, view) in rest {
                tokens.extend(gap);
                tokens.push(view);
            }
            if let Some((gap, bar)) = trailing {
                tokens.extend(gap);
                tokens.push(bar);
            }
            tokens
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(format: &str) -> Vec<Token> {
        tokenize(format)
            .expect("Should tokenize")
            .into_iter()
            .map(|t| t.node)
            .collect()
    }

    fn view_spec(token: &Token) -> &ViewSpec {
        match token {
            Token::ViewSpec(spec) => spec,
            other => panic!("Expected view spec, got {:?}", other),
        }
    }

    fn gap(token: &Token) -> &Gap {
        match token {
            Token::Gap(gap) => gap,
            other => panic!("Expected gap, got {:?}", other),
        }
    }

    #[test]
    fn test_single_view() {
        let tokens = nodes("[button]");
        assert_eq!(tokens.len(), 1);
        let spec = view_spec(&tokens[0]);
        assert_eq!(spec.name.node.as_str(), "button");
        assert!(spec.predicates.is_empty());
        assert!(!spec.is_variable);
    }

    #[test]
    fn test_orientation_prefix() {
        let tokens = nodes("V:[a]");
        assert_eq!(tokens[0], Token::Orientation(Orientation::Vertical));
        let tokens = nodes("H:[a]");
        assert_eq!(tokens[0], Token::Orientation(Orientation::Horizontal));
    }

    #[test]
    fn test_full_chain_token_order() {
        let tokens = nodes("H:|-[button]-[textField]-|");
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0], Token::Orientation(Orientation::Horizontal));
        assert_eq!(tokens[1], Token::SuperviewConnector);
        assert_eq!(*gap(&tokens[2]), Gap::standard());
        assert_eq!(view_spec(&tokens[3]).name.node.as_str(), "button");
        assert_eq!(*gap(&tokens[4]), Gap::standard());
        assert_eq!(view_spec(&tokens[5]).name.node.as_str(), "textField");
        assert_eq!(*gap(&tokens[6]), Gap::standard());
        assert_eq!(tokens[7], Token::SuperviewConnector);
    }

    #[test]
    fn test_adjacent_views_get_adjacent_gap() {
        let tokens = nodes("|[a][b]|");
        assert_eq!(tokens.len(), 7);
        assert_eq!(*gap(&tokens[1]), Gap::adjacent());
        assert_eq!(*gap(&tokens[3]), Gap::adjacent());
        assert_eq!(*gap(&tokens[5]), Gap::adjacent());
    }

    #[test]
    fn test_view_predicate_with_priority() {
        let tokens = nodes("[a(>=50@750)]");
        let spec = view_spec(&tokens[0]);
        assert!(spec.is_variable);
        assert_eq!(spec.predicates.len(), 1);
        let predicate = &spec.predicates[0].node;
        assert_eq!(predicate.relation, Relation::GreaterThanOrEqual);
        assert_eq!(predicate.object, Operand::Literal(50.0));
        assert_eq!(predicate.priority, Some(PriorityValue::Literal(750.0)));
    }

    #[test]
    fn test_predicate_list() {
        let tokens = nodes("[a(>=50, <=width@high)]");
        let spec = view_spec(&tokens[0]);
        assert_eq!(spec.predicates.len(), 2);
        let second = &spec.predicates[1].node;
        assert_eq!(second.relation, Relation::LessThanOrEqual);
        assert_eq!(second.object, Operand::Metric(Identifier::new("width")));
        assert_eq!(
            second.priority,
            Some(PriorityValue::Metric(Identifier::new("high")))
        );
    }

    #[test]
    fn test_view_reference_operands() {
        let tokens = nodes("[a(==b.height*0.5)]");
        let spec = view_spec(&tokens[0]);
        assert_eq!(
            spec.predicates[0].node.object,
            Operand::View {
                name: Identifier::new("b"),
                attribute: Some(SizeAttribute::Height),
                multiplier: 0.5,
            }
        );

        let tokens = nodes("[a(b*2)]");
        let spec = view_spec(&tokens[0]);
        assert_eq!(
            spec.predicates[0].node.object,
            Operand::View {
                name: Identifier::new("b"),
                attribute: None,
                multiplier: 2.0,
            }
        );
    }

    #[test]
    fn test_negative_literal() {
        let tokens = nodes("[a]-(-5)-[b]");
        let explicit = gap(&tokens[1]).explicit.as_ref().unwrap();
        assert_eq!(explicit[0].node.object, Operand::Literal(-5.0));
    }

    #[test]
    fn test_short_gap_forms() {
        let tokens = nodes("[a]-20-[b]-spacing-[c]");
        let first = gap(&tokens[1]).explicit.as_ref().unwrap();
        assert_eq!(first[0].node, Predicate::simple(Operand::Literal(20.0)));
        let second = gap(&tokens[3]).explicit.as_ref().unwrap();
        assert_eq!(
            second[0].node,
            Predicate::simple(Operand::Metric(Identifier::new("spacing")))
        );
    }

    #[test]
    fn test_short_gap_priority_becomes_priority_token() {
        let tokens = nodes("[a]-20@750-[b]");
        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[1], Token::Gap(_)));
        assert_eq!(tokens[2], Token::Priority(PriorityValue::Literal(750.0)));
    }

    #[test]
    fn test_parenthesised_gap() {
        let tokens = nodes("|-(>=20@250)-[a]");
        let explicit = gap(&tokens[1]).explicit.as_ref().unwrap();
        assert_eq!(explicit.len(), 1);
        assert_eq!(explicit[0].node.relation, Relation::GreaterThanOrEqual);
        assert_eq!(
            explicit[0].node.priority,
            Some(PriorityValue::Literal(250.0))
        );
    }

    #[test]
    fn test_spans_point_into_source() {
        let format = "H:[first]-[second]";
        let tokens = tokenize(format).unwrap();
        let second = match &tokens[3].node {
            Token::ViewSpec(spec) => spec,
            other => panic!("Expected view spec, got {:?}", other),
        };
        assert_eq!(&format[second.name.span.clone()], "second");
        assert_eq!(&format[tokens[3].span.clone()], "[second]");
    }

    #[test]
    fn test_referenced_views_dedup() {
        let tokens = tokenize("[a]-[b(==a)]-[a]").unwrap();
        assert_eq!(referenced_views(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_format() {
        assert_eq!(tokenize("").unwrap_err(), ParseError::EmptyFormat);
        assert_eq!(tokenize("   ").unwrap_err(), ParseError::EmptyFormat);
    }

    #[test]
    fn test_unexpected_token_position() {
        let err = tokenize("[a]|[b]").unwrap_err();
        match err {
            ParseError::UnexpectedToken { position, .. } => assert_eq!(position, 4),
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_orientation_only_in_front() {
        let err = tokenize("[a]-H:[b]").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_missing_view_is_error() {
        let err = tokenize("H:|-|").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_malformed_predicate() {
        let err = tokenize("[a(>=)]").unwrap_err();
        match err {
            ParseError::InvalidPredicate { text, .. } => assert_eq!(text, ">="),
            other => panic!("Expected InvalidPredicate, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_view_attribute() {
        let err = tokenize("[a(==b.depth)]").unwrap_err();
        match err {
            ParseError::InvalidPredicate { text, .. } => assert_eq!(text, "==b.depth"),
            other => panic!("Expected InvalidPredicate, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_cannot_start_with_digit() {
        let err = tokenize("[1a]").unwrap_err();
        assert_eq!(err, ParseError::EmptyViewName { position: 0 });
    }

    #[test]
    fn test_misplaced_predicate_group() {
        for (format, position) in [
            ("[a(50)(60)]", 6),
            ("|(10)-[a]", 1),
            ("[a](10)[b]", 3),
            ("[a]-(10)-(20)-[b]", 9),
        ] {
            match tokenize(format).unwrap_err() {
                ParseError::UnexpectedToken { position: at, .. } => {
                    assert_eq!(at, position, "format {}", format)
                }
                other => panic!("Expected UnexpectedToken for {}, got {:?}", format, other),
            }
        }
    }

    #[test]
    fn test_malformed_gap_predicate() {
        let err = tokenize("[a]-(>=)-[b]").unwrap_err();
        match err {
            ParseError::InvalidPredicate { text, .. } => assert_eq!(text, ">="),
            other => panic!("Expected InvalidPredicate, got {:?}", other),
        }
    }
}
