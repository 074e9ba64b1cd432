// rxlint Declaration Parser
// Pest-based parser for type declaration fixtures

use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

mod declarations;
mod types;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct DeclParser;

impl DeclParser {
    /// Parse a complete declaration file
    pub fn parse_file(input: &str) -> ParseResult<DeclarationFile> {
        Self::parse_file_with_source(input, None)
    }

    /// Parse a complete declaration file, remembering where it came from
    pub fn parse_file_with_source(
        input: &str,
        source_file: Option<String>,
    ) -> ParseResult<DeclarationFile> {
        let mut pairs = Self::parse(Rule::file, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        let file_pair = pairs
            .next()
            .ok_or_else(|| ParseError::unexpected_rule("file", None, Span::new(0, input.len())))?;
        let span = Self::span_from_pair(&file_pair);

        let mut items = Vec::new();
        for pair in file_pair.into_inner() {
            match pair.as_rule() {
                Rule::EOI => break,
                _ => items.push(Self::parse_item(pair, input)?),
            }
        }

        Ok(DeclarationFile {
            items,
            source_file,
            span,
        })
    }

    /// Parse a standalone type expression
    pub fn parse_type_expr_str(input: &str) -> ParseResult<TypeExpr> {
        let input = input.trim();
        let mut pairs = Self::parse(Rule::type_expr, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;
        let pair = pairs.next().ok_or_else(|| {
            ParseError::unexpected_rule("type expression", None, Span::new(0, input.len()))
        })?;

        // Reject trailing input such as `Subject<number> garbage`
        let end = pair.as_span().end();
        if end != input.len() {
            return Err(ParseError::PestError {
                src: input.to_string(),
                span: miette::SourceSpan::new(end.into(), input.len() - end),
                message: "unexpected trailing input".to_string(),
            });
        }

        Self::parse_type_expr(pair, input)
    }

    pub(crate) fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    pub(crate) fn parse_identifier(pair: Pair<Rule>) -> ParseResult<Identifier> {
        Self::expect_rule(&pair, Rule::identifier)?;
        Ok(Identifier {
            name: pair.as_str().to_string(),
            span: Self::span_from_pair(&pair),
        })
    }

    /// Decode a string literal, processing escape sequences
    pub(crate) fn parse_string(pair: Pair<Rule>, src: &str) -> ParseResult<String> {
        Self::expect_rule(&pair, Rule::string)?;
        let content = pair.into_inner().next();
        let Some(content) = content else {
            return Ok(String::new());
        };

        let base = content.as_span().start();
        let mut result = String::new();
        let mut chars = content.as_str().char_indices();

        while let Some((_, ch)) = chars.next() {
            if ch != '\\' {
                result.push(ch);
                continue;
            }
            match chars.next() {
                Some((_, 'n')) => result.push('\n'),
                Some((_, 't')) => result.push('\t'),
                Some((_, '\\')) => result.push('\\'),
                Some((_, '"')) => result.push('"'),
                Some((_, '/')) => result.push('/'),
                Some((offset, other)) => {
                    let start = base + offset - 1;
                    return Err(ParseError::invalid_string_escape(
                        src.to_string(),
                        miette::SourceSpan::new(start.into(), 1 + other.len_utf8()),
                        format!("\\{other}"),
                    ));
                }
                None => {
                    return Err(ParseError::invalid_string_escape(
                        src.to_string(),
                        miette::SourceSpan::new((base + content.as_str().len() - 1).into(), 1),
                        "\\".to_string(),
                    ));
                }
            }
        }

        Ok(result)
    }

    pub(crate) fn expect_rule(pair: &Pair<Rule>, rule: Rule) -> ParseResult<()> {
        if pair.as_rule() == rule {
            Ok(())
        } else {
            Err(ParseError::unexpected_rule(
                format!("{rule:?}"),
                Some(pair.as_rule()),
                Self::span_from_pair(pair),
            ))
        }
    }

    /// Take the next inner pair, reporting the rule that was expected when absent
    pub(crate) fn next_pair<'i>(
        pairs: &mut pest::iterators::Pairs<'i, Rule>,
        expected: &str,
        parent: Span,
    ) -> ParseResult<Pair<'i, Rule>> {
        pairs
            .next()
            .ok_or_else(|| ParseError::unexpected_rule(expected, None, parent))
    }
}
