// Type expression parsing module
// Handles unions, intersections, function types, keywords and named references

use crate::ast::*;
use crate::error::*;
use crate::parser::{DeclParser, Rule};
use pest::iterators::Pair;

impl DeclParser {
    /// Parse `type_expr`, collapsing single-member unions and intersections
    pub(crate) fn parse_type_expr(pair: Pair<Rule>, src: &str) -> ParseResult<TypeExpr> {
        let span = Self::span_from_pair(&pair);
        match pair.as_rule() {
            Rule::type_expr => {
                let mut members = pair
                    .into_inner()
                    .map(|member| Self::parse_type_expr(member, src))
                    .collect::<ParseResult<Vec<_>>>()?;
                if members.len() == 1 {
                    Ok(members.remove(0))
                } else {
                    Ok(TypeExpr::Union { members, span })
                }
            }
            Rule::intersection => {
                let mut members = pair
                    .into_inner()
                    .map(|member| Self::parse_type_expr(member, src))
                    .collect::<ParseResult<Vec<_>>>()?;
                if members.len() == 1 {
                    Ok(members.remove(0))
                } else {
                    Ok(TypeExpr::Intersection { members, span })
                }
            }
            Rule::function_type => {
                let mut inner = pair.into_inner();
                let params =
                    Self::parse_param_list(Self::next_pair(&mut inner, "parameters", span)?, src)?;
                let return_type =
                    Self::parse_type_expr(Self::next_pair(&mut inner, "return type", span)?, src)?;
                Ok(TypeExpr::Function {
                    params,
                    return_type: Box::new(return_type),
                    span,
                })
            }
            Rule::type_keyword => {
                let keyword = TypeKeyword::from_keyword(pair.as_str()).ok_or_else(|| {
                    ParseError::unexpected_rule("type keyword", Some(Rule::type_keyword), span)
                })?;
                Ok(TypeExpr::Keyword { keyword, span })
            }
            Rule::type_reference => Ok(TypeExpr::Reference(Self::parse_type_reference(pair, src)?)),
            other => Err(ParseError::unexpected_rule("type", Some(other), span)),
        }
    }

    /// Parse `"module".Name<Args>`
    pub(crate) fn parse_type_reference(pair: Pair<Rule>, src: &str) -> ParseResult<TypeReference> {
        Self::expect_rule(&pair, Rule::type_reference)?;
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        let qualified = Self::next_pair(&mut inner, "type name", span)?;
        let qualified_span = Self::span_from_pair(&qualified);
        let mut module = None;
        let mut name = None;
        for part in qualified.into_inner() {
            match part.as_rule() {
                Rule::string => module = Some(Self::parse_string(part, src)?),
                Rule::identifier => name = Some(Self::parse_identifier(part)?),
                other => {
                    return Err(ParseError::unexpected_rule(
                        "module or identifier",
                        Some(other),
                        Self::span_from_pair(&part),
                    ))
                }
            }
        }
        let name =
            name.ok_or_else(|| ParseError::unexpected_rule("identifier", None, qualified_span))?;

        let type_args = match inner.next() {
            Some(args) => args
                .into_inner()
                .map(|arg| Self::parse_type_expr(arg, src))
                .collect::<ParseResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(TypeReference {
            module,
            name,
            type_args,
            span,
        })
    }
}
