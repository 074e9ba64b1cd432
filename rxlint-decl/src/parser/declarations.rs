// Declaration parsing module
// Handles modules, classes, interfaces, aliases and bindings

use crate::ast::*;
use crate::error::*;
use crate::parser::{DeclParser, Rule};
use pest::iterators::Pair;

impl DeclParser {
    pub(crate) fn parse_item(pair: Pair<Rule>, src: &str) -> ParseResult<Item> {
        let span = Self::span_from_pair(&pair);
        let kind = match pair.as_rule() {
            Rule::module_block => ItemKind::Module(Self::parse_module_block(pair, src)?),
            Rule::let_binding => ItemKind::Binding(Binding::Let(Self::parse_let_binding(pair, src)?)),
            Rule::fn_binding => ItemKind::Binding(Binding::Fn(Self::parse_fn_binding(pair, src)?)),
            _ => ItemKind::Declaration(Self::parse_declaration(pair, src)?),
        };
        Ok(Item { kind, span })
    }

    fn parse_module_block(pair: Pair<Rule>, src: &str) -> ParseResult<ModuleBlock> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        // Skip the `module` keyword
        Self::next_pair(&mut inner, "module keyword", span)?;

        let path_pair = Self::next_pair(&mut inner, "module path", span)?;
        let path_span = Self::span_from_pair(&path_pair);
        let path = Self::parse_string(path_pair, src)?;

        let declarations = inner
            .map(|decl| Self::parse_declaration(decl, src))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(ModuleBlock {
            path,
            path_span,
            declarations,
            span,
        })
    }

    pub(crate) fn parse_declaration(pair: Pair<Rule>, src: &str) -> ParseResult<Declaration> {
        match pair.as_rule() {
            Rule::class_declaration => Ok(Declaration::Class(Self::parse_class(pair, src)?)),
            Rule::interface_declaration => {
                Ok(Declaration::Interface(Self::parse_interface(pair, src)?))
            }
            Rule::alias_declaration => Ok(Declaration::Alias(Self::parse_alias(pair, src)?)),
            other => Err(ParseError::unexpected_rule(
                "class, interface or type declaration",
                Some(other),
                Self::span_from_pair(&pair),
            )),
        }
    }

    fn parse_class(pair: Pair<Rule>, src: &str) -> ParseResult<ClassDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_params = Vec::new();
        let mut extends = None;
        let mut implements = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::keyword_class => {}
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_params => type_params = Self::parse_type_params(inner)?,
                Rule::class_extends => {
                    let clause_span = Self::span_from_pair(&inner);
                    let mut clause = inner.into_inner();
                    Self::next_pair(&mut clause, "extends keyword", clause_span)?;
                    let base = Self::next_pair(&mut clause, "base class", clause_span)?;
                    extends = Some(Self::parse_type_reference(base, src)?);
                }
                Rule::implements_clause => implements = Self::parse_heritage_list(inner, src)?,
                other => {
                    return Err(ParseError::unexpected_rule(
                        "class member",
                        Some(other),
                        Self::span_from_pair(&inner),
                    ))
                }
            }
        }

        let name = name.ok_or_else(|| ParseError::unexpected_rule("class name", None, span))?;
        Ok(ClassDeclaration {
            name,
            type_params,
            extends,
            implements,
            span,
        })
    }

    fn parse_interface(pair: Pair<Rule>, src: &str) -> ParseResult<InterfaceDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_params = Vec::new();
        let mut extends = Vec::new();
        let mut call_signatures = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::keyword_interface => {}
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_params => type_params = Self::parse_type_params(inner)?,
                Rule::interface_extends => extends = Self::parse_heritage_list(inner, src)?,
                Rule::interface_body => {
                    for signature in inner.into_inner() {
                        call_signatures.push(Self::parse_call_signature(signature, src)?);
                    }
                }
                other => {
                    return Err(ParseError::unexpected_rule(
                        "interface member",
                        Some(other),
                        Self::span_from_pair(&inner),
                    ))
                }
            }
        }

        let name = name.ok_or_else(|| ParseError::unexpected_rule("interface name", None, span))?;
        Ok(InterfaceDeclaration {
            name,
            type_params,
            extends,
            call_signatures,
            span,
        })
    }

    fn parse_alias(pair: Pair<Rule>, src: &str) -> ParseResult<AliasDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        Self::next_pair(&mut inner, "type keyword", span)?;
        let name = Self::parse_identifier(Self::next_pair(&mut inner, "alias name", span)?)?;
        let target = Self::parse_type_expr(Self::next_pair(&mut inner, "aliased type", span)?, src)?;

        Ok(AliasDeclaration { name, target, span })
    }

    /// Parse `extends A, B` / `implements A, B` (keyword first)
    fn parse_heritage_list(pair: Pair<Rule>, src: &str) -> ParseResult<Vec<TypeReference>> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::type_reference)
            .map(|inner| Self::parse_type_reference(inner, src))
            .collect()
    }

    fn parse_type_params(pair: Pair<Rule>) -> ParseResult<Vec<Identifier>> {
        pair.into_inner().map(Self::parse_identifier).collect()
    }

    fn parse_call_signature(pair: Pair<Rule>, src: &str) -> ParseResult<CallSignature> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        let params = Self::parse_param_list(Self::next_pair(&mut inner, "parameters", span)?, src)?;
        let return_type =
            Self::parse_type_expr(Self::next_pair(&mut inner, "return type", span)?, src)?;

        Ok(CallSignature {
            params,
            return_type,
            span,
        })
    }

    fn parse_let_binding(pair: Pair<Rule>, src: &str) -> ParseResult<LetBinding> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        Self::next_pair(&mut inner, "let keyword", span)?;
        let name = Self::parse_identifier(Self::next_pair(&mut inner, "binding name", span)?)?;
        let type_annotation =
            Self::parse_type_expr(Self::next_pair(&mut inner, "type annotation", span)?, src)?;

        Ok(LetBinding {
            name,
            type_annotation,
            span,
        })
    }

    fn parse_fn_binding(pair: Pair<Rule>, src: &str) -> ParseResult<FnBinding> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut params = Vec::new();
        let mut return_annotation = None;
        let mut inferred_body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::keyword_fn => {}
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::param_list => params = Self::parse_param_list(inner, src)?,
                Rule::return_annotation | Rule::inferred_body => {
                    let rule = inner.as_rule();
                    let inner_span = Self::span_from_pair(&inner);
                    let mut types = inner.into_inner();
                    let ty =
                        Self::parse_type_expr(Self::next_pair(&mut types, "type", inner_span)?, src)?;
                    if rule == Rule::return_annotation {
                        return_annotation = Some(ty);
                    } else {
                        inferred_body = Some(ty);
                    }
                }
                other => {
                    return Err(ParseError::unexpected_rule(
                        "function binding part",
                        Some(other),
                        Self::span_from_pair(&inner),
                    ))
                }
            }
        }

        let name = name.ok_or_else(|| ParseError::unexpected_rule("function name", None, span))?;
        Ok(FnBinding {
            name,
            params,
            return_annotation,
            inferred_body,
            span,
        })
    }

    pub(crate) fn parse_param_list(pair: Pair<Rule>, src: &str) -> ParseResult<Vec<Parameter>> {
        pair.into_inner()
            .map(|param| {
                let span = Self::span_from_pair(&param);
                let mut inner = param.into_inner();
                let name =
                    Self::parse_identifier(Self::next_pair(&mut inner, "parameter name", span)?)?;
                let type_annotation = Self::parse_type_expr(
                    Self::next_pair(&mut inner, "parameter type", span)?,
                    src,
                )?;
                Ok(Parameter {
                    name,
                    type_annotation,
                    span,
                })
            })
            .collect()
    }
}
