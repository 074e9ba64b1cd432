// rxlint Declaration Parser Error Handling
// Error reporting with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(rxlint::decl::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Invalid string escape sequence")]
    #[diagnostic(
        code(rxlint::decl::invalid_string_escape),
        help("Valid escape sequences: \\n, \\t, \\\\, \\\", \\/")
    )]
    InvalidStringEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(rxlint::decl::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Option<Rule>,
        #[label("expected {expected}")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let expected: Vec<&str> = positives.iter().map(rule_description).collect();
                format!("expected {}", expected.join(" or "))
            }
            pest::error::ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError { src, span, message }
    }

    /// Create an invalid string escape error
    pub fn invalid_string_escape(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidStringEscape { src, span, found }
    }

    /// Create an unexpected rule error
    pub fn unexpected_rule(
        expected: impl Into<String>,
        found: Option<Rule>,
        span: crate::ast::Span,
    ) -> Self {
        ParseError::UnexpectedRule {
            expected: expected.into(),
            found,
            span: span.to_source_span(),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::file => "a declaration file",
        Rule::module_block => "a module block (module \"path\" { ... })",
        Rule::class_declaration => "a class declaration",
        Rule::interface_declaration => "an interface declaration",
        Rule::alias_declaration => "a type alias (type Name = ...;)",
        Rule::class_extends | Rule::interface_extends => "an extends clause",
        Rule::implements_clause => "an implements clause",
        Rule::interface_body => "an interface body ({ ... })",
        Rule::call_signature => "a call signature ((x: T): R;)",
        Rule::type_params => "type parameters (<T, U>)",
        Rule::let_binding => "a let binding (let name: Type;)",
        Rule::fn_binding => "a function binding (fn name(): Type;)",
        Rule::return_annotation => "a return type annotation (: Type)",
        Rule::inferred_body => "an inferred body type (=> Type)",
        Rule::param_list => "a parameter list",
        Rule::param => "a parameter (name: Type)",
        Rule::type_expr | Rule::intersection => "a type",
        Rule::function_type => "a function type ((x: T) => R)",
        Rule::type_reference | Rule::qualified_name => "a type name",
        Rule::type_args => "type arguments (<T>)",
        Rule::type_keyword => "a type keyword (any, unknown, string, ...)",
        Rule::identifier => "an identifier",
        Rule::string | Rule::string_content => "a string",
        Rule::keyword_module => "'module'",
        Rule::keyword_class => "'class'",
        Rule::keyword_interface => "'interface'",
        Rule::keyword_type => "'type'",
        Rule::keyword_let => "'let'",
        Rule::keyword_fn => "'fn'",
        Rule::keyword_extends => "'extends'",
        Rule::keyword_implements => "'implements'",
        Rule::EOI => "end of input",
        _ => "valid syntax",
    }
}
