// rxlint Declaration Library
// Pest-based parser for the type declaration fixtures that describe a host type graph

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::DeclParser;

// Re-export parser rule for manual testing
pub use parser::Rule;

// Main parsing functions
pub fn parse_declarations(input: &str) -> Result<DeclarationFile, ParseError> {
    DeclParser::parse_file(input)
}

pub fn parse_declarations_with_source(
    input: &str,
    source_file: Option<String>,
) -> Result<DeclarationFile, ParseError> {
    DeclParser::parse_file_with_source(input, source_file)
}

pub fn parse_type_expr(input: &str) -> Result<TypeExpr, ParseError> {
    DeclParser::parse_type_expr_str(input)
}

#[cfg(test)]
mod tests;
