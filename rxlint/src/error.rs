use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("File not found: {path}")]
    #[diagnostic(code(rxlint::cli::file_not_found))]
    FileNotFound { path: String },

    #[error("Unknown location `{location}`")]
    #[diagnostic(
        code(rxlint::cli::unknown_location),
        help("Known bindings: {known}")
    )]
    UnknownLocation { location: String, known: String },
}
