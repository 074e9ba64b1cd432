use clap::{Args, Parser, Subcommand};
use miette::{Diagnostic, IntoDiagnostic, MietteHandlerOpts, NamedSource, Report, Result};
use rxlint_decl::parse_declarations_with_source;
use rxlint_types::{
    OracleConfig, TargetDescriptor, TypeGraph, TypeGraphAccessor, TypeServices, WellKnown,
    DEFAULT_MAX_DEPTH,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod render;

use error::CliError;

#[derive(Parser)]
#[command(
    name = "rxlint",
    version,
    about = "Structural type oracle for reactive-stream lint rules",
    long_about = "Loads a type declaration fixture and answers could-be questions about its bindings, \
                  the same questions lint rules ask about Observables, Subjects and Subscriptions."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Deepest nesting a could-be traversal follows
    #[arg(long, global = true, env = "RXLINT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Disable the per-run memo table
    #[arg(long, global = true)]
    no_memo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and lower a fixture, reporting any errors
    Check {
        /// Fixture file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate predicates against one binding
    Probe(ProbeArgs),

    /// Print every declaration and binding with its type
    Dump {
        /// Fixture file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args)]
struct ProbeArgs {
    /// Fixture file (use '-' to read from stdin)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Binding (or declared type) name
    #[arg(value_name = "LOCATION")]
    location: String,

    /// Well-known predicate to evaluate; all of them when omitted
    #[arg(short, long = "predicate", value_name = "NAME")]
    predicates: Vec<WellKnown>,

    /// Ad hoc target type name
    #[arg(long = "type", value_name = "NAME", conflicts_with = "predicates")]
    type_name: Option<String>,

    /// Declaring-module pattern the target must match
    #[arg(long, value_name = "REGEX", requires = "type_name")]
    qualifier: Option<String>,

    /// Treat the target name as a regular expression
    #[arg(long, requires = "type_name")]
    pattern: bool,

    /// Test the location's return type instead of its type
    #[arg(long, requires = "type_name")]
    returns: bool,
}

impl Cli {
    fn oracle_config(&self) -> OracleConfig {
        OracleConfig::default()
            .with_max_depth(self.max_depth)
            .with_memoize(!self.no_memo)
    }
}

fn main() {
    setup_miette_handler();
    setup_tracing();

    let cli = Cli::parse();
    let config = cli.oracle_config();

    let result = match cli.command {
        Some(Commands::Check { file }) => handle_check_command(&file),
        Some(Commands::Probe(args)) => handle_probe_command(&args, config),
        Some(Commands::Dump { file }) => handle_dump_command(&file),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["rxlint", "--help"]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        process::exit(1);
    }
}

fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

/// Log to stderr, filtered by `RXLINT_LOG` (default `warn`)
fn setup_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("RXLINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn handle_check_command(path: &Path) -> Result<()> {
    let (graph, source_name) = load_graph(path)?;

    for group in graph.recursive_types() {
        let members: Vec<String> = group.iter().map(|handle| graph.describe(*handle)).collect();
        warn!(file = %source_name, "recursive types: {}", members.join(", "));
    }

    println!(
        "✅ {}: {} declarations, {} bindings, {} type nodes",
        source_name,
        graph.declarations().count(),
        graph.bindings().count(),
        graph.len()
    );
    Ok(())
}

fn handle_probe_command(args: &ProbeArgs, config: OracleConfig) -> Result<()> {
    let (graph, _) = load_graph(&args.file)?;
    let location = args.location.as_str();

    if graph.resolve_type(location).is_none() && !graph.is_function_like(location) {
        let known: Vec<&str> = graph.bindings().map(|(name, _)| name).collect();
        return Err(CliError::UnknownLocation {
            location: args.location.clone(),
            known: known.join(", "),
        }
        .into());
    }

    let services = TypeServices::with_config(&graph, config);
    let rows = match &args.type_name {
        Some(name) => {
            let mut target = if args.pattern {
                TargetDescriptor::pattern(name)?
            } else {
                TargetDescriptor::exact(name.as_str())
            };
            if let Some(qualifier) = &args.qualifier {
                target = target.qualified(qualifier)?;
            }

            if args.returns {
                let value = services.could_return_type(location, &target);
                vec![(format!("returns {target}"), value)]
            } else {
                let value = services.could_be_type(location, &target);
                vec![(format!("could-be {target}"), value)]
            }
        }
        None => {
            let predicates = if args.predicates.is_empty() {
                WellKnown::ALL.to_vec()
            } else {
                args.predicates.clone()
            };
            predicates
                .into_iter()
                .map(|predicate| (predicate.to_string(), services.check(location, predicate)))
                .collect()
        }
    };

    println!("{}", render::probe_table(&rows));

    if let Some(stats) = services.cache_stats() {
        debug!(
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entries,
            "memo table"
        );
    }
    Ok(())
}

fn handle_dump_command(path: &Path) -> Result<()> {
    let (graph, _) = load_graph(path)?;
    println!("{}", render::dump_graph(&graph));
    Ok(())
}

/// Parse and lower a fixture, attaching the source to any diagnostic
fn load_graph(path: &Path) -> Result<(TypeGraph, String)> {
    let (source, source_name) = read_source(path)?;

    let file = parse_declarations_with_source(&source, Some(source_name.clone()))
        .map_err(|err| with_source(err, &source_name, &source))?;
    let graph =
        TypeGraph::from_declarations(&file).map_err(|err| with_source(err, &source_name, &source))?;

    debug!(file = %source_name, nodes = graph.len(), "loaded fixture");
    Ok((graph, source_name))
}

fn read_source(path: &Path) -> Result<(String, String)> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    if !path.exists() {
        return Err(CliError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let source = fs::read_to_string(path).into_diagnostic()?;
    Ok((source, path.display().to_string()))
}

fn with_source<E>(err: E, source_name: &str, source: &str) -> Report
where
    E: Diagnostic + Send + Sync + 'static,
{
    Report::new(err).with_source_code(NamedSource::new(source_name, source.to_string()))
}
