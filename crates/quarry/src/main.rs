//! Quarry command-line interface.
//!
//! Compiles views to SQL, checks a whole view set, and tries out column
//! filter expressions. Executing SQL is left to a `RowSource` embedding.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use quarry::{
    Fingerprint, ScalarValue, Settings, ViewSession, params_from_pairs, parse_param,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(about = "Parameterized SQL views over heterogeneous backends")]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, env = "QUARRY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Path to queries.json, overriding the settings file
    #[arg(long, env = "QUARRY_QUERIES")]
    queries: Option<PathBuf>,

    /// Path to the views document, overriding the settings file
    #[arg(long, env = "QUARRY_VIEWS")]
    views: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a view and print its SQL, binds and headers
    Compile {
        /// View id
        view: String,

        /// Runtime parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, ScalarValue)>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Compile every view without parameters and report failures
    Check,

    /// Show which values a column filter expression accepts
    Filter {
        /// Filter expression, e.g. ">= 100" or "re:^A"
        expression: String,

        /// Cell values to test
        values: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            ref expression,
            ref values,
        } => {
            handle_filter(expression, values);
            Ok(())
        }
        Commands::Compile {
            ref view,
            ref params,
            format,
        } => {
            let session = load_session(&cli)?;
            handle_compile(&session, view, params.clone(), format)
        }
        Commands::Check => {
            let session = load_session(&cli)?;
            handle_check(&session)
        }
    }
}

fn load_session(cli: &Cli) -> anyhow::Result<ViewSession> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(queries) = &cli.queries {
        settings = settings.with_queries(queries.clone());
    }
    if let Some(views) = &cli.views {
        settings = settings.with_views(views.clone());
    }
    info!(
        queries = %settings.queries().display(),
        views = %settings.views().display(),
        "Loading configuration"
    );

    Ok(ViewSession::from_settings(&settings)?)
}

#[tracing::instrument(skip(session, params))]
fn handle_compile(
    session: &ViewSession,
    view_id: &str,
    params: Vec<(String, ScalarValue)>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let params = params_from_pairs(params);
    let compiled = session.compile(view_id, &params)?;
    let fingerprint = Fingerprint::compute(view_id, compiled.sql(), compiled.binds());

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "view": view_id,
                "compiled": compiled,
                "fingerprint": fingerprint,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Human => {
            println!("-- view:        {}", view_id);
            println!(
                "-- connection:  {} ({})",
                compiled.connection(),
                compiled.dialect()
            );
            println!("-- fingerprint: {}", fingerprint);
            println!("{}", compiled.sql());
            let binds: Vec<String> = compiled.binds().iter().map(ScalarValue::repr).collect();
            println!("-- binds:   [{}]", binds.join(", "));
            println!("-- headers: {}", compiled.headers().join(" | "));
        }
    }
    Ok(())
}

fn handle_check(session: &ViewSession) -> anyhow::Result<()> {
    let empty = params_from_pairs(Vec::new());
    let mut failures = 0usize;

    for view in session.views().iter() {
        match session.compile(view.id(), &empty) {
            Ok(compiled) => println!("ok    {} ({})", view.id(), compiled.dialect()),
            Err(e) => {
                failures += 1;
                println!("FAIL  {}: {}", view.id(), e);
            }
        }
    }

    let total = session.views().len();
    println!("\n{} of {} views compiled", total - failures, total);
    if failures > 0 {
        bail!("{} view(s) failed to compile", failures);
    }
    Ok(())
}

fn handle_filter(expression: &str, values: &[String]) {
    let Some(rule) = quarry_filter::compile(expression) else {
        println!("empty expression: no filter, every value passes");
        return;
    };
    println!("rule: {}", rule);
    for value in values {
        let verdict = if rule.matches(value) { "match" } else { "-" };
        println!("{:>6}  {}", verdict, value);
    }
}
