/// CLI: reads a definitions document from a file, emits model declarations.
///
/// Usage:
///   oas-modelgen --file spec.json                 > Models.swift
///   oas-modelgen --file spec.json --lenient --out Models.swift
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use oas_modelgen::compiler;
use oas_modelgen::generator::ModelGenerator;
use oas_modelgen::settings::{Indent, Settings};
use tracing_subscriber::EnvFilter;

/// Generates model declarations from the definitions of an OpenAPI / JSON Schema document
#[derive(Parser, Debug)]
#[command(name = "oas-modelgen", version)]
struct Cli {
    /// path to the specification JSON
    #[arg(short, long)]
    file: PathBuf,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// continue after definitions that fail to decode or generate
    #[arg(short, long, default_value_t = false)]
    lenient: bool,

    /// indent with N spaces instead of tabs
    #[arg(long, value_name = "N")]
    indent_spaces: Option<usize>,

    /// report progress per definition
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let indent = match self.indent_spaces {
            Some(n) => Indent::Spaces(n),
            None => Indent::Tab,
        };
        Settings::default().lenient(self.lenient).indent(indent)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let settings = cli.settings();

    let bytes = std::fs::read(&cli.file)
        .with_context(|| format!("cannot read {}", cli.file.display()))?;
    let document = compiler::decode(&bytes, settings.lenient)
        .with_context(|| format!("invalid specification {}", cli.file.display()))?;

    tracing::info!(
        file = %cli.file.display(),
        definitions = document.definitions.len(),
        "generating models"
    );
    let generation = ModelGenerator::new(&document)
        .indent(settings.indent)
        .generate_with_progress(|progress| {
            tracing::info!(
                percent = progress.percent,
                definition = progress.definition,
                "processed definition"
            );
        });

    if !generation.is_complete() && !settings.lenient {
        let reasons: Vec<String> = generation.failures.iter().map(|f| f.to_string()).collect();
        bail!("generation failed:\n  {}", reasons.join("\n  "));
    }

    let mut output = generation.render();
    output.push('\n');
    match &cli.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
            std::fs::write(out, output).with_context(|| format!("cannot write {}", out.display()))?;
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
