use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bp_catalog::{Config, Detector, entry_names};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bp", about = "Classify .bit names against numeric naming patterns")]
struct Cli {
    /// TOML config with `known_labels` and `exclude` (also BP_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pattern labels matched by each name
    Classify {
        /// Names to classify, each ending in `.bit`
        #[arg(required = true)]
        names: Vec<String>,

        /// Print a JSON object of name → labels
        #[arg(long)]
        json: bool,

        /// Also show which catalog entry produced each label
        #[arg(long, conflicts_with = "json")]
        explain: bool,
    },

    /// List catalog entries
    Patterns,

    /// Run one catalog entry on a raw input (no suffix)
    Check {
        /// Catalog entry name, as listed by `bp patterns`
        entry: String,

        /// Input to evaluate
        input: String,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .or_else(|| std::env::var("BP_CONFIG").ok().map(PathBuf::from));
    match path {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Classify {
            names,
            json,
            explain,
        } => cmd_classify(&cli, names, *json, *explain),
        Commands::Patterns => cmd_patterns(&cli),
        Commands::Check { entry, input } => cmd_check(&cli, entry, input),
    }
}

fn cmd_classify(cli: &Cli, names: &[String], json: bool, explain: bool) -> Result<()> {
    let config = load_config(cli)?;
    let detector = Detector::with_config(&config).context("invalid config")?;
    tracing::info!(
        "classifying {} name(s) against {} entries",
        names.len(),
        detector.entries().len()
    );

    if json {
        let mut out = BTreeMap::new();
        for name in names {
            let labels = detector
                .detect(name)
                .with_context(|| format!("failed to classify {name}"))?;
            out.insert(name.as_str(), labels);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for name in names {
        if explain {
            let matches = detector
                .matches(name)
                .with_context(|| format!("failed to classify {name}"))?;
            println!("{name}:");
            if matches.is_empty() {
                println!("  (no patterns)");
            }
            for m in matches {
                println!("  {:<20} {}", m.entry, m.label);
            }
            continue;
        }

        let labels = detector
            .detect(name)
            .with_context(|| format!("failed to classify {name}"))?;
        if labels.is_empty() {
            println!("{name}: (no patterns)");
        } else {
            let joined: Vec<&str> = labels.iter().map(String::as_str).collect();
            println!("{name}: {}", joined.join(", "));
        }
    }
    Ok(())
}

fn cmd_patterns(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    for name in entry_names() {
        let excluded = config.exclude.iter().any(|e| e == name);
        if excluded {
            println!("{name} (excluded)");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

fn cmd_check(cli: &Cli, entry: &str, input: &str) -> Result<()> {
    let config = load_config(cli)?;
    let detector = Detector::with_config(&config).context("invalid config")?;
    let found = detector
        .entries()
        .iter()
        .find(|e| e.name == entry)
        .with_context(|| format!("unknown or excluded catalog entry '{entry}'"))?;

    for (i, pattern) in found.patterns.iter().enumerate() {
        let exec = pattern
            .exec(input)
            .map_or("-".to_string(), |v| v.to_string());
        let label = pattern.serialize(input).unwrap_or_else(|| "-".to_string());
        println!(
            "{entry}[{i}]: exec={exec} test={} serialize={label}",
            pattern.test(input)
        );
    }
    Ok(())
}
