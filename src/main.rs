use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use ox_tokenproc::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPANSIONS, TokenReplacer, load_config};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when one or more tokens could not be resolved.
const EXIT_TOKEN_ERRORS: u8 = 1;
/// Exit status when the config could not be loaded or an input failed.
const EXIT_FATAL: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Preprocess text and apply substitutions for all ${...} tokens. Sends updated text to stdout.",
    long_about = None
)]
struct Cli {
    /// Input file(s). Standard input is read when none are given, or for `-`.
    input: Vec<String>,
    /// The config file supplying token values (json, yaml, toml or json5).
    #[arg(short, long, default_value = "app.json")]
    config: PathBuf,
    /// How many levels of config values referencing other values to follow.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// How many embedded tokens a single input token may pull in.
    #[arg(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
    max_expansions: usize,
    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Returns whether every token resolved.
fn run(cli: &Cli) -> Result<bool> {
    let config = load_config(&cli.config).context("Error during initialization")?;
    info!("Loaded config from {:?}", cli.config);

    let mut replacer = TokenReplacer::new(&config)
        .with_max_depth(cli.max_depth)
        .with_max_expansions(cli.max_expansions);
    let mut out = BufWriter::new(io::stdout().lock());
    replacer
        .process_sources(cli.input.as_slice(), &mut out)
        .context("Error processing input")?;

    let diagnostics = replacer.diagnostics();
    info!(
        "Processed {} line(s), {} token(s), {} error(s)",
        replacer.line_number(),
        diagnostics.token_count(),
        diagnostics.failure_count()
    );

    if replacer.all_resolved() {
        return Ok(true);
    }
    eprintln!("{}", diagnostics.summary());
    for token in diagnostics.failed_tokens() {
        eprintln!("  {}", token);
    }
    Ok(false)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("CLI arguments: {:?}", cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_TOKEN_ERRORS),
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
