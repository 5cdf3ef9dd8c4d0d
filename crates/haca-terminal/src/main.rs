//! HACA archive terminal
//!
//! Interactive line-oriented front end for the archive core. Logs go to
//! stderr (filter from `HACA_LOG`, default `warn`); the transcript goes to
//! stdout.

mod render;
mod repl;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use haca_core::{Terminal, TerminalConfig};
use haca_corpus::{load_corpus, parse_corpus, Corpus, CorpusFormat};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Corpus used when `--corpus` is not given
const DEMO_ARCHIVE: &str = include_str!("../data/archive.yaml");

/// Log filter variable
const LOG_ENV: &str = "HACA_LOG";

fn cli() -> Command {
    Command::new("haca-terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HACA deep archive terminal")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Terminal configuration (TOML)"),
        )
        .arg(
            Arg::new("corpus")
                .long("corpus")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Archive corpus (.yaml, .yml or .json); defaults to the bundled demo"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed for glitch glyphs and flashes"),
        )
        .subcommand(
            Command::new("check")
                .about("Validate corpus and configuration, then print counts")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_corpus_arg(matches: &ArgMatches) -> Result<Corpus> {
    match matches.get_one::<PathBuf>("corpus") {
        Some(path) => load_corpus(path)
            .with_context(|| format!("failed to load corpus {}", path.display())),
        None => parse_corpus(DEMO_ARCHIVE, CorpusFormat::Yaml).context("bundled demo corpus is invalid"),
    }
}

fn load_config_arg(matches: &ArgMatches) -> Result<TerminalConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => TerminalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(TerminalConfig::default()),
    }
}

fn check(corpus: &Corpus, config: &TerminalConfig, json: bool) -> Result<()> {
    config.validate().context("invalid configuration")?;

    let stats = corpus.stats();
    let mut by_clearance: BTreeMap<String, usize> = BTreeMap::new();
    for document in corpus.documents() {
        *by_clearance
            .entry(document.required_clearance().to_string())
            .or_default() += 1;
    }

    if json {
        let report = serde_json::json!({
            "accounts": {
                "standard": stats.standard_accounts,
                "hidden": stats.hidden_accounts,
                "secret": stats.secret_accounts,
            },
            "documents": stats.documents,
            "documents_by_clearance": by_clearance,
            "keywords": config.markup.keywords,
        });
        let text = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{text}");
    } else {
        println!("Corpus OK");
        println!("  Standard accounts: {}", stats.standard_accounts);
        println!("  Hidden accounts:   {}", stats.hidden_accounts);
        println!("  Secret accounts:   {}", stats.secret_accounts);
        println!("  Documents:         {}", stats.documents);
        for (clearance, count) in &by_clearance {
            println!("    {clearance}: {count}");
        }
        println!("Config OK");
        println!("  Keywords: {}", config.markup.keywords.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    let corpus = load_corpus_arg(&matches)?;
    let config = load_config_arg(&matches)?;

    if let Some(("check", args)) = matches.subcommand() {
        return check(&corpus, &config, args.get_flag("json"));
    }

    let rng = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };
    let stats = corpus.stats();
    tracing::info!(
        documents = stats.documents,
        accounts = stats.standard_accounts + stats.hidden_accounts + stats.secret_accounts,
        "Archive loaded"
    );

    let terminal =
        Terminal::new(Arc::new(corpus), config).context("failed to start terminal")?;
    repl::run(terminal, rng).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn demo_archive_loads_and_passes_check() {
        let corpus = parse_corpus(DEMO_ARCHIVE, CorpusFormat::Yaml).unwrap();
        let stats = corpus.stats();
        assert!(stats.documents > 0);
        assert!(stats.hidden_accounts > 0);
        assert!(stats.secret_accounts > 0);
        assert!(corpus.find_account("intern-01").is_some());
        assert!(corpus.find_document("sys-001").is_some());
        check(&corpus, &TerminalConfig::default(), true).unwrap();
    }

    #[test]
    fn demo_archive_has_an_infected_secret_account() {
        let corpus = parse_corpus(DEMO_ARCHIVE, CorpusFormat::Yaml).unwrap();
        assert!(corpus
            .accounts(haca_corpus::AccountTier::Secret)
            .any(haca_corpus::Account::is_infected));
    }

    #[test]
    fn global_flags_reach_check() {
        let matches = cli()
            .try_get_matches_from(["haca-terminal", "check", "--corpus", "x.yaml", "--json"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("corpus"),
            Some(&PathBuf::from("x.yaml"))
        );
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "check");
        assert!(args.get_flag("json"));
    }
}
