use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info};

use litanizer::{
    BalancedSampler, Language, LitanySession, LocalPool,
    clients::WikipediaClient,
    config::Config,
    litany::{LitanySource, seed_from_input},
    observability,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a litany of things", long_about = None)]
struct Cli {
    /// Wikipedia language code (overrides LITANIZER_LANG)
    #[arg(long)]
    lang: Option<String>,

    /// Number of items in the litany, clamped to 6..=40 (overrides LITANIZER_COUNT)
    #[arg(long)]
    count: Option<usize>,

    /// Seed text; the same text reproduces the same litany
    #[arg(long, default_value = "")]
    seed: String,

    /// Print the litany in upper case
    #[arg(long)]
    caps: bool,

    /// Word list file (JSON array or one item per line)
    #[arg(long)]
    pool_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw from the local word list only
    Local,
    /// Draw from random Wikipedia titles with a capped share of people
    Wiki,
    /// Draw from Wikipedia titles related to a keyword
    Theme {
        /// Keyword to search for
        keyword: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(message, "panic occurred without location information");
        }
    }));

    observability::init().context("failed to initialize tracing")?;

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let language = match cli.lang.as_deref() {
        Some(code) => code
            .parse::<Language>()
            .with_context(|| format!("invalid language {code:?}"))?,
        None => config.language().clone(),
    };

    let local = match cli.pool_file.as_deref() {
        Some(path) => LocalPool::load(path)
            .with_context(|| format!("failed to load word list from {}", path.display()))?,
        None => LocalPool::default(),
    };

    let mut session = LitanySession::new(local)
        .with_language(language)
        .with_sampling(config.person_cap(), config.oversample_factor());
    session.set_count(cli.count.unwrap_or_else(|| config.count()));
    session.set_caps(cli.caps);

    // A text seed makes every draw reproducible, including the sampler's.
    let mut rng = if cli.seed.trim().is_empty() {
        StdRng::from_rng(&mut rand::rng())
    } else {
        StdRng::seed_from_u64(u64::from(seed_from_input(&cli.seed, &mut rand::rng())))
    };

    match cli.command {
        Command::Local => {
            session.set_source(LitanySource::Local);
            session.reseed(&cli.seed, &mut rng);
            session.generate();
        }
        Command::Wiki => {
            let sampler = build_sampler(&config)?;
            session
                .pull_from_wiki(&sampler, &cli.seed, &mut rng)
                .await
                .context("failed to load wikipedia titles")?;
        }
        Command::Theme { keyword } => {
            let sampler = build_sampler(&config)?;
            session
                .pull_theme(&sampler, &keyword, &cli.seed, &mut rng)
                .await
                .with_context(|| format!("failed to load titles for {keyword:?}"))?;
        }
    }

    info!(
        seed = session.last_seed(),
        count = session.litany().len(),
        "litany ready"
    );
    println!("{}", session.text());

    Ok(())
}

fn build_sampler(config: &Config) -> anyhow::Result<BalancedSampler<WikipediaClient>> {
    let client =
        WikipediaClient::new(config.wikipedia()).context("failed to build wikipedia client")?;
    Ok(BalancedSampler::new(client))
}
