use anyhow::{bail, Context, Result};
use arxiv_checker::config::{
    find_config_file, get_config, load_config, write_config_file, Config, LOCAL_CONFIG_FILE,
};
use arxiv_checker::engine::{parse_query, QueryMode, QuerySource};
use arxiv_checker::feed::{read_paper, scrape, ArxivListingSource, ListingRequest, MonthSpec};
use arxiv_checker::utils::{
    format_author_report, format_keyword_report, is_terminal, load_snapshot, save_snapshot,
};
use arxiv_checker::{Corpus, CorpusBuilder, DuplicatePolicy, MatchEngine};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Checker - match arXiv listings against author and keyword watch-lists
#[derive(Parser, Debug)]
#[command(name = "arxiv-checker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Match arXiv listings against author and keyword watch-lists", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Strategy for papers listed under more than one category
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DedupStrategy {
    /// Keep the first listing of each paper
    First,
    /// Keep the first listing and add authors seen in later ones
    Merge,
}

impl From<DedupStrategy> for DuplicatePolicy {
    fn from(strategy: DedupStrategy) -> Self {
        match strategy {
            DedupStrategy::First => DuplicatePolicy::KeepFirst,
            DedupStrategy::Merge => DuplicatePolicy::MergeAuthors,
        }
    }
}

/// Where the corpus comes from
#[derive(Args, Debug, Clone, Default)]
struct ListingArgs {
    /// Categories to check (default: categories from the config file)
    #[arg(long = "category", short = 'c')]
    categories: Vec<String>,

    /// Read a saved snapshot instead of fetching listings
    #[arg(long, conflicts_with_all = ["categories", "recent", "month"])]
    snapshot: Option<PathBuf>,

    /// Read the past week instead of today's new submissions
    #[arg(long, conflicts_with = "month")]
    recent: bool,

    /// Read a monthly listing: 1-12, a month name, or "all" for the whole year
    #[arg(long)]
    month: Option<MonthSpec>,

    /// Year of the monthly listing (default: current year)
    #[arg(long, requires = "month")]
    year: Option<u32>,

    /// Entries per page for recent and monthly listings
    #[arg(long)]
    show: Option<usize>,

    /// Entries to skip in the recent listing
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Duplicate handling (default: from the config file)
    #[arg(long, value_enum)]
    dedup: Option<DedupStrategy>,
}

#[derive(Args, Debug, Clone, Default)]
struct ReportArgs {
    /// Column width of rendered papers
    #[arg(long, short)]
    width: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Also save the checked corpus as a snapshot
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank listing entries by keyword occurrences
    #[command(alias = "k")]
    Keywords {
        /// A keyword, or a file with one keyword per line
        query: String,

        #[command(flatten)]
        listing: ListingArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Find listing entries by watched authors ("Surname, First" per line)
    #[command(alias = "a")]
    Authors {
        /// An author, or a file with one author per line
        query: String,

        #[command(flatten)]
        listing: ListingArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Read papers from their abstract pages
    #[command(alias = "p")]
    Paper {
        /// arXiv identifiers (e.g. 2301.00001)
        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Fetch listings and save them as a snapshot
    Scrape {
        /// Snapshot file to write
        output: PathBuf,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: ./arxiv-checker.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match find_config_file() {
            Some(path) => load_config(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => get_config(),
        },
    };

    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_checker={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Keywords {
            query,
            listing,
            report,
        } => {
            let terms = parse_query(&QuerySource::probe(&query), QueryMode::Keywords)?;
            let corpus = load_corpus(&listing, &config).await?;
            save_if_requested(&corpus, report.save.as_deref())?;

            let matches = MatchEngine::new(&corpus).match_keywords(&terms);
            let (width, color) = report_style(&report, &config);
            print!("{}", format_keyword_report(&matches, width, color));
        }

        Commands::Authors {
            query,
            listing,
            report,
        } => {
            let terms = parse_query(&QuerySource::probe(&query), QueryMode::Authors)?;
            let corpus = load_corpus(&listing, &config).await?;
            save_if_requested(&corpus, report.save.as_deref())?;

            let matches = MatchEngine::new(&corpus).match_authors(&terms);
            let (width, color) = report_style(&report, &config);
            print!("{}", format_author_report(&matches, width, color));
        }

        Commands::Paper { ids, report } => {
            let source = ArxivListingSource::new(&config.feed)?;
            let policy = config.matching.duplicate_policy;
            let builder = CorpusBuilder::new(policy);
            let (width, _) = report_style(&report, &config);

            let mut corpus = Corpus::new();
            for id in &ids {
                let paper = read_paper(&source, id, &builder)
                    .await
                    .with_context(|| format!("Failed to read paper {}", id))?;
                print!("{}", paper.render(width));
                corpus.insert(paper, policy);
            }
            save_if_requested(&corpus, report.save.as_deref())?;
        }

        Commands::Scrape { output, listing } => {
            if listing.snapshot.is_some() {
                bail!("scrape fetches listings; --snapshot is not accepted here");
            }
            let corpus = load_corpus(&listing, &config).await?;
            save_snapshot(&corpus, &output)?;
            if !cli.quiet {
                println!("Saved {} papers to {}", corpus.len(), output.display());
            }
        }

        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            write_config_file(&get_config(), &path)?;
            if !cli.quiet {
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn duplicate_policy(listing: &ListingArgs, config: &Config) -> DuplicatePolicy {
    listing
        .dedup
        .map(DuplicatePolicy::from)
        .unwrap_or(config.matching.duplicate_policy)
}

/// Requests for every category, in the order given
fn build_requests(listing: &ListingArgs, config: &Config) -> Result<Vec<ListingRequest>> {
    let categories = if listing.categories.is_empty() {
        &config.feed.categories
    } else {
        &listing.categories
    };
    if categories.is_empty() {
        bail!("No categories given (use --category or set feed.categories in the config file)");
    }

    let show = listing.show.unwrap_or(config.feed.show);
    let year = listing
        .year
        .unwrap_or_else(|| chrono::Local::now().year() as u32);

    Ok(categories
        .iter()
        .map(|category| match (listing.month, listing.recent) {
            (Some(month), _) => ListingRequest::month(category.as_str(), year, month, show),
            (None, true) => ListingRequest::recent(category.as_str(), listing.skip, show),
            (None, false) => ListingRequest::new(category.as_str()),
        })
        .collect())
}

async fn load_corpus(listing: &ListingArgs, config: &Config) -> Result<Corpus> {
    let policy = duplicate_policy(listing, config);

    if let Some(path) = &listing.snapshot {
        return load_snapshot(path, policy)
            .with_context(|| format!("Failed to load snapshot {}", path.display()));
    }

    let requests = build_requests(listing, config)?;
    let source = ArxivListingSource::new(&config.feed)?;
    let corpus = scrape(&source, &requests, &CorpusBuilder::new(policy)).await?;
    tracing::info!(papers = corpus.len(), "Corpus ready");
    Ok(corpus)
}

fn save_if_requested(corpus: &Corpus, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        save_snapshot(corpus, path)?;
        eprintln!("{} {}", "Saved snapshot".dimmed(), path.display());
    }
    Ok(())
}

fn report_style(report: &ReportArgs, config: &Config) -> (usize, bool) {
    let width = report.width.unwrap_or(config.display.width);
    let color = config.display.color && !report.no_color && is_terminal();
    (width, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arxiv_checker::feed::ListingMode;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_verbose_and_quiet() {
        let cli = Cli::parse_from(["arxiv-checker", "-vv", "init-config"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["arxiv-checker", "init-config", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_authors_command() {
        let cli = Cli::parse_from([
            "arxiv-checker",
            "authors",
            "Doe, Jane",
            "-c",
            "astro-ph.EP",
            "-c",
            "gr-qc",
            "--recent",
            "--dedup",
            "merge",
        ]);

        match cli.command {
            Commands::Authors { query, listing, .. } => {
                assert_eq!(query, "Doe, Jane");
                assert_eq!(listing.categories, vec!["astro-ph.EP", "gr-qc"]);
                assert!(listing.recent);
                assert_eq!(listing.dedup, Some(DedupStrategy::Merge));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_keywords_month() {
        let cli = Cli::parse_from([
            "arxiv-checker",
            "k",
            "exoplanet",
            "-c",
            "astro-ph",
            "--month",
            "sept",
            "--year",
            "2021",
            "--width",
            "100",
        ]);

        match cli.command {
            Commands::Keywords {
                listing, report, ..
            } => {
                assert_eq!(listing.month, Some(MonthSpec::Month(9)));
                assert_eq!(listing.year, Some(2021));
                assert_eq!(report.width, Some(100));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_paper_command() {
        let cli = Cli::parse_from([
            "arxiv-checker",
            "paper",
            "2301.00001",
            "astro-ph/0601001",
            "--save",
            "papers.json",
        ]);

        match cli.command {
            Commands::Paper { ids, report } => {
                assert_eq!(ids, vec!["2301.00001", "astro-ph/0601001"]);
                assert_eq!(report.save, Some(PathBuf::from("papers.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["arxiv-checker", "paper"]).is_err());
    }

    #[test]
    fn test_cli_snapshot_conflicts_with_categories() {
        let result = Cli::try_parse_from([
            "arxiv-checker",
            "authors",
            "Doe, Jane",
            "--snapshot",
            "today.json",
            "-c",
            "astro-ph",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_bad_month() {
        let result = Cli::try_parse_from([
            "arxiv-checker",
            "keywords",
            "dust",
            "-c",
            "astro-ph",
            "--month",
            "13",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_requests_modes() {
        let config = Config::default();

        let listing = ListingArgs {
            categories: vec!["astro-ph".to_string()],
            ..ListingArgs::default()
        };
        let requests = build_requests(&listing, &config).unwrap();
        assert_eq!(requests, vec![ListingRequest::new("astro-ph")]);

        let listing = ListingArgs {
            categories: vec!["astro-ph".to_string()],
            recent: true,
            skip: 25,
            show: Some(50),
            ..ListingArgs::default()
        };
        let requests = build_requests(&listing, &config).unwrap();
        assert_eq!(
            requests[0].mode,
            ListingMode::Recent { skip: 25, show: 50 }
        );

        let listing = ListingArgs {
            categories: vec!["astro-ph".to_string()],
            month: Some(MonthSpec::All),
            year: Some(2019),
            ..ListingArgs::default()
        };
        let requests = build_requests(&listing, &config).unwrap();
        assert_eq!(
            requests[0].mode,
            ListingMode::Month {
                year: 19,
                month: MonthSpec::All,
                show: 200
            }
        );
    }

    #[test]
    fn test_build_requests_uses_config_categories() {
        let mut config = Config::default();
        assert!(build_requests(&ListingArgs::default(), &config).is_err());

        config.feed.categories = vec!["gr-qc".to_string()];
        let requests = build_requests(&ListingArgs::default(), &config).unwrap();
        assert_eq!(requests[0].category, "gr-qc");
    }

    #[test]
    fn test_dedup_overrides_config() {
        let mut config = Config::default();
        config.matching.duplicate_policy = DuplicatePolicy::MergeAuthors;

        let listing = ListingArgs {
            dedup: Some(DedupStrategy::First),
            ..ListingArgs::default()
        };
        assert_eq!(duplicate_policy(&listing, &config), DuplicatePolicy::KeepFirst);
        assert_eq!(
            duplicate_policy(&ListingArgs::default(), &config),
            DuplicatePolicy::MergeAuthors
        );
    }
}
