use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sponsorscout_api::GitHubClient;
use sponsorscout_core::{
    compute_bounds,
    format::{compact_number, price_label},
    suggest, topic_frequency, Config, DataSource, ExportFormat, Exporter, FeedLocation,
    FilterCriteria, FilterEngine, GitHubProvider, Listing,
};
use sponsorscout_tui::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sponsorscout")]
#[command(version, about = "Browse open source repositories that sell sponsorship placements", long_about = None)]
struct Cli {
    /// Sponsorship feed, a CSV URL or a local file
    #[arg(long, global = true, env = "GITHUB_ENTRIES_URL")]
    feed: Option<String>,

    /// GitHub token, raises the API rate limit
    #[arg(long, global = true, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List repositories matching the filters
    List {
        /// Fuzzy search over name, topics and description
        #[arg(short, long, default_value = "")]
        query: String,
        /// Only repositories with this topic (repeatable, any one matches)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Minimum stars (0 turns the star filter off)
        #[arg(long)]
        min_stars: Option<u64>,
        /// Maximum stars
        #[arg(long)]
        max_stars: Option<u64>,
        /// Maximum monthly price
        #[arg(long)]
        max_price: Option<f64>,
        /// Leave out README placements
        #[arg(long)]
        no_readme: bool,
        /// Leave out website placements
        #[arg(long)]
        no_website: bool,
        /// Output format, defaults to the --output extension or a table
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show topics, most frequent first
    Topics {
        /// Only topics containing this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Mark these topics as selected
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Show the star and price ranges of the feed
    Bounds,
    /// Browse interactively
    Browse,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => ExportFormat::Table,
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Markdown => ExportFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for json/csv output
    let default_filter = if cli.verbose {
        "sponsorscout=debug"
    } else {
        "sponsorscout=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = cli.command.as_ref() else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    let config = load_config(&cli)?;
    let universe = load_universe(&config).await?;

    match command {
        Commands::List {
            query,
            tags,
            min_stars,
            max_stars,
            max_price,
            no_readme,
            no_website,
            format,
            output,
        } => {
            let mut criteria = FilterCriteria::seeded(&compute_bounds(&universe));
            criteria.query = query.clone();
            criteria.tags = tags.clone();
            if let Some(min) = min_stars {
                criteria.min_stars = *min;
            }
            if let Some(max) = max_stars {
                criteria.max_stars = *max;
            }
            if let Some(price) = max_price {
                criteria.max_price = *price;
            }
            criteria.placement.readme = !no_readme;
            criteria.placement.website = !no_website;

            let engine = FilterEngine::new(config.search.clone());
            let results = engine.filter(&universe, &criteria);
            tracing::info!("{} of {} repositories match", results.len(), universe.len());

            write_results(&results, *format, output.as_deref())?;
        }
        Commands::Topics { search, tags } => {
            let index = topic_frequency(&universe);
            let criteria = FilterCriteria {
                tags: tags.clone(),
                ..FilterCriteria::default()
            };

            for suggestion in suggest(&index, search, &criteria) {
                let mark = if suggestion.selected { " ✓" } else { "" };
                println!("{:>4}  {}{}", suggestion.count, suggestion.topic, mark);
            }
        }
        Commands::Bounds => {
            let bounds = compute_bounds(&universe);
            if bounds.is_empty() {
                println!("The feed is empty");
                return Ok(());
            }

            if let Some(marks) = bounds.stars.marks() {
                let labels: Vec<String> = marks.iter().map(|m| compact_number(*m)).collect();
                println!("stars: {} - {}", bounds.stars.min, bounds.stars.max);
                println!("       marks {}", labels.join(" | "));
            }
            match bounds.price.marks() {
                Some(marks) => {
                    let labels: Vec<String> = marks.iter().map(|m| price_label(*m)).collect();
                    println!("price: {} - {}", bounds.price.min, bounds.price.max);
                    println!("       marks {}", labels.join(" | "));
                }
                None => println!("price: no valid prices"),
            }
        }
        Commands::Browse => {
            let app = App::new(universe, config.search.clone(), &config.ui);
            sponsorscout_tui::run_tui(app)?;
        }
    }

    Ok(())
}

/// Config file, then flags and env vars on top
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(feed) = &cli.feed {
        config.feed.url = Some(feed.clone());
    }
    if let Some(token) = &cli.token {
        config.github.token = Some(token.clone());
    }
    if let Some(api_url) = &cli.api_url {
        config.github.api_url = api_url.clone();
    }

    Ok(config)
}

async fn load_universe(config: &Config) -> anyhow::Result<Vec<Listing>> {
    let feed = config.feed.url.as_deref().context(
        "No sponsorship feed configured. Pass --feed, set GITHUB_ENTRIES_URL or add [feed] url to the config file",
    )?;

    let client = GitHubClient::with_base_url(config.github.token.clone(), config.github.api_url.clone())
        .with_retry_config(config.retry.clone());
    if !client.has_token() {
        tracing::debug!("No GitHub token, unauthenticated rate limits apply");
    }

    let source = DataSource::new(Box::new(GitHubProvider::new(client)), config.retry.clone())
        .with_concurrency(config.feed.concurrency);

    let location = FeedLocation::from(feed);
    let universe = source
        .load(&location)
        .await
        .with_context(|| format!("Failed to load sponsorship feed from {}", location))?;

    Ok(universe)
}

fn write_results(
    results: &[&Listing],
    format: Option<OutputFormat>,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    match (output, format) {
        (Some(path), None) => {
            Exporter::export_to_file(results, path)?;
            println!("Exported {} repositories to {}", results.len(), path.display());
        }
        (Some(path), Some(format)) => {
            std::fs::write(path, Exporter::render(results, format.into())?)?;
            println!("Exported {} repositories to {}", results.len(), path.display());
        }
        (None, format) => {
            let format = format.map(ExportFormat::from).unwrap_or(ExportFormat::Table);
            print!("{}", Exporter::render(results, format)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = Cli::parse_from([
            "sponsorscout",
            "--config",
            "/definitely/not/here.toml",
            "--feed",
            "./feed.csv",
            "--api-url",
            "https://ghe.example.com/api/v3",
            "bounds",
        ]);

        let config = load_config(&cli).unwrap();
        assert_eq!(config.feed.url.as_deref(), Some("./feed.csv"));
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert!(matches!(cli.command, Some(Commands::Bounds)));
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::parse_from([
            "sponsorscout",
            "list",
            "--tag",
            "rust",
            "--tag",
            "cli",
            "--max-price",
            "50",
            "--no-website",
            "--format",
            "json",
        ]);

        match cli.command {
            Some(Commands::List {
                tags,
                max_price,
                no_website,
                no_readme,
                format,
                ..
            }) => {
                assert_eq!(tags, vec!["rust", "cli"]);
                assert_eq!(max_price, Some(50.0));
                assert!(no_website);
                assert!(!no_readme);
                assert!(matches!(format, Some(OutputFormat::Json)));
            }
            _ => panic!("expected list"),
        }
    }
}
