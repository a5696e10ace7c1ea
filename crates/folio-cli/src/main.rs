//! CLI entry point for the Folio backend (for dev and testing).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::{
    app_data_dir, get_data_root, load_config, load_library, set_data_root, Config, DataPaths,
    Library, QueryOutcome, QuerySettings,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio: book recommendations from a precomputed similarity matrix")]
struct Cli {
    /// Directory with the recommendation artifacts (overrides config and FOLIO_DATA).
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Load the artifacts and report whether recommendations can be served.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show where Folio stores its config (app data directory).
    DataDir,
    /// Remember the artifact directory in the config.
    SetData {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// List the precomputed popular books.
    Popular {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Recommend books similar to TITLE.
    Recommend {
        #[arg(value_name = "TITLE")]
        title: String,
        /// Number of recommendations (default from config).
        #[arg(short)]
        k: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Autocomplete titles containing PREFIX.
    Suggest {
        #[arg(value_name = "PREFIX")]
        prefix: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the first N ranked titles.
    Titles {
        #[arg(default_value_t = 20)]
        n: usize,
    },
    /// Show catalog details for TITLE.
    Lookup {
        #[arg(value_name = "TITLE")]
        title: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config();

    match cli.command.unwrap_or(Commands::Status { json: false }) {
        Commands::DataDir => match app_data_dir() {
            Some(p) => println!("{}", p.display()),
            None => eprintln!("Could not determine app data directory."),
        },
        Commands::SetData { path } => {
            set_data_root(&path).with_context(|| format!("setting data root to {}", path.display()))?;
            println!("Data root set to {}", path.display());
        }
        Commands::Status { json } => {
            // Report a load failure as "not ready" rather than bailing out.
            let library = match open_library(cli.data, &config) {
                Ok(library) => library,
                Err(e) => {
                    tracing::error!("{e:#}");
                    Library::unready()
                }
            };
            let status = library.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Folio backend");
                println!("  ready:          {}", status.ready);
                if let Some(root) = &status.data_root {
                    println!("  data root:      {}", root.display());
                }
                println!("  popular books:  {}", status.popular_rows);
                println!(
                    "  catalog:        {} entries, {} titles",
                    status.catalog_entries, status.catalog_titles
                );
                println!("  ranked titles:  {}", status.ranked_titles);
                println!("  similarity:     {0}x{0}", status.similarity_dim);
                if !status.files.is_empty() {
                    println!("  files:          {}", status.files.join(", "));
                }
            }
        }
        Commands::Popular { limit } => {
            let library = open_library(cli.data, &config)?;
            for book in library.popular().iter().take(limit) {
                println!(
                    "{}  by {} ({})  {} ratings, avg {:.2}",
                    book.title,
                    book.author,
                    book.year,
                    book.num_ratings,
                    book.rounded_rating()
                );
            }
        }
        Commands::Recommend { title, k, json } => {
            let library = open_library(cli.data, &config)?;
            let mut settings = QuerySettings::from(&config);
            if let Some(k) = k {
                settings.recommendations = k;
            }
            let outcome = library.query(&title, &settings);
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            match outcome {
                QueryOutcome::EmptyQuery => eprintln!("Please enter a book name."),
                QueryOutcome::Found { recommendations } => {
                    for r in recommendations {
                        println!("{:>6.2}%  {}  by {} ({})", r.similarity, r.title, r.author, r.year);
                    }
                }
                QueryOutcome::NotFound { query, suggestions } => {
                    println!("Book \"{query}\" not found in our database.");
                    if !suggestions.is_empty() {
                        println!("Try one of:");
                        for s in suggestions {
                            println!("  {s}");
                        }
                    }
                }
            }
        }
        Commands::Suggest { prefix, limit } => {
            let library = open_library(cli.data, &config)?;
            let limit = limit.unwrap_or(config.suggestions);
            for title in library.engine().suggest_titles(&prefix, limit) {
                println!("{title}");
            }
        }
        Commands::Titles { n } => {
            let library = open_library(cli.data, &config)?;
            for title in library.engine().first_n(n) {
                println!("{title}");
            }
        }
        Commands::Lookup { title } => {
            let library = open_library(cli.data, &config)?;
            let catalog = library.engine().catalog();
            match catalog.lookup(&title) {
                Some(entry) => {
                    println!("{}", entry.title);
                    println!("  author:    {}", entry.author);
                    println!("  year:      {}", entry.publication_year);
                    println!("  publisher: {}", entry.publisher);
                    println!("  isbn:      {}", entry.isbn);
                    println!("  image:     {}", entry.medium_image_url);
                    println!("  editions:  {}", catalog.editions(&title).len());
                }
                None => println!("No catalog entry for \"{}\".", title.trim()),
            }
        }
    }
    Ok(())
}

/// Loads the library from `--data`, `FOLIO_DATA`, or the configured data root.
fn open_library(data: Option<PathBuf>, config: &Config) -> Result<Library> {
    let root = data
        .or_else(get_data_root)
        .context("no data root configured; pass --data, set FOLIO_DATA, or run `folio set-data`")?;
    let paths = DataPaths::in_dir(&root, &config.artifacts);
    let library = load_library(&paths)
        .with_context(|| format!("loading artifacts from {}", root.display()))?;
    tracing::info!(titles = library.engine().len(), "library ready");
    Ok(library)
}
