mod seed;

use clap::{Parser, Subcommand};
use glossa_core::auth::{Principal, Role};
use glossa_core::config;
use glossa_core::query::{PageRequest, SearchFilter, SortDirection, SortField};
use glossa_service::Catalog;
use glossa_store::Store;

#[derive(Parser)]
#[command(
    name = "glossa",
    version,
    about = "Glossa — multilingual translation catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-locale catalog statistics.
    Status,
    /// Seed the catalog with generated sample data.
    Seed {
        /// Number of translations to generate.
        #[arg(long, default_value_t = 500)]
        count: usize,
    },
    /// Print a locale-keyed JSON export snapshot.
    Export {
        /// Restrict the snapshot to one locale.
        #[arg(long)]
        locale: Option<String>,
    },
    /// Look up one translation by key and locale.
    Get { key: String, locale: String },
    /// Search translations with optional filters.
    Search {
        /// Key substring (case-sensitive).
        #[arg(long)]
        key: Option<String>,
        /// Exact locale.
        #[arg(long)]
        locale: Option<String>,
        /// Content substring (case-insensitive).
        #[arg(long)]
        content: Option<String>,
        /// Exact tag name.
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
        #[arg(long, default_value = "updatedAt")]
        sort_by: String,
        #[arg(long, default_value = "desc")]
        sort_direction: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load(&cli.config)?;
    let store = Store::new(&cfg.storage).await?;
    let catalog = Catalog::new(store, &cfg);

    // The CLI is a local administration surface; network boundaries
    // resolve real principals through their identity provider.
    let principal = Principal::new("cli", Role::Admin);

    match cli.command {
        Commands::Status => {
            let locales = catalog.available_locales(&principal).await?;
            if locales.is_empty() {
                println!("catalog is empty");
                return Ok(());
            }
            let mut total = 0u64;
            for locale in &locales {
                let count = catalog.count_by_locale(&principal, locale).await?;
                total += count;
                println!("{locale:>8}  {count}");
            }
            println!("{:>8}  {total}", "total");
        }
        Commands::Seed { count } => {
            seed::run(&catalog, &principal, count).await?;
        }
        Commands::Export { locale } => {
            let snapshot = catalog.export(locale.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Get { key, locale } => {
            let translation = catalog
                .get_translation_by_key(&principal, &key, &locale)
                .await?;
            println!("{}", serde_json::to_string_pretty(&translation)?);
        }
        Commands::Search {
            key,
            locale,
            content,
            tag,
            page,
            size,
            sort_by,
            sort_direction,
        } => {
            let filter = SearchFilter {
                key,
                locale,
                content,
                tag,
            };
            let request = PageRequest {
                page,
                size,
                sort_by: sort_by.parse::<SortField>()?,
                sort_direction: sort_direction.parse::<SortDirection>()?,
            };
            let results = catalog
                .search_translations(&principal, filter, request)
                .await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
