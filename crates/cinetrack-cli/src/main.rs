use cinetrack_core::{CreditSort, OriginFilter, SortKey, StatusFilter};
use cinetrack_models::{MediaKind, WatchStatus};
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, discover, entries, filmography, library, seasons, stats, watch};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinetrack")]
#[command(about = "CineTrack - Your movie and series list, with new-season alerts")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your library
    #[command(long_about = "Show your list filtered by kind, status, origin and a search term. Search matches title, original title and release year.")]
    List {
        /// movie or series
        #[arg(long)]
        kind: Option<MediaKind>,

        /// all, favorites, watching, planned, completed or dropped
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// all, domestic or foreign (by original language)
        #[arg(long, default_value = "all")]
        origin: OriginFilter,

        #[arg(long)]
        search: Option<String>,

        /// default, score, year or added
        #[arg(long, default_value = "default")]
        sort: SortKey,
    },
    /// Show watch statistics
    Stats,
    /// Add an item to your list, or update it if it is already there
    #[command(long_about = "Save a movie or series under its catalog id. Catalog details (genres, runtime, season counts) are fetched when the catalog is reachable; the item is saved without them otherwise.")]
    Add {
        catalog_id: u64,

        /// movie or series
        #[arg(long)]
        kind: MediaKind,

        #[arg(long, default_value = "planned")]
        status: WatchStatus,

        /// 1-10, kept only for completed or dropped items
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        score: Option<u8>,

        /// Current season (series only)
        #[arg(long)]
        season: Option<u32>,

        /// Current episode (series only)
        #[arg(long)]
        episode: Option<u32>,

        #[arg(long)]
        review: Option<String>,

        /// Title to store if the catalog cannot be reached
        #[arg(long)]
        title: Option<String>,
    },
    /// Change the status, score, review or progress of an item in your list
    #[command(long_about = "Edit an item already in your list. Options that are not given keep their stored value. The score is kept only for completed or dropped items.")]
    Update {
        catalog_id: u64,

        #[arg(long)]
        status: Option<WatchStatus>,

        /// 1-10, kept only for completed or dropped items
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        score: Option<u8>,

        /// Current season (series only)
        #[arg(long)]
        season: Option<u32>,

        /// Current episode (series only)
        #[arg(long)]
        episode: Option<u32>,

        #[arg(long)]
        review: Option<String>,
    },
    /// Toggle the favorite flag of an item
    Favorite { catalog_id: u64 },
    /// Remove an item from your list
    Remove { catalog_id: u64 },
    /// Show another user's list
    Shared {
        owner_id: String,

        /// movie or series
        #[arg(long)]
        kind: Option<MediaKind>,
    },
    /// Show a person's movie and series credits
    Filmography {
        person_id: u64,

        /// vote-desc, vote-asc, date-desc, date-asc or name-asc
        #[arg(long, default_value = "vote-desc")]
        sort: CreditSort,
    },
    /// Search the catalog for movies and series
    Search {
        query: String,

        /// movie or series
        #[arg(long)]
        kind: Option<MediaKind>,
    },
    /// Suggest titles like one you liked
    #[command(long_about = "Pick a random movie or series from your list that you scored 7 or more, are watching or have completed, and show what the catalog recommends for it.")]
    Recommend {
        /// movie or series
        #[arg(long, default_value = "movie")]
        kind: MediaKind,
    },
    /// Pick a random item from your list that you have not completed
    Pick {
        /// movie or series
        #[arg(long, default_value = "movie")]
        kind: MediaKind,
    },
    /// Check completed series for new seasons (once per day)
    #[command(long_about = "Compare the season count of every completed series in your list with the catalog. Runs at most once per calendar day on this device. New seasons can be accepted, which moves the series back to planned.")]
    CheckSeasons {
        /// Accept every detected new season without asking
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,

        /// Only report detected new seasons
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "yes")]
        no_prompt: bool,
    },
    /// Follow your list and check for new seasons in the background
    #[command(long_about = "Subscribe to your list and print statistics on every change. The season check runs on startup and then on the configured poll interval; it still does real work at most once per day. Logs go to a daily rotated file.")]
    Watch {
        /// Skip the season check on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_check: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a starter configuration file
    Init {
        /// User id that owns this device's list (prompted if missing)
        #[arg(long)]
        owner_id: Option<String>,

        /// Catalog API key (prompted if missing)
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // watch sets up its own file logging
    if !matches!(cli.command, Commands::Watch { .. }) {
        logging::init_logging(cli.verbose, cli.quiet)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to initialize logging: {}", e))?;
    }

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::List {
            kind,
            status,
            origin,
            search,
            sort,
        } => {
            let filter = cinetrack_core::LibraryFilter {
                kind,
                status,
                origin,
                search,
            };
            library::run_list(filter, sort, &output).await
        }
        Commands::Stats => stats::run_stats(&output).await,
        Commands::Add {
            catalog_id,
            kind,
            status,
            score,
            season,
            episode,
            review,
            title,
        } => {
            let args = entries::AddArgs {
                catalog_id,
                kind,
                status,
                score,
                season,
                episode,
                review,
                title,
            };
            entries::run_add(args, &output).await
        }
        Commands::Update {
            catalog_id,
            status,
            score,
            season,
            episode,
            review,
        } => {
            let args = entries::EditArgs {
                catalog_id,
                status,
                score,
                season,
                episode,
                review,
            };
            entries::run_edit(args, &output).await
        }
        Commands::Favorite { catalog_id } => entries::run_favorite(catalog_id, &output).await,
        Commands::Remove { catalog_id } => entries::run_remove(catalog_id, &output).await,
        Commands::Shared { owner_id, kind } => library::run_shared(&owner_id, kind, &output).await,
        Commands::Filmography { person_id, sort } => filmography::run_filmography(person_id, sort, &output).await,
        Commands::Search { query, kind } => discover::run_search(&query, kind, &output).await,
        Commands::Recommend { kind } => discover::run_recommend(kind, &output).await,
        Commands::Pick { kind } => discover::run_pick(kind, &output).await,
        Commands::CheckSeasons { yes, no_prompt } => {
            let mode = if yes {
                seasons::AcceptMode::All
            } else if no_prompt {
                seasons::AcceptMode::None
            } else {
                seasons::AcceptMode::Ask
            };
            seasons::run_check(mode, &output).await
        }
        Commands::Watch { no_startup_check } => watch::run_watch(cli.verbose, cli.quiet, no_startup_check, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    }
}
