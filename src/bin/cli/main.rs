mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ddx_lib::flashcards::{DirectionMode, Grade};
use ddx_lib::ratings::{Demographic, Difficulty, VindicateCategory};

#[derive(Parser)]
#[command(name = "ddx-cli", about = "Spaced repetition flashcards for differential diagnosis", version)]
struct Cli {
    /// Directory holding progress, settings and config.toml
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Learner identifier used to namespace stored progress
    #[arg(long, global = true)]
    learner: Option<String>,

    /// Deck file (JSON array of presentation/differential pairs)
    #[arg(long, global = true)]
    deck: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Which cards to build
#[derive(clap::Args, Clone, Debug)]
pub struct DeckArgs {
    /// Card direction: presentation or differential
    #[arg(long, default_value = "presentation")]
    mode: DirectionMode,

    /// Restrict to one category ("All" for every category)
    #[arg(long, default_value = "All")]
    category: String,
}

#[derive(Subcommand)]
enum Command {
    /// Show the cards due in today's session
    Queue {
        #[command(flatten)]
        deck: DeckArgs,
        /// Every card in random order, ignoring the schedule
        #[arg(long)]
        shuffle_all: bool,
        /// Seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Review today's cards interactively
    Study {
        #[command(flatten)]
        deck: DeckArgs,
        /// Practice every card in random order; grades are still recorded
        #[arg(long)]
        shuffle_all: bool,
    },

    /// Grade a single card
    Grade {
        /// Card id, e.g. "p-Chest pain"
        card_id: String,
        /// again, hard, good or easy
        grade: Grade,
        #[command(flatten)]
        deck: DeckArgs,
    },

    /// Show when each grade would schedule a card
    Preview {
        card_id: String,
    },

    /// Show or change scheduler settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Rate how difficult a presentation was for a category
    Rate {
        demographic: Demographic,
        presentation: String,
        category: VindicateCategory,
        difficulty: Difficulty,
    },

    /// List rated presentations
    Ratings {
        /// Only show ratings of this difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },

    /// Remove progress for cards no longer in the deck
    Prune,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,

    /// Update one or more settings
    Set {
        #[arg(long, allow_negative_numbers = true)]
        again_minutes: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        good_days: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        easy_days: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        new_cards_per_day: Option<i32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir, cli.learner, cli.deck)?;

    match cli.command {
        Command::Queue { deck, shuffle_all, seed } => {
            commands::queue::run(&app, &deck, shuffle_all, seed, &cli.format, use_color)?;
        }
        Command::Study { deck, shuffle_all } => {
            commands::study::run(&app, &deck, shuffle_all, use_color)?;
        }
        Command::Grade { card_id, grade, deck } => {
            commands::grade::run(&app, &deck, &card_id, grade, &cli.format)?;
        }
        Command::Preview { card_id } => {
            commands::grade::run_preview(&app, &card_id, &cli.format)?;
        }
        Command::Settings(SettingsCommand::Show) => {
            commands::settings::run_show(&app, &cli.format)?;
        }
        Command::Settings(SettingsCommand::Set {
            again_minutes,
            good_days,
            easy_days,
            new_cards_per_day,
        }) => {
            let update = commands::settings::SettingsUpdate {
                again_minutes,
                good_days,
                easy_days,
                new_cards_per_day,
            };
            commands::settings::run_set(&app, update, &cli.format)?;
        }
        Command::Rate {
            demographic,
            presentation,
            category,
            difficulty,
        } => {
            commands::ratings::run_rate(&app, demographic, &presentation, category, difficulty)?;
        }
        Command::Ratings { difficulty } => {
            commands::ratings::run_list(&app, difficulty, &cli.format, use_color)?;
        }
        Command::Prune => {
            commands::queue::run_prune(&app)?;
        }
    }

    Ok(())
}
