mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cardstack_lib::flashcards::Swipe;

#[derive(Parser)]
#[command(name = "cardstack-cli", about = "Study flashcard sets with spaced repetition", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding sets and statuses (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

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

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum SwipeArg {
    Right,
    Left,
}

impl From<SwipeArg> for Swipe {
    fn from(arg: SwipeArg) -> Self {
        match arg {
            SwipeArg::Right => Swipe::Right,
            SwipeArg::Left => Swipe::Left,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List study sets
    Sets,

    /// Add a card to a set (the set is created if needed)
    Add {
        /// Set id
        set: String,
        /// Question side
        front: String,
        /// Answer side
        back: String,
    },

    /// Show the cards due now
    Stack {
        /// Set id
        set: String,
    },

    /// Record an answer for a card
    Answer {
        /// Set id
        set: String,
        /// Card id (prefix match) or exact front text
        card: String,
        /// Quality on the 0-5 scale
        #[arg(long, conflicts_with = "swipe", required_unless_present = "swipe")]
        grade: Option<f64>,
        /// Swipe direction: right = knew it, left = didn't
        #[arg(long, value_enum)]
        swipe: Option<SwipeArg>,
    },

    /// Restart a set: every card becomes new again
    Reset {
        /// Set id
        set: String,
    },

    /// Show review statistics for a set
    Stats {
        /// Set id
        set: String,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Sets => commands::sets::run_list(&app, &cli.format)?,
        Command::Add { set, front, back } => {
            commands::sets::run_add(&app, &set, front, back, &cli.format)?;
        }
        Command::Stack { set } => commands::stack::run(&app, &set, &cli.format, use_color)?,
        Command::Answer { set, card, grade, swipe } => {
            let answer = match (grade, swipe) {
                (Some(q), _) => commands::answer::Answer::Grade(q),
                (None, Some(s)) => commands::answer::Answer::Swipe(s.into()),
                (None, None) => anyhow::bail!("Either --grade or --swipe is required"),
            };
            commands::answer::run(&app, &set, &card, answer, &cli.format, use_color)?;
        }
        Command::Reset { set } => commands::reset::run(&app, &set, &cli.format)?,
        Command::Stats { set } => commands::stats::run(&app, &set, &cli.format)?,
        Command::Config => print!("{}", app.config.to_toml_string()?),
    }

    Ok(())
}
