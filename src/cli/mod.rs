//! Command-line interface, parsed with clap.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::TitleKind;

/// reelbase - Movies & Shows catalog
/// Imports the dataset, serves the CRUD API and runs the demo recommender
#[derive(Parser)]
#[command(name = "reelbase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create or upgrade the database schema
    Migrate,

    /// Import the titles and credits CSV files
    #[command(alias = "import")]
    Load {
        /// Titles CSV (defaults to etl.titles_path)
        #[arg(long)]
        titles: Option<PathBuf>,
        /// Credits CSV (defaults to etl.credits_path)
        #[arg(long)]
        credits: Option<PathBuf>,
        /// Where rejected rows are appended as JSON lines
        #[arg(long, conflicts_with = "no_reject_log")]
        reject_log: Option<PathBuf>,
        /// Do not write a reject log
        #[arg(long)]
        no_reject_log: bool,
    },

    /// Start the HTTP API
    #[command(alias = "web")]
    Serve {
        /// Overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Pick well-rated titles of a genre through the API
    #[command(alias = "rec")]
    Recommend {
        /// Genre to pick from (case-insensitive)
        #[arg(long)]
        genre: String,
        /// Minimum IMDb score
        #[arg(long, default_value_t = 7.0)]
        min_score: f64,
        /// Number of titles to pick
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Which titles to consider
        #[arg(long, value_enum, default_value_t = KindArg::All)]
        kind: KindArg,
        /// User the predictions are recorded for
        #[arg(long, default_value = "demo")]
        user_id: String,
        /// Record one prediction per pick
        #[arg(long)]
        submit: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Movie,
    Show,
    All,
}

impl KindArg {
    #[must_use]
    pub fn kinds(self) -> Vec<TitleKind> {
        match self {
            Self::Movie => vec![TitleKind::Movie],
            Self::Show => vec![TitleKind::Show],
            Self::All => vec![TitleKind::Movie, TitleKind::Show],
        }
    }
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn recommend_defaults() {
        let cli = Cli::parse_from(["reelbase", "recommend", "--genre", "drama"]);
        match cli.command {
            Commands::Recommend {
                genre,
                min_score,
                count,
                kind,
                user_id,
                submit,
            } => {
                assert_eq!(genre, "drama");
                assert!((min_score - 7.0).abs() < f64::EPSILON);
                assert_eq!(count, 5);
                assert_eq!(kind, KindArg::All);
                assert_eq!(user_id, "demo");
                assert!(!submit);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn load_accepts_paths() {
        let cli = Cli::parse_from([
            "reelbase",
            "load",
            "--titles",
            "a.csv",
            "--credits",
            "b.csv",
            "--no-reject-log",
        ]);
        assert!(matches!(
            cli.command,
            Commands::Load {
                titles: Some(_),
                credits: Some(_),
                reject_log: None,
                no_reject_log: true,
            }
        ));
    }

    #[test]
    fn kind_all_expands_to_both() {
        assert_eq!(KindArg::All.kinds(), vec![TitleKind::Movie, TitleKind::Show]);
    }
}
