//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

pub const ANIME_FILE: &str = "anime.csv";
pub const RATINGS_FILE: &str = "rating.csv";

/// Anime Rating Dashboard: official vs user ratings, genres and types.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Folder holding anime.csv and rating.csv
    #[arg(long, value_name = "DIR", default_value = "csv")]
    pub data_dir: PathBuf,

    /// Anime metadata file (overrides <DATA_DIR>/anime.csv)
    #[arg(long, value_name = "FILE")]
    pub anime: Option<PathBuf>,

    /// User ratings file (overrides <DATA_DIR>/rating.csv)
    #[arg(long, value_name = "FILE")]
    pub ratings: Option<PathBuf>,

    /// Maximum number of rating rows to read
    #[arg(long, value_name = "N", default_value_t = 1_000_000)]
    pub max_rating_rows: usize,

    /// Entries shown in each top-N chart
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub top_n: usize,

    /// Entries in the official-vs-user comparison chart
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub comparison_size: usize,

    /// Bins in the rating distribution histogram
    #[arg(long, value_name = "N", default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub histogram_bins: u16,

    /// Print the dashboard summary as JSON and exit without opening a window
    #[arg(long)]
    pub summary: bool,
}

/// Resolved settings the rest of the program works from.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub anime_path: PathBuf,
    pub ratings_path: PathBuf,
    pub max_rating_rows: usize,
    pub top_n: usize,
    pub comparison_size: usize,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from(Args::parse_from(["anime-dashboard"]))
    }
}

impl From<Args> for DashboardConfig {
    fn from(args: Args) -> Self {
        Self {
            anime_path: args.anime.unwrap_or_else(|| args.data_dir.join(ANIME_FILE)),
            ratings_path: args
                .ratings
                .unwrap_or_else(|| args.data_dir.join(RATINGS_FILE)),
            max_rating_rows: args.max_rating_rows,
            top_n: args.top_n,
            comparison_size: args.comparison_size,
            histogram_bins: usize::from(args.histogram_bins),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn defaults_match_the_csv_folder_layout() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.anime_path, Path::new("csv").join("anime.csv"));
        assert_eq!(cfg.ratings_path, Path::new("csv").join("rating.csv"));
        assert_eq!(cfg.max_rating_rows, 1_000_000);
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.comparison_size, 10);
        assert_eq!(cfg.histogram_bins, 10);
    }

    #[test]
    fn explicit_files_override_data_dir() {
        let args = Args::try_parse_from([
            "anime-dashboard",
            "--data-dir",
            "/data",
            "--ratings",
            "/tmp/sample.csv",
            "--max-rating-rows",
            "5000",
        ])
        .unwrap();
        let cfg = DashboardConfig::from(args);
        assert_eq!(cfg.anime_path, Path::new("/data").join("anime.csv"));
        assert_eq!(cfg.ratings_path, PathBuf::from("/tmp/sample.csv"));
        assert_eq!(cfg.max_rating_rows, 5000);
    }

    #[test]
    fn zero_histogram_bins_is_rejected() {
        assert!(Args::try_parse_from(["anime-dashboard", "--histogram-bins", "0"]).is_err());
    }

    #[test]
    fn summary_flag_parses() {
        let args = Args::try_parse_from(["anime-dashboard", "--summary"]).unwrap();
        assert!(args.summary);
    }
}
