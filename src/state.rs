use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::model::{Column, Dataset, JoinedRecord, LoadStats};
use crate::data::query::{self, HistogramBin, Share, ALL_GENRES};

// ---------------------------------------------------------------------------
// Precomputed chart inputs
// ---------------------------------------------------------------------------

/// One bar of a ranked chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
}

impl RankedEntry {
    fn from_records(records: &[&JoinedRecord], column: Column) -> Vec<Self> {
        records
            .iter()
            .filter_map(|r| {
                Some(Self {
                    name: r.name().to_string(),
                    value: r.value(column)?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub official: f64,
    pub user: f64,
}

/// Everything the fixed charts need, computed once after load.
#[derive(Debug, Clone, Default)]
pub struct DashboardViews {
    pub top_genres: Vec<(String, usize)>,
    pub type_shares: Vec<Share>,
    pub top_episodes: Vec<RankedEntry>,
    pub top_official: Vec<RankedEntry>,
    pub top_user: Vec<RankedEntry>,
    pub comparison: Vec<ComparisonEntry>,
    pub histogram: Vec<HistogramBin>,
    pub rating_pairs: Vec<[f64; 2]>,
    /// Distinct genres for the filter dropdown, sorted.
    pub genres: Vec<String>,
}

impl DashboardViews {
    pub fn build(dataset: &Dataset, config: &DashboardConfig) -> Self {
        let table = &dataset.table;
        let ranked = |column| {
            RankedEntry::from_records(&query::top_n_by_column(table, column, config.top_n), column)
        };

        Self {
            top_genres: query::top_n_genres(table, config.top_n),
            type_shares: query::type_distribution(table).percentages(),
            top_episodes: ranked(Column::Episodes),
            top_official: ranked(Column::OfficialRating),
            top_user: ranked(Column::UserRating),
            comparison: query::top_n_by_column(
                table,
                Column::OfficialRating,
                config.comparison_size,
            )
            .into_iter()
            .map(|r| ComparisonEntry {
                name: r.name().to_string(),
                official: r.anime.rating,
                user: r.user_rating,
            })
            .collect(),
            histogram: query::rating_histogram(&dataset.ratings, config.histogram_bins),
            rating_pairs: query::rating_pairs(table),
            genres: query::all_genres(table),
        }
    }
}

// ---------------------------------------------------------------------------
// Genre panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum GenreView {
    /// Best user-rated anime matching the selected genre.
    Top(Vec<RankedEntry>),
    /// Nothing matched the selected genre.
    NoMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    TopAnime,
    RatingDistribution,
    RatingComparison,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [
        DashboardTab::TopAnime,
        DashboardTab::RatingDistribution,
        DashboardTab::RatingComparison,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::TopAnime => "Top Anime",
            DashboardTab::RatingDistribution => "Rating Distribution",
            DashboardTab::RatingComparison => "Rating Comparison",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded data; never modified after construction.
    pub dataset: Dataset,

    pub config: DashboardConfig,

    pub views: DashboardViews,

    /// Current genre filter selection (`"All"` or one genre).
    pub selected_genre: String,

    /// Result for `selected_genre` (cached).
    pub genre_view: GenreView,

    pub active_tab: DashboardTab,
}

impl AppState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let views = DashboardViews::build(&dataset, &config);
        let mut state = Self {
            dataset,
            config,
            views,
            selected_genre: ALL_GENRES.to_string(),
            genre_view: GenreView::NoMatches,
            active_tab: DashboardTab::default(),
        };
        state.refilter();
        state
    }

    /// Change the genre filter and recompute the genre panel.
    pub fn set_genre(&mut self, genre: &str) {
        if self.selected_genre == genre {
            return;
        }
        self.selected_genre = genre.to_string();
        self.refilter();
    }

    /// Recompute `genre_view` after a filter change.
    pub fn refilter(&mut self) {
        let subset = query::filter_by_genre_substring(&self.dataset.table, &self.selected_genre);
        self.genre_view = if subset.is_empty() {
            GenreView::NoMatches
        } else {
            let top = query::top_n_by_column(&subset, Column::UserRating, self.config.top_n);
            GenreView::Top(RankedEntry::from_records(&top, Column::UserRating))
        };
        log::debug!(
            "Genre filter '{}': {} matching anime",
            self.selected_genre,
            subset.len()
        );
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            stats: self.dataset.stats,
            top_genres: &self.views.top_genres,
            type_distribution: &self.views.type_shares,
            top_episodes: &self.views.top_episodes,
            top_official: &self.views.top_official,
            top_user: &self.views.top_user,
            rating_histogram: &self.views.histogram,
        }
    }
}

// ---------------------------------------------------------------------------
// Headless summary
// ---------------------------------------------------------------------------

/// JSON report printed by `--summary`.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub stats: LoadStats,
    pub top_genres: &'a [(String, usize)],
    pub type_distribution: &'a [Share],
    pub top_episodes: &'a [RankedEntry],
    pub top_official: &'a [RankedEntry],
    pub top_user: &'a [RankedEntry],
    pub rating_histogram: &'a [HistogramBin],
}
