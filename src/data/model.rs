use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// AnimeRecord – one cleaned row of anime.csv
// ---------------------------------------------------------------------------

/// Anime metadata after load-time cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeRecord {
    pub anime_id: i64,
    pub name: String,
    /// Raw comma-delimited genre list, e.g. `"Action, Comedy, Shounen"`.
    pub genre: Option<String>,
    /// Category such as `TV`, `Movie`, `OVA`.
    pub kind: Option<String>,
    /// `None` when the source held a non-numeric marker like `Unknown`.
    pub episodes: Option<u32>,
    /// Official (aggregate) rating; rows without one never get this far.
    pub rating: f64,
}

// ---------------------------------------------------------------------------
// RatingEvent – one retained row of rating.csv
// ---------------------------------------------------------------------------

/// Marker in the ratings file meaning "watched but not rated".
pub const UNRATED_SENTINEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingEvent {
    pub user_id: i64,
    pub anime_id: i64,
    pub rating: i32,
}

// ---------------------------------------------------------------------------
// JoinedRecord / JoinedTable
// ---------------------------------------------------------------------------

/// An anime together with the mean of its retained user ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub anime: AnimeRecord,
    pub user_rating: f64,
}

impl JoinedRecord {
    /// Value of a numeric column, `None` when the record has no value for it.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::OfficialRating => Some(self.anime.rating),
            Column::UserRating => Some(self.user_rating),
            Column::Episodes => self.anime.episodes.map(f64::from),
        }
    }

    pub fn name(&self) -> &str {
        &self.anime.name
    }
}

/// The inner join of anime metadata and per-anime mean ratings.
///
/// Rows keep the order of the anime file. `anime_id` is unique across rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedTable {
    pub records: Vec<JoinedRecord>,
}

impl JoinedTable {
    pub fn new(records: Vec<JoinedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinedRecord> {
        self.records.iter()
    }

    pub fn get(&self, anime_id: i64) -> Option<&JoinedRecord> {
        self.records.iter().find(|r| r.anime.anime_id == anime_id)
    }
}

impl<'a> IntoIterator for &'a JoinedTable {
    type Item = &'a JoinedRecord;
    type IntoIter = std::slice::Iter<'a, JoinedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Column – the numeric columns a table can be ranked by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    OfficialRating,
    UserRating,
    Episodes,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::OfficialRating, Column::UserRating, Column::Episodes];

    /// Name used in the merged table (`rating_official`, `rating_user`, `episodes`).
    pub fn as_str(self) -> &'static str {
        match self {
            Column::OfficialRating => "rating_official",
            Column::UserRating => "rating_user",
            Column::Episodes => "episodes",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DataError::UnknownColumn(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Dataset – everything the loader hands over
// ---------------------------------------------------------------------------

/// Row counts gathered while loading, for logging and the summary output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub anime_rows_read: usize,
    pub anime_rows_kept: usize,
    pub rating_rows_read: usize,
    pub rating_events_kept: usize,
    pub joined_records: usize,
}

/// The loaded, immutable data: joined table plus the retained rating events.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub table: JoinedTable,
    pub ratings: Vec<RatingEvent>,
    pub stats: LoadStats,
}
