use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::model::{Column, JoinedRecord, JoinedTable, RatingEvent};

/// Genre selection that disables filtering.
pub const ALL_GENRES: &str = "All";

// ---------------------------------------------------------------------------
// Tally – insertion-ordered category counts
// ---------------------------------------------------------------------------

/// Category → count, remembering the order categories were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: IndexMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.counts.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// The `n` largest entries, count descending, ties in first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted: Vec<(String, usize)> =
            self.counts.iter().map(|(k, count)| (k.clone(), *count)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    /// Every entry with its share of the total in percent, count descending.
    pub fn percentages(&self) -> Vec<Share> {
        let total = self.total();
        self.top_n(self.len())
            .into_iter()
            .map(|(label, count)| Share {
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                },
                label,
                count,
            })
            .collect()
    }
}

/// One slice of a proportional breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Records sorted descending by `column`, truncated to `n`.
///
/// Records without a value for `column` are left out. Ties keep table order.
pub fn top_n_by_column(table: &JoinedTable, column: Column, n: usize) -> Vec<&JoinedRecord> {
    let mut ranked: Vec<(f64, &JoinedRecord)> = table
        .iter()
        .filter_map(|r| r.value(column).map(|v| (v, r)))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().take(n).map(|(_, r)| r).collect()
}

// ---------------------------------------------------------------------------
// Genre queries
// ---------------------------------------------------------------------------

/// Trimmed, non-empty genre tokens of one raw genre field.
pub fn genre_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Occurrences of each genre token across the table.
pub fn genre_counts(table: &JoinedTable) -> Tally {
    let mut tally = Tally::new();
    for genre in table.iter().filter_map(|r| r.anime.genre.as_deref()) {
        for token in genre_tokens(genre) {
            tally.add(token);
        }
    }
    tally
}

pub fn top_n_genres(table: &JoinedTable, n: usize) -> Vec<(String, usize)> {
    genre_counts(table).top_n(n)
}

/// Distinct genre tokens, sorted ascending.
pub fn all_genres(table: &JoinedTable) -> Vec<String> {
    table
        .iter()
        .filter_map(|r| r.anime.genre.as_deref())
        .flat_map(genre_tokens)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records whose raw genre field contains `genre` (case-sensitive).
///
/// [`ALL_GENRES`] returns the whole table. Records without a genre never match.
pub fn filter_by_genre_substring(table: &JoinedTable, genre: &str) -> JoinedTable {
    if genre == ALL_GENRES {
        return table.clone();
    }
    JoinedTable::new(
        table
            .iter()
            .filter(|r| r.anime.genre.as_deref().is_some_and(|g| g.contains(genre)))
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Type distribution
// ---------------------------------------------------------------------------

pub fn type_distribution(table: &JoinedTable) -> Tally {
    let mut tally = Tally::new();
    for kind in table.iter().filter_map(|r| r.anime.kind.as_deref()) {
        tally.add(kind);
    }
    tally
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Fixed-width histogram of rating values over the observed range.
///
/// Bins are half-open except the last, which includes the maximum. When every
/// value is equal the range is widened to `value ± 0.5`. No events or zero
/// bins yield an empty histogram.
pub fn rating_histogram(events: &[RatingEvent], bucket_count: usize) -> Vec<HistogramBin> {
    if events.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let (min, max) = events.iter().fold((i32::MAX, i32::MIN), |(lo, hi), e| {
        (lo.min(e.rating), hi.max(e.rating))
    });
    let (lo, hi) = if min == max {
        (f64::from(min) - 0.5, f64::from(max) + 0.5)
    } else {
        (f64::from(min), f64::from(max))
    };
    let width = (hi - lo) / bucket_count as f64;

    let mut counts = vec![0usize; bucket_count];
    for e in events {
        let offset = (f64::from(e.rating) - lo) / width;
        let idx = (offset.floor() as usize).min(bucket_count - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bucket_count {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Official vs user
// ---------------------------------------------------------------------------

/// `[official, mean user]` rating pairs, one per record.
pub fn rating_pairs(table: &JoinedTable) -> Vec<[f64; 2]> {
    table
        .iter()
        .map(|r| [r.anime.rating, r.user_rating])
        .collect()
}
