use std::collections::{HashMap, HashSet};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::model::{
    AnimeRecord, Dataset, JoinedRecord, JoinedTable, LoadStats, RatingEvent, UNRATED_SENTINEL,
};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load both CSV files and build the joined table.
///
/// Pipeline:
/// 1. both paths must exist, checked before anything is read
/// 2. `anime.csv`: drop rows without an official rating, coerce `episodes`
/// 3. `rating.csv`: read at most `max_rating_rows` rows, drop `-1` ratings
/// 4. mean rating per `anime_id`
/// 5. inner join on `anime_id`, keeping anime file order
pub fn load(anime_path: &Path, ratings_path: &Path, max_rating_rows: usize) -> Result<Dataset> {
    ensure_exists("anime", anime_path)?;
    ensure_exists("ratings", ratings_path)?;

    let (anime, anime_rows_read) = read_anime(anime_path)?;
    let (ratings, rating_rows_read) = read_ratings(ratings_path, max_rating_rows)?;

    let anime_rows_kept = anime.len();
    let means = mean_ratings(&ratings);
    let table = join(anime, &means);

    let stats = LoadStats {
        anime_rows_read,
        anime_rows_kept,
        rating_rows_read,
        rating_events_kept: ratings.len(),
        joined_records: table.len(),
    };
    log::info!(
        "Loaded {} anime ({} read), {} rating events ({} read), {} joined records",
        stats.anime_rows_kept,
        stats.anime_rows_read,
        stats.rating_events_kept,
        stats.rating_rows_read,
        stats.joined_records
    );

    Ok(Dataset {
        table,
        ratings,
        stats,
    })
}

fn ensure_exists(kind: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DataError::MissingFile {
            kind,
            path: path.to_path_buf(),
        })
    }
}

// ---------------------------------------------------------------------------
// anime.csv
// ---------------------------------------------------------------------------

/// Positions of the columns we need in `anime.csv`.
struct AnimeColumns {
    anime_id: usize,
    name: usize,
    genre: usize,
    kind: usize,
    episodes: usize,
    rating: usize,
}

impl AnimeColumns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self> {
        Ok(Self {
            anime_id: column_index(headers, "anime_id", path)?,
            name: column_index(headers, "name", path)?,
            genre: column_index(headers, "genre", path)?,
            kind: column_index(headers, "type", path)?,
            episodes: column_index(headers, "episodes", path)?,
            rating: column_index(headers, "rating", path)?,
        })
    }
}

/// Read and clean the anime file. Returns the kept records and the number of
/// data rows read.
pub fn read_anime(path: &Path) -> Result<(Vec<AnimeRecord>, usize)> {
    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let cols = AnimeColumns::locate(&headers, path)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut rows_read = 0;
    let mut record = StringRecord::new();

    while reader
        .read_record(&mut record)
        .map_err(|e| csv_error(path, e))?
    {
        rows_read += 1;
        let line = rows_read + 1;

        // Rating-null filter runs first: such rows never reach coercion.
        let Some(raw) = present_field(&record, cols.rating) else {
            continue;
        };
        let rating: f64 = raw.parse().map_err(|_| {
            DataError::shape(path, format!("line {line}: rating '{raw}' is not a number"))
        })?;
        if !rating.is_finite() {
            continue;
        }

        let anime_id = required_integer(&record, cols.anime_id, "anime_id", line, path)?;
        if !seen.insert(anime_id) {
            log::warn!("{}: line {line}: duplicate anime_id {anime_id} skipped", path.display());
            continue;
        }

        records.push(AnimeRecord {
            anime_id,
            name: record.get(cols.name).unwrap_or_default().to_string(),
            genre: optional_field(&record, cols.genre).map(str::to_string),
            kind: optional_field(&record, cols.kind).map(str::to_string),
            episodes: optional_field(&record, cols.episodes).and_then(coerce_episodes),
            rating,
        });
    }

    log::debug!(
        "{}: kept {} of {rows_read} anime rows",
        path.display(),
        records.len()
    );
    Ok((records, rows_read))
}

/// `"26"` → 26, `"12.0"` → 12, `"Unknown"` → missing.
fn coerce_episodes(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then_some(f as u32)
}

// ---------------------------------------------------------------------------
// rating.csv
// ---------------------------------------------------------------------------

/// Read at most `max_rows` data rows and drop the unrated sentinel. Returns
/// the retained events and the number of rows read.
pub fn read_ratings(path: &Path, max_rows: usize) -> Result<(Vec<RatingEvent>, usize)> {
    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let user_idx = column_index(&headers, "user_id", path)?;
    let anime_idx = column_index(&headers, "anime_id", path)?;
    let rating_idx = column_index(&headers, "rating", path)?;

    let mut events = Vec::new();
    let mut rows_read = 0;
    let mut record = StringRecord::new();

    while rows_read < max_rows
        && reader
            .read_record(&mut record)
            .map_err(|e| csv_error(path, e))?
    {
        rows_read += 1;
        let line = rows_read + 1;

        let user_id = required_integer(&record, user_idx, "user_id", line, path)?;
        let anime_id = required_integer(&record, anime_idx, "anime_id", line, path)?;
        // A missing rating carries no score, same as the sentinel.
        if present_field(&record, rating_idx).is_none() {
            continue;
        }
        let rating = required_integer(&record, rating_idx, "rating", line, path)?;
        let rating = i32::try_from(rating).map_err(|_| {
            DataError::shape(path, format!("line {line}: rating {rating} out of range"))
        })?;

        if rating == UNRATED_SENTINEL {
            continue;
        }
        events.push(RatingEvent {
            user_id,
            anime_id,
            rating,
        });
    }

    if rows_read == max_rows {
        log::debug!("{}: stopped after {max_rows} rows", path.display());
    }
    Ok((events, rows_read))
}

// ---------------------------------------------------------------------------
// Aggregation + join
// ---------------------------------------------------------------------------

/// Arithmetic mean of the retained ratings per `anime_id`.
pub fn mean_ratings(events: &[RatingEvent]) -> HashMap<i64, f64> {
    let mut sums: HashMap<i64, (i64, u64)> = HashMap::new();
    for ev in events {
        let entry = sums.entry(ev.anime_id).or_insert((0, 0));
        entry.0 += i64::from(ev.rating);
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(id, (sum, count))| (id, sum as f64 / count as f64))
        .collect()
}

/// Inner join: anime without a mean rating are dropped. `anime` is expected to
/// carry unique ids, which `read_anime` guarantees.
pub fn join(anime: Vec<AnimeRecord>, means: &HashMap<i64, f64>) -> JoinedTable {
    let records = anime
        .into_iter()
        .filter_map(|a| {
            let user_rating = *means.get(&a.anime_id)?;
            Some(JoinedRecord {
                anime: a,
                user_rating,
            })
        })
        .collect();
    JoinedTable::new(records)
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))
}

fn csv_error(path: &Path, source: csv::Error) -> DataError {
    DataError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn column_index(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::shape(path, format!("missing required column '{name}'")))
}

/// Trimmed field value, `None` when absent or blank.
fn optional_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Cell spellings read as a missing value, besides a blank cell.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Like [`optional_field`], also treating the missing-value markers as absent.
fn present_field(record: &StringRecord, idx: usize) -> Option<&str> {
    optional_field(record, idx).filter(|s| !MISSING_MARKERS.contains(s))
}

fn required_integer(
    record: &StringRecord,
    idx: usize,
    column: &str,
    line: usize,
    path: &Path,
) -> Result<i64> {
    let raw = record.get(idx).map(str::trim).unwrap_or_default();
    raw.parse().map_err(|_| {
        DataError::shape(
            path,
            format!("line {line}: {column} '{raw}' is not an integer"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;

    const ANIME: &str = "\
anime_id,name,genre,type,episodes,rating,members
1,Kimi no Na wa.,\"Drama, Romance, School, Supernatural\",Movie,1,9.37,200630
2,Gintama,\"Action, Comedy, Historical\",TV,51,9.25,114262
3,One Piece,\"Action, Adventure, Comedy\",TV,Unknown,8.58,504862
4,No Rating Yet,Comedy,TV,12,,100
5,Unwatched,,OVA,2,7.10,50
";

    const RATINGS: &str = "\
user_id,anime_id,rating
1,1,10
2,1,-1
3,1,8
1,2,9
2,3,-1
3,3,7
4,3,8
5,4,6
";

    fn write_fixture(anime: &str, ratings: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let anime_path = dir.path().join("anime.csv");
        let ratings_path = dir.path().join("rating.csv");
        fs::write(&anime_path, anime).unwrap();
        fs::write(&ratings_path, ratings).unwrap();
        (dir, anime_path, ratings_path)
    }

    #[test]
    fn joins_means_and_drops_unrated_anime() {
        let (_dir, a, r) = write_fixture(ANIME, RATINGS);
        let ds = load(&a, &r, 1_000_000).unwrap();

        let ids: Vec<i64> = ds.table.iter().map(|r| r.anime.anime_id).collect();
        // 4 has no official rating, 5 has no user rating
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(ds.table.get(1).unwrap().user_rating, 9.0);
        assert_eq!(ds.table.get(2).unwrap().user_rating, 9.0);
        assert_eq!(ds.table.get(3).unwrap().user_rating, 7.5);

        assert_eq!(ds.ratings.len(), 6);
        assert!(ds.ratings.iter().all(|e| e.rating != UNRATED_SENTINEL));
        assert_eq!(ds.stats.anime_rows_read, 5);
        assert_eq!(ds.stats.anime_rows_kept, 4);
        assert_eq!(ds.stats.rating_rows_read, 8);
        assert_eq!(ds.stats.joined_records, 3);
    }

    #[test]
    fn unknown_episodes_become_missing() {
        let (_dir, a, r) = write_fixture(ANIME, RATINGS);
        let ds = load(&a, &r, 100).unwrap();
        let one_piece = ds.table.get(3).unwrap();
        assert_eq!(one_piece.anime.episodes, None);
        assert_eq!(one_piece.anime.rating, 8.58);
        assert_eq!(ds.table.get(2).unwrap().anime.episodes, Some(51));
    }

    #[test]
    fn blank_genre_is_absent() {
        let (_dir, a, _r) = write_fixture(ANIME, RATINGS);
        let (anime, _) = read_anime(&a).unwrap();
        let unwatched = anime.iter().find(|a| a.anime_id == 5).unwrap();
        assert_eq!(unwatched.genre, None);
        assert_eq!(unwatched.kind.as_deref(), Some("OVA"));
    }

    #[test]
    fn rating_read_is_bounded() {
        let (_dir, a, r) = write_fixture(ANIME, RATINGS);
        let ds = load(&a, &r, 3).unwrap();
        // rows: (1,1,10) (2,1,-1) (3,1,8)
        assert_eq!(ds.stats.rating_rows_read, 3);
        assert_eq!(ds.ratings.len(), 2);
        let ids: Vec<i64> = ds.table.iter().map(|r| r.anime.anime_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn missing_ratings_file_fails_before_reading() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("anime.csv");
        fs::write(&a, ANIME).unwrap();
        let err = load(&a, &dir.path().join("rating.csv"), 10).unwrap_err();
        assert!(err.is_missing_file());
        assert!(matches!(err, DataError::MissingFile { kind: "ratings", .. }));
    }

    #[test]
    fn missing_anime_file_is_reported_first() {
        let dir = TempDir::new().unwrap();
        let err = load(
            &dir.path().join("anime.csv"),
            &dir.path().join("rating.csv"),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MissingFile { kind: "anime", .. }));
    }

    #[test]
    fn missing_required_column_is_a_shape_error() {
        let (_dir, a, r) = write_fixture("anime_id,name,genre,type,episodes\n1,X,,TV,1\n", RATINGS);
        let err = load(&a, &r, 10).unwrap_err();
        match err {
            DataError::DataShape { reason, .. } => assert!(reason.contains("'rating'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_integer_join_key_is_a_shape_error() {
        let (_dir, a, r) = write_fixture(ANIME, "user_id,anime_id,rating\n1,abc,5\n");
        let err = load(&a, &r, 10).unwrap_err();
        assert!(matches!(err, DataError::DataShape { .. }));
    }

    #[test]
    fn non_numeric_official_rating_is_a_shape_error() {
        let anime = "anime_id,name,genre,type,episodes,rating\n1,Broken,,TV,1,abc\n";
        let (_dir, a, r) = write_fixture(anime, "user_id,anime_id,rating\n1,1,6\n");
        let err = load(&a, &r, 10).unwrap_err();
        match err {
            DataError::DataShape { reason, .. } => assert!(reason.contains("'abc'")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_and_missing_markers_drop_the_row() {
        let anime = "\
anime_id,name,genre,type,episodes,rating
1,Scored,Action,TV,12,8.1
2,NotANumber,Action,TV,12,NaN
3,Infinite,Action,TV,12,inf
4,Marker,Action,TV,12,N/A
5,Null,Action,TV,12,null
6,Shouting,Action,TV,12,NAN
";
        let ratings = "user_id,anime_id,rating\n1,1,7\n1,2,7\n1,3,7\n1,4,7\n1,5,7\n1,6,7\n";
        let (_dir, a, r) = write_fixture(anime, ratings);
        let ds = load(&a, &r, 100).unwrap();

        let ids: Vec<i64> = ds.table.iter().map(|r| r.anime.anime_id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(ds.stats.anime_rows_read, 6);
        assert_eq!(ds.stats.anime_rows_kept, 1);
        assert!(ds.table.iter().all(|r| r.anime.rating.is_finite()));
    }

    #[test]
    fn blank_user_rating_is_skipped() {
        let (_dir, a, r) = write_fixture(ANIME, "user_id,anime_id,rating\n1,1,8\n2,1,\n3,1,NA\n");
        let ds = load(&a, &r, 10).unwrap();
        assert_eq!(ds.stats.rating_rows_read, 3);
        assert_eq!(ds.ratings.len(), 1);
        assert_eq!(ds.table.get(1).unwrap().user_rating, 8.0);
    }

    #[test]
    fn non_integer_user_rating_is_still_a_shape_error() {
        let (_dir, a, r) = write_fixture(ANIME, "user_id,anime_id,rating\n1,1,great\n");
        let err = load(&a, &r, 10).unwrap_err();
        assert!(matches!(err, DataError::DataShape { .. }));
    }

    #[test]
    fn duplicate_anime_ids_keep_first_row() {
        let anime = "anime_id,name,genre,type,episodes,rating\n1,First,,TV,1,8.0\n1,Second,,TV,1,7.0\n";
        let (_dir, a, r) = write_fixture(anime, "user_id,anime_id,rating\n1,1,6\n");
        let ds = load(&a, &r, 10).unwrap();
        assert_eq!(ds.table.len(), 1);
        assert_eq!(ds.table.records[0].anime.name, "First");
    }

    #[test]
    fn coerce_episodes_accepts_whole_floats_only() {
        assert_eq!(coerce_episodes("12"), Some(12));
        assert_eq!(coerce_episodes("12.0"), Some(12));
        assert_eq!(coerce_episodes("12.5"), None);
        assert_eq!(coerce_episodes("Unknown"), None);
        assert_eq!(coerce_episodes("-3"), None);
    }

    #[test]
    fn mean_ratings_averages_per_anime() {
        let ev = |anime_id, rating| RatingEvent {
            user_id: 0,
            anime_id,
            rating,
        };
        let means = mean_ratings(&[ev(7, 1), ev(7, 2), ev(8, 10)]);
        assert_eq!(means[&7], 1.5);
        assert_eq!(means[&8], 10.0);
        assert_eq!(means.len(), 2);
    }
}
