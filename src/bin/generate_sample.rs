use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic anime.csv / rating.csv pair for trying the dashboard.
#[derive(Parser, Debug)]
struct Args {
    /// Output folder
    #[arg(long, default_value = "csv")]
    out_dir: PathBuf,

    /// Number of anime rows
    #[arg(long, default_value_t = 400)]
    anime: usize,

    /// Number of users producing ratings
    #[arg(long, default_value_t = 2_000)]
    users: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const GENRES: &[&str] = &[
    "Action", "Adventure", "Comedy", "Drama", "Fantasy", "Horror", "Mecha", "Mystery",
    "Romance", "School", "Sci-Fi", "Shounen", "Slice of Life", "Sports", "Supernatural",
];
const TYPES: &[(&str, f64)] = &[
    ("TV", 0.45),
    ("Movie", 0.2),
    ("OVA", 0.15),
    ("Special", 0.12),
    ("ONA", 0.05),
    ("Music", 0.03),
];
const WORDS: &[&str] = &[
    "Sword", "Sky", "Academy", "Chronicle", "Ghost", "Star", "Summer", "Night", "Dragon",
    "Garden", "Signal", "Last", "Blue", "Iron", "Festival", "Memory", "Eclipse", "Railway",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let mut roll = self.next_f64();
        for &(item, weight) in items {
            if roll < weight {
                return item;
            }
            roll -= weight;
        }
        items[items.len() - 1].0
    }
}

struct SampleAnime {
    id: i64,
    quality: f64,
}

fn title(rng: &mut SimpleRng, id: usize) -> String {
    let a = WORDS[rng.below(WORDS.len())];
    let b = WORDS[rng.below(WORDS.len())];
    match rng.below(3) {
        0 => format!("{a} {b}"),
        1 => format!("{a} of the {b}"),
        _ => format!("{a} {b} {}", id % 7 + 2),
    }
}

fn genres(rng: &mut SimpleRng) -> String {
    let count = 1 + rng.below(4);
    let mut picked: Vec<&str> = Vec::with_capacity(count);
    while picked.len() < count {
        let g = GENRES[rng.below(GENRES.len())];
        if !picked.contains(&g) {
            picked.push(g);
        }
    }
    picked.join(", ")
}

fn write_anime(rng: &mut SimpleRng, args: &Args) -> Result<Vec<SampleAnime>> {
    let path = args.out_dir.join("anime.csv");
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["anime_id", "name", "genre", "type", "episodes", "rating", "members"])?;

    let mut anime = Vec::with_capacity(args.anime);
    for i in 0..args.anime {
        let id = (i as i64 + 1) * 3;
        let kind = rng.weighted(TYPES);
        let episodes = match kind {
            "Movie" | "Music" => 1,
            "TV" => [12, 13, 24, 25, 26, 51, 64, 148, 220][rng.below(9)],
            _ => 1 + rng.below(6),
        };
        let quality = rng.gauss(6.6, 1.0).clamp(2.0, 9.4);

        let genre = if rng.chance(0.03) { String::new() } else { genres(rng) };
        let episodes = if rng.chance(0.04) {
            "Unknown".to_string()
        } else {
            episodes.to_string()
        };
        // Some titles are still airing and have no official rating.
        let rating = if rng.chance(0.02) {
            String::new()
        } else {
            format!("{quality:.2}")
        };
        let members = (rng.next_f64() * 200_000.0) as u64 + 50;

        writer.write_record([
            id.to_string(),
            title(rng, i),
            genre,
            kind.to_string(),
            episodes,
            rating,
            members.to_string(),
        ])?;
        anime.push(SampleAnime { id, quality });
    }
    writer.flush()?;
    Ok(anime)
}

fn write_ratings(rng: &mut SimpleRng, args: &Args, anime: &[SampleAnime]) -> Result<usize> {
    let path = args.out_dir.join("rating.csv");
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["user_id", "anime_id", "rating"])?;

    let mut rows = 0;
    for user in 1..=args.users {
        let watched = 5 + rng.below(40);
        for _ in 0..watched {
            let a = &anime[rng.below(anime.len())];
            let rating = if rng.chance(0.18) {
                -1
            } else {
                rng.gauss(a.quality + 0.8, 1.3).round().clamp(1.0, 10.0) as i32
            };
            writer.write_record([user.to_string(), a.id.to_string(), rating.to_string()])?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Rejects arguments that would produce an unusable pair, before anything is written.
fn check_args(args: &Args) -> Result<()> {
    anyhow::ensure!(args.anime > 0, "--anime must be at least 1");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    check_args(&args)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(args.seed);
    let anime = write_anime(&mut rng, &args)?;
    let rows = write_ratings(&mut rng, &args, &anime)?;

    println!(
        "Wrote {} anime and {rows} ratings to {}",
        anime.len(),
        args.out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_anime_is_rejected() {
        let args = Args::parse_from(["generate_sample", "--anime", "0"]);
        assert!(check_args(&args).is_err());
    }

    #[test]
    fn default_args_are_accepted() {
        let args = Args::parse_from(["generate_sample"]);
        assert!(check_args(&args).is_ok());
    }

    #[test]
    fn written_ratings_reference_written_anime() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = Args::parse_from([
            "generate_sample",
            "--anime",
            "5",
            "--users",
            "3",
            "--out-dir",
            dir.path().to_str().unwrap(),
        ]);
        let mut rng = SimpleRng::new(args.seed);
        let anime = write_anime(&mut rng, &args).unwrap();
        let rows = write_ratings(&mut rng, &args, &anime).unwrap();

        assert_eq!(anime.len(), 5);
        assert!(rows >= 3 * 5);
        assert!(dir.path().join("anime.csv").exists());
        assert!(dir.path().join("rating.csv").exists());
    }
}
