/// Data layer: typed records, loading + join, and read-only queries.
///
/// Architecture:
/// ```text
///  anime.csv        rating.csv
///      │                 │  (bounded read, -1 dropped)
///      ▼                 ▼
///   ┌──────────────────────────┐
///   │          loader          │  clean → mean per anime → inner join
///   └──────────────────────────┘
///                │
///                ▼
///   ┌──────────────────────────┐
///   │ JoinedTable + ratings    │  immutable after load
///   └──────────────────────────┘
///                │
///                ▼
///   ┌──────────────────────────┐
///   │          query           │  top-N, genre/type tallies, filter, histogram
///   └──────────────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod query;
