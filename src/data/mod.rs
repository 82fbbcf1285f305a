/// Data layer: restaurant table, loading, filtering and reporting.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode Latin-1, normalise headers → RestaurantTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ RestaurantTable │  Vec<Restaurant>, column names, city index
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │ cuisine  │  substring membership test
///   └──────────┘      └──────────┘
///        │ row indices
///        ▼
///   ┌──────────┐
///   │  report   │  top cuisines, chart series, preview → Dashboard
///   └──────────┘
/// ```

pub mod cuisine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::loader::load_reader;
    use super::model::RestaurantTable;

    /// Small Zomato-shaped table used across the data-layer tests.
    ///
    /// `Cafe Noir` has no cuisines and is dropped at load, so the kept rows
    /// are indexed 0..=5 in file order without it.
    pub const SAMPLE_CSV: &str = "\
Restaurant Name,City,Cuisines,Average Cost for two,Has Online delivery,Aggregate rating,Votes
Spice Route,Delhi,\"North Indian, Chinese\",600,Yes,4.0,50
Dragon Bowl,Delhi,\"Chinese, Thai\",1000,No,3.8,120
Pasta Point,Delhi,Italian,1001,No,4.5,300
Curry House,Delhi,\"North Indian, Mughlai\",450,Yes,3.2,80
Cafe Noir,Delhi,,300,No,3.9,10
Sea Shell,Mumbai,\"Seafood, Chinese\",900,Yes,4.2,210
Bombay Bites,Mumbai,Street Food,200,No,,0
";

    pub fn sample_table() -> RestaurantTable {
        load_reader(SAMPLE_CSV.as_bytes()).unwrap()
    }
}
