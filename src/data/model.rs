use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. Delimited text yields `String` and `Null`
/// cells only; JSON and Parquet sources carry their own types.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text form of the cell, `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Restaurant – one row of the dataset
// ---------------------------------------------------------------------------

/// A single restaurant record. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub city: String,
    /// Comma-delimited cuisine names, never null after load.
    pub cuisines: String,
    /// `None` when the source cell was empty.
    pub aggregate_rating: Option<f64>,
    pub average_cost_for_two: Option<u32>,
    pub votes: Option<u32>,
    /// Categorical flag as written in the source (`Yes` / `No`).
    pub has_online_delivery: Option<String>,
    /// Every raw cell, aligned with [`RestaurantTable::column_names`].
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// RestaurantTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Owned by the application state and only ever
/// borrowed by the filter and report passes.
#[derive(Debug, Clone)]
pub struct RestaurantTable {
    /// All kept rows, in file order.
    pub restaurants: Vec<Restaurant>,
    /// Normalised column names (lower-case, spaces replaced by `_`).
    pub column_names: Vec<String>,
    /// Distinct city values, sorted.
    pub cities: Vec<String>,
    /// Distinct online-delivery labels, sorted.
    pub delivery_labels: Vec<String>,
    /// Rows removed at load because their cuisines were missing.
    pub dropped_rows: usize,
}

impl RestaurantTable {
    /// Build the city and delivery indices from the loaded rows.
    pub fn from_restaurants(
        column_names: Vec<String>,
        restaurants: Vec<Restaurant>,
        dropped_rows: usize,
    ) -> Self {
        let mut cities: BTreeSet<&str> = BTreeSet::new();
        let mut delivery_labels: BTreeSet<&str> = BTreeSet::new();

        for r in &restaurants {
            cities.insert(&r.city);
            if let Some(label) = &r.has_online_delivery {
                delivery_labels.insert(label);
            }
        }

        let cities = cities.into_iter().map(str::to_string).collect();
        let delivery_labels = delivery_labels.into_iter().map(str::to_string).collect();

        RestaurantTable {
            restaurants,
            column_names,
            cities,
            delivery_labels,
            dropped_rows,
        }
    }

    /// Number of kept rows.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Rows located in `city` (exact, case-sensitive).
    pub fn in_city<'a>(&'a self, city: &'a str) -> impl Iterator<Item = &'a Restaurant> + 'a {
        self.restaurants.iter().filter(move |r| r.city == city)
    }

    /// Highest cost for two among the rows of `city`; 0 when none is known.
    pub fn max_cost(&self, city: &str) -> u32 {
        self.in_city(city)
            .filter_map(|r| r.average_cost_for_two)
            .max()
            .unwrap_or(0)
    }
}
