use std::collections::BTreeSet;

use super::cuisine::{cuisine_matches, cuisine_universe};
use super::model::{Restaurant, RestaurantTable};
use crate::config::{DEFAULT_COST_RANGE, DEFAULT_CUISINE_COUNT, DEFAULT_MIN_RATING};

// ---------------------------------------------------------------------------
// Filter criteria: one value per sidebar control
// ---------------------------------------------------------------------------

/// Inclusive cost-for-two bounds. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostRange {
    pub low: u32,
    pub high: u32,
}

impl CostRange {
    /// Build a range from two bounds given in either order.
    pub fn new(a: u32, b: u32) -> Self {
        CostRange {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains(&self, cost: u32) -> bool {
        self.low <= cost && cost <= self.high
    }
}

/// The conjunctive predicate set of one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub city: String,
    pub min_rating: f64,
    pub cost_range: CostRange,
    /// Selected cuisines. Empty means nothing matches.
    pub cuisines: BTreeSet<String>,
}

impl FilterCriteria {
    /// Initial criteria after `city` is chosen: default rating floor, the
    /// default cost window clamped to the city's costs, and the first few
    /// cuisines of the city in sorted order.
    pub fn defaults_for_city(table: &RestaurantTable, city: &str) -> Self {
        let max_cost = table.max_cost(city);
        let (low, high) = DEFAULT_COST_RANGE;

        FilterCriteria {
            city: city.to_string(),
            min_rating: DEFAULT_MIN_RATING,
            cost_range: CostRange::new(low.min(max_cost), high.min(max_cost)),
            cuisines: cuisine_universe(table, city)
                .into_iter()
                .take(DEFAULT_CUISINE_COUNT)
                .collect(),
        }
    }

    /// A restaurant passes when:
    /// * its city equals the selected city exactly
    /// * its rating is at least the floor
    /// * its cost lies inside the inclusive range
    /// * at least one selected cuisine occurs in its cuisines field
    ///
    /// Missing ratings or costs never pass.
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        restaurant.city == self.city
            && restaurant
                .aggregate_rating
                .is_some_and(|rating| rating >= self.min_rating)
            && restaurant
                .average_cost_for_two
                .is_some_and(|cost| self.cost_range.contains(cost))
            && cuisine_matches(&restaurant.cuisines, &self.cuisines)
    }
}

/// Return indices of restaurants that pass `criteria`, in table order.
pub fn filter(table: &RestaurantTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .restaurants
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}
