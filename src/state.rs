use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::data::cuisine::cuisine_universe;
use crate::data::filter::{CostRange, FilterCriteria};
use crate::data::loader::load_file;
use crate::data::model::RestaurantTable;
use crate::data::report::{render, Dashboard};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded table, read-only once set.
    pub table: Option<RestaurantTable>,

    /// File the table was loaded from.
    pub source: Option<PathBuf>,

    /// Current sidebar selections (None until a table with a city is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Cuisines offered by the selected city, sorted.
    pub cuisine_universe: Vec<String>,

    /// Upper bound of the cost sliders for the selected city.
    pub max_cost: u32,

    /// Output for the current criteria (cached).
    pub dashboard: Option<Dashboard>,

    /// Colours of the online-delivery groups.
    pub delivery_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded table and select its first city.
    pub fn set_table(&mut self, table: RestaurantTable, source: PathBuf) {
        self.delivery_colors = Some(ColorMap::new(&table.delivery_labels));
        let first_city = table.cities.first().cloned();

        self.table = Some(table);
        self.source = Some(source);
        self.status_message = None;
        self.criteria = None;
        self.cuisine_universe.clear();
        self.max_cost = 0;
        self.dashboard = None;

        if let Some(city) = first_city {
            self.select_city(&city);
        }
    }

    /// Load `path` and replace the current table. On failure the current
    /// table is kept and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => self.set_table(table, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch city: cost bounds and cuisine choices reset to the city's defaults.
    pub fn select_city(&mut self, city: &str) {
        let Some(table) = &self.table else {
            return;
        };
        self.criteria = Some(FilterCriteria::defaults_for_city(table, city));
        self.cuisine_universe = cuisine_universe(table, city);
        self.max_cost = table.max_cost(city);
        self.recompute();
    }

    /// Ratings carry one decimal, so the floor is snapped to tenths before
    /// it is compared (a slider step of 0.1 yields 3.8000000000000003).
    pub fn set_min_rating(&mut self, min_rating: f64) {
        let snapped = (min_rating * 10.0).round() / 10.0;
        self.update_criteria(|c| c.min_rating = snapped.clamp(0.0, 5.0));
    }

    pub fn set_cost_range(&mut self, low: u32, high: u32) {
        let max = self.max_cost;
        self.update_criteria(|c| c.cost_range = CostRange::new(low.min(max), high.min(max)));
    }

    /// Toggle a single cuisine in the selection.
    pub fn toggle_cuisine(&mut self, cuisine: &str) {
        self.update_criteria(|c| {
            if !c.cuisines.remove(cuisine) {
                c.cuisines.insert(cuisine.to_string());
            }
        });
    }

    /// Select every cuisine of the city.
    pub fn select_all_cuisines(&mut self) {
        let all: BTreeSet<String> = self.cuisine_universe.iter().cloned().collect();
        self.update_criteria(|c| c.cuisines = all);
    }

    pub fn select_no_cuisines(&mut self) {
        self.update_criteria(|c| c.cuisines.clear());
    }

    fn update_criteria(&mut self, change: impl FnOnce(&mut FilterCriteria)) {
        if let Some(criteria) = &mut self.criteria {
            change(criteria);
            self.recompute();
        }
    }

    /// Re-run filter and aggregation for the current criteria.
    pub fn recompute(&mut self) {
        self.dashboard = match (&self.table, &self.criteria) {
            (Some(table), Some(criteria)) => Some(render(table, criteria)),
            _ => None,
        };
    }

    /// Number of restaurants matching the current criteria.
    pub fn matched_rows(&self) -> usize {
        match &self.dashboard {
            Some(Dashboard::Report(report)) => report.rows.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::data::fixtures::sample_table;

    #[fixture]
    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_table(sample_table(), PathBuf::from("sample.csv"));
        state
    }

    fn selected(state: &AppState) -> Vec<&str> {
        state
            .criteria
            .as_ref()
            .unwrap()
            .cuisines
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[rstest]
    fn loading_selects_first_city_with_defaults(state: AppState) {
        let criteria = state.criteria.as_ref().unwrap();
        assert_eq!(criteria.city, "Delhi");
        assert_eq!(state.max_cost, 1001);
        assert_eq!(selected(&state), vec!["Chinese", "Italian", "Mughlai"]);
        // Spice Route and Dragon Bowl (Chinese); Pasta Point costs 1001.
        assert_eq!(state.matched_rows(), 2);
    }

    #[rstest]
    fn switching_city_resets_bounds_and_cuisines(mut state: AppState) {
        state.select_no_cuisines();
        state.select_city("Mumbai");

        let criteria = state.criteria.as_ref().unwrap();
        assert_eq!(criteria.cost_range, CostRange::new(200, 900));
        assert_eq!(state.cuisine_universe, vec!["Chinese", "Seafood", "Street Food"]);
        assert_eq!(selected(&state), vec!["Chinese", "Seafood", "Street Food"]);
        assert_eq!(state.matched_rows(), 1);
    }

    #[rstest]
    fn deselecting_everything_yields_the_empty_dashboard(mut state: AppState) {
        state.select_no_cuisines();
        assert_eq!(state.dashboard, Some(Dashboard::Empty));

        state.toggle_cuisine("Italian");
        assert_eq!(selected(&state), vec!["Italian"]);
        assert_eq!(state.dashboard, Some(Dashboard::Empty));

        state.set_cost_range(0, 5000);
        assert_eq!(state.criteria.as_ref().unwrap().cost_range, CostRange::new(0, 1001));
        assert_eq!(state.matched_rows(), 1);
    }

    #[rstest]
    fn rating_floor_recomputes(mut state: AppState) {
        state.select_all_cuisines();
        state.set_cost_range(0, 1001);
        state.set_min_rating(0.0);
        assert_eq!(state.matched_rows(), 4);

        state.set_min_rating(4.2);
        assert_eq!(state.matched_rows(), 1);
    }

    #[rstest]
    fn stepped_rating_floor_keeps_rows_rated_at_the_floor(mut state: AppState) {
        state.select_all_cuisines();
        state.set_cost_range(0, 1001);

        let stepped = (3.8f64 / 0.1).round() * 0.1;
        assert!(stepped > 3.8);
        state.set_min_rating(stepped);

        assert_eq!(state.criteria.as_ref().unwrap().min_rating, 3.8);
        assert_eq!(state.matched_rows(), 3);
    }

    #[rstest]
    fn failed_open_keeps_the_current_table(mut state: AppState) {
        state.open(Path::new("/definitely/not/here.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.table.as_ref().unwrap().len(), 6);
        assert_eq!(state.source, Some(PathBuf::from("sample.csv")));
    }
}
