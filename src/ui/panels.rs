use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let cities = match &state.table {
        Some(table) => table.cities.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    let Some(criteria) = state.criteria.clone() else {
        ui.label("The dataset has no cities.");
        return;
    };
    // Clone what we need so we can mutate state inside the widgets.
    let universe = state.cuisine_universe.clone();
    let max_cost = state.max_cost;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- City ----
            ui.strong("Choose city");
            egui::ComboBox::from_id_salt("city")
                .selected_text(&criteria.city)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for city in &cities {
                        if ui.selectable_label(criteria.city == *city, city).clicked()
                            && criteria.city != *city
                        {
                            state.select_city(city);
                        }
                    }
                });
            ui.separator();

            // ---- Rating floor ----
            ui.strong("Minimum rating");
            let mut min_rating = criteria.min_rating;
            if ui
                .add(Slider::new(&mut min_rating, 0.0..=5.0).step_by(0.1).max_decimals(1))
                .changed()
            {
                state.set_min_rating(min_rating);
            }
            ui.separator();

            // ---- Cost range ----
            ui.strong("Cost for two");
            let (mut low, mut high) = (criteria.cost_range.low, criteria.cost_range.high);
            let low_changed = ui.add(Slider::new(&mut low, 0..=max_cost).text("from")).changed();
            let high_changed = ui.add(Slider::new(&mut high, 0..=max_cost).text("to")).changed();
            if low_changed {
                high = high.max(low);
            }
            if high_changed {
                low = low.min(high);
            }
            if low_changed || high_changed {
                state.set_cost_range(low, high);
            }
            ui.separator();

            // ---- Cuisines (multi-select) ----
            let header = format!("Cuisines  ({}/{})", criteria.cuisines.len(), universe.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("cuisines")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_cuisines();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_cuisines();
                        }
                    });

                    for cuisine in &universe {
                        let mut checked = criteria.cuisines.contains(cuisine);
                        if ui.checkbox(&mut checked, cuisine).changed() {
                            state.toggle_cuisine(cuisine);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} restaurants loaded, {} matching",
                table.len(),
                state.matched_rows()
            ));
            if table.dropped_rows > 0 {
                ui.label(
                    RichText::new(format!("({} without cuisines skipped)", table.dropped_rows))
                        .weak(),
                );
            }
        }

        if let Some(source) = &state.source {
            ui.separator();
            ui.label(RichText::new(source.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
