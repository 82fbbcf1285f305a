use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::RestaurantTable;

const ROW_HEIGHT: f32 = 18.0;

/// Render the first filtered rows with every source column.
pub fn preview_table(ui: &mut Ui, table: &RestaurantTable, preview: &[usize], matched: usize) {
    ui.strong(format!(
        "Filtered data preview (first {} of {matched} rows)",
        preview.len()
    ));

    let n_columns = table.column_names.len();
    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(Column::auto().at_least(40.0), n_columns)
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for name in &table.column_names {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, preview.len(), |mut row| {
                        let restaurant = &table.restaurants[preview[row.index()]];
                        for i in 0..n_columns {
                            row.col(|ui| {
                                if let Some(cell) = restaurant.cells.get(i) {
                                    ui.label(cell.to_string());
                                }
                            });
                        }
                    });
                });
        });
}
