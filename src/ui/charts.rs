use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, Points};

use crate::color::{generate_palette, ColorMap};
use crate::data::report::{Dashboard, Report};
use crate::state::AppState;
use crate::ui::table::preview_table;

const CHART_HEIGHT: f32 = 280.0;
const WARNING: Color32 = Color32::from_rgb(230, 160, 0);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the charts and preview for the current dashboard.
pub fn dashboard_view(ui: &mut Ui, state: &AppState) {
    let (Some(table), Some(criteria)) = (&state.table, &state.criteria) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a restaurant dataset  (File → Open…)");
        });
        return;
    };

    ui.heading("Restaurant Rating Dashboard");
    ui.add_space(6.0);

    let report = match &state.dashboard {
        Some(Dashboard::Report(report)) => report,
        Some(Dashboard::Empty) => {
            ui.label(
                RichText::new("No data matches the selected filters. Try changing filter values.")
                    .color(WARNING)
                    .strong(),
            );
            return;
        }
        None => return,
    };

    ui.columns(2, |cols: &mut [Ui]| {
        top_cuisines_chart(&mut cols[0], &criteria.city, &report.top_cuisines);
        scatter(
            &mut cols[1],
            "cost_vs_rating",
            "Cost for two vs rating",
            "Average cost for two",
            &report.series.cost_vs_rating,
            Color32::from_rgb(90, 160, 230),
        );
    });
    ui.add_space(10.0);

    ui.columns(2, |cols: &mut [Ui]| {
        delivery_box_plot(&mut cols[0], report, state.delivery_colors.as_ref());
        scatter(
            &mut cols[1],
            "votes_vs_rating",
            "Votes vs rating",
            "Votes",
            &report.series.votes_vs_rating,
            Color32::from_rgb(120, 200, 140),
        );
    });
    ui.add_space(10.0);

    preview_table(ui, table, &report.preview, report.rows.len());
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// Horizontal bars, most frequent cuisine on top.
fn top_cuisines_chart(ui: &mut Ui, city: &str, top: &[(String, usize)]) {
    ui.strong(format!("Top {} cuisines in {city}", top.len()));

    let n = top.len();
    let bars: Vec<Bar> = top
        .iter()
        .zip(generate_palette(n))
        .enumerate()
        .map(|(i, ((name, count), color))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .name(name)
                .fill(color)
        })
        .collect();
    // Bar at argument `k` belongs to `labels[k]`.
    let labels: Vec<String> = top.iter().rev().map(|(name, _)| name.clone()).collect();

    Plot::new("top_cuisines")
        .height(CHART_HEIGHT)
        .x_axis_label("Count")
        .y_axis_min_width(96.0)
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("restaurants"));
        });
}

fn scatter(
    ui: &mut Ui,
    id: &str,
    title: &str,
    x_label: &str,
    points: &[[f64; 2]],
    color: Color32,
) {
    ui.strong(title);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Aggregate rating")
        .include_y(0.0)
        .include_y(5.0)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points.to_vec())
                    .radius(3.0)
                    .color(color)
                    .name(title),
            );
        });
}

/// One box per online-delivery label, outliers drawn as points.
fn delivery_box_plot(ui: &mut Ui, report: &Report, colors: Option<&ColorMap>) {
    ui.strong("Online delivery vs rating");

    let labels: Vec<String> = report.delivery_boxes.keys().cloned().collect();
    let mut outliers: Vec<[f64; 2]> = Vec::new();
    let boxes: Vec<BoxElem> = report
        .delivery_boxes
        .iter()
        .enumerate()
        .map(|(i, (label, stats))| {
            let x = i as f64;
            outliers.extend(stats.outliers.iter().map(|&v| [x, v]));

            let color = colors.map_or(Color32::LIGHT_BLUE, |c| c.color_for(label));
            let spread = BoxSpread::new(
                stats.lower_whisker,
                stats.q1,
                stats.median,
                stats.q3,
                stats.upper_whisker,
            );
            BoxElem::new(x, spread)
                .name(label)
                .box_width(0.5)
                .fill(color.linear_multiply(0.3))
                .stroke(Stroke::new(1.5, color))
        })
        .collect();

    Plot::new("delivery_vs_rating")
        .height(CHART_HEIGHT)
        .x_axis_label("Has online delivery")
        .y_axis_label("Aggregate rating")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(outliers)
                        .radius(2.5)
                        .color(Color32::GRAY)
                        .name("outliers"),
                );
            }
        });
}

/// Axis text for categorical positions: the label at integral marks, blank
/// between them.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
