use std::collections::{BTreeMap, HashMap};

use super::cuisine::tokenize;
use super::filter::{filter, FilterCriteria};
use super::model::RestaurantTable;
use crate::config::{PREVIEW_ROWS, TOP_CUISINES};

// ---------------------------------------------------------------------------
// Top-N cuisines
// ---------------------------------------------------------------------------

/// Count cuisine tokens over `rows` and return the `n` most frequent,
/// highest count first. Equal counts keep the order in which the cuisines
/// were first seen.
pub fn top_cuisines(table: &RestaurantTable, rows: &[usize], n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for &i in rows {
        for token in tokenize(&table.restaurants[i].cuisines) {
            match position.get(token) {
                Some(&p) => counts[p].1 += 1,
                None => {
                    position.insert(token, counts.len());
                    counts.push((token.to_string(), 1));
                }
            }
        }
    }

    // Stable, so ties stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

// ---------------------------------------------------------------------------
// Chart series: plain column projections
// ---------------------------------------------------------------------------

/// Paired columns for the three rating charts. Rows missing either value
/// are left out of the pair that needs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// `[average_cost_for_two, aggregate_rating]`
    pub cost_vs_rating: Vec<[f64; 2]>,
    /// Online-delivery label → ratings of that group.
    pub delivery_vs_rating: BTreeMap<String, Vec<f64>>,
    /// `[votes, aggregate_rating]`
    pub votes_vs_rating: Vec<[f64; 2]>,
}

pub fn chart_series(table: &RestaurantTable, rows: &[usize]) -> ChartSeries {
    let mut series = ChartSeries::default();

    for &i in rows {
        let r = &table.restaurants[i];
        let Some(rating) = r.aggregate_rating else {
            continue;
        };
        if let Some(cost) = r.average_cost_for_two {
            series.cost_vs_rating.push([cost as f64, rating]);
        }
        if let Some(label) = &r.has_online_delivery {
            series
                .delivery_vs_rating
                .entry(label.clone())
                .or_default()
                .push(rating);
        }
        if let Some(votes) = r.votes {
            series.votes_vs_rating.push([votes as f64, rating]);
        }
    }

    series
}

// ---------------------------------------------------------------------------
// Box statistics for the delivery groups
// ---------------------------------------------------------------------------

/// Five-number summary plus outliers, drawn the way seaborn's box plot does:
/// linear-interpolated quartiles, whiskers at the furthest values within
/// 1.5 × IQR of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty group.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = 1.5 * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let within = |v: f64| low_fence <= v && v <= high_fence;
        let lower_whisker = sorted.iter().copied().find(|&v| within(v)).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|&v| within(v)).unwrap_or(q3);
        let outliers = sorted.iter().copied().filter(|&v| !within(v)).collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Dashboard: the full output of one interaction
// ---------------------------------------------------------------------------

/// Everything the chart panel draws for a non-empty result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Indices of all matching rows, in table order.
    pub rows: Vec<usize>,
    pub top_cuisines: Vec<(String, usize)>,
    pub series: ChartSeries,
    /// Delivery label → box statistics, same keys as `series.delivery_vs_rating`.
    pub delivery_boxes: BTreeMap<String, BoxStats>,
    /// First rows of the result, shown in the preview table.
    pub preview: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    /// No row matches the criteria; nothing is aggregated.
    Empty,
    Report(Report),
}

/// Filter `table` by `criteria` and aggregate the result.
pub fn render(table: &RestaurantTable, criteria: &FilterCriteria) -> Dashboard {
    let rows = filter(table, criteria);
    log::debug!("{criteria:?} matched {} of {} rows", rows.len(), table.len());

    if rows.is_empty() {
        log::warn!("No restaurants match the selected filters");
        return Dashboard::Empty;
    }

    let series = chart_series(table, &rows);
    let delivery_boxes = series
        .delivery_vs_rating
        .iter()
        .filter_map(|(label, ratings)| Some((label.clone(), BoxStats::from_values(ratings)?)))
        .collect();

    Dashboard::Report(Report {
        top_cuisines: top_cuisines(table, &rows, TOP_CUISINES),
        preview: rows.iter().copied().take(PREVIEW_ROWS).collect(),
        series,
        delivery_boxes,
        rows,
    })
}
