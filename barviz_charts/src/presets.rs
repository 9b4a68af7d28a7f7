// Copyright 2025 the Barviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made charts for conviction statistics.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use hashbrown::HashMap;
use peniko::Brush;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bars::HoverDatum;
use crate::chart::{BarChart, Container};
use crate::data::{DataPoint, StackedRow};
use crate::error::ChartResult;

/// Label for rows whose ages are unknown or invalid.
pub const UNKNOWN_AGE: &str = "Unknown Age";

/// A count of convictions for an age bracket.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeRow {
    /// Lower bound, if any.
    #[serde(default)]
    pub age_min: Option<u32>,
    /// Upper bound, if any.
    #[serde(default)]
    pub age_max: Option<u32>,
    /// Set when the source ages could not be parsed.
    #[serde(default)]
    pub invalid_ages: bool,
    /// Number of convictions.
    pub value: f64,
}

impl AgeRow {
    /// Creates a valid bracket.
    pub fn new(age_min: Option<u32>, age_max: Option<u32>, value: f64) -> Self {
        Self {
            age_min,
            age_max,
            invalid_ages: false,
            value,
        }
    }

    /// Creates a row for unparseable ages.
    pub fn invalid(value: f64) -> Self {
        Self {
            invalid_ages: true,
            value,
            ..Self::default()
        }
    }

    /// Returns the bracket label: `"<N"`, `"N - M"`, `"N+"`, or [`UNKNOWN_AGE`].
    pub fn label(&self) -> String {
        if self.invalid_ages {
            return String::from(UNKNOWN_AGE);
        }
        match (self.age_min, self.age_max) {
            (Some(min), Some(max)) => format!("{min} - {max}"),
            (None, Some(max)) => format!("<{max}"),
            (Some(min), None) => format!("{min}+"),
            (None, None) => String::from(UNKNOWN_AGE),
        }
    }

    /// Orders brackets youngest first.
    ///
    /// Invalid rows come after all valid ones. Among valid rows a missing
    /// minimum sorts first, equal minimums are ordered by maximum, and a
    /// missing maximum sorts last.
    pub fn cmp_ages(&self, other: &Self) -> Ordering {
        self.invalid_ages
            .cmp(&other.invalid_ages)
            .then_with(|| {
                if self.invalid_ages {
                    Ordering::Equal
                } else {
                    self.age_min
                        .cmp(&other.age_min)
                        .then_with(|| max_key(self.age_max).cmp(&max_key(other.age_max)))
                }
            })
    }
}

fn max_key(age_max: Option<u32>) -> (bool, u32) {
    (age_max.is_none(), age_max.unwrap_or(0))
}

/// Draws category counts as a vertical bar chart.
pub fn create_category_chart(container: &mut Container, data: &[DataPoint]) -> ChartResult<()> {
    BarChart::vertical().render(container, data)
}

/// Draws drug types as a horizontal chart whose tooltips show each bar's share
/// of the total, e.g. `"12.5%"`.
pub fn create_drug_chart(container: &mut Container, data: &[DataPoint]) -> ChartResult<()> {
    let sum: f64 = data.iter().map(|d| d.value).sum();
    BarChart::horizontal()
        .with_tooltip_value(move |d: &HoverDatum| percent_of(d.value, sum))
        .render(container, data)
}

/// Formats `value` as a percentage of `total` with one decimal.
///
/// A zero total reports `"0.0%"`.
pub fn percent_of(value: f64, total: f64) -> String {
    let pct = if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    };
    format!("{pct:.1}%")
}

/// Draws charge classes per drug type as stacked horizontal bars.
///
/// Each row's total is recomputed from its segments before rendering.
pub fn create_drug_charge_class_chart<K, B>(
    container: &mut Container,
    rows: &[StackedRow],
    segment_keys: impl IntoIterator<Item = K>,
    colors: impl IntoIterator<Item = B>,
) -> ChartResult<()>
where
    K: Into<String>,
    B: Into<Brush>,
{
    let rows: Vec<StackedRow> = rows
        .iter()
        .cloned()
        .map(|mut row| {
            let stale = row.total.value;
            let sum = row.compute_total();
            if stale != 0.0 && stale != sum {
                warn!(label = %row.label, stale, sum, "replaced inconsistent stacked total");
            }
            row
        })
        .collect();
    BarChart::stacked_horizontal(segment_keys, colors).render(container, &rows)
}

/// Draws age brackets, youngest first, as a horizontal chart.
///
/// Rows that end up with the same label (several unknown-age rows, say) are
/// merged into one bar.
pub fn create_age_chart(container: &mut Container, rows: &[AgeRow]) -> ChartResult<()> {
    BarChart::horizontal().render(container, &age_points(rows))
}

/// Sorts age rows and turns them into labelled points.
pub fn age_points(rows: &[AgeRow]) -> Vec<DataPoint> {
    let mut sorted: Vec<&AgeRow> = rows.iter().collect();
    sorted.sort_by(|a, b| a.cmp_ages(b));

    let mut points: Vec<DataPoint> = Vec::with_capacity(sorted.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in sorted {
        let label = row.label();
        if let Some(&i) = index.get(&label) {
            points[i].value += row.value;
            continue;
        }
        index.insert(label.clone(), points.len());
        points.push(DataPoint::new(label, row.value));
    }
    points
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn age_labels() {
        assert_eq!(AgeRow::new(Some(18), Some(25), 1.0).label(), "18 - 25");
        assert_eq!(AgeRow::new(None, Some(18), 1.0).label(), "<18");
        assert_eq!(AgeRow::new(Some(65), None, 1.0).label(), "65+");
        assert_eq!(AgeRow::invalid(1.0).label(), "Unknown Age");
        assert_eq!(AgeRow::new(None, None, 1.0).label(), "Unknown Age");
        let mut flagged = AgeRow::new(Some(18), Some(25), 1.0);
        flagged.invalid_ages = true;
        assert_eq!(flagged.label(), "Unknown Age");
    }

    #[test]
    fn ages_sort_youngest_first_with_invalid_last() {
        let rows = vec![
            AgeRow::invalid(3.0),
            AgeRow::new(Some(65), None, 5.0),
            AgeRow::new(Some(18), Some(25), 10.0),
            AgeRow::new(None, Some(18), 2.0),
            AgeRow::new(Some(26), Some(35), 8.0),
        ];
        let labels: Vec<String> = age_points(&rows).into_iter().map(|p| p.label).collect();
        assert_eq!(labels, ["<18", "18 - 25", "26 - 35", "65+", "Unknown Age"]);
    }

    #[test]
    fn equal_minimums_break_ties_on_maximum() {
        let open = AgeRow::new(Some(18), None, 1.0);
        let narrow = AgeRow::new(Some(18), Some(20), 1.0);
        let wide = AgeRow::new(Some(18), Some(25), 1.0);
        assert_eq!(narrow.cmp_ages(&wide), Ordering::Less);
        assert_eq!(wide.cmp_ages(&open), Ordering::Less);
        assert_eq!(open.cmp_ages(&open.clone()), Ordering::Equal);
    }

    #[test]
    fn unknown_ages_merge_into_one_bar() {
        let rows = [
            AgeRow::new(None, None, 1.0),
            AgeRow::new(Some(18), Some(25), 4.0),
            AgeRow::invalid(2.0),
        ];
        let points = age_points(&rows);
        assert_eq!(
            points,
            vec![DataPoint::new("Unknown Age", 3.0), DataPoint::new("18 - 25", 4.0)]
        );
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(percent_of(1.0, 8.0), "12.5%");
        assert_eq!(percent_of(1.0, 3.0), "33.3%");
        assert_eq!(percent_of(0.0, 0.0), "0.0%");
    }

    #[test]
    fn age_rows_load_from_json() {
        let rows: Vec<AgeRow> = serde_json::from_str(
            r#"[{"age_min": 18, "age_max": 25, "value": 10},
                {"age_max": 18, "value": 2},
                {"invalid_ages": true, "value": 1}]"#,
        )
        .expect("valid rows");
        assert_eq!(rows[1], AgeRow::new(None, Some(18), 2.0));
        assert!(rows[2].invalid_ages, "flag parsed");
    }
}
