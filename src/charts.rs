// 📈 Chart Data
// The four charts drawn from the oldest-by-continent-and-category table.
//
// This module only shapes the data (series, slices, pivoted grids, colour
// scales). Drawing lives in the terminal UI behind the `tui` feature.
//
// The pie chart and the longevity heatmap both work on the aggregated
// table, one row per (continent, category) pair. The pie therefore shows
// how many categories each continent has, and the longevity heatmap shows
// the age of each pair's oldest business, not per-business distributions.

use crate::entities::OldestByCategory;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// LINE CHART
// ============================================================================

/// One line per continent: founding year (x) against category (y).
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub continent: String,
    /// Picks marker and colour so continents stay distinguishable
    pub style_index: usize,
    /// (year_founded, category position on the y axis), ordered by year
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub x_label: String,
    pub y_label: String,
    /// y axis ticks, position = index
    pub categories: Vec<String>,
    pub series: Vec<LineSeries>,
}

impl LineChart {
    pub fn build(rows: &[OldestByCategory]) -> Self {
        // categories in order of first appearance
        let mut categories: Vec<String> = Vec::new();
        for row in rows {
            if !categories.contains(&row.category) {
                categories.push(row.category.clone());
            }
        }

        let mut by_continent: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for row in rows {
            let y = categories
                .iter()
                .position(|c| c == &row.category)
                .unwrap_or_default() as f64;
            by_continent
                .entry(row.continent.as_str())
                .or_default()
                .push((row.year_founded as f64, y));
        }

        let series = by_continent
            .into_iter()
            .enumerate()
            .map(|(style_index, (continent, mut points))| {
                points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
                LineSeries {
                    continent: continent.to_string(),
                    style_index,
                    points,
                }
            })
            .collect();

        LineChart {
            x_label: "Year of Foundation".to_string(),
            y_label: "Business Category".to_string(),
            categories,
            series,
        }
    }

    /// (min, max) founding year across all series
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
    }
}

// ============================================================================
// PIE CHART
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub continent: String,
    pub count: usize,
    pub percent: f64,
}

impl PieSlice {
    /// Label in `%1.1f%%` form, e.g. "42.9%"
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Seaborn "Set2" qualitative colours, cycled per slice.
const SET2: &[(u8, u8, u8)] = &[
    (102, 194, 165),
    (252, 141, 98),
    (141, 160, 203),
    (231, 138, 195),
    (166, 216, 84),
    (255, 217, 47),
    (229, 196, 148),
    (179, 179, 179),
];

/// Share of (continent, category) rows per continent.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub start_angle: f64,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub const START_ANGLE: f64 = 140.0;

    pub fn build(rows: &[OldestByCategory]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in rows {
            *counts.entry(row.continent.as_str()).or_insert(0) += 1;
        }

        let total = rows.len();
        let slices = counts
            .into_iter()
            .map(|(continent, count)| PieSlice {
                continent: continent.to_string(),
                count,
                percent: if total == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / total as f64
                },
            })
            .collect();

        PieChart {
            start_angle: Self::START_ANGLE,
            slices,
        }
    }

    pub fn slice_color(index: usize) -> (u8, u8, u8) {
        SET2[index % SET2.len()]
    }

    /// (start, end) of each slice in degrees, counter-clockwise from the
    /// positive x axis, beginning at `start_angle`.
    pub fn slice_angles(&self) -> Vec<(f64, f64)> {
        let mut start = self.start_angle;
        self.slices
            .iter()
            .map(|slice| {
                let end = start + slice.percent * 3.6;
                let span = (start, end);
                start = end;
                span
            })
            .collect()
    }

    /// Index of the slice covering `angle` (degrees, any range).
    pub fn slice_at(&self, angle: f64) -> Option<usize> {
        let offset = (angle - self.start_angle).rem_euclid(360.0);
        let mut cumulative = 0.0;
        for (i, slice) in self.slices.iter().enumerate() {
            cumulative += slice.percent * 3.6;
            if offset < cumulative {
                return Some(i);
            }
        }
        // rounding can leave a sliver at the very end
        self.slices.len().checked_sub(1)
    }
}

// ============================================================================
// HEATMAPS
// ============================================================================

/// Colour scale for heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Light green (low) to dark green (high)
    Greens,
    /// Reversed magma: pale yellow (low) to near-black (high)
    MagmaReversed,
}

const GREENS: &[(u8, u8, u8)] = &[
    (247, 252, 245),
    (199, 233, 192),
    (116, 196, 118),
    (35, 139, 69),
    (0, 68, 27),
];

const MAGMA_REVERSED: &[(u8, u8, u8)] = &[
    (252, 253, 191),
    (252, 137, 97),
    (183, 55, 121),
    (81, 18, 124),
    (0, 0, 4),
];

impl Palette {
    fn stops(&self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::Greens => GREENS,
            Palette::MagmaReversed => MAGMA_REVERSED,
        }
    }

    /// Colour at position `t` in [0, 1], linearly interpolated between stops.
    pub fn color_at(&self, t: f64) -> (u8, u8, u8) {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;

        let (r0, g0, b0) = stops[lower];
        let (r1, g1, b1) = stops[lower + 1];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

        (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

/// (row labels, column labels, cells)
type Pivot = (Vec<String>, Vec<String>, Vec<Vec<Option<f64>>>);

/// Category (rows) by continent (columns) grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// row labels, sorted
    pub categories: Vec<String>,
    /// column labels, sorted
    pub continents: Vec<String>,
    /// cells[row][column]; None where the pair has no data
    pub cells: Vec<Vec<Option<f64>>>,
    /// decimals in cell annotations
    pub precision: usize,
    pub palette: Palette,
}

impl Heatmap {
    /// Pivot `rows` into a grid, reducing each cell's values with `reduce`.
    fn pivot<F, R>(rows: &[OldestByCategory], value: F, reduce: R) -> Pivot
    where
        F: Fn(&OldestByCategory) -> f64,
        R: Fn(&[f64]) -> f64,
    {
        let categories: Vec<String> = rows
            .iter()
            .map(|r| r.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let continents: Vec<String> = rows
            .iter()
            .map(|r| r.continent.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut values: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
        for row in rows {
            values
                .entry((row.category.as_str(), row.continent.as_str()))
                .or_default()
                .push(value(row));
        }

        let cells = categories
            .iter()
            .map(|category| {
                continents
                    .iter()
                    .map(|continent| {
                        values
                            .get(&(category.as_str(), continent.as_str()))
                            .map(|v| reduce(v.as_slice()))
                    })
                    .collect()
            })
            .collect();

        (categories, continents, cells)
    }

    /// Minimum founding year per (category, continent).
    pub fn foundation_dates(rows: &[OldestByCategory]) -> Self {
        let (categories, continents, cells) = Self::pivot(
            rows,
            |r| r.year_founded as f64,
            |v| v.iter().copied().fold(f64::INFINITY, f64::min),
        );

        Heatmap {
            title: "Business Foundation Date by Category and Continent".to_string(),
            x_label: "Continent".to_string(),
            y_label: "Business Category".to_string(),
            categories,
            continents,
            cells,
            precision: 0,
            palette: Palette::Greens,
        }
    }

    /// Mean business age per (category, continent), age = reference_year - year_founded.
    pub fn longevity(rows: &[OldestByCategory], reference_year: i32) -> Self {
        let (categories, continents, cells) = Self::pivot(
            rows,
            |r| r.business_age(reference_year) as f64,
            |v| v.iter().sum::<f64>() / v.len() as f64,
        );

        Heatmap {
            title: "Business Longevity by Category and Continent".to_string(),
            x_label: "Continent".to_string(),
            y_label: "Business Category".to_string(),
            categories,
            continents,
            cells,
            precision: 1,
            palette: Palette::MagmaReversed,
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Formatted cell value, empty when the pair has no data.
    pub fn annotation(&self, row: usize, column: usize) -> String {
        match self.cell(row, column) {
            Some(v) => format!("{:.*}", self.precision, v),
            None => String::new(),
        }
    }

    /// (min, max) over populated cells
    pub fn value_range(&self) -> Option<(f64, f64)> {
        bounds(self.cells.iter().flatten().filter_map(|c| *c))
    }

    /// Cell colour scaled over `value_range`.
    pub fn color(&self, row: usize, column: usize) -> Option<(u8, u8, u8)> {
        let value = self.cell(row, column)?;
        let (min, max) = self.value_range()?;
        let t = if max > min { (value - min) / (max - min) } else { 0.5 };
        Some(self.palette.color_at(t))
    }
}

// ============================================================================
// ALL CHARTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub reference_year: i32,
    pub line: LineChart,
    pub pie: PieChart,
    pub foundation: Heatmap,
    pub longevity: Heatmap,
}

impl Charts {
    pub fn build(rows: &[OldestByCategory], reference_year: i32) -> Self {
        Charts {
            reference_year,
            line: LineChart::build(rows),
            pie: PieChart::build(rows),
            foundation: Heatmap::foundation_dates(rows),
            longevity: Heatmap::longevity(rows, reference_year),
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
