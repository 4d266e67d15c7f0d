//! Terminal rendering: option lists and a horizontal stacked bar chart.
//!
//! One row per date, ascending. Each category gets its own glyph and the
//! row's segments are drawn in first-appearance order of the categories.

use std::collections::BTreeMap;
use std::fmt::Write;

use issuechart_core::render::{ChartData, ChartRenderer, OptionListRenderer, SelectOption};

const GLYPHS: [char; 6] = ['█', '▓', '▒', '░', '#', '+'];

pub struct TextRenderer {
    /// Width of the longest bar, in glyphs.
    pub max_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { max_width: 50 }
    }
}

impl TextRenderer {
    fn glyph(index: usize) -> char {
        GLYPHS[index % GLYPHS.len()]
    }

    /// Scaled segment width; any non-zero count gets at least one glyph.
    fn width(&self, count: u64, max_total: u64) -> usize {
        if count == 0 || max_total == 0 {
            return 0;
        }
        let scaled = (count as f64 / max_total as f64 * self.max_width as f64).round() as usize;
        scaled.max(1)
    }
}

impl ChartRenderer for TextRenderer {
    fn render_chart(&self, chart: &ChartData) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Selected Date Range: {}", chart.date_range);

        if chart.is_empty() {
            out.push_str("No issues in the selected range.\n");
            return out;
        }

        let mut categories: Vec<&str> = Vec::new();
        let mut rows: BTreeMap<&str, Vec<(usize, u64)>> = BTreeMap::new();
        for bucket in &chart.buckets {
            let index = match categories.iter().position(|c| *c == bucket.category) {
                Some(index) => index,
                None => {
                    categories.push(&bucket.category);
                    categories.len() - 1
                }
            };
            rows.entry(bucket.date.as_str()).or_default().push((index, bucket.count));
        }

        let totals: BTreeMap<&str, u64> = rows
            .iter()
            .map(|(date, segments)| (*date, segments.iter().map(|(_, count)| count).sum()))
            .collect();
        let max_total = totals.values().copied().max().unwrap_or(0);

        for (date, segments) in &mut rows {
            segments.sort_by_key(|(index, _)| *index);
            let mut bar = String::new();
            for (index, count) in segments.iter() {
                let glyph = Self::glyph(*index);
                bar.extend(std::iter::repeat_n(glyph, self.width(*count, max_total)));
            }
            let total = totals.get(date).copied().unwrap_or(0);
            let _ = writeln!(out, "{date} | {bar} {total}");
        }

        out.push('\n');
        for (index, category) in categories.iter().enumerate() {
            let _ = writeln!(out, "  {} {}", Self::glyph(index), category);
        }
        out
    }
}

impl OptionListRenderer for TextRenderer {
    fn render_options(&self, label: &str, options: &[SelectOption]) -> String {
        let mut out = format!("{label}:\n");
        if options.is_empty() {
            out.push_str("  (none)\n");
            return out;
        }
        for option in options {
            if option.label == option.value {
                let _ = writeln!(out, "  {}", option.value);
            } else {
                let _ = writeln!(out, "  {} ({})", option.label, option.value);
            }
        }
        out
    }
}
