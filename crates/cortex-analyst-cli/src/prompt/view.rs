//! Plain-text layouts for result tables and charts.
use cortex_analyst::backend::base::QueryResult;
use cortex_analyst::render::Chart;

const MAX_CELL_WIDTH: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 30;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Aligned text table with a header rule
pub fn format_table(result: &QueryResult) -> String {
    if result.column_count() == 0 {
        return "(no columns)\n".to_string();
    }

    let header: Vec<String> = result
        .columns
        .iter()
        .map(|c| truncate(&c.name, MAX_CELL_WIDTH))
        .collect();
    let body: Vec<Vec<String>> = (0..result.row_count())
        .map(|row| {
            (0..result.column_count())
                .map(|column| truncate(&result.cell_text(row, column), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|column| {
            body.iter()
                .map(|row| row[column].chars().count())
                .chain(std::iter::once(header[column].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&header));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in &body {
        out.push_str(&line(row));
        out.push('\n');
    }
    if body.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn bounds(chart: &Chart) -> Option<(f64, f64)> {
    let values = chart.series.iter().flat_map(|s| s.points.iter().flatten());
    values.fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// One sparkline per series, scaled over every plotted value
pub fn format_line_chart(chart: &Chart) -> String {
    let Some((lo, hi)) = bounds(chart) else {
        return "(nothing to plot)\n".to_string();
    };
    let span = hi - lo;
    let label_width = chart
        .series
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for series in &chart.series {
        let line: String = series
            .points
            .iter()
            .map(|point| match point {
                None => ' ',
                Some(_) if span == 0.0 => SPARK_LEVELS[SPARK_LEVELS.len() / 2],
                Some(v) => {
                    let level = ((v - lo) / span * (SPARK_LEVELS.len() - 1) as f64).round();
                    SPARK_LEVELS[level as usize]
                }
            })
            .collect();
        out.push_str(&format!("{} {}\n", pad(&series.name, label_width), line));
    }
    if let (Some(first), Some(last)) = (chart.categories.first(), chart.categories.last()) {
        out.push_str(&format!(
            "{} {} … {}\n",
            pad("", label_width),
            first,
            last
        ));
    }
    out
}

/// Horizontal bars, one row per category and series
pub fn format_bar_chart(chart: &Chart) -> String {
    let Some((lo, hi)) = bounds(chart) else {
        return "(nothing to plot)\n".to_string();
    };
    let max = hi.abs().max(lo.abs());
    let multi_series = chart.series.len() > 1;
    let label_width = chart
        .categories
        .iter()
        .map(|c| truncate(c, MAX_CELL_WIDTH).chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (row, category) in chart.categories.iter().enumerate() {
        for (position, series) in chart.series.iter().enumerate() {
            let label = if position == 0 {
                truncate(category, MAX_CELL_WIDTH)
            } else {
                String::new()
            };
            let value = series.points.get(row).copied().flatten();
            let bar = match value {
                Some(v) if max > 0.0 => "█".repeat((v.abs() / max * BAR_WIDTH as f64).round() as usize),
                _ => String::new(),
            };
            let amount = value.map(|v| v.to_string()).unwrap_or_default();
            let name = if multi_series {
                format!(" {}", series.name)
            } else {
                String::new()
            };
            out.push_str(&format!(
                "{} │{} {}{}\n",
                pad(&label, label_width),
                bar,
                amount,
                name
            ));
        }
    }
    out
}
