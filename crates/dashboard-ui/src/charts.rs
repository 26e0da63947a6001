//! Chart adapter: turns an [`AggregateSeries`] into a ratatui line or bar
//! chart.
//!
//! Drawing goes through a process-wide [`ChartRegistry`] obtained from
//! [`register_chart_primitives`]. The registry is created once; later calls
//! hand back the same instance.

use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use dashboard_core::formatting::format_compact;
use dashboard_core::models::AggregateSeries;

use crate::themes::Theme;

// ── Chart types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// Presentation switches shared by both chart kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub show_legend: bool,
    pub show_x_grid: bool,
    /// Anchor the value axis at zero instead of the series minimum.
    pub begin_at_zero: bool,
    pub accent: Color,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_legend: false,
            show_x_grid: false,
            begin_at_zero: true,
            accent: Color::Cyan,
        }
    }
}

/// What to draw: kind, title, data and options.
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    pub kind: ChartKind,
    pub title: String,
    pub series: &'a AggregateSeries,
    pub options: ChartOptions,
}

impl<'a> ChartSpec<'a> {
    /// Dashboard line chart with the theme's accent colour.
    pub fn line(title: impl Into<String>, series: &'a AggregateSeries, theme: &Theme) -> Self {
        Self {
            kind: ChartKind::Line,
            title: title.into(),
            series,
            options: ChartOptions {
                accent: theme.accent,
                ..ChartOptions::default()
            },
        }
    }

    /// Dashboard bar chart with the theme's accent colour.
    pub fn bar(title: impl Into<String>, series: &'a AggregateSeries, theme: &Theme) -> Self {
        Self {
            kind: ChartKind::Bar,
            ..Self::line(title, series, theme)
        }
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Handle proving chart primitives were registered. Only
/// [`register_chart_primitives`] hands one out.
#[derive(Debug)]
pub struct ChartRegistry {
    kinds: Vec<ChartKind>,
}

static REGISTRY: OnceLock<ChartRegistry> = OnceLock::new();

/// Register the line and bar primitives. Idempotent.
pub fn register_chart_primitives() -> &'static ChartRegistry {
    REGISTRY.get_or_init(|| {
        tracing::debug!("chart primitives registered");
        ChartRegistry {
            kinds: vec![ChartKind::Line, ChartKind::Bar],
        }
    })
}

impl ChartRegistry {
    pub fn supports(&self, kind: ChartKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Draw `spec` into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, spec: &ChartSpec<'_>, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(format!(" {} ", spec.title));

        if spec.series.is_empty() {
            let empty = Paragraph::new(Line::styled("No data in range", theme.dim))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        match spec.kind {
            ChartKind::Line => render_line_chart(frame, area, spec, block, theme),
            ChartKind::Bar => render_bar_chart(frame, area, spec, block, theme),
        }
    }
}

// ── Line chart ────────────────────────────────────────────────────────────────

fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    spec: &ChartSpec<'_>,
    block: Block<'_>,
    theme: &Theme,
) {
    let series = spec.series;
    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    let (y_min, y_max) = value_bounds(series, spec.options.begin_at_zero);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let grid: Vec<(f64, f64)> = if spec.options.show_x_grid {
        (0..points.len()).map(|i| (i as f64, y_max)).collect()
    } else {
        Vec::new()
    };

    let mut datasets = Vec::new();
    if !grid.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Bar)
                .style(theme.grid)
                .data(&grid),
        );
    }
    let line = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(spec.options.accent))
        .data(&points);
    datasets.push(if spec.options.show_legend {
        line.name(spec.title.clone())
    } else {
        line
    });

    let x_labels = edge_labels(&series.labels, area.width.saturating_sub(4) as usize / 3);
    let y_labels = vec![
        format_compact(y_min),
        format_compact((y_min + y_max) / 2.0),
        format_compact(y_max),
    ];

    let mut chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([y_min, y_max])
                .labels(y_labels),
        );
    if !spec.options.show_legend {
        chart = chart.legend_position(None);
    }

    frame.render_widget(chart, area);
}

/// Lower and upper value-axis bounds with a little headroom.
fn value_bounds(series: &AggregateSeries, begin_at_zero: bool) -> (f64, f64) {
    let max = series.values.iter().copied().fold(f64::MIN, f64::max);
    let min = series.values.iter().copied().fold(f64::MAX, f64::min);
    let lower = if begin_at_zero { min.min(0.0) } else { min };
    let span = max - lower;
    if span > 0.0 {
        (lower, max + span * 0.1)
    } else {
        (lower, lower + 1.0)
    }
}

/// First, middle and last labels, each truncated to `width` columns.
fn edge_labels(labels: &[String], width: usize) -> Vec<String> {
    let width = width.max(4);
    match labels.len() {
        0 => Vec::new(),
        1 => vec![truncate_label(&labels[0], width)],
        2 => vec![
            truncate_label(&labels[0], width),
            truncate_label(&labels[1], width),
        ],
        n => vec![
            truncate_label(&labels[0], width),
            truncate_label(&labels[n / 2], width),
            truncate_label(&labels[n - 1], width),
        ],
    }
}

// ── Bar chart ─────────────────────────────────────────────────────────────────

fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    spec: &ChartSpec<'_>,
    block: Block<'_>,
    theme: &Theme,
) {
    let series = spec.series;
    let inner_width = area.width.saturating_sub(2) as usize;
    let count = series.len().max(1);
    let bar_width = (inner_width.saturating_sub(count - 1) / count).clamp(1, 12) as u16;

    // Bars are unsigned; negative totals draw as empty bars with their text.
    let bars: Vec<Bar> = series
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .text_value(format_compact(value))
                .label(Line::from(truncate_label(label, bar_width as usize)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(spec.options.accent))
        .value_style(theme.value)
        .label_style(theme.label);

    frame.render_widget(chart, area);
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Shorten `label` to at most `max_width` terminal columns, marking the cut
/// with `…`.
pub fn truncate_label(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
