//! Date boundary inputs and the in-range row count.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dashboard_core::dates::parse_date;
use dashboard_core::filter::DateRange;
use dashboard_data::analysis::DashboardAnalysis;

use crate::themes::Theme;

/// Width of the visible part of a boundary input.
const INPUT_WIDTH: usize = 12;

/// Which boundary input receives typed characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFocus {
    #[default]
    None,
    From,
    To,
}

impl InputFocus {
    /// Tab order: From → To → none → From.
    pub fn next(self) -> Self {
        match self {
            InputFocus::None => InputFocus::From,
            InputFocus::From => InputFocus::To,
            InputFocus::To => InputFocus::None,
        }
    }

    pub fn is_editing(self) -> bool {
        self != InputFocus::None
    }
}

/// Height of the rendered bar, borders included.
pub const FILTER_BAR_HEIGHT: u16 = 3;

/// Render the filter bar.
pub fn render_filter_bar(
    frame: &mut Frame,
    area: Rect,
    range: &DateRange,
    focus: InputFocus,
    analysis: &DashboardAnalysis,
    theme: &Theme,
) {
    let mut spans = Vec::new();
    spans.extend(input_spans("From", &range.from, focus == InputFocus::From, theme));
    spans.push(Span::raw("  "));
    spans.extend(input_spans("To", &range.to, focus == InputFocus::To, theme));
    spans.push(Span::raw("   "));
    spans.push(Span::styled(analysis.rows_summary(), theme.info));
    spans.push(Span::raw("   "));
    spans.push(Span::styled("Measure: ", theme.label));
    spans.push(Span::styled(analysis.measure.label(), theme.value));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(" Filter "),
    );
    frame.render_widget(paragraph, area);
}

/// `Label: [value_   ]`, with a marker when a non-empty value is ignored.
fn input_spans(label: &str, value: &str, focused: bool, theme: &Theme) -> Vec<Span<'static>> {
    let cursor = if focused { "_" } else { "" };
    let shown = format!("{value}{cursor}");
    let padded = format!("{:<width$}", shown, width = INPUT_WIDTH);

    let mut spans = vec![
        Span::styled(format!("{label}: "), theme.label),
        Span::styled("[", theme.dim),
        Span::styled(padded, if focused { theme.input_focused } else { theme.input }),
        Span::styled("]", theme.dim),
    ];
    if !value.is_empty() && parse_date(value).is_none() {
        spans.push(Span::styled(" (ignored)", theme.warning));
    }
    spans
}
