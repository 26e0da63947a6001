//! Source preview table.
//!
//! Shows the first rows of the loaded dataset exactly as normalized, with no
//! date filtering applied.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dashboard_core::formatting;
use dashboard_core::models::{NormalizedRow, CATEGORY_COLUMN, DATE_COLUMN, SALES_COLUMN, UNITS_COLUMN};

use crate::themes::Theme;

/// Render `rows` as a bordered table titled with the preview size.
pub fn render_preview_table(frame: &mut Frame, area: Rect, rows: &[NormalizedRow], theme: &Theme) {
    let header = Row::new(
        [DATE_COLUMN, SALES_COLUMN, CATEGORY_COLUMN, UNITS_COLUMN]
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.date.clone()),
                Cell::from(Text::from(formatting::format_value(row.amount)).alignment(Alignment::Right)),
                Cell::from(row.category.clone()),
                Cell::from(Text::from(formatting::format_value(row.units)).alignment(Alignment::Right)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Min(12),
        Constraint::Length(10),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" Preview (first {} rows) ", rows.len())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown in the preview area while there are no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(" Preview "),
            ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
