use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration either side of the title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header: title, separator, and a `[ source | measure ]` line.
pub struct Header<'a> {
    pub source: &'a str,
    pub measure: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, measure: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            measure,
            theme,
        }
    }

    /// Number of lines [`Self::to_lines`] produces.
    pub const HEIGHT: u16 = 3;

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" SALES DASHBOARD ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.measure.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}
