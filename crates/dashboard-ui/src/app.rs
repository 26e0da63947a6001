//! Main application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the theme, the dashboard session and the input focus. It
//! starts the background load, drains its outcome without blocking, and
//! redraws on every tick.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use dashboard_core::filter::DateRange;
use dashboard_core::models::Measure;
use dashboard_data::analysis::DashboardAnalysis;
use dashboard_runtime::load_state::LoadState;
use dashboard_runtime::loader::{spawn_load, LoadHandle, LoadOutcome};
use dashboard_runtime::session::{DashboardSession, PREVIEW_ROWS};

use crate::charts::{register_chart_primitives, ChartRegistry, ChartSpec};
use crate::components::filter_bar::{render_filter_bar, InputFocus, FILTER_BAR_HEIGHT};
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

const HELP: &str = "Tab: edit dates  Esc: done  r: reset range  m: toggle measure  q: quit";

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub session: DashboardSession,
    pub focus: InputFocus,
    /// CSV file the dashboard loads.
    pub source: PathBuf,
    /// Set to `true` to leave the event loop on the next iteration.
    pub should_quit: bool,
    charts: &'static ChartRegistry,
    tick: usize,
}

impl App {
    pub fn new(theme_name: &str, source: PathBuf, range: DateRange, measure: Measure) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            session: DashboardSession::new(range, measure),
            focus: InputFocus::None,
            source,
            should_quit: false,
            charts: register_chart_primitives(),
            tick: 0,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Mount the session and start fetching the source in the background.
    pub fn start_load(&mut self) -> (mpsc::Receiver<LoadOutcome>, LoadHandle) {
        let ticket = self.session.mount();
        spawn_load(self.source.clone(), ticket)
    }

    /// Commit a finished load. Stale outcomes are ignored.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) -> bool {
        self.session.complete_load(outcome.ticket, outcome.result)
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until the user quits.
    ///
    /// Terminal events are polled with a 250 ms timeout; the load outcome is
    /// picked up with `try_recv` between polls. The loop yields to the runtime
    /// once per iteration, so a caller racing this future in `select!` gets
    /// its other branches polled.
    pub async fn run(mut self) -> io::Result<()> {
        let (mut rx, load) = self.start_load();

        let result = {
            let _guard = TerminalGuard::new()?;
            let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
            self.event_loop(&mut terminal, &mut rx).await
        };

        load.abort();
        self.session.unmount();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        rx: &mut mpsc::Receiver<LoadOutcome>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.tick = self.tick.wrapping_add(1);

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            self.drain_outcomes(rx);
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Apply every outcome waiting on `rx` without blocking.
    ///
    /// Returns how many outcomes were taken off the channel.
    fn drain_outcomes(&mut self, rx: &mut mpsc::Receiver<LoadOutcome>) -> usize {
        let mut taken = 0;
        // The channel carries one outcome; after that it reports
        // Disconnected, which just means there is nothing left to drain.
        loop {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.apply_outcome(outcome);
                    taken += 1;
                }
                Err(mpsc::error::TryRecvError::Empty)
                | Err(mpsc::error::TryRecvError::Disconnected) => break,
            }
        }
        taken
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Tab {
            self.focus = self.focus.next();
            return;
        }

        if self.focus.is_editing() {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.focus = InputFocus::None,
                KeyCode::Backspace => self.edit_focused(|value| {
                    value.pop();
                }),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.edit_focused(|value| value.push(c));
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('r') => self.session.reset_range(),
            KeyCode::Char('m') => {
                let measure = self.session.measure().toggled();
                self.session.set_measure(measure);
            }
            _ => {}
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let range = self.session.range();
        match self.focus {
            InputFocus::From => {
                let mut value = range.from.clone();
                edit(&mut value);
                self.session.set_from(value);
            }
            InputFocus::To => {
                let mut value = range.to.clone();
                edit(&mut value);
                self.session.set_to(value);
            }
            InputFocus::None => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Header::HEIGHT),
                Constraint::Length(1),
                Constraint::Length(FILTER_BAR_HEIGHT),
                Constraint::Min(8),
                Constraint::Length(PREVIEW_ROWS as u16 + 3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let analysis = self.session.analysis();
        let source = self.source.display().to_string();
        let header = Header::new(&source, analysis.measure.label(), &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), chunks[0]);

        frame.render_widget(Paragraph::new(self.status_line()), chunks[1]);

        render_filter_bar(
            frame,
            chunks[2],
            self.session.range(),
            self.focus,
            &analysis,
            &self.theme,
        );

        self.render_charts(frame, chunks[3], &analysis);
        self.render_preview(frame, chunks[4]);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(HELP, self.theme.dim))),
            chunks[5],
        );
    }

    fn status_line(&self) -> Line<'static> {
        let state = self.session.state();
        let label = state.status_label();
        match state {
            LoadState::Loading => Line::from(Span::styled(
                format!("{} {label}", SPINNER[self.tick % SPINNER.len()]),
                self.theme.info,
            )),
            LoadState::Ready(_) => Line::from(Span::styled(label, self.theme.success)),
            LoadState::Failed(_) => Line::from(Span::styled(label, self.theme.error)),
        }
    }

    fn render_charts(&self, frame: &mut Frame, area: Rect, analysis: &DashboardAnalysis) {
        match self.session.state() {
            state @ LoadState::Loading => {
                table_view::render_no_data(frame, area, &state.status_label(), &self.theme);
            }
            LoadState::Failed(msg) => {
                table_view::render_no_data(frame, area, msg, &self.theme);
            }
            LoadState::Ready(_) => {
                let halves = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(area);
                let label = analysis.measure.label();

                let line = ChartSpec::line(
                    format!("{label} over time"),
                    &analysis.over_time,
                    &self.theme,
                );
                self.charts.render(frame, halves[0], &line, &self.theme);

                let bar = ChartSpec::bar(
                    format!("{label} by category"),
                    &analysis.by_category,
                    &self.theme,
                );
                self.charts.render(frame, halves[1], &bar, &self.theme);
            }
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let preview = self.session.preview(PREVIEW_ROWS);
        match self.session.state() {
            LoadState::Ready(_) if !preview.is_empty() => {
                table_view::render_preview_table(frame, area, preview, &self.theme);
            }
            LoadState::Ready(_) => {
                table_view::render_no_data(frame, area, "No rows loaded", &self.theme);
            }
            state @ LoadState::Loading => {
                table_view::render_no_data(frame, area, &state.status_label(), &self.theme);
            }
            LoadState::Failed(_) => {
                table_view::render_no_data(frame, area, "No data", &self.theme);
            }
        }
    }
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_text;
    use dashboard_core::error::DashboardError;
    use dashboard_core::models::NormalizedRow;
    use ratatui::backend::TestBackend;
    use std::io::Write;

    fn app() -> App {
        App::new(
            "dark",
            PathBuf::from("data/sample.csv"),
            DateRange::default(),
            Measure::Amount,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn loaded_app() -> App {
        let mut app = app();
        let ticket = app.session.mount();
        app.session.complete_load(
            ticket,
            Ok(vec![
                NormalizedRow::new("2024-06-01", 100.0, "Toys", 2.0),
                NormalizedRow::new("2024-06-15", 40.0, "Games", 1.0),
                NormalizedRow::new("2024-07-01", 10.0, "Toys", 5.0),
            ]),
        );
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = app();
        assert_eq!(app.focus, InputFocus::None);
        assert!(!app.should_quit);
        assert_eq!(app.session.measure(), Measure::Amount);
        assert!(app.session.range().is_empty());
    }

    #[test]
    fn test_app_creation_unknown_theme_falls_back() {
        let app = App::new("neon", PathBuf::from("x.csv"), DateRange::default(), Measure::Units);
        assert_eq!(app.session.measure(), Measure::Units);
    }

    // ── keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_q_quits_when_unfocused() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.session.range().from.is_empty());
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, InputFocus::From);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, InputFocus::To);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, InputFocus::None);
    }

    #[test]
    fn test_typing_edits_focused_boundary() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2024-06-01");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2024-06-3x");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "0");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.focus, InputFocus::None);
        assert_eq!(app.session.range(), &DateRange::new("2024-06-01", "2024-06-30"));
    }

    #[test]
    fn test_letters_type_into_field_instead_of_commands() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "qrm");
        assert!(!app.should_quit);
        assert_eq!(app.session.range().from, "qrm");
        assert_eq!(app.session.measure(), Measure::Amount);
    }

    #[test]
    fn test_r_resets_and_m_toggles() {
        let mut app = app();
        app.session.set_from("2024-06-01");
        app.session.set_to("2024-06-30");
        press(&mut app, KeyCode::Char('r'));
        assert!(app.session.range().is_empty());

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.session.measure(), Measure::Units);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.session.measure(), Measure::Amount);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert!(!app.should_quit);
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_loading() {
        let mut app = app();
        app.session.mount();
        let text = draw(&app);
        assert!(text.contains("SALES DASHBOARD"));
        assert!(text.contains("Loading data..."));
        assert!(text.contains("Rows in range: 0 / 0"));
    }

    #[test]
    fn test_render_ready() {
        let mut app = loaded_app();
        app.session.set_from("2024-06-01");
        app.session.set_to("2024-06-30");
        let text = draw(&app);
        assert!(text.contains("Loaded 3 rows"));
        assert!(text.contains("Rows in range: 2 / 3"));
        assert!(text.contains("Sales over time"));
        assert!(text.contains("Sales by category"));
        assert!(text.contains("Preview (first 3 rows)"));
        // Preview ignores the range.
        assert!(text.contains("2024-07-01"));
    }

    #[test]
    fn test_render_ready_units_titles() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('m'));
        let text = draw(&app);
        assert!(text.contains("Units over time"));
        assert!(text.contains("Units by category"));
    }

    #[test]
    fn test_render_failed() {
        let mut app = app();
        let ticket = app.session.mount();
        app.session.complete_load(
            ticket,
            Err(DashboardError::CsvParse {
                line: 2,
                message: "source unavailable".to_string(),
            }),
        );
        let text = draw(&app);
        assert!(text.contains("Error: Failed to parse CSV at line 2: source unavailable"));
        assert!(!text.contains("over time"));
    }

    // ── loading ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_start_load_and_apply_outcome() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Date,Sales,Category,Units\n2024-01-01,5,A,1\n")
            .unwrap();

        let mut app = App::new(
            "dark",
            file.path().to_path_buf(),
            DateRange::default(),
            Measure::Amount,
        );
        let (mut rx, _handle) = app.start_load();
        assert!(app.session.state().is_loading());

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for load")
            .expect("channel closed before outcome");
        assert!(app.apply_outcome(outcome));
        assert_eq!(app.session.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_drain_outcomes_applies_load_then_stays_quiet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Date,Sales,Category,Units\n2024-01-01,5,A,1\n2024-01-02,3,B,2\n")
            .unwrap();

        let mut app = App::new(
            "dark",
            file.path().to_path_buf(),
            DateRange::default(),
            Measure::Amount,
        );
        let (mut rx, _handle) = app.start_load();

        let mut taken = 0;
        for _ in 0..200 {
            taken += app.drain_outcomes(&mut rx);
            if taken > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(taken, 1);
        assert_eq!(app.session.rows().len(), 2);

        // The sender is gone after its single outcome; draining again is a no-op.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(app.drain_outcomes(&mut rx), 0);
        assert_eq!(app.session.rows().len(), 2);
    }
}
