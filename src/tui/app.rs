//! Main TUI application state.
//!
//! One screen, mirroring a single-page form: the patient form on the left,
//! the prediction on the right. Scoring is synchronous; one logistic
//! evaluation is far below a frame.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use crate::application::RiskClassifier;
use crate::ports::RiskScorer;

use super::styles::MedicalTheme;
use super::ui::{
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Main application state
pub struct App<S>
where
    S: RiskScorer,
{
    should_quit: bool,

    classifier: RiskClassifier<S>,

    /// Human-readable origin of the thresholds, shown in the header
    threshold_source: String,

    form: PatientFormState,

    result: ResultState,
}

impl<S> App<S>
where
    S: RiskScorer,
{
    /// Create the application around a ready classifier.
    pub fn new(classifier: RiskClassifier<S>, threshold_source: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            classifier,
            threshold_source: threshold_source.into(),
            form: PatientFormState::default(),
            result: ResultState::Empty,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title bar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Disclaimer
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(" Diabetes Risk Prediction ", MedicalTheme::header()),
            Span::styled(
                format!(
                    " {} │ thresholds: {}",
                    self.classifier.scorer().describe(),
                    self.threshold_source
                ),
                MedicalTheme::text_muted(),
            ),
        ]));
        f.render_widget(title, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        render_patient_form(f, columns[0], &self.form);
        render_result(f, columns[1], &self.result, self.classifier.thresholds());
        render_disclaimer(f, rows[2]);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Enter => self.predict(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                self.result = ResultState::Empty;
            }
            // Any edit invalidates the shown prediction.
            KeyCode::Char(c) => {
                self.form.input_char(c);
                self.result = ResultState::Empty;
            }
            KeyCode::Backspace => {
                self.form.delete_char();
                self.result = ResultState::Empty;
            }
            KeyCode::Delete => {
                self.form.clear_field();
                self.result = ResultState::Empty;
            }
            _ => {}
        }
    }

    fn predict(&mut self) {
        let record = match self.form.to_record() {
            Ok(record) => record,
            Err(message) => {
                tracing::warn!("Form input rejected: {}", message);
                self.form.error_message = Some(message);
                self.result = ResultState::Empty;
                return;
            }
        };

        self.result = match self.classifier.assess(record) {
            Ok(assessment) => ResultState::Ready(assessment),
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                ResultState::Failed
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, PatientRecord, RiskTier, ScoringError, Thresholds};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn app_with(p: f64) -> App<impl Fn(&PatientRecord) -> Result<f64, ScoringError>> {
        let scorer = move |_: &PatientRecord| -> Result<f64, ScoringError> { Ok(p) };
        let thresholds = Thresholds::new(0.3, 0.7, Some(0.5)).expect("valid");
        App::new(RiskClassifier::new(Arc::new(scorer), thresholds), "test")
    }

    fn press(app: &mut App<impl RiskScorer>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn screen_text(app: &App<impl RiskScorer>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).expect("terminal");
        terminal.draw(|f| app.draw(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_enter_predicts() {
        let mut app = app_with(0.55);
        press(&mut app, KeyCode::Enter);

        let ResultState::Ready(assessment) = &app.result else {
            panic!("expected a prediction");
        };
        assert_eq!(assessment.result.tier(), RiskTier::Moderate);
        assert_eq!(assessment.result.decision(), Some(Decision::Positive));
        assert_eq!(assessment.record.glucose(), 120);
    }

    #[test]
    fn test_edit_clears_prediction() {
        let mut app = app_with(0.2);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.result, ResultState::Ready(_)));

        press(&mut app, KeyCode::Char('5'));
        assert!(matches!(app.result, ResultState::Empty));
    }

    #[test]
    fn test_invalid_form_shows_error_without_scoring() {
        let mut app = app_with(0.9);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.result, ResultState::Empty));
        let message = app.form.error_message.as_deref().expect("error shown");
        assert!(message.starts_with("Pregnancies:"));
    }

    #[test]
    fn test_scoring_failure_shows_notice_not_tier() {
        let scorer = |_: &PatientRecord| -> Result<f64, ScoringError> {
            Err(ScoringError::Model("broken".into()))
        };
        let mut app = App::new(
            RiskClassifier::new(Arc::new(scorer), Thresholds::default()),
            "test",
        );
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.result, ResultState::Failed));

        let text = screen_text(&app);
        assert!(text.contains("Prediction failed"));
        assert!(!text.contains("Risk Level"));
    }

    #[test]
    fn test_reset_and_quit_keys() {
        let mut app = app_with(0.1);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.form.fields[0].value, "1");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);

        let mut app = app_with(0.1);
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_result_panel_renders() {
        let mut app = app_with(0.85);
        press(&mut app, KeyCode::Enter);

        let text = screen_text(&app);
        assert!(text.contains("Risk Level: High"));
        assert!(text.contains("85.00%"));
        assert!(text.contains("Positive (1)"));
        assert!(text.contains("Built with Machine Learning"));
    }
}
