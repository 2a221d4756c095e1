//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{Map, Number, Value};

use crate::domain::{FieldKind, FieldSpec, PatientRecord, FIELD_SPECS};
use crate::tui::styles::MedicalTheme;

/// One input box bound to a field spec.
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub value: String,
}

impl FormField {
    fn new(spec: &'static FieldSpec) -> Self {
        Self {
            spec,
            value: default_text(spec),
        }
    }

    /// Parse and range-check the buffer into a JSON number of the right kind.
    fn parse(&self) -> Result<Value, String> {
        let label = self.spec.label;
        let value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| format!("{label}: Invalid number"))?;

        if !self.spec.contains(value) {
            return Err(format!(
                "{label}: Value must be between {} and {}",
                self.spec.min, self.spec.max
            ));
        }

        match self.spec.kind {
            FieldKind::Integer => {
                if value.fract() != 0.0 {
                    return Err(format!("{label}: Must be a whole number"));
                }
                Ok(Value::from(value as i64))
            }
            FieldKind::Float => Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| format!("{label}: Invalid number")),
        }
    }
}

fn default_text(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Integer => format!("{}", spec.default as i64),
        FieldKind::Float => format!("{:.1}", spec.default),
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self {
            fields: FIELD_SPECS.iter().map(FormField::new).collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl PatientFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.fields[self.selected_field].value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
        self.error_message = None;
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
        self.error_message = None;
    }

    /// Restore every field to its default value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate the form and build a record.
    ///
    /// Range bounding happens here; the record builder only checks presence
    /// and kind.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        let mut values = Map::new();
        for field in &self.fields {
            values.insert(field.spec.name.to_string(), field.parse()?);
        }

        PatientRecord::from_fields(&values).map_err(|e| e.to_string())
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Data", MedicalTheme::title()),
        Span::styled(" │ Pima Indians Diabetes Features", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.spec.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), MedicalTheme::text())
        };

        let mut spans = vec![Span::raw(" "), value_display];
        if is_selected {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
            if !field.value.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", field.spec.hint),
                    MedicalTheme::text_muted(),
                ));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.as_str(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
