//! Prediction result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::{Assessment, FieldKind, Thresholds, FIELD_SPECS};
use crate::tui::styles::MedicalTheme;

/// What the result panel shows.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing predicted since the last edit
    #[default]
    Empty,
    Ready(Assessment),
    /// Scoring failed; details go to the log only
    Failed,
}

/// Render the result panel
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState, thresholds: &Thresholds) {
    match state {
        ResultState::Empty => render_empty(f, area),
        ResultState::Ready(assessment) => render_assessment(f, area, assessment, thresholds),
        ResultState::Failed => render_failed(f, area),
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No prediction yet",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", MedicalTheme::text_muted()),
            Span::styled("[Enter]", MedicalTheme::key_hint()),
            Span::styled(" to predict", MedicalTheme::text_muted()),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment, thresholds: &Thresholds) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tier + probability
            Constraint::Length(3), // Gauge
            Constraint::Length(3), // Advice + decision
            Constraint::Min(0),    // Record echo
        ])
        .margin(1)
        .split(inner);

    let result = &assessment.result;
    let tier_style = MedicalTheme::risk_tier(result.tier());

    let headline = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Risk Level: ", MedicalTheme::text_secondary()),
            Span::styled(result.tier().label(), tier_style.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Probability of Diabetes: ", MedicalTheme::text_secondary()),
            Span::styled(result.percent(), MedicalTheme::title()),
        ]),
    ]);
    f.render_widget(headline, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(tier_style)
        .ratio(result.probability())
        .label(result.percent());
    f.render_widget(gauge, chunks[1]);

    let mut advice = vec![Line::from(Span::styled(result.message(), tier_style))];
    if let (Some(decision), Some(cutoff)) = (result.decision(), thresholds.cutoff()) {
        advice.push(Line::from(vec![
            Span::styled("Decision: ", MedicalTheme::text_secondary()),
            Span::styled(decision.to_string(), MedicalTheme::text()),
            Span::styled(format!(" at cutoff {cutoff:.2}"), MedicalTheme::text_muted()),
        ]));
    }
    f.render_widget(Paragraph::new(advice), chunks[2]);

    let mut echo = vec![Line::from(Span::styled(
        "Submitted values",
        MedicalTheme::text_secondary(),
    ))];
    echo.extend(
        FIELD_SPECS
            .iter()
            .zip(assessment.record.iter())
            .map(|(spec, (_, value))| {
                let shown = match spec.kind {
                    FieldKind::Integer => format!("{value:.0}"),
                    FieldKind::Float => format!("{value}"),
                };
                Line::from(vec![
                    Span::styled(format!("  {:<28}", spec.label), MedicalTheme::text_muted()),
                    Span::styled(shown, MedicalTheme::text()),
                ])
            }),
    );
    f.render_widget(Paragraph::new(echo), chunks[3]);
}

fn render_failed(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(
            "The model could not score this record. See the log for details.",
            MedicalTheme::text(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}
