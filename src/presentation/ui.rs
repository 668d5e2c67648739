use crate::application::{App, PackageField, PackageForm, PersonField, PersonForm, QuoteView, Receipt, Step};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Number of steps shown in the header counter. Home is not counted.
const TOTAL_STEPS: usize = 5;

/// Draws the header, the current step and the status bar.
pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.step {
        Step::Home => "Postaqui Logística".to_string(),
        _ => format!(
            "Postaqui Logística | Step {}/{}: {}",
            app.step.index(),
            TOTAL_STEPS,
            app.step.title()
        ),
    };
    let header = Paragraph::new(text).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.step {
        Step::Home => home_lines(),
        Step::Sender(form) | Step::Receiver(form) => person_lines(form),
        Step::Package(form) => package_lines(form),
        Step::QuoteResult(view) => quote_lines(view),
        Step::Summary(receipt) => summary_lines(app, receipt),
    };

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(app.step.title()))
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn home_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Welcome to Postaqui Logística",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Quote and post a shipment in four steps:"),
        Line::from("  1. Sender information"),
        Line::from("  2. Receiver information"),
        Line::from("  3. Package information"),
        Line::from("  4. Freight quote and tracking code"),
        Line::from(""),
        Line::from("Press Enter to start."),
    ]
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label}: "), label_style),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("    {message}"),
        Style::default().fg(Color::Red),
    ))
}

fn person_lines(form: &PersonForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, field) in PersonField::ALL.iter().enumerate() {
        lines.push(field_line(
            field.label(),
            form.value(*field).to_string(),
            index == form.focus,
        ));
        if let Some(message) = form.error(*field) {
            lines.push(error_line(message));
        }
    }
    if form.lookup.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Looking up address...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn package_lines(form: &PackageForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, field) in PackageField::ALL.iter().enumerate() {
        let value = match form.flag(*field) {
            Some(true) => "[x]".to_string(),
            Some(false) => "[ ]".to_string(),
            None => form.text(*field).unwrap_or_default().to_string(),
        };
        lines.push(field_line(field.label(), value, index == form.focus));
        if let Some(message) = form.error(*field) {
            lines.push(error_line(message));
        }
    }

    lines.push(Line::from(""));
    if form.is_busy() {
        lines.push(Line::from(Span::styled(
            "Calculating...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(failure) = &form.failure {
        lines.push(Line::from(Span::styled(
            failure.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

fn quote_lines(view: &QuoteView) -> Vec<Line<'static>> {
    let freight = &view.freight;
    let mut lines = vec![
        field_line("Carrier", freight.carrier.clone(), false),
        field_line("Price", freight.price_label(), false),
        field_line("Deadline", freight.deadline_label(), false),
        Line::from(""),
    ];
    if view.is_busy() {
        lines.push(Line::from(Span::styled(
            "Generating code...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(failure) = &view.failure {
        lines.push(Line::from(Span::styled(
            failure.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from("Press Enter to post the shipment and get a tracking code."));
    }
    lines
}

fn summary_lines(app: &App, receipt: &Receipt) -> Vec<Line<'static>> {
    let description = app
        .store
        .package()
        .map(|p| p.declaration.description.clone())
        .unwrap_or_default();
    let freight = &receipt.freight;
    vec![
        field_line("Sender", app.store.sender().full_name.clone(), false),
        field_line("Receiver", app.store.receiver().full_name.clone(), false),
        field_line("Contents", description, false),
        field_line("Carrier", freight.carrier.clone(), false),
        field_line("Price", freight.price_label(), false),
        field_line("Deadline", freight.deadline_label(), false),
        Line::from(""),
        Line::from(vec![
            Span::styled("Tracking code: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                receipt.tracking_code.clone(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
    ]
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(ref status) = app.status_message {
        status.clone()
    } else {
        match app.step {
            Step::Home => "Enter: start | q: quit".to_string(),
            Step::Sender(_) | Step::Receiver(_) => {
                "Enter: next | Esc: back | Tab/↑↓: move | Ctrl+E: fill example | Ctrl+C: quit".to_string()
            }
            Step::Package(_) => {
                "Enter: calculate | Esc: back | Tab/↑↓: move | Space: toggle | Ctrl+E: fill example | Ctrl+C: quit"
                    .to_string()
            }
            Step::QuoteResult(_) => "Enter: post shipment | Esc: back | Ctrl+C: quit".to_string(),
            Step::Summary(_) => "c: copy tracking code | Enter/n: new shipment | q: quit".to_string(),
        }
    };

    let style = match app.step {
        Step::Summary(_) => Style::default().fg(Color::Green),
        Step::Package(ref form) if form.is_busy() => Style::default().fg(Color::Cyan),
        Step::QuoteResult(ref view) if view.is_busy() => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Completion;
    use crate::domain::ShipmentOffer;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_home_screen() {
        let screen = render(&App::default());
        assert!(screen.contains("Welcome to Postaqui Logística"));
        assert!(screen.contains("Enter: start"));
    }

    #[test]
    fn test_sender_errors_are_inline() {
        let mut app = App::default();
        app.start();
        app.submit();
        let screen = render(&app);
        assert!(screen.contains("Step 1/5: Sender information"));
        assert!(screen.contains("Full name is required"));
    }

    #[test]
    fn test_quote_screen_shows_price_and_deadline() {
        let mut app = App::default();
        app.start();
        app.fill_example();
        app.submit();
        app.fill_example();
        app.submit();
        app.fill_example();
        let Some(crate::application::Effect::Quote { ticket, .. }) = app.submit() else {
            panic!("expected a quote effect");
        };
        assert!(render(&app).contains("Calculating..."));

        app.apply(Completion::Quoted {
            ticket,
            outcome: Ok(vec![ShipmentOffer {
                id: "frete123".to_string(),
                carrier: "Correios Pac".to_string(),
                price: 42.5,
                discount: 0.0,
            }]),
        });

        let screen = render(&app);
        assert!(screen.contains("Correios Pac"));
        assert!(screen.contains("R$ 42.50"));
        assert!(screen.contains("5 business days"));
    }
}
