use crate::app::{App, Field};
use crate::recommendations::recommendation_lines;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plans4you_client::RecommendationSource;
use plans4you_core::Payload;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

const TITLE: &str = "Plans4You - A Healthcare AI Assistant";
const DESCRIPTION: &str = "Please fill out the form below with your information. Our AI will provide personalized healthcare plan recommendations.";
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct InteractiveApp {
    app: App,
    source: Arc<dyn RecommendationSource>,
    tick: usize,
}

impl InteractiveApp {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            app: App::new(),
            source,
            tick: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<(String, Payload)>(8);
        let mut tick_interval = interval(Duration::from_millis(120));

        while self.app.running {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Some((id, payload)) = rx.recv() => {
                    self.app.apply_response(&id, payload);
                }
                event_result = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                    if let Ok(Ok(true)) = event_result {
                        if let Event::Key(key) = event::read()? {
                            if key.kind == KeyEventKind::Press {
                                if let Some(submission) = self.app.handle_key(key) {
                                    let source = Arc::clone(&self.source);
                                    let tx = tx.clone();
                                    tokio::spawn(async move {
                                        let payload = source.fetch(&submission.form).await;
                                        if tx.send((submission.id, payload)).await.is_err() {
                                            tracing::debug!("ui closed before response arrived");
                                        }
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let size = f.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(Field::ALL.len() as u16 + 2),
                Constraint::Length(2),
                Constraint::Min(3),
            ])
            .split(size);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(DESCRIPTION),
        ])
        .wrap(Wrap { trim: true });
        f.render_widget(header, chunks[0]);

        let form_lines: Vec<Line> = Field::ALL
            .iter()
            .map(|field| {
                let focused = *field == self.app.focused();
                let marker = if focused { "> " } else { "  " };
                let label_style = if focused {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<34}", field.label()), label_style),
                    Span::raw(self.app.value(*field)),
                ])
            })
            .collect();
        let form = Paragraph::new(form_lines).block(
            Block::default()
                .title("Your information (Enter to submit, Ctrl+Q to quit)")
                .borders(Borders::ALL),
        );
        f.render_widget(form, chunks[1]);

        let mut status_lines = Vec::new();
        if let Some(status) = self.app.status() {
            status_lines.push(Line::from(Span::styled(
                status.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
        if let Some(household) = self.app.household() {
            status_lines.push(Line::from(household.to_string()));
        }
        f.render_widget(Paragraph::new(status_lines), chunks[2]);

        let results = Paragraph::new(recommendation_lines(&self.app.view()))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        f.render_widget(results, chunks[3]);

        if self.app.is_busy() {
            self.draw_loading(f, size);
        }
    }

    fn draw_loading(&self, f: &mut Frame, area: Rect) {
        let popup = centered(area, 40, 5);
        let spinner = SPINNER[self.tick % SPINNER.len()];
        let text = vec![
            Line::from(Span::styled(
                "Plans4You",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{spinner} Generating recommendations...")),
        ];
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            popup,
        );
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
