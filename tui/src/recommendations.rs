use plans4you_core::presenter::RenderedView;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Styled lines for a rendered view. Empty for [`RenderedView::Nothing`].
pub fn recommendation_lines(view: &RenderedView) -> Vec<Line<'static>> {
    let heading_style = Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD);

    match view {
        RenderedView::Nothing => Vec::new(),
        RenderedView::Notice { heading, message } => vec![
            Line::from(Span::styled(*heading, heading_style)),
            Line::from(message.clone()),
        ],
        RenderedView::NoRecommendations { message } => vec![Line::from(Span::styled(
            *message,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))],
        RenderedView::Cards {
            heading,
            subheading,
            cards,
            key_collisions,
        } => {
            let mut lines = Vec::with_capacity(cards.len() * 3 + 4);
            lines.push(Line::from(Span::styled(*heading, heading_style)));
            lines.push(Line::from(Span::styled(
                *subheading,
                Style::default().fg(Color::Blue),
            )));
            lines.push(Line::default());

            for card in cards {
                let mut header = Vec::with_capacity(4);
                if let Some(badge) = card.badge {
                    header.push(Span::styled(
                        format!(" {badge} "),
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ));
                    header.push(Span::raw(" "));
                }
                header.push(Span::styled(
                    card.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                header.push(Span::styled(
                    format!("  [{}]", card.rank_label),
                    Style::default().fg(Color::DarkGray),
                ));
                lines.push(Line::from(header));
                if !card.justification.is_empty() {
                    lines.push(Line::from(format!("  {}", card.justification)));
                }
                lines.push(Line::default());
            }

            if !key_collisions.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("Duplicate plan ids: {}", key_collisions.join(", ")),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        }
    }
}

/// Flatten styled lines into plain text, one line per row.
pub fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
