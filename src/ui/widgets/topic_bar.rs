use crate::topic::TopicInput;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct TopicBar<'a> {
    input: &'a TopicInput,
    current_topic: &'a str,
    selected: bool,
}

impl<'a> TopicBar<'a> {
    pub fn new(input: &'a TopicInput, current_topic: &'a str) -> Self {
        Self {
            input,
            current_topic,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let block = Block::default()
            .title(format!(" Topic: {} ", display_topic(self.current_topic)))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);

        let line = if self.input.text().is_empty() && !self.selected {
            Line::from(Span::styled(
                "press / to pick a topic",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.input.text())
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if self.selected {
            let x = inner.x + (self.input.cursor() as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}

/// Empty topics are legal; show them as quotes so the title is not blank.
pub fn display_topic(topic: &str) -> &str {
    if topic.is_empty() {
        "\"\""
    } else {
        topic
    }
}
