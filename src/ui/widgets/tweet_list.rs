use crate::feeds::Tweet;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// What the sentinel row shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Loading(usize),
    Error(String),
    More,
}

impl Footer {
    fn line(&self) -> Line<'static> {
        match self {
            Footer::Loading(tick) => Line::from(Span::styled(
                format!("{} loading tweets...", SPINNER[tick % SPINNER.len()]),
                Style::default().fg(Color::Magenta),
            )),
            Footer::Error(msg) => Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(msg.clone(), Style::default().fg(Color::Red)),
                Span::styled("  (r to retry)", Style::default().fg(Color::DarkGray)),
            ]),
            Footer::More => Line::from(Span::styled(
                "· scroll for more ·",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

/// Lays the feed out as terminal rows: a header, the wrapped text and a
/// blank separator per tweet.
pub fn layout_lines(tweets: &[Tweet], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for tweet in tweets {
        let author = if tweet.author.is_empty() {
            "anonymous"
        } else {
            tweet.author.as_str()
        };
        let mut header = vec![Span::styled(
            author.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if !tweet.timestamp.is_empty() {
            header.push(Span::styled(
                format!("  {}", tweet.timestamp),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));

        for paragraph in tweet.text.lines() {
            if paragraph.trim().is_empty() {
                lines.push(Line::from(""));
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, width) {
                lines.push(Line::from(Span::styled(
                    wrapped.into_owned(),
                    Style::default().fg(Color::White),
                )));
            }
        }

        lines.push(Line::from(""));
    }

    lines
}

pub struct TweetList<'a> {
    title: &'a str,
    lines: &'a [Line<'static>],
    offset: usize,
    footer: Footer,
    selected: bool,
}

impl<'a> TweetList<'a> {
    pub fn new(title: &'a str, lines: &'a [Line<'static>], offset: usize, footer: Footer) -> Self {
        Self {
            title,
            lines,
            offset,
            footer,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Rows visible in a window of `height` starting at `offset`, sentinel row included.
    pub fn visible_rows(&self, height: usize) -> Vec<Line<'static>> {
        let mut rows: Vec<Line<'static>> = self
            .lines
            .iter()
            .skip(self.offset)
            .take(height)
            .cloned()
            .collect();
        if rows.len() < height {
            rows.push(self.footer.line());
        }
        rows
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        let rows = self.visible_rows(inner.height as usize);
        frame.render_widget(Paragraph::new(rows).block(block), area);
    }
}
