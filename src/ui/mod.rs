pub mod widgets;

use crate::app::{App, Focus};
use crate::config::Environment;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widgets::tweet_list::layout_lines;
use widgets::{Footer, TopicBar, TweetList};

/// Draws one frame and updates the viewport geometry to match it.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    TopicBar::new(&app.input, app.session.topic())
        .selected(app.focus == Focus::Topic)
        .render(frame, chunks[0]);

    let feed_area = chunks[1];
    let inner_width = feed_area.width.saturating_sub(2) as usize;
    let inner_height = feed_area.height.saturating_sub(2) as usize;

    let lines = layout_lines(app.session.tweets(), inner_width);
    app.viewport.set_height(inner_height);
    app.viewport.set_content_len(lines.len());

    let footer = if app.session.is_loading() {
        Footer::Loading(app.spinner)
    } else if let Some(err) = app.session.last_error() {
        Footer::Error(err.to_string())
    } else {
        Footer::More
    };

    let title = format!("Tweets ({})", app.session.tweets().len());
    TweetList::new(&title, &lines, app.viewport.offset(), footer)
        .selected(app.focus == Focus::Feed)
        .render(frame, feed_area);

    render_status(frame, chunks[2], app);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let env = match app.options.environment {
        Environment::Development => "dev",
        Environment::Production => "prod",
    };
    let hints = match app.focus {
        Focus::Topic => "Enter submit | Esc back | Ctrl-U clear",
        Focus::Feed => "/ topic | j/k scroll | PgUp/PgDn | g/G top/bottom | r retry | q quit",
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", env), Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            format!(" page {} ", app.session.cursor()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
