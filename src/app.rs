use crate::config::Environment;
use crate::feeds::TweetSource;
use crate::loader::{spawn_load, LoadOutcome};
use crate::sentinel::{ListViewport, Sentinel, Subscription, ViewportObserver};
use crate::session::{Applied, FeedSession, LoadRequest};
use crate::topic::TopicInput;
use crate::ui;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Feed,
    Topic,
}

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub topic: String,
    pub timeout: Duration,
    pub prefetch_rows: usize,
    pub environment: Environment,
    pub base_url: String,
}

pub struct App {
    pub(crate) session: FeedSession,
    pub(crate) input: TopicInput,
    pub(crate) focus: Focus,
    pub(crate) viewport: ListViewport,
    pub(crate) spinner: usize,
    pub(crate) options: AppOptions,
    subscription: Option<Subscription>,
    sentinel: Sentinel,
    source: Arc<dyn TweetSource>,
    tx: UnboundedSender<LoadOutcome>,
    rx: UnboundedReceiver<LoadOutcome>,
    running: bool,
}

impl App {
    pub fn new(options: AppOptions, source: Arc<dyn TweetSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: FeedSession::new(options.topic.clone()),
            input: TopicInput::new(),
            focus: Focus::Feed,
            viewport: ListViewport::new(),
            spinner: 0,
            sentinel: Sentinel {
                lead: options.prefetch_rows,
            },
            options,
            subscription: None,
            source,
            tx,
            rx,
            running: true,
        }
    }

    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(
            environment = ?self.options.environment,
            base_url = %self.options.base_url,
            topic = %self.session.topic(),
            "starting feed"
        );

        self.arm_sentinel();
        let initial = self.session.next_request();
        self.start(initial);

        let mut events = EventStream::new();
        let mut spinner = tokio::time::interval(SPINNER_INTERVAL);

        while self.running {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Layout may have moved the sentinel into view; redraw straight away.
            if self.poll_sentinel() {
                continue;
            }

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(outcome) = self.rx.recv() => self.handle_outcome(outcome),
                _ = spinner.tick(), if self.session.is_loading() => {
                    self.spinner = self.spinner.wrapping_add(1);
                }
            }
        }

        info!("feed closed");
        Ok(())
    }

    fn start(&self, request: Option<LoadRequest>) {
        if let Some(request) = request {
            spawn_load(
                Arc::clone(&self.source),
                request,
                self.options.timeout,
                self.tx.clone(),
            );
        }
    }

    /// Replaces the sentinel observation. A fresh observation reports a
    /// sentinel that is already on screen.
    fn arm_sentinel(&mut self) {
        self.subscription = None;
        self.subscription = Some(self.viewport.observe(self.sentinel));
    }

    /// Forwards a sentinel transition to the session. Returns whether a load started.
    pub(crate) fn poll_sentinel(&mut self) -> bool {
        if !self.viewport.sync() {
            return false;
        }
        let request = self.session.on_visible();
        let started = request.is_some();
        self.start(request);
        started
    }

    pub(crate) fn handle_outcome(&mut self, outcome: LoadOutcome) {
        let done = self.session.complete(&outcome.request, outcome.result);
        match done.applied {
            Applied::Appended(n) if n > 0 => self.arm_sentinel(),
            Applied::Stale => self.arm_sentinel(),
            // Failures and empty pages keep the old observation: the sentinel
            // has to re-enter view, or the user asks for it with `r`.
            Applied::Appended(_) | Applied::Failed => {}
        }
        self.start(done.next);
    }

    pub(crate) fn submit_topic(&mut self) {
        let topic = self.input.submit();
        let request = self.session.submit_topic(topic);
        self.viewport.scroll_to_top();
        self.arm_sentinel();
        self.focus = Focus::Feed;
        self.start(request);
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match self.focus {
            Focus::Topic => self.handle_topic_key(key),
            Focus::Feed => self.handle_feed_key(key),
        }
    }

    fn handle_topic_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_topic(),
            KeyCode::Esc => self.focus = Focus::Feed,
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert(c)
            }
            _ => {}
        }
    }

    fn handle_feed_key(&mut self, key: KeyEvent) {
        let page = self.viewport.height().max(1) as isize;
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('/') | KeyCode::Char('i') => self.focus = Focus::Topic,
            KeyCode::Char('j') | KeyCode::Down => self.viewport.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.viewport.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.viewport.scroll_by(page),
            KeyCode::PageUp => self.viewport.scroll_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.viewport.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.viewport.scroll_to_bottom(),
            KeyCode::Char('r') => self.arm_sentinel(),
            _ => {}
        }
    }
}
