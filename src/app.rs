use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

use crate::ai::{self, CommentClient};
use crate::config::AppConfig;
use crate::roulette::wheel::{Phase, Wheel};
use crate::roulette::{self, Entry, RouletteResult, MIN_ENTRIES};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Textarea for the restaurant list
    Input,
    /// The spinning wheel
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Result,
    Help,
}

pub struct App {
    pub view: View,
    pub popup: Popup,

    // Input view: the raw textarea contents
    pub input_text: String,

    // Parsed list, rebuilt wholesale on every edit
    pub entries: Vec<Entry>,
    palette: Vec<ratatui::style::Color>,

    // Wheel animation state
    pub wheel: Wheel,

    // Outcome of the last completed spin (discarded on re-spin or edit)
    pub result: Option<RouletteResult>,
    pub comment_loading: bool,
    comment_rx: Option<oneshot::Receiver<String>>,
    comment_client: Option<Arc<CommentClient>>,

    // Config
    pub config: AppConfig,

    // Whether edits mirror back into the saved config. Off when the list
    // came from somewhere else (a --list file), so a session list never
    // clobbers the saved one.
    persist_list: bool,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub should_quit: bool,
}

impl App {
    /// `session_list` overrides the saved list for this run without ever
    /// being written back to it.
    pub fn new(config: AppConfig, session_list: Option<String>, no_comment: bool) -> Self {
        let palette = theme::wheel_palette(&config.palette);
        let persist_list = session_list.is_none();
        let input_text = session_list.unwrap_or_else(|| config.saved_list.clone());
        let entries = roulette::parse_entries(&input_text, &palette);

        let mut app = Self {
            view: View::Input,
            popup: Popup::None,

            input_text,
            entries,
            palette,

            wheel: Wheel::new(),

            result: None,
            comment_loading: false,
            comment_rx: None,
            comment_client: None,

            config,

            persist_list,

            status_message: None,
            status_message_time: None,

            should_quit: false,
        };

        if app.config.comments_enabled && !no_comment {
            match CommentClient::from_env(app.config.model.clone()) {
                Ok(client) => app.comment_client = Some(Arc::new(client)),
                Err(e) => {
                    tracing::info!("AI comments disabled: {}", e);
                    app.set_status("AI comments off (set GEMINI_API_KEY to enable)");
                }
            }
        }

        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match self.view {
            View::Input => self.handle_input_key(key),
            View::Wheel => self.handle_wheel_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.start_roulette(),
            KeyCode::Enter => {
                self.input_text.push('\n');
                self.sync_list();
            }
            KeyCode::Backspace => {
                self.input_text.pop();
                self.sync_list();
            }
            KeyCode::Char(c) => {
                self.input_text.push(c);
                self.sync_list();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_wheel_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            // STOP: only honored while free-spinning
            KeyCode::Char(' ') | KeyCode::Enter => self.stop_wheel(),
            // Spin again after a finished round
            KeyCode::Char('r') => {
                if self.wheel.phase() == Phase::Idle {
                    self.spin_again();
                }
            }
            // Back to the list
            KeyCode::Char('e') | KeyCode::Esc => {
                if self.wheel.phase() != Phase::Stopping {
                    self.edit_list();
                }
            }
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,
            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Result => {
                match key.code {
                    KeyCode::Char('q') => self.should_quit = true,
                    KeyCode::Char('r') | KeyCode::Enter | KeyCode::Esc => {
                        self.popup = Popup::None;
                        self.spin_again();
                    }
                    KeyCode::Char('e') => {
                        self.popup = Popup::None;
                        self.edit_list();
                    }
                    _ => {}
                }
                Ok(())
            }
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::None => Ok(()),
        }
    }

    /// Re-parse entries and, when the list is the saved one, mirror the edit
    /// to disk the way the original mirrored the textarea into local
    /// storage. Session lists stay in memory.
    fn sync_list(&mut self) {
        self.entries = roulette::parse_entries(&self.input_text, &self.palette);
        if self.persist_list {
            self.config.saved_list = self.input_text.clone();
            if let Err(e) = self.config.save() {
                tracing::warn!("Failed to save list: {}", e);
            }
        }
    }

    /// Move to the wheel view and start free-spinning. Refused below two
    /// entries.
    fn start_roulette(&mut self) {
        if self.entries.len() < MIN_ENTRIES {
            self.set_status("Enter at least two restaurants first");
            return;
        }
        self.discard_result();
        self.wheel = Wheel::new();
        self.view = View::Wheel;
    }

    /// STOP pressed: roll the winner uniformly at random, now, and hand the
    /// wheel its landing target.
    fn stop_wheel(&mut self) {
        if self.wheel.phase() != Phase::Spinning {
            return;
        }
        use rand::Rng;
        let winner = rand::rng().random_range(0..self.entries.len());
        self.wheel.begin_stop(winner, self.entries.len(), Instant::now());
    }

    fn spin_again(&mut self) {
        self.discard_result();
        self.wheel.reset(Instant::now());
    }

    fn edit_list(&mut self) {
        self.discard_result();
        self.view = View::Input;
    }

    fn discard_result(&mut self) {
        self.result = None;
        self.comment_loading = false;
        self.comment_rx = None;
    }

    /// The wheel has landed: record the result, pop the result card, fire
    /// the notification, and kick off the comment fetch in the background.
    fn on_winner(&mut self, index: usize) {
        let Some(winner) = self.entries.get(index).cloned() else {
            return;
        };

        tracing::info!("winner: {}", winner.name);

        if self.config.notifications {
            notify_winner(&winner.name);
        }

        self.result = Some(RouletteResult { winner: winner.clone(), comment: None });
        self.popup = Popup::Result;

        if let Some(client) = self.comment_client.clone() {
            let (tx, rx) = oneshot::channel();
            self.comment_rx = Some(rx);
            self.comment_loading = true;
            tokio::spawn(async move {
                let comment = client.lunch_comment(&winner.name).await;
                let _ = tx.send(comment);
            });
        }
    }

    pub fn tick(&mut self) {
        // Advance the wheel animation
        if let Some(winner) = self.wheel.tick(Instant::now()) {
            self.on_winner(winner);
        }

        // Clear status message after 3 seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Drain the comment channel without blocking the draw loop
        if let Some(rx) = self.comment_rx.as_mut() {
            match rx.try_recv() {
                Ok(comment) => {
                    if let Some(result) = self.result.as_mut() {
                        result.comment = Some(comment);
                    }
                    self.comment_loading = false;
                    self.comment_rx = None;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    // Fetch task died; fall back rather than spin forever
                    if let Some(result) = self.result.as_mut() {
                        result.comment = Some(ai::FALLBACK_COMMENT.to_string());
                    }
                    self.comment_loading = false;
                    self.comment_rx = None;
                }
            }
        }
    }
}

fn notify_winner(name: &str) {
    let _ = notify_rust::Notification::new()
        .summary("ruretto")
        .body(&format!("Today's pick: {}", name))
        .icon("applications-dining")
        .show();
}
