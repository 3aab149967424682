use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use tracing::{debug, warn};

use crate::engine::input::{Direction, Input};
use crate::error::{Error, Result};

/// How long the reader thread blocks on the terminal before rechecking its channel.
const READ_POLL: Duration = Duration::from_millis(50);

pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            match event::poll(READ_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    warn!(error = %err, "terminal poll failed");
                    return;
                }
            }
            let forwarded = match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                Ok(event::Event::Mouse(mouse)) => Event::Mouse(mouse),
                Ok(event::Event::Resize(..)) => Event::Resize,
                Ok(_) => continue,
                Err(err) => {
                    warn!(error = %err, "terminal read failed");
                    return;
                }
            };
            if tx.send(forwarded).is_err() {
                debug!("event receiver dropped");
                return;
            }
        });

        Self { rx }
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means the wait elapsed.
    pub fn next(&self, timeout: Duration) -> Result<Option<Event>> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::EventChannel),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an in-game key press to a game input.
pub fn translate_key(key: KeyEvent) -> Option<Input> {
    let input = match key.code {
        KeyCode::Up => Input::Arrow(Direction::Up),
        KeyCode::Down => Input::Arrow(Direction::Down),
        KeyCode::Left => Input::Arrow(Direction::Left),
        KeyCode::Right => Input::Arrow(Direction::Right),
        KeyCode::Enter => Input::Confirm,
        KeyCode::Backspace => Input::Cancel,
        KeyCode::Char(' ') => Input::Toggle,
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Reset,
        KeyCode::Char('d') | KeyCode::Char('D') => Input::Cycle,
        KeyCode::Char(c) => Input::Select(c.to_digit(10)? as u8),
        _ => return None,
    };
    Some(input)
}
