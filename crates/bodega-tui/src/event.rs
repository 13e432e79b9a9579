//! Input for the dashboard loop: terminal input merged with two clocks.
//!
//! The tick clock drives toast expiry and spinner frames; the frame clock
//! asks the app to redraw. Both skip missed beats instead of bursting.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
    Render,
}

/// How often each clock fires.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub tick: Duration,
    pub frame: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            frame: Duration::from_millis(33),
        }
    }
}

/// Only key presses count; release and repeat reports from terminals with
/// the kitty protocol would double every keystroke.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn pump(tx: mpsc::UnboundedSender<Event>, cadence: Cadence, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut tick = clock(cadence.tick);
    let mut frame = clock(cadence.frame);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = tick.tick() => Event::Tick,
            _ = frame.tick() => Event::Render,
            raw = input.next() => match raw {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal input error");
                    continue;
                }
                None => return,
            },
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

/// Handle on the background input task. Dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(cadence: Cadence) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cadence, cancel.clone()));
        Self { rx, cancel }
    }

    /// `None` once the input task has ended.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEventState, KeyModifiers, MouseButton, MouseEventKind,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn only_key_presses_reach_the_app() {
        let press = key(KeyEventKind::Press);
        assert_eq!(translate(CrosstermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Repeat))), None);
    }

    #[test]
    fn mouse_and_resize_pass_through() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(CrosstermEvent::Mouse(mouse)), Some(Event::Mouse(mouse)));
        assert_eq!(translate(CrosstermEvent::Resize(120, 40)), Some(Event::Resize(120, 40)));
    }

    #[test]
    fn focus_and_paste_are_dropped() {
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
        assert_eq!(translate(CrosstermEvent::Paste("x".into())), None);
    }
}
