// ── Debounced commits ──
//
// Each push cancels the pending commit and schedules a new one after the
// delay. Only a value that survives a full quiet interval is delivered.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Quiet interval before a search box commits its text.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Delays values and delivers only the last of each burst.
///
/// Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<CancellationToken>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// A debouncer with its own output channel.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_sender(delay, tx), rx)
    }

    /// A debouncer that delivers into an existing channel.
    pub fn with_sender(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    /// Replace any pending value with `value` and restart the timer.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancelled.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let _ = tx.send(value);
                }
            }
        });
        self.pending = Some(token);
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

/// Search text as a filter value: trimmed, empty meaning no filter.
pub fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn settle() {
        // Let spawned timer tasks observe the advanced clock.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_commits_only_last_value() {
        let (mut debouncer, mut rx) = Debouncer::new(SEARCH_DEBOUNCE);

        for text in ["e", "el", "ele", "elec"] {
            debouncer.push(text.to_owned());
            settle().await;
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        tokio::time::advance(SEARCH_DEBOUNCE).await;
        settle().await;

        assert_eq!(rx.try_recv().unwrap(), "elec");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_keystrokes_each_commit() {
        let (mut debouncer, mut rx) = Debouncer::new(SEARCH_DEBOUNCE);

        debouncer.push("a".to_owned());
        settle().await;
        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;

        debouncer.push("ab".to_owned());
        settle().await;
        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;

        assert_eq!(rx.try_recv().unwrap(), "a");
        assert_eq!(rx.try_recv().unwrap(), "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (mut debouncer, mut rx) = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push(1_u32);
        settle().await;
        debouncer.cancel();
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn search_text_normalizes_blank_to_none() {
        assert_eq!(normalize_search("   "), None);
        assert_eq!(normalize_search(" elec "), Some("elec".into()));
    }
}
