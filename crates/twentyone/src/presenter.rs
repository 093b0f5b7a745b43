//! Where snapshots go after every applied change.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use twentyone_state::MatchState;

/// An immutable view of the match, cheap to clone and share.
pub type Snapshot = Arc<MatchState>;

/// Receives a snapshot each time the match state changes.
///
/// Called on the client task, so implementations should hand the snapshot
/// off rather than render inline.
pub trait Presenter: Send + 'static {
    fn present(&mut self, snapshot: Snapshot);
}

/// Queues every snapshot. Useful when each intermediate state matters
/// (tests, logs).
impl Presenter for mpsc::UnboundedSender<Snapshot> {
    fn present(&mut self, snapshot: Snapshot) {
        if self.send(snapshot).is_err() {
            tracing::trace!("snapshot receiver dropped");
        }
    }
}

/// Keeps only the latest snapshot. Suits a render loop that redraws at
/// its own pace.
impl Presenter for watch::Sender<Snapshot> {
    fn present(&mut self, snapshot: Snapshot) {
        self.send_replace(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpsc_presenter_queues_every_snapshot() {
        let (mut tx, mut rx) = mpsc::unbounded_channel::<Snapshot>();
        tx.present(Arc::new(MatchState::default()));
        tx.present(Arc::new(MatchState::new(3)));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mpsc_presenter_tolerates_dropped_receiver() {
        let (mut tx, rx) = mpsc::unbounded_channel::<Snapshot>();
        drop(rx);
        tx.present(Arc::new(MatchState::default()));
    }

    #[test]
    fn test_watch_presenter_keeps_latest() {
        let (mut tx, rx) = watch::channel(Arc::new(MatchState::default()));
        let mut latest = MatchState::default();
        latest.set_status("Connected");
        tx.present(Arc::new(latest));
        assert_eq!(rx.borrow().status(), "Connected");
    }
}
