//! Event routing: frames, intents and countdown steps in, state changes
//! and commands out.
//!
//! The router is synchronous. It never touches the socket; the client loop
//! sends whatever commands a [`Dispatch`] carries and presents a snapshot
//! when it reports a change.

use std::sync::Arc;

use twentyone_countdown::{Countdown, CountdownEvent};
use twentyone_protocol::{Codec, Command, JsonCodec, ServerEvent};
use twentyone_state::{MatchState, Phase, status};
use twentyone_transport::TransportError;

use crate::{ClientConfig, ClientError, CommandEncoder, Intent, Snapshot};

/// What handling one input produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The state changed; the presenter should get a new snapshot.
    pub changed: bool,
    /// Commands to send, in order.
    pub commands: Vec<Command>,
}

impl Dispatch {
    fn changed() -> Self {
        Self {
            changed: true,
            commands: Vec::new(),
        }
    }

    fn send(command: Command) -> Self {
        Self {
            changed: false,
            commands: vec![command],
        }
    }

    fn changed_and_send(command: Command) -> Self {
        Self {
            changed: true,
            commands: vec![command],
        }
    }
}

/// Owns the match state and the disconnect countdown.
///
/// The state sits behind an `Arc` so snapshots are free to hand out;
/// `Arc::make_mut` copies it only while a presenter still holds the
/// previous one.
pub struct EventRouter<C: Codec = JsonCodec> {
    state: Arc<MatchState>,
    countdown: Countdown,
    encoder: CommandEncoder<C>,
}

impl EventRouter<JsonCodec> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_encoder(config, CommandEncoder::new(config.player_name.clone()))
    }
}

impl<C: Codec> EventRouter<C> {
    pub fn with_encoder(config: &ClientConfig, encoder: CommandEncoder<C>) -> Self {
        let countdown = Countdown::new(config.countdown.clone());
        let state = MatchState::new(countdown.config().start_from);
        Self {
            state: Arc::new(state),
            countdown,
            encoder,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state)
    }

    pub fn encoder(&self) -> &CommandEncoder<C> {
        &self.encoder
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Waits for the next countdown step. Pends while no countdown runs.
    pub async fn next_countdown_event(&mut self) -> CountdownEvent {
        self.countdown.wait_for_tick().await
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    /// The connection is open: ask for the lobby right away.
    pub fn on_open(&mut self) -> Dispatch {
        let changed = self.transition(|s| s.set_status(status::CONNECTED));
        Dispatch {
            changed,
            commands: vec![Command::GetRooms],
        }
    }

    /// The server closed the connection, or we did.
    pub fn on_closed(&mut self) -> Dispatch {
        self.transition(|s| s.reset(status::DISCONNECTED));
        Dispatch::changed()
    }

    /// Receiving failed; the connection is unusable.
    pub fn on_transport_error(&mut self, err: &TransportError) -> Dispatch {
        self.transition(|s| s.reset(format!("Connection error: {err}")));
        Dispatch::changed()
    }

    /// A fire-and-forget send failed. The connection stays up.
    pub fn on_send_failed(&mut self, err: &TransportError) -> Dispatch {
        let changed = self.transition(|s| s.set_status(format!("Send failed: {err}")));
        Dispatch {
            changed,
            commands: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Inbound frames
    // -----------------------------------------------------------------------

    /// Decodes and applies one frame.
    ///
    /// # Errors
    /// `ClientError::Protocol` for a malformed frame and `ClientError::State`
    /// for an event the current state rejects. The state is unchanged in
    /// both cases.
    pub fn on_frame(&mut self, text: &str) -> Result<Dispatch, ClientError> {
        let event: ServerEvent = self.encoder.codec().decode(text)?;
        self.on_event(event)
    }

    /// Applies one decoded event.
    pub fn on_event(&mut self, event: ServerEvent) -> Result<Dispatch, ClientError> {
        if matches!(event, ServerEvent::Unknown) {
            tracing::debug!("ignoring unknown event type");
            return Ok(Dispatch::default());
        }

        let kind = event.kind();
        self.transition(|s| s.apply(event))?;
        tracing::debug!(event = kind, phase = %self.state.phase(), "event applied");
        Ok(Dispatch::changed())
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    pub fn on_countdown(&mut self, event: CountdownEvent) -> Dispatch {
        match event {
            CountdownEvent::Tick { remaining } => Dispatch {
                changed: self.transition(|s| s.set_countdown(remaining)),
                commands: Vec::new(),
            },
            CountdownEvent::Expired if self.state.round_over() => {
                tracing::info!("countdown expired, leaving room");
                self.transition(|s| s.reset(status::DISCONNECTED));
                Dispatch::changed_and_send(Command::LeaveRoom)
            }
            CountdownEvent::Expired => {
                tracing::debug!(phase = %self.state.phase(), "stale countdown expiry ignored");
                Dispatch::default()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Applies the local side of an intent and returns what to send.
    ///
    /// `Intent::Disconnect` is handled by the client loop and yields nothing
    /// here.
    pub fn on_intent(&mut self, intent: Intent) -> Dispatch {
        let Some(command) = self.encoder.command(&intent, self.state.player_id()) else {
            return Dispatch::default();
        };

        match intent {
            Intent::Rematch => match self.transition(MatchState::begin_rematch) {
                Ok(()) => Dispatch::changed_and_send(command),
                Err(err) => {
                    tracing::warn!(error = %err, "rematch ignored");
                    Dispatch::default()
                }
            },
            Intent::LeaveRoom => {
                self.transition(|s| s.reset(status::LEFT_ROOM));
                Dispatch::changed_and_send(command)
            }
            _ => Dispatch::send(command),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Runs one mutation and keeps the countdown in step with the phase:
    /// entering `RoundOver` starts it, leaving `RoundOver` cancels it.
    fn transition<T>(&mut self, f: impl FnOnce(&mut MatchState) -> T) -> T {
        let before = self.state.phase();
        let out = f(Arc::make_mut(&mut self.state));
        let after = self.state.phase();

        match (before, after) {
            (Phase::RoundOver, Phase::RoundOver) => {}
            (_, Phase::RoundOver) => {
                self.countdown.start();
            }
            (Phase::RoundOver, _) => {
                self.countdown.cancel();
            }
            _ => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use twentyone_protocol::{PlayerId, RoomId};

    use super::*;

    const WELCOME: &str = r#"{"type":"welcome","playerId":5}"#;
    const ROUND_START: &str = r#"{"type":"round_start","yourHand":["1","7"],"opponentCardHand":["2"],"yourValue":8,"currentTurnPlayerId":5}"#;
    const ROUND_END: &str = r#"{"type":"round_end","health":{"you":6,"opponent":7},"winnerId":-1}"#;

    fn router() -> EventRouter {
        EventRouter::new(&ClientConfig::default())
    }

    fn round_over() -> EventRouter {
        let mut r = router();
        r.on_frame(WELCOME).unwrap();
        r.on_frame(ROUND_START).unwrap();
        r.on_frame(ROUND_END).unwrap();
        r
    }

    #[test]
    fn test_open_requests_rooms() {
        let mut r = router();
        let d = r.on_open();
        assert!(d.changed);
        assert_eq!(d.commands, vec![Command::GetRooms]);
        assert_eq!(r.state().status(), "Connected");
    }

    #[test]
    fn test_malformed_frame_is_protocol_error() {
        let mut r = router();
        let before = r.snapshot();
        let err = r.on_frame("{not json").unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert_eq!(*r.snapshot(), *before);
    }

    #[test]
    fn test_missing_required_field_is_protocol_error() {
        let mut r = router();
        let err = r.on_frame(r#"{"type":"round_end","winnerId":5}"#).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let mut r = router();
        let d = r.on_frame(r#"{"type":"emote","id":3}"#).unwrap();
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn test_rejected_event_is_state_error() {
        let mut r = router();
        let err = r.on_frame(r#"{"type":"turn_change","currentTurnPlayerId":5}"#).unwrap_err();
        assert!(matches!(err, ClientError::State(_)));
    }

    #[test]
    fn test_every_applied_event_reports_a_change() {
        let mut r = router();
        assert!(r.on_frame(WELCOME).unwrap().changed);
        assert!(r.on_frame(ROUND_START).unwrap().changed);
        assert!(r.on_frame(ROUND_START).unwrap().changed);
    }

    #[test]
    fn test_round_end_starts_countdown() {
        let r = round_over();
        assert!(r.countdown().is_active());
        assert_eq!(r.state().countdown(), Some(10));
    }

    #[test]
    fn test_round_end_with_null_winner_still_ends_round() {
        let mut r = router();
        r.on_frame(WELCOME).unwrap();
        r.on_frame(ROUND_START).unwrap();
        r.on_frame(r#"{"type":"round_end","health":{"you":7,"opponent":7},"winnerId":null}"#)
            .unwrap();
        assert!(r.state().round_over());
        assert_eq!(r.state().winner_label(), Some("Draw"));
        assert!(r.countdown().is_active());
    }

    #[test]
    fn test_round_start_cancels_countdown() {
        let mut r = round_over();
        r.on_frame(ROUND_START).unwrap();
        assert!(!r.countdown().is_active());
        assert_eq!(r.state().countdown(), None);
    }

    #[test]
    fn test_tick_mirrors_remaining() {
        let mut r = round_over();
        let d = r.on_countdown(CountdownEvent::Tick { remaining: 4 });
        assert!(d.changed);
        assert_eq!(r.state().countdown(), Some(4));
    }

    #[test]
    fn test_expiry_leaves_room() {
        let mut r = round_over();
        let d = r.on_countdown(CountdownEvent::Expired);
        assert_eq!(d.commands, vec![Command::LeaveRoom]);
        assert_eq!(r.state().phase(), Phase::Lobby);
        assert_eq!(r.state().status(), "Disconnected");
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut r = router();
        assert_eq!(r.on_countdown(CountdownEvent::Expired), Dispatch::default());
    }

    #[test]
    fn test_rematch_resets_and_cancels() {
        let mut r = round_over();
        let d = r.on_intent(Intent::Rematch);
        assert_eq!(d.commands, vec![Command::Rematch]);
        assert!(d.changed);
        assert_eq!(r.state().phase(), Phase::InRound);
        assert!(!r.countdown().is_active());
        assert!(r.state().your_hand().is_empty());
    }

    #[test]
    fn test_rematch_outside_round_over_sends_nothing() {
        let mut r = router();
        assert_eq!(r.on_intent(Intent::Rematch), Dispatch::default());
    }

    #[test]
    fn test_leave_room_resets_locally() {
        let mut r = round_over();
        let d = r.on_intent(Intent::LeaveRoom);
        assert_eq!(d.commands, vec![Command::LeaveRoom]);
        assert_eq!(r.state().status(), "Left room");
        assert!(!r.countdown().is_active());
    }

    #[test]
    fn test_join_room_named_after_identity() {
        let mut r = router();
        r.on_frame(WELCOME).unwrap();
        let d = r.on_intent(Intent::JoinRoom(RoomId(2)));
        assert!(!d.changed);
        assert_eq!(
            d.commands,
            vec![Command::JoinRoom {
                room_id: RoomId(2),
                name: "Player 5".into(),
            }]
        );
        assert_eq!(r.state().player_id(), Some(PlayerId(5)));
    }

    #[test]
    fn test_send_failure_sets_status() {
        let mut r = router();
        let err = TransportError::ConnectionClosed("reset".into());
        assert!(r.on_send_failed(&err).changed);
        assert_eq!(r.state().status(), "Send failed: connection closed: reset");
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut r = router();
        let before = r.snapshot();
        r.on_frame(WELCOME).unwrap();
        assert_eq!(before.player_id(), None);
        assert_eq!(r.snapshot().player_id(), Some(PlayerId(5)));
    }
}
