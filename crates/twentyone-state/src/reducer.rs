//! Typed transitions on [`MatchState`].
//!
//! Every transition validates first and mutates second, so a rejected
//! event never leaves a half-applied state behind.

use twentyone_protocol::{HitResult, PlayerId, RoomSummary, RoundEnd, RoundStart, RoundWinner, ServerEvent};

use crate::state::status;
use crate::{MatchState, Outcome, Phase, StateError};

impl MatchState {
    /// Applies one server event.
    ///
    /// Unknown events are a no-op. On `Err` the state is unchanged.
    pub fn apply(&mut self, event: ServerEvent) -> Result<(), StateError> {
        match event {
            ServerEvent::Welcome { player_id } => self.on_welcome(player_id),
            ServerEvent::RoomList { rooms } => self.on_room_list(rooms),
            ServerEvent::GameStart(start) => self.on_round_start("game_start", start, true),
            ServerEvent::RoundStart(start) => self.on_round_start("round_start", start, false),
            ServerEvent::HitResult(hit) => self.on_hit_result(hit),
            ServerEvent::TurnChange { current_turn } => self.on_turn_change(current_turn),
            ServerEvent::RoundEnd(end) => self.on_round_end(end),
            ServerEvent::GameOver => self.on_game_over(),
            ServerEvent::Unknown => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Local transitions
    // -----------------------------------------------------------------------

    /// Optimistically starts the next round after a rematch request.
    ///
    /// Only valid while the round is over. The server's `round_start`
    /// fills the hands back in.
    pub fn begin_rematch(&mut self) -> Result<(), StateError> {
        if self.phase != Phase::RoundOver {
            return Err(StateError::InvalidPhase {
                event: "rematch",
                phase: self.phase,
            });
        }

        self.your_hand.clear();
        self.opponent_hand.clear();
        self.your_value = 0;
        self.opponent_value = 0;
        self.outcome = None;
        self.countdown = None;
        self.match_over = false;
        self.phase = Phase::InRound;

        tracing::debug!(phase = %self.phase, "rematch requested");
        Ok(())
    }

    /// Returns to the lobby with a fresh table.
    ///
    /// Our identity and the last room listing survive; everything about
    /// the match (including the learned opponent) is forgotten.
    pub fn reset(&mut self, status: impl Into<String>) {
        let fresh = Self::new(self.countdown_from);
        *self = Self {
            player_id: self.player_id,
            rooms: std::mem::take(&mut self.rooms),
            status: status.into(),
            ..fresh
        };
        tracing::debug!(status = %self.status, "state reset to lobby");
    }

    /// Mirrors the disconnect countdown into the snapshot.
    ///
    /// Ignored outside `RoundOver`. Returns `true` if the value changed.
    pub fn set_countdown(&mut self, remaining: u32) -> bool {
        if self.phase != Phase::RoundOver || self.countdown == Some(remaining) {
            return false;
        }
        self.countdown = Some(remaining);
        true
    }

    /// Replaces the status line. Returns `true` if the text changed.
    pub fn set_status(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.status == text {
            return false;
        }
        self.status = text;
        true
    }

    // -----------------------------------------------------------------------
    // Server events
    // -----------------------------------------------------------------------

    fn on_welcome(&mut self, player_id: PlayerId) -> Result<(), StateError> {
        match self.player_id {
            Some(current) if current == player_id => Ok(()),
            Some(current) => Err(StateError::IdentityAlreadySet {
                current,
                offered: player_id,
            }),
            None => {
                self.player_id = Some(player_id);
                tracing::info!(%player_id, "identity assigned");
                Ok(())
            }
        }
    }

    fn on_room_list(&mut self, rooms: Vec<RoomSummary>) -> Result<(), StateError> {
        if self.phase != Phase::Lobby {
            return Err(StateError::InvalidPhase {
                event: "room_list",
                phase: self.phase,
            });
        }
        self.rooms = rooms;
        Ok(())
    }

    fn on_round_start(
        &mut self,
        event: &'static str,
        start: RoundStart,
        new_match: bool,
    ) -> Result<(), StateError> {
        self.require_phase(event, Phase::InRound)?;
        let known = if new_match { None } else { self.opponent_id };
        let opponent = self.learn_opponent(event, start.current_turn, known)?;

        self.opponent_id = opponent;
        self.your_hand = start.your_hand;
        self.opponent_hand = start.opponent_hand;
        self.your_value = start.your_value;
        self.opponent_value = start.opponent_value;
        if let Some(health) = start.health {
            self.your_health = health.you;
            self.opponent_health = health.opponent;
        }
        self.round = start.round;
        self.damage = start.damage;
        self.current_turn = Some(start.current_turn);
        self.outcome = None;
        self.countdown = None;
        if new_match {
            self.match_over = false;
        }
        self.phase = Phase::InRound;
        self.status = self.turn_status().to_string();

        tracing::info!(round = self.round, turn = %start.current_turn, "{event} applied");
        Ok(())
    }

    fn on_hit_result(&mut self, hit: HitResult) -> Result<(), StateError> {
        const EVENT: &str = "hit_result";
        if self.phase != Phase::InRound {
            return Err(StateError::InvalidPhase {
                event: EVENT,
                phase: self.phase,
            });
        }
        let Some(me) = self.player_id else {
            return Err(StateError::NoIdentity { event: EVENT });
        };
        let opponent = self.learn_opponent(EVENT, hit.player_id, self.opponent_id)?;

        self.opponent_id = opponent;
        if hit.player_id == me {
            self.your_hand.push(hit.card);
            self.your_value = hit.new_value;
        } else {
            self.opponent_hand.push(hit.card);
            self.opponent_value = hit.new_value;
        }
        tracing::debug!(player = %hit.player_id, value = hit.new_value, "card dealt");
        Ok(())
    }

    fn on_turn_change(&mut self, current_turn: PlayerId) -> Result<(), StateError> {
        const EVENT: &str = "turn_change";
        if self.phase != Phase::InRound {
            return Err(StateError::InvalidPhase {
                event: EVENT,
                phase: self.phase,
            });
        }
        let opponent = self.learn_opponent(EVENT, current_turn, self.opponent_id)?;

        self.opponent_id = opponent;
        self.current_turn = Some(current_turn);
        self.status = self.turn_status().to_string();
        Ok(())
    }

    fn on_round_end(&mut self, end: RoundEnd) -> Result<(), StateError> {
        self.require_phase("round_end", Phase::RoundOver)?;

        let outcome = match end.winner {
            RoundWinner::Draw => Outcome::Draw,
            RoundWinner::Player(winner) if Some(winner) == self.player_id => Outcome::YouWin,
            RoundWinner::Player(_) => Outcome::YouLose,
        };

        self.your_health = end.health.you;
        self.opponent_health = end.health.opponent;
        self.outcome = Some(outcome);
        self.countdown = Some(self.countdown_from);
        self.phase = Phase::RoundOver;

        tracing::info!(
            %outcome,
            you = self.your_health,
            opponent = self.opponent_health,
            "round over"
        );
        Ok(())
    }

    fn on_game_over(&mut self) -> Result<(), StateError> {
        if self.phase == Phase::Lobby {
            return Err(StateError::InvalidPhase {
                event: "game_over",
                phase: self.phase,
            });
        }
        self.match_over = true;
        self.status = status::GAME_OVER.to_string();
        tracing::info!("match over");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn require_phase(&self, event: &'static str, target: Phase) -> Result<(), StateError> {
        if self.phase.can_transition_to(target) {
            Ok(())
        } else {
            Err(StateError::InvalidPhase {
                event,
                phase: self.phase,
            })
        }
    }

    /// Works out the opponent id after an event that names `player`.
    ///
    /// Without our own identity nothing can be learned. A third id, once
    /// both seats are known, is rejected.
    fn learn_opponent(
        &self,
        event: &'static str,
        player: PlayerId,
        known: Option<PlayerId>,
    ) -> Result<Option<PlayerId>, StateError> {
        if self.player_id.is_none() || self.player_id == Some(player) {
            return Ok(known);
        }
        match known {
            None => Ok(Some(player)),
            Some(opponent) if opponent == player => Ok(known),
            Some(_) => Err(StateError::UnknownPlayer { event, player }),
        }
    }

    fn turn_status(&self) -> &'static str {
        if self.is_your_turn() {
            status::YOUR_TURN
        } else {
            status::OPPONENT_TURN
        }
    }
}

#[cfg(test)]
mod tests {
    use twentyone_protocol::{Card, Health};

    use super::*;

    fn start(turn: i64) -> RoundStart {
        RoundStart {
            your_hand: vec![Card::new("1"), Card::new("7")],
            opponent_hand: vec![Card::new("2")],
            your_value: 8,
            opponent_value: 0,
            health: None,
            round: 1,
            damage: 1,
            current_turn: PlayerId(turn),
        }
    }

    fn seated(me: i64) -> MatchState {
        let mut s = MatchState::default();
        s.apply(ServerEvent::Welcome {
            player_id: PlayerId(me),
        })
        .unwrap();
        s.apply(ServerEvent::RoundStart(start(me))).unwrap();
        s
    }

    #[test]
    fn test_require_phase_reports_event_and_phase() {
        let s = MatchState::default();
        let err = s.require_phase("round_end", Phase::RoundOver).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidPhase {
                event: "round_end",
                phase: Phase::Lobby,
            }
        );
    }

    #[test]
    fn test_learn_opponent_from_turn() {
        let s = seated(5);
        assert_eq!(s.learn_opponent("t", PlayerId(9), None).unwrap(), Some(PlayerId(9)));
        assert_eq!(
            s.learn_opponent("t", PlayerId(5), Some(PlayerId(9))).unwrap(),
            Some(PlayerId(9))
        );
        assert!(s.learn_opponent("t", PlayerId(3), Some(PlayerId(9))).is_err());
    }

    #[test]
    fn test_learn_opponent_needs_identity() {
        let s = MatchState::default();
        assert_eq!(s.learn_opponent("t", PlayerId(9), None).unwrap(), None);
    }

    #[test]
    fn test_set_countdown_ignored_outside_round_over() {
        let mut s = seated(5);
        assert!(!s.set_countdown(4));
        assert_eq!(s.countdown(), None);
    }

    #[test]
    fn test_set_status_reports_change() {
        let mut s = MatchState::default();
        assert!(s.set_status("Connected"));
        assert!(!s.set_status("Connected"));
        assert_eq!(s.status(), "Connected");
    }

    #[test]
    fn test_reset_keeps_identity_and_rooms() {
        let mut s = seated(5);
        s.rooms = vec![RoomSummary {
            room_id: twentyone_protocol::RoomId(1),
            player_names: vec!["a".into()],
            state: "waiting".into(),
            mode: "duel".into(),
        }];
        s.apply(ServerEvent::RoundEnd(RoundEnd {
            health: Health { you: 3, opponent: 0 },
            winner: RoundWinner::Player(PlayerId(5)),
        }))
        .unwrap();

        s.reset("Left room");

        assert_eq!(s.phase(), Phase::Lobby);
        assert_eq!(s.player_id(), Some(PlayerId(5)));
        assert_eq!(s.rooms().len(), 1);
        assert_eq!(s.your_health(), MatchState::STARTING_HEALTH);
        assert_eq!(s.opponent_id(), None);
        assert_eq!(s.outcome(), None);
        assert_eq!(s.countdown(), None);
        assert_eq!(s.status(), "Left room");
    }
}
