//! The match snapshot and its read-only queries.

use std::fmt;

use twentyone_protocol::{Card, PlayerId, RoomSummary};

use crate::Phase;

/// Status lines shown above the table.
pub mod status {
    pub const CONNECTING: &str = "Connecting...";
    pub const CONNECTED: &str = "Connected";
    pub const YOUR_TURN: &str = "Your turn";
    pub const OPPONENT_TURN: &str = "Opponent's turn";
    pub const GAME_OVER: &str = "Game over - rematch?";
    pub const DISCONNECTED: &str = "Disconnected";
    pub const LEFT_ROOM: &str = "Left room";
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of a finished round, from our seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Draw,
    YouWin,
    YouLose,
}

impl Outcome {
    /// The banner text for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::YouWin => "You Win",
            Self::YouLose => "You Lose",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CardView
// ---------------------------------------------------------------------------

/// How one card of the opponent's hand should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView<'a> {
    /// Face down: the opponent's first card until the round is over.
    Hidden,
    Shown(&'a Card),
}

// ---------------------------------------------------------------------------
// HandTotals
// ---------------------------------------------------------------------------

/// A hand's points split the way the table shows them: the face-down first
/// card on one side, everything dealt after it on the other.
///
/// A rank outside the deck counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandTotals {
    /// Points of the first card.
    pub hidden: u32,
    /// Points of every card after the first.
    pub revealed: u32,
}

impl HandTotals {
    pub fn of(hand: &[Card]) -> Self {
        let points = |card: &Card| u32::from(card.points().unwrap_or(0));
        match hand.split_first() {
            Some((first, rest)) => Self {
                hidden: points(first),
                revealed: rest.iter().map(points).sum(),
            },
            None => Self::default(),
        }
    }

    pub fn total(&self) -> u32 {
        self.hidden + self.revealed
    }
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// Everything the UI needs to draw one frame.
///
/// Fields are private: the only writers are the transitions in
/// `reducer.rs`. Presenters get clones (usually behind an `Arc`) and read
/// them through the accessors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub(crate) player_id: Option<PlayerId>,
    /// Learned from the first event naming a player other than us.
    pub(crate) opponent_id: Option<PlayerId>,
    pub(crate) phase: Phase,

    pub(crate) your_hand: Vec<Card>,
    pub(crate) opponent_hand: Vec<Card>,
    pub(crate) your_value: u32,
    pub(crate) opponent_value: u32,

    pub(crate) your_health: i32,
    pub(crate) opponent_health: i32,
    pub(crate) round: u32,
    pub(crate) damage: u32,

    pub(crate) current_turn: Option<PlayerId>,
    pub(crate) match_over: bool,
    pub(crate) outcome: Option<Outcome>,

    /// Seconds left before auto-leave. `Some` only in `RoundOver`.
    pub(crate) countdown: Option<u32>,
    /// Value the countdown shows when a round ends.
    pub(crate) countdown_from: u32,

    pub(crate) status: String,
    pub(crate) rooms: Vec<RoomSummary>,
}

impl MatchState {
    /// Health both players start a match with.
    pub const STARTING_HEALTH: i32 = 7;
    /// Countdown shown when a round ends, unless configured otherwise.
    pub const DEFAULT_COUNTDOWN: u32 = 10;

    /// An empty state whose round-over countdown starts at `countdown_from`.
    pub fn new(countdown_from: u32) -> Self {
        Self {
            player_id: None,
            opponent_id: None,
            phase: Phase::Lobby,
            your_hand: Vec::new(),
            opponent_hand: Vec::new(),
            your_value: 0,
            opponent_value: 0,
            your_health: Self::STARTING_HEALTH,
            opponent_health: Self::STARTING_HEALTH,
            round: 1,
            damage: 1,
            current_turn: None,
            match_over: false,
            outcome: None,
            countdown: None,
            countdown_from,
            status: status::CONNECTING.to_string(),
            rooms: Vec::new(),
        }
    }

    // -- Identity and phase --

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn opponent_id(&self) -> Option<PlayerId> {
        self.opponent_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seated at a table (game screen rather than lobby).
    pub fn in_game(&self) -> bool {
        self.phase.in_game()
    }

    pub fn round_over(&self) -> bool {
        self.phase.is_round_over()
    }

    pub fn match_over(&self) -> bool {
        self.match_over
    }

    // -- Hands and totals --

    pub fn your_hand(&self) -> &[Card] {
        &self.your_hand
    }

    pub fn opponent_hand(&self) -> &[Card] {
        &self.opponent_hand
    }

    pub fn your_value(&self) -> u32 {
        self.your_value
    }

    /// The opponent's total as last reported by the server.
    ///
    /// During a round this includes the hidden card; UIs should prefer
    /// [`visible_opponent_value`](Self::visible_opponent_value).
    pub fn opponent_value(&self) -> u32 {
        self.opponent_value
    }

    /// The opponent's total, but only once the round is over.
    pub fn visible_opponent_value(&self) -> Option<u32> {
        self.round_over().then_some(self.opponent_value)
    }

    pub fn your_totals(&self) -> HandTotals {
        HandTotals::of(&self.your_hand)
    }

    /// Split totals of the opponent's hand. UIs show only `revealed` until
    /// the round is over.
    pub fn opponent_totals(&self) -> HandTotals {
        HandTotals::of(&self.opponent_hand)
    }

    /// The opponent's hand with the first card face down until round end.
    pub fn opponent_cards(&self) -> Vec<CardView<'_>> {
        let reveal = self.round_over();
        self.opponent_hand
            .iter()
            .enumerate()
            .map(|(i, card)| {
                if i == 0 && !reveal {
                    CardView::Hidden
                } else {
                    CardView::Shown(card)
                }
            })
            .collect()
    }

    // -- Match progress --

    pub fn your_health(&self) -> i32 {
        self.your_health
    }

    pub fn opponent_health(&self) -> i32 {
        self.opponent_health
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn current_turn(&self) -> Option<PlayerId> {
        self.current_turn
    }

    /// `true` when we hold an identity and it's the one whose turn it is.
    pub fn is_your_turn(&self) -> bool {
        self.player_id.is_some() && self.player_id == self.current_turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// `"Draw"`, `"You Win"` or `"You Lose"` after a round, else `None`.
    pub fn winner_label(&self) -> Option<&'static str> {
        self.outcome.map(|o| o.label())
    }

    /// Whether the UI should offer a rematch: the round is over and
    /// someone's health has run out.
    pub fn can_rematch(&self) -> bool {
        self.round_over() && (self.your_health <= 0 || self.opponent_health <= 0)
    }

    /// Seconds until the client leaves the room on its own.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    // -- Lobby and status --

    pub fn status(&self) -> &str {
        &self.status
    }

    /// The last room listing, exactly as received.
    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    /// Rooms that still have a free seat.
    pub fn joinable_rooms(&self) -> impl Iterator<Item = &RoomSummary> {
        self.rooms.iter().filter(|room| room.is_waiting())
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COUNTDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty_lobby() {
        let s = MatchState::default();
        assert_eq!(s.phase(), Phase::Lobby);
        assert!(!s.in_game());
        assert!(!s.round_over());
        assert!(s.your_hand().is_empty());
        assert!(s.opponent_hand().is_empty());
        assert_eq!(s.your_value(), 0);
        assert_eq!(s.your_health(), 7);
        assert_eq!(s.opponent_health(), 7);
        assert_eq!(s.round(), 1);
        assert_eq!(s.damage(), 1);
        assert_eq!(s.countdown(), None);
        assert_eq!(s.winner_label(), None);
        assert_eq!(s.status(), status::CONNECTING);
    }

    #[test]
    fn test_not_your_turn_without_identity() {
        let s = MatchState::default();
        assert!(!s.is_your_turn());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Draw.label(), "Draw");
        assert_eq!(Outcome::YouWin.to_string(), "You Win");
        assert_eq!(Outcome::YouLose.to_string(), "You Lose");
    }

    #[test]
    fn test_opponent_first_card_hidden_during_round() {
        let mut s = MatchState::default();
        s.phase = Phase::InRound;
        s.opponent_hand = vec![Card::new("2"), Card::new("5")];
        s.opponent_value = 7;

        let cards = s.opponent_cards();
        assert_eq!(cards[0], CardView::Hidden);
        assert_eq!(cards[1], CardView::Shown(&s.opponent_hand[1]));
        assert_eq!(s.visible_opponent_value(), None);
    }

    #[test]
    fn test_opponent_hand_revealed_when_round_over() {
        let mut s = MatchState::default();
        s.phase = Phase::RoundOver;
        s.opponent_hand = vec![Card::new("2")];
        s.opponent_value = 2;

        assert_eq!(s.opponent_cards(), vec![CardView::Shown(&s.opponent_hand[0])]);
        assert_eq!(s.visible_opponent_value(), Some(2));
    }

    #[test]
    fn test_hand_totals_split_first_card() {
        let hand = [Card::new("3"), Card::new("10"), Card::new("4")];
        let totals = HandTotals::of(&hand);
        assert_eq!(totals, HandTotals { hidden: 3, revealed: 14 });
        assert_eq!(totals.total(), 17);
    }

    #[test]
    fn test_hand_totals_edge_cases() {
        assert_eq!(HandTotals::of(&[]), HandTotals::default());
        assert_eq!(HandTotals::of(&[Card::new("11")]).revealed, 0);

        let odd = HandTotals::of(&[Card::new("K"), Card::new("5"), Card::new("12")]);
        assert_eq!(odd, HandTotals { hidden: 0, revealed: 5 });
    }

    #[test]
    fn test_state_totals_follow_hands() {
        let mut s = MatchState::default();
        s.your_hand = vec![Card::new("1"), Card::new("7")];
        s.opponent_hand = vec![Card::new("2"), Card::new("9")];

        assert_eq!(s.your_totals().total(), 8);
        assert_eq!(s.opponent_totals(), HandTotals { hidden: 2, revealed: 9 });
    }

    #[test]
    fn test_can_rematch_needs_round_over_and_zero_health() {
        let mut s = MatchState::default();
        s.phase = Phase::RoundOver;
        assert!(!s.can_rematch());

        s.opponent_health = 0;
        assert!(s.can_rematch());

        s.phase = Phase::InRound;
        assert!(!s.can_rematch());
    }
}
