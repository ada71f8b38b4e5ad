use tracing::{info, warn};

use crate::cards::Card;
use crate::config::{MinRaiseRule, TableConfig};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{GameState, Phase, SeatView, TableSnapshot};
use crate::hand::{evaluate, PokerHand};
use crate::history::{ActionRecord, BlindPost, HandRecord, Payout, Refund, ShowdownInfo};
use crate::keys::{KeyPrincipal, PublicKey};
use crate::player::{Player, PlayerAction};
use crate::protocol::{verify_disclosure, Dealer, DealtCardEnvelope};
use crate::rules::{validate_action, BettingContext, ValidatedAction};

pub const MIN_PLAYERS: usize = 2;
/// Keeps every hand within one deck: 2 hole cards each plus 5 on the board.
pub const MAX_PLAYERS: usize = 10;

fn check_seat_count(n: usize) -> Result<(), GameError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!(
            "table needs {}..={} players, got {}",
            MIN_PLAYERS, MAX_PLAYERS, n
        )))
    }
}

/// One sealed hole card as it went over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealtRecord {
    pub seat: usize,
    pub envelope: DealtCardEnvelope,
}

/// The betting engine: seats, the dealer, the board and the state machine
/// that drives a hand from preflop to showdown.
///
/// All mutation goes through `&mut self`, so at most one action is ever
/// applied at a time.
///
/// # Examples
///
/// ```no_run
/// use fairdeal_engine::config::TableConfig;
/// use fairdeal_engine::engine::Table;
/// use fairdeal_engine::player::PlayerAction;
///
/// let mut table = Table::new(TableConfig::default(), 2).unwrap();
/// table.start_hand().unwrap();
/// let first = table.to_act().unwrap();
/// table.apply_action(first, PlayerAction::Call).unwrap();
/// ```
#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    dealer: Dealer,
    players: Vec<Player>,
    community: Vec<Card>,
    state: GameState,
    transcript: Vec<DealtRecord>,
    record: Option<HandRecord>,
    hands_started: u32,
}

impl Table {
    /// Creates a table and generates a fresh key pair for the dealer and
    /// for every seat.
    pub fn new(config: TableConfig, num_players: usize) -> Result<Self, GameError> {
        config.validate()?;
        check_seat_count(num_players)?;
        let dealer_keys = KeyPrincipal::generate_with_bits(config.key_bits)?;
        let player_keys = (0..num_players)
            .map(|_| KeyPrincipal::generate_with_bits(config.key_bits))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_principals(config, dealer_keys, player_keys)
    }

    /// Creates a table from existing key pairs, one per seat.
    pub fn with_principals(
        config: TableConfig,
        dealer_keys: KeyPrincipal,
        player_keys: Vec<KeyPrincipal>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        check_seat_count(player_keys.len())?;
        let players = player_keys
            .into_iter()
            .enumerate()
            .map(|(seat, keys)| {
                Player::new(seat, format!("Player {}", seat + 1), config.starting_stack, keys)
            })
            .collect();
        let dealer = Dealer::new(dealer_keys, Deck::new(config.seed));
        Ok(Self {
            config,
            dealer,
            players,
            community: Vec::with_capacity(5),
            state: GameState::new(),
            transcript: Vec::new(),
            record: None,
            hands_started: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Result<&Player, GameError> {
        self.players.get(seat).ok_or(GameError::UnknownSeat(seat))
    }
    pub fn state(&self) -> &GameState {
        &self.state
    }
    pub fn phase(&self) -> Phase {
        self.state.phase
    }
    pub fn pot(&self) -> u32 {
        self.state.pot
    }
    pub fn to_act(&self) -> Option<usize> {
        self.state.to_act
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }
    pub fn dealer_public_key(&self) -> &PublicKey {
        self.dealer.public_key()
    }
    pub fn deck_remaining(&self) -> usize {
        self.dealer.deck().remaining()
    }
    /// Every sealed hole card of the current hand, in dealing order.
    pub fn transcript(&self) -> &[DealtRecord] {
        &self.transcript
    }
    pub fn record(&self) -> Option<&HandRecord> {
        self.record.as_ref()
    }
    pub fn is_hand_in_progress(&self) -> bool {
        self.state.in_progress
    }

    /// Swaps in a different deck, e.g. a stacked one for replaying a known
    /// deal. Only allowed between hands.
    pub fn set_deck(&mut self, deck: Deck) -> Result<(), GameError> {
        if self.state.in_progress {
            return Err(GameError::illegal("cannot replace the deck mid-hand"));
        }
        self.dealer.replace_deck(deck);
        Ok(())
    }

    pub fn set_show_cards(&mut self, seat: usize, show: bool) -> Result<(), GameError> {
        self.players
            .get_mut(seat)
            .ok_or(GameError::UnknownSeat(seat))?
            .set_show_cards(show);
        Ok(())
    }

    /// Starts a new hand: rotates the button, reshuffles, deals two sealed
    /// hole cards to every seat with chips and posts the blinds.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        if self.state.in_progress {
            return Err(GameError::illegal("a hand is already in progress"));
        }
        let with_chips = self.players.iter().filter(|p| p.chips() > 0).count();
        if with_chips < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers { active: with_chips });
        }

        for p in &mut self.players {
            p.reset_hand();
        }
        let button = if self.hands_started == 0 && self.players[0].is_active() {
            0
        } else {
            self.next_seat(self.state.button, Player::is_active)
                .ok_or(GameError::NotEnoughPlayers { active: 0 })?
        };
        self.hands_started += 1;

        self.dealer.reset_deck();
        self.community.clear();
        self.transcript.clear();
        self.state = GameState {
            last_raise: self.config.big_blind,
            button,
            in_progress: true,
            ..GameState::new()
        };
        self.record = Some(HandRecord::new(self.hands_started, self.config.seed, button));
        info!(hand = self.hands_started, button, players = with_chips, "hand started");

        if let Err(e) = self.deal_hole_cards() {
            warn!(error = %e, "dealing failed, hand abandoned");
            self.state.in_progress = false;
            return Err(e);
        }

        let sb = self.next_seat(button, Player::is_active).unwrap_or(button);
        let bb = self.next_seat(sb, Player::is_active).unwrap_or(sb);
        let posted_sb = self.post_blind(sb, self.config.small_blind)?;
        let posted_bb = self.post_blind(bb, self.config.big_blind)?;
        // A short big blind leaves only what was actually posted to call.
        self.state.current_bet = posted_sb.max(posted_bb);
        self.state.to_act = if self.round_complete() {
            None
        } else {
            self.next_seat(bb, Player::can_act)
        };
        Ok(())
    }

    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let dealer_public = self.dealer.public_key().clone();
        let n = self.players.len();
        let first = (self.state.button + 1) % n;
        for _ in 0..2 {
            for offset in 0..n {
                let seat = (first + offset) % n;
                if !self.players[seat].is_active() {
                    continue;
                }
                let envelope = self.dealer.deal_card(self.players[seat].public_key())?;
                self.players[seat].receive_card(&dealer_public, &envelope)?;
                self.transcript.push(DealtRecord { seat, envelope });
            }
        }
        Ok(())
    }

    /// Short stacks post what they have. Returns the amount posted.
    fn post_blind(&mut self, seat: usize, blind: u32) -> Result<u32, GameError> {
        let player = &mut self.players[seat];
        let amount = blind.min(player.chips());
        player.commit(amount)?;
        self.state.pot += amount;
        if let Some(rec) = self.record.as_mut() {
            rec.blinds.push(BlindPost { seat, amount });
        }
        Ok(amount)
    }

    /// First seat strictly after `from` (wrapping, `from` itself last) that
    /// satisfies `pred`.
    fn next_seat(&self, from: usize, pred: impl Fn(&Player) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|i| (from + i) % n)
            .find(|&seat| pred(&self.players[seat]))
    }

    fn min_raise(&self) -> u32 {
        match self.config.min_raise {
            MinRaiseRule::PreviousIncrement => self.state.last_raise,
            MinRaiseRule::CurrentBet => self.state.current_bet,
        }
    }

    /// Applies one betting action. A rejected action leaves the table
    /// exactly as it was.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<(), GameError> {
        let result = self.try_apply(seat, action);
        if let Err(e) = &result {
            warn!(seat, %action, error = %e, "action rejected");
        }
        result
    }

    fn try_apply(&mut self, seat: usize, action: PlayerAction) -> Result<(), GameError> {
        if !self.state.in_progress {
            return Err(GameError::NoHandInProgress);
        }
        if self.state.phase == Phase::Showdown {
            return Err(GameError::HandAlreadyComplete);
        }
        let player = self.players.get(seat).ok_or(GameError::UnknownSeat(seat))?;
        if player.is_folded() {
            return Err(GameError::PlayerFolded);
        }
        if !player.is_active() {
            return Err(GameError::PlayerInactive);
        }
        if player.is_all_in() {
            return Err(GameError::PlayerAllIn);
        }
        if self.round_complete() {
            return Err(GameError::illegal(
                "betting round is complete; advance the phase",
            ));
        }
        if let Some(expected) = self.state.to_act {
            if expected != seat {
                return Err(GameError::NotPlayersTurn {
                    expected,
                    actual: seat,
                });
            }
        }

        let ctx = BettingContext {
            stack: player.chips(),
            street_bet: player.bet(),
            current_bet: self.state.current_bet,
            min_raise: self.min_raise(),
        };
        let validated = validate_action(&ctx, action)?;

        let player = &mut self.players[seat];
        player.commit(validated.commit())?;
        self.state.pot += validated.commit();
        match validated {
            ValidatedAction::Fold => player.fold(),
            ValidatedAction::Check | ValidatedAction::Call(_) => {}
            ValidatedAction::Raise { new_bet, .. } => {
                self.state.last_raise = new_bet - self.state.current_bet;
                self.state.current_bet = new_bet;
                self.state.acted.clear();
            }
            ValidatedAction::AllIn { new_bet, .. } => {
                if new_bet > self.state.current_bet {
                    let increment = new_bet - self.state.current_bet;
                    // A short all-in does not change the minimum raise.
                    if increment >= self.state.last_raise {
                        self.state.last_raise = increment;
                    }
                    self.state.current_bet = new_bet;
                    self.state.acted.clear();
                }
            }
        }
        self.state.acted.insert(seat);
        if let Some(rec) = self.record.as_mut() {
            rec.actions.push(ActionRecord {
                seat,
                phase: self.state.phase,
                action,
            });
        }

        self.state.to_act = if self.round_complete() {
            None
        } else {
            self.next_seat(seat, Player::can_act)
        };
        Ok(())
    }

    /// True when no further betting is possible or needed on this street:
    /// at most one player is left in the hand, or every player who can
    /// still act has acted and matched the current bet. All-in players
    /// never block completion.
    pub fn round_complete(&self) -> bool {
        let survivors = self.players.iter().filter(|p| p.in_hand()).count();
        if survivors <= 1 {
            return true;
        }
        let current_bet = self.state.current_bet;
        let actors: Vec<&Player> = self.players.iter().filter(|p| p.can_act()).collect();
        if actors.len() <= 1 && actors.iter().all(|p| p.bet() >= current_bet) {
            return true;
        }
        actors
            .iter()
            .all(|p| self.state.acted.contains(&p.seat()) && p.bet() == current_bet)
    }

    /// Moves to the next phase once the betting round is complete, dealing
    /// community cards. Entering showdown reveals every remaining hand and
    /// checks each revealed card against the dealer's signature.
    pub fn advance_phase(&mut self) -> Result<Phase, GameError> {
        if !self.state.in_progress {
            return Err(GameError::NoHandInProgress);
        }
        let next = self.state.phase.next().ok_or(GameError::HandAlreadyComplete)?;
        if !self.round_complete() {
            return Err(GameError::RoundInProgress);
        }
        if next == Phase::Showdown {
            self.verify_revealed_hands()?;
        }

        let mut dealt = Vec::with_capacity(3);
        for _ in 0..next.cards_dealt_on_entry() {
            dealt.push(self.dealer.draw_open()?);
        }

        for p in &mut self.players {
            p.reset_street();
        }
        self.community.extend(dealt);
        self.state.phase = next;
        self.state.current_bet = 0;
        self.state.last_raise = self.config.big_blind;
        self.state.acted.clear();
        if let Some(rec) = self.record.as_mut() {
            rec.board = self.community.clone();
        }

        if next == Phase::Showdown {
            self.state.to_act = None;
            for p in self.players.iter_mut().filter(|p| p.in_hand()) {
                p.set_show_cards(true);
            }
        } else {
            self.state.to_act = if self.round_complete() {
                None
            } else {
                self.next_seat(self.state.button, Player::can_act)
            };
        }
        info!(phase = next.as_str(), pot = self.state.pot, "phase advanced");
        Ok(next)
    }

    /// Checks every card still in the hand against the dealer's signature.
    /// Runs before showdown touches any state, so a failure leaves the table
    /// on the river.
    fn verify_revealed_hands(&self) -> Result<(), GameError> {
        let dealer_public = self.dealer.public_key();
        for p in self.players.iter().filter(|p| p.in_hand()) {
            for receipt in p.receipts() {
                verify_disclosure(dealer_public, receipt).inspect_err(|e| {
                    warn!(seat = p.seat(), error = %e, "revealed card failed verification");
                })?;
            }
        }
        Ok(())
    }

    /// Settles the pot. A lone survivor takes it uncontested; otherwise any
    /// uncalled excess goes back to its owner and the best hands at showdown
    /// split the rest evenly, the remainder going to the first winner in
    /// seat order.
    pub fn award_pot(&mut self) -> Result<Vec<Payout>, GameError> {
        if !self.state.in_progress {
            return Err(GameError::NoHandInProgress);
        }
        let survivors: Vec<usize> = self
            .players
            .iter()
            .filter(|p| p.in_hand())
            .map(Player::seat)
            .collect();
        let mut pot = self.state.pot;
        let mut refund = None;

        let (payouts, notes) = match survivors.as_slice() {
            [] => return Err(GameError::illegal("no player left in the hand")),
            [only] => (
                vec![Payout {
                    seat: *only,
                    amount: pot,
                    hand: None,
                }],
                "uncontested",
            ),
            _ => {
                if self.state.phase != Phase::Showdown {
                    return Err(GameError::RoundInProgress);
                }
                let ranked = survivors
                    .iter()
                    .map(|&seat| self.best_hand(seat).map(|h| (seat, h)))
                    .collect::<Result<Vec<_>, _>>()?;
                refund = self.uncalled_excess();
                if let Some(r) = &refund {
                    pot -= r.amount;
                }
                let best = ranked
                    .iter()
                    .map(|(_, h)| *h)
                    .max()
                    .ok_or(GameError::illegal("no hands to rank"))?;
                let winners: Vec<(usize, PokerHand)> =
                    ranked.into_iter().filter(|(_, h)| *h == best).collect();
                let share = pot / winners.len() as u32;
                let remainder = pot % winners.len() as u32;
                let notes = if winners.len() > 1 { "split pot" } else { "showdown" };
                let payouts = winners
                    .into_iter()
                    .enumerate()
                    .map(|(i, (seat, hand))| Payout {
                        seat,
                        amount: if i == 0 { share + remainder } else { share },
                        hand: Some(hand),
                    })
                    .collect();
                (payouts, notes)
            }
        };

        if let Some(r) = &refund {
            self.players[r.seat].add_chips(r.amount);
            info!(seat = r.seat, amount = r.amount, "uncalled bet returned");
        }
        for payout in &payouts {
            self.players[payout.seat].add_chips(payout.amount);
        }
        self.state.pot = 0;
        self.state.to_act = None;
        self.state.in_progress = false;
        if let Some(rec) = self.record.as_mut() {
            rec.showdown = Some(ShowdownInfo {
                payouts: payouts.clone(),
                refund,
                notes: Some(notes.to_string()),
            });
        }
        info!(pot, winners = payouts.len(), notes, "pot awarded");
        Ok(payouts)
    }

    /// The part of the largest contribution that no other seat matched.
    fn uncalled_excess(&self) -> Option<Refund> {
        let top = self.players.iter().max_by_key(|p| p.total_bet())?;
        let matched = self
            .players
            .iter()
            .filter(|p| p.seat() != top.seat())
            .map(Player::total_bet)
            .max()
            .unwrap_or(0);
        let amount = top.total_bet().checked_sub(matched).filter(|&a| a > 0)?;
        Some(Refund {
            seat: top.seat(),
            amount,
        })
    }

    /// Best hand from a seat's hole cards plus the board.
    pub fn best_hand(&self, seat: usize) -> Result<PokerHand, GameError> {
        let player = self.player(seat)?;
        let mut cards: Vec<Card> = player.hand().to_vec();
        cards.extend_from_slice(&self.community);
        Ok(evaluate(&cards))
    }

    pub fn current_state(&self) -> TableSnapshot {
        TableSnapshot {
            phase: self.state.phase,
            pot: self.state.pot,
            current_bet: self.state.current_bet,
            button: self.state.button,
            to_act: self.state.to_act,
            hand_in_progress: self.state.in_progress,
            players: self.players.iter().map(SeatView::of).collect(),
            community_cards: self.community.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CATALOG;
    use crate::errors::ProtocolError;

    fn table(n: usize) -> Table {
        let key = || KeyPrincipal::generate_with_bits(1024).unwrap();
        let config = TableConfig {
            key_bits: 1024,
            seed: Some(11),
            ..TableConfig::default()
        };
        Table::with_principals(config, key(), (0..n).map(|_| key()).collect()).unwrap()
    }

    fn check_to_river(t: &mut Table) {
        t.apply_action(1, PlayerAction::Call).unwrap();
        t.apply_action(0, PlayerAction::Check).unwrap();
        while t.phase() != Phase::River {
            t.advance_phase().unwrap();
            while let Some(seat) = t.to_act() {
                t.apply_action(seat, PlayerAction::Check).unwrap();
            }
        }
    }

    #[test]
    fn forged_receipt_keeps_the_table_on_the_river() {
        let mut t = table(2);
        t.start_hand().unwrap();
        check_to_river(&mut t);

        let receipt = &mut t.players[0].receipts_mut()[1];
        receipt.card = if receipt.card == CATALOG[0] {
            CATALOG[1]
        } else {
            CATALOG[0]
        };
        let before = t.current_state();

        assert_eq!(
            t.advance_phase(),
            Err(GameError::Protocol(ProtocolError::SignatureMismatch))
        );
        assert_eq!(t.current_state(), before);
        assert_eq!(t.phase(), Phase::River);
        assert!(t.players.iter().all(|p| !p.show_cards()));
    }

    #[test]
    fn honest_receipts_reveal_both_hands() {
        let mut t = table(2);
        t.start_hand().unwrap();
        check_to_river(&mut t);
        assert_eq!(t.advance_phase(), Ok(Phase::Showdown));
        assert!(t.players.iter().all(|p| p.show_cards()));
    }
}
