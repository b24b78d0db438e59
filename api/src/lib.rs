pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Tournament {
    pub id: u64,
    pub name: String,
    pub game_name: String,
    pub start_date: Option<DateTime<Utc>>,
    /// Free text, e.g. "$500 + 3 months Gold Pass".
    pub prize_pool: Option<String>,
    pub team_size: u32,
    pub rules: String,
    pub status: TournamentStatus,
    pub required_fields: Vec<FieldDefinition>,
    pub matches: Vec<Match>,
    /// The calling user's own registration, present only on authenticated
    /// detail fetches. Used to disable re-submission, nothing more.
    pub my_registration: Option<TeamRegistration>,
}

impl Tournament {
    /// Group the flat match list by round number, matches ordered by match
    /// number within each round. Every match lands in exactly one bucket.
    pub fn rounds(&self) -> BTreeMap<u32, Vec<&Match>> {
        let mut rounds: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
        for m in &self.matches {
            rounds.entry(m.round).or_default().push(m);
        }
        for matches in rounds.values_mut() {
            matches.sort_by_key(|m| m.number);
        }
        rounds
    }

    /// The numerically highest round present, if any matches exist.
    pub fn final_round(&self) -> Option<u32> {
        self.matches.iter().map(|m| m.round).max()
    }

    /// The single match of the final round. A bracket where the max round
    /// holds more than one match is corrupt; this refuses to pick one
    /// arbitrarily and returns the error instead.
    pub fn final_match(&self) -> Result<Option<&Match>, BracketError> {
        let Some(final_round) = self.final_round() else {
            return Ok(None);
        };
        let mut finals: Vec<&Match> = self
            .matches
            .iter()
            .filter(|m| m.round == final_round)
            .collect();
        if finals.len() > 1 {
            return Err(BracketError::AmbiguousFinal {
                round: final_round,
                matches: finals.len(),
            });
        }
        Ok(finals.pop())
    }

    /// The tournament champion: only once the status is COMPLETED, the final
    /// round is unambiguous, and the final match has a recorded winner.
    pub fn champion(&self) -> Option<&TeamSlot> {
        if self.status != TournamentStatus::Completed {
            return None;
        }
        self.final_match().ok().flatten()?.winner.as_ref()
    }

    pub fn find_match(&self, round: u32, number: u32) -> Option<&Match> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.number == number)
    }

    pub fn is_registered(&self) -> bool {
        self.my_registration.is_some()
    }
}

/// Lifecycle status. Transitions are driven by the backend and are monotonic
/// (REGISTRATION_OPEN → IN_PROGRESS → COMPLETED); the client only displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    RegistrationOpen,
    InProgress,
    Completed,
}

impl TournamentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TournamentStatus::RegistrationOpen => "Registration Open",
            TournamentStatus::InProgress => "In Progress",
            TournamentStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("final round {round} holds {matches} matches, expected exactly 1")]
    AmbiguousFinal { round: u32, matches: usize },
}

/// One bracket pairing. Round and match numbers are 1-based; an absent team
/// slot is a bye.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub round: u32,
    pub number: u32,
    pub team_a: Option<TeamSlot>,
    pub team_b: Option<TeamSlot>,
    pub winner: Option<TeamSlot>,
    pub status: MatchStatus,
}

impl Match {
    pub fn is_bye(&self) -> bool {
        self.team_a.is_none() || self.team_b.is_none()
    }

    /// Guard for offering the "set winner" action: both slots populated, no
    /// winner recorded, not already completed. An availability hint only —
    /// the authoritative check stays server-side.
    pub fn awaiting_winner(&self) -> bool {
        self.winner.is_none()
            && self.status != MatchStatus::Completed
            && self.team_a.is_some()
            && self.team_b.is_some()
    }

    pub fn has_slot(&self, registration_id: u64) -> bool {
        self.slot(registration_id).is_some()
    }

    pub fn slot(&self, registration_id: u64) -> Option<&TeamSlot> {
        [self.team_a.as_ref(), self.team_b.as_ref()]
            .into_iter()
            .flatten()
            .find(|s| s.registration_id == registration_id)
    }

    pub fn winner_is(&self, registration_id: u64) -> bool {
        self.winner
            .as_ref()
            .is_some_and(|w| w.registration_id == registration_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// A team occupying a bracket slot — a reference back to its registration
/// plus the team-level field values for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSlot {
    pub registration_id: u64,
    pub team_fields: Vec<FieldEntry>,
}

impl TeamSlot {
    pub fn display_name(&self) -> &str {
        name_field(&self.team_fields).unwrap_or("Unnamed Team")
    }
}

/// A named field value as returned by the backend (display side).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

fn name_field(fields: &[FieldEntry]) -> Option<&str> {
    fields
        .iter()
        .find(|f| f.name.to_lowercase().contains("name"))
        .map(|f| f.value.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct TeamRegistration {
    pub id: u64,
    pub team_fields: Vec<FieldEntry>,
    pub players: Vec<PlayerEntry>,
}

impl TeamRegistration {
    pub fn display_name(&self) -> &str {
        name_field(&self.team_fields).unwrap_or("Unnamed Team")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerEntry {
    pub fields: Vec<FieldEntry>,
}

/// A registration-form field definition. Ownership is an explicit tag set at
/// tournament-creation time; `FieldOwner::from_legacy_name` covers backends
/// that still encode it in the field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub id: u64,
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub owner: FieldOwner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    Text,
    Number,
}

/// Whether a field belongs to the team as a whole or to one player slot
/// (zero-based index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOwner {
    Team,
    Player(u32),
}

impl FieldOwner {
    /// Legacy convention: a field named "Player N ..." belongs to player N
    /// (1-based in the name, zero-based here); anything else is a team field.
    pub fn from_legacy_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let Some(pos) = lower.find("player ") else {
            return FieldOwner::Team;
        };
        let rest = &lower[pos + "player ".len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(n) if n >= 1 => FieldOwner::Player(n - 1),
            _ => FieldOwner::Team,
        }
    }
}

// ---------------------------------------------------------------------------
// Registration submission (outgoing)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub team_fields: Vec<FieldValue>,
    pub player_submissions: Vec<PlayerSubmission>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSubmission {
    pub field_values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_definition_id: u64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    pub game_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub prize_pool: Option<String>,
    pub team_size: u32,
    pub rules: String,
    pub required_fields: Vec<NewFieldDefinition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFieldDefinition {
    pub field_name: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub owner_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_index: Option<u32>,
}

impl NewFieldDefinition {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        required: bool,
        owner: FieldOwner,
    ) -> Self {
        let (owner_kind, player_index) = match owner {
            FieldOwner::Team => ("TEAM".to_owned(), None),
            FieldOwner::Player(i) => ("PLAYER".to_owned(), Some(i)),
        };
        Self {
            field_name: name.into(),
            field_type,
            is_required: required,
            owner_kind,
            player_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing / pagination
// ---------------------------------------------------------------------------

/// One page of a backend listing. `number` is the zero-based page index.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u32,
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), number: 0, last: true }
    }
}

/// Lightweight tournament record for list views.
#[derive(Debug, Clone, Default)]
pub struct TournamentSummary {
    pub id: u64,
    pub name: String,
    pub game_name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub team_size: u32,
    pub status: TournamentStatus,
}

#[derive(Debug, Clone, Default)]
pub struct BaseLayout {
    pub id: u64,
    pub title: String,
    pub town_hall_level: u8,
    pub image_url: String,
    pub base_link: String,
    pub submitted_by: String,
}

// ---------------------------------------------------------------------------
// Users & auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == "ROLE_ADMIN")
    }
}

/// Result of a successful login. Some backend revisions include the user
/// record, some only the token.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    pub token: String,
    pub user: Option<User>,
}

// ---------------------------------------------------------------------------
// Mart: catalog, cart, coupons, orders, addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: Option<u64>,
}

/// Admin catalog entry creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CartLine {
    pub item: Item,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

/// The server-computed cart. Totals and discounts are never recomputed
/// client-side; every mutation replaces this record with the server's answer.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
    pub coupon_discount: f64,
    pub total: f64,
    pub applied_coupon: Option<Coupon>,
}

#[derive(Debug, Clone, Default)]
pub struct Coupon {
    pub code: String,
    pub description: String,
    /// Auto-applied "best deal" coupons cannot be removed manually.
    pub automatic: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CouponOffer {
    pub coupon: Coupon,
    /// For locked offers: why the coupon does not apply yet.
    pub message: Option<String>,
}

/// Coupons the backend surfaced for the current cart, split into those the
/// user can apply now and those gated behind some condition.
#[derive(Debug, Clone, Default)]
pub struct CouponDiscovery {
    pub eligible: Vec<CouponOffer>,
    pub locked: Vec<CouponOffer>,
}

#[derive(Debug, Clone, Default)]
pub struct Order {
    pub id: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub total: f64,
    pub status: String,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderLine {
    pub item_name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub address_id: u64,
    pub payment_method: String,
}

#[derive(Debug, Clone, Default)]
pub struct Address {
    pub id: u64,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u64, name: &str) -> TeamSlot {
        TeamSlot {
            registration_id: id,
            team_fields: vec![FieldEntry { name: "Team Name".into(), value: name.into() }],
        }
    }

    fn completed_match(round: u32, number: u32, a: u64, b: u64, winner: u64) -> Match {
        let winner_slot = if winner == a { slot(a, "A") } else { slot(b, "B") };
        Match {
            round,
            number,
            team_a: Some(slot(a, "A")),
            team_b: Some(slot(b, "B")),
            winner: Some(winner_slot),
            status: MatchStatus::Completed,
        }
    }

    #[test]
    fn rounds_places_every_match_in_exactly_one_bucket() {
        let t = Tournament {
            matches: vec![
                completed_match(2, 1, 5, 6, 5),
                completed_match(1, 2, 3, 4, 3),
                completed_match(1, 1, 1, 2, 1),
            ],
            ..Default::default()
        };
        let rounds = t.rounds();
        assert_eq!(rounds.len(), 2);
        let total: usize = rounds.values().map(Vec::len).sum();
        assert_eq!(total, t.matches.len());
    }

    #[test]
    fn rounds_orders_matches_by_match_number() {
        let t = Tournament {
            matches: vec![
                completed_match(1, 3, 5, 6, 5),
                completed_match(1, 1, 1, 2, 1),
                completed_match(1, 2, 3, 4, 3),
            ],
            ..Default::default()
        };
        let numbers: Vec<u32> = t.rounds()[&1].iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn empty_match_list_yields_empty_grouping_and_no_champion() {
        let t = Tournament { status: TournamentStatus::Completed, ..Default::default() };
        assert!(t.rounds().is_empty());
        assert_eq!(t.final_round(), None);
        assert!(t.final_match().unwrap().is_none());
        assert!(t.champion().is_none());
    }

    #[test]
    fn no_champion_unless_status_is_completed() {
        let t = Tournament {
            status: TournamentStatus::InProgress,
            matches: vec![completed_match(2, 1, 1, 2, 1)],
            ..Default::default()
        };
        assert!(t.champion().is_none());
    }

    #[test]
    fn no_champion_when_final_match_has_no_winner() {
        let t = Tournament {
            status: TournamentStatus::Completed,
            matches: vec![Match {
                round: 2,
                number: 1,
                team_a: Some(slot(1, "A")),
                team_b: Some(slot(2, "B")),
                winner: None,
                status: MatchStatus::Pending,
            }],
            ..Default::default()
        };
        assert!(t.champion().is_none());
    }

    #[test]
    fn champion_is_winner_of_the_max_round_single_match() {
        let t = Tournament {
            status: TournamentStatus::Completed,
            matches: vec![
                completed_match(1, 1, 1, 2, 1),
                completed_match(1, 2, 3, 4, 4),
                completed_match(2, 1, 1, 4, 4),
            ],
            ..Default::default()
        };
        assert_eq!(t.champion().map(|c| c.registration_id), Some(4));
    }

    #[test]
    fn ambiguous_final_round_is_rejected_not_guessed() {
        let t = Tournament {
            status: TournamentStatus::Completed,
            matches: vec![
                completed_match(3, 1, 1, 2, 1),
                completed_match(3, 2, 3, 4, 3),
            ],
            ..Default::default()
        };
        assert_eq!(
            t.final_match(),
            Err(BracketError::AmbiguousFinal { round: 3, matches: 2 })
        );
        assert!(t.champion().is_none());
    }

    #[test]
    fn bye_matches_are_never_awaiting_a_winner() {
        let m = Match {
            round: 1,
            number: 1,
            team_a: Some(slot(1, "A")),
            team_b: None,
            ..Default::default()
        };
        assert!(m.is_bye());
        assert!(!m.awaiting_winner());
    }

    #[test]
    fn awaiting_winner_requires_both_slots_and_no_result() {
        let open = Match {
            round: 1,
            number: 1,
            team_a: Some(slot(1, "A")),
            team_b: Some(slot(2, "B")),
            ..Default::default()
        };
        assert!(open.awaiting_winner());
        assert!(!completed_match(1, 1, 1, 2, 1).awaiting_winner());
    }

    #[test]
    fn slot_lookup_matches_registration_ids_only() {
        let m = completed_match(1, 1, 10, 20, 10);
        assert!(m.has_slot(10));
        assert!(m.has_slot(20));
        assert!(!m.has_slot(30));
        assert!(m.winner_is(10));
        assert!(!m.winner_is(20));
    }

    #[test]
    fn team_display_name_scans_for_a_name_field() {
        let s = TeamSlot {
            registration_id: 1,
            team_fields: vec![
                FieldEntry { name: "Clan Tag".into(), value: "#ABC".into() },
                FieldEntry { name: "Team Name".into(), value: "Alpha".into() },
            ],
        };
        assert_eq!(s.display_name(), "Alpha");
        assert_eq!(TeamSlot::default().display_name(), "Unnamed Team");
    }

    #[test]
    fn legacy_field_names_map_to_player_indexes() {
        assert_eq!(FieldOwner::from_legacy_name("Team Name"), FieldOwner::Team);
        assert_eq!(FieldOwner::from_legacy_name("Player 1 IGN"), FieldOwner::Player(0));
        assert_eq!(FieldOwner::from_legacy_name("player 12 tag"), FieldOwner::Player(11));
        assert_eq!(FieldOwner::from_legacy_name("Best Player Award"), FieldOwner::Team);
        assert_eq!(FieldOwner::from_legacy_name("Player 0 IGN"), FieldOwner::Team);
    }

    #[test]
    fn admin_role_check() {
        let u = User { roles: vec!["ROLE_USER".into(), "ROLE_ADMIN".into()], ..Default::default() };
        assert!(u.is_admin());
        assert!(!User::default().is_admin());
    }

    #[test]
    fn cart_line_total_is_price_times_quantity() {
        let line = CartLine {
            item: Item { price: 49.5, ..Default::default() },
            quantity: 3,
        };
        assert_eq!(line.line_total(), 148.5);
    }
}
