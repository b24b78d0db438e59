use crate::state::messages::NetworkRequest;
use clashhub_api::{BracketError, Match, TeamSlot, Tournament};
use log::warn;
use std::collections::BTreeMap;

/// View state for one tournament's bracket. The tournament record is only
/// ever replaced wholesale by a fresh fetch; a failed winner declaration
/// leaves it untouched and parks the server's message in `error`.
#[derive(Debug, Default)]
pub struct BracketState {
    pub tournament: Option<Tournament>,
    pub error: Option<String>,
}

impl BracketState {
    pub fn load(&mut self, tournament: Tournament) {
        if let Err(BracketError::AmbiguousFinal { round, matches }) = tournament.final_match() {
            warn!(
                "tournament {} has {matches} matches in final round {round}; \
                 champion will not be shown",
                tournament.id
            );
        }
        self.error = None;
        self.tournament = Some(tournament);
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn rounds(&self) -> BTreeMap<u32, Vec<&Match>> {
        self.tournament
            .as_ref()
            .map(Tournament::rounds)
            .unwrap_or_default()
    }

    pub fn champion(&self) -> Option<&TeamSlot> {
        self.tournament.as_ref()?.champion()
    }

    /// Build the winner-declaration request, but only when the match is
    /// actually awaiting one and the chosen team occupies one of its slots.
    /// Returns `None` otherwise; the server re-checks regardless.
    pub fn declare_winner(
        &self,
        round: u32,
        match_number: u32,
        winner_team_id: u64,
    ) -> Option<NetworkRequest> {
        let tournament = self.tournament.as_ref()?;
        let m = tournament.find_match(round, match_number)?;
        if !m.awaiting_winner() || !m.has_slot(winner_team_id) {
            return None;
        }
        Some(NetworkRequest::DeclareWinner {
            tournament_id: tournament.id,
            round,
            match_number,
            winner_team_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clashhub_api::{FieldEntry, MatchStatus, TournamentStatus};

    fn slot(id: u64) -> TeamSlot {
        TeamSlot {
            registration_id: id,
            team_fields: vec![FieldEntry { name: "Team Name".into(), value: format!("T{id}") }],
        }
    }

    fn tournament_with_open_final() -> Tournament {
        Tournament {
            id: 7,
            status: TournamentStatus::InProgress,
            matches: vec![Match {
                round: 2,
                number: 1,
                team_a: Some(slot(10)),
                team_b: Some(slot(20)),
                winner: None,
                status: MatchStatus::Pending,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn declare_winner_builds_the_request_for_a_valid_pick() {
        let mut bracket = BracketState::default();
        bracket.load(tournament_with_open_final());

        let request = bracket.declare_winner(2, 1, 20).unwrap();
        assert!(matches!(
            request,
            NetworkRequest::DeclareWinner {
                tournament_id: 7,
                round: 2,
                match_number: 1,
                winner_team_id: 20,
            }
        ));
    }

    #[test]
    fn declare_winner_refuses_a_team_not_in_the_match() {
        let mut bracket = BracketState::default();
        bracket.load(tournament_with_open_final());
        assert!(bracket.declare_winner(2, 1, 99).is_none());
    }

    #[test]
    fn declare_winner_refuses_a_decided_match() {
        let mut t = tournament_with_open_final();
        t.matches[0].winner = Some(slot(10));
        t.matches[0].status = MatchStatus::Completed;

        let mut bracket = BracketState::default();
        bracket.load(t);
        assert!(bracket.declare_winner(2, 1, 20).is_none());
    }

    #[test]
    fn failure_leaves_the_loaded_bracket_untouched() {
        let mut bracket = BracketState::default();
        bracket.load(tournament_with_open_final());

        bracket.fail("Winner already declared for this match.".into());
        assert_eq!(bracket.error.as_deref(), Some("Winner already declared for this match."));
        assert!(bracket.tournament.is_some());
        assert!(bracket.declare_winner(2, 1, 20).is_some());
    }

    #[test]
    fn fresh_load_clears_a_previous_error() {
        let mut bracket = BracketState::default();
        bracket.fail("boom".into());
        bracket.load(tournament_with_open_final());
        assert!(bracket.error.is_none());
    }
}
