use crate::session::Session;
use crate::state::bracket::BracketState;
use crate::state::cart::{CartState, CheckoutState};
use crate::state::dashboard::{DashboardLayout, WidgetKind, WidgetSize};
use crate::state::messages::{NetworkRequest, NetworkResponse, PagedKind};
use crate::state::network::LoadingState;
use crate::state::pagination::PagedList;
use crate::state::registration::RegistrationForm;
use crate::storage::Storage;
use clashhub_api::{
    BaseLayout, Cart, Item, Order, TeamRegistration, TournamentStatus, TournamentSummary,
};
use log::debug;

pub const DEFAULT_TOWN_HALL: u8 = 15;

/// Everything below the rendering layer. A UI calls the intent methods, sends
/// any [`NetworkRequest`] they return to the worker, and feeds each
/// [`NetworkResponse`] back through [`AppState::apply`].
pub struct AppState {
    storage: Storage,
    pub session: Session,
    pub loading: LoadingState,
    pub last_error: Option<String>,

    pub bracket: BracketState,
    pub registration: Option<RegistrationForm>,
    pub registrations: Vec<TeamRegistration>,

    pub tournaments: PagedList<TournamentSummary>,
    pub bases: PagedList<BaseLayout>,
    pub active_town_hall: u8,
    pub items: PagedList<Item>,
    pub active_category: Option<u64>,

    pub cart: CartState,
    pub checkout: CheckoutState,
    pub orders: Vec<Order>,

    pub dashboard: DashboardLayout,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_storage(Storage::new())
    }

    pub fn with_storage(storage: Storage) -> Self {
        let session = Session::load(&storage);
        let dashboard = DashboardLayout::load(&storage);
        Self {
            storage,
            session,
            loading: LoadingState::default(),
            last_error: None,
            bracket: BracketState::default(),
            registration: None,
            registrations: Vec::new(),
            tournaments: PagedList::default(),
            bases: PagedList::default(),
            active_town_hall: DEFAULT_TOWN_HALL,
            items: PagedList::default(),
            active_category: None,
            cart: CartState::default(),
            checkout: CheckoutState::default(),
            orders: Vec::new(),
            dashboard,
        }
    }

    // -- intents ------------------------------------------------------------

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) -> NetworkRequest {
        NetworkRequest::Login { email: email.into(), password: password.into() }
    }

    pub fn logout(&mut self) -> NetworkRequest {
        self.session.logout(&self.storage);
        NetworkRequest::Logout
    }

    pub fn load_more_tournaments(&mut self) -> Option<NetworkRequest> {
        let req = self.tournaments.next_request()?;
        Some(NetworkRequest::LoadTournaments { seq: req.seq, page: req.page })
    }

    pub fn load_more_bases(&mut self) -> Option<NetworkRequest> {
        let req = self.bases.next_request()?;
        Some(NetworkRequest::LoadBases {
            seq: req.seq,
            page: req.page,
            town_hall: self.active_town_hall,
        })
    }

    pub fn load_more_items(&mut self) -> Option<NetworkRequest> {
        let req = self.items.next_request()?;
        Some(NetworkRequest::LoadItems {
            seq: req.seq,
            page: req.page,
            category: self.active_category,
        })
    }

    /// Switch the town-hall filter: the base list starts over and any
    /// in-flight page for the old filter will be discarded on arrival.
    pub fn set_town_hall(&mut self, level: u8) -> Option<NetworkRequest> {
        if self.active_town_hall == level {
            return None;
        }
        self.active_town_hall = level;
        self.bases.reset();
        self.load_more_bases()
    }

    pub fn set_category(&mut self, category: Option<u64>) -> Option<NetworkRequest> {
        if self.active_category == category {
            return None;
        }
        self.active_category = category;
        self.items.reset();
        self.load_more_items()
    }

    pub fn open_tournament(&mut self, id: u64) -> NetworkRequest {
        self.registration = None;
        self.registrations.clear();
        NetworkRequest::LoadTournament { id }
    }

    pub fn declare_winner(
        &self,
        round: u32,
        match_number: u32,
        winner_team_id: u64,
    ) -> Option<NetworkRequest> {
        self.bracket.declare_winner(round, match_number, winner_team_id)
    }

    pub fn submit_registration(&mut self) -> Option<NetworkRequest> {
        let form = self.registration.as_mut()?;
        let registration = form.build()?;
        Some(NetworkRequest::RegisterTeam { tournament_id: form.tournament_id, registration })
    }

    pub fn place_order(&self) -> Option<NetworkRequest> {
        let order = self.checkout.order_request()?;
        Some(NetworkRequest::PlaceOrder { order })
    }

    pub fn add_widget(&mut self, kind: WidgetKind) -> bool {
        self.dashboard.add(&self.storage, kind)
    }

    pub fn remove_widget(&mut self, kind: WidgetKind) {
        self.dashboard.remove(&self.storage, kind);
    }

    pub fn set_widget_width(&mut self, kind: WidgetKind, width: WidgetSize) {
        self.dashboard.set_width(&self.storage, kind, width);
    }

    pub fn set_widget_height(&mut self, kind: WidgetKind, height: WidgetSize) {
        self.dashboard.set_height(&self.storage, kind, height);
    }

    // -- responses ----------------------------------------------------------

    /// Fold a worker response into the state. May return a follow-up request
    /// (e.g. reloading a tournament after a successful team registration).
    pub fn apply(&mut self, response: NetworkResponse) -> Option<NetworkRequest> {
        match response {
            NetworkResponse::LoadingStateChanged { loading_state } => {
                self.loading = loading_state;
            }
            NetworkResponse::LoggedIn { token, user } => {
                self.session.login(&self.storage, token, user);
            }
            NetworkResponse::LoggedOut => {
                self.session.logout(&self.storage);
            }
            NetworkResponse::TournamentsPageLoaded { seq, page } => {
                self.tournaments.apply(seq, page);
            }
            NetworkResponse::TournamentLoaded { tournament } => {
                self.registration = (tournament.status == TournamentStatus::RegistrationOpen
                    && !tournament.is_registered())
                .then(|| RegistrationForm::for_tournament(&tournament));
                self.bracket.load(tournament);
            }
            NetworkResponse::TeamRegistered { tournament_id } => {
                debug!("registration accepted for tournament {tournament_id}");
                self.registration = None;
                return Some(NetworkRequest::LoadTournament { id: tournament_id });
            }
            NetworkResponse::RegistrationsLoaded { registrations } => {
                self.registrations = registrations;
            }
            NetworkResponse::BasesPageLoaded { seq, page } => {
                self.bases.apply(seq, page);
            }
            NetworkResponse::ItemsPageLoaded { seq, page } => {
                self.items.apply(seq, page);
            }
            NetworkResponse::CartUpdated { cart } => {
                self.cart.update(cart);
            }
            NetworkResponse::CouponOffersLoaded { offers } => {
                self.cart.offers_loaded(offers);
            }
            NetworkResponse::OrderPlaced { order } => {
                self.orders.insert(0, order);
                self.cart.update(Cart::default());
                self.checkout.reset();
            }
            NetworkResponse::OrdersLoaded { orders } => {
                self.orders = orders;
            }
            NetworkResponse::AddressesLoaded { addresses } => {
                self.checkout.addresses_loaded(addresses);
            }
            NetworkResponse::AddressAdded { address } => {
                let id = address.id;
                self.checkout.addresses.push(address);
                self.checkout.select_address(id);
            }
            NetworkResponse::PageLoadFailed { list, seq, message } => match list {
                PagedKind::Tournaments => self.tournaments.fail(seq, message),
                PagedKind::Bases => self.bases.fail(seq, message),
                PagedKind::Items => self.items.fail(seq, message),
            },
            NetworkResponse::WinnerDeclarationFailed { message } => {
                self.bracket.fail(message);
            }
            NetworkResponse::Error { message } => {
                self.last_error = Some(message);
            }
        }
        None
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clashhub_api::{FieldEntry, Match, MatchStatus, Page, TeamSlot, Tournament};

    fn temp_state(tag: &str) -> AppState {
        let dir = std::env::temp_dir().join(format!(
            "clashhub-appstate-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        AppState::with_storage(Storage::at(dir))
    }

    fn slot(id: u64) -> TeamSlot {
        TeamSlot {
            registration_id: id,
            team_fields: vec![FieldEntry { name: "Team Name".into(), value: format!("T{id}") }],
        }
    }

    fn in_progress_tournament() -> Tournament {
        Tournament {
            id: 7,
            status: TournamentStatus::InProgress,
            matches: vec![Match {
                round: 1,
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
    fn declare_winner_round_trip_replaces_the_bracket_wholesale() {
        let mut state = temp_state("winner");
        state.apply(NetworkResponse::TournamentLoaded { tournament: in_progress_tournament() });

        let request = state.declare_winner(1, 1, 20).unwrap();
        assert!(matches!(request, NetworkRequest::DeclareWinner { winner_team_id: 20, .. }));

        // The worker POSTs, then re-fetches; the response is the full record.
        let mut updated = in_progress_tournament();
        updated.matches[0].winner = Some(slot(20));
        updated.matches[0].status = MatchStatus::Completed;
        updated.status = TournamentStatus::Completed;
        state.apply(NetworkResponse::TournamentLoaded { tournament: updated });

        assert_eq!(state.bracket.champion().map(|c| c.registration_id), Some(20));
        // The decided match no longer offers the action.
        assert!(state.declare_winner(1, 1, 10).is_none());
    }

    #[test]
    fn failed_declaration_keeps_the_old_bracket_and_surfaces_the_message() {
        let mut state = temp_state("winner-fail");
        state.apply(NetworkResponse::TournamentLoaded { tournament: in_progress_tournament() });

        state.apply(NetworkResponse::WinnerDeclarationFailed {
            message: "Winner already declared for this match.".into(),
        });

        assert!(state.bracket.tournament.is_some());
        assert_eq!(
            state.bracket.error.as_deref(),
            Some("Winner already declared for this match.")
        );
        assert!(state.declare_winner(1, 1, 20).is_some());
    }

    #[test]
    fn town_hall_filter_change_restarts_the_base_list_and_drops_stale_pages() {
        let mut state = temp_state("filter");

        let first = state.load_more_bases().unwrap();
        let NetworkRequest::LoadBases { seq: stale_seq, page: 0, .. } = first else {
            panic!("expected a page-0 request, got {first:?}");
        };

        let switched = state.set_town_hall(13).unwrap();
        let NetworkRequest::LoadBases { seq: fresh_seq, page: 0, town_hall: 13 } = switched else {
            panic!("expected a fresh TH13 request, got {switched:?}");
        };

        // The old filter's response lands late and is discarded.
        state.apply(NetworkResponse::BasesPageLoaded {
            seq: stale_seq,
            page: Page { items: vec![BaseLayout::default()], number: 0, last: false },
        });
        assert!(state.bases.items().is_empty());

        state.apply(NetworkResponse::BasesPageLoaded {
            seq: fresh_seq,
            page: Page {
                items: vec![BaseLayout { town_hall_level: 13, ..Default::default() }],
                number: 0,
                last: true,
            },
        });
        assert_eq!(state.bases.items().len(), 1);
        assert!(!state.bases.has_more());
    }

    #[test]
    fn setting_the_same_filter_is_a_no_op() {
        let mut state = temp_state("filter-noop");
        assert!(state.set_town_hall(DEFAULT_TOWN_HALL).is_none());
        assert!(state.set_category(None).is_none());
    }

    #[test]
    fn open_registration_seeds_a_form_unless_already_registered() {
        let mut state = temp_state("registration");

        let mut open = Tournament {
            id: 3,
            status: TournamentStatus::RegistrationOpen,
            ..Default::default()
        };
        state.apply(NetworkResponse::TournamentLoaded { tournament: open.clone() });
        assert!(state.registration.is_some());

        open.my_registration = Some(TeamRegistration::default());
        state.apply(NetworkResponse::TournamentLoaded { tournament: open });
        assert!(state.registration.is_none());
    }

    #[test]
    fn successful_registration_triggers_a_tournament_reload() {
        let mut state = temp_state("registered");
        let follow_up = state.apply(NetworkResponse::TeamRegistered { tournament_id: 3 });
        assert!(matches!(follow_up, Some(NetworkRequest::LoadTournament { id: 3 })));
        assert!(state.registration.is_none());
    }

    #[test]
    fn placing_an_order_clears_cart_and_checkout() {
        let mut state = temp_state("order");
        state.apply(NetworkResponse::CartUpdated {
            cart: Cart { total: 90.0, ..Default::default() },
        });

        state.apply(NetworkResponse::OrderPlaced {
            order: Order { id: 44, total: 90.0, ..Default::default() },
        });

        assert_eq!(state.orders.first().map(|o| o.id), Some(44));
        assert_eq!(state.cart.cart.total, 0.0);
        assert!(state.checkout.order_request().is_none());
    }

    #[test]
    fn generic_errors_land_in_last_error() {
        let mut state = temp_state("error");
        state.apply(NetworkResponse::Error { message: "offline".into() });
        assert_eq!(state.last_error.as_deref(), Some("offline"));
    }
}
