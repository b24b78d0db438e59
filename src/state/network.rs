use crate::session::Session;
use crate::state::messages::{NetworkRequest, NetworkResponse, PagedKind};
use clashhub_api::client::{ApiError, HubApi};
use log::{debug, error};
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
}

/// Owns the API client and serializes all backend traffic: requests come in
/// over one channel, responses go out over another. One worker per session.
pub struct NetworkWorker {
    client: HubApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: HubApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses }
    }

    /// Resume a persisted login: attach the rehydrated token to the client so
    /// every request issued before the next interactive login is
    /// authenticated.
    pub fn with_session(
        mut client: HubApi,
        session: &Session,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        client.set_token(session.token().map(str::to_owned));
        Self::new(client, requests, responses)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let _ = self
                .responses
                .send(NetworkResponse::LoadingStateChanged {
                    loading_state: LoadingState { is_loading: true },
                })
                .await;

            let result = self.handle(&request).await;
            debug!("network request complete");

            let _ = self
                .responses
                .send(NetworkResponse::LoadingStateChanged {
                    loading_state: LoadingState { is_loading: false },
                })
                .await;

            let response =
                result.unwrap_or_else(|err| failure_response(&request, err.to_string()));

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle(&mut self, request: &NetworkRequest) -> Result<NetworkResponse, ApiError> {
        match request {
            NetworkRequest::Login { email, password } => {
                debug!("logging in as {email}");
                let session = self.client.login(email, password).await?;
                self.client.set_token(Some(session.token.clone()));
                Ok(NetworkResponse::LoggedIn { token: session.token, user: session.user })
            }
            NetworkRequest::Logout => {
                self.client.set_token(None);
                Ok(NetworkResponse::LoggedOut)
            }
            NetworkRequest::LoadTournaments { seq, page } => {
                debug!("loading tournaments page {page}");
                let page = self.client.fetch_tournaments(*page, PAGE_SIZE).await?;
                Ok(NetworkResponse::TournamentsPageLoaded { seq: *seq, page })
            }
            NetworkRequest::LoadTournament { id } => {
                debug!("loading tournament {id}");
                let tournament = self.client.fetch_tournament(*id).await?;
                Ok(NetworkResponse::TournamentLoaded { tournament })
            }
            NetworkRequest::RegisterTeam { tournament_id, registration } => {
                debug!("registering team for tournament {tournament_id}");
                self.client.register_team(*tournament_id, registration).await?;
                Ok(NetworkResponse::TeamRegistered { tournament_id: *tournament_id })
            }
            NetworkRequest::LoadRegistrations { tournament_id } => {
                let registrations = self.client.fetch_registrations(*tournament_id).await?;
                Ok(NetworkResponse::RegistrationsLoaded { registrations })
            }
            NetworkRequest::StartTournament { id } => {
                debug!("starting tournament {id}");
                self.client.start_tournament(*id).await?;
                let tournament = self.client.fetch_tournament(*id).await?;
                Ok(NetworkResponse::TournamentLoaded { tournament })
            }
            NetworkRequest::DeclareWinner {
                tournament_id,
                round,
                match_number,
                winner_team_id,
            } => {
                debug!(
                    "declaring winner {winner_team_id} for tournament {tournament_id} \
                     round {round} match {match_number}"
                );
                self.client
                    .declare_winner(*tournament_id, *round, *match_number, *winner_team_id)
                    .await?;
                // The server owns bracket progression; re-fetch the whole
                // tournament rather than patching the local copy.
                let tournament = self.client.fetch_tournament(*tournament_id).await?;
                Ok(NetworkResponse::TournamentLoaded { tournament })
            }
            NetworkRequest::LoadBases { seq, page, town_hall } => {
                debug!("loading base layouts page {page} (TH{town_hall})");
                let page = self
                    .client
                    .fetch_base_layouts(*page, PAGE_SIZE, *town_hall)
                    .await?;
                Ok(NetworkResponse::BasesPageLoaded { seq: *seq, page })
            }
            NetworkRequest::LoadItems { seq, page, category } => {
                debug!("loading mart items page {page}");
                let page = self.client.fetch_items(*page, PAGE_SIZE, *category).await?;
                Ok(NetworkResponse::ItemsPageLoaded { seq: *seq, page })
            }
            NetworkRequest::LoadCart => {
                let cart = self.client.fetch_cart().await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::AddCartItem { item_id, quantity } => {
                let cart = self.client.add_cart_item(*item_id, *quantity).await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::UpdateCartItem { item_id, quantity } => {
                let cart = self.client.update_cart_item(*item_id, *quantity).await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::RemoveCartItem { item_id } => {
                let cart = self.client.remove_cart_item(*item_id).await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::ApplyCoupon { code } => {
                debug!("applying coupon {code}");
                let cart = self.client.apply_coupon(code).await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::RemoveCoupon => {
                let cart = self.client.remove_coupon().await?;
                Ok(NetworkResponse::CartUpdated { cart })
            }
            NetworkRequest::DiscoverCoupons => {
                let offers = self.client.discover_coupons().await?;
                Ok(NetworkResponse::CouponOffersLoaded { offers })
            }
            NetworkRequest::PlaceOrder { order } => {
                debug!("placing order for address {}", order.address_id);
                let order = self.client.create_order(order).await?;
                Ok(NetworkResponse::OrderPlaced { order })
            }
            NetworkRequest::LoadOrders => {
                let orders = self.client.fetch_orders().await?;
                Ok(NetworkResponse::OrdersLoaded { orders })
            }
            NetworkRequest::LoadAddresses => {
                let addresses = self.client.fetch_addresses().await?;
                Ok(NetworkResponse::AddressesLoaded { addresses })
            }
            NetworkRequest::AddAddress { address } => {
                let address = self.client.add_address(address).await?;
                Ok(NetworkResponse::AddressAdded { address })
            }
        }
    }
}

const PAGE_SIZE: u32 = 10;

/// Route a failure back to the state that issued the request, so paged lists
/// and the bracket keep their error handling local. Everything else becomes a
/// generic error banner.
fn failure_response(request: &NetworkRequest, message: String) -> NetworkResponse {
    match request {
        NetworkRequest::LoadTournaments { seq, .. } => NetworkResponse::PageLoadFailed {
            list: PagedKind::Tournaments,
            seq: *seq,
            message,
        },
        NetworkRequest::LoadBases { seq, .. } => {
            NetworkResponse::PageLoadFailed { list: PagedKind::Bases, seq: *seq, message }
        }
        NetworkRequest::LoadItems { seq, .. } => {
            NetworkResponse::PageLoadFailed { list: PagedKind::Items, seq: *seq, message }
        }
        NetworkRequest::DeclareWinner { .. } => {
            NetworkResponse::WinnerDeclarationFailed { message }
        }
        _ => NetworkResponse::Error { message },
    }
}
