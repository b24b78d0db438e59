use crate::state::network::LoadingState;
use clashhub_api::{
    Address, BaseLayout, Cart, CouponDiscovery, Item, NewAddress, Order, OrderRequest, Page,
    RegistrationRequest, TeamRegistration, Tournament, TournamentSummary, User,
};

/// Which accumulating list a paged request/response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagedKind {
    Tournaments,
    Bases,
    Items,
}

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    Login { email: String, password: String },
    Logout,
    LoadTournaments { seq: u64, page: u32 },
    LoadTournament { id: u64 },
    RegisterTeam { tournament_id: u64, registration: RegistrationRequest },
    LoadRegistrations { tournament_id: u64 },
    StartTournament { id: u64 },
    DeclareWinner { tournament_id: u64, round: u32, match_number: u32, winner_team_id: u64 },
    LoadBases { seq: u64, page: u32, town_hall: u8 },
    LoadItems { seq: u64, page: u32, category: Option<u64> },
    LoadCart,
    AddCartItem { item_id: u64, quantity: u32 },
    UpdateCartItem { item_id: u64, quantity: u32 },
    RemoveCartItem { item_id: u64 },
    ApplyCoupon { code: String },
    RemoveCoupon,
    DiscoverCoupons,
    PlaceOrder { order: OrderRequest },
    LoadOrders,
    LoadAddresses,
    AddAddress { address: NewAddress },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LoggedIn { token: String, user: Option<User> },
    LoggedOut,
    TournamentsPageLoaded { seq: u64, page: Page<TournamentSummary> },
    /// The full tournament record; also the follow-up to a successful winner
    /// declaration, which re-fetches rather than patching locally.
    TournamentLoaded { tournament: Tournament },
    TeamRegistered { tournament_id: u64 },
    RegistrationsLoaded { registrations: Vec<TeamRegistration> },
    BasesPageLoaded { seq: u64, page: Page<BaseLayout> },
    ItemsPageLoaded { seq: u64, page: Page<Item> },
    CartUpdated { cart: Cart },
    CouponOffersLoaded { offers: CouponDiscovery },
    OrderPlaced { order: Order },
    OrdersLoaded { orders: Vec<Order> },
    AddressesLoaded { addresses: Vec<Address> },
    AddressAdded { address: Address },
    PageLoadFailed { list: PagedKind, seq: u64, message: String },
    WinnerDeclarationFailed { message: String },
    Error { message: String },
}
