use crate::wire::{
    AddCartItemRequest, AddressWire, ApplyCouponRequest, BaseLayoutWire, CartLineWire, CartWire,
    CategoryWire, CouponDiscoveryWire, CouponOfferWire, CouponWire, DeclareWinnerRequest,
    FieldDefinitionWire, FieldEntryWire, ItemWire, LoginRequest, LoginResponse, MatchWire,
    OrderLineWire, OrderWire, PageEnvelope, RegisterUserRequest, RegistrationWire,
    SubmitBaseRequest, TeamSlotWire, TournamentWire, UpdateCartItemRequest, UserWire,
};
use crate::{
    Address, AuthSession, BaseLayout, Cart, CartLine, Category, Coupon, CouponDiscovery,
    CouponOffer, FieldDefinition, FieldEntry, FieldOwner, FieldType, Item, Match, MatchStatus,
    NewAddress, NewItem, NewTournament, Order, OrderLine, OrderRequest, Page, PlayerEntry,
    RegistrationRequest, TeamRegistration, TeamSlot, Tournament, TournamentStatus,
    TournamentSummary, User,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("request failed for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected the request. `message` is the server-provided
    /// body when present, so it can be surfaced verbatim to the user.
    #[error("{message}")]
    Rejected {
        url: String,
        status: StatusCode,
        message: String,
    },

    /// Response body did not decode as the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response decoded but a field the client cannot proceed without was absent.
    #[error("response from {url} is missing `{field}`")]
    Incomplete { url: String, field: &'static str },
}

/// ClashHub platform client. Cheap to clone; the bearer token travels with
/// the clone, so hand one instance per session owner.
#[derive(Debug, Clone)]
pub struct HubApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    token: Option<String>,
}

impl Default for HubApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HubApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::builder()
                .user_agent("clashhub/0.1 (community platform client)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
            token: None,
        }
    }

    /// Replace the session token attached to every subsequent request.
    /// `None` drops authentication (logout).
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -- auth ---------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let url = format!("{}/auth/login", self.base_url);
        let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        let raw: LoginResponse = self.send_json(self.client.post(&url).json(&body), &url).await?;
        let token = raw
            .token
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Incomplete { url, field: "token" })?;
        Ok(AuthSession { token, user: raw.user.map(map_user) })
    }

    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        let url = format!("{}/users", self.base_url);
        let body = RegisterUserRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.send_unit(self.client.post(&url).json(&body), &url).await
    }

    // -- tournaments --------------------------------------------------------

    pub async fn fetch_tournaments(
        &self,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<TournamentSummary>> {
        let url = format!(
            "{}/tournaments?page={page}&size={size}&sort=startDate,asc",
            self.base_url
        );
        let raw: PageEnvelope<TournamentWire> = self.get(&url).await?;
        Ok(map_page(raw, page, map_summary))
    }

    pub async fn fetch_tournament(&self, id: u64) -> ApiResult<Tournament> {
        let url = format!("{}/tournaments/{id}", self.base_url);
        let raw: TournamentWire = self.get(&url).await?;
        Ok(map_tournament(raw))
    }

    pub async fn create_tournament(&self, tournament: &NewTournament) -> ApiResult<Tournament> {
        let url = format!("{}/tournaments", self.base_url);
        let raw: TournamentWire =
            self.send_json(self.client.post(&url).json(tournament), &url).await?;
        Ok(map_tournament(raw))
    }

    pub async fn register_team(
        &self,
        tournament_id: u64,
        registration: &RegistrationRequest,
    ) -> ApiResult<()> {
        let url = format!("{}/tournaments/{tournament_id}/register", self.base_url);
        self.send_unit(self.client.post(&url).json(registration), &url).await
    }

    pub async fn fetch_registrations(
        &self,
        tournament_id: u64,
    ) -> ApiResult<Vec<TeamRegistration>> {
        let url = format!("{}/tournaments/{tournament_id}/registrations", self.base_url);
        let raw: Vec<RegistrationWire> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_registration).collect())
    }

    /// Kick off the tournament; the backend generates the bracket.
    pub async fn start_tournament(&self, tournament_id: u64) -> ApiResult<()> {
        let url = format!("{}/tournaments/{tournament_id}/start", self.base_url);
        self.send_unit(self.client.post(&url).json(&serde_json::json!({})), &url).await
    }

    /// Record the winner of one match. Callers re-fetch the tournament
    /// afterwards; this call never returns the updated bracket.
    pub async fn declare_winner(
        &self,
        tournament_id: u64,
        round: u32,
        match_number: u32,
        winner_team_id: u64,
    ) -> ApiResult<()> {
        let url = format!(
            "{}/tournaments/{tournament_id}/rounds/{round}/matches/{match_number}/winner",
            self.base_url
        );
        let body = DeclareWinnerRequest { winner_team_id };
        self.send_unit(self.client.post(&url).json(&body), &url).await
    }

    // -- base layouts -------------------------------------------------------

    pub async fn fetch_base_layouts(
        &self,
        page: u32,
        size: u32,
        town_hall: u8,
    ) -> ApiResult<Page<BaseLayout>> {
        let url = format!(
            "{}/bases?page={page}&size={size}&townhallLevel={town_hall}&sort=id,desc",
            self.base_url
        );
        let raw: PageEnvelope<BaseLayoutWire> = self.get(&url).await?;
        Ok(map_page(raw, page, map_base_layout))
    }

    pub async fn fetch_my_bases(&self, page: u32, size: u32) -> ApiResult<Page<BaseLayout>> {
        let url = format!(
            "{}/bases/my-bases?page={page}&size={size}&sort=id,desc",
            self.base_url
        );
        let raw: PageEnvelope<BaseLayoutWire> = self.get(&url).await?;
        Ok(map_page(raw, page, map_base_layout))
    }

    pub async fn submit_base(&self, base: &SubmitBaseRequest) -> ApiResult<BaseLayout> {
        let url = format!("{}/bases", self.base_url);
        let raw: BaseLayoutWire = self.send_json(self.client.post(&url).json(base), &url).await?;
        Ok(map_base_layout(raw))
    }

    /// Moderation queue: submitted layouts awaiting admin review.
    pub async fn fetch_pending_bases(&self, page: u32, size: u32) -> ApiResult<Page<BaseLayout>> {
        let url = format!(
            "{}/bases/pending?page={page}&size={size}&sort=id,desc",
            self.base_url
        );
        let raw: PageEnvelope<BaseLayoutWire> = self.get(&url).await?;
        Ok(map_page(raw, page, map_base_layout))
    }

    pub async fn approve_base(&self, id: u64) -> ApiResult<()> {
        let url = format!("{}/bases/{id}/approve", self.base_url);
        self.send_unit(self.client.post(&url).json(&serde_json::json!({})), &url).await
    }

    pub async fn reject_base(&self, id: u64) -> ApiResult<()> {
        let url = format!("{}/bases/{id}/reject", self.base_url);
        self.send_unit(self.client.post(&url).json(&serde_json::json!({})), &url).await
    }

    // -- mart catalog -------------------------------------------------------

    pub async fn fetch_categories(&self) -> ApiResult<Vec<Category>> {
        let url = format!("{}/api/mart/categories", self.base_url);
        let raw: Vec<CategoryWire> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_category).collect())
    }

    pub async fn create_category(&self, name: &str) -> ApiResult<Category> {
        let url = format!("{}/api/mart/categories", self.base_url);
        let body = serde_json::json!({ "name": name });
        let raw: CategoryWire = self.send_json(self.client.post(&url).json(&body), &url).await?;
        Ok(map_category(raw))
    }

    pub async fn fetch_items(
        &self,
        page: u32,
        size: u32,
        category: Option<u64>,
    ) -> ApiResult<Page<Item>> {
        let url = match category {
            Some(id) => format!(
                "{}/api/mart/categories/{id}/items?page={page}&size={size}",
                self.base_url
            ),
            None => format!("{}/api/mart/items?page={page}&size={size}", self.base_url),
        };
        let raw: PageEnvelope<ItemWire> = self.get(&url).await?;
        Ok(map_page(raw, page, map_item))
    }

    pub async fn fetch_item(&self, id: u64) -> ApiResult<Item> {
        let url = format!("{}/api/mart/items/{id}", self.base_url);
        let raw: ItemWire = self.get(&url).await?;
        Ok(map_item(raw))
    }

    pub async fn create_item(&self, item: &NewItem) -> ApiResult<Item> {
        let url = format!("{}/api/mart/items", self.base_url);
        let raw: ItemWire = self.send_json(self.client.post(&url).json(item), &url).await?;
        Ok(map_item(raw))
    }

    // -- cart & coupons -----------------------------------------------------

    pub async fn fetch_cart(&self) -> ApiResult<Cart> {
        let url = format!("{}/api/cart", self.base_url);
        let raw: CartWire = self.get(&url).await?;
        Ok(map_cart(raw))
    }

    pub async fn add_cart_item(&self, item_id: u64, quantity: u32) -> ApiResult<Cart> {
        let url = format!("{}/api/cart/items", self.base_url);
        let body = AddCartItemRequest { item_id, quantity };
        let raw: CartWire = self.send_json(self.client.post(&url).json(&body), &url).await?;
        Ok(map_cart(raw))
    }

    pub async fn update_cart_item(&self, item_id: u64, quantity: u32) -> ApiResult<Cart> {
        let url = format!("{}/api/cart/items/{item_id}", self.base_url);
        let body = UpdateCartItemRequest { quantity };
        let raw: CartWire = self.send_json(self.client.patch(&url).json(&body), &url).await?;
        Ok(map_cart(raw))
    }

    pub async fn remove_cart_item(&self, item_id: u64) -> ApiResult<Cart> {
        let url = format!("{}/api/cart/items/{item_id}", self.base_url);
        let raw: CartWire = self.send_json(self.client.delete(&url), &url).await?;
        Ok(map_cart(raw))
    }

    pub async fn apply_coupon(&self, code: &str) -> ApiResult<Cart> {
        let url = format!("{}/api/cart/apply-coupon", self.base_url);
        let body = ApplyCouponRequest { code: code.to_owned() };
        let raw: CartWire = self.send_json(self.client.post(&url).json(&body), &url).await?;
        Ok(map_cart(raw))
    }

    pub async fn remove_coupon(&self) -> ApiResult<Cart> {
        let url = format!("{}/api/cart/coupon", self.base_url);
        let raw: CartWire = self.send_json(self.client.delete(&url), &url).await?;
        Ok(map_cart(raw))
    }

    pub async fn discover_coupons(&self) -> ApiResult<CouponDiscovery> {
        let url = format!("{}/api/cart/discover-coupons", self.base_url);
        let raw: CouponDiscoveryWire = self.get(&url).await?;
        Ok(map_discovery(raw))
    }

    // -- orders & addresses -------------------------------------------------

    pub async fn create_order(&self, order: &OrderRequest) -> ApiResult<Order> {
        let url = format!("{}/api/orders", self.base_url);
        let raw: OrderWire = self.send_json(self.client.post(&url).json(order), &url).await?;
        Ok(map_order(raw))
    }

    pub async fn fetch_orders(&self) -> ApiResult<Vec<Order>> {
        let url = format!("{}/api/orders", self.base_url);
        let raw: Vec<OrderWire> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_order).collect())
    }

    /// Latest orders across all users, for the admin dashboard.
    pub async fn fetch_recent_orders(&self) -> ApiResult<Vec<Order>> {
        let url = format!("{}/api/orders/recent", self.base_url);
        let raw: Vec<OrderWire> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_order).collect())
    }

    pub async fn update_order_status(&self, id: u64, status: &str) -> ApiResult<Order> {
        let url = format!("{}/api/orders/{id}/status", self.base_url);
        let body = serde_json::json!({ "status": status });
        let raw: OrderWire = self.send_json(self.client.patch(&url).json(&body), &url).await?;
        Ok(map_order(raw))
    }

    pub async fn fetch_addresses(&self) -> ApiResult<Vec<Address>> {
        let url = format!("{}/api/addresses", self.base_url);
        let raw: Vec<AddressWire> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_address).collect())
    }

    pub async fn add_address(&self, address: &NewAddress) -> ApiResult<Address> {
        let url = format!("{}/api/addresses", self.base_url);
        let raw: AddressWire = self.send_json(self.client.post(&url).json(address), &url).await?;
        Ok(map_address(raw))
    }

    // -- plumbing -----------------------------------------------------------

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.send_json(self.client.get(url), url).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> ApiResult<T> {
        let response = self.execute(builder, url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode { url: url.to_owned(), source: e })
    }

    async fn send_unit(&self, builder: RequestBuilder, url: &str) -> ApiResult<()> {
        self.execute(builder, url).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder, url: &str) -> ApiResult<reqwest::Response> {
        let mut builder = builder.timeout(self.timeout);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Http { url: url.to_owned(), source: e })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Surface the server's own message when it sent one.
        let message = response
            .text()
            .await
            .ok()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Err(ApiError::Rejected { url: url.to_owned(), status, message })
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_page<W, T>(raw: PageEnvelope<W>, requested_page: u32, f: fn(W) -> T) -> Page<T> {
    Page {
        items: raw.content.unwrap_or_default().into_iter().map(f).collect(),
        number: raw.number.unwrap_or(requested_page),
        // A missing flag must not strand the pagination helper in a
        // fetch-forever loop; treat it as the last page.
        last: raw.last.unwrap_or(true),
    }
}

fn map_tournament(raw: TournamentWire) -> Tournament {
    Tournament {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        game_name: raw.game_name.unwrap_or_default(),
        start_date: raw.start_date.as_deref().and_then(parse_date),
        prize_pool: raw.prize_pool.filter(|p| !p.is_empty()),
        team_size: raw.team_size.unwrap_or_default(),
        rules: raw.rules.unwrap_or_default(),
        status: parse_tournament_status(raw.status.as_deref().unwrap_or_default()),
        required_fields: raw
            .required_fields
            .unwrap_or_default()
            .into_iter()
            .map(map_field_definition)
            .collect(),
        matches: raw.matches.unwrap_or_default().iter().map(map_match).collect(),
        my_registration: raw.my_registration.map(map_registration),
    }
}

fn map_summary(raw: TournamentWire) -> TournamentSummary {
    TournamentSummary {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        game_name: raw.game_name.unwrap_or_default(),
        start_date: raw.start_date.as_deref().and_then(parse_date),
        team_size: raw.team_size.unwrap_or_default(),
        status: parse_tournament_status(raw.status.as_deref().unwrap_or_default()),
    }
}

fn map_match(raw: &MatchWire) -> Match {
    Match {
        round: raw.round_number.unwrap_or(1),
        number: raw.match_number.unwrap_or(1),
        team_a: raw.team_a.as_ref().and_then(map_slot),
        team_b: raw.team_b.as_ref().and_then(map_slot),
        winner: raw.winner.as_ref().and_then(map_slot),
        status: parse_match_status(raw.status.as_deref().unwrap_or_default()),
    }
}

/// A slot without a registration id is an unfilled bracket position (bye).
fn map_slot(raw: &TeamSlotWire) -> Option<TeamSlot> {
    let registration_id = raw.registration_id?;
    Some(TeamSlot {
        registration_id,
        team_fields: raw
            .team_fields
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(map_field_entry)
            .collect(),
    })
}

fn map_field_entry(raw: FieldEntryWire) -> FieldEntry {
    FieldEntry {
        name: raw.field_name.unwrap_or_default(),
        value: raw.value.unwrap_or_default(),
    }
}

fn map_field_definition(raw: FieldDefinitionWire) -> FieldDefinition {
    let name = raw.field_name.unwrap_or_default();
    let owner = match raw.owner {
        Some(w) if w.kind.as_deref() == Some("PLAYER") => {
            FieldOwner::Player(w.player_index.unwrap_or(0))
        }
        Some(_) => FieldOwner::Team,
        // Older backend revisions: ownership is encoded in the field name.
        None => FieldOwner::from_legacy_name(&name),
    };
    FieldDefinition {
        id: raw.id.unwrap_or_default(),
        field_type: match raw.field_type.as_deref() {
            Some("NUMBER") => FieldType::Number,
            _ => FieldType::Text,
        },
        required: raw.is_required.unwrap_or(false),
        owner,
        name,
    }
}

fn map_registration(raw: RegistrationWire) -> TeamRegistration {
    TeamRegistration {
        id: raw.id.unwrap_or_default(),
        team_fields: raw
            .team_fields
            .unwrap_or_default()
            .into_iter()
            .map(map_field_entry)
            .collect(),
        players: raw
            .player_submissions
            .unwrap_or_default()
            .into_iter()
            .map(|p| PlayerEntry {
                fields: p
                    .field_values
                    .unwrap_or_default()
                    .into_iter()
                    .map(map_field_entry)
                    .collect(),
            })
            .collect(),
    }
}

fn map_user(raw: UserWire) -> User {
    User {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
        roles: raw.roles.unwrap_or_default(),
    }
}

fn map_base_layout(raw: BaseLayoutWire) -> BaseLayout {
    BaseLayout {
        id: raw.id.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        town_hall_level: raw.townhall_level.unwrap_or_default(),
        image_url: raw.image_url.unwrap_or_default(),
        base_link: raw.base_link.unwrap_or_default(),
        submitted_by: raw.submitted_by_username.unwrap_or_default(),
    }
}

fn map_category(raw: CategoryWire) -> Category {
    Category { id: raw.id.unwrap_or_default(), name: raw.name.unwrap_or_default() }
}

fn map_item(raw: ItemWire) -> Item {
    Item {
        id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        price: raw.price.unwrap_or_default(),
        image_url: raw.image_url,
        category_id: raw.category_id,
    }
}

fn map_cart(raw: CartWire) -> Cart {
    Cart {
        lines: raw
            .items
            .unwrap_or_default()
            .into_iter()
            .map(map_cart_line)
            .collect(),
        subtotal: raw.subtotal.unwrap_or_default(),
        coupon_discount: raw.coupon_discount.unwrap_or_default(),
        total: raw.total.unwrap_or_default(),
        applied_coupon: raw.applied_coupon.map(map_coupon),
    }
}

fn map_cart_line(raw: CartLineWire) -> CartLine {
    CartLine {
        item: raw.item.map(map_item).unwrap_or_default(),
        quantity: raw.quantity.unwrap_or(1),
    }
}

fn map_coupon(raw: CouponWire) -> Coupon {
    Coupon {
        code: raw.code.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        automatic: raw.automatic.unwrap_or(false),
    }
}

fn map_offer(raw: CouponOfferWire) -> CouponOffer {
    CouponOffer {
        coupon: raw.coupon.map(map_coupon).unwrap_or_default(),
        message: raw.message.filter(|m| !m.is_empty()),
    }
}

fn map_discovery(raw: CouponDiscoveryWire) -> CouponDiscovery {
    CouponDiscovery {
        eligible: raw
            .eligible_offers
            .unwrap_or_default()
            .into_iter()
            .map(map_offer)
            .collect(),
        locked: raw
            .locked_offers
            .unwrap_or_default()
            .into_iter()
            .map(map_offer)
            .collect(),
    }
}

fn map_order(raw: OrderWire) -> Order {
    Order {
        id: raw.id.unwrap_or_default(),
        created_at: raw.created_at.as_deref().and_then(parse_date),
        total: raw.total.unwrap_or_default(),
        status: raw.status.unwrap_or_default(),
        lines: raw
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|l: OrderLineWire| OrderLine {
                item_name: l.item_name.unwrap_or_default(),
                quantity: l.quantity.unwrap_or(1),
                price: l.price.unwrap_or_default(),
            })
            .collect(),
    }
}

fn map_address(raw: AddressWire) -> Address {
    Address {
        id: raw.id.unwrap_or_default(),
        line1: raw.line1.unwrap_or_default(),
        line2: raw.line2.filter(|l| !l.is_empty()),
        city: raw.city.unwrap_or_default(),
        state: raw.state.unwrap_or_default(),
        postal_code: raw.postal_code.unwrap_or_default(),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_tournament_status(s: &str) -> TournamentStatus {
    match s {
        "IN_PROGRESS" => TournamentStatus::InProgress,
        "COMPLETED" => TournamentStatus::Completed,
        _ => TournamentStatus::RegistrationOpen,
    }
}

fn parse_match_status(s: &str) -> MatchStatus {
    match s {
        "COMPLETED" => MatchStatus::Completed,
        _ => MatchStatus::Pending,
    }
}
