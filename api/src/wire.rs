/// Backend raw wire types — serde shapes for deserializing REST responses.
/// These map to the clean domain types via the mapping functions in client.rs.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pagination envelope (Spring-style page)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct PageEnvelope<T> {
    pub content: Option<Vec<T>>,
    pub number: Option<u32>,
    pub last: Option<bool>,
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        Self { content: None, number: None, last: None }
    }
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TournamentWire {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub game_name: Option<String>,
    pub start_date: Option<String>, // ISO 8601
    pub prize_pool: Option<String>,
    pub team_size: Option<u32>,
    pub rules: Option<String>,
    pub status: Option<String>, // "REGISTRATION_OPEN", "IN_PROGRESS", "COMPLETED"
    pub required_fields: Option<Vec<FieldDefinitionWire>>,
    pub matches: Option<Vec<MatchWire>>,
    pub my_registration: Option<RegistrationWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchWire {
    pub round_number: Option<u32>,
    pub match_number: Option<u32>,
    pub team_a: Option<TeamSlotWire>,
    pub team_b: Option<TeamSlotWire>,
    pub winner: Option<TeamSlotWire>,
    pub status: Option<String>, // "PENDING", "COMPLETED"
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamSlotWire {
    pub registration_id: Option<u64>,
    pub team_fields: Option<Vec<FieldEntryWire>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntryWire {
    pub field_name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinitionWire {
    pub id: Option<u64>,
    pub field_name: Option<String>,
    pub field_type: Option<String>, // "TEXT" | "NUMBER"
    pub is_required: Option<bool>,
    /// Explicit ownership tag. Older backend revisions omit it and encode
    /// ownership in the field name instead.
    pub owner: Option<FieldOwnerWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FieldOwnerWire {
    pub kind: Option<String>, // "TEAM" | "PLAYER"
    pub player_index: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWire {
    pub id: Option<u64>,
    pub team_fields: Option<Vec<FieldEntryWire>>,
    pub player_submissions: Option<Vec<PlayerSubmissionWire>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSubmissionWire {
    pub field_values: Option<Vec<FieldEntryWire>>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeclareWinnerRequest {
    pub winner_team_id: u64,
}

// ---------------------------------------------------------------------------
// Auth & users
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub user: Option<UserWire>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct UserWire {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Base layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BaseLayoutWire {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub townhall_level: Option<u8>,
    pub image_url: Option<String>,
    pub base_link: Option<String>,
    pub submitted_by_username: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBaseRequest {
    pub title: String,
    pub townhall_level: u8,
    pub base_link: String,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Mart
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CategoryWire {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ItemWire {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub category_id: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartWire {
    pub items: Option<Vec<CartLineWire>>,
    pub subtotal: Option<f64>,
    pub coupon_discount: Option<f64>,
    pub total: Option<f64>,
    pub applied_coupon: Option<CouponWire>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CartLineWire {
    pub item: Option<ItemWire>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CouponWire {
    pub code: Option<String>,
    pub description: Option<String>,
    /// Some revisions serialize this as `isAutomatic`.
    #[serde(alias = "isAutomatic")]
    pub automatic: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CouponDiscoveryWire {
    pub eligible_offers: Option<Vec<CouponOfferWire>>,
    pub locked_offers: Option<Vec<CouponOfferWire>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CouponOfferWire {
    pub coupon: Option<CouponWire>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub item_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Clone)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

#[derive(Debug, Serialize, Clone)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderWire {
    pub id: Option<u64>,
    pub created_at: Option<String>, // ISO 8601
    pub total: Option<f64>,
    pub status: Option<String>,
    pub items: Option<Vec<OrderLineWire>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineWire {
    pub item_name: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddressWire {
    pub id: Option<u64>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}
