//! Headless client and view-model layer for the ClashHub community platform.
//!
//! The crate owns everything below the rendering layer: the session and its
//! durable token, the network worker that talks to the backend through
//! [`clashhub_api::client::HubApi`], sequence-stamped pagination, bracket view
//! state, registration forms, cart/checkout, and the admin dashboard layout.
//! A UI embeds [`state::app_state::AppState`], forwards user intents, pumps
//! the resulting [`state::messages::NetworkRequest`]s through a
//! [`state::network::NetworkWorker`], and applies the
//! [`state::messages::NetworkResponse`]s back into the state.

pub mod session;
pub mod state;
pub mod storage;

pub use clashhub_api as api;
