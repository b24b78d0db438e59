pub mod app_state;
pub mod bracket;
pub mod cart;
pub mod dashboard;
pub mod messages;
pub mod network;
pub mod pagination;
pub mod registration;
