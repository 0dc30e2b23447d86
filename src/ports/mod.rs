pub mod account_status_gateway;
pub mod member_store;

pub use account_status_gateway::{AccountStatusGateway, GatewayError};
pub use member_store::{MemberStore, MemberTransaction, StoreError};
