pub mod account_status_gateway;

#[allow(unused_imports)]
pub use account_status_gateway::AccountStatusGateway;
