pub mod account_status_gateway;

pub use account_status_gateway::AccountStatusGateway as HttpAccountStatusGateway;
