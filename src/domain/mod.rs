pub mod account;
pub mod commands;
pub mod errors;
pub mod member;
pub mod value_objects;

pub use account::AccountStatus;
pub use commands::MemberDetails;
pub use errors::*;
pub use value_objects::*;
