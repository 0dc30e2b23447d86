mod errors;
mod member_service;

pub use errors::{MemberApplicationError, Result};
pub use member_service::{
    ServiceDependencies, create_member, delete_member, get_member_by_id,
    get_member_by_identification, list_members, member_exists_and_active, update_member,
};
