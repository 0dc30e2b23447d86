pub mod member_store;

// パブリックに型を再エクスポート
pub use member_store::MemberStore as PostgresMemberStore;
