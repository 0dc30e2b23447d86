use serde::{Deserialize, Serialize};

use super::Identification;

/// コマンド：会員の登録・更新に使う入力項目
///
/// 登録と更新で同じ項目を受け取る。
/// id・active・監査日時は含まない（システムが管理する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub identification: Identification,
    pub identification_type: String,
    pub first_names: String,
    pub last_names: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
