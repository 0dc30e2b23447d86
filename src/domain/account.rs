use serde::{Deserialize, Serialize};

/// 口座サービスが使う「解約済み」ステータス
pub const CANCELLED_STATUS: &str = "CANCELADA";

/// 口座サービスが使う「有効」ステータス
pub const ACTIVE_STATUS: &str = "ACTIVA";

/// 口座ステータス（口座管理コンテキストの値をそのまま保持する）
///
/// 比較は大文字小文字を区別しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountStatus(String);

impl AccountStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.eq_ignore_ascii_case(CANCELLED_STATUS)
    }

    /// 削除ガードの判定：解約済み以外（SUSPENDIDA等も含む）は有効とみなす
    pub fn blocks_member_deletion(&self) -> bool {
        !self.is_cancelled()
    }

    /// 厳密に「有効」かどうか
    pub fn is_exactly_active(&self) -> bool {
        self.0.eq_ignore_ascii_case(ACTIVE_STATUS)
    }
}

/// 口座一覧のうち、会員の削除を妨げる口座が1つでもあるか
pub fn any_blocks_deletion<'a>(statuses: impl IntoIterator<Item = &'a AccountStatus>) -> bool {
    statuses.into_iter().any(AccountStatus::blocks_member_deletion)
}
