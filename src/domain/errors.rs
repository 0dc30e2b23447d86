/// 本人識別番号のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidIdentification {
    /// 空文字列または空白のみ
    Blank,
}

impl std::fmt::Display for InvalidIdentification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidIdentification::Blank => f.write_str("identification must not be blank"),
        }
    }
}

/// 会員情報更新のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMemberError {
    /// 非アクティブ（論理削除済み）の会員は更新不可
    Inactive,
}
