use crate::domain::{AccountId, MemberId};
use async_trait::async_trait;
use thiserror::Error;

/// 口座ステータスゲートウェイのエラー
///
/// 「有効な口座なし」と「判定できなかった」を区別するため、
/// 失敗時にfalseを返してはならない。
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("account service request timed out")]
    Timeout,

    #[error("account service is unreachable")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("account service responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("account service response could not be decoded")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// 口座ステータスゲートウェイポート
///
/// 会員コンテキストと口座コンテキストの境界を維持する。
/// 会員コンテキストは口座の詳細を知らず、ステータスの判定結果のみを受け取る。
#[async_trait]
pub trait AccountStatusGateway: Send + Sync {
    /// 会員が解約済み以外の口座を1つでも持っているか
    ///
    /// 会員の論理削除前のガードに使用される。
    async fn has_active_accounts(&self, member_id: MemberId) -> Result<bool>;

    /// 口座のステータスが厳密に「有効」か
    async fn is_account_active(&self, account_id: AccountId) -> Result<bool>;
}
