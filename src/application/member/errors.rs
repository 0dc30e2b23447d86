use crate::domain::{InvalidIdentification, UpdateMemberError};
use crate::ports::{GatewayError, StoreError};
use thiserror::Error;

/// 会員管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum MemberApplicationError {
    /// 会員が存在しない
    #[error("Member not found")]
    NotFound,

    /// 識別番号が他の会員と重複している
    #[error("A member with this identification already exists")]
    DuplicateIdentity,

    /// 非アクティブの会員は更新できない
    #[error("Inactive member cannot be updated")]
    InactiveMember,

    /// 解約済み以外の口座を持つ会員は削除できない
    #[error("Member has active accounts")]
    HasActiveAccounts,

    /// 口座ステータスを確認できなかったため削除を中止した（フェイルクローズ）
    #[error("Could not verify member accounts, deletion cancelled")]
    GuardCheckFailed(#[source] GatewayError),

    /// 入力が不正
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 会員ストアのエラー
    #[error("Member store error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for MemberApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            // 事前チェックをすり抜けた重複も、書き込み時に一意制約で検出される
            StoreError::UniqueViolation => MemberApplicationError::DuplicateIdentity,
            other => MemberApplicationError::Store(other),
        }
    }
}

impl From<UpdateMemberError> for MemberApplicationError {
    fn from(err: UpdateMemberError) -> Self {
        match err {
            UpdateMemberError::Inactive => MemberApplicationError::InactiveMember,
        }
    }
}

impl From<InvalidIdentification> for MemberApplicationError {
    fn from(err: InvalidIdentification) -> Self {
        MemberApplicationError::InvalidRequest(err.to_string())
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, MemberApplicationError>;
