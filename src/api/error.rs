use crate::application::member::MemberApplicationError;
use crate::domain::InvalidIdentification;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(MemberApplicationError);

impl From<MemberApplicationError> for ApiError {
    fn from(err: MemberApplicationError) -> Self {
        ApiError(err)
    }
}

impl From<InvalidIdentification> for ApiError {
    fn from(err: InvalidIdentification) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self.0 {
            // 400 Bad Request - 入力不正
            MemberApplicationError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }

            // 404 Not Found - リクエストされたリソースが存在しない
            MemberApplicationError::NotFound => (
                StatusCode::NOT_FOUND,
                "MEMBER_NOT_FOUND",
                "Member not found".to_string(),
            ),

            // 409 Conflict - 識別番号の重複
            MemberApplicationError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "DUPLICATE_IDENTIFICATION",
                "A member with this identification already exists".to_string(),
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            MemberApplicationError::InactiveMember => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INACTIVE_MEMBER",
                "Inactive member cannot be updated".to_string(),
            ),
            MemberApplicationError::HasActiveAccounts => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MEMBER_HAS_ACTIVE_ACCOUNTS",
                "Member cannot be deleted while holding active accounts".to_string(),
            ),

            // 503 Service Unavailable - 口座サービスに確認できない（後で再試行可能）
            MemberApplicationError::GuardCheckFailed(ref e) => {
                tracing::error!("Account status check failed: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "ACCOUNT_CHECK_FAILED",
                    "Could not verify member accounts, deletion cancelled".to_string(),
                )
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            MemberApplicationError::Store(ref e) => {
                tracing::error!("Member store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
