use crate::application::member::{
    ServiceDependencies, create_member as execute_create_member,
    delete_member as execute_delete_member, get_member_by_id as execute_get_member_by_id,
    get_member_by_identification as execute_get_member_by_identification,
    list_members as execute_list_members, member_exists_and_active,
    update_member as execute_update_member,
};
use crate::domain::{Identification, MemberId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{MemberRequest, MemberResponse},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /members - 会員を登録
///
/// 強制されるビジネスルール:
/// - 識別番号が空でないこと
/// - 識別番号が他の会員と重複しないこと
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let details = req.into_details()?;
    let member = execute_create_member(&state.service_deps, details).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// PUT /members/:id - 会員情報を更新
///
/// 強制されるビジネスルール:
/// - 会員が存在すること
/// - 会員がアクティブであること
/// - 識別番号を変更する場合、他の会員と重複しないこと
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<MemberResponse>, ApiError> {
    let details = req.into_details()?;
    let member = execute_update_member(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        details,
    )
    .await?;

    Ok(Json(MemberResponse::from(member)))
}

/// DELETE /members/:id - 会員を論理削除
///
/// 既に非アクティブの場合も204を返す（冪等）。
/// 解約済み以外の口座がある場合、または口座サービスに確認できない場合は拒否する。
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    execute_delete_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /members/:id - 会員をIDで取得
pub async fn get_member_by_id(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member =
        execute_get_member_by_id(&state.service_deps, MemberId::from_uuid(member_id)).await?;

    Ok(Json(MemberResponse::from(member)))
}

/// GET /members/identification/:identification - 会員を識別番号で取得
pub async fn get_member_by_identification(
    State(state): State<Arc<AppState>>,
    Path(identification): Path<String>,
) -> Result<Json<MemberResponse>, ApiError> {
    let identification = Identification::parse(identification)?;
    let member =
        execute_get_member_by_identification(&state.service_deps, &identification).await?;

    Ok(Json(MemberResponse::from(member)))
}

/// GET /members - 全会員を取得（非アクティブも含む）
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = execute_list_members(&state.service_deps).await?;

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /members/:id/active - 会員が存在し、かつアクティブか
///
/// 存在しない場合もfalseを返す（404にはしない）。
pub async fn member_is_active(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<bool>, ApiError> {
    let active =
        member_exists_and_active(&state.service_deps, MemberId::from_uuid(member_id)).await?;

    Ok(Json(active))
}
