use crate::domain::{
    self, Identification, MemberDetails, MemberId,
    member::{Deactivation, Member},
};
use crate::ports::*;
use chrono::Utc;
use std::sync::Arc;

use super::errors::{MemberApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub member_store: Arc<dyn MemberStore>,
    pub account_gateway: Arc<dyn AccountStatusGateway>,
}

/// トランザクションを終了するヘルパー関数
///
/// 成功時はコミット、失敗時はロールバックする。
/// ロールバック自体の失敗はログに残し、元のエラーを返す。
async fn finish<T>(tx: Box<dyn MemberTransaction>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Failed to roll back member transaction");
            }
            Err(err)
        }
    }
}

/// 会員を登録する
///
/// ビジネスルール：
/// - 識別番号が他の会員と重複しないこと
/// - 新規会員はアクティブ
///
/// # エラー
/// - DuplicateIdentity: 識別番号が登録済み（事前チェックまたは書き込み時の一意制約）
pub async fn create_member(deps: &ServiceDependencies, details: MemberDetails) -> Result<Member> {
    let mut tx = deps.member_store.begin().await?;
    let result = register_in(tx.as_mut(), details).await;
    let member = finish(tx, result).await?;

    tracing::info!(member_id = %member.id, "Member registered");
    Ok(member)
}

async fn register_in(tx: &mut dyn MemberTransaction, details: MemberDetails) -> Result<Member> {
    // 1. 識別番号の一意性確認
    if tx.exists_by_identification(&details.identification).await? {
        return Err(MemberApplicationError::DuplicateIdentity);
    }

    // 2. ドメイン層の純粋関数を呼び出し
    let member = domain::member::register_member(details, Utc::now());

    // 3. 保存
    tx.save(&member).await?;

    Ok(member)
}

/// 会員情報を更新する
///
/// ビジネスルール：
/// - 会員が存在すること
/// - 会員がアクティブであること（非アクティブは拒否し、黙って無視しない）
/// - 識別番号を変更する場合のみ、他の会員との重複を確認する
///
/// 行ロックは取得しない。削除との競合はDESIGN.mdに記載の既知の制約。
pub async fn update_member(
    deps: &ServiceDependencies,
    id: MemberId,
    details: MemberDetails,
) -> Result<Member> {
    let mut tx = deps.member_store.begin().await?;
    let result = update_in(tx.as_mut(), id, details).await;
    let member = finish(tx, result).await?;

    tracing::info!(member_id = %member.id, "Member updated");
    Ok(member)
}

async fn update_in(
    tx: &mut dyn MemberTransaction,
    id: MemberId,
    details: MemberDetails,
) -> Result<Member> {
    // 1. 会員の取得
    let member = tx
        .find_by_id(id)
        .await?
        .ok_or(MemberApplicationError::NotFound)?;

    // 2. 非アクティブは更新不可
    if !member.active {
        return Err(MemberApplicationError::InactiveMember);
    }

    // 3. 識別番号が変わる場合のみ重複確認（自分自身との衝突を避ける）
    if member.identification != details.identification
        && tx.exists_by_identification(&details.identification).await?
    {
        return Err(MemberApplicationError::DuplicateIdentity);
    }

    // 4. ドメイン層の純粋関数を呼び出し
    let updated = domain::member::apply_update(&member, details, Utc::now())?;

    // 5. 保存
    tx.save(&updated).await?;

    Ok(updated)
}

/// 会員を論理削除する（削除ガード）
///
/// 処理フロー：
/// 1. 行ロック付きで会員を取得（トランザクション終了までロックを保持）
/// 2. 既に非アクティブなら何もせず成功（外部呼び出し・書き込みなし）
/// 3. 口座サービスに解約済み以外の口座があるか問い合わせる
///    - 問い合わせ失敗はGuardCheckFailed（フェイルクローズ）
///    - 口座ありはHasActiveAccounts
/// 4. active = false にして保存
///
/// 口座サービスへの問い合わせは行ロック保持中に行う。
pub async fn delete_member(deps: &ServiceDependencies, id: MemberId) -> Result<()> {
    let mut tx = deps.member_store.begin().await?;
    let result = deactivate_in(deps, tx.as_mut(), id).await;
    finish(tx, result).await
}

async fn deactivate_in(
    deps: &ServiceDependencies,
    tx: &mut dyn MemberTransaction,
    id: MemberId,
) -> Result<()> {
    // 1. 行ロック付きで取得
    let member = tx
        .find_by_id_for_update(id)
        .await?
        .ok_or(MemberApplicationError::NotFound)?;

    // 2. 冪等性：既に非アクティブなら終了
    let deactivated = match domain::member::deactivate(&member, Utc::now()) {
        Deactivation::AlreadyInactive => {
            tracing::debug!(member_id = %id, "Member already inactive, nothing to delete");
            return Ok(());
        }
        Deactivation::Deactivated(deactivated) => deactivated,
    };

    // 3. 口座ステータスの確認
    let has_active_accounts = deps
        .account_gateway
        .has_active_accounts(id)
        .await
        .map_err(|e| {
            tracing::warn!(member_id = %id, error = %e, "Account check failed, deletion cancelled");
            MemberApplicationError::GuardCheckFailed(e)
        })?;

    if has_active_accounts {
        tracing::warn!(member_id = %id, "Member has active accounts, deletion refused");
        return Err(MemberApplicationError::HasActiveAccounts);
    }

    // 4. 論理削除
    tx.save(&deactivated).await?;

    tracing::info!(member_id = %id, "Member deactivated");
    Ok(())
}

/// IDで会員を取得
pub async fn get_member_by_id(deps: &ServiceDependencies, id: MemberId) -> Result<Member> {
    deps.member_store
        .find_by_id(id)
        .await?
        .ok_or(MemberApplicationError::NotFound)
}

/// 識別番号で会員を取得
pub async fn get_member_by_identification(
    deps: &ServiceDependencies,
    identification: &Identification,
) -> Result<Member> {
    deps.member_store
        .find_by_identification(identification)
        .await?
        .ok_or(MemberApplicationError::NotFound)
}

/// 全会員を取得（非アクティブも含む、保存順）
pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    Ok(deps.member_store.find_all().await?)
}

/// 会員が存在し、かつアクティブか
///
/// 存在しない場合と非アクティブの場合は区別しない（どちらもfalse）。
pub async fn member_exists_and_active(deps: &ServiceDependencies, id: MemberId) -> Result<bool> {
    Ok(deps
        .member_store
        .find_by_id_and_active_true(id)
        .await?
        .is_some())
}
