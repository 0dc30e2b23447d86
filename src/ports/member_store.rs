use crate::domain::{Identification, MemberId, member::Member};
use async_trait::async_trait;
use thiserror::Error;

/// 会員ストアのエラー
#[derive(Debug, Error)]
pub enum StoreError {
    /// 書き込み時に識別番号の一意制約に違反した
    #[error("identification is already registered")]
    UniqueViolation,

    /// バックエンド（DB接続・クエリ・行の変換など）のエラー
    #[error("member store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// 会員ストアポート
///
/// トランザクション外の読み取りと、トランザクションの開始を提供する。
/// 書き込みはすべて`MemberTransaction`経由で行う。
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// トランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn MemberTransaction>>;

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>>;

    async fn find_by_identification(
        &self,
        identification: &Identification,
    ) -> Result<Option<Member>>;

    /// 全会員を保存順（登録順）で返す。active状態は問わない。
    async fn find_all(&self) -> Result<Vec<Member>>;

    /// アクティブな会員のみを返す
    async fn find_by_id_and_active_true(&self, id: MemberId) -> Result<Option<Member>>;
}

/// スコープ付きトランザクション
///
/// `commit`されずに破棄された場合はロールバックされ、
/// `find_by_id_for_update`で取得した行ロックも解放される。
#[async_trait]
pub trait MemberTransaction: Send {
    async fn find_by_id(&mut self, id: MemberId) -> Result<Option<Member>>;

    /// 行ロック付きの読み取り
    ///
    /// 同じ会員に対する他のロック付き読み取りは、
    /// このトランザクションが終了するまで待たされる。
    async fn find_by_id_for_update(&mut self, id: MemberId) -> Result<Option<Member>>;

    async fn exists_by_identification(
        &mut self,
        identification: &Identification,
    ) -> Result<bool>;

    /// IDをキーにupsertする
    ///
    /// 識別番号の重複は遅くともコミット時に`StoreError::UniqueViolation`になる。
    async fn save(&mut self, member: &Member) -> Result<()>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
