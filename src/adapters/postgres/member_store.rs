use crate::domain::{Identification, MemberId, member::Member};
use crate::ports::member_store::{
    MemberStore as MemberStoreTrait, MemberTransaction as MemberTransactionTrait, Result,
    StoreError,
};
use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, Row, postgres::PgRow};

/// sqlxのエラーをストアのエラーに変換する
///
/// 識別番号のユニークインデックス違反（23505）は`UniqueViolation`として区別する。
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation;
        }
    }
    StoreError::backend(err)
}

/// PostgreSQLの行データをMemberに変換する
///
/// 識別番号は値オブジェクトの不変条件を再検証する。
fn map_row_to_member(row: &PgRow) -> Result<Member> {
    let identification: String = row.get("identification");
    let identification = Identification::parse(identification).map_err(|e| {
        StoreError::backend(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;

    Ok(Member {
        id: MemberId::from_uuid(row.get("id")),
        identification,
        identification_type: row.get("identification_type"),
        first_names: row.get("first_names"),
        last_names: row.get("last_names"),
        email: row.get("email"),
        phone: row.get("phone"),
        address: row.get("address"),
        active: row.get("active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

async fn select_by_id<'e>(executor: impl PgExecutor<'e>, id: MemberId) -> Result<Option<Member>> {
    let row = sqlx::query(
        r#"
        SELECT
            id,
            identification,
            identification_type,
            first_names,
            last_names,
            email,
            phone,
            address,
            active,
            created_at,
            updated_at
        FROM members
        WHERE id = $1
        "#,
    )
    .bind(id.value())
    .fetch_optional(executor)
    .await
    .map_err(map_sqlx_error)?;

    row.as_ref().map(map_row_to_member).transpose()
}

/// MemberStoreのPostgreSQL実装
pub struct MemberStore {
    pool: PgPool,
}

impl MemberStore {
    /// PostgreSQLコネクションプールから新しいMemberStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStoreTrait for MemberStore {
    async fn begin(&self) -> Result<Box<dyn MemberTransactionTrait>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(Transaction { tx }))
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        select_by_id(&self.pool, id).await
    }

    async fn find_by_identification(
        &self,
        identification: &Identification,
    ) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                identification,
                identification_type,
                first_names,
                last_names,
                email,
                phone,
                address,
                active,
                created_at,
                updated_at
            FROM members
            WHERE identification = $1
            "#,
        )
        .bind(identification.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    /// 全会員を挿入順（seq）で取得
    async fn find_all(&self) -> Result<Vec<Member>> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                identification,
                identification_type,
                first_names,
                last_names,
                email,
                phone,
                address,
                active,
                created_at,
                updated_at
            FROM members
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(map_row_to_member).collect()
    }

    async fn find_by_id_and_active_true(&self, id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                identification,
                identification_type,
                first_names,
                last_names,
                email,
                phone,
                address,
                active,
                created_at,
                updated_at
            FROM members
            WHERE id = $1 AND active = TRUE
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row_to_member).transpose()
    }
}

/// PostgreSQLトランザクション
///
/// sqlxのTransactionはコミットされずに破棄されるとロールバックされる。
/// `SELECT ... FOR UPDATE`の行ロックもトランザクション終了時に解放される。
pub struct Transaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl MemberTransactionTrait for Transaction {
    async fn find_by_id(&mut self, id: MemberId) -> Result<Option<Member>> {
        select_by_id(&mut *self.tx, id).await
    }

    async fn find_by_id_for_update(&mut self, id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                identification,
                identification_type,
                first_names,
                last_names,
                email,
                phone,
                address,
                active,
                created_at,
                updated_at
            FROM members
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(map_row_to_member).transpose()
    }

    async fn exists_by_identification(
        &mut self,
        identification: &Identification,
    ) -> Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM members WHERE identification = $1
            )
            "#,
        )
        .bind(identification.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    /// 会員をupsertする
    ///
    /// created_atは初回挿入時の値を維持する。
    async fn save(&mut self, member: &Member) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO members (
                id,
                identification,
                identification_type,
                first_names,
                last_names,
                email,
                phone,
                address,
                active,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id)
            DO UPDATE SET
                identification = EXCLUDED.identification,
                identification_type = EXCLUDED.identification_type,
                first_names = EXCLUDED.first_names,
                last_names = EXCLUDED.last_names,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                active = EXCLUDED.active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(member.id.value())
        .bind(member.identification.as_str())
        .bind(&member.identification_type)
        .bind(&member.first_names)
        .bind(&member.last_names)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.address)
        .bind(member.active)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}
