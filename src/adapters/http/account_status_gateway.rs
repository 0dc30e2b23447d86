use crate::domain::{AccountId, AccountStatus, MemberId};
use crate::ports::account_status_gateway::{
    AccountStatusGateway as AccountStatusGatewayTrait, GatewayError, Result,
};
use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

/// 口座サービスのレスポンス（ステータス以外の項目は無視する）
#[derive(Debug, Deserialize)]
struct AccountDto {
    #[serde(default)]
    estado: Option<AccountStatus>,
}

impl AccountDto {
    /// ステータス不明の口座は解約済みとみなさない
    fn blocks_member_deletion(&self) -> bool {
        self.estado
            .as_ref()
            .is_none_or(AccountStatus::blocks_member_deletion)
    }
}

/// AccountStatusGatewayのHTTP実装
///
/// 口座管理マイクロサービスにREST APIで問い合わせる。
/// タイムアウトはこのクライアントが所有し、超過時は`GatewayError::Timeout`を返す。
pub struct AccountStatusGateway {
    base_url: String,
    client: reqwest::Client,
}

impl AccountStatusGateway {
    /// ベースURLとタイムアウトから新しいゲートウェイを作成
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(Box::new(e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GETしてJSONをデコードする
    ///
    /// ボディがJSONの`null`の場合は`None`を返す。
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UnexpectedStatus(status.as_u16()));
        }

        response.json::<Option<T>>().await.map_err(classify)
    }
}

/// reqwestのエラーをゲートウェイのエラー種別に分類する
fn classify(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_decode() {
        GatewayError::Decode(Box::new(err))
    } else {
        GatewayError::Transport(Box::new(err))
    }
}

#[async_trait]
impl AccountStatusGatewayTrait for AccountStatusGateway {
    /// GET /cuentas/socio/{member_id}
    async fn has_active_accounts(&self, member_id: MemberId) -> Result<bool> {
        let url = format!("{}/cuentas/socio/{}", self.base_url, member_id);
        let accounts: Option<Vec<AccountDto>> = self.get_json(&url).await?;

        Ok(accounts.is_some_and(|accounts| {
            accounts.iter().any(AccountDto::blocks_member_deletion)
        }))
    }

    /// GET /cuentas/{account_id}
    async fn is_account_active(&self, account_id: AccountId) -> Result<bool> {
        let url = format!("{}/cuentas/{}", self.base_url, account_id);
        let account: Option<AccountDto> = self.get_json(&url).await?;

        Ok(account
            .and_then(|a| a.estado)
            .is_some_and(|estado| estado.is_exactly_active()))
    }
}
