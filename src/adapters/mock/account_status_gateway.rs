use crate::domain::{AccountId, AccountStatus, MemberId, account::any_blocks_deletion};
use crate::ports::account_status_gateway::{
    AccountStatusGateway as AccountStatusGatewayTrait, GatewayError, Result,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// AccountStatusGatewayのモック実装
///
/// 会員ごと・口座ごとのステータスを登録して状態を持ったテストをサポート。
/// 口座サービスの障害（通信エラー）も再現できる。
#[allow(dead_code)]
pub struct AccountStatusGateway {
    member_accounts: Mutex<HashMap<MemberId, Vec<AccountStatus>>>,
    accounts: Mutex<HashMap<AccountId, AccountStatus>>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl AccountStatusGateway {
    pub fn new() -> Self {
        Self {
            member_accounts: Mutex::new(HashMap::new()),
            accounts: Mutex::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// テスト用に会員の口座を登録
    pub fn add_account(&self, member_id: MemberId, account_id: AccountId, status: &str) {
        let status = AccountStatus::new(status);
        self.member_accounts
            .lock()
            .unwrap()
            .entry(member_id)
            .or_default()
            .push(status.clone());
        self.accounts.lock().unwrap().insert(account_id, status);
    }

    /// 口座サービスを到達不能にする（以後の呼び出しはすべて失敗する）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 問い合わせ回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

impl Default for AccountStatusGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AccountStatusGatewayTrait for AccountStatusGateway {
    /// 登録された口座の中に解約済み以外があるか
    async fn has_active_accounts(&self, member_id: MemberId) -> Result<bool> {
        self.check_available()?;
        // 応答待ちの間に他のタスクへ実行を譲る
        tokio::task::yield_now().await;
        let accounts = self.member_accounts.lock().unwrap();
        Ok(accounts
            .get(&member_id)
            .is_some_and(|statuses| any_blocks_deletion(statuses)))
    }

    /// 登録された口座が厳密に有効か（未登録はfalse）
    async fn is_account_active(&self, account_id: AccountId) -> Result<bool> {
        self.check_available()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(&account_id)
            .is_some_and(AccountStatus::is_exactly_active))
    }
}
