use crate::domain::{Identification, MemberId, member::Member};
use crate::ports::member_store::{
    MemberStore as MemberStoreTrait, MemberTransaction as MemberTransactionTrait, Result,
    StoreError,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as RowLock, OwnedMutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::backend("in-memory member store lock poisoned"))
}

#[derive(Default)]
struct Shared {
    /// 保存順（登録順）
    members: Mutex<Vec<Member>>,
    row_locks: Mutex<HashMap<MemberId, Arc<RowLock<()>>>>,
    saves: AtomicUsize,
}

/// MemberStoreのインメモリ実装
///
/// - 書き込みはトランザクション内にバッファし、コミット時にまとめて反映する
/// - 識別番号の一意性はコミット時に検査する
/// - 行ロックは会員IDごとの非同期Mutexで表現し、トランザクションが保持する
pub struct MemberStore {
    shared: Arc<Shared>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
        }
    }

    /// テスト用に既存の会員を登録した状態で作成
    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let store = Self::new();
        if let Ok(mut stored) = store.shared.members.lock() {
            stored.extend(members);
        }
        store
    }

    /// `save`が呼ばれた回数（コミットされたかどうかに関わらず）
    pub fn save_count(&self) -> usize {
        self.shared.saves.load(Ordering::SeqCst)
    }
}

impl Default for MemberStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberStoreTrait for MemberStore {
    async fn begin(&self) -> Result<Box<dyn MemberTransactionTrait>> {
        Ok(Box::new(Transaction {
            shared: Arc::clone(&self.shared),
            pending: Vec::new(),
            held_locks: Vec::new(),
        }))
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        let members = lock(&self.shared.members)?;
        Ok(members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_identification(
        &self,
        identification: &Identification,
    ) -> Result<Option<Member>> {
        let members = lock(&self.shared.members)?;
        Ok(members
            .iter()
            .find(|m| &m.identification == identification)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        Ok(lock(&self.shared.members)?.clone())
    }

    async fn find_by_id_and_active_true(&self, id: MemberId) -> Result<Option<Member>> {
        let members = lock(&self.shared.members)?;
        Ok(members.iter().find(|m| m.id == id && m.active).cloned())
    }
}

/// インメモリのトランザクション
///
/// 破棄されると未コミットの書き込みは捨てられ、行ロックは解放される。
pub struct Transaction {
    shared: Arc<Shared>,
    pending: Vec<Member>,
    held_locks: Vec<(MemberId, OwnedMutexGuard<()>)>,
}

impl Transaction {
    /// コミット済みの会員にこのトランザクションの書き込みを重ねたビュー
    fn merged(&self) -> Result<Vec<Member>> {
        let mut view = lock(&self.shared.members)?.clone();
        upsert_all(&mut view, &self.pending);
        Ok(view)
    }

    fn row_lock(&self, id: MemberId) -> Result<Arc<RowLock<()>>> {
        let mut locks = lock(&self.shared.row_locks)?;
        Ok(Arc::clone(
            locks
                .entry(id)
                .or_insert_with(|| Arc::new(RowLock::new(()))),
        ))
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let held = std::mem::take(&mut self.held_locks);
        let Ok(mut locks) = self.shared.row_locks.lock() else {
            return;
        };
        for (id, guard) in held {
            drop(guard);
            prune_row_lock(&mut locks, id);
        }
    }
}

/// 誰も使っていない行ロックを表から外す（表自身の参照のみ残っている場合）
fn prune_row_lock(locks: &mut HashMap<MemberId, Arc<RowLock<()>>>, id: MemberId) {
    if locks
        .get(&id)
        .is_some_and(|row_lock| Arc::strong_count(row_lock) == 1)
    {
        locks.remove(&id);
    }
}

fn upsert_all(view: &mut Vec<Member>, writes: &[Member]) {
    for member in writes {
        match view.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => view.push(member.clone()),
        }
    }
}

fn has_duplicate_identification(members: &[Member]) -> bool {
    let mut seen = HashSet::with_capacity(members.len());
    !members
        .iter()
        .all(|m| seen.insert(m.identification.as_str()))
}

#[async_trait]
impl MemberTransactionTrait for Transaction {
    async fn find_by_id(&mut self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.merged()?.into_iter().find(|m| m.id == id))
    }

    async fn find_by_id_for_update(&mut self, id: MemberId) -> Result<Option<Member>> {
        if self.held_locks.iter().any(|(held, _)| *held == id) {
            return self.find_by_id(id).await;
        }

        let guard = self.row_lock(id)?.lock_owned().await;
        let found = self.merged()?.into_iter().find(|m| m.id == id);

        match found {
            Some(member) => {
                self.held_locks.push((id, guard));
                Ok(Some(member))
            }
            // 存在しない行のロックは保持しない
            None => {
                drop(guard);
                prune_row_lock(&mut *lock(&self.shared.row_locks)?, id);
                Ok(None)
            }
        }
    }

    async fn exists_by_identification(
        &mut self,
        identification: &Identification,
    ) -> Result<bool> {
        Ok(self
            .merged()?
            .iter()
            .any(|m| &m.identification == identification))
    }

    async fn save(&mut self, member: &Member) -> Result<()> {
        self.shared.saves.fetch_add(1, Ordering::SeqCst);
        upsert_all(&mut self.pending, std::slice::from_ref(member));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        if this.pending.is_empty() {
            return Ok(());
        }

        let mut members = lock(&this.shared.members)?;
        let mut next = members.clone();
        upsert_all(&mut next, &this.pending);

        if has_duplicate_identification(&next) {
            return Err(StoreError::UniqueViolation);
        }

        *members = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
