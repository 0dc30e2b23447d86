use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identification, MemberDetails, MemberId, UpdateMemberError};

/// Member集約 - 協同組合の会員1人
///
/// 物理削除は行わない。論理削除は`active = false`で表現する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    // 識別子
    pub id: MemberId,
    pub identification: Identification,
    pub identification_type: String,

    // 記述的な属性（相互の不変条件なし）
    pub first_names: String,
    pub last_names: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    // ライフサイクル
    pub active: bool,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 論理削除の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deactivation {
    /// 既に非アクティブ（何もしない）
    AlreadyInactive,
    /// アクティブから非アクティブへ遷移した
    Deactivated(Member),
}

/// 純粋関数：会員を登録する
///
/// ビジネスルール：
/// - 新規会員は常にアクティブ
/// - IDはここで採番する
///
/// 識別番号の一意性はアプリケーション層とストアが保証する。
pub fn register_member(details: MemberDetails, registered_at: DateTime<Utc>) -> Member {
    let MemberDetails {
        identification,
        identification_type,
        first_names,
        last_names,
        email,
        phone,
        address,
    } = details;

    Member {
        id: MemberId::new(),
        identification,
        identification_type,
        first_names,
        last_names,
        email,
        phone,
        address,
        active: true,
        created_at: registered_at,
        updated_at: registered_at,
    }
}

/// 純粋関数：会員情報を更新する
///
/// ビジネスルール：
/// - 非アクティブの会員は更新不可
/// - 入力のすべての項目で上書きする（id・active・created_atは不変）
pub fn apply_update(
    member: &Member,
    details: MemberDetails,
    updated_at: DateTime<Utc>,
) -> Result<Member, UpdateMemberError> {
    if !member.active {
        return Err(UpdateMemberError::Inactive);
    }

    let MemberDetails {
        identification,
        identification_type,
        first_names,
        last_names,
        email,
        phone,
        address,
    } = details;

    Ok(Member {
        id: member.id,
        identification,
        identification_type,
        first_names,
        last_names,
        email,
        phone,
        address,
        active: member.active,
        created_at: member.created_at,
        updated_at,
    })
}

/// 純粋関数：会員を論理削除する
///
/// activeは単調：一度falseになったら戻らない。
/// 既に非アクティブなら`AlreadyInactive`を返し、何も変更しない。
/// それ以外はactiveとupdated_atのみを変更する。
pub fn deactivate(member: &Member, deactivated_at: DateTime<Utc>) -> Deactivation {
    if !member.active {
        return Deactivation::AlreadyInactive;
    }

    Deactivation::Deactivated(Member {
        active: false,
        updated_at: deactivated_at,
        ..member.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn details(identification: &str) -> MemberDetails {
        MemberDetails {
            identification: Identification::parse(identification).unwrap(),
            identification_type: "CEDULA".to_string(),
            first_names: "Micaela".to_string(),
            last_names: "Salcedo".to_string(),
            email: Some("mica@example.com".to_string()),
            phone: None,
            address: Some("Quito, Ecuador".to_string()),
        }
    }

    #[test]
    fn test_register_member_is_active() {
        let now = Utc::now();
        let member = register_member(details("1725556660"), now);

        assert!(member.active);
        assert_eq!(member.identification.as_str(), "1725556660");
        assert_eq!(member.first_names, "Micaela");
        assert_eq!(member.email.as_deref(), Some("mica@example.com"));
        assert_eq!(member.created_at, now);
        assert_eq!(member.updated_at, now);
    }

    #[test]
    fn test_register_member_assigns_distinct_ids() {
        let now = Utc::now();
        let a = register_member(details("1725556660"), now);
        let b = register_member(details("0102030405"), now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_update_overwrites_all_fields() {
        let created = Utc::now();
        let member = register_member(details("1725556660"), created);

        let mut changes = details("0102030405");
        changes.first_names = "Micaela Stefania".to_string();
        changes.email = None;
        changes.phone = Some("0999999999".to_string());

        let later = created + Duration::minutes(5);
        let updated = apply_update(&member, changes, later).unwrap();

        assert_eq!(updated.id, member.id);
        assert_eq!(updated.identification.as_str(), "0102030405");
        assert_eq!(updated.first_names, "Micaela Stefania");
        assert_eq!(updated.email, None);
        assert_eq!(updated.phone.as_deref(), Some("0999999999"));
        assert!(updated.active);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_apply_update_rejects_inactive() {
        let now = Utc::now();
        let mut member = register_member(details("1725556660"), now);
        member.active = false;

        let result = apply_update(&member, details("1725556660"), now);
        assert_eq!(result.unwrap_err(), UpdateMemberError::Inactive);
    }

    #[test]
    fn test_deactivate_flips_only_active_flag() {
        let created = Utc::now();
        let member = register_member(details("1725556660"), created);
        let later = created + Duration::days(1);

        let Deactivation::Deactivated(deactivated) = deactivate(&member, later) else {
            panic!("active member must be deactivated");
        };

        assert!(!deactivated.active);
        assert_eq!(deactivated.updated_at, later);
        assert_eq!(
            Member {
                active: true,
                updated_at: created,
                ..deactivated
            },
            member
        );
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let now = Utc::now();
        let mut member = register_member(details("1725556660"), now);
        member.active = false;

        assert_eq!(deactivate(&member, now), Deactivation::AlreadyInactive);
    }
}
