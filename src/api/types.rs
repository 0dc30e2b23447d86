use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Identification, InvalidIdentification, MemberDetails, member::Member};

/// 会員登録・更新のリクエスト（POST /members と PUT /members/:id）
#[derive(Debug, Deserialize, Serialize)]
pub struct MemberRequest {
    pub identification: String,
    pub identification_type: String,
    pub first_names: String,
    pub last_names: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl MemberRequest {
    /// リクエストをコマンドに変換する（項目ごとに明示的にコピー）
    pub fn into_details(self) -> Result<MemberDetails, InvalidIdentification> {
        Ok(MemberDetails {
            identification: Identification::parse(self.identification)?,
            identification_type: self.identification_type,
            first_names: self.first_names,
            last_names: self.last_names,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

/// 会員レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub identification: String,
    pub identification_type: String,
    pub first_names: String,
    pub last_names: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.value(),
            identification: member.identification.into(),
            identification_type: member.identification_type,
            first_names: member.first_names,
            last_names: member.last_names,
            email: member.email,
            phone: member.phone,
            address: member.address,
            active: member.active,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
