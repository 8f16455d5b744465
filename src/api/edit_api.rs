// ==========================================
// 客户档案编辑API
// ==========================================
// 职责: 编辑提交 → 字段差异 → 更新客户 → 追加审计日志
// 红线: 无实质变更时不写客户、不写审计
// 红线: 先更新客户，再写审计（审计失败不回滚客户更新）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::change_log::{ChangeEntry, ChangeHistoryEntry, ChangeLogPayload, RecordSnapshot};
use crate::domain::types::CanonicalField;
use crate::engine::{collapse_empty, RecordDiffEngine};
use crate::repository::{ChangeLogRepository, CustomerRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// 表单中留空即视为未填写的可选字段
pub const COLLAPSIBLE_FIELDS: [CanonicalField; 3] = [
    CanonicalField::MiddleName,
    CanonicalField::WhatsappNum,
    CanonicalField::PhoneNoSecondary,
];

/// 编辑结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    /// 无实质变更（未发生任何写入）
    NoChanges,
    /// 已更新
    Updated { changes: Vec<ChangeEntry> },
}

impl EditOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, EditOutcome::Updated { .. })
    }
}

/// 可选字段空串折叠为 null
pub fn collapse_optional_blanks(mut edited: RecordSnapshot) -> RecordSnapshot {
    for field in COLLAPSIBLE_FIELDS {
        let name = field.as_str();
        if edited.contains(name) {
            let collapsed = collapse_empty(edited.get(name)).map(str::to_string);
            edited.set(name, collapsed);
        }
    }
    edited
}

/// 编辑API
pub struct EditApi<R, L>
where
    R: CustomerRepository,
    L: ChangeLogRepository,
{
    customer_repo: R,
    change_log_repo: L,
    diff_engine: RecordDiffEngine,
}

impl<R, L> EditApi<R, L>
where
    R: CustomerRepository,
    L: ChangeLogRepository,
{
    pub fn new(customer_repo: R, change_log_repo: L) -> Self {
        Self {
            customer_repo,
            change_log_repo,
            diff_engine: RecordDiffEngine::new(),
        }
    }

    /// 提交编辑
    ///
    /// # 参数
    /// - customer_id: 客户 ID
    /// - external_id: 外部唯一标识（审计日志携带）
    /// - original: 编辑前快照
    /// - edited: 提交的表单快照
    #[instrument(skip(self, original, edited))]
    pub async fn submit_edit(
        &self,
        customer_id: &str,
        external_id: Option<&str>,
        original: &RecordSnapshot,
        edited: RecordSnapshot,
    ) -> ApiResult<EditOutcome> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }

        let edited = collapse_optional_blanks(edited);
        let changes = self.diff_engine.diff(original, &edited);
        if changes.is_empty() {
            info!("无实质变更，跳过更新");
            return Ok(EditOutcome::NoChanges);
        }

        self.customer_repo
            .update_customer(customer_id, &edited)
            .await?;

        let payload = ChangeLogPayload {
            customer_id: customer_id.to_string(),
            external_id: external_id.map(str::to_string),
            changes,
        };
        if let Err(e) = self.change_log_repo.append_changes(&payload).await {
            warn!(error = %e, "客户已更新，但审计日志写入失败");
            return Err(e.into());
        }

        info!(changed = payload.changes.len(), "客户已更新");
        Ok(EditOutcome::Updated {
            changes: payload.changes,
        })
    }

    /// 变更历史（最新在前）
    #[instrument(skip(self))]
    pub async fn change_history(&self, customer_id: &str) -> ApiResult<Vec<ChangeHistoryEntry>> {
        let mut entries = self.change_log_repo.list_changes(customer_id).await?;
        entries.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_only_touches_optional_fields() {
        let edited = RecordSnapshot::new()
            .with("first_name", Some(""))
            .with("middle_name", Some(""))
            .with("whatsapp_num", Some("555"))
            .with("phone_no_secondary", Some(""));
        let collapsed = collapse_optional_blanks(edited);
        assert_eq!(collapsed.get("first_name"), Some(""));
        assert!(collapsed.contains("middle_name"));
        assert_eq!(collapsed.get("middle_name"), None);
        assert_eq!(collapsed.get("whatsapp_num"), Some("555"));
        assert_eq!(collapsed.get("phone_no_secondary"), None);
    }

    #[test]
    fn test_collapse_does_not_add_fields() {
        let collapsed = collapse_optional_blanks(RecordSnapshot::new().with("email_id", Some("")));
        assert_eq!(collapsed.len(), 1);
        assert!(!collapsed.contains("middle_name"));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(EditOutcome::NoChanges).unwrap();
        assert_eq!(json["status"], "no_changes");
        assert!(!EditOutcome::NoChanges.is_updated());
    }
}
