// ==========================================
// 客户档案导入核心 - 变更日志 Repository Trait
// ==========================================
// 职责: 审计日志写入与查询接口
// 红线: 只在变更列表非空时写入（由调用方保证）
// ==========================================

use crate::domain::change_log::{ChangeHistoryEntry, ChangeLogPayload};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ChangeLogRepository Trait
// ==========================================
// 用途: 字段级变更审计
// 实现者: 外部审计日志服务适配层
#[async_trait]
pub trait ChangeLogRepository: Send + Sync {
    /// 追加一次编辑产生的变更列表
    ///
    /// # 参数
    /// - payload: (customer_id, external_id, changes)
    async fn append_changes(&self, payload: &ChangeLogPayload) -> RepositoryResult<()>;

    /// 查询客户的变更历史
    ///
    /// # 返回
    /// - Ok(Vec<ChangeHistoryEntry>): 顺序由实现决定，调用方负责排序
    async fn list_changes(&self, customer_id: &str) -> RepositoryResult<Vec<ChangeHistoryEntry>>;
}
