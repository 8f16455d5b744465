// ==========================================
// 客户档案导入核心 - 客户 Repository Trait
// ==========================================
// 职责: 定义客户数据写入接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::change_log::RecordSnapshot;
use crate::domain::import::ImportBatch;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CustomerRepository Trait
// ==========================================
// 用途: 客户 upsert / 编辑落库
// 实现者: 外部持久化服务适配层
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 批量 upsert（按 phone_no_primary 新增或更新）
    ///
    /// # 参数
    /// - batch: 完整导入批次（整体提交）
    ///
    /// # 返回
    /// - Ok(()): 成功
    /// - Err: 持久化失败（整批失败）
    async fn upsert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// 覆盖更新单个客户
    ///
    /// # 参数
    /// - customer_id: 客户 ID
    /// - record: 提交后的完整快照
    async fn update_customer(
        &self,
        customer_id: &str,
        record: &RecordSnapshot,
    ) -> RepositoryResult<()>;
}
