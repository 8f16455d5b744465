// ==========================================
// 客户档案导入核心 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 声明外部协作方接口（持久化 / 审计日志）
// ==========================================

pub mod change_log_repo;
pub mod customer_repo;
pub mod error;

// 重导出核心仓储
pub use change_log_repo::ChangeLogRepository;
pub use customer_repo::CustomerRepository;
pub use error::{RepositoryError, RepositoryResult};
