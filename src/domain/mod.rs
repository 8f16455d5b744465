// ==========================================
// 客户档案导入核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod change_log;
pub mod customer;
pub mod import;
pub mod types;

// 重导出核心类型
pub use change_log::{ChangeEntry, ChangeHistoryEntry, ChangeLogPayload, RecordSnapshot};
pub use customer::{CanonicalRecord, RawRow};
pub use import::{CustomerUploadPayload, ImportBatch};
pub use types::{CanonicalField, CellValue, UnknownFieldName};
