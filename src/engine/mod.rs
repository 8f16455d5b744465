// ==========================================
// 客户档案导入核心 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎
// 红线: 引擎无状态、无 I/O
// ==========================================

pub mod record_diff;

// 重导出核心引擎
pub use record_diff::{collapse_empty, RecordDiffEngine};
