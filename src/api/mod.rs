// ==========================================
// 客户档案导入核心 - API 层
// ==========================================
// 职责: 编排导入 / 编辑流程，供上层界面或服务调用
// ==========================================

pub mod edit_api;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use edit_api::{collapse_optional_blanks, EditApi, EditOutcome, COLLAPSIBLE_FIELDS};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use import_api::{ImportApi, ImportApiResponse, ImportSession};
