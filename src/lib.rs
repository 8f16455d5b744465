// ==========================================
// 客户档案导入核心 - 核心库
// ==========================================
// 职责: 表格导入（Excel / CSV）→ 标准客户记录批次
//       客户编辑 → 字段级变更审计
// 持久化与审计存储由外部服务实现（repository trait）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 外部服务接口
pub mod repository;

// 引擎层 - 记录差异
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务流程
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CanonicalField, CellValue};

// 领域实体
pub use domain::{
    CanonicalRecord, ChangeEntry, ChangeHistoryEntry, ChangeLogPayload, CustomerUploadPayload,
    ImportBatch, RawRow, RecordSnapshot,
};

// 导入
pub use importer::{
    excel_serial_to_date, HeaderMapping, ImportBatchBuilder, ImportError, ImportMode,
    MappingAction, MappingSession, RowProjector,
};

// 引擎
pub use engine::RecordDiffEngine;

// 配置
pub use config::{ImportConfigReader, ImportProfile, RequiredFields};

// API
pub use api::{EditApi, EditOutcome, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "客户档案导入核心";
