// ==========================================
// 客户档案导入核心 - 配置层
// ==========================================
// 职责: 导入配置加载与查询
// ==========================================

pub mod import_profile;

// 重导出核心配置类型
pub use import_profile::{
    config_keys, ImportConfigReader, ImportModeKind, ImportProfile, RequiredFields,
};
