// ==========================================
// 客户档案导入核心 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单元格格式问题不产生错误（降级为 null），
//       错误只来自映射校验、文件解析、配置读取
// ==========================================

use crate::domain::types::CanonicalField;
use thiserror::Error;

/// 逗号拼接字段名（错误消息用）
fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(CanonicalField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 映射校验错误 =====
    #[error("文件列 '{column}' 已映射到字段 {bound_to}，不能再映射到 {field}")]
    DuplicateBinding {
        column: String,
        field: CanonicalField,
        bound_to: CanonicalField,
    },

    #[error("映射不完整，以下必填字段未映射: {}", join_fields(.missing))]
    IncompleteMapping { missing: Vec<CanonicalField> },

    #[error("上传文件缺少必填表头: {}", join_fields(.missing))]
    MissingRequiredHeaders { missing: Vec<CanonicalField> },

    #[error("数据行数 {rows} 超出上限 {limit}")]
    TooManyRows { rows: usize, limit: usize },

    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件无表头行: {0}")]
    EmptySheet(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (source: {source_name}): {message}")]
    ConfigReadError {
        source_name: String,
        message: String,
    },

    #[error("配置中存在未知字段: {0}")]
    UnknownField(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为操作员可修正的映射/表头错误
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            ImportError::DuplicateBinding { .. }
                | ImportError::IncompleteMapping { .. }
                | ImportError::MissingRequiredHeaders { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
