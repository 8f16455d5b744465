// ==========================================
// 客户档案导入核心 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入/仓储错误为用户可读的错误消息
// ==========================================

use crate::domain::types::CanonicalField;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 映射校验错误（操作员可修正）
    // ==========================================
    #[error("重复映射: {0}")]
    DuplicateBinding(String),

    #[error("{message}")]
    IncompleteMapping {
        message: String,
        missing: Vec<CanonicalField>,
    },

    #[error("{message}")]
    MissingRequiredHeaders {
        message: String,
        missing: Vec<CanonicalField>,
    },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 导入 / 存储错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("存储服务错误: {0}")]
    StorageError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 面向调用方的错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::DuplicateBinding(_) => "DUPLICATE_BINDING",
            ApiError::IncompleteMapping { .. } => "INCOMPLETE_MAPPING",
            ApiError::MissingRequiredHeaders { .. } => "MISSING_REQUIRED_HEADERS",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::StorageError(_) => "STORAGE_ERROR",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let missing = match self {
            ApiError::IncompleteMapping { missing, .. }
            | ApiError::MissingRequiredHeaders { missing, .. } => missing.clone(),
            _ => Vec::new(),
        };
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            missing_fields: missing,
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::DuplicateBinding { .. } => ApiError::DuplicateBinding(message),
            ImportError::IncompleteMapping { missing } => {
                ApiError::IncompleteMapping { message, missing }
            }
            ImportError::MissingRequiredHeaders { missing } => {
                ApiError::MissingRequiredHeaders { message, missing }
            }
            ImportError::TooManyRows { .. } => ApiError::ValidationError(message),
            ImportError::UnknownField(_) | ImportError::ConfigReadError { .. } => {
                ApiError::InternalError(message)
            }
            ImportError::Other(err) => ApiError::Other(err),
            _ => ApiError::ImportError(message),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 错误响应体
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<CanonicalField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_mapping_keeps_missing_fields() {
        let err: ApiError = ImportError::IncompleteMapping {
            missing: vec![CanonicalField::PhoneNoPrimary],
        }
        .into();
        assert_eq!(err.code(), "INCOMPLETE_MAPPING");
        let response = err.to_response();
        assert_eq!(response.missing_fields, vec![CanonicalField::PhoneNoPrimary]);
        assert!(response.message.contains("phone_no_primary"));
    }

    #[test]
    fn test_parser_error_maps_to_import_error() {
        let err: ApiError = ImportError::UnsupportedFormat("pdf".to_string()).into();
        assert_eq!(err.code(), "IMPORT_ERROR");
    }

    #[test]
    fn test_repository_error_mapping() {
        let err: ApiError = RepositoryError::Unavailable("timeout".to_string()).into();
        assert_eq!(err.code(), "STORAGE_ERROR");

        let err: ApiError = RepositoryError::NotFound {
            entity: "customer".to_string(),
            id: "7".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "customer(id=7)不存在"));
    }
}
