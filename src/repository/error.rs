// ==========================================
// 客户档案导入核心 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仓储为外部协作方（upsert 服务 / 审计日志写入），
//       本层只定义错误形状，不绑定具体存储引擎
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("存储服务不可用: {0}")]
    Unavailable(String),

    #[error("存储服务拒绝请求: {0}")]
    Rejected(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    #[error("序列化失败: {0}")]
    SerializationError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
