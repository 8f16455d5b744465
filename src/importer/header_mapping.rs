// ==========================================
// 客户档案导入核心 - 表头映射解析器
// ==========================================
// 职责: 系统字段 → 文件列 一对一映射的构建与校验
// 红线: 同一文件列只能绑定一个系统字段
// 红线: phone_no_primary 无论必填配置如何都必须映射
// ==========================================
// 状态迁移: apply(mapping, action) -> mapping'
// 原映射永不被修改；被拒绝的操作不产生新状态
// ==========================================

use crate::config::RequiredFields;
use crate::domain::types::CanonicalField;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

// ==========================================
// MappingAction - 操作员映射动作
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MappingAction {
    /// 绑定系统字段到文件列（空列名等价于解绑）
    Bind {
        field: CanonicalField,
        column: String,
    },
    /// 解除系统字段绑定
    Unbind { field: CanonicalField },
}

// ==========================================
// HeaderMapping - 表头映射（不可变值）
// ==========================================
// 反序列化逐条重放 Bind，与 apply 同样拒绝重复列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<CanonicalField, String>",
    into = "BTreeMap<CanonicalField, String>"
)]
pub struct HeaderMapping {
    bindings: BTreeMap<CanonicalField, String>,
}

impl TryFrom<BTreeMap<CanonicalField, String>> for HeaderMapping {
    type Error = ImportError;

    fn try_from(bindings: BTreeMap<CanonicalField, String>) -> Result<Self, Self::Error> {
        bindings
            .into_iter()
            .try_fold(HeaderMapping::new(), |mapping, (field, column)| {
                mapping.apply(MappingAction::Bind { field, column })
            })
    }
}

impl From<HeaderMapping> for BTreeMap<CanonicalField, String> {
    fn from(mapping: HeaderMapping) -> Self {
        mapping.bindings
    }
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原列名模式：每个系统字段绑定到同名文件列
    pub fn identity() -> Self {
        let bindings = CanonicalField::ALL
            .iter()
            .map(|&field| (field, field.as_str().to_string()))
            .collect();
        Self { bindings }
    }

    /// 状态迁移函数
    ///
    /// # 返回
    /// - Ok(HeaderMapping): 迁移后的新映射
    /// - Err(DuplicateBinding): 文件列已被其他字段占用（原映射不变）
    pub fn apply(&self, action: MappingAction) -> ImportResult<HeaderMapping> {
        match action {
            MappingAction::Bind { field, column } if column.is_empty() => {
                Ok(self.without(field))
            }
            MappingAction::Bind { field, column } => {
                if let Some(bound_to) = self.field_for_column(&column) {
                    if bound_to != field {
                        return Err(ImportError::DuplicateBinding {
                            column,
                            field,
                            bound_to,
                        });
                    }
                    // 相同绑定重复提交：无变化
                    return Ok(self.clone());
                }
                let mut bindings = self.bindings.clone();
                bindings.insert(field, column);
                Ok(Self { bindings })
            }
            MappingAction::Unbind { field } => Ok(self.without(field)),
        }
    }

    pub fn bind(&self, field: CanonicalField, column: impl Into<String>) -> ImportResult<HeaderMapping> {
        self.apply(MappingAction::Bind {
            field,
            column: column.into(),
        })
    }

    pub fn unbind(&self, field: CanonicalField) -> HeaderMapping {
        self.without(field)
    }

    fn without(&self, field: CanonicalField) -> HeaderMapping {
        let mut bindings = self.bindings.clone();
        bindings.remove(&field);
        Self { bindings }
    }

    /// 字段绑定的文件列
    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.bindings
            .get(&field)
            .map(String::as_str)
            .filter(|column| !column.is_empty())
    }

    /// 占用该文件列的系统字段
    pub fn field_for_column(&self, column: &str) -> Option<CanonicalField> {
        self.bindings
            .iter()
            .find(|(_, bound)| bound.as_str() == column)
            .map(|(&field, _)| field)
    }

    pub fn is_bound(&self, field: CanonicalField) -> bool {
        self.column_for(field).is_some()
    }

    /// 未映射的必填字段（含 phone_no_primary，声明顺序）
    pub fn missing_fields(&self, required: &RequiredFields) -> Vec<CanonicalField> {
        required
            .effective()
            .filter(|&field| !self.is_bound(field))
            .collect()
    }

    /// 映射是否完整（可提交）
    pub fn is_complete(&self, required: &RequiredFields) -> bool {
        self.missing_fields(required).is_empty()
    }

    pub fn bindings(&self) -> &BTreeMap<CanonicalField, String> {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ==========================================
// 原列名模式校验
// ==========================================

/// 文件表头中缺失的必填字段名（原列名模式，含 phone_no_primary）
pub fn missing_headers<S: AsRef<str>>(
    required: &RequiredFields,
    discovered_headers: &[S],
) -> Vec<CanonicalField> {
    required
        .effective()
        .filter(|field| {
            !discovered_headers
                .iter()
                .any(|header| header.as_ref() == field.as_str())
        })
        .collect()
}

/// 必填字段名是否全部逐字出现在文件表头中
pub fn validate_discovered_headers<S: AsRef<str>>(
    required: &RequiredFields,
    discovered_headers: &[S],
) -> bool {
    missing_headers(required, discovered_headers).is_empty()
}

// ==========================================
// MappingSession - 单次导入的映射会话
// ==========================================
// 用途: 持有已发现表头与当前映射；归属单个上传，不跨上传共享
#[derive(Debug, Clone, Default)]
pub struct MappingSession {
    discovered_headers: Vec<String>,
    mapping: HeaderMapping,
}

impl MappingSession {
    pub fn new(discovered_headers: Vec<String>) -> Self {
        Self {
            discovered_headers,
            mapping: HeaderMapping::new(),
        }
    }

    /// 应用操作员动作；被拒绝时映射保持不变
    pub fn apply(&mut self, action: MappingAction) -> ImportResult<()> {
        match self.mapping.apply(action.clone()) {
            Ok(next) => {
                debug!(?action, "映射已更新");
                self.mapping = next;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "映射操作被拒绝");
                Err(e)
            }
        }
    }

    pub fn bind(&mut self, field: CanonicalField, column: impl Into<String>) -> ImportResult<()> {
        self.apply(MappingAction::Bind {
            field,
            column: column.into(),
        })
    }

    pub fn unbind(&mut self, field: CanonicalField) {
        self.mapping = self.mapping.unbind(field);
    }

    /// 字段下拉可选列：未被其他字段占用的已发现列（保留自身已选列）
    pub fn available_columns(&self, field: CanonicalField) -> Vec<&str> {
        self.discovered_headers
            .iter()
            .map(String::as_str)
            .filter(|column| match self.mapping.field_for_column(column) {
                None => true,
                Some(bound_to) => bound_to == field,
            })
            .collect()
    }

    pub fn is_complete(&self, required: &RequiredFields) -> bool {
        self.mapping.is_complete(required)
    }

    /// 提交前校验
    ///
    /// # 返回
    /// - Ok(&HeaderMapping): 映射完整
    /// - Err(IncompleteMapping): 列出未映射的必填字段
    pub fn validate(&self, required: &RequiredFields) -> ImportResult<&HeaderMapping> {
        let missing = self.mapping.missing_fields(required);
        if missing.is_empty() {
            Ok(&self.mapping)
        } else {
            Err(ImportError::IncompleteMapping { missing })
        }
    }

    pub fn mapping(&self) -> &HeaderMapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> HeaderMapping {
        self.mapping
    }

    pub fn discovered_headers(&self) -> &[String] {
        &self.discovered_headers
    }
}
