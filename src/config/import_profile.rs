// ==========================================
// 客户档案导入核心 - 导入配置
// ==========================================
// 职责: 必填字段集合 / 行数上限 / 空行策略
// 存储: JSON 配置文件（缺省项取默认值）
// 红线: 必填集合由调用方提供，不在导入逻辑中写死
// ==========================================

use crate::domain::types::{CanonicalField, UnknownFieldName};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// 配置键名
// ==========================================
pub mod config_keys {
    pub const MANUAL_REQUIRED: &str = "manual_required";
    pub const VERBATIM_REQUIRED: &str = "verbatim_required";
    pub const MAX_ROWS: &str = "max_rows";
    pub const SKIP_BLANK_ROWS: &str = "skip_blank_rows";
}

// ==========================================
// ImportModeKind - 导入模式（配置选择器）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportModeKind {
    /// 操作员手工映射表头
    ManualMapping,
    /// 文件表头须与系统字段名逐字一致
    VerbatimHeaders,
}

// ==========================================
// RequiredFields - 必填字段集合
// ==========================================
// 内部按声明顺序去重存储
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct RequiredFields {
    fields: Vec<CanonicalField>,
}

impl RequiredFields {
    pub fn new(fields: Vec<CanonicalField>) -> Self {
        let fields = CanonicalField::ALL
            .iter()
            .copied()
            .filter(|field| fields.contains(field))
            .collect();
        Self { fields }
    }

    /// 由字段名构造
    ///
    /// # 返回
    /// - Err(UnknownField): 出现非标准字段名
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ImportResult<Self> {
        let fields = names
            .iter()
            .map(|name| {
                name.as_ref()
                    .parse::<CanonicalField>()
                    .map_err(|e| ImportError::UnknownField(e.0))
            })
            .collect::<ImportResult<Vec<_>>>()?;
        Ok(Self::new(fields))
    }

    /// 原列名直传上传：全部 18 个字段
    pub fn verbatim_upload() -> Self {
        Self::new(CanonicalField::ALL.to_vec())
    }

    /// 手工映射上传：不含 date_created / comment
    pub fn manual_mapping() -> Self {
        Self::new(
            CanonicalField::ALL
                .iter()
                .copied()
                .filter(|field| {
                    !matches!(field, CanonicalField::DateCreated | CanonicalField::Comment)
                })
                .collect(),
        )
    }

    /// 配置的必填字段（声明顺序）
    pub fn iter(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields.iter().copied()
    }

    /// 实际生效的必填字段：配置字段 ∪ {phone_no_primary}
    pub fn effective(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(move |field| field.is_always_required() || self.fields.contains(field))
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 上传前提示操作员的表头清单
    pub fn describe(&self) -> String {
        self.effective()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<Vec<String>> for RequiredFields {
    type Error = UnknownFieldName;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let fields = names
            .iter()
            .map(|name| name.parse::<CanonicalField>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(fields))
    }
}

impl From<RequiredFields> for Vec<String> {
    fn from(required: RequiredFields) -> Self {
        required
            .fields
            .iter()
            .map(|field| field.as_str().to_string())
            .collect()
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入管道所需的配置读取接口
// 实现者: ImportProfile
pub trait ImportConfigReader: Send + Sync {
    /// 指定导入模式的必填字段集合
    fn required_fields(&self, mode: ImportModeKind) -> RequiredFields;

    /// 单批次最大数据行数（None 表示不限制）
    fn max_rows(&self) -> Option<usize>;

    /// 是否跳过整行空白的数据行
    fn skip_blank_rows(&self) -> bool;
}

// ==========================================
// ImportProfile - 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProfile {
    #[serde(default = "RequiredFields::manual_mapping")]
    pub manual_required: RequiredFields,

    #[serde(default = "RequiredFields::verbatim_upload")]
    pub verbatim_required: RequiredFields,

    #[serde(default)]
    pub max_rows: Option<usize>,

    #[serde(default = "default_skip_blank_rows")]
    pub skip_blank_rows: bool,
}

fn default_skip_blank_rows() -> bool {
    false
}

impl Default for ImportProfile {
    fn default() -> Self {
        Self {
            manual_required: RequiredFields::manual_mapping(),
            verbatim_required: RequiredFields::verbatim_upload(),
            max_rows: None,
            skip_blank_rows: default_skip_blank_rows(),
        }
    }
}

impl ImportProfile {
    /// 从 JSON 文本加载（缺省项取默认值）
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let profile: ImportProfile =
            serde_json::from_str(raw).map_err(|e| ImportError::ConfigReadError {
                source_name: "json".to_string(),
                message: e.to_string(),
            })?;
        debug!(
            manual_required = profile.manual_required.len(),
            verbatim_required = profile.verbatim_required.len(),
            max_rows = ?profile.max_rows,
            "导入配置已解析"
        );
        Ok(profile)
    }

    /// 从 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "加载导入配置");
        Self::from_json_str(&raw)
    }

    /// 配置快照（JSON）
    pub fn snapshot(&self) -> serde_json::Value {
        let mut snapshot = serde_json::Map::new();
        snapshot.insert(
            config_keys::MANUAL_REQUIRED.to_string(),
            serde_json::json!(Vec::<String>::from(self.manual_required.clone())),
        );
        snapshot.insert(
            config_keys::VERBATIM_REQUIRED.to_string(),
            serde_json::json!(Vec::<String>::from(self.verbatim_required.clone())),
        );
        snapshot.insert(config_keys::MAX_ROWS.to_string(), serde_json::json!(self.max_rows));
        snapshot.insert(
            config_keys::SKIP_BLANK_ROWS.to_string(),
            serde_json::json!(self.skip_blank_rows),
        );
        serde_json::Value::Object(snapshot)
    }
}

impl ImportConfigReader for ImportProfile {
    fn required_fields(&self, mode: ImportModeKind) -> RequiredFields {
        match mode {
            ImportModeKind::ManualMapping => self.manual_required.clone(),
            ImportModeKind::VerbatimHeaders => self.verbatim_required.clone(),
        }
    }

    fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    fn skip_blank_rows(&self) -> bool {
        self.skip_blank_rows
    }
}
