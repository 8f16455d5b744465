// ==========================================
// 客户档案导入核心 - 导入批次领域模型
// ==========================================
// 职责: 导入批次 / 上传请求体
// ==========================================

use crate::domain::customer::CanonicalRecord;
use crate::domain::types::CanonicalField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 一次上传构造一次，整体交给持久化服务
// 记录顺序 = 文件行顺序，不去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,               // 批次 ID（UUID）
    pub file_name: Option<String>,      // 源文件名
    pub records: Vec<CanonicalRecord>,  // 标准记录
    pub created_at: DateTime<Utc>,      // 构造时间
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// CustomerUploadPayload - 上传请求体
// ==========================================
// 对齐: POST /upload-customer-data 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUploadPayload {
    /// 手工映射模式下的 系统字段 → 文件列；原列名模式为空
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header_mapping: BTreeMap<CanonicalField, String>,
    pub file_name: Option<String>,
    pub customers: Vec<CanonicalRecord>,
}

impl CustomerUploadPayload {
    pub fn from_batch(batch: &ImportBatch, header_mapping: BTreeMap<CanonicalField, String>) -> Self {
        Self {
            header_mapping,
            file_name: batch.file_name.clone(),
            customers: batch.records.clone(),
        }
    }
}
