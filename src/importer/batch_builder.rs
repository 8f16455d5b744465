// ==========================================
// 客户档案导入核心 - 导入批次构建器
// ==========================================
// 职责: 校验映射 → 逐行投影 → 生成导入批次
// 红线: 校验失败时不投影任何行（不产生部分批次）
// 红线: 行顺序与输入一致，不去重（去重属于持久化层）
// ==========================================
// 说明: 两种导入模式（手工映射 / 原列名）统一经由 ImportMode 进入
// ==========================================

use crate::config::{ImportConfigReader, ImportModeKind, RequiredFields};
use crate::domain::customer::RawRow;
use crate::domain::import::ImportBatch;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_mapping::{missing_headers, HeaderMapping};
use crate::importer::row_projector::RowProjector;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// ImportMode - 导入模式
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportMode {
    /// 手工映射：使用操作员确认的映射
    ManualMapping {
        mapping: HeaderMapping,
        required: RequiredFields,
    },
    /// 原列名：文件表头须逐字包含全部必填字段名
    VerbatimHeaders {
        discovered_headers: Vec<String>,
        required: RequiredFields,
    },
}

impl ImportMode {
    pub fn kind(&self) -> ImportModeKind {
        match self {
            ImportMode::ManualMapping { .. } => ImportModeKind::ManualMapping,
            ImportMode::VerbatimHeaders { .. } => ImportModeKind::VerbatimHeaders,
        }
    }

    /// 校验并解析出实际使用的映射
    ///
    /// # 返回
    /// - Ok(HeaderMapping): 手工映射原样返回；原列名模式返回恒等映射
    /// - Err(IncompleteMapping | MissingRequiredHeaders)
    pub fn resolve(&self) -> ImportResult<HeaderMapping> {
        match self {
            ImportMode::ManualMapping { mapping, required } => {
                let missing = mapping.missing_fields(required);
                if missing.is_empty() {
                    Ok(mapping.clone())
                } else {
                    Err(ImportError::IncompleteMapping { missing })
                }
            }
            ImportMode::VerbatimHeaders {
                discovered_headers,
                required,
            } => {
                let missing = missing_headers(required, discovered_headers);
                if missing.is_empty() {
                    Ok(HeaderMapping::identity())
                } else {
                    Err(ImportError::MissingRequiredHeaders { missing })
                }
            }
        }
    }
}

// ==========================================
// ImportBatchBuilder - 批次构建器
// ==========================================
pub struct ImportBatchBuilder {
    projector: RowProjector,
    max_rows: Option<usize>,
    skip_blank_rows: bool,
}

impl Default for ImportBatchBuilder {
    fn default() -> Self {
        Self {
            projector: RowProjector::new(),
            max_rows: None,
            skip_blank_rows: false,
        }
    }
}

impl ImportBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按导入配置构建
    pub fn from_config<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        Self {
            projector: RowProjector::new(),
            max_rows: config.max_rows(),
            skip_blank_rows: config.skip_blank_rows(),
        }
    }

    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }

    /// 构建导入批次（统一入口）
    ///
    /// # 参数
    /// - mode: 导入模式（含必填字段集合）
    /// - file_name: 源文件名
    /// - rows: 解析器输出的原始行
    ///
    /// # 返回
    /// - Ok(ImportBatch): 记录顺序与 rows 一致；空输入得到空批次
    /// - Err: 映射/表头校验失败，或行数超限
    pub fn build(
        &self,
        mode: &ImportMode,
        file_name: Option<&str>,
        rows: &[RawRow],
    ) -> ImportResult<ImportBatch> {
        // === 步骤 1: 校验映射（先于任何行投影） ===
        let mapping = mode.resolve().map_err(|e| {
            warn!(mode = ?mode.kind(), error = %e, "导入校验失败");
            e
        })?;

        // === 步骤 2: 行数上限 ===
        let data_rows: Vec<&RawRow> = rows
            .iter()
            .filter(|row| !(self.skip_blank_rows && row.is_blank()))
            .collect();
        if let Some(limit) = self.max_rows {
            if data_rows.len() > limit {
                return Err(ImportError::TooManyRows {
                    rows: data_rows.len(),
                    limit,
                });
            }
        }
        let skipped = rows.len() - data_rows.len();
        if skipped > 0 {
            debug!(skipped, "跳过空白行");
        }

        // === 步骤 3: 逐行投影 ===
        let records = data_rows
            .into_iter()
            .map(|row| self.projector.project(&mapping, row))
            .collect::<Vec<_>>();

        let batch = ImportBatch {
            batch_id: Uuid::new_v4().to_string(),
            file_name: file_name.map(str::to_string),
            records,
            created_at: Utc::now(),
        };

        info!(
            batch_id = %batch.batch_id,
            mode = ?mode.kind(),
            records = batch.len(),
            "导入批次构建完成"
        );
        Ok(batch)
    }

    /// 手工映射模式入口
    pub fn build_manual(
        &self,
        mapping: HeaderMapping,
        required: RequiredFields,
        file_name: Option<&str>,
        rows: &[RawRow],
    ) -> ImportResult<ImportBatch> {
        self.build(&ImportMode::ManualMapping { mapping, required }, file_name, rows)
    }

    /// 原列名模式入口
    pub fn build_verbatim(
        &self,
        discovered_headers: Vec<String>,
        required: RequiredFields,
        file_name: Option<&str>,
        rows: &[RawRow],
    ) -> ImportResult<ImportBatch> {
        self.build(
            &ImportMode::VerbatimHeaders {
                discovered_headers,
                required,
            },
            file_name,
            rows,
        )
    }
}
