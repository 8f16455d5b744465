// ==========================================
// 客户档案导入API
// ==========================================
// 职责: 封装上传流程（解析 → 映射会话 → 构建批次 → upsert）
// 模式: 手工映射 / 原列名直传
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ImportConfigReader, ImportModeKind};
use crate::domain::customer::RawRow;
use crate::domain::import::{CustomerUploadPayload, ImportBatch};
use crate::domain::types::CanonicalField;
use crate::importer::{
    ImportBatchBuilder, ImportMode, MappingAction, MappingSession, ParsedSheet, TabularFormat,
    UniversalFileParser,
};
use crate::repository::CustomerRepository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 批次ID
    pub batch_id: String,
    /// 源文件名
    pub file_name: Option<String>,
    /// 提交的记录数
    pub record_count: usize,
    /// 导入模式
    pub mode: ImportModeKind,
}

// ==========================================
// ImportSession - 单个上传的映射会话
// ==========================================
// 归属单次上传；提交时被消费
#[derive(Debug, Clone)]
pub struct ImportSession {
    file_name: Option<String>,
    rows: Vec<RawRow>,
    mapping: MappingSession,
}

impl ImportSession {
    pub fn new(file_name: Option<String>, sheet: ParsedSheet) -> Self {
        Self {
            file_name,
            rows: sheet.rows,
            mapping: MappingSession::new(sheet.headers),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        self.mapping.discovered_headers()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 操作员映射动作
    pub fn apply(&mut self, action: MappingAction) -> ApiResult<()> {
        Ok(self.mapping.apply(action)?)
    }

    pub fn bind(&mut self, field: CanonicalField, column: impl Into<String>) -> ApiResult<()> {
        Ok(self.mapping.bind(field, column)?)
    }

    pub fn unbind(&mut self, field: CanonicalField) {
        self.mapping.unbind(field);
    }

    pub fn available_columns(&self, field: CanonicalField) -> Vec<&str> {
        self.mapping.available_columns(field)
    }

    pub fn mapping(&self) -> &MappingSession {
        &self.mapping
    }
}

/// 导入API
pub struct ImportApi<R, C>
where
    R: CustomerRepository,
    C: ImportConfigReader,
{
    customer_repo: R,
    config: C,
    parser: UniversalFileParser,
}

impl<R, C> ImportApi<R, C>
where
    R: CustomerRepository,
    C: ImportConfigReader,
{
    /// 创建新的ImportApi实例
    pub fn new(customer_repo: R, config: C) -> Self {
        Self {
            customer_repo,
            config,
            parser: UniversalFileParser,
        }
    }

    fn builder(&self) -> ImportBatchBuilder {
        ImportBatchBuilder::from_config(&self.config)
    }

    /// 原列名模式上传前展示给操作员的表头清单
    pub fn required_headers_hint(&self) -> String {
        self.config
            .required_fields(ImportModeKind::VerbatimHeaders)
            .describe()
    }

    // ==========================================
    // 手工映射模式
    // ==========================================

    /// 打开磁盘文件，开始映射会话
    pub fn open_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportSession> {
        let path = file_path.as_ref();
        let sheet = self.parser.parse(path)?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
        info!(file = ?file_name, headers = sheet.headers.len(), rows = sheet.rows.len(), "文件已解析");
        Ok(ImportSession::new(file_name, sheet))
    }

    /// 打开上传的文件内容（按 MIME 类型选择解析器）
    pub fn open_upload(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ApiResult<ImportSession> {
        let format = TabularFormat::from_mime_type(mime_type)?;
        let sheet = self.parser.parse_bytes(bytes, format)?;
        info!(file = %file_name, headers = sheet.headers.len(), rows = sheet.rows.len(), "上传内容已解析");
        Ok(ImportSession::new(Some(file_name.to_string()), sheet))
    }

    /// 构建批次但不提交（请求体预览）
    pub fn preview(&self, session: &ImportSession) -> ApiResult<CustomerUploadPayload> {
        let batch = self.build_mapped(session)?;
        Ok(CustomerUploadPayload::from_batch(
            &batch,
            session.mapping.mapping().bindings().clone(),
        ))
    }

    fn build_mapped(&self, session: &ImportSession) -> ApiResult<ImportBatch> {
        let mode = ImportMode::ManualMapping {
            mapping: session.mapping.mapping().clone(),
            required: self.config.required_fields(ImportModeKind::ManualMapping),
        };
        Ok(self
            .builder()
            .build(&mode, session.file_name(), &session.rows)?)
    }

    /// 提交映射会话
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 批次已交给持久化服务
    /// - Err(IncompleteMapping): 必填字段未映射，不产生任何批次
    #[instrument(skip(self, session), fields(file = ?session.file_name))]
    pub async fn submit(&self, session: ImportSession) -> ApiResult<ImportApiResponse> {
        let batch = self.build_mapped(&session)?;
        self.persist(batch, ImportModeKind::ManualMapping).await
    }

    // ==========================================
    // 原列名模式
    // ==========================================

    /// 原列名直传（磁盘文件）
    #[instrument(skip(self, file_path))]
    pub async fn import_verbatim<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ApiResult<ImportApiResponse> {
        let session = self.open_file(file_path)?;
        self.submit_verbatim(session).await
    }

    /// 原列名直传（上传内容）
    #[instrument(skip(self, bytes))]
    pub async fn import_verbatim_upload(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> ApiResult<ImportApiResponse> {
        let session = self.open_upload(file_name, mime_type, bytes)?;
        self.submit_verbatim(session).await
    }

    async fn submit_verbatim(&self, session: ImportSession) -> ApiResult<ImportApiResponse> {
        let mode = ImportMode::VerbatimHeaders {
            discovered_headers: session.headers().to_vec(),
            required: self.config.required_fields(ImportModeKind::VerbatimHeaders),
        };
        let batch = self
            .builder()
            .build(&mode, session.file_name(), &session.rows)?;
        self.persist(batch, ImportModeKind::VerbatimHeaders).await
    }

    async fn persist(&self, batch: ImportBatch, mode: ImportModeKind) -> ApiResult<ImportApiResponse> {
        self.customer_repo
            .upsert_batch(&batch)
            .await
            .map_err(ApiError::from)?;

        info!(batch_id = %batch.batch_id, records = batch.len(), "导入批次已提交");
        Ok(ImportApiResponse {
            batch_id: batch.batch_id,
            file_name: batch.file_name,
            record_count: batch.records.len(),
            mode,
        })
    }
}
