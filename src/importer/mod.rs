// ==========================================
// 客户档案导入核心 - 导入层
// ==========================================
// 职责: 外部表格数据 → 标准客户记录批次
// 支持: Excel, CSV
// 流程: 解析 → 表头映射 → 行投影(单元格归一化) → 批次构建
// ==========================================

// 模块声明
pub mod batch_builder;
pub mod cell_normalizer;
pub mod error;
pub mod file_parser;
pub mod header_mapping;
pub mod importer_trait;
pub mod row_projector;

// 重导出核心类型
pub use batch_builder::{ImportBatchBuilder, ImportMode};
pub use cell_normalizer::{excel_serial_to_date, CellNormalizer as CellNormalizerImpl};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, ParsedSheet, TabularFormat, UniversalFileParser};
pub use header_mapping::{
    missing_headers, validate_discovered_headers, HeaderMapping, MappingAction, MappingSession,
};
pub use row_projector::RowProjector;

// 重导出 Trait 接口
pub use importer_trait::{CellNormalizer, FileParser};
