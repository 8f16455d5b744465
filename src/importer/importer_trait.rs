// ==========================================
// 客户档案导入核心 - 导入组件 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 表头映射 → 行投影(单元格归一化) → 批次构建
// ==========================================

use crate::domain::types::{CanonicalField, CellValue};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{ParsedSheet, TabularFormat};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 支持的格式
    fn format(&self) -> TabularFormat;

    /// 解析内存中的文件内容
    ///
    /// # 参数
    /// - bytes: 文件原始字节
    ///
    /// # 返回
    /// - Ok(ParsedSheet): 表头 + 原始行（首行为表头）
    /// - Err: 格式错误、无表头
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet>;

    /// 解析磁盘文件
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(ParsedSheet)
    /// - Err: 文件不存在、扩展名不符、读取失败
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedSheet>;
}

// ==========================================
// CellNormalizer Trait
// ==========================================
// 用途: 单元格归一化接口（阶段 2）
// 实现者: CellNormalizerImpl
pub trait CellNormalizer: Send + Sync {
    /// 将原始单元格转换为标准值
    ///
    /// # 规则
    /// - 空单元格 / 空字符串 → None
    /// - 日期字段 + 数值 → Excel 序列日期转 YYYY-MM-DD
    /// - 其他 → 原样文本
    ///
    /// # 说明
    /// - 永不失败：无法识别的值原样透传或降级为 None
    fn normalize(&self, field: CanonicalField, raw: &CellValue) -> Option<String>;
}
