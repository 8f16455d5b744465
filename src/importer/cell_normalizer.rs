// ==========================================
// 客户档案导入核心 - 单元格归一化器实现
// ==========================================
// 职责: NULL 标准化 / Excel 序列日期转换 / 文本透传
// 红线: 不做 TRIM、不做大小写转换；永不返回错误
// ==========================================

use crate::domain::types::{CanonicalField, CellValue};
use crate::importer::importer_trait::CellNormalizer as CellNormalizerTrait;
use chrono::DateTime;

/// 1970-01-01 在 Excel 1900 日期体系中的序列值（含 1900 闰年修正）
pub const UNIX_EPOCH_SERIAL: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86400.0;

pub struct CellNormalizer;

impl CellNormalizerTrait for CellNormalizer {
    fn normalize(&self, field: CanonicalField, raw: &CellValue) -> Option<String> {
        match raw {
            CellValue::Empty => None,
            CellValue::Text(text) if text.is_empty() => None,
            // 非数值日期视为已格式化文本，原样透传
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(serial) if field.is_date() => excel_serial_to_date(*serial),
            CellValue::Number(value) => Some(CellValue::render_number(*value)),
        }
    }
}

/// Excel 序列日期 → YYYY-MM-DD
///
/// (serial - 25569) * 86400 秒即 Unix 时间戳，取 UTC 日期部分。
/// 超出可表示范围的序列值返回 None。
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    let seconds = ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).floor();
    if !seconds.is_finite() || seconds.abs() > i64::MAX as f64 {
        return None;
    }

    DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}
