// ==========================================
// 客户档案导入核心 - 行投影器
// ==========================================
// 职责: 映射 + 单元格归一化 → 标准记录
// 红线: 全函数、无副作用；数据问题降级为 null，不返回错误
// ==========================================

use crate::domain::customer::{CanonicalRecord, RawRow};
use crate::importer::cell_normalizer::CellNormalizer;
use crate::importer::header_mapping::HeaderMapping;
use crate::importer::importer_trait::CellNormalizer as CellNormalizerTrait;

pub struct RowProjector<N = CellNormalizer> {
    normalizer: N,
}

impl RowProjector<CellNormalizer> {
    pub fn new() -> Self {
        Self {
            normalizer: CellNormalizer,
        }
    }
}

impl Default for RowProjector<CellNormalizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: CellNormalizerTrait> RowProjector<N> {
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer }
    }

    /// 投影单行
    ///
    /// 未映射字段 → None；已映射字段 → 归一化后的单元格
    pub fn project(&self, mapping: &HeaderMapping, row: &RawRow) -> CanonicalRecord {
        CanonicalRecord::from_fn(|field| {
            mapping
                .column_for(field)
                .and_then(|column| self.normalizer.normalize(field, row.get(column)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CanonicalField, CellValue};

    #[test]
    fn test_unbound_fields_are_null() {
        let row = RawRow::new().with_cell("Name", "Bob").with_cell("Other", "x");
        let record = RowProjector::new().project(&HeaderMapping::new(), &row);
        assert!(record.iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn test_bound_fields_are_normalized() {
        let mapping = HeaderMapping::new()
            .bind(CanonicalField::FirstName, "Name")
            .unwrap()
            .bind(CanonicalField::DateOfBirth, "Birth")
            .unwrap()
            .bind(CanonicalField::PhoneNoPrimary, "Phone")
            .unwrap();
        let row = RawRow::new()
            .with_cell("Name", "Bob")
            .with_cell("Birth", 44197.0)
            .with_cell("Phone", "5551234567");

        let record = RowProjector::new().project(&mapping, &row);

        assert_eq!(record.get(CanonicalField::FirstName), Some("Bob"));
        assert_eq!(record.get(CanonicalField::DateOfBirth), Some("2021-01-01"));
        assert_eq!(record.phone_no_primary(), Some("5551234567"));
        assert_eq!(record.get(CanonicalField::EmailId), None);
    }

    #[test]
    fn test_mapping_to_missing_column_is_null() {
        let mapping = HeaderMapping::new()
            .bind(CanonicalField::Country, "Land")
            .unwrap();
        let row = RawRow::new().with_cell("Name", "Bob");
        let record = RowProjector::new().project(&mapping, &row);
        assert_eq!(record.get(CanonicalField::Country), None);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let mapping = HeaderMapping::identity();
        let row = RawRow::new()
            .with_cell("first_name", "Bob")
            .with_cell("date_created", CellValue::Number(45366.0));
        let projector = RowProjector::new();
        assert_eq!(projector.project(&mapping, &row), projector.project(&mapping, &row));
    }
}
