// ==========================================
// 客户档案导入核心 - 客户记录领域模型
// ==========================================
// 职责: 原始行 (RawRow) / 标准记录 (CanonicalRecord)
// 红线: 标准记录覆盖全部标准字段,构造后不可变
// ==========================================

use crate::domain::types::{CanonicalField, CellValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RawRow - 原始行
// ==========================================
// 用途: 文件解析器输出，列名 → 原始单元格
// 保留文件列顺序；读取后不再修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加单元格（构造阶段使用）
    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    pub(crate) fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.push((column.into(), value.into()));
    }

    /// 按列名取值；列不存在视为空单元格
    pub fn get(&self, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or(&EMPTY)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 整行全部为空白
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.push(column, value);
        }
        row
    }
}

// ==========================================
// CanonicalRecord - 标准客户记录
// ==========================================
// 每个标准字段恰有一个值（None 表示 null）
// 序列化为 JSON 对象，键顺序 = 字段声明顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRecord {
    values: BTreeMap<CanonicalField, Option<String>>,
}

impl CanonicalRecord {
    /// 由构造函数逐字段生成（保证全量覆盖）
    pub fn from_fn<F>(mut value_of: F) -> Self
    where
        F: FnMut(CanonicalField) -> Option<String>,
    {
        let values = CanonicalField::ALL
            .iter()
            .map(|&field| (field, value_of(field)))
            .collect();
        Self { values }
    }

    /// 全部字段为 null 的记录
    pub fn empty() -> Self {
        Self::from_fn(|_| None)
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.values.get(&field).and_then(|v| v.as_deref())
    }

    /// 替换单个字段，返回新记录（原记录不变）
    pub fn with_value(&self, field: CanonicalField, value: Option<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(field, value);
        Self { values }
    }

    /// 按声明顺序遍历 (字段, 值)
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, Option<&str>)> {
        CanonicalField::ALL
            .iter()
            .map(move |&field| (field, self.get(field)))
    }

    /// upsert 主键
    pub fn phone_no_primary(&self) -> Option<&str> {
        self.get(CanonicalField::PhoneNoPrimary)
    }
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self::empty()
    }
}
