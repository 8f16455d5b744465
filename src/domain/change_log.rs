// ==========================================
// 客户档案导入核心 - 变更日志领域模型
// ==========================================
// 职责: 记录快照 / 字段级变更条目 / 审计负载 / 变更历史
// 红线: 变更条目只记录归一化后（空串 = null）确有差异的字段
// ==========================================

use crate::domain::customer::CanonicalRecord;
use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// RecordSnapshot - 记录快照
// ==========================================
// 用途: 差异比对输入；字段名可为标准字段名或自定义字段名
// 保留字段插入顺序
// JSON 形态: 按字段顺序的 { 字段名: 值 } 对象（客户更新请求体）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    fields: Vec<(String, Option<String>)>,
}

impl RecordSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段；已存在则原位替换（保持原顺序）
    pub fn set(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: Option<&str>) -> Self {
        self.set(field, value.map(str::to_string));
        self
    }

    /// 取字段原始值；缺失字段与 null 均返回 None
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for RecordSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut snapshot = RecordSnapshot::new();
        for (field, value) in iter {
            snapshot.set(field, value.map(Into::into));
        }
        snapshot
    }
}

impl Serialize for RecordSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = RecordSnapshot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("字段名到可空字符串的对象")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut snapshot = RecordSnapshot::new();
        while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
            snapshot.set(name, value);
        }
        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for RecordSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

impl From<&CanonicalRecord> for RecordSnapshot {
    fn from(record: &CanonicalRecord) -> Self {
        record
            .iter()
            .map(|(field, value)| (field.as_str(), value))
            .collect()
    }
}

// ==========================================
// ChangeEntry - 字段级变更条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl ChangeEntry {
    pub fn new(
        field: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

// ==========================================
// ChangeLogPayload - 审计日志写入负载
// ==========================================
// 对齐: POST /customers/log-change 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogPayload {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "C_unique_id")]
    pub external_id: Option<String>,
    pub changes: Vec<ChangeEntry>,
}

// ==========================================
// ChangeHistoryEntry - 变更历史（已落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeHistoryEntry {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_at: NaiveDateTime,
}

impl ChangeHistoryEntry {
    pub fn from_change(change: ChangeEntry, changed_at: NaiveDateTime) -> Self {
        Self {
            field: change.field,
            old_value: change.old_value,
            new_value: change.new_value,
            changed_at,
        }
    }

    /// 历史面板单行摘要（日期格式 DD/MM/YYYY, HH:MM:SS）
    pub fn summary(&self) -> String {
        format!(
            "Changes made on: {} || updated {} from {} to {}",
            self.changed_at.format("%d/%m/%Y, %H:%M:%S"),
            self.field,
            self.old_value.as_deref().unwrap_or(""),
            self.new_value.as_deref().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CanonicalField;
    use chrono::NaiveDate;

    #[test]
    fn test_snapshot_set_keeps_position() {
        let mut snapshot = RecordSnapshot::new().with("a", Some("1")).with("b", Some("2"));
        snapshot.set("a", Some("9".to_string()));
        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(snapshot.get("a"), Some("9"));
    }

    #[test]
    fn test_snapshot_from_canonical_record() {
        let record = CanonicalRecord::empty()
            .with_value(CanonicalField::LastName, Some("Smith".to_string()));
        let snapshot = RecordSnapshot::from(&record);
        assert_eq!(snapshot.len(), CanonicalField::ALL.len());
        assert_eq!(snapshot.get("last_name"), Some("Smith"));
        assert_eq!(snapshot.iter().next().map(|(name, _)| name), Some("first_name"));
    }

    #[test]
    fn test_snapshot_json_is_ordered_object() {
        let snapshot = RecordSnapshot::new()
            .with("last_name", Some("Wong"))
            .with("first_name", None);
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"last_name":"Wong","first_name":null}"#
        );

        let parsed: RecordSnapshot =
            serde_json::from_str(r#"{"phone_no_primary":"555","email_id":null}"#).unwrap();
        let names: Vec<&str> = parsed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["phone_no_primary", "email_id"]);
        assert_eq!(parsed.get("phone_no_primary"), Some("555"));
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = ChangeLogPayload {
            customer_id: "42".to_string(),
            external_id: Some("C-0042".to_string()),
            changes: vec![ChangeEntry::new("email_id", None, Some("a@b.c".to_string()))],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["customerId"], "42");
        assert_eq!(json["C_unique_id"], "C-0042");
        assert_eq!(json["changes"][0]["old_value"], serde_json::Value::Null);
    }

    #[test]
    fn test_history_summary() {
        let changed_at = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        let entry = ChangeHistoryEntry::from_change(
            ChangeEntry::new("first_name", Some("Alice".to_string()), Some("Alicia".to_string())),
            changed_at,
        );
        assert_eq!(
            entry.summary(),
            "Changes made on: 15/03/2024, 09:05:07 || updated first_name from Alice to Alicia"
        );
    }
}
