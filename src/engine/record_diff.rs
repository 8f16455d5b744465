// ==========================================
// 客户档案导入核心 - 记录差异引擎
// ==========================================
// 职责: 编辑前后快照 → 字段级变更列表（审计日志负载）
// 输入: 原记录快照 / 提交后快照
// 输出: Vec<ChangeEntry>（空列表 = 无实质变更）
// ==========================================
// 红线: 空字符串与缺失/null 视为相等，不产生变更
// 红线: 以提交后快照的字段集合与顺序为准
// ==========================================

use crate::domain::change_log::{ChangeEntry, RecordSnapshot};
use crate::domain::customer::CanonicalRecord;

/// 空字符串折叠为 null
pub fn collapse_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ==========================================
// RecordDiffEngine - 记录差异引擎
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordDiffEngine;

impl RecordDiffEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算字段级差异
    ///
    /// # 参数
    /// - `before`: 原记录快照
    /// - `after`: 提交后快照（决定比较哪些字段及输出顺序）
    ///
    /// # 返回
    /// 归一化后确有差异的字段；old/new 为归一化后的值
    pub fn diff(&self, before: &RecordSnapshot, after: &RecordSnapshot) -> Vec<ChangeEntry> {
        after
            .iter()
            .filter_map(|(field, new_raw)| {
                let old_value = collapse_empty(before.get(field));
                let new_value = collapse_empty(new_raw);
                (old_value != new_value).then(|| {
                    ChangeEntry::new(
                        field,
                        old_value.map(str::to_string),
                        new_value.map(str::to_string),
                    )
                })
            })
            .collect()
    }

    /// 标准记录间的差异（声明字段顺序）
    pub fn diff_records(&self, before: &CanonicalRecord, after: &CanonicalRecord) -> Vec<ChangeEntry> {
        self.diff(&RecordSnapshot::from(before), &RecordSnapshot::from(after))
    }

    /// 是否存在实质变更
    pub fn has_changes(&self, before: &RecordSnapshot, after: &RecordSnapshot) -> bool {
        !self.diff(before, after).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CanonicalField;

    fn snapshot(pairs: &[(&str, Option<&str>)]) -> RecordSnapshot {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let record = snapshot(&[("name", Some("Alice")), ("age", Some("30")), ("note", None)]);
        assert!(RecordDiffEngine::new().diff(&record, &record).is_empty());
    }

    #[test]
    fn test_empty_string_equals_null() {
        let before = snapshot(&[("name", Some(""))]);
        let after = snapshot(&[("name", None)]);
        assert!(RecordDiffEngine::new().diff(&before, &after).is_empty());
        assert!(RecordDiffEngine::new().diff(&after, &before).is_empty());
    }

    #[test]
    fn test_single_field_change() {
        let before = snapshot(&[("name", Some("Alice")), ("age", Some("30"))]);
        let after = snapshot(&[("name", Some("Alicia")), ("age", Some("30"))]);
        let changes = RecordDiffEngine::new().diff(&before, &after);
        assert_eq!(
            changes,
            vec![ChangeEntry::new(
                "name",
                Some("Alice".to_string()),
                Some("Alicia".to_string())
            )]
        );
    }

    #[test]
    fn test_entries_carry_normalized_values() {
        let before = snapshot(&[("email", Some(""))]);
        let after = snapshot(&[("email", Some("a@b.c"))]);
        let changes = RecordDiffEngine::new().diff(&before, &after);
        assert_eq!(changes[0].old_value, None);

        let changes = RecordDiffEngine::new().diff(&after, &before);
        assert_eq!(changes[0].new_value, None);
    }

    #[test]
    fn test_only_after_fields_are_compared() {
        let before = snapshot(&[("name", Some("Alice")), ("legacy", Some("x"))]);
        let after = snapshot(&[("name", Some("Alice"))]);
        assert!(RecordDiffEngine::new().diff(&before, &after).is_empty());
    }

    #[test]
    fn test_field_absent_from_before_is_null() {
        let before = snapshot(&[]);
        let after = snapshot(&[("custom_tag", Some("vip")), ("blank", Some(""))]);
        let changes = RecordDiffEngine::new().diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "custom_tag");
        assert_eq!(changes[0].old_value, None);
    }

    #[test]
    fn test_output_follows_after_order() {
        let before = snapshot(&[("a", Some("1")), ("b", Some("1")), ("c", Some("1"))]);
        let after = snapshot(&[("c", Some("2")), ("a", Some("2")), ("b", Some("2"))]);
        let fields: Vec<_> = RecordDiffEngine::new()
            .diff(&before, &after)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_whitespace_is_a_real_change() {
        let before = snapshot(&[("name", Some("Bob"))]);
        let after = snapshot(&[("name", Some("Bob "))]);
        assert!(RecordDiffEngine::new().has_changes(&before, &after));
    }

    #[test]
    fn test_diff_records_in_declared_order() {
        let before = CanonicalRecord::empty()
            .with_value(CanonicalField::Comment, Some("old".to_string()))
            .with_value(CanonicalField::FirstName, Some("Al".to_string()));
        let after = CanonicalRecord::empty()
            .with_value(CanonicalField::Comment, Some("new".to_string()))
            .with_value(CanonicalField::FirstName, Some("Alan".to_string()));
        let fields: Vec<_> = RecordDiffEngine::new()
            .diff_records(&before, &after)
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(fields, vec!["first_name", "comment"]);
    }
}
