// ==========================================
// 客户档案导入核心 - 领域类型定义
// ==========================================
// 职责: 标准字段枚举 / 原始单元格值
// 红线: 字段集合封闭,未知字段名不得静默接受
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 标准字段 (Canonical Field)
// ==========================================
// 声明顺序即系统字段顺序（记录序列化 / 审计排序均依赖此顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    FirstName,
    MiddleName,
    LastName,
    PhoneNoPrimary,
    WhatsappNum,
    PhoneNoSecondary,
    EmailId,
    Gender,
    Address,
    Country,
    DateOfBirth,
    CompanyName,
    ContactType,
    Source,
    Disposition,
    AgentName,
    DateCreated,
    Comment,
}

impl CanonicalField {
    /// 全部标准字段（声明顺序）
    pub const ALL: [CanonicalField; 18] = [
        CanonicalField::FirstName,
        CanonicalField::MiddleName,
        CanonicalField::LastName,
        CanonicalField::PhoneNoPrimary,
        CanonicalField::WhatsappNum,
        CanonicalField::PhoneNoSecondary,
        CanonicalField::EmailId,
        CanonicalField::Gender,
        CanonicalField::Address,
        CanonicalField::Country,
        CanonicalField::DateOfBirth,
        CanonicalField::CompanyName,
        CanonicalField::ContactType,
        CanonicalField::Source,
        CanonicalField::Disposition,
        CanonicalField::AgentName,
        CanonicalField::DateCreated,
        CanonicalField::Comment,
    ];

    /// 转换为字符串 (与后端列名一致)
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "first_name",
            CanonicalField::MiddleName => "middle_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::PhoneNoPrimary => "phone_no_primary",
            CanonicalField::WhatsappNum => "whatsapp_num",
            CanonicalField::PhoneNoSecondary => "phone_no_secondary",
            CanonicalField::EmailId => "email_id",
            CanonicalField::Gender => "gender",
            CanonicalField::Address => "address",
            CanonicalField::Country => "country",
            CanonicalField::DateOfBirth => "date_of_birth",
            CanonicalField::CompanyName => "company_name",
            CanonicalField::ContactType => "contact_type",
            CanonicalField::Source => "source",
            CanonicalField::Disposition => "disposition",
            CanonicalField::AgentName => "agent_name",
            CanonicalField::DateCreated => "date_created",
            CanonicalField::Comment => "comment",
        }
    }

    /// 是否为日期字段（需做 Excel 序列日期转换）
    pub fn is_date(&self) -> bool {
        matches!(self, CanonicalField::DateOfBirth | CanonicalField::DateCreated)
    }

    /// 主号码字段：任何必填配置下都必须映射
    pub fn is_always_required(&self) -> bool {
        matches!(self, CanonicalField::PhoneNoPrimary)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知标准字段名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldName(pub String);

impl fmt::Display for UnknownFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知标准字段: {}", self.0)
    }
}

impl std::error::Error for UnknownFieldName {}

impl FromStr for CanonicalField {
    type Err = UnknownFieldName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldName(s.to_string()))
    }
}

// ==========================================
// 原始单元格值 (Cell Value)
// ==========================================
// CSV 单元格一律为 Text；Excel 数值/日期单元格为 Number（序列值）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 空单元格或空字符串
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// 数值渲染为文本：整数值不带小数点（电话号码等被 Excel 存成数值的情况）
    pub fn render_number(value: f64) -> String {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            value.to_string()
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}
