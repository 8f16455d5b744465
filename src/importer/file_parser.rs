// ==========================================
// 客户档案导入核心 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls，首个工作表) / CSV (.csv)
// 约定: 首行为表头；单元格内容不做 TRIM
// ==========================================

use crate::domain::customer::RawRow;
use crate::domain::types::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

// ==========================================
// TabularFormat - 文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularFormat {
    /// 分隔文本（CSV）
    DelimitedText,
    /// 电子表格二进制（xls/xlsx）
    Spreadsheet,
}

impl TabularFormat {
    /// 根据扩展名判断（不区分大小写）
    pub fn from_extension(ext: &str) -> ImportResult<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Ok(TabularFormat::DelimitedText),
            "xlsx" | "xls" => Ok(TabularFormat::Spreadsheet),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 根据 MIME 类型判断
    pub fn from_mime_type(mime: &str) -> ImportResult<Self> {
        match mime {
            "text/csv" => Ok(TabularFormat::DelimitedText),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Ok(TabularFormat::Spreadsheet)
            }
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 根据文件路径扩展名判断
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

// ==========================================
// ParsedSheet - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub headers: Vec<String>, // 已发现表头（文件列顺序）
    pub rows: Vec<RawRow>,    // 数据行（不含表头）
}

/// 按表头组装一行；超出表头的单元格丢弃，缺失的列视为空
fn assemble_row<I>(headers: &[String], cells: I) -> RawRow
where
    I: IntoIterator<Item = CellValue>,
{
    headers.iter().cloned().zip(cells).collect()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn format(&self) -> TabularFormat {
        TabularFormat::DelimitedText
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(String::is_empty) {
            return Err(ImportError::EmptySheet("CSV 首行为空".to_string()));
        }

        // 读取所有行（CSV 单元格一律为文本）
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(assemble_row(
                &headers,
                record.iter().map(|value| CellValue::Text(value.to_string())),
            ));
        }

        debug!(headers = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(ParsedSheet { headers, rows })
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let bytes = read_checked(file_path, self.format())?;
        self.parse_bytes(&bytes)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// calamine 单元格 → 原始单元格值
    /// 日期单元格保留为序列值，由归一化器按字段决定是否转换
    fn to_cell_value(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Int(v) => CellValue::Number(*v as f64),
            Data::Float(v) => CellValue::Number(*v),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                CellValue::Text(s.clone())
            }
            Data::Bool(b) => CellValue::Text(b.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn format(&self) -> TabularFormat {
        TabularFormat::Spreadsheet
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedSheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let headers: Vec<String> = sheet_rows
            .next()
            .ok_or_else(|| ImportError::EmptySheet(sheet_name.clone()))?
            .iter()
            .map(|cell| cell.to_string())
            .collect();

        let rows: Vec<RawRow> = sheet_rows
            .map(|cells| assemble_row(&headers, cells.iter().map(Self::to_cell_value)))
            .collect();

        debug!(
            sheet = %sheet_name,
            headers = headers.len(),
            rows = rows.len(),
            "Excel 解析完成"
        );
        Ok(ParsedSheet { headers, rows })
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedSheet> {
        let bytes = read_checked(file_path, self.format())?;
        self.parse_bytes(&bytes)
    }
}

/// 检查文件存在与扩展名后读取
fn read_checked(path: &Path, expected: TabularFormat) -> ImportResult<Vec<u8>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let format = TabularFormat::from_path(path)?;
    if format != expected {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        return Err(ImportError::UnsupportedFormat(ext.to_string()));
    }
    Ok(std::fs::read(path)?)
}

// ==========================================
// 通用文件解析器（根据格式自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn parser_for(format: TabularFormat) -> Box<dyn FileParser> {
        match format {
            TabularFormat::DelimitedText => Box::new(CsvParser),
            TabularFormat::Spreadsheet => Box::new(ExcelParser),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedSheet> {
        let path = file_path.as_ref();
        let format = TabularFormat::from_path(path)?;
        Self::parser_for(format).parse_file(path)
    }

    pub fn parse_bytes(&self, bytes: &[u8], format: TabularFormat) -> ImportResult<ParsedSheet> {
        Self::parser_for(format).parse_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_csv_parser_valid_bytes() {
        let data = b"Name,Birth,Phone\nBob,1990-01-01,5551234567\nAmy,,5559876543\n";
        let sheet = CsvParser.parse_bytes(data).unwrap();

        assert_eq!(sheet.headers, vec!["Name", "Birth", "Phone"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("Name"), &CellValue::from("Bob"));
        assert_eq!(sheet.rows[1].get("Birth"), &CellValue::from(""));
    }

    #[test]
    fn test_csv_parser_preserves_whitespace() {
        let sheet = CsvParser.parse_bytes(b"Name\n  Bob  \n").unwrap();
        assert_eq!(sheet.rows[0].get("Name"), &CellValue::from("  Bob  "));
    }

    #[test]
    fn test_csv_parser_short_row_yields_empty_cells() {
        let sheet = CsvParser.parse_bytes(b"a,b,c\n1\n").unwrap();
        assert_eq!(sheet.rows[0].get("a"), &CellValue::from("1"));
        assert_eq!(sheet.rows[0].get("c"), &CellValue::Empty);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_file(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_from_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "first_name,phone_no_primary").unwrap();
        writeln!(temp_file, "Bob,5551234567").unwrap();

        let sheet = UniversalFileParser.parse(temp_file.path()).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].get("phone_no_primary"), &CellValue::from("5551234567"));
    }

    #[test]
    fn test_extension_mismatch_rejected() {
        let temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        let result = ExcelParser.parse_file(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_file = Builder::new().suffix(".pdf").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "pdf"));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(TabularFormat::from_extension("XLSX").unwrap(), TabularFormat::Spreadsheet);
        assert_eq!(
            TabularFormat::from_mime_type("text/csv").unwrap(),
            TabularFormat::DelimitedText
        );
        assert_eq!(
            TabularFormat::from_mime_type("application/vnd.ms-excel").unwrap(),
            TabularFormat::Spreadsheet
        );
        assert!(TabularFormat::from_mime_type("application/pdf").is_err());
    }

    #[test]
    fn test_excel_cell_mapping() {
        assert_eq!(ExcelParser::to_cell_value(&Data::Float(44197.0)), CellValue::Number(44197.0));
        assert_eq!(ExcelParser::to_cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(ExcelParser::to_cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            ExcelParser::to_cell_value(&Data::String("Bob".to_string())),
            CellValue::from("Bob")
        );
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        assert!(ExcelParser.parse_bytes(b"not a workbook").is_err());
    }
}
