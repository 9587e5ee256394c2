// ==========================================
// 额外勤务排班系统 - 文件解析器实现
// ==========================================
// 职责: 把警员名册/轮换表文件读成原始行记录
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::ImportError;
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行记录: 列名 -> 单元格文本 (均已去首尾空白)
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表 (全空白行已丢弃)
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> Result<Vec<RawRow>, Box<dyn std::error::Error>>;
}

/// 按表头把一行单元格拼成记录; 多余单元格丢弃, 全空白行返回 None
fn zip_row<I>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let row: RawRow = headers
        .iter()
        .cloned()
        .zip(cells)
        .collect();
    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

fn require_exists(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(Box::new(ImportError::FileNotFound(
            path.display().to_string(),
        )));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> Result<Vec<RawRow>, Box<dyn std::error::Error>> {
        require_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells = record.iter().map(|v| v.trim().to_string());
            if let Some(row) = zip_row(&headers, cells) {
                records.push(row);
            }
        }
        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct XlsxParser;

impl FileParser for XlsxParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
    ) -> Result<Vec<RawRow>, Box<dyn std::error::Error>> {
        require_exists(file_path)?;

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 约定取第一个工作表
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let cells = data_row.iter().map(|cell| cell.to_string().trim().to_string());
            if let Some(row) = zip_row(&headers, cells) {
                records.push(row);
            }
        }
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<Vec<RawRow>, Box<dyn std::error::Error>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => XlsxParser.parse_to_raw_records(path),
            _ => Err(Box::new(ImportError::UnsupportedFormat(ext))),
        }
    }
}
