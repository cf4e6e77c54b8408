// ==========================================
// 畜牧饲料成本核算引擎 - 文件解析器
// ==========================================
// 支持: CSV (.csv) / JSON (.json)
// 输出: CSV -> (行号, 表头 -> 值) 原始记录; JSON -> 反序列化结果
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// 原始 CSV 行 (行号从 1 开始,不含表头)
pub type RawRecord = (usize, HashMap<String, String>);

fn check_file(path: &Path, expected_ext: &str) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != expected_ext {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    Ok(())
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 为原始记录
    ///
    /// - 自动识别分隔符 (`,` 或 `;`)
    /// - 表头与值去除首尾空白,表头转为小写
    /// - 跳过完全空白的行
    pub fn parse_to_raw_records(&self, path: &Path) -> ImportResult<Vec<RawRecord>> {
        check_file(path, "csv")?;

        let content = std::fs::read_to_string(path)?;
        let delimiter = Self::detect_delimiter(&content);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push((row_idx + 1, row_map));
        }

        debug!(path = %path.display(), rows = records.len(), "CSV 解析完成");
        Ok(records)
    }

    /// 按表头行判断分隔符
    fn detect_delimiter(content: &str) -> u8 {
        let header = content.lines().next().unwrap_or_default();
        if header.matches(';').count() > header.matches(',').count() {
            b';'
        } else {
            b','
        }
    }
}

// ==========================================
// JSON Loader
// ==========================================
pub struct JsonLoader;

impl JsonLoader {
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> ImportResult<T> {
        check_file(path, "json")?;

        let file = File::open(path)?;
        let value = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), "JSON 加载完成");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_semicolon_csv_with_blank_lines() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Date ; Feed_Type_Id;quantity").unwrap();
        writeln!(file, "2024-01-01;F1; 5").unwrap();
        writeln!(file, ";;").unwrap();
        writeln!(file, "2024-01-02;F1;6").unwrap();

        let records = CsvParser.parse_to_raw_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[0].1.get("feed_type_id").map(String::as_str), Some("F1"));
        assert_eq!(records[0].1.get("quantity").map(String::as_str), Some("5"));
        assert_eq!(records[1].0, 3);
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let err = CsvParser.parse_to_raw_records(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_missing_file() {
        let err = JsonLoader
            .load::<serde_json::Value>(Path::new("/nonexistent/batch.json"))
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }
}
