// ==========================================
// 학년 담임 배정 시스템 - 파일 해석기
// ==========================================
// 지원: Excel (.xlsx/.xls) / CSV (.csv)
// 출력: 헤더 → 값 맵의 행 목록 (완전히 빈 행은 제외)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 헤더 → 셀 값
pub type RawRecord = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 파일을 행 목록으로 해석
    ///
    /// `sheet` 는 통합 문서에서 읽을 시트 이름 (CSV 는 무시).
    fn parse_to_raw_records(&self, file_path: &Path, sheet: Option<&str>)
        -> ImportResult<Vec<RawRecord>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 헤더와 셀 값을 묶어 1행 생성 (전부 비면 None)
fn build_record<I>(headers: &[String], values: I) -> Option<RawRecord>
where
    I: IntoIterator<Item = String>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx).filter(|h| !h.is_empty()) {
            row_map.insert(header.clone(), value.trim().to_string());
        }
    }

    if row_map.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(row_map)
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
        _sheet: Option<&str>,
    ) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 행 길이 불일치 허용
            .from_reader(file);

        // 엑셀에서 저장한 UTF-8 BOM 제거
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row) = build_record(&headers, record.iter().map(str::to_string)) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 통합 문서의 시트 이름 목록
    pub fn sheet_names(file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        let workbook = open_workbook_auto(file_path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;
        Ok(workbook.sheet_names().iter().map(|n| n.trim().to_string()).collect())
    }

    /// 셀 → 문자열 (정수로 표현 가능한 실수는 소수점 제거)
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_records(
        &self,
        file_path: &Path,
        sheet: Option<&str>,
    ) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 파일에 시트가 없습니다".to_string(),
            ));
        }

        // 이름이 같은 시트 우선, 없으면 첫 시트
        let sheet_name = match sheet {
            Some(wanted) => sheet_names
                .iter()
                .find(|n| n.trim() == wanted)
                .cloned()
                .unwrap_or_else(|| sheet_names[0].clone()),
            None => sheet_names[0].clone(),
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 시트에 데이터 행이 없습니다".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| Self::cell_to_string(cell).trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            if let Some(row) = build_record(&headers, data_row.iter().map(Self::cell_to_string)) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// 범용 파일 해석기 (확장자로 자동 선택)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn is_workbook<P: AsRef<Path>>(file_path: P) -> bool {
        matches!(extension_of(file_path.as_ref()).as_str(), "xlsx" | "xls")
    }

    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<Vec<RawRecord>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path, sheet),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path, sheet),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&["이름,현재 학년,역할", "김교사,3,학년부장", "이교사,,"]);

        let records = CsvParser.parse_to_raw_records(file.path(), None).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("이름"), Some(&"김교사".to_string()));
        assert_eq!(records[0].get("현재 학년"), Some(&"3".to_string()));
        assert_eq!(records[1].get("역할"), Some(&String::new()));
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let file = csv_file(&["\u{feff}학년,필요 담임 수", "1,3"]);
        let records = CsvParser.parse_to_raw_records(file.path(), None).unwrap();
        assert_eq!(records[0].get("학년"), Some(&"1".to_string()));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let file = csv_file(&["이름,역할", "김교사,", ",", "박교사,교과전담"]);
        let records = CsvParser.parse_to_raw_records(file.path(), None).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"), None);
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse(file.path(), None);
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
        assert!(UniversalFileParser::is_workbook("학년배정.xlsx"));
        assert!(!UniversalFileParser::is_workbook("teachers.csv"));
    }
}
