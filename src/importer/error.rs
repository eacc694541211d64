// ==========================================
// 학년 담임 배정 시스템 - 가져오기 모듈 오류 타입
// ==========================================
// 파일/형식 오류는 가져오기 전체 실패
// 행 단위 이상값은 ImportIssue 로 모으고 해당 값/행만 건너뜀
// ==========================================

use crate::repository::RepositoryError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// 가져오기 모듈 오류 타입
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 파일 관련 오류 =====
    #[error("파일 없음: {0}")]
    FileNotFound(String),

    #[error("지원하지 않는 파일 형식: {0} (.xlsx/.xls/.csv 만 지원)")]
    UnsupportedFormat(String),

    #[error("파일 읽기 실패: {0}")]
    FileReadError(String),

    #[error("파일 쓰기 실패: {0}")]
    FileWriteError(String),

    #[error("Excel 해석 실패: {0}")]
    ExcelParseError(String),

    #[error("CSV 해석 실패: {0}")]
    CsvParseError(String),

    #[error("'{0}' 시트가 없습니다.")]
    SheetNotFound(String),

    // ===== 저장 오류 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 타입 별칭
pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// ImportIssue - 행 단위 경고 (가져오기 계속 진행)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub sheet: String,
    /// 데이터 행 번호 (헤더 다음 행이 1)
    pub row: usize,
    pub message: String,
}

impl ImportIssue {
    pub fn new(sheet: &str, row: usize, message: impl Into<String>) -> Self {
        Self {
            sheet: sheet.to_string(),
            row,
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}행: {}", self.sheet, self.row, self.message)
    }
}
