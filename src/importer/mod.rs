// ==========================================
// 학년 담임 배정 시스템 - 가져오기/내보내기 계층
// ==========================================
// 책임: 외부 파일(교사정보/희망사항/학년설정) → 저장소, 배정 결과 → CSV
// 지원: Excel, CSV
// ==========================================

pub mod data_importer;
pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;

// 핵심 타입 재노출
pub use data_importer::{DataImporter, ImportReport};
pub use error::{ImportError, ImportIssue, ImportResult};
pub use exporter::ResultExporter;
pub use field_mapper::{
    parse_bool_text, parse_history, FieldMapper, NamedPreference, SHEET_GRADE_SETTINGS,
    SHEET_PREFERENCES, SHEET_TEACHERS,
};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
