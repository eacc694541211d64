// ==========================================
// 학년 담임 배정 시스템 - 입력 데이터 가져오기
// ==========================================
// 흐름: 파일 해석 → 필드 매핑 → 저장 (교사 → 희망 → 학급 설정)
// 원칙: 행 단위 문제는 ImportIssue 로 보고하고 계속 진행
// ==========================================

use crate::importer::error::{ImportError, ImportIssue, ImportResult};
use crate::importer::field_mapper::{
    FieldMapper, SHEET_GRADE_SETTINGS, SHEET_PREFERENCES, SHEET_TEACHERS,
};
use crate::importer::file_parser::{ExcelParser, UniversalFileParser};
use crate::repository::{GradeSettingRepository, PreferenceRepository, TeacherRepository};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// 시트 1개 가져오기 결과
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub sheet: String,
    pub total_rows: usize,
    pub imported: usize,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    fn new(sheet: &str, total_rows: usize) -> Self {
        Self {
            sheet: sheet.to_string(),
            total_rows,
            imported: 0,
            issues: Vec::new(),
        }
    }

    fn log_issues(&self) {
        for issue in &self.issues {
            warn!(sheet = %issue.sheet, row = issue.row, "{}", issue.message);
        }
    }
}

pub struct DataImporter {
    parser: UniversalFileParser,
    mapper: FieldMapper,
    teachers: TeacherRepository,
    preferences: PreferenceRepository,
    settings: GradeSettingRepository,
}

impl DataImporter {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
            teachers: TeacherRepository::from_connection(conn.clone()),
            preferences: PreferenceRepository::from_connection(conn.clone()),
            settings: GradeSettingRepository::from_connection(conn),
        }
    }

    /// 교사정보 가져오기 (같은 이름이면 갱신)
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_teachers<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportReport> {
        let rows = self.parser.parse(file_path.as_ref(), Some(SHEET_TEACHERS))?;
        let mut report = ImportReport::new(SHEET_TEACHERS, rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            let Some(teacher) = self.mapper.map_teacher(row, row_number, &mut report.issues) else {
                report
                    .issues
                    .push(ImportIssue::new(SHEET_TEACHERS, row_number, "이름 없음, 행 건너뜀"));
                continue;
            };
            self.teachers.upsert_by_name(&teacher)?;
            report.imported += 1;
        }

        report.log_issues();
        info!(total = report.total_rows, imported = report.imported, "교사정보 가져오기 완료");
        Ok(report)
    }

    /// 희망사항 가져오기 (교사 이름으로 연결, 등록되지 않은 이름은 건너뜀)
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_preferences<P: AsRef<Path>>(
        &self,
        file_path: P,
        year: i32,
    ) -> ImportResult<ImportReport> {
        let rows = self.parser.parse(file_path.as_ref(), Some(SHEET_PREFERENCES))?;
        let mut report = ImportReport::new(SHEET_PREFERENCES, rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            let Some(named) = self
                .mapper
                .map_preference(row, row_number, year, &mut report.issues)
            else {
                continue;
            };

            let Some(teacher) = self.teachers.find_by_name(&named.teacher_name)? else {
                report.issues.push(ImportIssue::new(
                    SHEET_PREFERENCES,
                    row_number,
                    format!("등록되지 않은 교사: {}", named.teacher_name),
                ));
                continue;
            };

            let mut pref = named.preference;
            pref.teacher_id = teacher.id;
            self.preferences.upsert(&pref)?;
            report.imported += 1;
        }

        report.log_issues();
        info!(total = report.total_rows, imported = report.imported, "희망사항 가져오기 완료");
        Ok(report)
    }

    /// 학년설정 가져오기
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_grade_settings<P: AsRef<Path>>(
        &self,
        file_path: P,
        year: i32,
    ) -> ImportResult<ImportReport> {
        let rows = self.parser.parse(file_path.as_ref(), Some(SHEET_GRADE_SETTINGS))?;
        let mut report = ImportReport::new(SHEET_GRADE_SETTINGS, rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let row_number = idx + 1;
            let Some(setting) =
                self.mapper
                    .map_grade_setting(row, row_number, year, &mut report.issues)
            else {
                continue;
            };
            self.settings.upsert(&setting)?;
            report.imported += 1;
        }

        report.log_issues();
        info!(total = report.total_rows, imported = report.imported, "학년설정 가져오기 완료");
        Ok(report)
    }

    /// 연도 희망 전체 삭제 (다시 가져오기 전)
    pub fn clear_preferences(&self, year: i32) -> ImportResult<usize> {
        let removed = self.preferences.delete_by_year(year)?;
        info!(year, removed, "기존 희망사항 삭제");
        Ok(removed)
    }

    /// 연도 학급 설정 전체 삭제 (다시 가져오기 전)
    pub fn clear_grade_settings(&self, year: i32) -> ImportResult<usize> {
        let removed = self.settings.delete_by_year(year)?;
        info!(year, removed, "기존 학년설정 삭제");
        Ok(removed)
    }

    /// 통합 문서 1개에서 세 시트 가져오기
    ///
    /// 교사정보/학년설정 시트는 필수, 희망사항 시트는 없으면 건너뜀.
    pub fn import_workbook<P: AsRef<Path>>(
        &self,
        file_path: P,
        year: i32,
    ) -> ImportResult<Vec<ImportReport>> {
        let path = file_path.as_ref();
        if !UniversalFileParser::is_workbook(path) {
            return Err(ImportError::UnsupportedFormat(path.display().to_string()));
        }

        let sheets = ExcelParser::sheet_names(path)?;
        for required in [SHEET_TEACHERS, SHEET_GRADE_SETTINGS] {
            if !sheets.iter().any(|s| s == required) {
                return Err(ImportError::SheetNotFound(required.to_string()));
            }
        }

        let mut reports = vec![self.import_teachers(path)?];
        if sheets.iter().any(|s| s == SHEET_PREFERENCES) {
            reports.push(self.import_preferences(path, year)?);
        } else {
            info!("희망사항 시트 없음, 건너뜀");
        }
        reports.push(self.import_grade_settings(path, year)?);
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use std::io::Write;
    use tempfile::TempDir;

    fn importer() -> (DataImporter, Arc<Mutex<Connection>>) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (DataImporter::from_connection(conn.clone()), conn)
    }

    fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_import_csv_sheets() {
        let dir = TempDir::new().unwrap();
        let teachers = write_csv(
            &dir,
            "teachers.csv",
            &["이름,현재 학년,교과전담 여부", "김교사,2,", "이교사,7,예", ",3,"],
        );
        let prefs = write_csv(
            &dir,
            "prefs.csv",
            &["교사 이름,1지망,2지망", "김교사,1,4", "없는교사,2,", "이교사,3,3"],
        );
        let settings = write_csv(&dir, "settings.csv", &["학년,필요 담임 수", "1,2", "4,1"]);

        let (importer, conn) = importer();
        let t = importer.import_teachers(&teachers).unwrap();
        assert_eq!(t.imported, 2);
        // 범위 밖 학년 1건 + 이름 없는 행 1건
        assert_eq!(t.issues.len(), 2);

        let p = importer.import_preferences(&prefs, 2027).unwrap();
        assert_eq!(p.imported, 1);
        assert_eq!(p.issues.len(), 2);

        let s = importer.import_grade_settings(&settings, 2027).unwrap();
        assert_eq!(s.imported, 2);

        let stored = PreferenceRepository::from_connection(conn.clone())
            .list_by_year(2027)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].choices(), vec![1, 4]);

        let lee = TeacherRepository::from_connection(conn)
            .find_by_name("이교사")
            .unwrap()
            .unwrap();
        assert_eq!(lee.current_grade, None);
        assert!(lee.is_subject_teacher);
    }

    #[test]
    fn test_reimport_updates_existing_teacher() {
        let dir = TempDir::new().unwrap();
        let first = write_csv(&dir, "a.csv", &["이름,역할", "김교사,"]);
        let second = write_csv(&dir, "b.csv", &["이름,역할", "김교사,학년부장"]);

        let (importer, conn) = importer();
        importer.import_teachers(&first).unwrap();
        importer.import_teachers(&second).unwrap();

        let repo = TeacherRepository::from_connection(conn);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            repo.find_by_name("김교사").unwrap().unwrap().duty_role.as_deref(),
            Some("학년부장")
        );
    }

    #[test]
    fn test_clear_then_reimport_preferences() {
        let dir = TempDir::new().unwrap();
        let teachers = write_csv(&dir, "t.csv", &["이름", "김교사", "이교사"]);
        let first = write_csv(&dir, "p1.csv", &["교사 이름,1지망", "김교사,1", "이교사,2"]);
        let second = write_csv(&dir, "p2.csv", &["교사 이름,1지망", "김교사,5"]);

        let (importer, conn) = importer();
        importer.import_teachers(&teachers).unwrap();
        importer.import_preferences(&first, 2027).unwrap();

        assert_eq!(importer.clear_preferences(2027).unwrap(), 2);
        importer.import_preferences(&second, 2027).unwrap();

        let stored = PreferenceRepository::from_connection(conn)
            .list_by_year(2027)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].choices(), vec![5]);
    }

    #[test]
    fn test_import_workbook_rejects_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "teachers.csv", &["이름", "김교사"]);
        let (importer, _) = importer();
        assert!(matches!(
            importer.import_workbook(&path, 2027),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
