// ==========================================
// 학년 담임 배정 시스템 - 결과 내보내기 (CSV)
// ==========================================
// assignments_{year}.csv : 배정 결과
// excluded_{year}.csv    : 배정 제외 교사 + 사유
// grade_counts_{year}.csv: 학년별 배정 인원
// ==========================================

use crate::domain::{Assignment, Grade};
use crate::engine::AllocationResult;
use crate::importer::error::{ImportError, ImportResult};
use csv::Writer;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 사유를 찾지 못한 제외 교사에 쓰는 기본 문구
const DEFAULT_EXCLUDE_REASON: &str = "제13조: 배정 제외";

pub struct ResultExporter {
    out_dir: PathBuf,
}

impl ResultExporter {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> ImportResult<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir).map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(Self { out_dir })
    }

    fn writer(&self, file_name: String) -> ImportResult<(Writer<fs::File>, PathBuf)> {
        let path = self.out_dir.join(file_name);
        let writer = Writer::from_path(&path)
            .map_err(|e| ImportError::FileWriteError(format!("{}: {}", path.display(), e)))?;
        Ok((writer, path))
    }

    /// 배정 결과 CSV
    pub fn export_assignments(&self, year: i32, assignments: &[Assignment]) -> ImportResult<PathBuf> {
        let (mut wtr, path) = self.writer(format!("assignments_{}.csv", year))?;
        wtr.write_record([
            "teacher_id",
            "teacher_name",
            "assigned_grade",
            "assignment_type",
            "rule_reference",
            "description",
        ])?;

        for a in assignments {
            wtr.write_record([
                a.teacher_id.to_string(),
                a.teacher_name.clone(),
                a.assigned_grade.to_string(),
                a.assignment_type.to_string(),
                a.rule_reference.clone().unwrap_or_default(),
                a.description.clone(),
            ])?;
        }
        wtr.flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;

        info!(path = %path.display(), rows = assignments.len(), "배정 결과 내보내기");
        Ok(path)
    }

    /// 학년별 배정 인원 CSV
    pub fn export_grade_counts(&self, year: i32, assignments: &[Assignment]) -> ImportResult<PathBuf> {
        let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
        for a in assignments {
            *counts.entry(a.assigned_grade).or_insert(0) += 1;
        }

        let (mut wtr, path) = self.writer(format!("grade_counts_{}.csv", year))?;
        wtr.write_record(["grade", "assigned"])?;
        for (grade, count) in &counts {
            wtr.write_record([grade.to_string(), count.to_string()])?;
        }
        wtr.flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(path)
    }

    /// 제외 교사 CSV (실행 결과가 있을 때만 사유를 알 수 있음)
    pub fn export_excluded(&self, result: &AllocationResult) -> ImportResult<PathBuf> {
        let (mut wtr, path) = self.writer(format!("excluded_{}.csv", result.year))?;
        wtr.write_record(["teacher_id", "teacher_name", "reason"])?;
        for t in &result.excluded {
            let reason = result.excluded_reason(t.id).unwrap_or(DEFAULT_EXCLUDE_REASON);
            wtr.write_record([t.id.to_string(), t.name.clone(), reason.to_string()])?;
        }
        wtr.flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(path)
    }

    /// 실행 결과 전체 내보내기
    pub fn export_run(&self, result: &AllocationResult) -> ImportResult<Vec<PathBuf>> {
        Ok(vec![
            self.export_assignments(result.year, &result.assignments)?,
            self.export_excluded(result)?,
            self.export_grade_counts(result.year, &result.assignments)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssignmentType;
    use tempfile::TempDir;

    fn assignment(id: i64, grade: Grade) -> Assignment {
        Assignment {
            teacher_id: id,
            teacher_name: format!("교사{}", id),
            year: 2027,
            assigned_grade: grade,
            assignment_type: AssignmentType::Adjustment,
            rule_reference: None,
            description: "학년가중치: 5점 | 총점: 5점".to_string(),
        }
    }

    #[test]
    fn test_export_assignments_csv() {
        let dir = TempDir::new().unwrap();
        let exporter = ResultExporter::new(dir.path()).unwrap();
        let path = exporter
            .export_assignments(2027, &[assignment(1, 1), assignment(2, 3)])
            .unwrap();

        assert!(path.ends_with("assignments_2027.csv"));
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "교사1");
        assert_eq!(&rows[0][3], "조정");
        assert_eq!(&rows[1][2], "3");
    }

    #[test]
    fn test_export_grade_counts_sorted() {
        let dir = TempDir::new().unwrap();
        let exporter = ResultExporter::new(dir.path().join("nested")).unwrap();
        let path = exporter
            .export_grade_counts(2027, &[assignment(1, 6), assignment(2, 1), assignment(3, 6)])
            .unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "grade,assigned\n1,1\n6,2\n");
    }
}
