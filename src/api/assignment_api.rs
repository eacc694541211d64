// ==========================================
// 학년 담임 배정 시스템 - 배정 API
// ==========================================
// 책임: 입력 로드 → 규칙 로드 → 엔진 실행 → 연도 결과 교체
// 동시성: 같은 인스턴스의 실행은 내부 잠금으로 직렬화,
//         저장은 IMMEDIATE 트랜잭션 1개
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::RuleSetReader;
use crate::domain::{Assignment, Grade, ALL_GRADES};
use crate::engine::{AllocationEngine, AllocationResult};
use crate::repository::{
    AssignmentRepository, GradeSettingRepository, PreferenceRepository, TeacherRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// 학년별 필요/배정 현황
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeSummaryRow {
    pub grade: Grade,
    pub required_homerooms: u32,
    pub assigned: usize,
}

/// 학년별 지망 인원
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceSummaryRow {
    pub grade: Grade,
    pub first: usize,
    pub second: usize,
    pub third: usize,
}

// ==========================================
// AssignmentApi - 배정 유스케이스
// ==========================================
pub struct AssignmentApi<C>
where
    C: RuleSetReader,
{
    config: Arc<C>,
    teachers: TeacherRepository,
    preferences: PreferenceRepository,
    settings: GradeSettingRepository,
    assignments: AssignmentRepository,
    run_lock: Mutex<()>,
}

impl<C> AssignmentApi<C>
where
    C: RuleSetReader,
{
    pub fn new(conn: Arc<Mutex<Connection>>, config: Arc<C>) -> Self {
        Self {
            config,
            teachers: TeacherRepository::from_connection(conn.clone()),
            preferences: PreferenceRepository::from_connection(conn.clone()),
            settings: GradeSettingRepository::from_connection(conn.clone()),
            assignments: AssignmentRepository::from_connection(conn),
            run_lock: Mutex::new(()),
        }
    }

    /// 배정 실행 + 저장
    ///
    /// # 반환
    /// - Ok: 엔진 결과 (저장 완료)
    /// - Err: 설정/데이터 오류 시 기존 결과는 그대로 유지
    #[instrument(skip(self))]
    pub fn run_assignment(&self, year: i32) -> ApiResult<AllocationResult> {
        let _guard = self
            .run_lock
            .lock()
            .map_err(|e| ApiError::Lock(e.to_string()))?;

        let teachers = self.teachers.list_all()?;
        let settings = self.settings.list_by_year(year)?;
        let preferences = self.preferences.map_by_year(year)?;
        let rules = self.config.load_rule_set()?;

        let engine = AllocationEngine::new(Arc::new(rules));
        let result = engine.run(&teachers, &settings, &preferences, year)?;

        let saved = self.assignments.replace_for_year(year, &result.assignments)?;
        info!(
            run_id = %result.run_id,
            saved,
            excluded = result.excluded.len(),
            unresolved = result.unresolved.len(),
            "배정 결과 저장 완료"
        );
        Ok(result)
    }

    pub fn list_assignments(&self, year: i32) -> ApiResult<Vec<Assignment>> {
        Ok(self.assignments.list_by_year(year)?)
    }

    /// 학급 설정 학년 + 배정이 있는 학년 (오름차순)
    pub fn grade_summary(&self, year: i32) -> ApiResult<Vec<GradeSummaryRow>> {
        let mut rows: BTreeMap<Grade, GradeSummaryRow> = BTreeMap::new();

        for s in self.settings.list_by_year(year)? {
            rows.insert(
                s.grade,
                GradeSummaryRow {
                    grade: s.grade,
                    required_homerooms: s.required_homerooms,
                    assigned: 0,
                },
            );
        }

        for a in self.assignments.list_by_year(year)? {
            rows.entry(a.assigned_grade)
                .or_insert(GradeSummaryRow {
                    grade: a.assigned_grade,
                    required_homerooms: 0,
                    assigned: 0,
                })
                .assigned += 1;
        }

        Ok(rows.into_values().collect())
    }

    /// 1~6학년 지망 인원 (입력된 순위 그대로, 압축 없음)
    pub fn preference_summary(&self, year: i32) -> ApiResult<Vec<PreferenceSummaryRow>> {
        let mut rows: BTreeMap<Grade, PreferenceSummaryRow> = ALL_GRADES
            .iter()
            .map(|g| {
                (
                    *g,
                    PreferenceSummaryRow {
                        grade: *g,
                        ..Default::default()
                    },
                )
            })
            .collect();

        for p in self.preferences.list_by_year(year)? {
            if let Some(row) = p.first_choice_grade.and_then(|g| rows.get_mut(&g)) {
                row.first += 1;
            }
            if let Some(row) = p.second_choice_grade.and_then(|g| rows.get_mut(&g)) {
                row.second += 1;
            }
            if let Some(row) = p.third_choice_grade.and_then(|g| rows.get_mut(&g)) {
                row.third += 1;
            }
        }

        Ok(rows.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::{GradeSetting, Preference, Teacher};
    use crate::engine::EngineError;

    fn setup() -> (Arc<Mutex<Connection>>, AssignmentApi<RuleSet>) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let api = AssignmentApi::new(conn.clone(), Arc::new(RuleSet::default()));
        (conn, api)
    }

    #[test]
    fn test_run_without_settings_keeps_previous_results() {
        let (conn, api) = setup();
        let tid = TeacherRepository::from_connection(conn.clone())
            .upsert_by_name(&Teacher::new(0, "가"))
            .unwrap();
        GradeSettingRepository::from_connection(conn.clone())
            .upsert(&GradeSetting::new(2027, 3, 1))
            .unwrap();

        let first = api.run_assignment(2027).unwrap();
        assert_eq!(first.assignments.len(), 1);
        assert_eq!(first.assignments[0].teacher_id, tid);

        GradeSettingRepository::from_connection(conn).delete_by_year(2027).unwrap();
        let err = api.run_assignment(2027).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Engine(EngineError::NoGradeSettings { year: 2027 })
        ));
        assert_eq!(api.list_assignments(2027).unwrap().len(), 1);
    }

    #[test]
    fn test_summaries() {
        let (conn, api) = setup();
        let teachers = TeacherRepository::from_connection(conn.clone());
        let a = teachers.upsert_by_name(&Teacher::new(0, "가")).unwrap();
        let b = teachers.upsert_by_name(&Teacher::new(0, "나")).unwrap();
        let prefs = PreferenceRepository::from_connection(conn.clone());
        prefs.upsert(&Preference::new(a, 2027).with_choices(Some(1), Some(2), None)).unwrap();
        prefs.upsert(&Preference::new(b, 2027).with_choices(Some(1), None, Some(2))).unwrap();
        let settings = GradeSettingRepository::from_connection(conn);
        settings.upsert(&GradeSetting::new(2027, 1, 1)).unwrap();
        settings.upsert(&GradeSetting::new(2027, 2, 2)).unwrap();

        api.run_assignment(2027).unwrap();

        let summary = api.grade_summary(2027).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0], GradeSummaryRow { grade: 1, required_homerooms: 1, assigned: 1 });
        assert_eq!(summary[1].assigned, 1);

        let pref_summary = api.preference_summary(2027).unwrap();
        assert_eq!(pref_summary.len(), 6);
        assert_eq!(pref_summary[0].first, 2);
        assert_eq!(pref_summary[1].second, 1);
        assert_eq!(pref_summary[1].third, 1);
    }
}
