// ==========================================
// 학년 담임 배정 시스템 - 희망 학년 / 학급 설정 저장소
// ==========================================
// preferences: (교사, 연도)당 1건
// grade_settings: (연도, 학년)당 1건
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Grade, GradeSetting, Preference, TeacherId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// PreferenceRepository
// ==========================================
pub struct PreferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PreferenceRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// (teacher_id, year) 기준 삽입/갱신
    pub fn upsert(&self, pref: &Preference) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO preferences (
                teacher_id, year,
                first_choice_grade, second_choice_grade, third_choice_grade,
                wants_grade_head, wants_subject_teacher, wants_duty_head, comment
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(teacher_id, year) DO UPDATE SET
                first_choice_grade = excluded.first_choice_grade,
                second_choice_grade = excluded.second_choice_grade,
                third_choice_grade = excluded.third_choice_grade,
                wants_grade_head = excluded.wants_grade_head,
                wants_subject_teacher = excluded.wants_subject_teacher,
                wants_duty_head = excluded.wants_duty_head,
                comment = excluded.comment
            "#,
            params![
                pref.teacher_id,
                pref.year,
                pref.first_choice_grade,
                pref.second_choice_grade,
                pref.third_choice_grade,
                pref.wants_grade_head,
                pref.wants_subject_teacher,
                pref.wants_duty_head,
                pref.comment,
            ],
        )?;
        Ok(())
    }

    pub fn find(&self, teacher_id: TeacherId, year: i32) -> RepositoryResult<Option<Preference>> {
        let conn = self.get_conn()?;
        let pref = conn
            .query_row(
                r#"
                SELECT teacher_id, year,
                       first_choice_grade, second_choice_grade, third_choice_grade,
                       wants_grade_head, wants_subject_teacher, wants_duty_head, comment
                FROM preferences WHERE teacher_id = ?1 AND year = ?2
                "#,
                params![teacher_id, year],
                map_preference,
            )
            .optional()?;
        Ok(pref)
    }

    pub fn list_by_year(&self, year: i32) -> RepositoryResult<Vec<Preference>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT teacher_id, year,
                   first_choice_grade, second_choice_grade, third_choice_grade,
                   wants_grade_head, wants_subject_teacher, wants_duty_head, comment
            FROM preferences WHERE year = ?1
            ORDER BY teacher_id
            "#,
        )?;
        let prefs = stmt
            .query_map(params![year], map_preference)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prefs)
    }

    /// 엔진 입력 형태 (teacher_id → 희망)
    pub fn map_by_year(&self, year: i32) -> RepositoryResult<HashMap<TeacherId, Preference>> {
        Ok(self
            .list_by_year(year)?
            .into_iter()
            .map(|p| (p.teacher_id, p))
            .collect())
    }

    /// 연도 희망 전체 삭제 (재입력 전)
    pub fn delete_by_year(&self, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count = conn.execute("DELETE FROM preferences WHERE year = ?1", params![year])?;
        Ok(count)
    }
}

fn map_preference(row: &Row<'_>) -> rusqlite::Result<Preference> {
    Ok(Preference {
        teacher_id: row.get(0)?,
        year: row.get(1)?,
        first_choice_grade: row.get(2)?,
        second_choice_grade: row.get(3)?,
        third_choice_grade: row.get(4)?,
        wants_grade_head: row.get(5)?,
        wants_subject_teacher: row.get(6)?,
        wants_duty_head: row.get(7)?,
        comment: row.get(8)?,
    })
}

// ==========================================
// GradeSettingRepository
// ==========================================
pub struct GradeSettingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GradeSettingRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// (year, grade) 기준 삽입/갱신
    pub fn upsert(&self, setting: &GradeSetting) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO grade_settings (
                year, grade, class_count,
                required_homerooms, required_subject_teachers, required_duty_heads
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(year, grade) DO UPDATE SET
                class_count = excluded.class_count,
                required_homerooms = excluded.required_homerooms,
                required_subject_teachers = excluded.required_subject_teachers,
                required_duty_heads = excluded.required_duty_heads
            "#,
            params![
                setting.year,
                setting.grade,
                setting.class_count,
                setting.required_homerooms,
                setting.required_subject_teachers,
                setting.required_duty_heads,
            ],
        )?;
        Ok(())
    }

    /// 연도별 설정 (학년 오름차순)
    pub fn list_by_year(&self, year: i32) -> RepositoryResult<Vec<GradeSetting>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT year, grade, class_count,
                   required_homerooms, required_subject_teachers, required_duty_heads
            FROM grade_settings WHERE year = ?1
            ORDER BY grade
            "#,
        )?;
        let settings = stmt
            .query_map(params![year], |row| {
                Ok(GradeSetting {
                    year: row.get(0)?,
                    grade: row.get::<_, Grade>(1)?,
                    class_count: row.get(2)?,
                    required_homerooms: row.get(3)?,
                    required_subject_teachers: row.get(4)?,
                    required_duty_heads: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(settings)
    }

    pub fn delete_by_year(&self, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count = conn.execute("DELETE FROM grade_settings WHERE year = ?1", params![year])?;
        Ok(count)
    }
}
