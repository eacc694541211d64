// ==========================================
// 학년 담임 배정 시스템 - 교사 저장소
// ==========================================
// 원칙: 저장소에는 업무 로직 없음
// 이름이 자연키 (가져오기 시 같은 이름이면 갱신)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{GradeHistoryEntry, Teacher, TeacherId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, gender, hire_year, school_join_year,
           current_grade, current_class, is_homeroom_current,
           is_subject_teacher, duty_role, subject, special_conditions,
           grade_history
    FROM teachers
"#;

// ==========================================
// TeacherRepository - 교사 저장소
// ==========================================
/// teachers 테이블 CRUD
pub struct TeacherRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeacherRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 기존 연결로 저장소 생성
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 이름 기준 삽입/갱신, 저장된 id 반환
    ///
    /// `teacher.id` 는 무시된다 (신규는 자동 증가, 기존은 기존 id 유지).
    pub fn upsert_by_name(&self, teacher: &Teacher) -> RepositoryResult<TeacherId> {
        let history = serde_json::to_string(&teacher.grade_history).map_err(|e| {
            RepositoryError::JsonColumn {
                column: "grade_history".to_string(),
                message: e.to_string(),
            }
        })?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO teachers (
                name, gender, hire_year, school_join_year,
                current_grade, current_class, is_homeroom_current,
                is_subject_teacher, duty_role, subject, special_conditions,
                grade_history
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(name) DO UPDATE SET
                gender = excluded.gender,
                hire_year = excluded.hire_year,
                school_join_year = excluded.school_join_year,
                current_grade = excluded.current_grade,
                current_class = excluded.current_class,
                is_homeroom_current = excluded.is_homeroom_current,
                is_subject_teacher = excluded.is_subject_teacher,
                duty_role = excluded.duty_role,
                subject = excluded.subject,
                special_conditions = excluded.special_conditions,
                grade_history = excluded.grade_history
            "#,
            params![
                teacher.name,
                teacher.gender,
                teacher.hire_year,
                teacher.school_join_year,
                teacher.current_grade,
                teacher.current_class,
                teacher.is_homeroom_current,
                teacher.is_subject_teacher,
                teacher.duty_role,
                teacher.subject,
                teacher.special_conditions,
                history,
            ],
        )?;

        let id = conn.query_row(
            "SELECT id FROM teachers WHERE name = ?1",
            params![teacher.name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn find_by_id(&self, id: TeacherId) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![id], map_row)
            .optional()?;
        row.map(finish_row).transpose()
    }

    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE name = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![name.trim()], map_row)
            .optional()?;
        row.map(finish_row).transpose()
    }

    /// 전체 교사 (id 오름차순 = 배정 동점 처리 순서)
    pub fn list_all(&self) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(finish_row).collect()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM teachers", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn delete(&self, id: TeacherId) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM teachers WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Teacher".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// 행 → (교사, 이력 JSON 원문)
fn map_row(row: &Row<'_>) -> rusqlite::Result<(Teacher, Option<String>)> {
    let teacher = Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        gender: row.get(2)?,
        hire_year: row.get(3)?,
        school_join_year: row.get(4)?,
        current_grade: row.get(5)?,
        current_class: row.get(6)?,
        is_homeroom_current: row.get(7)?,
        is_subject_teacher: row.get(8)?,
        duty_role: row.get(9)?,
        subject: row.get(10)?,
        special_conditions: row.get(11)?,
        grade_history: Vec::new(),
    };
    Ok((teacher, row.get(12)?))
}

fn finish_row((mut teacher, history): (Teacher, Option<String>)) -> RepositoryResult<Teacher> {
    if let Some(raw) = history.filter(|s| !s.trim().is_empty()) {
        teacher.grade_history = serde_json::from_str::<Vec<GradeHistoryEntry>>(&raw).map_err(
            |e| RepositoryError::JsonColumn {
                column: "grade_history".to_string(),
                message: format!("teacher_id={}: {}", teacher.id, e),
            },
        )?;
    }
    Ok(teacher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn repo() -> TeacherRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        TeacherRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_upsert_and_find() {
        let repo = repo();
        let mut t = Teacher::new(0, "김하늘");
        t.current_grade = Some(3);
        t.is_subject_teacher = true;
        t.grade_history = vec![GradeHistoryEntry { year: 2024, grade: 2 }];

        let id = repo.upsert_by_name(&t).unwrap();
        let loaded = repo.find_by_id(id).unwrap().unwrap();

        assert_eq!(loaded.name, "김하늘");
        assert_eq!(loaded.current_grade, Some(3));
        assert!(loaded.is_subject_teacher);
        assert_eq!(loaded.grade_history, t.grade_history);
    }

    #[test]
    fn test_upsert_same_name_updates_in_place() {
        let repo = repo();
        let mut t = Teacher::new(0, "이바다");
        let first = repo.upsert_by_name(&t).unwrap();

        t.duty_role = Some("학년부장".to_string());
        let second = repo.upsert_by_name(&t).unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.count().unwrap(), 1);
        let loaded = repo.find_by_name("이바다").unwrap().unwrap();
        assert_eq!(loaded.duty_role.as_deref(), Some("학년부장"));
    }

    #[test]
    fn test_list_all_in_id_order() {
        let repo = repo();
        for name in ["가", "나", "다"] {
            repo.upsert_by_name(&Teacher::new(0, name)).unwrap();
        }
        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["가", "나", "다"]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let repo = repo();
        assert!(matches!(
            repo.delete(42),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
