// ==========================================
// 학년 담임 배정 시스템 - 배정 결과 저장소
// ==========================================
// 같은 연도 결과는 삭제 후 삽입 (병합 없음)
// 삭제/삽입은 하나의 IMMEDIATE 트랜잭션 (동시 실행 시 쓰기 잠금 선점)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Assignment, AssignmentType, TeacherId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, TransactionBehavior};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// 배정 로그 단계명
pub const ASSIGN_STEP: &str = "assign";

/// assignment_logs 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentLogRow {
    pub assignment_id: i64,
    pub teacher_id: TeacherId,
    pub step: String,
    pub message: String,
}

pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRepository {
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

    /// 연도 결과 전체 교체
    ///
    /// # 반환
    /// 삽입 건수. 실패 시 기존 결과 유지 (롤백)
    pub fn replace_for_year(
        &self,
        year: i32,
        assignments: &[Assignment],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "DELETE FROM assignment_logs WHERE assignment_id IN (SELECT id FROM assignments WHERE year = ?1)",
            params![year],
        )?;
        tx.execute("DELETE FROM assignments WHERE year = ?1", params![year])?;

        {
            let mut insert = tx.prepare(
                r#"
                INSERT INTO assignments (
                    teacher_id, year, assigned_grade, assignment_type, rule_reference, description
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            let mut insert_log = tx.prepare(
                "INSERT INTO assignment_logs (assignment_id, step, message) VALUES (?1, ?2, ?3)",
            )?;

            for a in assignments {
                if a.year != year {
                    return Err(RepositoryError::FieldValueError {
                        field: "year".to_string(),
                        message: format!("teacher_id={} 의 연도 {} ≠ {}", a.teacher_id, a.year, year),
                    });
                }
                let assignment_id = insert.insert(params![
                    a.teacher_id,
                    a.year,
                    a.assigned_grade,
                    a.assignment_type.as_str(),
                    a.rule_reference,
                    a.description,
                ])?;
                insert_log.execute(params![assignment_id, ASSIGN_STEP, a.description])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(assignments.len())
    }

    /// 연도별 배정 결과 (저장 순서)
    pub fn list_by_year(&self, year: i32) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT a.teacher_id, t.name, a.year, a.assigned_grade,
                   a.assignment_type, a.rule_reference, a.description
            FROM assignments a
            JOIN teachers t ON t.id = a.teacher_id
            WHERE a.year = ?1
            ORDER BY a.id
            "#,
        )?;

        let rows = stmt
            .query_map(params![year], |row| {
                Ok((
                    row.get::<_, TeacherId>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i32>(2)?,
                    row.get::<_, u8>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(teacher_id, teacher_name, year, grade, raw_type, rule_reference, description)| {
                    let assignment_type = AssignmentType::from_str(&raw_type).map_err(|msg| {
                        RepositoryError::FieldValueError {
                            field: "assignment_type".to_string(),
                            message: msg,
                        }
                    })?;
                    Ok(Assignment {
                        teacher_id,
                        teacher_name,
                        year,
                        assigned_grade: grade,
                        assignment_type,
                        rule_reference,
                        description: description.unwrap_or_default(),
                    })
                },
            )
            .collect()
    }

    pub fn list_logs(&self, year: i32) -> RepositoryResult<Vec<AssignmentLogRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT l.assignment_id, a.teacher_id, l.step, l.message
            FROM assignment_logs l
            JOIN assignments a ON a.id = l.assignment_id
            WHERE a.year = ?1
            ORDER BY l.id
            "#,
        )?;
        let logs = stmt
            .query_map(params![year], |row| {
                Ok(AssignmentLogRow {
                    assignment_id: row.get(0)?,
                    teacher_id: row.get(1)?,
                    step: row.get(2)?,
                    message: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    pub fn count_by_year(&self, year: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM assignments WHERE year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}
