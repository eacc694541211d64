// ==========================================
// 학년 담임 배정 시스템 - SQLite 연결 / 스키마
// ==========================================
// 목표:
// - 모든 Connection::open 에 동일한 PRAGMA 적용 (외래키, busy_timeout)
// - 스키마 생성은 멱등 (CREATE TABLE IF NOT EXISTS)
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 기본 busy_timeout (밀리초)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 현재 코드가 기대하는 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// DB 경로 지정 환경 변수
pub const DB_PATH_ENV: &str = "HOMEROOM_ASSIGN_DB_PATH";

/// 연결 단위 PRAGMA 설정
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// SQLite 연결 열기 + 공통 설정
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 스키마 생성 (멱등)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS teachers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            gender TEXT,
            hire_year INTEGER,
            school_join_year INTEGER,
            current_grade INTEGER,
            current_class TEXT,
            is_homeroom_current INTEGER NOT NULL DEFAULT 0,
            is_subject_teacher INTEGER NOT NULL DEFAULT 0,
            duty_role TEXT,
            subject TEXT,
            special_conditions TEXT,
            grade_history TEXT
        );

        CREATE TABLE IF NOT EXISTS preferences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_id INTEGER NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            year INTEGER NOT NULL,
            first_choice_grade INTEGER,
            second_choice_grade INTEGER,
            third_choice_grade INTEGER,
            wants_grade_head INTEGER NOT NULL DEFAULT 0,
            wants_subject_teacher INTEGER NOT NULL DEFAULT 0,
            wants_duty_head INTEGER NOT NULL DEFAULT 0,
            comment TEXT,
            UNIQUE (teacher_id, year)
        );

        CREATE TABLE IF NOT EXISTS grade_settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL,
            grade INTEGER NOT NULL,
            class_count INTEGER NOT NULL DEFAULT 0,
            required_homerooms INTEGER NOT NULL DEFAULT 0,
            required_subject_teachers INTEGER NOT NULL DEFAULT 0,
            required_duty_heads INTEGER NOT NULL DEFAULT 0,
            UNIQUE (year, grade)
        );

        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_id INTEGER NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
            year INTEGER NOT NULL,
            assigned_grade INTEGER NOT NULL,
            assignment_type TEXT NOT NULL,
            rule_reference TEXT,
            description TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_assignments_year ON assignments(year);

        CREATE TABLE IF NOT EXISTS assignment_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assignment_id INTEGER NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
            step TEXT NOT NULL,
            message TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// schema_version 조회 (테이블 없으면 None)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 기본 DB 경로
///
/// 1. 환경 변수 HOMEROOM_ASSIGN_DB_PATH
/// 2. 사용자 데이터 디렉터리/homeroom-assign/homeroom_assign.db
/// 3. ./homeroom_assign.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./homeroom_assign.db");
    if let Some(data_dir) = dirs::data_dir() {
        let app_dir = data_dir.join("homeroom-assign");
        if std::fs::create_dir_all(&app_dir).is_ok() {
            path = app_dir.join("homeroom_assign.db");
        }
    }
    path.to_string_lossy().to_string()
}
