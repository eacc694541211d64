// ==========================================
// 테스트 보조 함수
// ==========================================
// 책임: 임시 DB 생성 + 스키마 초기화
// ==========================================

#![allow(dead_code)]

use homeroom_assign::db::{init_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 임시 테스트 DB 생성
///
/// # 반환
/// - NamedTempFile: 임시 DB 파일 (테스트 동안 유지해야 함)
/// - String: DB 파일 경로
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("임시 파일 경로가 UTF-8 이 아님")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 공유 연결 열기
pub fn open_shared(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}
