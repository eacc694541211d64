// ==========================================
// 학년 담임 배정 시스템 - 저장소 계층 오류 타입
// ==========================================
// 도구: thiserror 파생 매크로
// ==========================================

use thiserror::Error;

/// 저장소 계층 오류 타입
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 데이터베이스 오류 =====
    #[error("레코드 없음: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("데이터베이스 잠금 획득 실패: {0}")]
    LockError(String),

    #[error("데이터베이스 트랜잭션 실패: {0}")]
    DatabaseTransactionError(String),

    #[error("데이터베이스 조회 실패: {0}")]
    DatabaseQueryError(String),

    #[error("유일 제약 위반: {0}")]
    UniqueConstraintViolation(String),

    #[error("외래키 제약 위반: {0}")]
    ForeignKeyViolation(String),

    // ===== 데이터 품질 오류 =====
    #[error("JSON 컬럼 오류 (column={column}): {message}")]
    JsonColumn { column: String, message: String },

    #[error("필드 값 오류 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 타입 별칭
pub type RepositoryResult<T> = Result<T, RepositoryError>;
