// ==========================================
// 학년 담임 배정 시스템 - API 계층 오류 타입
// ==========================================
// 책임: 하위 계층 오류를 사용자에게 보일 메시지로 통합
// 원칙: 엔진 오류 메시지는 그대로 노출 (거부 사유)
// ==========================================

use crate::config::ConfigError;
use crate::engine::{EngineError, ErrorKind};
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// API 계층 오류 타입
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 배정 거부 =====
    #[error(transparent)]
    Engine(#[from] EngineError),

    // ===== 입력 오류 =====
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    #[error("리소스 없음: {0}")]
    NotFound(String),

    // ===== 하위 계층 =====
    #[error("데이터베이스 오류: {0}")]
    Database(String),

    #[error("동시 실행 잠금 실패: {0}")]
    Lock(String),

    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),

    #[error("파일 가져오기/내보내기 실패: {0}")]
    Import(#[from] ImportError),
}

impl ApiError {
    /// 사용자가 입력/설정을 고쳐 해결할 수 있는 오류인지
    pub fn is_user_correctable(&self) -> bool {
        match self {
            ApiError::Engine(e) => matches!(e.kind(), ErrorKind::Configuration | ErrorKind::Data),
            ApiError::InvalidInput(_) | ApiError::NotFound(_) => true,
            _ => false,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={}) 없음", entity, id))
            }
            RepositoryError::LockError(msg) => ApiError::Lock(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}

/// Result 타입 별칭
pub type ApiResult<T> = Result<T, ApiError>;
