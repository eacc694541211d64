// ==========================================
// 학년 담임 배정 시스템 - 핵심 라이브러리
// ==========================================
// 기술 스택: Rust + SQLite
// 시스템 성격: 배정안 생성 도구 (최종 확정은 사람이 함)
// ==========================================

// ==========================================
// 모듈 선언
// ==========================================

// 도메인 계층 - 엔티티와 타입
pub mod domain;

// 저장소 계층 - 데이터 접근
pub mod repository;

// 엔진 계층 - 배정 규칙
pub mod engine;

// 가져오기/내보내기 계층 - 외부 파일
pub mod importer;

// 설정 계층 - 배정 규칙 테이블
pub mod config;

// 데이터베이스 기반 (연결 초기화/PRAGMA/스키마)
pub mod db;

// 로그
pub mod logging;

// API 계층 - 유스케이스
pub mod api;

// ==========================================
// 핵심 타입 재노출
// ==========================================

pub use domain::{
    AllocationLog, Assignment, AssignmentType, GradeHistoryEntry, GradeSetting, Preference,
    StageTag, Teacher,
};

pub use config::{ConfigManager, RuleSet, RuleSetReader, RotationPolicy};

pub use engine::{AllocationEngine, AllocationResult, EngineError};

pub use api::{ApiError, AssignmentApi};

// ==========================================
// 상수
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "학년 담임 배정 시스템";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
