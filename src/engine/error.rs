// ==========================================
// 학년 담임 배정 시스템 - 엔진 오류 타입
// ==========================================
// 설정 오류 / 데이터 오류 는 실행 전체를 중단 (부분 결과 없음)
// 미배정 잔여 교사는 오류가 아님 (AllocationResult::unresolved)
// ==========================================

use thiserror::Error;

/// 오류 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 사용자가 학급 설정/규칙을 고쳐야 함
    Configuration,
    /// 입력 데이터가 비어 있음
    Data,
}

/// 배정 엔진 오류 (메시지는 사용자에게 그대로 노출)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{year}년도 학급 설정이 없습니다. 먼저 학급 설정을 입력해주세요.")]
    NoGradeSettings { year: i32 },

    #[error("교사 데이터가 없습니다.")]
    NoTeachers,

    #[error("필요 담임 수가 0입니다. 학급 설정에서 필요 담임 수를 입력해주세요.")]
    EmptySlotPool { year: i32 },

    #[error("배정 규칙 테이블 오류: {0}")]
    InvalidRuleSet(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NoTeachers => ErrorKind::Data,
            EngineError::NoGradeSettings { .. }
            | EngineError::EmptySlotPool { .. }
            | EngineError::InvalidRuleSet(_) => ErrorKind::Configuration,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
