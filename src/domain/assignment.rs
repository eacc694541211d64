// ==========================================
// 학년 담임 배정 시스템 - 배정 결과 / 배정 로그
// ==========================================
// 생명주기: 실행 1회당 생성, 생성 후 변경 없음
// 저장: 같은 연도의 기존 결과는 전부 삭제 후 교체 (병합 아님)
// ==========================================

use crate::domain::types::{AssignmentType, Grade, StageTag, TeacherId};
use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - 배정 결과 1건
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub year: i32,
    pub assigned_grade: Grade,
    pub assignment_type: AssignmentType,
    pub rule_reference: Option<String>, // 감사용 규정 인용 (배정 판단에 사용 안 함)
    pub description: String,
}

// ==========================================
// AllocationLog - 엔진 단계 로그
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLog {
    pub teacher_id: TeacherId,
    pub stage: StageTag,
    pub message: String,
}

impl AllocationLog {
    pub fn new(teacher_id: TeacherId, stage: StageTag, message: impl Into<String>) -> Self {
        Self {
            teacher_id,
            stage,
            message: message.into(),
        }
    }
}
