// ==========================================
// 학년 담임 배정 시스템 - 교사 도메인 모델
// ==========================================
// 용도: 저장소/가져오기 계층이 기록, 엔진은 읽기 전용
// ==========================================

use crate::domain::types::{Grade, TeacherId};
use serde::{Deserialize, Serialize};

// ==========================================
// GradeHistoryEntry - 본교 담임 이력 1건
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeHistoryEntry {
    pub year: i32,
    pub grade: Grade,
}

// ==========================================
// Teacher - 교사
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    // ===== 식별 =====
    pub id: TeacherId,
    pub name: String,

    // ===== 인적 사항 =====
    pub gender: Option<String>,
    pub hire_year: Option<i32>,        // 발령 연도 (총 경력)
    pub school_join_year: Option<i32>, // 본교 근무 시작 연도

    // ===== 올해 담당 =====
    pub current_grade: Option<Grade>,
    pub current_class: Option<String>, // 한글 입력 가능 (예: "1반")
    pub is_homeroom_current: bool,

    // ===== 역할/조건 =====
    pub is_subject_teacher: bool,
    pub duty_role: Option<String>,          // 업무부장/학년부장/교과전담 등
    pub subject: Option<String>,
    pub special_conditions: Option<String>, // 자유 기재 (휴직, 임신 등)

    // ===== 이력 =====
    #[serde(default)]
    pub grade_history: Vec<GradeHistoryEntry>,
}

impl Teacher {
    /// 이름만 가진 교사 생성 (나머지는 빈 값)
    pub fn new(id: TeacherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gender: None,
            hire_year: None,
            school_join_year: None,
            current_grade: None,
            current_class: None,
            is_homeroom_current: false,
            is_subject_teacher: false,
            duty_role: None,
            subject: None,
            special_conditions: None,
            grade_history: Vec::new(),
        }
    }

    /// 특수 조건 소문자 텍스트 (없으면 빈 문자열)
    pub fn special_conditions_lower(&self) -> String {
        self.special_conditions
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
    }

    /// 역할 점수 매칭용 텍스트: duty_role + " " + special_conditions + " " + subject
    pub fn role_text(&self) -> String {
        format!(
            "{} {} {}",
            self.duty_role.as_deref().unwrap_or(""),
            self.special_conditions.as_deref().unwrap_or(""),
            self.subject.as_deref().unwrap_or("")
        )
    }

    /// 이력상 해당 학년 담임 횟수
    pub fn history_count(&self, grade: Grade) -> usize {
        self.grade_history.iter().filter(|e| e.grade == grade).count()
    }
}
