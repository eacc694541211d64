// ==========================================
// 학년 담임 배정 시스템 - 희망 학년 / 학년 설정
// ==========================================
// 불변식: 지망 학년은 서로 달라야 하며 1~6 범위
// ==========================================

use crate::domain::types::{is_valid_grade, Grade, TeacherId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 희망 학년 검증 오류
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("지망 학년 중복: {0}학년")]
    DuplicateChoice(Grade),

    #[error("지망 학년 범위 오류: {0} (1~6만 허용)")]
    OutOfRange(Grade),
}

// ==========================================
// Preference - (교사, 연도)별 희망
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub teacher_id: TeacherId,
    pub year: i32,
    pub first_choice_grade: Option<Grade>, // 교과전담 선택 시 None
    pub second_choice_grade: Option<Grade>,
    pub third_choice_grade: Option<Grade>,
    #[serde(default)]
    pub wants_grade_head: bool,
    #[serde(default)]
    pub wants_subject_teacher: bool,
    #[serde(default)]
    pub wants_duty_head: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Preference {
    pub fn new(teacher_id: TeacherId, year: i32) -> Self {
        Self {
            teacher_id,
            year,
            first_choice_grade: None,
            second_choice_grade: None,
            third_choice_grade: None,
            wants_grade_head: false,
            wants_subject_teacher: false,
            wants_duty_head: false,
            comment: None,
        }
    }

    /// 1/2/3지망 설정 (빌더)
    pub fn with_choices(
        mut self,
        first: Option<Grade>,
        second: Option<Grade>,
        third: Option<Grade>,
    ) -> Self {
        self.first_choice_grade = first;
        self.second_choice_grade = second;
        self.third_choice_grade = third;
        self
    }

    /// 입력된 지망만 순서대로 (빈 순위는 건너뜀)
    pub fn choices(&self) -> Vec<Grade> {
        [
            self.first_choice_grade,
            self.second_choice_grade,
            self.third_choice_grade,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// 어느 순위든 해당 학년을 희망했는지
    pub fn wants(&self, grade: Grade) -> bool {
        self.choices().contains(&grade)
    }

    pub fn validate(&self) -> Result<(), PreferenceError> {
        let choices = self.choices();
        for (idx, grade) in choices.iter().enumerate() {
            if !is_valid_grade(*grade as i64) {
                return Err(PreferenceError::OutOfRange(*grade));
            }
            if choices[..idx].contains(grade) {
                return Err(PreferenceError::DuplicateChoice(*grade));
            }
        }
        Ok(())
    }
}

// ==========================================
// GradeSetting - (연도, 학년)별 학급 설정
// ==========================================
// required_homerooms 만 슬롯 풀에 반영, 나머지 필요 수는 참고용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSetting {
    pub year: i32,
    pub grade: Grade,
    pub class_count: u32,
    pub required_homerooms: u32,
    #[serde(default)]
    pub required_subject_teachers: u32,
    #[serde(default)]
    pub required_duty_heads: u32,
}

impl GradeSetting {
    pub fn new(year: i32, grade: Grade, required_homerooms: u32) -> Self {
        Self {
            year,
            grade,
            class_count: required_homerooms,
            required_homerooms,
            required_subject_teachers: 0,
            required_duty_heads: 0,
        }
    }
}
