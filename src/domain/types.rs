// ==========================================
// 학년 담임 배정 시스템 - 도메인 타입 정의
// ==========================================
// 배정 유형 / 로그 단계 태그 / 학년 상수
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 교사 식별자 (teachers.id)
pub type TeacherId = i64;

/// 학년 (1~6)
pub type Grade = u8;

/// 담임 배정 대상 전체 학년
pub const ALL_GRADES: [Grade; 6] = [1, 2, 3, 4, 5, 6];

/// 학년 값이 담임 배정 범위(1~6)인지 확인
pub fn is_valid_grade(grade: i64) -> bool {
    (1..=6).contains(&grade)
}

// ==========================================
// 배정 유형 (Assignment Type)
// ==========================================
// 직렬화 형식: 한글 원문 ("규정우선", "1지망" ...) - DB/엑셀과 동일
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentType {
    #[serde(rename = "규정우선")]
    RulePriority, // 규정 우선 배정
    #[serde(rename = "1지망")]
    FirstChoice,
    #[serde(rename = "2지망")]
    SecondChoice,
    #[serde(rename = "3지망")]
    ThirdChoice,
    #[serde(rename = "조정")]
    Adjustment, // 점수 기반 조정
}

impl AssignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::RulePriority => "규정우선",
            AssignmentType::FirstChoice => "1지망",
            AssignmentType::SecondChoice => "2지망",
            AssignmentType::ThirdChoice => "3지망",
            AssignmentType::Adjustment => "조정",
        }
    }

    /// 지망 순위(0-based) → 배정 유형
    pub fn from_choice_rank(rank: usize) -> Option<Self> {
        match rank {
            0 => Some(AssignmentType::FirstChoice),
            1 => Some(AssignmentType::SecondChoice),
            2 => Some(AssignmentType::ThirdChoice),
            _ => None,
        }
    }

    /// 지망 배정이면 순위(0-based) 반환
    pub fn choice_rank(&self) -> Option<usize> {
        match self {
            AssignmentType::FirstChoice => Some(0),
            AssignmentType::SecondChoice => Some(1),
            AssignmentType::ThirdChoice => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "규정우선" => Ok(AssignmentType::RulePriority),
            "1지망" => Ok(AssignmentType::FirstChoice),
            "2지망" => Ok(AssignmentType::SecondChoice),
            "3지망" => Ok(AssignmentType::ThirdChoice),
            "조정" => Ok(AssignmentType::Adjustment),
            other => Err(format!("알 수 없는 배정 유형: {}", other)),
        }
    }
}

// ==========================================
// 로그 단계 태그 (Stage Tag)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageTag {
    Exclude,          // 제13조 배정 제외
    #[serde(rename = "rule_12_4")]
    SpecialPriority,  // 제12조④ 특수 사유 우선
    #[serde(rename = "rule_12_2")]
    RolePriority,     // 제12조② 역할 우선
    PriorityDeferred, // 우선 대상이나 잔여 슬롯 없음
}

impl StageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageTag::Exclude => "exclude",
            StageTag::SpecialPriority => "rule_12_4",
            StageTag::RolePriority => "rule_12_2",
            StageTag::PriorityDeferred => "priority_deferred",
        }
    }
}

impl fmt::Display for StageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
