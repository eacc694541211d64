// ==========================================
// 학년 담임 배정 시스템 - 배정 규칙 테이블
// ==========================================
// 책임: 제외/우선/역할 점수/학년 가중치/인용 규정 테이블
// 원칙: 불변 값으로 엔진에 주입 (전역 상수 아님)
// ==========================================

use crate::domain::types::{Grade, ALL_GRADES};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 키워드 → 사유 (먼저 매칭된 항목 우선)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub reason: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, reason: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// 역할 키워드 → 가중치
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePoint {
    pub keyword: String,
    pub weight: f64,
}

/// 설명 문구 속 토큰 → 규정 인용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRule {
    pub token: String,
    pub reference: String,
}

// ==========================================
// RotationPolicy - 학년 순환 제한 방식
// ==========================================
// CurrentGrade: 올해 학년만 금지 (기본)
// CurrentGradeAndHistory: 추가로 이력상 max_repeats 회 이상 담임한 학년 금지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RotationPolicy {
    CurrentGrade,
    CurrentGradeAndHistory { max_repeats: usize },
}

impl Default for RotationPolicy {
    fn default() -> Self {
        RotationPolicy::CurrentGrade
    }
}

// ==========================================
// RuleSet - 배정 규칙 묶음
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// 제13조 배정 제외 패턴 (순서 = 우선순위)
    pub exclude_patterns: Vec<KeywordRule>,

    /// 제12조④ 특수 사유 우선 패턴
    pub priority_patterns: Vec<KeywordRule>,

    /// 제12조② 역할 점수
    pub role_points: Vec<RolePoint>,

    /// 학년 가중치
    pub grade_weights: BTreeMap<Grade, f64>,

    /// 1/2/3지망 희망 점수
    pub hope_scores: [f64; 3],

    /// 금지 학년 감점
    pub banned_penalty: f64,

    /// 동일 학년 재희망 시 순환 제한을 완화하는 학년
    pub anchor_grades: BTreeSet<Grade>,

    /// 담임 배정 대상 학년 (교과전담 금지 범위)
    pub homeroom_grades: Vec<Grade>,

    #[serde(default)]
    pub rotation: RotationPolicy,

    /// "규정우선" 설명 → 인용 규정 (순서 = 우선순위)
    pub citations: Vec<CitationRule>,

    pub choice_citation: String,
    pub adjustment_citation: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                KeywordRule::new("휴직", "제13조: 휴직"),
                KeywordRule::new("병가", "제13조: 병가 30일 이상"),
                KeywordRule::new("파견", "제13조: 파견"),
                KeywordRule::new("연수", "제13조: 연수"),
                KeywordRule::new("산전", "제13조: 임신/산전"),
                KeywordRule::new("임신", "제13조: 임신"),
                KeywordRule::new("출산", "제13조: 출산 예정"),
                KeywordRule::new("고령", "제13조: 고령 교사"),
            ],
            priority_patterns: vec![
                KeywordRule::new("원로", "제12조④: 원로교사"),
                KeywordRule::new("요양", "제12조④: 요양 필요"),
                KeywordRule::new("건강", "제12조④: 건강 사유"),
                KeywordRule::new("군입대", "제12조③/제14조③: 군 입대"),
                KeywordRule::new("출산", "제12조④: 출산 예정"),
                KeywordRule::new("임신", "제12조④: 임신"),
            ],
            role_points: vec![
                RolePoint { keyword: "업무1부장".to_string(), weight: 6.0 },
                RolePoint { keyword: "업무2부장".to_string(), weight: 5.0 },
                RolePoint { keyword: "업무3부장".to_string(), weight: 4.3 },
                RolePoint { keyword: "학년부장".to_string(), weight: 2.0 },
                RolePoint { keyword: "교과전담".to_string(), weight: 3.0 },
            ],
            grade_weights: [(6, 6.0), (1, 5.0), (5, 4.0), (3, 3.0), (4, 3.0), (2, 2.0)]
                .into_iter()
                .collect(),
            hope_scores: [10.0, 5.0, 2.0],
            banned_penalty: -999.0,
            anchor_grades: [1, 6].into_iter().collect(),
            homeroom_grades: ALL_GRADES.to_vec(),
            rotation: RotationPolicy::CurrentGrade,
            citations: vec![
                CitationRule {
                    token: "제12조④".to_string(),
                    reference: "제12조④ (특수 사유 우선 배정)".to_string(),
                },
                CitationRule {
                    token: "제12조②".to_string(),
                    reference: "제12조② (역할 우선 배정)".to_string(),
                },
                CitationRule {
                    token: "제13조".to_string(),
                    reference: "제13조 (배정 제외)".to_string(),
                },
            ],
            choice_citation: "제11조 (희망 학년 반영)".to_string(),
            adjustment_citation: "제12조① (학년 순환 원칙) + 점수 기반 조정".to_string(),
        }
    }
}

impl RuleSet {
    // ==========================================
    // 매칭
    // ==========================================

    /// 제외 패턴 매칭 (대소문자 무시 부분 문자열, 첫 매칭 우선)
    pub fn match_exclusion(&self, text: &str) -> Option<&KeywordRule> {
        first_keyword_match(&self.exclude_patterns, text)
    }

    /// 특수 사유 우선 패턴 매칭
    pub fn match_priority(&self, text: &str) -> Option<&KeywordRule> {
        first_keyword_match(&self.priority_patterns, text)
    }

    /// 역할 우선 배정용: 테이블 순서상 첫 매칭
    pub fn first_role_point(&self, duty_role: &str) -> Option<&RolePoint> {
        self.role_points
            .iter()
            .find(|rp| duty_role.contains(rp.keyword.as_str()))
    }

    /// 점수 계산용: 매칭된 키워드 중 최대 가중치 (동점이면 먼저 나온 항목)
    pub fn max_role_point(&self, text: &str) -> Option<&RolePoint> {
        let mut best: Option<&RolePoint> = None;
        for rp in &self.role_points {
            if !text.contains(rp.keyword.as_str()) || rp.weight <= 0.0 {
                continue;
            }
            if best.map_or(true, |b| rp.weight > b.weight) {
                best = Some(rp);
            }
        }
        best
    }

    pub fn grade_weight(&self, grade: Grade) -> f64 {
        self.grade_weights.get(&grade).copied().unwrap_or(0.0)
    }

    /// 지망 순위(0-based)별 희망 점수
    pub fn hope_score(&self, rank: usize) -> f64 {
        self.hope_scores.get(rank).copied().unwrap_or(0.0)
    }

    // ==========================================
    // 검증 / 직렬화
    // ==========================================

    /// 규칙 테이블 일관성 검사
    ///
    /// 금지 감점은 모든 양(+)의 점수 합보다 커야 금지 학년이 선택되지 않는다.
    pub fn validate(&self) -> Result<(), String> {
        if self.homeroom_grades.is_empty() {
            return Err("담임 배정 학년이 비어 있습니다".to_string());
        }
        if let Some(g) = self.homeroom_grades.iter().find(|g| !(1..=6).contains(*g)) {
            return Err(format!("담임 배정 학년 범위 오류: {}", g));
        }

        let max_hope = self.hope_scores.iter().cloned().fold(0.0, f64::max);
        let max_grade = self.grade_weights.values().cloned().fold(0.0, f64::max);
        let max_role = self.role_points.iter().map(|r| r.weight).fold(0.0, f64::max);
        let max_positive = max_hope + max_grade + max_role;

        if self.banned_penalty >= 0.0 || -self.banned_penalty <= max_positive {
            return Err(format!(
                "금지 감점({})이 최대 가점 합({})을 압도하지 못합니다",
                self.banned_penalty, max_positive
            ));
        }

        if let RotationPolicy::CurrentGradeAndHistory { max_repeats } = self.rotation {
            if max_repeats == 0 {
                return Err("이력 반복 제한은 1 이상이어야 합니다".to_string());
            }
        }
        Ok(())
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn first_keyword_match<'a>(rules: &'a [KeywordRule], text: &str) -> Option<&'a KeywordRule> {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|r| lowered.contains(r.keyword.to_lowercase().as_str()))
}
