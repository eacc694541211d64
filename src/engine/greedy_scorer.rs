// ==========================================
// 학년 담임 배정 시스템 - 점수 기반 조정 배정
// ==========================================
// 지망 매칭 후 남은 교사를 남은 슬롯에 점수 순으로 배정
// 점수 = 희망 점수 + 학년 가중치 + 역할 점수 + 금지 감점
// ==========================================
// 동점 처리: 학년은 오름차순 순회, 더 큰 점수만 교체
// 단일 패스: 선택 학년이 소진되면 재계산 없이 미배정
// ==========================================

use crate::config::RuleSet;
use crate::domain::{AssignmentType, Grade};
use crate::engine::candidate::{Placement, WorkingCandidate};
use crate::engine::slot_pool::SlotPool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 후보 1명 × 학년 1개 점수 내역
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub grade: Grade,
    /// 희망 순위 (0-based)
    pub hope_rank: Option<usize>,
    pub hope: f64,
    pub grade_weight: f64,
    /// 매칭된 역할 키워드
    pub role_keyword: Option<String>,
    pub role: f64,
    pub penalty: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    pub fn is_banned(&self) -> bool {
        self.penalty < 0.0
    }

    /// 0이 아닌 항목만 " | " 로 연결
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(rank) = self.hope_rank {
            parts.push(format!("희망: {}지망({}점)", rank + 1, fmt_points(self.hope)));
        }
        if self.grade_weight != 0.0 {
            parts.push(format!("학년가중치: {}점", fmt_points(self.grade_weight)));
        }
        if let Some(keyword) = &self.role_keyword {
            parts.push(format!("역할: {}({}점)", keyword, fmt_points(self.role)));
        }
        if self.is_banned() {
            parts.push(format!("금지 학년: {}점", fmt_points(self.penalty)));
        }
        parts.push(format!("총점: {}점", fmt_points(self.total)));
        parts.join(" | ")
    }
}

/// 점수 표시 (소수 첫째 자리, 정수면 소수점 생략)
pub fn fmt_points(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

/// 조정 배정 결과
#[derive(Debug, Clone)]
pub struct GreedyOutcome<'a> {
    pub placements: Vec<Placement<'a>>,
    pub unresolved: Vec<WorkingCandidate<'a>>,
}

pub struct GreedyScorer {
    rules: Arc<RuleSet>,
}

impl GreedyScorer {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// 후보 1명의 특정 학년 점수
    pub fn score_candidate(&self, cand: &WorkingCandidate<'_>, grade: Grade) -> ScoreBreakdown {
        let hope_rank = cand.rank_of(grade).filter(|r| *r < self.rules.hope_scores.len());
        let hope = hope_rank.map(|r| self.rules.hope_score(r)).unwrap_or(0.0);
        let grade_weight = self.rules.grade_weight(grade);

        let role_text = cand.teacher.role_text();
        let role_point = self.rules.max_role_point(&role_text);
        let role = role_point.map(|rp| rp.weight).unwrap_or(0.0);

        let penalty = if cand.is_banned(grade) {
            self.rules.banned_penalty
        } else {
            0.0
        };

        ScoreBreakdown {
            grade,
            hope_rank,
            hope,
            grade_weight,
            role_keyword: role_point.map(|rp| rp.keyword.clone()),
            role,
            penalty,
            total: hope + grade_weight + role + penalty,
        }
    }

    /// 남은 학년 중 최고 점수 (학년 오름차순, 동점이면 먼저 본 학년)
    pub fn best_for(
        &self,
        cand: &WorkingCandidate<'_>,
        pool: &SlotPool,
    ) -> Option<ScoreBreakdown> {
        let mut best: Option<ScoreBreakdown> = None;
        for grade in pool.distinct_grades() {
            let score = self.score_candidate(cand, grade);
            if best.as_ref().map_or(true, |b| score.total > b.total) {
                best = Some(score);
            }
        }
        best
    }

    pub fn assign<'a>(
        &self,
        candidates: Vec<WorkingCandidate<'a>>,
        pool: &mut SlotPool,
    ) -> GreedyOutcome<'a> {
        let mut unresolved = Vec::new();
        let mut scored = Vec::with_capacity(candidates.len());

        for cand in candidates {
            match self.best_for(&cand, pool) {
                Some(score) => scored.push((cand, score)),
                None => unresolved.push(cand),
            }
        }

        // 안정 정렬: 동점이면 앞 단계 순서 유지
        scored.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

        let mut placements = Vec::new();
        for (cand, score) in scored {
            if score.is_banned() {
                warn!(teacher_id = cand.id(), grade = score.grade, "남은 학년이 모두 금지 학년, 미배정");
                unresolved.push(cand);
                continue;
            }
            if !pool.take(score.grade) {
                warn!(teacher_id = cand.id(), grade = score.grade, "선택 학년 소진, 미배정");
                unresolved.push(cand);
                continue;
            }

            debug!(teacher_id = cand.id(), grade = score.grade, total = score.total, "조정 배정");
            placements.push(Placement::new(
                cand.teacher,
                score.grade,
                AssignmentType::Adjustment,
                score.describe(),
            ));
        }

        info!(
            assigned = placements.len(),
            unresolved = unresolved.len(),
            slots_left = pool.len(),
            "조정 배정 완료"
        );

        GreedyOutcome {
            placements,
            unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GradeSetting, Preference, Teacher};

    fn pool(spec: &[(Grade, u32)]) -> SlotPool {
        let settings: Vec<GradeSetting> = spec
            .iter()
            .map(|(g, n)| GradeSetting::new(2027, *g, *n))
            .collect();
        SlotPool::build(&settings, 2027).unwrap()
    }

    fn scorer() -> GreedyScorer {
        GreedyScorer::new(Arc::new(RuleSet::default()))
    }

    #[test]
    fn test_fmt_points() {
        assert_eq!(fmt_points(10.0), "10");
        assert_eq!(fmt_points(4.3), "4.3");
        assert_eq!(fmt_points(-999.0), "-999");
        assert_eq!(fmt_points(13.299999), "13.3");
    }

    #[test]
    fn test_score_components() {
        let mut t = Teacher::new(1, "가");
        t.duty_role = Some("학년부장".to_string());
        t.subject = Some("교과전담 영어".to_string());
        let pref = Preference::new(1, 2027).with_choices(Some(2), Some(5), None);
        let cand = WorkingCandidate::new(&t, Some(&pref));

        let s = scorer().score_candidate(&cand, 5);
        assert_eq!(s.hope, 5.0);
        assert_eq!(s.grade_weight, 4.0);
        // 학년부장(2) 과 교과전담(3) 중 최대
        assert_eq!(s.role, 3.0);
        assert_eq!(s.total, 12.0);
        assert_eq!(
            s.describe(),
            "희망: 2지망(5점) | 학년가중치: 4점 | 역할: 교과전담(3점) | 총점: 12점"
        );
    }

    #[test]
    fn test_banned_grade_penalty_dominates() {
        let t = Teacher::new(1, "가");
        let pref = Preference::new(1, 2027).with_choices(Some(6), None, None);
        let mut cand = WorkingCandidate::new(&t, Some(&pref));
        cand.banned.insert(6);

        let s = scorer().score_candidate(&cand, 6);
        assert!(s.total < 0.0);
        let best = scorer().best_for(&cand, &pool(&[(6, 1), (2, 1)])).unwrap();
        assert_eq!(best.grade, 2);
    }

    #[test]
    fn test_tie_break_prefers_lower_grade() {
        // 3학년과 4학년 가중치 동일 → 오름차순상 먼저인 3학년
        let t = Teacher::new(1, "가");
        let cand = WorkingCandidate::new(&t, None);
        let best = scorer().best_for(&cand, &pool(&[(4, 1), (3, 1)])).unwrap();
        assert_eq!(best.grade, 3);
    }

    #[test]
    fn test_higher_score_goes_first_and_starves_other() {
        let mut head = Teacher::new(1, "부장");
        head.duty_role = Some("업무2부장".to_string());
        let plain = Teacher::new(2, "일반");
        // 둘 다 6학년 최고점, 6학년 슬롯 1개 → 점수 높은 부장이 차지, 일반 교사는 재계산 없이 미배정
        let cands = vec![
            WorkingCandidate::new(&plain, None),
            WorkingCandidate::new(&head, None),
        ];
        let mut pool = pool(&[(6, 1), (2, 1)]);

        let outcome = scorer().assign(cands, &mut pool);

        assert_eq!(outcome.placements.len(), 1);
        assert_eq!(outcome.placements[0].teacher.id, 1);
        assert_eq!(outcome.placements[0].grade, 6);
        assert_eq!(outcome.placements[0].assignment_type, AssignmentType::Adjustment);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].id(), 2);
        assert_eq!(pool.count(2), 1);
    }

    #[test]
    fn test_banned_everywhere_stays_unresolved() {
        let mut t = Teacher::new(1, "전담");
        t.is_subject_teacher = true;
        let mut cand = WorkingCandidate::new(&t, None);
        cand.banned.extend([1, 2, 3, 4, 5, 6]);
        let mut pool = pool(&[(1, 1)]);

        let outcome = scorer().assign(vec![cand], &mut pool);
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_empty_pool_leaves_everyone_unresolved() {
        let t = Teacher::new(1, "가");
        let mut pool = pool(&[(1, 1)]);
        assert!(pool.take(1));

        let outcome = scorer().assign(vec![WorkingCandidate::new(&t, None)], &mut pool);
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.unresolved.len(), 1);
    }

    #[test]
    fn test_description_for_plain_teacher() {
        let t = Teacher::new(1, "가");
        let cand = WorkingCandidate::new(&t, None);
        let s = scorer().score_candidate(&cand, 2);
        assert_eq!(s.describe(), "학년가중치: 2점 | 총점: 2점");
    }
}
