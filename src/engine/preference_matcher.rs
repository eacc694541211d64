// ==========================================
// 학년 담임 배정 시스템 - 희망 학년 매칭 (제11조)
// ==========================================
// 1지망 → 2지망 → 3지망 순서로 3회 매칭
// 규칙: 남은 후보 순서대로, 해당 지망 학년이 풀에 있고 금지 학년이 아니면 배정
// 주의: 입력 순서가 앞선 교사가 우선 (전역 최적화 아님)
// ==========================================

use crate::domain::AssignmentType;
use crate::engine::candidate::{Placement, WorkingCandidate};
use crate::engine::slot_pool::SlotPool;
use tracing::{debug, info};

/// 매칭 결과
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    pub placements: Vec<Placement<'a>>,
    pub remaining: Vec<WorkingCandidate<'a>>,
}

pub struct PreferenceMatcher {
    rounds: usize,
}

impl PreferenceMatcher {
    pub fn new() -> Self {
        Self { rounds: 3 }
    }

    pub fn run<'a>(
        &self,
        candidates: Vec<WorkingCandidate<'a>>,
        pool: &mut SlotPool,
    ) -> MatchOutcome<'a> {
        let mut placements = Vec::new();
        let mut remaining = candidates;

        for rank in 0..self.rounds {
            let Some(assignment_type) = AssignmentType::from_choice_rank(rank) else {
                break;
            };
            let before = placements.len();
            let mut carry = Vec::with_capacity(remaining.len());

            for cand in remaining {
                match cand.pref(rank) {
                    Some(grade) if !cand.is_banned(grade) && pool.take(grade) => {
                        debug!(teacher_id = cand.id(), grade, rank = rank + 1, "희망 학년 배정");
                        placements.push(Placement::new(
                            cand.teacher,
                            grade,
                            assignment_type,
                            format!("{}지망 반영 (희망 학년: {}학년)", rank + 1, grade),
                        ));
                    }
                    _ => carry.push(cand),
                }
            }

            info!(
                rank = rank + 1,
                matched = placements.len() - before,
                carried = carry.len(),
                "지망 매칭 라운드 완료"
            );
            remaining = carry;
        }

        MatchOutcome {
            placements,
            remaining,
        }
    }
}

impl Default for PreferenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GradeSetting, Preference, Teacher};

    fn pool(spec: &[(u8, u32)]) -> SlotPool {
        let settings: Vec<GradeSetting> = spec
            .iter()
            .map(|(g, n)| GradeSetting::new(2027, *g, *n))
            .collect();
        SlotPool::build(&settings, 2027).unwrap()
    }

    #[test]
    fn test_first_choice_beats_later_ranks() {
        let a = Teacher::new(1, "가");
        let b = Teacher::new(2, "나");
        // b 는 2지망으로 1학년, a 는 1지망으로 1학년 → 1지망 라운드가 먼저
        let pa = Preference::new(1, 2027).with_choices(Some(1), None, None);
        let pb = Preference::new(2, 2027).with_choices(Some(5), Some(1), None);
        let cands = vec![
            WorkingCandidate::new(&b, Some(&pb)),
            WorkingCandidate::new(&a, Some(&pa)),
        ];
        let mut pool = pool(&[(1, 1), (3, 1)]);

        let outcome = PreferenceMatcher::new().run(cands, &mut pool);

        assert_eq!(outcome.placements.len(), 1);
        assert_eq!(outcome.placements[0].teacher.id, 1);
        assert_eq!(outcome.placements[0].assignment_type, AssignmentType::FirstChoice);
        assert_eq!(
            outcome.placements[0].description,
            "1지망 반영 (희망 학년: 1학년)"
        );
        assert_eq!(outcome.remaining.len(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_input_order_decides_between_equals() {
        let a = Teacher::new(1, "가");
        let b = Teacher::new(2, "나");
        let p = |id| Preference::new(id, 2027).with_choices(Some(4), None, None);
        let (pa, pb) = (p(1), p(2));
        let cands = vec![
            WorkingCandidate::new(&b, Some(&pb)),
            WorkingCandidate::new(&a, Some(&pa)),
        ];
        let mut pool = pool(&[(4, 1)]);

        let outcome = PreferenceMatcher::new().run(cands, &mut pool);
        assert_eq!(outcome.placements[0].teacher.id, 2);
        assert_eq!(outcome.remaining[0].id(), 1);
    }

    #[test]
    fn test_banned_choice_is_skipped() {
        let mut t = Teacher::new(1, "가");
        t.current_grade = Some(2);
        let pref = Preference::new(1, 2027).with_choices(Some(2), Some(3), None);
        let mut cand = WorkingCandidate::new(&t, Some(&pref));
        cand.banned.insert(2);
        let mut pool = pool(&[(2, 1), (3, 1)]);

        let outcome = PreferenceMatcher::new().run(vec![cand], &mut pool);
        assert_eq!(outcome.placements[0].grade, 3);
        assert_eq!(outcome.placements[0].assignment_type, AssignmentType::SecondChoice);
        assert_eq!(pool.count(2), 1);
    }

    #[test]
    fn test_compacted_preferences_shift_rank() {
        let t = Teacher::new(1, "가");
        // 1지망 비어 있음 → 2지망 입력값이 1지망 라운드에서 매칭
        let pref = Preference::new(1, 2027).with_choices(None, Some(5), None);
        let cand = WorkingCandidate::new(&t, Some(&pref));
        let mut pool = pool(&[(5, 1)]);

        let outcome = PreferenceMatcher::new().run(vec![cand], &mut pool);
        assert_eq!(outcome.placements[0].assignment_type, AssignmentType::FirstChoice);
    }

    #[test]
    fn test_unavailable_choices_carry_forward() {
        let t = Teacher::new(1, "가");
        let pref = Preference::new(1, 2027).with_choices(Some(6), Some(5), Some(4));
        let cand = WorkingCandidate::new(&t, Some(&pref));
        let mut pool = pool(&[(1, 2)]);

        let outcome = PreferenceMatcher::new().run(vec![cand], &mut pool);
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.remaining.len(), 1);
        assert_eq!(pool.len(), 2);
    }
}
