// ==========================================
// 학년 담임 배정 시스템 - 배정 제한 (금지 학년)
// ==========================================
// 제12조① 학년 순환: 올해 담임 학년 금지 (1·6학년 재희망 시 예외)
// 교과전담: 담임 대상 전 학년 금지
// 원칙: 후보를 풀에서 빼지 않고 banned 집합만 기록
// ==========================================

use crate::config::{RotationPolicy, RuleSet};
use crate::engine::candidate::WorkingCandidate;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// RotationConstraintBuilder - 학년 순환 제한
// ==========================================
pub struct RotationConstraintBuilder {
    rules: Arc<RuleSet>,
}

impl RotationConstraintBuilder {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn apply(&self, candidates: &mut [WorkingCandidate<'_>]) {
        for cand in candidates.iter_mut() {
            if let Some(current) = cand.teacher.current_grade {
                let anchored = self.rules.anchor_grades.contains(&current) && cand.wants(current);
                if !anchored {
                    cand.banned.insert(current);
                }
            }

            if let RotationPolicy::CurrentGradeAndHistory { max_repeats } = self.rules.rotation {
                for grade in self.rules.homeroom_grades.iter().copied() {
                    if cand.teacher.history_count(grade) >= max_repeats {
                        cand.banned.insert(grade);
                    }
                }
            }

            if !cand.banned.is_empty() {
                debug!(teacher_id = cand.id(), banned = ?cand.banned, "순환 금지 학년");
            }
        }
    }
}

// ==========================================
// SubjectConstraintBuilder - 교과전담 제한
// ==========================================
pub struct SubjectConstraintBuilder {
    rules: Arc<RuleSet>,
}

impl SubjectConstraintBuilder {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub fn apply(&self, candidates: &mut [WorkingCandidate<'_>]) {
        for cand in candidates.iter_mut().filter(|c| c.teacher.is_subject_teacher) {
            cand.banned.extend(self.rules.homeroom_grades.iter().copied());
            debug!(teacher_id = cand.id(), "교과전담: 담임 학년 전체 금지");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GradeHistoryEntry, Preference, Teacher};

    fn rules() -> Arc<RuleSet> {
        Arc::new(RuleSet::default())
    }

    fn teacher_in(grade: u8) -> Teacher {
        let mut t = Teacher::new(1, "박교사");
        t.current_grade = Some(grade);
        t
    }

    #[test]
    fn test_current_grade_is_banned() {
        let t = teacher_in(3);
        let pref = Preference::new(1, 2027).with_choices(Some(3), None, None);
        let mut cands = vec![WorkingCandidate::new(&t, Some(&pref))];
        RotationConstraintBuilder::new(rules()).apply(&mut cands);
        // 3학년은 재희망해도 금지
        assert!(cands[0].is_banned(3));
        assert_eq!(cands[0].banned.len(), 1);
    }

    #[test]
    fn test_anchor_grade_relaxed_when_requested_again() {
        let t = teacher_in(6);
        let pref = Preference::new(1, 2027).with_choices(Some(2), Some(6), None);
        let mut cands = vec![WorkingCandidate::new(&t, Some(&pref))];
        RotationConstraintBuilder::new(rules()).apply(&mut cands);
        assert!(cands[0].banned.is_empty());
    }

    #[test]
    fn test_anchor_grade_banned_without_request() {
        let t = teacher_in(1);
        let mut cands = vec![WorkingCandidate::new(&t, None)];
        RotationConstraintBuilder::new(rules()).apply(&mut cands);
        assert!(cands[0].is_banned(1));
    }

    #[test]
    fn test_no_current_grade_means_no_ban() {
        let t = Teacher::new(1, "신규교사");
        let mut cands = vec![WorkingCandidate::new(&t, None)];
        RotationConstraintBuilder::new(rules()).apply(&mut cands);
        assert!(cands[0].banned.is_empty());
    }

    #[test]
    fn test_history_ban_is_opt_in() {
        let mut t = Teacher::new(1, "최교사");
        t.grade_history = vec![
            GradeHistoryEntry { year: 2023, grade: 4 },
            GradeHistoryEntry { year: 2025, grade: 4 },
            GradeHistoryEntry { year: 2024, grade: 2 },
        ];

        let mut cands = vec![WorkingCandidate::new(&t, None)];
        RotationConstraintBuilder::new(rules()).apply(&mut cands);
        assert!(cands[0].banned.is_empty());

        let mut history_rules = RuleSet::default();
        history_rules.rotation = RotationPolicy::CurrentGradeAndHistory { max_repeats: 2 };
        let mut cands = vec![WorkingCandidate::new(&t, None)];
        RotationConstraintBuilder::new(Arc::new(history_rules)).apply(&mut cands);
        assert_eq!(cands[0].banned.iter().copied().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_subject_teacher_banned_everywhere() {
        let mut subject = Teacher::new(1, "영어전담");
        subject.is_subject_teacher = true;
        let homeroom = Teacher::new(2, "담임교사");
        let mut cands = vec![
            WorkingCandidate::new(&subject, None),
            WorkingCandidate::new(&homeroom, None),
        ];
        SubjectConstraintBuilder::new(rules()).apply(&mut cands);
        assert_eq!(cands[0].banned.len(), 6);
        assert!(cands[1].banned.is_empty());
    }
}
