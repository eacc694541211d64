// ==========================================
// 학년 담임 배정 시스템 - 배정 제외 필터
// ==========================================
// 제13조: 휴직/병가/파견/연수/임신·출산/고령 교사는 배정 대상에서 제외
// 규칙: 특수 조건 소문자화 → 제외 패턴 순서대로 부분 문자열 매칭, 첫 매칭 1건만
// ==========================================

use crate::config::RuleSet;
use crate::domain::{AllocationLog, StageTag, Teacher};
use std::sync::Arc;
use tracing::debug;

/// 제외 필터 결과
#[derive(Debug, Clone)]
pub struct ExclusionOutcome<'a> {
    /// 입력 순서 유지
    pub kept: Vec<&'a Teacher>,
    pub excluded: Vec<&'a Teacher>,
    pub logs: Vec<AllocationLog>,
}

pub struct ExclusionFilter {
    rules: Arc<RuleSet>,
}

impl ExclusionFilter {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// 교사 목록을 유지/제외로 분할
    ///
    /// `_year` 는 연도별 규칙 확장용으로 받아 두며 현재 판정에 쓰지 않는다.
    pub fn apply<'a, I>(&self, teachers: I, _year: i32) -> ExclusionOutcome<'a>
    where
        I: IntoIterator<Item = &'a Teacher>,
    {
        let mut kept = Vec::new();
        let mut excluded = Vec::new();
        let mut logs = Vec::new();

        for teacher in teachers {
            let cond = teacher.special_conditions_lower();
            match self.rules.match_exclusion(&cond) {
                Some(rule) => {
                    debug!(teacher_id = teacher.id, reason = %rule.reason, "배정 제외");
                    logs.push(AllocationLog::new(
                        teacher.id,
                        StageTag::Exclude,
                        rule.reason.clone(),
                    ));
                    excluded.push(teacher);
                }
                None => kept.push(teacher),
            }
        }

        ExclusionOutcome {
            kept,
            excluded,
            logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teacher(id: i64, cond: Option<&str>) -> Teacher {
        let mut t = Teacher::new(id, format!("교사{}", id));
        t.special_conditions = cond.map(|s| s.to_string());
        t
    }

    #[test]
    fn test_partition_preserves_order() {
        let teachers = vec![
            teacher(1, None),
            teacher(2, Some("육아휴직")),
            teacher(3, Some("")),
            teacher(4, Some("해외 파견 예정")),
            teacher(5, Some("건강 사유")),
        ];
        let filter = ExclusionFilter::new(Arc::new(RuleSet::default()));
        let outcome = filter.apply(&teachers, 2027);

        let kept: Vec<i64> = outcome.kept.iter().map(|t| t.id).collect();
        let excluded: Vec<i64> = outcome.excluded.iter().map(|t| t.id).collect();
        assert_eq!(kept, vec![1, 3, 5]);
        assert_eq!(excluded, vec![2, 4]);
        assert_eq!(outcome.logs.len(), 2);
        assert_eq!(outcome.logs[0].stage, StageTag::Exclude);
        assert_eq!(outcome.logs[0].message, "제13조: 휴직");
        assert_eq!(outcome.logs[1].message, "제13조: 파견");
    }

    #[test]
    fn test_single_reason_per_teacher() {
        // 병가 + 연수 → 테이블상 앞선 병가 1건만
        let teachers = vec![teacher(1, Some("연수 후 병가 45일"))];
        let filter = ExclusionFilter::new(Arc::new(RuleSet::default()));
        let outcome = filter.apply(&teachers, 2027);
        assert_eq!(outcome.logs.len(), 1);
        assert_eq!(outcome.logs[0].message, "제13조: 병가 30일 이상");
    }

    #[test]
    fn test_reapplying_on_kept_is_idempotent() {
        let teachers = vec![
            teacher(1, Some("고령")),
            teacher(2, None),
            teacher(3, Some("원로교사")),
        ];
        let filter = ExclusionFilter::new(Arc::new(RuleSet::default()));
        let first = filter.apply(&teachers, 2027);
        let second = filter.apply(first.kept.iter().copied(), 2027);

        let ids = |v: &[&Teacher]| v.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&second.kept), ids(&first.kept));
        assert!(second.excluded.is_empty());
    }
}
