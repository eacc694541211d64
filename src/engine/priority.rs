// ==========================================
// 학년 담임 배정 시스템 - 우선 배정 (규정 우선)
// ==========================================
// 패스 A (제12조④): 특수 사유 → 현재 학년 유지, 없으면 1지망
// 패스 B (제12조②): 업무부장/학년부장/교과전담 → 역할 점수 내림차순
// ==========================================
// 입력: 제외 필터를 통과한 작업 후보 + 슬롯 풀
// 출력: 배정(규정우선) + 남은 후보 + 로그
// 원칙: 우선 배정도 슬롯 1개를 소비, 잔여 슬롯이 없으면 일반 배정으로 이관
//       교과전담 플래그 교사는 두 패스 모두 대상 아님 (담임 배정 불가)
// ==========================================

use crate::config::{KeywordRule, RuleSet};
use crate::domain::{AllocationLog, AssignmentType, Grade, StageTag};
use crate::engine::candidate::{Placement, WorkingCandidate};
use crate::engine::slot_pool::SlotPool;
use std::sync::Arc;
use tracing::{debug, info};

const DETAIL_CURRENT_GRADE: &str = " (현재 학년 유지)";

/// 우선 배정 결과
#[derive(Debug, Clone)]
pub struct PriorityOutcome<'a> {
    pub placements: Vec<Placement<'a>>,
    pub remaining: Vec<WorkingCandidate<'a>>,
    pub logs: Vec<AllocationLog>,
}

pub struct PriorityResolver {
    rules: Arc<RuleSet>,
}

impl PriorityResolver {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// 패스 A → 패스 B 순서로 실행
    pub fn resolve<'a>(
        &self,
        candidates: Vec<WorkingCandidate<'a>>,
        pool: &mut SlotPool,
    ) -> PriorityOutcome<'a> {
        let mut placements = Vec::new();
        let mut logs = Vec::new();

        let remaining = self.special_pass(candidates, pool, &mut placements, &mut logs);
        let special_count = placements.len();

        let remaining = self.role_pass(remaining, pool, &mut placements, &mut logs);

        info!(
            special_assigned = special_count,
            role_assigned = placements.len() - special_count,
            remaining = remaining.len(),
            "우선 배정 완료"
        );

        PriorityOutcome {
            placements,
            remaining,
            logs,
        }
    }

    // ==========================================
    // 패스 A: 특수 사유 우선 (제12조④)
    // ==========================================

    fn special_pass<'a>(
        &self,
        candidates: Vec<WorkingCandidate<'a>>,
        pool: &mut SlotPool,
        placements: &mut Vec<Placement<'a>>,
        logs: &mut Vec<AllocationLog>,
    ) -> Vec<WorkingCandidate<'a>> {
        let mut matched: Vec<(WorkingCandidate<'a>, &KeywordRule)> = Vec::new();
        let mut remaining = Vec::new();

        for cand in candidates {
            if cand.teacher.is_subject_teacher {
                remaining.push(cand);
                continue;
            }
            let cond = cand.teacher.special_conditions_lower();
            match self.rules.match_priority(&cond) {
                Some(rule) => matched.push((cand, rule)),
                None => remaining.push(cand),
            }
        }

        for (cand, rule) in matched {
            // 현재 학년 유지 우선, 없으면 1지망
            let target = match (cand.teacher.current_grade, cand.pref(0)) {
                (Some(grade), _) => Some((grade, DETAIL_CURRENT_GRADE)),
                (None, Some(grade)) => Some((grade, " (1지망 반영)")),
                (None, None) => None,
            };

            let Some((grade, detail)) = target else {
                debug!(teacher_id = cand.id(), "특수 사유 대상이나 기준 학년 없음");
                remaining.push(cand);
                continue;
            };

            if !pool.take(grade) {
                logs.push(AllocationLog::new(
                    cand.id(),
                    StageTag::PriorityDeferred,
                    format!("{}: {}학년 잔여 슬롯 없음, 일반 배정으로 이관", rule.reason, grade),
                ));
                remaining.push(cand);
                continue;
            }

            debug!(teacher_id = cand.id(), grade, reason = %rule.reason, "특수 사유 우선 배정");
            placements.push(Placement::new(
                cand.teacher,
                grade,
                AssignmentType::RulePriority,
                format!("{}{}", rule.reason, detail),
            ));
            logs.push(AllocationLog::new(
                cand.id(),
                StageTag::SpecialPriority,
                rule.reason.clone(),
            ));
        }

        remaining
    }

    // ==========================================
    // 패스 B: 역할 우선 (제12조②)
    // ==========================================

    /// duty_role 의 역할 점수 (테이블 순서상 첫 매칭, 없으면 0)
    pub fn role_score(&self, cand: &WorkingCandidate<'_>) -> f64 {
        cand.teacher
            .duty_role
            .as_deref()
            .and_then(|role| self.rules.first_role_point(role))
            .map(|rp| rp.weight)
            .unwrap_or(0.0)
    }

    fn role_pass<'a>(
        &self,
        candidates: Vec<WorkingCandidate<'a>>,
        pool: &mut SlotPool,
        placements: &mut Vec<Placement<'a>>,
        logs: &mut Vec<AllocationLog>,
    ) -> Vec<WorkingCandidate<'a>> {
        let (mut role_holders, others): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .map(|cand| (self.role_score(&cand), cand))
            .partition(|(score, cand)| *score > 0.0 && !cand.teacher.is_subject_teacher);

        // 안정 정렬: 동점이면 입력 순서 유지
        role_holders.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut remaining: Vec<WorkingCandidate<'a>> =
            others.into_iter().map(|(_, cand)| cand).collect();

        for (score, cand) in role_holders {
            let Some((grade, detail)) = self.role_target(&cand, pool) else {
                if !cand.prefs.is_empty() || cand.teacher.current_grade.is_some() {
                    logs.push(AllocationLog::new(
                        cand.id(),
                        StageTag::PriorityDeferred,
                        "제12조②: 희망/현재 학년 잔여 슬롯 없음, 일반 배정으로 이관",
                    ));
                }
                remaining.push(cand);
                continue;
            };

            pool.take(grade);
            let role_name = cand.teacher.duty_role.as_deref().unwrap_or("역할");
            debug!(teacher_id = cand.id(), grade, role = role_name, score, "역할 우선 배정");
            placements.push(Placement::new(
                cand.teacher,
                grade,
                AssignmentType::RulePriority,
                format!("제12조② 역할 우선 ({}){}", role_name, detail),
            ));
            logs.push(AllocationLog::new(
                cand.id(),
                StageTag::RolePriority,
                format!("역할 {} 우선 배정", role_name),
            ));
        }

        remaining
    }

    /// 잔여 슬롯이 있는 첫 지망, 없으면 현재 학년
    fn role_target(
        &self,
        cand: &WorkingCandidate<'_>,
        pool: &SlotPool,
    ) -> Option<(Grade, String)> {
        if let Some((rank, grade)) = cand
            .prefs
            .iter()
            .enumerate()
            .find(|(_, g)| pool.contains(**g))
        {
            return Some((*grade, format!(" ({}지망 반영)", rank + 1)));
        }

        cand.teacher
            .current_grade
            .filter(|g| pool.contains(*g))
            .map(|g| (g, DETAIL_CURRENT_GRADE.to_string()))
    }
}
