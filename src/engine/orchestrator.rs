// ==========================================
// 학년 담임 배정 시스템 - 배정 엔진 편성기
// ==========================================
// 용도: 배정 단계 실행 순서 조정
// 순서: 검증 → 제외 → 우선 배정 → 금지 학년 → 지망 매칭 → 조정 배정 → 규정 인용
// ==========================================
// 원칙: I/O 없음, 동기 실행, 같은 입력이면 같은 결과
// ==========================================

use crate::config::RuleSet;
use crate::domain::{AllocationLog, Assignment, Grade, GradeSetting, Preference, StageTag, Teacher, TeacherId};
use crate::engine::candidate::WorkingCandidate;
use crate::engine::constraints::{RotationConstraintBuilder, SubjectConstraintBuilder};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::exclusion::ExclusionFilter;
use crate::engine::greedy_scorer::GreedyScorer;
use crate::engine::justification::JustificationBuilder;
use crate::engine::preference_matcher::PreferenceMatcher;
use crate::engine::priority::PriorityResolver;
use crate::engine::slot_pool::SlotPool;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// AllocationResult - 배정 실행 결과
// ==========================================

#[derive(Debug, Clone, Serialize)]
pub struct AllocationResult {
    pub run_id: Uuid,
    pub year: i32,

    /// 규정우선 → 지망 → 조정 순
    pub assignments: Vec<Assignment>,
    pub excluded: Vec<Teacher>,
    pub logs: Vec<AllocationLog>,

    /// 배정도 제외도 되지 않은 교사 (오류 아님)
    pub unresolved: Vec<TeacherId>,
}

impl AllocationResult {
    /// 학년별 배정 인원
    pub fn grade_counts(&self) -> BTreeMap<Grade, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.assigned_grade).or_insert(0) += 1;
        }
        counts
    }

    /// 제외 사유 조회
    pub fn excluded_reason(&self, teacher_id: TeacherId) -> Option<&str> {
        self.logs
            .iter()
            .find(|l| l.teacher_id == teacher_id && l.stage == StageTag::Exclude)
            .map(|l| l.message.as_str())
    }

    pub fn assignment_for(&self, teacher_id: TeacherId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.teacher_id == teacher_id)
    }
}

// ==========================================
// AllocationEngine - 배정 엔진
// ==========================================

pub struct AllocationEngine {
    rules: Arc<RuleSet>,
    exclusion: ExclusionFilter,
    priority: PriorityResolver,
    rotation: RotationConstraintBuilder,
    subject: SubjectConstraintBuilder,
    matcher: PreferenceMatcher,
    scorer: GreedyScorer,
    justification: JustificationBuilder,
}

impl AllocationEngine {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            exclusion: ExclusionFilter::new(rules.clone()),
            priority: PriorityResolver::new(rules.clone()),
            rotation: RotationConstraintBuilder::new(rules.clone()),
            subject: SubjectConstraintBuilder::new(rules.clone()),
            matcher: PreferenceMatcher::new(),
            scorer: GreedyScorer::new(rules.clone()),
            justification: JustificationBuilder::new(rules.clone()),
            rules,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 한 학년도 배정 실행
    ///
    /// # 인수
    /// - teachers: 교사 목록 (입력 순서가 동점 처리 순서)
    /// - settings: 학급 설정 (다른 연도 항목은 무시)
    /// - preferences: 교사별 희망 (다른 연도 항목은 무시)
    /// - year: 대상 학년도
    ///
    /// # 오류
    /// 설정/데이터 오류 시 결과 없이 실패
    #[instrument(
        skip(self, teachers, settings, preferences),
        fields(run_id = tracing::field::Empty, teachers = teachers.len())
    )]
    pub fn run(
        &self,
        teachers: &[Teacher],
        settings: &[GradeSetting],
        preferences: &HashMap<TeacherId, Preference>,
        year: i32,
    ) -> EngineResult<AllocationResult> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        // ==========================================
        // 단계 0: 입력 검증
        // ==========================================
        self.rules.validate().map_err(EngineError::InvalidRuleSet)?;

        let year_settings: Vec<GradeSetting> =
            settings.iter().filter(|s| s.year == year).cloned().collect();
        if year_settings.is_empty() {
            return Err(EngineError::NoGradeSettings { year });
        }
        if teachers.is_empty() {
            return Err(EngineError::NoTeachers);
        }
        let mut pool = SlotPool::build(&year_settings, year)?;

        info!(
            total_slots = pool.len(),
            preferences = preferences.len(),
            "배정 시작"
        );

        // ==========================================
        // 단계 1: 배정 제외 (제13조)
        // ==========================================
        let exclusion = self.exclusion.apply(teachers, year);
        let mut logs = exclusion.logs;
        info!(
            kept = exclusion.kept.len(),
            excluded = exclusion.excluded.len(),
            "배정 제외 완료"
        );

        let candidates: Vec<WorkingCandidate<'_>> = exclusion
            .kept
            .iter()
            .copied()
            .map(|t| {
                let pref = preferences.get(&t.id).filter(|p| p.year == year);
                WorkingCandidate::new(t, pref)
            })
            .collect();

        // ==========================================
        // 단계 2: 우선 배정 (제12조④, 제12조②)
        // ==========================================
        let priority = self.priority.resolve(candidates, &mut pool);
        logs.extend(priority.logs);
        let mut placements = priority.placements;
        let mut remaining = priority.remaining;

        // ==========================================
        // 단계 3: 금지 학년 (순환, 교과전담)
        // ==========================================
        self.rotation.apply(&mut remaining);
        self.subject.apply(&mut remaining);
        debug!(
            constrained = remaining.iter().filter(|c| !c.banned.is_empty()).count(),
            "금지 학년 계산 완료"
        );

        // ==========================================
        // 단계 4: 지망 매칭 (제11조)
        // ==========================================
        let matched = self.matcher.run(remaining, &mut pool);
        placements.extend(matched.placements);

        // ==========================================
        // 단계 5: 점수 기반 조정
        // ==========================================
        let greedy = self.scorer.assign(matched.remaining, &mut pool);
        placements.extend(greedy.placements);

        let unresolved: Vec<TeacherId> = greedy.unresolved.iter().map(|c| c.id()).collect();
        if !unresolved.is_empty() {
            warn!(count = unresolved.len(), ids = ?unresolved, "미배정 교사 있음");
        }

        // ==========================================
        // 단계 6: 규정 인용
        // ==========================================
        let assignments = self.justification.finalize(placements, year);

        info!(
            assigned = assignments.len(),
            excluded = exclusion.excluded.len(),
            unresolved = unresolved.len(),
            slots_left = pool.len(),
            "배정 완료"
        );

        Ok(AllocationResult {
            run_id,
            year,
            assignments,
            excluded: exclusion.excluded.into_iter().cloned().collect(),
            logs,
            unresolved,
        })
    }
}
