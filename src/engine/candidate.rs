// ==========================================
// 학년 담임 배정 시스템 - 실행 단위 작업 후보
// ==========================================
// 실행 1회 동안만 존재하는 교사별 작업 상태
// 원칙: 희망 목록/금지 학년은 Teacher 엔티티에 기록하지 않음
// ==========================================

use crate::domain::{AssignmentType, Grade, Preference, Teacher, TeacherId};
use std::collections::BTreeSet;

/// 교사 1명의 실행 범위 작업 상태
#[derive(Debug, Clone)]
pub struct WorkingCandidate<'a> {
    pub teacher: &'a Teacher,
    /// 입력된 지망만 순서대로 (빈 순위 제외)
    pub prefs: Vec<Grade>,
    /// 이번 실행에서 받을 수 없는 학년
    pub banned: BTreeSet<Grade>,
}

impl<'a> WorkingCandidate<'a> {
    pub fn new(teacher: &'a Teacher, preference: Option<&Preference>) -> Self {
        Self {
            teacher,
            prefs: preference.map(Preference::choices).unwrap_or_default(),
            banned: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> TeacherId {
        self.teacher.id
    }

    /// 지망 순위(0-based)의 학년
    pub fn pref(&self, rank: usize) -> Option<Grade> {
        self.prefs.get(rank).copied()
    }

    /// 해당 학년이 몇 지망인지 (0-based)
    pub fn rank_of(&self, grade: Grade) -> Option<usize> {
        self.prefs.iter().position(|g| *g == grade)
    }

    pub fn wants(&self, grade: Grade) -> bool {
        self.prefs.contains(&grade)
    }

    pub fn is_banned(&self, grade: Grade) -> bool {
        self.banned.contains(&grade)
    }
}

/// 배정 확정 전 단계 결과 (규정 인용 부여 전)
#[derive(Debug, Clone)]
pub struct Placement<'a> {
    pub teacher: &'a Teacher,
    pub grade: Grade,
    pub assignment_type: AssignmentType,
    pub description: String,
}

impl<'a> Placement<'a> {
    pub fn new(
        teacher: &'a Teacher,
        grade: Grade,
        assignment_type: AssignmentType,
        description: String,
    ) -> Self {
        Self {
            teacher,
            grade,
            assignment_type,
            description,
        }
    }
}
