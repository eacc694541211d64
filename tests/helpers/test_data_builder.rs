// ==========================================
// 테스트 데이터 빌더 - 통합 테스트용
// ==========================================

#![allow(dead_code)]

use homeroom_assign::domain::{
    Grade, GradeHistoryEntry, GradeSetting, Preference, Teacher, TeacherId,
};
use std::collections::HashMap;

pub const YEAR: i32 = 2027;

// ==========================================
// Teacher 빌더
// ==========================================

pub struct TeacherBuilder {
    teacher: Teacher,
}

impl TeacherBuilder {
    pub fn new(id: TeacherId, name: &str) -> Self {
        Self {
            teacher: Teacher::new(id, name),
        }
    }

    pub fn current_grade(mut self, grade: Grade) -> Self {
        self.teacher.current_grade = Some(grade);
        self.teacher.is_homeroom_current = true;
        self
    }

    pub fn subject_teacher(mut self) -> Self {
        self.teacher.is_subject_teacher = true;
        self
    }

    pub fn duty_role(mut self, role: &str) -> Self {
        self.teacher.duty_role = Some(role.to_string());
        self
    }

    pub fn special(mut self, conditions: &str) -> Self {
        self.teacher.special_conditions = Some(conditions.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.teacher.subject = Some(subject.to_string());
        self
    }

    pub fn history(mut self, entries: &[(i32, Grade)]) -> Self {
        self.teacher.grade_history = entries
            .iter()
            .map(|(year, grade)| GradeHistoryEntry { year: *year, grade: *grade })
            .collect();
        self
    }

    pub fn build(self) -> Teacher {
        self.teacher
    }
}

// ==========================================
// 희망 / 학급 설정 묶음
// ==========================================

#[derive(Default)]
pub struct PreferenceSet {
    prefs: HashMap<TeacherId, Preference>,
}

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1~3지망을 순서대로 지정 (빈 순위 없음)
    pub fn choose(mut self, teacher_id: TeacherId, choices: &[Grade]) -> Self {
        let pref = Preference::new(teacher_id, YEAR).with_choices(
            choices.first().copied(),
            choices.get(1).copied(),
            choices.get(2).copied(),
        );
        self.prefs.insert(teacher_id, pref);
        self
    }

    pub fn insert(mut self, pref: Preference) -> Self {
        self.prefs.insert(pref.teacher_id, pref);
        self
    }

    pub fn build(self) -> HashMap<TeacherId, Preference> {
        self.prefs
    }
}

/// (학년, 필요 담임 수) 목록 → 학급 설정
pub fn settings(slots: &[(Grade, u32)]) -> Vec<GradeSetting> {
    slots
        .iter()
        .map(|(grade, n)| GradeSetting::new(YEAR, *grade, *n))
        .collect()
}
