// ==========================================
// 학년 담임 배정 시스템 - 슬롯 풀
// ==========================================
// 학년 설정의 required_homerooms 를 학년 값 복사본으로 펼친 멀티셋
// 순서: 학년 설정 입력 순서 그대로 연결
// ==========================================

use crate::domain::{Grade, GradeSetting};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPool {
    slots: Vec<Grade>,
}

impl SlotPool {
    /// 학년 설정으로부터 슬롯 풀 생성
    ///
    /// # 오류
    /// - 학년 설정 없음 → NoGradeSettings
    /// - 필요 담임 수 합계 0 → EmptySlotPool
    pub fn build(settings: &[GradeSetting], year: i32) -> EngineResult<Self> {
        if settings.is_empty() {
            return Err(EngineError::NoGradeSettings { year });
        }

        let slots: Vec<Grade> = settings
            .iter()
            .flat_map(|s| std::iter::repeat(s.grade).take(s.required_homerooms as usize))
            .collect();

        if slots.is_empty() {
            return Err(EngineError::EmptySlotPool { year });
        }
        Ok(Self { slots })
    }

    pub fn contains(&self, grade: Grade) -> bool {
        self.slots.contains(&grade)
    }

    /// 해당 학년 슬롯 1개 소비 (없으면 false)
    pub fn take(&mut self, grade: Grade) -> bool {
        match self.slots.iter().position(|g| *g == grade) {
            Some(idx) => {
                self.slots.remove(idx);
                true
            }
            None => false,
        }
    }

    /// 남은 서로 다른 학년 (오름차순)
    pub fn distinct_grades(&self) -> BTreeSet<Grade> {
        self.slots.iter().copied().collect()
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.slots.iter().filter(|g| **g == grade).count()
    }

    /// 학년별 남은 슬롯 수
    pub fn remaining_by_grade(&self) -> BTreeMap<Grade, usize> {
        let mut counts = BTreeMap::new();
        for g in &self.slots {
            *counts.entry(*g).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
