// ==========================================
// 학년 담임 배정 시스템 - 규정 인용 생성
// ==========================================
// 배정 유형 + 설명 문구 → 감사용 규정 인용
// 원칙: 배정 판단에는 사용하지 않음 (표시 전용)
// ==========================================

use crate::config::RuleSet;
use crate::domain::{Assignment, AssignmentType};
use crate::engine::candidate::Placement;
use std::sync::Arc;

pub struct JustificationBuilder {
    rules: Arc<RuleSet>,
}

impl JustificationBuilder {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// 설명 속 인용 토큰 → 지망 인용 → 조정 인용 순서
    pub fn rule_reference(
        &self,
        assignment_type: AssignmentType,
        description: &str,
    ) -> Option<String> {
        if let Some(citation) = self
            .rules
            .citations
            .iter()
            .find(|c| description.contains(c.token.as_str()))
        {
            return Some(citation.reference.clone());
        }

        match assignment_type {
            AssignmentType::FirstChoice
            | AssignmentType::SecondChoice
            | AssignmentType::ThirdChoice => Some(self.rules.choice_citation.clone()),
            AssignmentType::Adjustment => Some(self.rules.adjustment_citation.clone()),
            AssignmentType::RulePriority => None,
        }
    }

    pub fn finalize(&self, placements: Vec<Placement<'_>>, year: i32) -> Vec<Assignment> {
        placements
            .into_iter()
            .map(|p| Assignment {
                teacher_id: p.teacher.id,
                teacher_name: p.teacher.name.clone(),
                year,
                assigned_grade: p.grade,
                rule_reference: self.rule_reference(p.assignment_type, &p.description),
                assignment_type: p.assignment_type,
                description: p.description,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Teacher;

    fn builder() -> JustificationBuilder {
        JustificationBuilder::new(Arc::new(RuleSet::default()))
    }

    #[test]
    fn test_special_priority_citation() {
        let r = builder().rule_reference(AssignmentType::RulePriority, "제12조④: 임신 (1지망 반영)");
        assert_eq!(r.as_deref(), Some("제12조④ (특수 사유 우선 배정)"));
    }

    #[test]
    fn test_role_priority_citation() {
        let r = builder().rule_reference(
            AssignmentType::RulePriority,
            "제12조② 역할 우선 (교과전담) (현재 학년 유지)",
        );
        assert_eq!(r.as_deref(), Some("제12조② (역할 우선 배정)"));
    }

    #[test]
    fn test_military_reason_has_no_token() {
        let r = builder().rule_reference(
            AssignmentType::RulePriority,
            "제12조③/제14조③: 군 입대 (현재 학년 유지)",
        );
        assert_eq!(r, None);
    }

    #[test]
    fn test_choice_and_adjustment_citations() {
        let b = builder();
        assert_eq!(
            b.rule_reference(AssignmentType::ThirdChoice, "3지망 반영 (희망 학년: 2학년)")
                .as_deref(),
            Some("제11조 (희망 학년 반영)")
        );
        assert_eq!(
            b.rule_reference(AssignmentType::Adjustment, "학년가중치: 2점 | 총점: 2점")
                .as_deref(),
            Some("제12조① (학년 순환 원칙) + 점수 기반 조정")
        );
    }

    #[test]
    fn test_finalize_keeps_order_and_fields() {
        let a = Teacher::new(7, "정교사");
        let b = Teacher::new(3, "한교사");
        let placements = vec![
            Placement::new(&a, 1, AssignmentType::FirstChoice, "1지망 반영 (희망 학년: 1학년)".into()),
            Placement::new(&b, 4, AssignmentType::Adjustment, "총점: 3점".into()),
        ];
        let out = builder().finalize(placements, 2027);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].teacher_id, 7);
        assert_eq!(out[0].teacher_name, "정교사");
        assert_eq!(out[0].year, 2027);
        assert_eq!(out[1].assigned_grade, 4);
        assert!(out[1].rule_reference.is_some());
    }
}
