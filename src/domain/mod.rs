// ==========================================
// 학년 담임 배정 시스템 - 도메인 모델 계층
// ==========================================
// 책임: 엔티티와 타입 정의
// 원칙: 데이터 접근 로직 없음, 엔진 로직 없음
// ==========================================

pub mod assignment;
pub mod preference;
pub mod teacher;
pub mod types;

pub use assignment::{AllocationLog, Assignment};
pub use preference::{GradeSetting, Preference, PreferenceError};
pub use teacher::{GradeHistoryEntry, Teacher};
pub use types::{is_valid_grade, AssignmentType, Grade, StageTag, TeacherId, ALL_GRADES};
