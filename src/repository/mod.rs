// ==========================================
// 학년 담임 배정 시스템 - 데이터 저장소 계층
// ==========================================
// 원칙: 저장소에는 업무 로직 없음
// ==========================================
// 책임: 데이터 접근 인터페이스 제공, DB 세부 사항 은닉
// 제약: 모든 조회는 매개변수 바인딩 사용
// ==========================================

pub mod assignment_repo;
pub mod error;
pub mod preference_repo;
pub mod teacher_repo;

// 핵심 저장소 재노출
pub use assignment_repo::{AssignmentLogRow, AssignmentRepository, ASSIGN_STEP};
pub use error::{RepositoryError, RepositoryResult};
pub use preference_repo::{GradeSettingRepository, PreferenceRepository};
pub use teacher_repo::TeacherRepository;
