// ==========================================
// 학년 담임 배정 시스템 - API 계층
// ==========================================
// 책임: CLI 가 호출하는 배정 유스케이스 제공
// ==========================================

pub mod assignment_api;
pub mod error;

pub use assignment_api::{AssignmentApi, GradeSummaryRow, PreferenceSummaryRow};
pub use error::{ApiError, ApiResult};
