// ==========================================
// 학년 담임 배정 시스템 - 엔진 계층
// ==========================================
// 책임: 배정 규칙 실행, SQL/파일 I/O 없음
// 원칙: 모든 규칙은 사유(설명/로그)를 남김
// ==========================================

pub mod candidate;
pub mod constraints;
pub mod error;
pub mod exclusion;
pub mod greedy_scorer;
pub mod justification;
pub mod orchestrator;
pub mod preference_matcher;
pub mod priority;
pub mod slot_pool;

// 핵심 엔진 재노출
pub use candidate::{Placement, WorkingCandidate};
pub use constraints::{RotationConstraintBuilder, SubjectConstraintBuilder};
pub use error::{EngineError, EngineResult, ErrorKind};
pub use exclusion::{ExclusionFilter, ExclusionOutcome};
pub use greedy_scorer::{fmt_points, GreedyOutcome, GreedyScorer, ScoreBreakdown};
pub use justification::JustificationBuilder;
pub use orchestrator::{AllocationEngine, AllocationResult};
pub use preference_matcher::{MatchOutcome, PreferenceMatcher};
pub use priority::{PriorityOutcome, PriorityResolver};
pub use slot_pool::SlotPool;
