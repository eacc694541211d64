// ==========================================
// 학년 담임 배정 시스템 - 설정 계층
// ==========================================
// 책임: 배정 규칙 테이블 관리 (기본값 + DB 오버라이드)
// 저장: config_kv 테이블
// ==========================================

pub mod config_manager;
pub mod rule_set;

pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult, RuleSetReader};
pub use rule_set::{CitationRule, KeywordRule, RolePoint, RotationPolicy, RuleSet};
