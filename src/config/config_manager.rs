// ==========================================
// 학년 담임 배정 시스템 - 설정 관리자
// ==========================================
// 책임: 규칙 테이블 로드/저장, 기본값 대체
// 저장: config_kv 테이블 (scope_id='global', key-value)
// ==========================================

use crate::config::rule_set::RuleSet;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 설정 키 상수
pub mod config_keys {
    /// 규칙 테이블 전체 (JSON)
    pub const RULE_SET: &str = "rule_set";
}

/// 설정 계층 오류
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("설정 DB 오류: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("설정 DB 잠금 실패: {0}")]
    Lock(String),

    #[error("설정 값 형식 오류 (key: {key}): {message}")]
    ValueFormat { key: String, message: String },

    #[error("규칙 테이블 검증 실패: {0}")]
    InvalidRuleSet(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// RuleSetReader Trait
// ==========================================
// 용도: 배정 유스케이스가 규칙 테이블을 얻는 경로
// 구현체: ConfigManager (config_kv), RuleSet (고정 값)
pub trait RuleSetReader: Send + Sync {
    fn load_rule_set(&self) -> ConfigResult<RuleSet>;
}

impl RuleSetReader for RuleSet {
    fn load_rule_set(&self) -> ConfigResult<RuleSet> {
        Ok(self.clone())
    }
}

// ==========================================
// ConfigManager - 설정 관리자
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// DB 경로로 생성
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 기존 연결 공유
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// config_kv 값 조회 (scope_id='global')
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// config_kv 값 저장 (upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 규칙 테이블 저장 (검증 후)
    pub fn save_rule_set(&self, rules: &RuleSet) -> ConfigResult<()> {
        rules.validate().map_err(ConfigError::InvalidRuleSet)?;
        let json = rules.to_json().map_err(|e| ConfigError::ValueFormat {
            key: config_keys::RULE_SET.to_string(),
            message: e.to_string(),
        })?;
        self.set_config_value(config_keys::RULE_SET, &json)
    }

    /// JSON 문서로 받은 규칙 테이블 검증 후 저장
    pub fn import_rule_set_json(&self, raw: &str) -> ConfigResult<RuleSet> {
        let rules = RuleSet::from_json(raw).map_err(|e| ConfigError::ValueFormat {
            key: config_keys::RULE_SET.to_string(),
            message: e.to_string(),
        })?;
        self.save_rule_set(&rules)?;
        info!(rotation = ?rules.rotation, "규칙 테이블 저장");
        Ok(rules)
    }

    /// 현재 적용되는 규칙 테이블 (저장값 또는 기본값) JSON
    pub fn export_rule_set_json(&self) -> ConfigResult<String> {
        let rules = self.load_rule_set()?;
        rules.to_json().map_err(|e| ConfigError::ValueFormat {
            key: config_keys::RULE_SET.to_string(),
            message: e.to_string(),
        })
    }

    /// 저장된 규칙 테이블 삭제 (기본값으로 복귀)
    pub fn reset_rule_set(&self) -> ConfigResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![config_keys::RULE_SET],
        )?;
        Ok(rows > 0)
    }
}

impl RuleSetReader for ConfigManager {
    /// 저장된 규칙 테이블, 없으면 기본값
    fn load_rule_set(&self) -> ConfigResult<RuleSet> {
        let Some(raw) = self.get_config_value(config_keys::RULE_SET)? else {
            debug!("저장된 규칙 테이블 없음, 기본값 사용");
            return Ok(RuleSet::default());
        };

        let rules = RuleSet::from_json(&raw).map_err(|e| {
            warn!(error = %e, "규칙 테이블 JSON 파싱 실패");
            ConfigError::ValueFormat {
                key: config_keys::RULE_SET.to_string(),
                message: e.to_string(),
            }
        })?;
        rules.validate().map_err(ConfigError::InvalidRuleSet)?;
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rule_set::RotationPolicy;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_load_rule_set_defaults_when_missing() {
        let manager = setup_manager();
        assert_eq!(manager.load_rule_set().unwrap(), RuleSet::default());
    }

    #[test]
    fn test_save_and_load_rule_set() {
        let manager = setup_manager();
        let mut rules = RuleSet::default();
        rules.rotation = RotationPolicy::CurrentGradeAndHistory { max_repeats: 2 };
        manager.save_rule_set(&rules).unwrap();

        assert_eq!(manager.load_rule_set().unwrap(), rules);

        assert!(manager.reset_rule_set().unwrap());
        assert_eq!(manager.load_rule_set().unwrap(), RuleSet::default());
    }

    #[test]
    fn test_rule_set_json_import_export_reset() {
        let manager = setup_manager();
        let mut rules = RuleSet::default();
        rules.rotation = RotationPolicy::CurrentGradeAndHistory { max_repeats: 2 };
        let raw = rules.to_json().unwrap();

        let stored = manager.import_rule_set_json(&raw).unwrap();
        assert_eq!(stored, rules);
        let shown = RuleSet::from_json(&manager.export_rule_set_json().unwrap()).unwrap();
        assert_eq!(shown.rotation, RotationPolicy::CurrentGradeAndHistory { max_repeats: 2 });

        assert!(manager.reset_rule_set().unwrap());
        assert!(!manager.reset_rule_set().unwrap());
        let shown = RuleSet::from_json(&manager.export_rule_set_json().unwrap()).unwrap();
        assert_eq!(shown, RuleSet::default());
    }

    #[test]
    fn test_import_rejects_malformed_json_and_keeps_previous() {
        let manager = setup_manager();
        assert!(matches!(
            manager.import_rule_set_json("{\"rotation\": 3"),
            Err(ConfigError::ValueFormat { .. })
        ));
        assert_eq!(manager.get_config_value(config_keys::RULE_SET).unwrap(), None);

        let mut rules = RuleSet::default();
        rules.rotation = RotationPolicy::CurrentGradeAndHistory { max_repeats: 3 };
        manager.save_rule_set(&rules).unwrap();
        assert!(manager.import_rule_set_json("[]").is_err());
        assert_eq!(manager.load_rule_set().unwrap(), rules);
    }

    #[test]
    fn test_save_rejects_invalid_rule_set() {
        let manager = setup_manager();
        let mut rules = RuleSet::default();
        rules.homeroom_grades.clear();
        assert!(matches!(
            manager.save_rule_set(&rules),
            Err(ConfigError::InvalidRuleSet(_))
        ));
    }

    #[test]
    fn test_load_reports_corrupt_json() {
        let manager = setup_manager();
        manager
            .set_config_value(config_keys::RULE_SET, "{not json")
            .unwrap();
        assert!(matches!(
            manager.load_rule_set(),
            Err(ConfigError::ValueFormat { .. })
        ));
    }
}
