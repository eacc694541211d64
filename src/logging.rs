// ==========================================
// 로그 초기화
// ==========================================
// tracing + tracing-subscriber
// RUST_LOG 환경 변수로 수준 지정
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 로그 초기화
///
/// # 환경 변수
/// - RUST_LOG: 필터 (기본값: info)
///   예: RUST_LOG=debug 또는 RUST_LOG=homeroom_assign::engine=debug
///
/// # 예시
/// ```no_run
/// use homeroom_assign::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// JSON 형식 로그 (배치 실행 결과를 수집할 때)
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().json().with_env_filter(filter).with_target(true).init();
}

/// 테스트용 로그 초기화 (debug, 중복 호출 허용)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
