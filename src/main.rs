// ==========================================
// 학년 담임 배정 시스템 - CLI 진입점
// ==========================================
// 흐름: init → import → (rules) → assign → list/summary/export
// ==========================================

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use homeroom_assign::api::AssignmentApi;
use homeroom_assign::config::{ConfigManager, RuleSetReader};
use homeroom_assign::db::{get_default_db_path, init_schema, open_sqlite_connection};
use homeroom_assign::importer::{DataImporter, ImportReport, ResultExporter};
use homeroom_assign::{logging, APP_NAME, VERSION};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(name = "homeroom-assign", version, about = "초등학교 학년 담임 배정 도구", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite 파일 경로 (기본: 사용자 데이터 디렉터리)
    #[arg(long, global = true)]
    db: Option<String>,

    /// 로그 형식 (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    /// 교사정보
    Teachers,
    /// 희망사항
    Preferences,
    /// 학년설정
    Settings,
    /// 세 시트를 담은 엑셀 통합 문서
    Workbook,
}

#[derive(Subcommand)]
enum Commands {
    /// 데이터베이스 스키마 생성
    Init,

    /// 입력 파일 가져오기
    Import {
        #[arg(value_enum)]
        kind: ImportKind,

        /// CSV 또는 xlsx 파일
        file: PathBuf,

        /// 배정 연도 (기본: 내년)
        #[arg(short, long)]
        year: Option<i32>,

        /// 해당 연도 희망사항/학년설정을 지우고 다시 입력
        #[arg(long, default_value = "false")]
        replace: bool,
    },

    /// 배정 규칙 테이블 조회/변경
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// 배정 실행 (같은 연도의 기존 결과는 교체)
    Assign {
        #[arg(short, long)]
        year: Option<i32>,

        /// 결과 CSV 출력 디렉터리
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// 저장된 배정 결과 출력
    List {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// 학년별 현황 (필요/배정, 지망 인원)
    Summary {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// 저장된 배정 결과를 CSV 로 내보내기
    Export {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// 현재 적용되는 규칙 테이블 JSON 출력
    Show,

    /// JSON 파일로 규칙 테이블 저장 (검증 후)
    Set {
        file: PathBuf,
    },

    /// 저장된 규칙 테이블 삭제 (기본값 사용)
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_format == "json" {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::info!("{} v{}", APP_NAME, VERSION);

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(db = %db_path, "데이터베이스 사용");
    let conn = open_database(&db_path)?;

    match cli.command {
        Commands::Init => {
            println!("스키마 준비 완료: {}", db_path);
        }

        Commands::Import {
            kind,
            file,
            year,
            replace,
        } => {
            let year = resolve_year(year);
            let importer = DataImporter::from_connection(conn);
            if replace {
                if matches!(kind, ImportKind::Preferences | ImportKind::Workbook) {
                    println!("기존 희망사항 {}건 삭제", importer.clear_preferences(year)?);
                }
                if matches!(kind, ImportKind::Settings | ImportKind::Workbook) {
                    println!("기존 학년설정 {}건 삭제", importer.clear_grade_settings(year)?);
                }
            }
            let reports = match kind {
                ImportKind::Teachers => vec![importer.import_teachers(&file)?],
                ImportKind::Preferences => vec![importer.import_preferences(&file, year)?],
                ImportKind::Settings => vec![importer.import_grade_settings(&file, year)?],
                ImportKind::Workbook => importer.import_workbook(&file, year)?,
            };
            reports.iter().for_each(print_report);
        }

        Commands::Rules { action } => {
            let config = ConfigManager::from_connection(conn);
            match action {
                RulesAction::Show => println!("{}", config.export_rule_set_json()?),
                RulesAction::Set { file } => {
                    let raw = std::fs::read_to_string(&file)
                        .with_context(|| format!("파일 읽기 실패: {}", file.display()))?;
                    let rules = config.import_rule_set_json(&raw)?;
                    println!("규칙 테이블 저장 완료 (순환 정책: {:?})", rules.rotation);
                }
                RulesAction::Reset => {
                    if config.reset_rule_set()? {
                        println!("저장된 규칙 테이블 삭제, 기본값 사용");
                    } else {
                        println!("저장된 규칙 테이블 없음, 이미 기본값 사용 중");
                    }
                    let rules = config.load_rule_set()?;
                    println!("순환 정책: {:?}", rules.rotation);
                }
            }
        }

        Commands::Assign { year, out } => {
            let year = resolve_year(year);
            let api = assignment_api(conn);
            let result = api.run_assignment(year)?;

            println!(
                "{}년도 배정 완료: 배정 {}명, 제외 {}명, 미배정 {}명",
                year,
                result.assignments.len(),
                result.excluded.len(),
                result.unresolved.len()
            );
            for (grade, count) in result.grade_counts() {
                println!("  {}학년: {}명", grade, count);
            }
            for id in &result.unresolved {
                println!("  미배정 교사 id={}", id);
            }

            if let Some(dir) = out {
                let files = ResultExporter::new(&dir)?.export_run(&result)?;
                for f in files {
                    println!("출력: {}", f.display());
                }
            }
        }

        Commands::List { year } => {
            let year = resolve_year(year);
            let rows = assignment_api(conn).list_assignments(year)?;
            if rows.is_empty() {
                println!("{}년도 배정 결과가 없습니다.", year);
            }
            for a in rows {
                println!(
                    "{}\t{}학년\t{}\t{}\t{}",
                    a.teacher_name,
                    a.assigned_grade,
                    a.assignment_type,
                    a.rule_reference.as_deref().unwrap_or("-"),
                    a.description
                );
            }
        }

        Commands::Summary { year } => {
            let year = resolve_year(year);
            let api = assignment_api(conn);

            println!("학년\t필요\t배정");
            for row in api.grade_summary(year)? {
                println!("{}\t{}\t{}", row.grade, row.required_homerooms, row.assigned);
            }
            println!();
            println!("학년\t1지망\t2지망\t3지망");
            for row in api.preference_summary(year)? {
                println!("{}\t{}\t{}\t{}", row.grade, row.first, row.second, row.third);
            }
        }

        Commands::Export { year, out } => {
            let year = resolve_year(year);
            let rows = assignment_api(conn).list_assignments(year)?;
            let exporter = ResultExporter::new(&out)?;
            println!("출력: {}", exporter.export_assignments(year, &rows)?.display());
            println!("출력: {}", exporter.export_grade_counts(year, &rows)?.display());
        }
    }

    Ok(())
}

fn open_database(db_path: &str) -> Result<Arc<Mutex<Connection>>> {
    if let Some(parent) = PathBuf::from(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("디렉터리 생성 실패: {}", parent.display()))?;
        }
    }
    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("데이터베이스 열기 실패: {}", db_path))?;
    init_schema(&conn).context("스키마 초기화 실패")?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn assignment_api(conn: Arc<Mutex<Connection>>) -> AssignmentApi<ConfigManager> {
    let config = Arc::new(ConfigManager::from_connection(conn.clone()));
    AssignmentApi::new(conn, config)
}

/// 연도 미지정 시 내년 (새 학년도 배정)
fn resolve_year(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| chrono::Local::now().year() + 1)
}

fn print_report(report: &ImportReport) {
    println!(
        "[{}] 전체 {}행, 반영 {}행, 문제 {}건",
        report.sheet,
        report.total_rows,
        report.imported,
        report.issues.len()
    );
    for issue in &report.issues {
        println!("  {}", issue);
    }
}
