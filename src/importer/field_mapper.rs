// ==========================================
// 학년 담임 배정 시스템 - 필드 매퍼
// ==========================================
// 책임: 원본 열 이름(한글/영문 별칭) → 도메인 필드 + 형 변환
// 원칙: 잘못된 값은 해당 값만 건너뛰고 ImportIssue 기록 (가져오기 중단 없음)
// ==========================================

use crate::domain::{is_valid_grade, Grade, GradeHistoryEntry, GradeSetting, Preference, Teacher};
use crate::importer::error::ImportIssue;
use crate::importer::file_parser::RawRecord;
use serde::Deserialize;

pub const SHEET_TEACHERS: &str = "교사정보";
pub const SHEET_PREFERENCES: &str = "희망사항";
pub const SHEET_GRADE_SETTINGS: &str = "학년설정";

/// 열 이름 별칭 (앞쪽 우선)
fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        "이름" => &["이름", "name", "교사명"],
        "성별" => &["성별", "gender"],
        "임용년도" => &["임용년도", "hire_year", "임용 연도"],
        "본교입사년도" => &["본교입사년도", "school_join_year", "본교 입사년도"],
        "현재 학년" => &["현재 학년", "current_grade", "현재학년"],
        "현재 반" => &["현재 반", "current_class", "현재반"],
        "현재 담임 여부" => &["현재 담임 여부", "is_homeroom_current"],
        "교과전담 여부" => &["교과전담 여부", "is_subject_teacher"],
        "역할" => &["역할", "duty_role"],
        "담당 교과" => &["담당 교과", "subject"],
        "특수 조건" => &["특수 조건", "special_conditions", "특이사항"],
        "본교 담임 이력" => &["본교 담임 이력", "grade_history"],
        "교사 이름" => &["교사 이름", "teacher_name", "이름", "name"],
        "1지망" => &["1지망", "first_choice_grade"],
        "2지망" => &["2지망", "second_choice_grade"],
        "3지망" => &["3지망", "third_choice_grade"],
        "학년부장" => &["학년부장", "wants_grade_head"],
        "교과전담" => &["교과전담", "wants_subject_teacher"],
        "업무부장" => &["업무부장", "wants_duty_head"],
        "비고" => &["비고", "comment"],
        "학년" => &["학년", "grade"],
        "학급 수" => &["학급 수", "class_count", "학급수"],
        "필요 담임 수" => &["필요 담임 수", "required_homerooms"],
        "필요 교과전담 수" => &["필요 교과전담 수", "required_subject_teachers"],
        "필요 업무부장 수" => &["필요 업무부장 수", "required_duty_heads"],
        _ => &[],
    }
}

/// JSON 형식 이력 항목
#[derive(Deserialize)]
struct HistoryJson {
    year: i32,
    grade: i64,
}

/// 이름 기준으로 교사와 연결될 희망 행
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPreference {
    pub teacher_name: String,
    pub preference: Preference,
}

pub struct FieldMapper;

impl FieldMapper {
    // ==========================================
    // 행 매핑
    // ==========================================

    /// 교사정보 행 → Teacher (이름 없으면 None)
    pub fn map_teacher(
        &self,
        row: &RawRecord,
        row_number: usize,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<Teacher> {
        let sheet = SHEET_TEACHERS;
        let name = self.get_string(row, "이름")?;

        let mut teacher = Teacher::new(0, name);
        teacher.gender = self.get_string(row, "성별");
        teacher.hire_year = self.parse_i32(row, "임용년도", sheet, row_number, issues);
        teacher.school_join_year = self.parse_i32(row, "본교입사년도", sheet, row_number, issues);
        teacher.current_grade = self.parse_grade(row, "현재 학년", sheet, row_number, issues);
        teacher.current_class = self.get_string(row, "현재 반");
        teacher.is_homeroom_current = self.parse_bool(row, "현재 담임 여부");
        teacher.is_subject_teacher = self.parse_bool(row, "교과전담 여부");
        teacher.duty_role = self.get_string(row, "역할");
        teacher.subject = self.get_string(row, "담당 교과");
        teacher.special_conditions = self.get_string(row, "특수 조건");

        if let Some(raw) = self.get_string(row, "본교 담임 이력") {
            match parse_history(&raw) {
                Some(history) => teacher.grade_history = history,
                None => issues.push(ImportIssue::new(
                    sheet,
                    row_number,
                    format!("본교 담임 이력 형식 오류, 무시: {}", raw),
                )),
            }
        }

        Some(teacher)
    }

    /// 희망사항 행 → 이름 + Preference (중복/범위 오류는 행 전체 제외)
    pub fn map_preference(
        &self,
        row: &RawRecord,
        row_number: usize,
        year: i32,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<NamedPreference> {
        let sheet = SHEET_PREFERENCES;
        let teacher_name = self.get_string(row, "교사 이름")?;

        let mut pref = Preference::new(0, year).with_choices(
            self.parse_grade(row, "1지망", sheet, row_number, issues),
            self.parse_grade(row, "2지망", sheet, row_number, issues),
            self.parse_grade(row, "3지망", sheet, row_number, issues),
        );
        pref.wants_grade_head = self.parse_bool(row, "학년부장");
        pref.wants_subject_teacher = self.parse_bool(row, "교과전담");
        pref.wants_duty_head = self.parse_bool(row, "업무부장");
        pref.comment = self.get_string(row, "비고");

        if let Err(e) = pref.validate() {
            issues.push(ImportIssue::new(
                sheet,
                row_number,
                format!("{}: {}", teacher_name, e),
            ));
            return None;
        }

        Some(NamedPreference {
            teacher_name,
            preference: pref,
        })
    }

    /// 학년설정 행 → GradeSetting (학년 없음/범위 밖이면 None)
    pub fn map_grade_setting(
        &self,
        row: &RawRecord,
        row_number: usize,
        year: i32,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<GradeSetting> {
        let sheet = SHEET_GRADE_SETTINGS;
        let grade = self.parse_grade(row, "학년", sheet, row_number, issues)?;

        let mut count = |key: &str| self.parse_count(row, key, sheet, row_number, issues).unwrap_or(0);
        Some(GradeSetting {
            year,
            grade,
            class_count: count("학급 수"),
            required_homerooms: count("필요 담임 수"),
            required_subject_teachers: count("필요 교과전담 수"),
            required_duty_heads: count("필요 업무부장 수"),
        })
    }

    // ==========================================
    // 값 변환
    // ==========================================

    /// 별칭 순서대로 비어 있지 않은 첫 값
    pub fn get_string(&self, row: &RawRecord, key: &str) -> Option<String> {
        let names = aliases(key);
        let fallback = [key];
        let candidates: &[&str] = if names.is_empty() { &fallback } else { names };

        candidates
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_number(&self, value: &str) -> Option<i64> {
        // "3학년", "3.0" 같은 입력 허용
        let trimmed = value.trim().trim_end_matches("학년").trim();
        trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
    }

    fn parse_i32(
        &self,
        row: &RawRecord,
        key: &str,
        sheet: &str,
        row_number: usize,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<i32> {
        let value = self.get_string(row, key)?;
        match self.parse_number(&value).and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                issues.push(ImportIssue::new(
                    sheet,
                    row_number,
                    format!("{} 정수 변환 실패, 무시: {}", key, value),
                ));
                None
            }
        }
    }

    fn parse_count(
        &self,
        row: &RawRecord,
        key: &str,
        sheet: &str,
        row_number: usize,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<u32> {
        let value = self.get_string(row, key)?;
        match self.parse_number(&value).and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                issues.push(ImportIssue::new(
                    sheet,
                    row_number,
                    format!("{} 값 오류 (0 이상 정수), 0으로 처리: {}", key, value),
                ));
                None
            }
        }
    }

    pub fn parse_grade(
        &self,
        row: &RawRecord,
        key: &str,
        sheet: &str,
        row_number: usize,
        issues: &mut Vec<ImportIssue>,
    ) -> Option<Grade> {
        let value = self.get_string(row, key)?;
        match self.parse_number(&value).filter(|n| is_valid_grade(*n)) {
            Some(n) => Some(n as Grade),
            None => {
                issues.push(ImportIssue::new(
                    sheet,
                    row_number,
                    format!("{} 학년 값 오류 (1~6), 무시: {}", key, value),
                ));
                None
            }
        }
    }

    /// 참/거짓 해석 (빈 값과 알 수 없는 값은 false)
    pub fn parse_bool(&self, row: &RawRecord, key: &str) -> bool {
        self.get_string(row, key)
            .map(|v| parse_bool_text(&v))
            .unwrap_or(false)
    }
}

/// true/1/예/yes/o/○ 또는 역할 이름 자체가 적혀 있으면 true
pub fn parse_bool_text(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    matches!(
        lowered.as_str(),
        "true" | "1" | "y" | "yes" | "o" | "○" | "예" | "네" | "v" | "✓"
    ) || ["담임", "전담", "부장"].iter().any(|w| lowered.contains(w))
}

/// "2023:1,2024:2" 또는 JSON 배열 [{"year":2023,"grade":1}]
///
/// 형식 오류는 None, 범위 밖 학년 항목은 건너뜀.
pub fn parse_history(raw: &str) -> Option<Vec<GradeHistoryEntry>> {
    let trimmed = raw.trim();
    let pairs: Vec<(i32, i64)> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<HistoryJson>>(trimmed)
            .ok()?
            .into_iter()
            .map(|h| (h.year, h.grade))
            .collect()
    } else {
        let mut pairs = Vec::new();
        for pair in trimmed.split(',').filter(|p| p.contains(':')) {
            let (year, grade) = pair.split_once(':')?;
            pairs.push((year.trim().parse().ok()?, grade.trim().parse().ok()?));
        }
        pairs
    };

    Some(
        pairs
            .into_iter()
            .filter(|(_, g)| is_valid_grade(*g))
            .map(|(year, grade)| GradeHistoryEntry {
                year,
                grade: grade as Grade,
            })
            .collect(),
    )
}
