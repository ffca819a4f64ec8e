//! Derived exam statistics
//!
//! Pure functions over an exam list. Nothing here is cached: the detail view
//! recomputes everything from the store's current exams on each render.

use serde::Serialize;
use shared::{Exam, MAX_SCORE, PASS_THRESHOLD};

/// Bar labels longer than this are shortened and suffixed with `...`.
pub const BAR_LABEL_MAX_CHARS: usize = 10;
/// Radar axis labels are cut to this many characters.
pub const RADAR_LABEL_MAX_CHARS: usize = 8;
/// Only the first exams feed the radar chart.
pub const RADAR_MAX_ENTRIES: usize = 6;
pub const RADAR_MIN_EXAMS: usize = 3;
pub const TREND_MIN_EXAMS: usize = 2;

/// Averages at or above this are shown as good standing.
pub const GOOD_AVERAGE: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassStatus {
    Passed,
    Failed,
}

impl PassStatus {
    pub fn from_score(score: u8) -> Self {
        if score >= PASS_THRESHOLD {
            PassStatus::Passed
        } else {
            PassStatus::Failed
        }
    }
}

/// Colour band of the average badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Good,
    Passing,
    Failing,
}

impl ScoreBand {
    pub fn from_average(average: f64) -> Self {
        if average >= GOOD_AVERAGE {
            ScoreBand::Good
        } else if average >= f64::from(PASS_THRESHOLD) {
            ScoreBand::Passing
        } else {
            ScoreBand::Failing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub full_name: String,
    pub score: u8,
    pub status: PassStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// 1-based position in creation order
    pub index: usize,
    pub subject: String,
    pub score: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub subject: String,
    pub score: u8,
    pub full_mark: u8,
}

/// Scalar statistics for one student's exams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamStats {
    pub total: usize,
    pub passed: usize,
    pub average: f64,
    pub max_score: u8,
    pub pass_percentage: u32,
    pub band: ScoreBand,
}

impl ExamStats {
    pub fn from_exams(exams: &[Exam]) -> Self {
        let average = average(exams);
        Self {
            total: exams.len(),
            passed: passed_count(exams),
            average,
            max_score: max_score(exams),
            pass_percentage: pass_percentage(exams),
            band: ScoreBand::from_average(average),
        }
    }
}

/// Chart projections for one student's exams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamCharts {
    pub bars: Vec<BarEntry>,
    pub trend: Vec<TrendPoint>,
    pub radar: Vec<RadarPoint>,
}

impl ExamCharts {
    pub fn from_exams(exams: &[Exam]) -> Self {
        Self {
            bars: bar_series(exams),
            trend: trend_series(exams),
            radar: radar_series(exams),
        }
    }
}

/// Mean score rounded to one decimal, 0 for no exams.
pub fn average(exams: &[Exam]) -> f64 {
    if exams.is_empty() {
        return 0.0;
    }
    let sum: u32 = exams.iter().map(|e| u32::from(e.score)).sum();
    let mean = f64::from(sum) / exams.len() as f64;
    (mean * 10.0).round() / 10.0
}

pub fn max_score(exams: &[Exam]) -> u8 {
    exams.iter().map(|e| e.score).max().unwrap_or(0)
}

pub fn passed_count(exams: &[Exam]) -> usize {
    exams.iter().filter(|e| e.is_passing()).count()
}

/// Share of passed exams as a whole percentage, rounded half up.
pub fn pass_percentage(exams: &[Exam]) -> u32 {
    if exams.is_empty() {
        return 0;
    }
    let ratio = passed_count(exams) as f64 / exams.len() as f64;
    (ratio * 100.0).round() as u32
}

pub fn bar_series(exams: &[Exam]) -> Vec<BarEntry> {
    exams
        .iter()
        .map(|exam| BarEntry {
            label: truncate_with_ellipsis(&exam.subject, BAR_LABEL_MAX_CHARS),
            full_name: exam.subject.clone(),
            score: exam.score,
            status: PassStatus::from_score(exam.score),
        })
        .collect()
}

/// Scores in list order. Empty when there are too few exams to draw a line.
pub fn trend_series(exams: &[Exam]) -> Vec<TrendPoint> {
    if exams.len() < TREND_MIN_EXAMS {
        return Vec::new();
    }
    exams
        .iter()
        .enumerate()
        .map(|(i, exam)| TrendPoint {
            index: i + 1,
            subject: exam.subject.clone(),
            score: exam.score,
            label: format!("Exam {}", i + 1),
        })
        .collect()
}

/// The first six exams, once at least three exist overall.
pub fn radar_series(exams: &[Exam]) -> Vec<RadarPoint> {
    if exams.len() < RADAR_MIN_EXAMS {
        return Vec::new();
    }
    exams
        .iter()
        .take(RADAR_MAX_ENTRIES)
        .map(|exam| RadarPoint {
            subject: truncate_chars(&exam.subject, RADAR_LABEL_MAX_CHARS),
            score: exam.score,
            full_mark: MAX_SCORE,
        })
        .collect()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", truncate_chars(text, max_chars))
    } else {
        text.to_string()
    }
}
