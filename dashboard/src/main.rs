//! Dashboard binary entry point
//!
//! Terminal front end over the client store: lists students, shows one
//! student's exams with statistics, and runs the create/update/delete forms.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};

use dashboard::core::roster::{initials, paginate};
use dashboard::core::stats::{ExamCharts, ExamStats, PassStatus, ScoreBand};
use dashboard::{ClientStore, DashboardConfig, HttpRecordsApi};
use shared::validation::{digits_only, encode_photo, GUARDIAN_PHONE_MAX_DIGITS};
use shared::{ExamForm, ExamId, Student, StudentForm, StudentId};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Academic records dashboard")]
struct Args {
    /// Records API base URL (overrides DASHBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in milliseconds (overrides DASHBOARD_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level for the dashboard crates (overrides DASHBOARD_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List students, optionally filtered by name or national ID
    Students {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Show a student's exams, statistics and chart data
    Show { student_id: String },
    /// Enrol a new student
    AddStudent(StudentFields),
    /// Edit an existing student; omitted fields keep their current value
    UpdateStudent {
        student_id: String,
        #[command(flatten)]
        fields: StudentFields,
    },
    /// Remove a student (and, server-side, their exams)
    DeleteStudent { student_id: String },
    /// Record an exam score for a student
    AddExam {
        student_id: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        score: String,
    },
    /// Change subject and score of an exam
    UpdateExam {
        student_id: String,
        exam_id: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        score: String,
    },
    /// Delete an exam
    DeleteExam { student_id: String, exam_id: String },
}

#[derive(ClapArgs, Default)]
struct StudentFields {
    #[arg(long)]
    national_id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    age: Option<String>,
    /// M, F or Otro
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    classroom: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    guardian_name: Option<String>,
    #[arg(long)]
    guardian_phone: Option<String>,
    /// Image file to embed as the student photo
    #[arg(long)]
    photo: Option<PathBuf>,
}

impl StudentFields {
    /// Overlay the given flags on a form, the way the edit dialog is
    /// pre-filled from the stored record.
    fn apply_to(&self, form: &mut StudentForm) -> anyhow::Result<()> {
        let overlay = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        overlay(&mut form.national_id, &self.national_id);
        overlay(&mut form.name, &self.name);
        overlay(&mut form.email, &self.email);
        overlay(&mut form.age, &self.age);
        overlay(&mut form.gender, &self.gender);
        overlay(&mut form.classroom, &self.classroom);
        overlay(&mut form.address, &self.address);
        overlay(&mut form.guardian_name, &self.guardian_name);

        if let Some(phone) = &self.guardian_phone {
            form.guardian_phone =
                digits_only(phone, GUARDIAN_PHONE_MAX_DIGITS).ok_or_else(|| {
                    anyhow!("Guardian phone must have at most {GUARDIAN_PHONE_MAX_DIGITS} digits")
                })?;
        }
        if let Some(path) = &self.photo {
            form.photo = load_photo(path)?;
        }
        Ok(())
    }
}

fn form_from_student(student: &Student) -> StudentForm {
    StudentForm {
        national_id: student.national_id.clone(),
        name: student.name.clone(),
        email: student.email.clone(),
        age: student.age.to_string(),
        gender: student.gender.code().to_string(),
        classroom: student.classroom.clone(),
        address: student.address.clone().unwrap_or_default(),
        guardian_name: student.guardian_name.clone().unwrap_or_default(),
        guardian_phone: student.guardian_phone.clone().unwrap_or_default(),
        photo: student.photo.clone().unwrap_or_default(),
    }
}

fn load_photo(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read photo {}", path.display()))?;
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(encode_photo(&bytes, mime)?)
}

fn build_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(timeout) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout));
    }
    if let Some(level) = &args.log_level {
        config = config.with_log_level(level.clone());
    }
    Ok(config)
}

/// Turn a failed store operation into the process error.
async fn ensure(store: &ClientStore<HttpRecordsApi>, ok: bool) -> anyhow::Result<()> {
    if ok {
        return Ok(());
    }
    let message = store.error().await.unwrap_or_else(|| "Operation failed".to_string());
    bail!(message)
}

async fn ensure_no_error(store: &ClientStore<HttpRecordsApi>) -> anyhow::Result<()> {
    match store.error().await {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

fn print_students(students: &[Student], page: usize, per_page: usize) {
    let page = paginate(students, page, per_page);
    if page.total_items == 0 {
        println!("No students found");
        return;
    }
    println!(
        "{:<4} {:<26} {:<10} {:<30} {:>3}  {:<8} {:<20}",
        "", "ID", "DNI", "NAME", "AGE", "CLASS", "GUARDIAN"
    );
    for student in page.items {
        let guardian = match (&student.guardian_name, &student.guardian_phone) {
            (Some(name), Some(phone)) => format!("{name} ({phone})"),
            (Some(name), None) => name.clone(),
            _ => "-".to_string(),
        };
        println!(
            "{:<4} {:<26} {:<10} {:<30} {:>3}  {:<8} {:<20}",
            initials(&student.name),
            student.id,
            student.national_id,
            student.name,
            student.age,
            student.classroom,
            guardian
        );
    }
    println!(
        "Showing {} to {} of {} students (page {} of {})",
        page.first, page.last, page.total_items, page.number, page.total_pages
    );
}

fn print_exam_view(
    student: Option<&Student>,
    stats: &ExamStats,
    charts: &ExamCharts,
    exams: &[shared::Exam],
) {
    if let Some(student) = student {
        println!(
            "{} [{}]  {}  {}",
            student.name,
            initials(&student.name),
            student.classroom,
            student.email
        );
        println!("Address: {}", student.address.as_deref().unwrap_or("-"));
    }

    let band = match stats.band {
        ScoreBand::Good => "good",
        ScoreBand::Passing => "passing",
        ScoreBand::Failing => "failing",
    };
    println!(
        "Average: {:.1} ({band})  Max: {}  Passed: {}%  Exams: {}",
        stats.average, stats.max_score, stats.pass_percentage, stats.total
    );

    if exams.is_empty() {
        println!("No exams recorded");
        return;
    }

    println!();
    println!("{:<26} {:<24} {:>5}  {:<6} {:<20}", "EXAM ID", "SUBJECT", "SCORE", "STATUS", "DATE");
    for exam in exams {
        let status = match PassStatus::from_score(exam.score) {
            PassStatus::Passed => "pass",
            PassStatus::Failed => "fail",
        };
        let date = exam
            .exam_timestamp()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| exam.exam_date.clone());
        println!(
            "{:<26} {:<24} {:>5}  {:<6} {:<20}",
            exam.id,
            exam.subject,
            exam.score,
            status,
            date
        );
    }

    println!();
    println!("Scores by subject:");
    for bar in &charts.bars {
        println!("  {:<13} {:<20} {}", bar.label, "#".repeat(usize::from(bar.score)), bar.score);
    }
    if !charts.trend.is_empty() {
        let trend: Vec<String> = charts
            .trend
            .iter()
            .map(|p| format!("{}:{}", p.index, p.score))
            .collect();
        println!("Trend: {}", trend.join("  "));
    }
    if !charts.radar.is_empty() {
        let radar: Vec<String> = charts
            .radar
            .iter()
            .map(|p| format!("{} {}/{}", p.subject, p.score, p.full_mark))
            .collect();
        println!("Comparison: {}", radar.join(", "));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    shared::logging::init_tracing_with_level(Some(&config.log_level));

    tracing::debug!(api = %config.api_base_url, "Starting dashboard");

    let api = HttpRecordsApi::new(&config)?;
    let store = ClientStore::new(api);

    match args.command {
        Command::Students { search, page, per_page } => {
            store.fetch_students().await;
            ensure_no_error(&store).await?;
            if let Some(term) = search {
                store.set_search_term(term).await;
            }
            let students = store.filtered_students().await;
            print_students(&students, page, per_page);
        }
        Command::Show { student_id } => {
            let id = StudentId::new(student_id);
            let student = store.open_student(&id).await;
            ensure_no_error(&store).await?;
            let exams = store.exams().await;
            let stats = store.exam_stats().await;
            let charts = store.exam_charts().await;
            print_exam_view(student.as_ref(), &stats, &charts, &exams);
        }
        Command::AddStudent(fields) => {
            let mut form = StudentForm::default();
            fields.apply_to(&mut form)?;
            let student = form.to_new_student()?;
            let ok = store.add_student(student).await;
            ensure(&store, ok).await?;
            if let Some(created) = store.students().await.first() {
                println!("Created student {} ({})", created.name, created.id);
            }
        }
        Command::UpdateStudent { student_id, fields } => {
            let id = StudentId::new(student_id);
            store.fetch_students().await;
            ensure_no_error(&store).await?;
            let current = store
                .find_student(&id)
                .await
                .ok_or_else(|| anyhow!("Student {id} not found"))?;

            let mut form = form_from_student(&current);
            fields.apply_to(&mut form)?;
            let ok = store.update_student(&id, form.to_patch()?).await;
            ensure(&store, ok).await?;
            println!("Updated student {id}");
        }
        Command::DeleteStudent { student_id } => {
            let id = StudentId::new(student_id);
            let ok = store.delete_student(&id).await;
            ensure(&store, ok).await?;
            println!("Deleted student {id}");
        }
        Command::AddExam { student_id, subject, score } => {
            let id = StudentId::new(student_id);
            store.open_student(&id).await;
            let exam = ExamForm { subject, score }.to_new_exam(&id)?;
            let ok = store.add_exam(exam).await;
            ensure(&store, ok).await?;
            let stats = store.exam_stats().await;
            println!("Recorded exam; average now {:.1} over {} exams", stats.average, stats.total);
        }
        Command::UpdateExam { student_id, exam_id, subject, score } => {
            store.open_student(&StudentId::new(student_id)).await;
            let update = ExamForm { subject, score }.to_update()?;
            let ok = store.update_exam(&ExamId::new(exam_id.clone()), update).await;
            ensure(&store, ok).await?;
            println!("Updated exam {exam_id}");
        }
        Command::DeleteExam { student_id, exam_id } => {
            store.open_student(&StudentId::new(student_id)).await;
            let ok = store.delete_exam(&ExamId::new(exam_id.clone())).await;
            ensure(&store, ok).await?;
            println!("Deleted exam {exam_id}");
        }
    }

    Ok(())
}
