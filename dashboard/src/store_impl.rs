//! Client store with dependency injection
//!
//! The store is the single source of truth for fetched records and the only
//! component that talks to the records API. Every mutation goes through one
//! of its operations, which call the API and then reconcile local state.
//!
//! Operations never return errors. A failure is turned into one readable
//! message stored in the state (replacing any previous one), and mutating
//! operations report success as a `bool` so a front end can decide whether to
//! close its form.
//!
//! The state lock is never held across a network call. Exam fetches are
//! tagged with the requested student and a generation number; a response
//! that arrives after a newer fetch or a change of active student is dropped.

use tracing::debug;

use shared::logging::{log_failure, log_success};
use shared::validation::{validate_national_id, validate_score, validate_subject};
use shared::{
    Exam, ExamId, ExamUpdate, ExamUpdatePayload, NewExam, NewStudent, Student, StudentId,
    StudentPatch, ValidationError,
};

use crate::core::roster::filter_students;
use crate::core::stats::{ExamCharts, ExamStats};
use crate::state::{create_shared_state, SharedStoreState};
use crate::traits::RecordsApi;
use crate::types::{StoreSnapshot, StoreState};

pub const FETCH_STUDENTS_FAILED: &str = "Failed to load students";
pub const CREATE_STUDENT_FAILED: &str = "Failed to create student";
pub const UPDATE_STUDENT_FAILED: &str = "Failed to update student";
pub const DELETE_STUDENT_FAILED: &str = "Failed to delete student";
pub const FETCH_EXAMS_FAILED: &str = "Failed to load exams";
pub const CREATE_EXAM_FAILED: &str = "Failed to record exam";
pub const UPDATE_EXAM_FAILED: &str = "Failed to update exam";
pub const DELETE_EXAM_FAILED: &str = "Failed to delete exam";

/// Client store over an injected records API
pub struct ClientStore<A>
where
    A: RecordsApi,
{
    pub state: SharedStoreState,
    api: A,
}

impl<A> ClientStore<A>
where
    A: RecordsApi,
{
    /// Create an empty store
    pub fn new(api: A) -> Self {
        Self {
            state: create_shared_state(StoreState::new()),
            api,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ---- students ----

    /// Replace the local list with the server's full collection.
    pub async fn fetch_students(&self) {
        debug!("Fetching students");
        self.state.write().await.begin();

        let result = self.api.list_students().await;

        let mut state = self.state.write().await;
        match result {
            Ok(students) => {
                log_success("fetch_students", &format!("{} students", students.len()));
                state.students = students;
                state.error = None;
                state.finish();
            }
            Err(e) => {
                log_failure("fetch_students", &e);
                state.fail(FETCH_STUDENTS_FAILED);
            }
        }
    }

    /// Create a student and put the stored record at the front of the list.
    pub async fn add_student(&self, student: NewStudent) -> bool {
        if let Err(e) = validate_national_id(&student.national_id) {
            return self.reject("add_student", e).await;
        }

        debug!(national_id = %student.national_id, "Creating student");
        self.state.write().await.begin();

        let result = self.api.create_student(&student).await;

        let mut state = self.state.write().await;
        match result {
            Ok(created) => {
                log_success("add_student", &format!("created {}", created.id));
                state.students.insert(0, created);
                state.finish();
                true
            }
            Err(e) => {
                log_failure("add_student", &e);
                let message = e.server_detail().unwrap_or(CREATE_STUDENT_FAILED).to_string();
                state.fail(message);
                false
            }
        }
    }

    /// Send a partial update and merge it into the local record in place.
    pub async fn update_student(&self, id: &StudentId, patch: StudentPatch) -> bool {
        if let Some(national_id) = &patch.national_id {
            if let Err(e) = validate_national_id(national_id) {
                return self.reject("update_student", e).await;
            }
        }

        debug!(student_id = %id, "Updating student");
        self.state.write().await.begin();

        let result = self.api.update_student(id, &patch).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if let Some(student) = state.students.iter_mut().find(|s| &s.id == id) {
                    student.apply_patch(&patch);
                }
                if let Some(active) = state.active_student.as_mut().filter(|s| &s.id == id) {
                    active.apply_patch(&patch);
                }
                log_success("update_student", &format!("updated {id}"));
                state.finish();
                true
            }
            Err(e) => {
                log_failure("update_student", &e);
                let message = e.server_detail().unwrap_or(UPDATE_STUDENT_FAILED).to_string();
                state.fail(message);
                false
            }
        }
    }

    /// Delete a student remotely and drop it from the local list.
    ///
    /// The server removes the student's exams with it, so an active view of
    /// that student is closed as well.
    pub async fn delete_student(&self, id: &StudentId) -> bool {
        debug!(student_id = %id, "Deleting student");
        self.state.write().await.begin();

        let result = self.api.delete_student(id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                state.students.retain(|s| &s.id != id);
                if state.active_student.as_ref().is_some_and(|s| &s.id == id) {
                    state.active_student = None;
                    state.exams.clear();
                    state.exam_generation += 1;
                }
                log_success("delete_student", &format!("deleted {id}"));
                state.finish();
                true
            }
            Err(e) => {
                log_failure("delete_student", &e);
                state.fail(DELETE_STUDENT_FAILED);
                false
            }
        }
    }

    /// Switch the detail view to another student (or none).
    ///
    /// Clears the exam list and the error, and invalidates any exam fetch
    /// still in flight.
    pub async fn set_active_student(&self, student: Option<Student>) {
        let mut state = self.state.write().await;
        debug!(student_id = ?student.as_ref().map(|s| s.id.to_string()), "Setting active student");
        state.active_student = student;
        state.exams.clear();
        state.error = None;
        state.exam_generation += 1;
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.write().await.search_term = term.into();
    }

    /// Detail-view entry: make sure students are loaded, activate the one
    /// with `id` if it exists, then load its exams.
    pub async fn open_student(&self, id: &StudentId) -> Option<Student> {
        if self.state.read().await.students.is_empty() {
            self.fetch_students().await;
        }

        let student = self.find_student(id).await;
        if let Some(student) = &student {
            self.set_active_student(Some(student.clone())).await;
        }
        self.fetch_student_exams(id).await;
        student
    }

    // ---- exams ----

    /// Load the exams of `student_id`, replacing the local exam list.
    pub async fn fetch_student_exams(&self, student_id: &StudentId) {
        let tag = {
            let mut state = self.state.write().await;
            state.begin();
            state.issue_exam_request(student_id)
        };
        debug!(student_id = %student_id, generation = tag.generation, "Fetching exams");

        let result = self.api.list_exams(student_id).await;

        let mut state = self.state.write().await;
        if !state.is_current(&tag) {
            debug!(
                student_id = %student_id,
                generation = tag.generation,
                latest = state.exam_generation,
                "Discarding stale exam response"
            );
            state.finish();
            return;
        }

        match result {
            Ok(exams) => {
                log_success(
                    "fetch_student_exams",
                    &format!("{} exams for {student_id}", exams.len()),
                );
                state.exams = exams;
                state.finish();
            }
            Err(e) => {
                log_failure("fetch_student_exams", &e);
                state.exams.clear();
                state.fail(FETCH_EXAMS_FAILED);
            }
        }
    }

    /// Record an exam and append it to the list.
    pub async fn add_exam(&self, exam: NewExam) -> bool {
        if let Err(e) = validate_subject(&exam.subject).and_then(|_| validate_score(exam.score)) {
            return self.reject("add_exam", e).await;
        }

        debug!(student_id = %exam.student_id, subject = %exam.subject, "Recording exam");
        self.state.write().await.begin();

        let result = self.api.create_exam(&exam).await;

        let mut state = self.state.write().await;
        match result {
            Ok(created) => {
                let belongs_to_view = state
                    .active_student
                    .as_ref()
                    .map_or(true, |s| s.id == created.student_id);
                if belongs_to_view {
                    state.exams.push(created);
                } else {
                    debug!(
                        exam_id = %created.id,
                        "Recorded exam is not for the active student; list left as is"
                    );
                }
                log_success("add_exam", &format!("recorded for {}", exam.student_id));
                state.finish();
                true
            }
            Err(e) => {
                log_failure("add_exam", &e);
                state.fail(CREATE_EXAM_FAILED);
                false
            }
        }
    }

    /// Change subject and score of an exam, keeping its other fields.
    pub async fn update_exam(&self, id: &ExamId, update: ExamUpdate) -> bool {
        if let Err(e) =
            validate_subject(&update.subject).and_then(|_| validate_score(update.score))
        {
            return self.reject("update_exam", e).await;
        }

        let owner = {
            let mut state = self.state.write().await;
            state.begin();
            owner_of(&state, id)
        };
        debug!(exam_id = %id, "Updating exam");

        let payload = ExamUpdatePayload::new(&update, owner);
        let result = self.api.update_exam(id, &payload).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                if let Some(exam) = state.exams.iter_mut().find(|e| &e.id == id) {
                    exam.apply_update(&update);
                }
                log_success("update_exam", &format!("updated {id}"));
                state.finish();
                true
            }
            Err(e) => {
                log_failure("update_exam", &e);
                state.fail(UPDATE_EXAM_FAILED);
                false
            }
        }
    }

    pub async fn delete_exam(&self, id: &ExamId) -> bool {
        debug!(exam_id = %id, "Deleting exam");
        self.state.write().await.begin();

        let result = self.api.delete_exam(id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                state.exams.retain(|e| &e.id != id);
                log_success("delete_exam", &format!("deleted {id}"));
                state.finish();
                true
            }
            Err(e) => {
                log_failure("delete_exam", &e);
                state.fail(DELETE_EXAM_FAILED);
                false
            }
        }
    }

    // ---- reads ----

    pub async fn students(&self) -> Vec<Student> {
        self.state.read().await.students.clone()
    }

    /// Students matching the current search term
    pub async fn filtered_students(&self) -> Vec<Student> {
        let state = self.state.read().await;
        filter_students(&state.students, &state.search_term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn find_student(&self, id: &StudentId) -> Option<Student> {
        self.state
            .read()
            .await
            .students
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub async fn active_student(&self) -> Option<Student> {
        self.state.read().await.active_student.clone()
    }

    pub async fn exams(&self) -> Vec<Exam> {
        self.state.read().await.exams.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn search_term(&self) -> String {
        self.state.read().await.search_term.clone()
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn exam_stats(&self) -> ExamStats {
        ExamStats::from_exams(&self.state.read().await.exams)
    }

    pub async fn exam_charts(&self) -> ExamCharts {
        ExamCharts::from_exams(&self.state.read().await.exams)
    }

    /// Refuse an operation that failed a pre-submission check.
    async fn reject(&self, operation: &str, error: ValidationError) -> bool {
        log_failure(operation, &error);
        self.state.write().await.error = Some(error.to_string());
        false
    }
}

/// Owner id sent along with an exam update. The API ignores it, but its
/// request schema requires one.
fn owner_of(state: &StoreState, exam_id: &ExamId) -> StudentId {
    state
        .exams
        .iter()
        .find(|e| &e.id == exam_id)
        .map(|e| e.student_id.clone())
        .or_else(|| state.active_student.as_ref().map(|s| s.id.clone()))
        .unwrap_or_else(|| StudentId::new(""))
}
