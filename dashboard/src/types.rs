//! Dashboard-specific data types

use shared::{Exam, Student, StudentId};

/// Mutable client state behind the store
#[derive(Debug, Default)]
pub struct StoreState {
    // Fetched records, in server response order
    pub students: Vec<Student>,
    pub active_student: Option<Student>,
    pub exams: Vec<Exam>,

    // Status
    pub in_flight: usize,
    pub error: Option<String>,
    pub search_term: String,

    // Bumped on every exam fetch and every change of active student
    pub exam_generation: u64,
}

/// Identifies one outstanding exam fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRequestTag {
    pub student_id: StudentId,
    pub generation: u64,
}

/// Point-in-time copy of the store for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub students: Vec<Student>,
    pub active_student: Option<Student>,
    pub exams: Vec<Exam>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub search_term: String,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as started: loading on, previous error cleared.
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.finish();
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn issue_exam_request(&mut self, student_id: &StudentId) -> ExamRequestTag {
        self.exam_generation += 1;
        ExamRequestTag {
            student_id: student_id.clone(),
            generation: self.exam_generation,
        }
    }

    /// A result is current when no newer request or context switch happened
    /// since it was issued and it targets the active student, if any.
    pub fn is_current(&self, tag: &ExamRequestTag) -> bool {
        if tag.generation != self.exam_generation {
            return false;
        }
        match &self.active_student {
            Some(active) => active.id == tag.student_id,
            None => true,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            students: self.students.clone(),
            active_student: self.active_student.clone(),
            exams: self.exams.clone(),
            is_loading: self.is_loading(),
            error: self.error.clone(),
            search_term: self.search_term.clone(),
        }
    }
}
