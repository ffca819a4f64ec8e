//! Service trait definitions for dependency injection
//!
//! The records API is the only I/O the store performs; abstracting it here
//! lets tests drive the store against a mock.

use async_trait::async_trait;

use crate::error::DashboardResult;
use shared::{
    Exam, ExamId, ExamUpdatePayload, NewExam, NewStudent, Student, StudentId, StudentPatch,
};

/// REST collaborator holding students and exams
#[mockall::automock]
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `GET /students`
    async fn list_students(&self) -> DashboardResult<Vec<Student>>;

    /// `POST /students`, returns the stored record with its assigned id
    async fn create_student(&self, student: &NewStudent) -> DashboardResult<Student>;

    /// `PUT /students/:id`
    async fn update_student(&self, id: &StudentId, patch: &StudentPatch) -> DashboardResult<()>;

    /// `DELETE /students/:id`
    async fn delete_student(&self, id: &StudentId) -> DashboardResult<()>;

    /// `GET /exams/:studentId`
    async fn list_exams(&self, student_id: &StudentId) -> DashboardResult<Vec<Exam>>;

    /// `POST /exams`
    async fn create_exam(&self, exam: &NewExam) -> DashboardResult<Exam>;

    /// `PUT /exams/:id`
    async fn update_exam(&self, id: &ExamId, payload: &ExamUpdatePayload) -> DashboardResult<()>;

    /// `DELETE /exams/:id`
    async fn delete_exam(&self, id: &ExamId) -> DashboardResult<()>;
}
