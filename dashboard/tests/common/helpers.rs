//! Helpers for building stores in integration tests
//!
//! `GatedRecordsApi` holds every exam fetch until the test releases it, which
//! lets a test choose the order in which overlapping responses arrive.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use wiremock::MockServer;

use dashboard::{
    ClientStore, DashboardConfig, DashboardError, DashboardResult, HttpRecordsApi, RecordsApi,
};
use shared::{
    Exam, ExamId, ExamUpdatePayload, NewExam, NewStudent, Student, StudentId, StudentPatch,
};

pub struct TestHelpers;

impl TestHelpers {
    /// Store talking HTTP to a local mock server
    pub fn http_store(server: &MockServer) -> ClientStore<HttpRecordsApi> {
        let config = DashboardConfig::default()
            .with_api_url(&format!("{}/api", server.uri()))
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        ClientStore::new(HttpRecordsApi::new(&config).unwrap())
    }

    /// Wait until the gated API has received `count` exam requests.
    pub async fn wait_for_exam_calls(api: &GatedRecordsApi, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while api.exam_calls() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("exam request was never issued");
    }
}

/// Records API whose exam listing blocks on a per-student gate
#[derive(Default)]
pub struct GatedRecordsApi {
    gates: Mutex<HashMap<String, Vec<oneshot::Receiver<Vec<Exam>>>>>,
    exam_calls: AtomicUsize,
}

impl GatedRecordsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a gate for the next exam fetch of `student_id`. Sending on the
    /// returned channel completes that fetch.
    pub fn gate(&self, student_id: &str) -> oneshot::Sender<Vec<Exam>> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(student_id.to_string())
            .or_default()
            .push(rx);
        tx
    }

    pub fn exam_calls(&self) -> usize {
        self.exam_calls.load(Ordering::SeqCst)
    }
}

fn unsupported() -> DashboardError {
    DashboardError::Transport {
        message: "not served by the gated api".to_string(),
    }
}

#[async_trait]
impl RecordsApi for GatedRecordsApi {
    async fn list_students(&self) -> DashboardResult<Vec<Student>> {
        Ok(Vec::new())
    }

    async fn create_student(&self, _student: &NewStudent) -> DashboardResult<Student> {
        Err(unsupported())
    }

    async fn update_student(&self, _id: &StudentId, _patch: &StudentPatch) -> DashboardResult<()> {
        Err(unsupported())
    }

    async fn delete_student(&self, _id: &StudentId) -> DashboardResult<()> {
        Err(unsupported())
    }

    async fn list_exams(&self, student_id: &StudentId) -> DashboardResult<Vec<Exam>> {
        let gate = {
            let mut gates = self.gates.lock().unwrap();
            gates
                .get_mut(student_id.as_str())
                .filter(|queue| !queue.is_empty())
                .map(|queue| queue.remove(0))
        };
        self.exam_calls.fetch_add(1, Ordering::SeqCst);

        match gate {
            Some(rx) => rx.await.map_err(|_| unsupported()),
            None => Err(unsupported()),
        }
    }

    async fn create_exam(&self, _exam: &NewExam) -> DashboardResult<Exam> {
        Err(unsupported())
    }

    async fn update_exam(&self, _id: &ExamId, _payload: &ExamUpdatePayload) -> DashboardResult<()> {
        Err(unsupported())
    }

    async fn delete_exam(&self, _id: &ExamId) -> DashboardResult<()> {
        Err(unsupported())
    }
}
