//! Test data shared by the integration suites

use serde_json::{json, Value};
use shared::{Exam, ExamId, Gender, NewStudent, Student, StudentId};

pub struct TestFixtures;

impl TestFixtures {
    pub const STUDENT_A: &'static str = "a1f0";
    pub const STUDENT_B: &'static str = "b2e9";
    pub const NATIONAL_ID: &'static str = "45112233";
    pub const DUPLICATE_DETAIL: &'static str = "A student with this DNI already exists";

    pub fn student(id: &str, name: &str) -> Student {
        Student {
            id: StudentId::new(id),
            national_id: Self::NATIONAL_ID.to_string(),
            name: name.to_string(),
            email: format!("{id}@school.test"),
            age: 14,
            gender: Gender::Other,
            classroom: "3C".to_string(),
            address: None,
            guardian_name: None,
            guardian_phone: None,
            photo: None,
        }
    }

    pub fn new_student(national_id: &str, name: &str) -> NewStudent {
        NewStudent {
            national_id: national_id.to_string(),
            name: name.to_string(),
            email: "new@school.test".to_string(),
            age: 13,
            gender: Gender::Female,
            classroom: "1A".to_string(),
            address: None,
            guardian_name: Some("Rosa Quispe".to_string()),
            guardian_phone: Some("987654321".to_string()),
            photo: None,
        }
    }

    pub fn exam(id: &str, student_id: &str, subject: &str, score: u8) -> Exam {
        Exam {
            id: ExamId::new(id),
            student_id: StudentId::new(student_id),
            subject: subject.to_string(),
            score,
            exam_date: "2024-05-20T08:30:00".to_string(),
        }
    }

    pub fn student_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "dni": Self::NATIONAL_ID,
            "name": name,
            "email": format!("{id}@school.test"),
            "age": 14,
            "gender": "Otro",
            "classroom": "3C",
            "address": null,
            "guardian_name": null,
            "guardian_phone": null,
            "photo_url": null
        })
    }

    pub fn exam_json(id: &str, student_id: &str, subject: &str, score: f64) -> Value {
        json!({
            "id": id,
            "student_id": student_id,
            "subject": subject,
            "score": score,
            "exam_date": "2024-05-20T08:30:00"
        })
    }

    pub fn envelope(data: Value) -> Value {
        json!({ "data": data, "code": 200, "message": "Success" })
    }
}
