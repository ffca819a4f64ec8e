//! Test fixtures for dashboard service tests

use serde_json::{json, Value};
use shared::{Exam, ExamId, Gender, NewExam, NewStudent, Student, StudentId};

pub fn exam_date(day: u32) -> String {
    format!("2024-03-{day:02}T10:00:00")
}

pub fn create_test_student(id: &str, name: &str) -> Student {
    Student {
        id: StudentId::new(id),
        national_id: "70203040".to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        age: 16,
        gender: Gender::Male,
        classroom: "5A".to_string(),
        address: Some("Av. Pedro Ruiz".to_string()),
        guardian_name: Some("Maria Abad".to_string()),
        guardian_phone: Some("922041633".to_string()),
        photo: None,
    }
}

pub fn create_test_new_student(national_id: &str) -> NewStudent {
    NewStudent {
        national_id: national_id.to_string(),
        name: "Lucia Fernandez".to_string(),
        email: "lucia@example.com".to_string(),
        age: 15,
        gender: Gender::Female,
        classroom: "4B".to_string(),
        address: None,
        guardian_name: None,
        guardian_phone: None,
        photo: None,
    }
}

pub fn create_test_exam(id: &str, student_id: &str, subject: &str, score: u8) -> Exam {
    Exam {
        id: ExamId::new(id),
        student_id: StudentId::new(student_id),
        subject: subject.to_string(),
        score,
        exam_date: exam_date(1),
    }
}

pub fn create_test_new_exam(student_id: &str, subject: &str, score: u8) -> NewExam {
    NewExam {
        student_id: StudentId::new(student_id),
        subject: subject.to_string(),
        score,
    }
}

/// Student as the API serializes it
pub fn student_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "dni": "70203040",
        "name": name,
        "email": format!("{id}@example.com"),
        "age": 16,
        "gender": "M",
        "classroom": "5A",
        "address": "Av. Pedro Ruiz",
        "guardian_name": "Maria Abad",
        "guardian_phone": "922041633",
        "photo_url": null
    })
}

/// Exam as the API serializes it (scores are floats upstream)
pub fn exam_json(id: &str, student_id: &str, subject: &str, score: f64) -> Value {
    json!({
        "id": id,
        "student_id": student_id,
        "subject": subject,
        "score": score,
        "exam_date": "2024-03-01T10:00:00.000000"
    })
}

pub fn envelope(data: Value) -> Value {
    json!({ "data": data, "code": 200, "message": "ok" })
}
