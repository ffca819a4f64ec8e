//! Core record types exchanged with the records API

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Lowest score that counts as a pass.
pub const PASS_THRESHOLD: u8 = 11;

/// Highest score an exam can carry.
pub const MAX_SCORE: u8 = 20;

/// Server-assigned student identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StudentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Server-assigned exam identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(String);

impl ExamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "Otro")]
    Other,
}

impl Gender {
    /// Wire code used by the API
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "Otro",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "otro" | "other" => Ok(Gender::Other),
            _ => Err(ValidationError::InvalidGender { value: s.to_string() }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// A student record as returned by the API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(rename = "dni")]
    pub national_id: String,
    pub name: String,
    pub email: String,
    pub age: u8,
    pub gender: Gender,
    pub classroom: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(rename = "photo_url", default)]
    pub photo: Option<String>,
}

impl Student {
    /// Merge the fields present in `patch` into this record.
    pub fn apply_patch(&mut self, patch: &StudentPatch) {
        if let Some(national_id) = &patch.national_id {
            self.national_id = national_id.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(classroom) = &patch.classroom {
            self.classroom = classroom.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(guardian_name) = &patch.guardian_name {
            self.guardian_name = guardian_name.clone();
        }
        if let Some(guardian_phone) = &patch.guardian_phone {
            self.guardian_phone = guardian_phone.clone();
        }
        if let Some(photo) = &patch.photo {
            self.photo = photo.clone();
        }
    }
}

/// Create payload: a student without an identifier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    #[serde(rename = "dni")]
    pub national_id: String,
    pub name: String,
    pub email: String,
    pub age: u8,
    pub gender: Gender,
    pub classroom: String,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    #[serde(rename = "photo_url")]
    pub photo: Option<String>,
}

/// Partial update payload.
///
/// Absent fields are left untouched. For the optional record fields,
/// `Some(None)` clears the value and is sent as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StudentPatch {
    #[serde(rename = "dni", skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_phone: Option<Option<String>>,
    #[serde(rename = "photo_url", skip_serializing_if = "Option::is_none")]
    pub photo: Option<Option<String>>,
}

impl From<NewStudent> for StudentPatch {
    fn from(student: NewStudent) -> Self {
        Self {
            national_id: Some(student.national_id),
            name: Some(student.name),
            email: Some(student.email),
            age: Some(student.age),
            gender: Some(student.gender),
            classroom: Some(student.classroom),
            address: Some(student.address),
            guardian_name: Some(student.guardian_name),
            guardian_phone: Some(student.guardian_phone),
            photo: Some(student.photo),
        }
    }
}

/// One scored exam belonging to a student
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub student_id: StudentId,
    pub subject: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    /// Timestamp text as sent by the server; see `exam_timestamp`.
    pub exam_date: String,
}

impl Exam {
    pub fn is_passing(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }

    /// Best-effort parse of `exam_date` as wall-clock time.
    pub fn exam_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.exam_date)
    }

    /// Overwrite subject and score, keeping every other field.
    pub fn apply_update(&mut self, update: &ExamUpdate) {
        self.subject = update.subject.clone();
        self.score = update.score;
    }
}

/// Create payload for an exam
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewExam {
    pub student_id: StudentId,
    pub subject: String,
    pub score: u8,
}

/// Editable exam fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamUpdate {
    pub subject: String,
    pub score: u8,
}

/// Body of `PUT /exams/:id`. The API validates the update with the create
/// schema, so the owner id travels along even though it is not applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExamUpdatePayload {
    pub subject: String,
    pub score: u8,
    pub student_id: StudentId,
}

impl ExamUpdatePayload {
    pub fn new(update: &ExamUpdate, owner: StudentId) -> Self {
        Self {
            subject: update.subject.clone(),
            score: update.score,
            student_id: owner,
        }
    }
}

/// Standard response wrapper used by every API endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// List endpoints may answer with a null or missing `data` member.
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub data: Vec<T>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body convention: `{ "detail": ... }`. Only string details are
/// meant for display; validation failures carry a structured list instead.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail_message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    score_from_f64(raw).map_err(serde::de::Error::custom)
}

/// Scores are stored as floats upstream; round to the nearest whole point.
pub fn score_from_f64(raw: f64) -> crate::SharedResult<u8> {
    let rounded = raw.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(MAX_SCORE) {
        return Err(crate::SharedError::InvalidScore {
            value: raw.to_string(),
        });
    }
    Ok(rounded as u8)
}

/// Accepts ISO 8601 with either `T` or a space between date and time, with
/// or without fractional seconds and UTC offset. An offset is dropped and the
/// local wall-clock time kept.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_student() -> Student {
        serde_json::from_value(json!({
            "id": "s1",
            "dni": "70203040",
            "name": "Arturo Becerra",
            "email": "arturo@example.com",
            "age": 16,
            "gender": "M",
            "classroom": "5A",
            "address": null,
            "guardian_name": "Maria Abad",
            "guardian_phone": "922041633"
        }))
        .unwrap()
    }

    #[test]
    fn test_student_wire_names() {
        let student = sample_student();
        assert_eq!(student.national_id, "70203040");
        assert_eq!(student.gender, Gender::Male);
        assert_eq!(student.address, None);
        assert_eq!(student.photo, None);

        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["dni"], "70203040");
        assert_eq!(value["gender"], "M");
        assert!(value.get("photo_url").is_some());
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut student = sample_student();
        let patch = StudentPatch {
            name: Some("Arturo B. Abad".to_string()),
            guardian_name: Some(None),
            address: Some(Some("Av. Pedro Ruiz".to_string())),
            ..Default::default()
        };
        student.apply_patch(&patch);

        assert_eq!(student.name, "Arturo B. Abad");
        assert_eq!(student.guardian_name, None);
        assert_eq!(student.address.as_deref(), Some("Av. Pedro Ruiz"));
        assert_eq!(student.national_id, "70203040");
        assert_eq!(student.guardian_phone.as_deref(), Some("922041633"));
    }

    #[test]
    fn test_patch_serialization_skips_absent_fields() {
        let patch = StudentPatch {
            age: Some(17),
            photo: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "age": 17, "photo_url": null }));
    }

    #[test]
    fn test_exam_score_accepts_float_and_integer() {
        let exam: Exam = serde_json::from_value(json!({
            "id": "e1",
            "student_id": "s1",
            "subject": "Math",
            "score": 18.5,
            "exam_date": "2024-03-01T10:15:30.123456"
        }))
        .unwrap();
        assert_eq!(exam.score, 19);

        let exam: Exam = serde_json::from_value(json!({
            "id": "e2",
            "student_id": "s1",
            "subject": "History",
            "score": 11,
            "exam_date": "2024-03-02T09:00:00"
        }))
        .unwrap();
        assert_eq!(exam.score, 11);
        assert!(exam.is_passing());
    }

    #[test]
    fn test_exam_score_out_of_range_rejected() {
        let result: Result<Exam, _> = serde_json::from_value(json!({
            "id": "e1",
            "student_id": "s1",
            "subject": "Math",
            "score": 21,
            "exam_date": "2024-03-01T10:15:30"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_envelope_null_data() {
        let envelope: ListEnvelope<Exam> =
            serde_json::from_value(json!({ "data": null, "code": 200, "message": "ok" })).unwrap();
        assert!(envelope.data.is_empty());

        let envelope: ListEnvelope<Exam> = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_error_body_detail_message() {
        let body: ErrorBody = serde_json::from_value(json!({ "detail": "Duplicate DNI" })).unwrap();
        assert_eq!(body.detail_message().as_deref(), Some("Duplicate DNI"));

        let body: ErrorBody = serde_json::from_value(json!({
            "detail": [{ "loc": ["body", "dni"], "msg": "too short" }]
        }))
        .unwrap();
        assert_eq!(body.detail_message(), None);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(" other ".parse::<Gender>(), Ok(Gender::Other));
        assert_eq!(
            "x".parse::<Gender>(),
            Err(ValidationError::InvalidGender { value: "x".to_string() })
        );
        assert_eq!(Gender::Other.code(), "Otro");
    }

    #[test]
    fn test_exam_list_tolerates_date_formats() {
        let envelope: ListEnvelope<Exam> = serde_json::from_value(json!({
            "data": [
                {
                    "id": "e1", "student_id": "s1", "subject": "Math", "score": 14,
                    "exam_date": "2024-03-01T10:15:30.123456"
                },
                {
                    "id": "e2", "student_id": "s1", "subject": "Art", "score": 12,
                    "exam_date": "2024-03-01 10:15:30.123456"
                },
                {
                    "id": "e3", "student_id": "s1", "subject": "History", "score": 9,
                    "exam_date": "2024-03-01T10:15:30+00:00"
                },
                {
                    "id": "e4", "student_id": "s1", "subject": "Music", "score": 16,
                    "exam_date": "last tuesday"
                }
            ]
        }))
        .unwrap();

        assert_eq!(envelope.data.len(), 4);
        let expected =
            NaiveDateTime::parse_from_str("2024-03-01 10:15:30", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(envelope.data[0].exam_timestamp().map(|t| t.date()), Some(expected.date()));
        assert_eq!(envelope.data[1].exam_timestamp(), envelope.data[0].exam_timestamp());
        assert_eq!(envelope.data[2].exam_timestamp(), Some(expected));
        assert_eq!(envelope.data[3].exam_timestamp(), None);
        assert_eq!(envelope.data[3].exam_date, "last tuesday");
    }
}
