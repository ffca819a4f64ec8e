//! Form input filters and pre-submission checks
//!
//! Everything here runs before a request is built. A failure is reported to
//! the user directly and the operation never reaches the client store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::errors::ValidationError;
use crate::types::{ExamUpdate, Gender, NewExam, NewStudent, StudentId, StudentPatch, MAX_SCORE};

pub const NATIONAL_ID_LEN: usize = 8;
pub const AGE_MAX_DIGITS: usize = 2;
pub const GUARDIAN_PHONE_MAX_DIGITS: usize = 9;
pub const SCORE_MAX_DIGITS: usize = 2;

/// Upload cap for student photos (5 MiB).
pub const PHOTO_MAX_BYTES: usize = 5 * 1024 * 1024;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Strip everything but ASCII digits. Input that is still longer than
/// `max_len` afterwards is rejected rather than truncated.
pub fn digits_only(input: &str, max_len: usize) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.len() <= max_len).then_some(digits)
}

pub fn validate_national_id(national_id: &str) -> ValidationResult<()> {
    let length = national_id.chars().count();
    if length != NATIONAL_ID_LEN {
        return Err(ValidationError::NationalIdLength { length });
    }
    if !national_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NationalIdNotNumeric);
    }
    Ok(())
}

pub fn parse_age(input: &str) -> ValidationResult<u8> {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || trimmed.len() > AGE_MAX_DIGITS
        || !trimmed.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidAge);
    }
    match trimmed.parse::<u8>() {
        Ok(0) | Err(_) => Err(ValidationError::InvalidAge),
        Ok(age) => Ok(age),
    }
}

pub fn validate_guardian_phone(phone: &str) -> ValidationResult<()> {
    if phone.len() > GUARDIAN_PHONE_MAX_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidGuardianPhone);
    }
    Ok(())
}

pub fn parse_score(input: &str) -> ValidationResult<u8> {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || trimmed.len() > SCORE_MAX_DIGITS
        || !trimmed.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::ScoreOutOfRange);
    }
    let score: u8 = trimmed.parse().map_err(|_| ValidationError::ScoreOutOfRange)?;
    validate_score(score)?;
    Ok(score)
}

pub fn validate_score(score: u8) -> ValidationResult<()> {
    if score > MAX_SCORE {
        return Err(ValidationError::ScoreOutOfRange);
    }
    Ok(())
}

pub fn validate_subject(subject: &str) -> ValidationResult<()> {
    if subject.trim().is_empty() {
        return Err(ValidationError::SubjectRequired);
    }
    Ok(())
}

/// Embed an uploaded photo as a `data:` URL.
pub fn encode_photo(bytes: &[u8], mime: &str) -> ValidationResult<String> {
    if bytes.len() > PHOTO_MAX_BYTES {
        return Err(ValidationError::PhotoTooLarge {
            size: bytes.len(),
            max: PHOTO_MAX_BYTES,
        });
    }
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Raw student form fields, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub national_id: String,
    pub name: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub classroom: String,
    pub address: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub photo: String,
}

impl StudentForm {
    /// Validate every field and build a create payload.
    pub fn to_new_student(&self) -> ValidationResult<NewStudent> {
        validate_national_id(&self.national_id)?;
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let age = parse_age(&self.age)?;
        let gender: Gender = self.gender.parse()?;
        validate_guardian_phone(&self.guardian_phone)?;

        Ok(NewStudent {
            national_id: self.national_id.clone(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age,
            gender,
            classroom: self.classroom.trim().to_string(),
            address: non_empty(&self.address),
            guardian_name: non_empty(&self.guardian_name),
            guardian_phone: non_empty(&self.guardian_phone),
            photo: non_empty(&self.photo),
        })
    }

    /// Validate and build an update that rewrites every editable field.
    pub fn to_patch(&self) -> ValidationResult<StudentPatch> {
        self.to_new_student().map(StudentPatch::from)
    }
}

/// Raw exam form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExamForm {
    pub subject: String,
    pub score: String,
}

impl ExamForm {
    pub fn to_new_exam(&self, student_id: &StudentId) -> ValidationResult<NewExam> {
        let update = self.to_update()?;
        Ok(NewExam {
            student_id: student_id.clone(),
            subject: update.subject,
            score: update.score,
        })
    }

    pub fn to_update(&self) -> ValidationResult<ExamUpdate> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "subject" });
        }
        if self.score.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "score" });
        }
        let score = parse_score(&self.score)?;
        Ok(ExamUpdate {
            subject: self.subject.trim().to_string(),
            score,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
