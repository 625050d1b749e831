//! Class data models and DTOs.
//!
//! Classes join a subject to the teacher who teaches it, plus the set of
//! enrolled students. API responses always embed the related subject,
//! teacher, and student summaries the way the SPA consumes them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Summary of the subject a class teaches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SubjectInfo {
    pub id: Uuid,
    pub name: String,
}

/// Summary of the teacher assigned to a class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TeacherInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Summary of an enrolled student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow, ToSchema)]
pub struct StudentInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A class with its subject, teacher, and enrolled students embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassWithRelations {
    pub id: Uuid,
    pub name: String,
    pub subject: SubjectInfo,
    pub teacher: TeacherInfo,
    pub students: Vec<StudentInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Flat row shape produced by the class/subject/teacher join.
#[derive(Debug, FromRow)]
pub struct ClassRow {
    pub id: Uuid,
    pub name: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub teacher_email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ClassRow {
    pub fn into_class(self, students: Vec<StudentInfo>) -> ClassWithRelations {
        ClassWithRelations {
            id: self.id,
            name: self.name,
            subject: SubjectInfo {
                id: self.subject_id,
                name: self.subject_name,
            },
            teacher: TeacherInfo {
                id: self.teacher_id,
                name: self.teacher_name,
                email: self.teacher_email,
            },
            students,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing scope derived from the requester's role: admins see every
/// class, teachers the ones they teach, students the ones they're
/// enrolled in.
#[derive(Debug, Clone, Copy)]
pub enum ClassScope {
    All,
    Teacher(Uuid),
    Student(Uuid),
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1))]
    pub name: String,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

/// Body for enroll/unenroll requests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollmentDto {
    pub student_id: Uuid,
}
