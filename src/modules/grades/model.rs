use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A grade as stored in the database.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Grade {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Student summary embedded in grade responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct GradeStudentInfo {
    pub id: Uuid,
    pub email: String,
}

/// Subject summary embedded in grade responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct GradeSubjectInfo {
    pub id: Uuid,
    pub name: String,
}

/// A grade with its student and subject embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeWithRelations {
    pub id: Uuid,
    pub student: GradeStudentInfo,
    pub subject: GradeSubjectInfo,
    pub score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Flat row shape produced by the grade/student/subject join.
#[derive(Debug, FromRow)]
pub struct GradeRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_email: String,
    pub subject_id: Uuid,
    pub subject_name: String,
    pub score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<GradeRow> for GradeWithRelations {
    fn from(row: GradeRow) -> Self {
        GradeWithRelations {
            id: row.id,
            student: GradeStudentInfo {
                id: row.student_id,
                email: row.student_email,
            },
            subject: GradeSubjectInfo {
                id: row.subject_id,
                name: row.subject_name,
            },
            score: row.score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub student_id: Uuid,
    pub subject_id: Uuid,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    pub subject_id: Option<Uuid>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: Option<f64>,
}

/// Flat average over every grade a student has.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentAverage {
    pub student_id: Uuid,
    pub average: f64,
    pub count: i64,
}

/// Paginated response containing grades.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedGradesResponse {
    pub data: Vec<GradeWithRelations>,
    pub meta: crate::utils::pagination::PaginationMeta,
}
