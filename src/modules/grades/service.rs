use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::grades::model::{
    CreateGradeDto, Grade, GradeRow, GradeWithRelations, StudentAverage, UpdateGradeDto,
};
use crate::utils::errors::AppError;

const GRADE_SELECT: &str = "SELECT g.id, g.student_id, u.email AS student_email,
            g.subject_id, s.name AS subject_name,
            g.score, g.created_at, g.updated_at
     FROM grades g
     JOIN users u ON u.id = g.student_id
     JOIN subjects s ON s.id = g.subject_id";

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db, dto))]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(dto.student_id)
            .fetch_optional(db)
            .await
            .context("Failed to look up student")
            .map_err(AppError::database)?;

        if role.as_deref() != Some("student") {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Invalid student ID or not a student"
            )));
        }

        let grade = sqlx::query_as::<_, Grade>(
            "INSERT INTO grades (student_id, subject_id, score)
             VALUES ($1, $2, $3)
             RETURNING id, student_id, subject_id, score, created_at, updated_at",
        )
        .bind(dto.student_id)
        .bind(dto.subject_id)
        .bind(dto.score)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Invalid subject ID"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn get_grades(
        db: &PgPool,
        student_filter: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GradeWithRelations>, i64), AppError> {
        let (rows, total) = match student_filter {
            Some(student_id) => {
                let rows = sqlx::query_as::<_, GradeRow>(&format!(
                    "{GRADE_SELECT}
                     WHERE g.student_id = $1
                     ORDER BY g.created_at DESC
                     LIMIT $2 OFFSET $3"
                ))
                .bind(student_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await
                .context("Failed to fetch grades")
                .map_err(AppError::database)?;

                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM grades WHERE student_id = $1",
                )
                .bind(student_id)
                .fetch_one(db)
                .await
                .context("Failed to count grades")
                .map_err(AppError::database)?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, GradeRow>(&format!(
                    "{GRADE_SELECT}
                     ORDER BY g.created_at DESC
                     LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await
                .context("Failed to fetch grades")
                .map_err(AppError::database)?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM grades")
                    .fetch_one(db)
                    .await
                    .context("Failed to count grades")
                    .map_err(AppError::database)?;

                (rows, total)
            }
        };

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    #[instrument(skip(db))]
    pub async fn get_grade_by_id(db: &PgPool, id: Uuid) -> Result<GradeWithRelations, AppError> {
        let row = sqlx::query_as::<_, GradeRow>(&format!("{GRADE_SELECT} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch grade by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade not found")))?;

        Ok(row.into())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_grade(
        db: &PgPool,
        id: Uuid,
        dto: UpdateGradeDto,
    ) -> Result<GradeWithRelations, AppError> {
        let existing = Self::get_grade_by_id(db, id).await?;

        let subject_id = dto.subject_id.unwrap_or(existing.subject.id);
        let score = dto.score.unwrap_or(existing.score);

        sqlx::query(
            "UPDATE grades
             SET subject_id = $1, score = $2, updated_at = NOW()
             WHERE id = $3",
        )
        .bind(subject_id)
        .bind(score)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Invalid subject ID"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_grade_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete grade")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Grade not found")));
        }

        Ok(())
    }

    /// Flat arithmetic mean over every grade the student has, regardless
    /// of subject. No grades is reported as not-found rather than as a
    /// zero average.
    #[instrument(skip(db))]
    pub async fn get_student_average(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<StudentAverage, AppError> {
        let scores =
            sqlx::query_scalar::<_, f64>("SELECT score FROM grades WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(db)
                .await
                .context("Failed to fetch grades for average")
                .map_err(AppError::database)?;

        if scores.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No grades found for this student"
            )));
        }

        let total: f64 = scores.iter().sum();
        let average = total / scores.len() as f64;

        Ok(StudentAverage {
            student_id,
            average,
            count: scores.len() as i64,
        })
    }
}
