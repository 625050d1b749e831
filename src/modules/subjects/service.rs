use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::subjects::model::{CreateSubjectDto, Subject, UpdateSubjectDto};
use crate::utils::errors::AppError;

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db, dto))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name) VALUES ($1) RETURNING id, name",
        )
        .bind(dto.name.trim())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Subject {} already exists",
                        dto.name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subjects(db: &PgPool) -> Result<Vec<Subject>, AppError> {
        let subjects =
            sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects ORDER BY name")
                .fetch_all(db)
                .await
                .context("Failed to fetch subjects")
                .map_err(AppError::database)?;

        Ok(subjects)
    }

    #[instrument(skip(db))]
    pub async fn get_subject_by_id(db: &PgPool, id: Uuid) -> Result<Subject, AppError> {
        let subject =
            sqlx::query_as::<_, Subject>("SELECT id, name FROM subjects WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await
                .context("Failed to fetch subject by ID")
                .map_err(AppError::database)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        Ok(subject)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_subject(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let updated = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(dto.name.trim())
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Subject {} already exists",
                        dto.name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete subject")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        Ok(())
    }
}
