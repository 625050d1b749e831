use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::{
    ClassRow, ClassScope, ClassWithRelations, CreateClassDto, StudentInfo, UpdateClassDto,
};
use crate::utils::errors::AppError;

const CLASS_SELECT: &str = "SELECT c.id, c.name,
            s.id AS subject_id, s.name AS subject_name,
            u.id AS teacher_id, u.name AS teacher_name, u.email AS teacher_email,
            c.created_at, c.updated_at
     FROM classes c
     JOIN subjects s ON s.id = c.subject_id
     JOIN users u ON u.id = c.teacher_id";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db, dto))]
    pub async fn create_class(
        db: &PgPool,
        dto: CreateClassDto,
    ) -> Result<ClassWithRelations, AppError> {
        Self::ensure_role(db, dto.teacher_id, "teacher", "Invalid teacher ID or not a teacher")
            .await?;

        let class_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO classes (name, subject_id, teacher_id)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(dto.name.trim())
        .bind(dto.subject_id)
        .bind(dto.teacher_id)
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

        Self::get_class_by_id(db, class_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_classes(
        db: &PgPool,
        scope: ClassScope,
    ) -> Result<Vec<ClassWithRelations>, AppError> {
        let rows = match scope {
            ClassScope::All => {
                sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} ORDER BY c.name"))
                    .fetch_all(db)
                    .await
            }
            ClassScope::Teacher(teacher_id) => sqlx::query_as::<_, ClassRow>(&format!(
                "{CLASS_SELECT} WHERE c.teacher_id = $1 ORDER BY c.name"
            ))
            .bind(teacher_id)
            .fetch_all(db)
            .await,
            ClassScope::Student(student_id) => sqlx::query_as::<_, ClassRow>(&format!(
                "{CLASS_SELECT}
                 WHERE EXISTS (
                     SELECT 1 FROM class_students cs
                     WHERE cs.class_id = c.id AND cs.student_id = $1
                 )
                 ORDER BY c.name"
            ))
            .bind(student_id)
            .fetch_all(db)
            .await,
        }
        .context("Failed to fetch classes")
        .map_err(AppError::database)?;

        let mut classes = Vec::with_capacity(rows.len());
        for row in rows {
            let students = Self::get_enrolled_students(db, row.id).await?;
            classes.push(row.into_class(students));
        }

        Ok(classes)
    }

    #[instrument(skip(db))]
    pub async fn get_class_by_id(db: &PgPool, id: Uuid) -> Result<ClassWithRelations, AppError> {
        let row = sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch class by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        let students = Self::get_enrolled_students(db, row.id).await?;
        Ok(row.into_class(students))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<ClassWithRelations, AppError> {
        let existing = Self::get_class_by_id(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let subject_id = dto.subject_id.unwrap_or(existing.subject.id);
        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher.id);

        if teacher_id != existing.teacher.id {
            Self::ensure_role(db, teacher_id, "teacher", "Invalid teacher ID or not a teacher")
                .await?;
        }

        sqlx::query(
            "UPDATE classes
             SET name = $1, subject_id = $2, teacher_id = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(name.trim())
        .bind(subject_id)
        .bind(teacher_id)
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

        Self::get_class_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete class")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn enroll_student(
        db: &PgPool,
        class_id: Uuid,
        student_id: Uuid,
    ) -> Result<ClassWithRelations, AppError> {
        Self::ensure_class_exists(db, class_id).await?;
        Self::ensure_role(db, student_id, "student", "Invalid student ID or not a student")
            .await?;

        sqlx::query("INSERT INTO class_students (class_id, student_id) VALUES ($1, $2)")
            .bind(class_id)
            .bind(student_id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::bad_request(anyhow::anyhow!(
                            "Student already enrolled in class"
                        ));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?;

        Self::get_class_by_id(db, class_id).await
    }

    #[instrument(skip(db))]
    pub async fn unenroll_student(
        db: &PgPool,
        class_id: Uuid,
        student_id: Uuid,
    ) -> Result<ClassWithRelations, AppError> {
        Self::ensure_class_exists(db, class_id).await?;

        let result =
            sqlx::query("DELETE FROM class_students WHERE class_id = $1 AND student_id = $2")
                .bind(class_id)
                .bind(student_id)
                .execute(db)
                .await
                .context("Failed to unenroll student")
                .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Student is not enrolled in this class"
            )));
        }

        Self::get_class_by_id(db, class_id).await
    }

    async fn get_enrolled_students(
        db: &PgPool,
        class_id: Uuid,
    ) -> Result<Vec<StudentInfo>, AppError> {
        let students = sqlx::query_as::<_, StudentInfo>(
            "SELECT u.id, u.name, u.email
             FROM class_students cs
             JOIN users u ON u.id = cs.student_id
             WHERE cs.class_id = $1
             ORDER BY u.name",
        )
        .bind(class_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled students")
        .map_err(AppError::database)?;

        Ok(students)
    }

    async fn ensure_class_exists(db: &PgPool, class_id: Uuid) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM classes WHERE id = $1)",
        )
        .bind(class_id)
        .fetch_one(db)
        .await
        .context("Failed to check class existence")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        Ok(())
    }

    async fn ensure_role(
        db: &PgPool,
        user_id: Uuid,
        role: &str,
        message: &str,
    ) -> Result<(), AppError> {
        let found = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to look up user role")
            .map_err(AppError::database)?;

        match found {
            Some(r) if r == role => Ok(()),
            _ => Err(AppError::bad_request(anyhow::anyhow!("{}", message))),
        }
    }
}
