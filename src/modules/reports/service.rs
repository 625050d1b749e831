use anyhow::Context;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classes::model::ClassScope;
use crate::modules::classes::service::ClassService;
use crate::modules::grades::composite::{GradeComponent, GradeGroup, LeafGrade};
use crate::modules::grades::model::GradeWithRelations;
use crate::modules::grades::service::GradeService;
use crate::modules::reports::model::{RenderedReport, ReportContext, SubjectAverage};
use crate::modules::reports::pdf;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;

pub struct ReportService;

impl ReportService {
    /// Gather a student's classes and grades, compute the averages, and
    /// render the academic report PDF. Every generation is recorded in
    /// the `reports` audit table.
    #[instrument(skip(db))]
    pub async fn generate_student_report(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<RenderedReport, AppError> {
        let student = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at, updated_at
             FROM users
             WHERE id = $1 AND role = 'student'",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let classes = ClassService::get_classes(db, ClassScope::Student(student_id)).await?;
        let (grades, _) = GradeService::get_grades(db, Some(student_id), i64::MAX, 0).await?;

        let (subject_averages, overall_average) = compute_averages(&grades);

        let summary = serde_json::json!({
            "class_count": classes.len(),
            "grade_count": grades.len(),
            "subject_averages": subject_averages,
            "overall_average": overall_average,
        });

        sqlx::query("INSERT INTO reports (student_id, data) VALUES ($1, $2)")
            .bind(student_id)
            .bind(&summary)
            .execute(db)
            .await
            .context("Failed to record report generation")
            .map_err(AppError::database)?;

        let context = ReportContext {
            student,
            classes,
            grades,
            subject_averages,
            overall_average,
        };

        let bytes = pdf::render(&context)?;
        let filename = format!("{}_report.pdf", sanitize_filename(&context.student.name));

        Ok(RenderedReport { filename, bytes })
    }
}

/// Build the aggregation tree: one group per subject holding that
/// subject's scores as leaves, then an outer group over the subject
/// groups. Each subject therefore weighs the same in the overall
/// average no matter how many grades it contains.
fn compute_averages(grades: &[GradeWithRelations]) -> (Vec<SubjectAverage>, Option<f64>) {
    if grades.is_empty() {
        return (Vec::new(), None);
    }

    let mut by_subject: BTreeMap<&str, GradeGroup> = BTreeMap::new();
    for grade in grades {
        by_subject
            .entry(grade.subject.name.as_str())
            .or_insert_with(|| GradeGroup::new(grade.subject.name.clone()))
            .add(Box::new(LeafGrade::new(grade.score)));
    }

    let mut overall = GradeGroup::new("overall");
    let mut subject_averages = Vec::with_capacity(by_subject.len());
    for (subject, group) in by_subject {
        subject_averages.push(SubjectAverage {
            subject: subject.to_string(),
            average: group.value(),
        });
        overall.add(Box::new(group));
    }

    let overall_average = overall.value();
    (subject_averages, Some(overall_average))
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
