use serde::Serialize;

use crate::modules::classes::model::ClassWithRelations;
use crate::modules::grades::model::GradeWithRelations;
use crate::modules::users::model::User;

/// Per-subject average computed from the grade aggregation tree.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectAverage {
    pub subject: String,
    pub average: f64,
}

/// Everything the PDF renderer needs, gathered up front so rendering is
/// pure computation.
#[derive(Debug)]
pub struct ReportContext {
    pub student: User,
    pub classes: Vec<ClassWithRelations>,
    pub grades: Vec<GradeWithRelations>,
    pub subject_averages: Vec<SubjectAverage>,
    pub overall_average: Option<f64>,
}

/// A rendered report ready to be sent to the client.
pub struct RenderedReport {
    pub filename: String,
    pub bytes: Vec<u8>,
}
