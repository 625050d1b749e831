//! Academic report PDF rendering.
//!
//! Uses the built-in Helvetica fonts so no font assets ship with the
//! binary. Layout is a simple top-down cursor with page breaks; reports
//! are small enough that nothing fancier is needed.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::modules::reports::model::ReportContext;
use crate::utils::errors::AppError;

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
}

impl PageWriter {
    fn new(title: &str) -> Self {
        let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        Self {
            doc,
            layer,
            y: Mm(277.0),
        }
    }

    fn break_page_if_needed(&mut self) {
        if self.y.0 < 20.0 {
            let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(277.0);
        }
    }

    fn title(&mut self, text: &str, font: &IndirectFontRef) {
        self.break_page_if_needed();
        self.layer.use_text(text, 20.0, Mm(70.0), self.y, font);
        self.y = Mm(self.y.0 - 12.0);
    }

    fn heading(&mut self, text: &str, font: &IndirectFontRef) {
        self.break_page_if_needed();
        self.layer.use_text(text, 15.0, Mm(20.0), self.y, font);
        self.y = Mm(self.y.0 - 8.0);
    }

    fn line(&mut self, text: &str, font: &IndirectFontRef) {
        self.break_page_if_needed();
        self.layer.use_text(text, 12.0, Mm(20.0), self.y, font);
        self.y = Mm(self.y.0 - 6.0);
    }

    fn indented(&mut self, text: &str, font: &IndirectFontRef) {
        self.break_page_if_needed();
        self.layer.use_text(text, 12.0, Mm(26.0), self.y, font);
        self.y = Mm(self.y.0 - 6.0);
    }

    fn space(&mut self) {
        self.y = Mm(self.y.0 - 4.0);
    }
}

pub fn render(context: &ReportContext) -> Result<Vec<u8>, AppError> {
    let mut writer = PageWriter::new("Academic Report");

    let regular = writer
        .doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::internal_error(format!("Failed to load PDF font: {}", e)))?;
    let bold = writer
        .doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::internal_error(format!("Failed to load PDF font: {}", e)))?;

    writer.title("Academic Report", &bold);

    writer.line(&format!("Student: {}", context.student.name), &regular);
    writer.line(&format!("Email: {}", context.student.email), &regular);
    writer.line(&format!("Role: {}", context.student.role), &regular);
    writer.space();

    writer.heading("Enrolled Classes", &bold);
    if context.classes.is_empty() {
        writer.line("No class enrollments.", &regular);
    } else {
        for (i, class) in context.classes.iter().enumerate() {
            writer.line(&format!("{}. Class: {}", i + 1, class.name), &regular);
            writer.indented(&format!("Subject: {}", class.subject.name), &regular);
            writer.indented(
                &format!("Teacher: {} ({})", class.teacher.name, class.teacher.email),
                &regular,
            );
        }
    }
    writer.space();

    writer.heading("Grades", &bold);
    if context.grades.is_empty() {
        writer.line("No grades recorded.", &regular);
    } else {
        for (i, grade) in context.grades.iter().enumerate() {
            writer.line(
                &format!("{}. Subject: {}", i + 1, grade.subject.name),
                &regular,
            );
            writer.indented(&format!("Score: {}", grade.score), &regular);
        }
    }
    writer.space();

    if let Some(overall) = context.overall_average {
        writer.heading("Averages", &bold);
        for subject_average in &context.subject_averages {
            writer.line(
                &format!(
                    "{}: {:.1}",
                    subject_average.subject, subject_average.average
                ),
                &regular,
            );
        }
        writer.space();
        writer.line(&format!("Overall average: {:.1}", overall), &bold);
    }

    writer
        .doc
        .save_to_bytes()
        .map_err(|e| AppError::internal_error(format!("Failed to render PDF: {}", e)))
}
