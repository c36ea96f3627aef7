//! Form validators for issues, quality documents and gauges

pub mod gauge;
pub mod issue;
pub mod quality_document;

pub use gauge::{validate_calibration_record, validate_gauge, CalibrationRecordForm, GaugeForm};
pub use issue::{validate_issue, validate_issue_patch, IssueForm, IssuePatch};
pub use quality_document::{
    validate_quality_document, validate_quality_document_step, QualityDocumentForm,
    QualityDocumentStepForm,
};
