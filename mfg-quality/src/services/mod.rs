//! Quality orchestration and status rules

pub mod gauges;
pub mod issue_associations;
pub mod issues;
pub mod quality_documents;

pub use gauges::{record_gauge_calibration, upsert_gauge, GaugeCreate, GaugeUpdate};
pub use issue_associations::{add_issue_association, delete_issue_association, list_issue_associations};
pub use issues::{create_issue, delete_issue, get_issue, update_issue, update_issue_status};
pub use quality_documents::{
    upsert_quality_document, upsert_quality_document_step, QualityDocumentCreate,
    QualityDocumentStepCreate, QualityDocumentStepUpdate, QualityDocumentUpdate,
};
