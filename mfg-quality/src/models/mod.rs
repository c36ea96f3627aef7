//! Quality enumerations and row types

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

mfg_common::catalog_enum! {
    /// Non-conformance lifecycle
    pub enum IssueStatus {
        Registered => "Registered",
        InProgress => "In Progress",
        Closed => "Closed",
    }
}

mfg_common::catalog_enum! {
    pub enum IssuePriority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

mfg_common::catalog_enum! {
    /// Entities an issue can be linked to; labels are the API's collection names
    pub enum IssueAssociationKind {
        Items => "items",
        Customers => "customers",
        Suppliers => "suppliers",
        JobOperations => "jobOperations",
        PurchaseOrderLines => "purchaseOrderLines",
        SalesOrderLines => "salesOrderLines",
        ShipmentLines => "shipmentLines",
        ReceiptLines => "receiptLines",
        TrackedEntities => "trackedEntities",
    }
}

impl IssueAssociationKind {
    /// Association table and the column holding the linked entity's id
    pub fn table(&self) -> (&'static str, &'static str) {
        match self {
            IssueAssociationKind::Items => ("issue_item", "item_id"),
            IssueAssociationKind::Customers => ("issue_customer", "customer_id"),
            IssueAssociationKind::Suppliers => ("issue_supplier", "supplier_id"),
            IssueAssociationKind::JobOperations => ("issue_job_operation", "job_operation_id"),
            IssueAssociationKind::PurchaseOrderLines => {
                ("issue_purchase_order_line", "purchase_order_line_id")
            }
            IssueAssociationKind::SalesOrderLines => {
                ("issue_sales_order_line", "sales_order_line_id")
            }
            IssueAssociationKind::ShipmentLines => ("issue_shipment_line", "shipment_line_id"),
            IssueAssociationKind::ReceiptLines => ("issue_receipt_line", "receipt_line_id"),
            IssueAssociationKind::TrackedEntities => {
                ("issue_tracked_entity", "tracked_entity_id")
            }
        }
    }
}

mfg_common::catalog_enum! {
    pub enum QualityDocumentStatus {
        Draft => "Draft",
        Active => "Active",
        Archived => "Archived",
    }
}

mfg_common::catalog_enum! {
    /// What an inspection step records
    pub enum QualityDocumentStepType {
        Value => "Value",
        Measurement => "Measurement",
        Checkbox => "Checkbox",
        List => "List",
        Date => "Date",
        Timestamp => "Timestamp",
        File => "File",
        Person => "Person",
    }
}

mfg_common::catalog_enum! {
    pub enum GaugeCalibrationStatus {
        Pending => "Pending",
        InCalibration => "In-Calibration",
        OutOfCalibration => "Out-of-Calibration",
    }
}

mfg_common::catalog_enum! {
    pub enum GaugeStatus {
        Active => "Active",
        Inactive => "Inactive",
    }
}

mfg_common::catalog_enum! {
    pub enum InspectionStatus {
        Pass => "Pass",
        Fail => "Fail",
    }
}

impl InspectionStatus {
    /// Gauge calibration status after an inspection with this outcome
    pub fn calibration_status(&self) -> GaugeCalibrationStatus {
        match self {
            InspectionStatus::Pass => GaugeCalibrationStatus::InCalibration,
            InspectionStatus::Fail => GaugeCalibrationStatus::OutOfCalibration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub company_id: String,
    pub issue_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub location_id: Option<String>,
    pub assignee: Option<String>,
    pub open_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One row of any association table; `target_id` is the linked entity
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IssueAssociation {
    pub id: String,
    pub issue_id: String,
    pub target_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Every association of one issue, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAssociations {
    pub items: Vec<IssueAssociation>,
    pub customers: Vec<IssueAssociation>,
    pub suppliers: Vec<IssueAssociation>,
    pub job_operations: Vec<IssueAssociation>,
    pub purchase_order_lines: Vec<IssueAssociation>,
    pub sales_order_lines: Vec<IssueAssociation>,
    pub shipment_lines: Vec<IssueAssociation>,
    pub receipt_lines: Vec<IssueAssociation>,
    pub tracked_entities: Vec<IssueAssociation>,
}

impl IssueAssociations {
    pub fn slot_mut(&mut self, kind: IssueAssociationKind) -> &mut Vec<IssueAssociation> {
        match kind {
            IssueAssociationKind::Items => &mut self.items,
            IssueAssociationKind::Customers => &mut self.customers,
            IssueAssociationKind::Suppliers => &mut self.suppliers,
            IssueAssociationKind::JobOperations => &mut self.job_operations,
            IssueAssociationKind::PurchaseOrderLines => &mut self.purchase_order_lines,
            IssueAssociationKind::SalesOrderLines => &mut self.sales_order_lines,
            IssueAssociationKind::ShipmentLines => &mut self.shipment_lines,
            IssueAssociationKind::ReceiptLines => &mut self.receipt_lines,
            IssueAssociationKind::TrackedEntities => &mut self.tracked_entities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QualityDocument {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub version: i64,
    pub status: QualityDocumentStatus,
    pub content: Option<String>,
    pub assignee: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QualityDocumentStep {
    pub id: String,
    pub quality_document_id: String,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub step_type: QualityDocumentStepType,
    pub sort_order: i64,
    pub unit_of_measure_code: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub list_values: Option<Json<Vec<String>>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub id: String,
    pub company_id: String,
    pub gauge_id: String,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub location_id: Option<String>,
    pub gauge_status: GaugeStatus,
    pub gauge_calibration_status: GaugeCalibrationStatus,
    pub calibration_interval_in_months: i64,
    pub last_calibration_date: Option<NaiveDate>,
    pub next_calibration_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GaugeCalibrationRecord {
    pub id: String,
    pub gauge_id: String,
    pub date_calibrated: NaiveDate,
    pub inspection_status: InspectionStatus,
    pub requires_action: bool,
    pub requires_adjustment: bool,
    pub requires_repair: bool,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfg_common::db::ISSUE_ASSOCIATION_TABLES;
    use mfg_common::CatalogEnum;

    #[test]
    fn test_every_kind_maps_to_a_created_table() {
        assert_eq!(IssueAssociationKind::ALL.len(), ISSUE_ASSOCIATION_TABLES.len());
        for kind in IssueAssociationKind::ALL {
            assert!(
                ISSUE_ASSOCIATION_TABLES.contains(&kind.table()),
                "{} has no table",
                kind
            );
        }
    }

    #[test]
    fn test_inspection_outcome_sets_calibration_status() {
        assert_eq!(
            InspectionStatus::Pass.calibration_status(),
            GaugeCalibrationStatus::InCalibration
        );
        assert_eq!(
            InspectionStatus::Fail.calibration_status(),
            GaugeCalibrationStatus::OutOfCalibration
        );
    }
}
