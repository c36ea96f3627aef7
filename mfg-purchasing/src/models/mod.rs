//! Purchasing enumerations and row types

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

mfg_common::catalog_enum! {
    /// Purchase order lifecycle
    pub enum PurchaseOrderStatus {
        Draft => "Draft",
        Planned => "Planned",
        ToReview => "To Review",
        Rejected => "Rejected",
        ToReceive => "To Receive",
        ToReceiveAndInvoice => "To Receive and Invoice",
        ToInvoice => "To Invoice",
        Completed => "Completed",
        Closed => "Closed",
    }
}

impl PurchaseOrderStatus {
    /// Header fields and lines may still change
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Draft | PurchaseOrderStatus::Planned | PurchaseOrderStatus::ToReview
        )
    }

    /// Order can be sent to the supplier
    pub fn is_releasable(&self) -> bool {
        self.is_editable()
    }

    /// Order was never released
    pub fn is_deletable(&self) -> bool {
        self.is_editable() || *self == PurchaseOrderStatus::Rejected
    }
}

mfg_common::catalog_enum! {
    pub enum PurchaseOrderType {
        Purchase => "Purchase",
        Return => "Return",
    }
}

mfg_common::catalog_enum! {
    pub enum PurchaseOrderLineType {
        Part => "Part",
        Material => "Material",
        Tool => "Tool",
        Consumable => "Consumable",
        Service => "Service",
        FixedAsset => "Fixed Asset",
        Comment => "Comment",
    }
}

mfg_common::catalog_enum! {
    pub enum SupplierQuoteStatus {
        Active => "Active",
        Ordered => "Ordered",
        Partial => "Partial",
        Declined => "Declined",
        Cancelled => "Cancelled",
        Expired => "Expired",
    }
}

mfg_common::catalog_enum! {
    /// How the supplier is told about a released order
    pub enum ReleaseNotification {
        Email => "Email",
        None => "None",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub currency_code: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Supplier default payment terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayment {
    pub supplier_id: String,
    pub payment_term_id: Option<String>,
    pub invoice_supplier_id: Option<String>,
}

/// Supplier default shipping terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupplierShipping {
    pub supplier_id: String,
    pub shipping_method_id: Option<String>,
    pub shipping_term_id: Option<String>,
}

/// Purchase order header
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    pub company_id: String,
    pub purchase_order_id: String,
    pub purchase_order_type: PurchaseOrderType,
    pub status: PurchaseOrderStatus,
    pub supplier_id: String,
    pub supplier_interaction_id: Option<String>,
    pub supplier_contact_id: Option<String>,
    pub supplier_location_id: Option<String>,
    pub supplier_reference: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub currency_code: Option<String>,
    pub exchange_rate: f64,
    pub exchange_rate_updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDelivery {
    pub id: String,
    pub location_id: Option<String>,
    pub shipping_method_id: Option<String>,
    pub shipping_term_id: Option<String>,
    pub receipt_requested_date: Option<NaiveDate>,
    pub receipt_promised_date: Option<NaiveDate>,
    pub drop_shipment: bool,
    pub customer_id: Option<String>,
    pub customer_location_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderPayment {
    pub id: String,
    pub payment_term_id: Option<String>,
    pub invoice_supplier_id: Option<String>,
    pub payment_complete: bool,
}

/// Header with both satellites
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub header: PurchaseOrder,
    pub delivery: Option<PurchaseOrderDelivery>,
    pub payment: Option<PurchaseOrderPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub id: String,
    pub purchase_order_id: String,
    pub purchase_order_line_type: PurchaseOrderLineType,
    pub item_id: Option<String>,
    pub description: Option<String>,
    pub purchase_quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub location_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuote {
    pub id: String,
    pub company_id: String,
    pub supplier_quote_id: String,
    pub supplier_id: String,
    pub supplier_interaction_id: Option<String>,
    pub supplier_reference: Option<String>,
    pub status: SupplierQuoteStatus,
    pub quoted_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub currency_code: Option<String>,
    pub exchange_rate: f64,
    pub exchange_rate_updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupplierQuoteLine {
    pub id: String,
    pub supplier_quote_id: String,
    pub item_id: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub lead_time: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_groups() {
        assert!(PurchaseOrderStatus::ToReview.is_releasable());
        assert!(!PurchaseOrderStatus::Rejected.is_releasable());
        assert!(PurchaseOrderStatus::Rejected.is_deletable());
        assert!(!PurchaseOrderStatus::ToReceive.is_deletable());
        assert!(!PurchaseOrderStatus::Closed.is_editable());
    }

    #[test]
    fn test_labels_with_spaces() {
        assert_eq!(
            PurchaseOrderStatus::ToReceiveAndInvoice.to_string(),
            "To Receive and Invoice"
        );
        assert_eq!(
            "Fixed Asset".parse::<PurchaseOrderLineType>().unwrap(),
            PurchaseOrderLineType::FixedAsset
        );
    }
}
