//! Purchase order, line and release validators

use chrono::NaiveDate;
use mfg_common::validation::Rules;
use mfg_common::{FormInput, FormReader, ValidationErrors};

use crate::models::{
    PurchaseOrderDelivery, PurchaseOrderLineType, PurchaseOrderStatus, PurchaseOrderType, ReleaseNotification,
};

const DROP_SHIPMENT_CUSTOMER: &str = "Customer and customer location are required for drop shipments";
const DROP_SHIPMENT_LOCATION: &str = "Location must be empty for drop shipments";
const PROMISED_BEFORE_REQUESTED: &str = "Promised date must be on or after the requested date";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryForm {
    pub location_id: Option<String>,
    pub shipping_method_id: Option<String>,
    pub shipping_term_id: Option<String>,
    pub receipt_requested_date: Option<NaiveDate>,
    pub receipt_promised_date: Option<NaiveDate>,
    pub drop_shipment: bool,
    pub customer_id: Option<String>,
    pub customer_location_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub payment_term_id: Option<String>,
    pub invoice_supplier_id: Option<String>,
}

/// Validated creation form
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderForm {
    pub supplier_id: String,
    pub purchase_order_type: PurchaseOrderType,
    pub status: Option<PurchaseOrderStatus>,
    pub order_date: Option<NaiveDate>,
    pub currency_code: Option<String>,
    pub supplier_contact_id: Option<String>,
    pub supplier_location_id: Option<String>,
    pub supplier_reference: Option<String>,
    pub notes: Option<String>,
    pub delivery: DeliveryForm,
    pub payment: PaymentForm,
}

impl PurchaseOrderForm {
    /// Minimal form for `supplier_id`, everything else defaulted
    pub fn for_supplier(supplier_id: impl Into<String>) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            purchase_order_type: PurchaseOrderType::Purchase,
            status: None,
            order_date: None,
            currency_code: None,
            supplier_contact_id: None,
            supplier_location_id: None,
            supplier_reference: None,
            notes: None,
            delivery: DeliveryForm::default(),
            payment: PaymentForm::default(),
        }
    }
}

/// Delivery fields present in an update; `Some(None)` clears
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryPatch {
    pub location_id: Option<Option<String>>,
    pub shipping_method_id: Option<Option<String>>,
    pub shipping_term_id: Option<Option<String>>,
    pub receipt_requested_date: Option<Option<NaiveDate>>,
    pub receipt_promised_date: Option<Option<NaiveDate>>,
    pub drop_shipment: Option<bool>,
    pub customer_id: Option<Option<String>>,
    pub customer_location_id: Option<Option<String>>,
}

impl DeliveryPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Stored delivery with the present fields applied
    ///
    /// Turning on drop shipment without naming a location clears the stored one.
    pub fn merged_with(&self, current: &PurchaseOrderDelivery) -> DeliveryForm {
        let drop_shipment = self.drop_shipment.unwrap_or(current.drop_shipment);
        let location_id = match (self.drop_shipment, &self.location_id) {
            (Some(true), None) => None,
            (_, location_id) => location_id.clone().unwrap_or_else(|| current.location_id.clone()),
        };
        DeliveryForm {
            location_id,
            shipping_method_id: merge(&self.shipping_method_id, &current.shipping_method_id),
            shipping_term_id: merge(&self.shipping_term_id, &current.shipping_term_id),
            receipt_requested_date: self.receipt_requested_date.unwrap_or(current.receipt_requested_date),
            receipt_promised_date: self.receipt_promised_date.unwrap_or(current.receipt_promised_date),
            drop_shipment,
            customer_id: merge(&self.customer_id, &current.customer_id),
            customer_location_id: merge(&self.customer_location_id, &current.customer_location_id),
        }
    }
}

fn merge(patch: &Option<Option<String>>, current: &Option<String>) -> Option<String> {
    patch.clone().unwrap_or_else(|| current.clone())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentPatch {
    pub payment_term_id: Option<Option<String>>,
    pub invoice_supplier_id: Option<Option<String>>,
}

impl PaymentPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields present in an update submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseOrderPatch {
    pub supplier_id: Option<String>,
    pub purchase_order_type: Option<PurchaseOrderType>,
    pub order_date: Option<Option<NaiveDate>>,
    pub currency_code: Option<Option<String>>,
    pub supplier_contact_id: Option<Option<String>>,
    pub supplier_location_id: Option<Option<String>>,
    pub supplier_reference: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub delivery: DeliveryPatch,
    pub payment: PaymentPatch,
}

pub fn validate_purchase_order(input: &FormInput) -> Result<PurchaseOrderForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = PurchaseOrderForm {
        supplier_id: reader.required_str("supplierId"),
        purchase_order_type: reader
            .optional_enum("purchaseOrderType")
            .unwrap_or(PurchaseOrderType::Purchase),
        status: reader.optional_enum("status"),
        order_date: reader.optional_date("orderDate"),
        currency_code: reader.optional_str("currencyCode"),
        supplier_contact_id: reader.optional_str("supplierContactId"),
        supplier_location_id: reader.optional_str("supplierLocationId"),
        supplier_reference: reader.optional_str("supplierReference"),
        notes: reader.optional_str("notes"),
        delivery: DeliveryForm {
            location_id: reader.optional_str("locationId"),
            shipping_method_id: reader.optional_str("shippingMethodId"),
            shipping_term_id: reader.optional_str("shippingTermId"),
            receipt_requested_date: reader.optional_date("receiptRequestedDate"),
            receipt_promised_date: reader.optional_date("receiptPromisedDate"),
            drop_shipment: reader.bool_flag("dropShipment"),
            customer_id: reader.optional_str("customerId"),
            customer_location_id: reader.optional_str("customerLocationId"),
        },
        payment: PaymentForm {
            payment_term_id: reader.optional_str("paymentTermId"),
            invoice_supplier_id: reader.optional_str("invoiceSupplierId"),
        },
    };

    let mut rules = reader.into_rules()?;
    check_delivery(&mut rules, &form.delivery);
    rules.finish()?;

    Ok(form)
}

/// Validate the fields present in an update
///
/// Delivery cross-field rules need the stored row and run in
/// [`validate_delivery_update`].
pub fn validate_purchase_order_patch(input: &FormInput) -> Result<PurchaseOrderPatch, ValidationErrors> {
    let mut reader = FormReader::new(input);

    let supplier_id = reader.patch_str("supplierId");
    reader.check(!matches!(supplier_id, Some(None)), "supplierId", "Supplier ID is required");

    let drop_shipment = if input.contains("dropShipment") {
        Some(reader.bool_flag("dropShipment"))
    } else {
        None
    };

    let patch = PurchaseOrderPatch {
        supplier_id: supplier_id.flatten(),
        purchase_order_type: reader.optional_enum("purchaseOrderType"),
        order_date: reader.patch_date("orderDate"),
        currency_code: reader.patch_str("currencyCode"),
        supplier_contact_id: reader.patch_str("supplierContactId"),
        supplier_location_id: reader.patch_str("supplierLocationId"),
        supplier_reference: reader.patch_str("supplierReference"),
        notes: reader.patch_str("notes"),
        delivery: DeliveryPatch {
            location_id: reader.patch_str("locationId"),
            shipping_method_id: reader.patch_str("shippingMethodId"),
            shipping_term_id: reader.patch_str("shippingTermId"),
            receipt_requested_date: reader.patch_date("receiptRequestedDate"),
            receipt_promised_date: reader.patch_date("receiptPromisedDate"),
            drop_shipment,
            customer_id: reader.patch_str("customerId"),
            customer_location_id: reader.patch_str("customerLocationId"),
        },
        payment: PaymentPatch {
            payment_term_id: reader.patch_str("paymentTermId"),
            invoice_supplier_id: reader.patch_str("invoiceSupplierId"),
        },
    };

    reader.into_rules()?.finish()?;

    Ok(patch)
}

fn check_delivery(rules: &mut Rules, delivery: &DeliveryForm) {
    rules
        .check(
            !delivery.drop_shipment
                || (delivery.customer_id.is_some() && delivery.customer_location_id.is_some()),
            "dropShipment",
            DROP_SHIPMENT_CUSTOMER,
        )
        .check(
            delivery.location_id.is_none() || !delivery.drop_shipment,
            "locationId",
            DROP_SHIPMENT_LOCATION,
        )
        .check(
            !matches!(
                (delivery.receipt_requested_date, delivery.receipt_promised_date),
                (Some(requested), Some(promised)) if promised < requested
            ),
            "receiptPromisedDate",
            PROMISED_BEFORE_REQUESTED,
        );
}

/// Apply `patch` to the stored delivery and check the result as a whole
pub fn validate_delivery_update(
    current: &PurchaseOrderDelivery,
    patch: &DeliveryPatch,
) -> Result<DeliveryForm, ValidationErrors> {
    let merged = patch.merged_with(current);
    let mut rules = Rules::default();
    check_delivery(&mut rules, &merged);
    rules.finish()?;
    Ok(merged)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrderLineForm {
    pub purchase_order_line_type: PurchaseOrderLineType,
    pub item_id: Option<String>,
    pub description: Option<String>,
    pub purchase_quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub location_id: Option<String>,
}

pub fn validate_purchase_order_line(input: &FormInput) -> Result<PurchaseOrderLineForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = PurchaseOrderLineForm {
        purchase_order_line_type: reader.required_enum("purchaseOrderLineType"),
        item_id: reader.optional_str("itemId"),
        description: reader.optional_str("description"),
        purchase_quantity: reader.optional_f64("purchaseQuantity"),
        unit_price: reader.optional_f64("unitPrice"),
        location_id: reader.optional_str("locationId"),
    };

    let is_comment = form.purchase_order_line_type == PurchaseOrderLineType::Comment;
    let mut rules = reader.into_rules()?;
    rules
        .check(
            is_comment || form.item_id.is_some(),
            "itemId",
            "Item ID is required",
        )
        .check(
            is_comment || form.purchase_quantity.is_some_and(|q| q > 0.0),
            "purchaseQuantity",
            "Quantity must be greater than 0",
        )
        .check(
            !is_comment || form.description.is_some(),
            "description",
            "Comment is required",
        )
        .check(
            form.unit_price.map_or(true, |p| p >= 0.0),
            "unitPrice",
            "Unit price must be at least 0",
        );
    rules.finish()?;

    Ok(form)
}

/// Validated release request
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseForm {
    pub notification: ReleaseNotification,
    pub supplier_contact: Option<String>,
    pub cc: Vec<String>,
}

pub fn validate_release(input: &FormInput) -> Result<ReleaseForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = ReleaseForm {
        notification: reader.required_enum("notification"),
        supplier_contact: reader.optional_str("supplierContact"),
        cc: reader.string_list("cc"),
    };

    let mut rules = reader.into_rules()?;
    rules.check(
        form.notification != ReleaseNotification::Email || form.supplier_contact.is_some(),
        "supplierContact",
        "Supplier contact is required for email notifications",
    );
    rules.finish()?;

    Ok(form)
}
