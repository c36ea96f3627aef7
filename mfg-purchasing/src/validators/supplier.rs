//! Supplier validators

use mfg_common::{FormInput, FormReader, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierPaymentForm {
    pub payment_term_id: Option<String>,
    pub invoice_supplier_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierShippingForm {
    pub shipping_method_id: Option<String>,
    pub shipping_term_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierForm {
    pub name: String,
    pub currency_code: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub payment: SupplierPaymentForm,
    pub shipping: SupplierShippingForm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub currency_code: Option<Option<String>>,
    pub tax_id: Option<Option<String>>,
    pub website: Option<Option<String>>,
}

fn read_payment(reader: &mut FormReader<'_>) -> SupplierPaymentForm {
    SupplierPaymentForm {
        payment_term_id: reader.optional_str("paymentTermId"),
        invoice_supplier_id: reader.optional_str("invoiceSupplierId"),
    }
}

fn read_shipping(reader: &mut FormReader<'_>) -> SupplierShippingForm {
    SupplierShippingForm {
        shipping_method_id: reader.optional_str("shippingMethodId"),
        shipping_term_id: reader.optional_str("shippingTermId"),
    }
}

pub fn validate_supplier(input: &FormInput) -> Result<SupplierForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = SupplierForm {
        name: reader.required_str("name"),
        currency_code: reader.optional_str("currencyCode"),
        tax_id: reader.optional_str("taxId"),
        website: reader.optional_str("website"),
        payment: read_payment(&mut reader),
        shipping: read_shipping(&mut reader),
    };
    reader.into_rules()?.finish()?;
    Ok(form)
}

pub fn validate_supplier_patch(input: &FormInput) -> Result<SupplierPatch, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let name = reader.patch_str("name");
    reader.check(!matches!(name, Some(None)), "name", "Name is required");
    let patch = SupplierPatch {
        name: name.flatten(),
        currency_code: reader.patch_str("currencyCode"),
        tax_id: reader.patch_str("taxId"),
        website: reader.patch_str("website"),
    };
    reader.into_rules()?.finish()?;
    Ok(patch)
}

pub fn validate_supplier_payment(input: &FormInput) -> Result<SupplierPaymentForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = read_payment(&mut reader);
    reader.into_rules()?.finish()?;
    Ok(form)
}

pub fn validate_supplier_shipping(input: &FormInput) -> Result<SupplierShippingForm, ValidationErrors> {
    let mut reader = FormReader::new(input);
    let form = read_shipping(&mut reader);
    reader.into_rules()?.finish()?;
    Ok(form)
}
