use crate::error::{BillPayError, Result};
use crate::models::{Card, Customer, Item, PaymentRequest};

/// Precondition checks run by the section builders before any document
/// mutation. All are pure; a failed check aborts assembly with a
/// descriptive error and leaves the document untouched.

pub fn require_card(request: &PaymentRequest) -> Result<&Card> {
    request
        .card
        .as_ref()
        .ok_or_else(|| BillPayError::invalid_request("Credit card object required."))
}

pub fn require_items(request: &PaymentRequest) -> Result<&[Item]> {
    if request.items.is_empty() {
        return Err(BillPayError::invalid_request("This request requires items."));
    }
    Ok(&request.items)
}

pub fn require_customer(request: &PaymentRequest) -> Result<&Customer> {
    request.customer.as_ref().ok_or_else(|| {
        BillPayError::invalid_request(
            "Customer object required for additional details not covered by card.",
        )
    })
}
