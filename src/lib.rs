//! Request builder and response mapper for the BillPay XML payment API.
//!
//! BillPay processes pay-after-delivery payments (invoice, direct debit,
//! installments). Every operation is one XML document POSTed to the
//! gateway. This crate assembles those documents section by section,
//! validating required entities before anything is written, and maps the
//! reply attributes back into per-operation response wrappers. Transport
//! is left to the caller: build a document, POST `to_xml()` to
//! `endpoint()`, hand the body to [`response::Reply::parse`] and wrap it
//! with [`request::GatewayRequest::into_response`].

pub mod country;
pub mod document;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod request;
pub mod response;
pub mod sections;
pub mod validation;

pub use document::{Document, Section};
pub use error::{BillPayError, Result};
pub use models::{BankAccount, Card, Customer, Item, PaymentMethod, PaymentRequest, RatePlan};
pub use request::{
    AuthorizeRequest, CaptureRequest, GatewayConfig, GatewayRequest, RefundRequest, API_VERSION,
    LIVE_ENDPOINT, TEST_ENDPOINT,
};
pub use response::{AuthorizeResponse, CaptureResponse, GatewayResponse, RefundResponse, Reply};
