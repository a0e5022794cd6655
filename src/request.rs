use crate::document::{Document, Section};
use crate::error::Result;
use crate::models::PaymentRequest;
use crate::response::{AuthorizeResponse, CaptureResponse, RefundResponse, Reply};
use crate::sections::{
    append_article_data, append_bank_account, append_cancel, append_customer_details,
    append_invoice, append_rate, append_shipping_details, append_total,
};

use log::{debug, info};

pub const API_VERSION: &str = "1.5.11";
pub const TEST_ENDPOINT: &str = "https://test-api.billpay.de/xml";
pub const LIVE_ENDPOINT: &str = "https://api.billpay.de/xml";

/// Merchant connection settings, shared across all requests of one
/// integration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    pub portal_id: String,
    pub security_token: String,
    pub endpoint: String,
}

impl GatewayConfig {
    pub fn new(merchant_id: &str, portal_id: &str, security_token: &str) -> Self {
        GatewayConfig {
            merchant_id: merchant_id.to_string(),
            portal_id: portal_id.to_string(),
            security_token: security_token.to_string(),
            endpoint: TEST_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

/// Builds the document skeleton every operation starts from: the `data`
/// root with its header attributes and the `default_params` section
/// carrying the merchant credentials. Header attribute order is fixed by
/// the vendor schema.
pub fn base_document(config: &GatewayConfig, payment: &PaymentRequest) -> Document {
    let mut document = Document::new();
    document.set_attr(
        "tcaccepted",
        Some(if payment.terms_accepted { "1" } else { "0" }.to_string()),
    );
    document.set_attr(
        "expecteddaystillshipping",
        Some(payment.expected_days_till_shipping.to_string()),
    );
    document.set_attr(
        "capturerequestnecessary",
        Some(if payment.capture_request_necessary { "1" } else { "0" }.to_string()),
    );
    document.set_attr(
        "paymenttype",
        payment.payment_method.map(|m| m.code().to_string()),
    );
    document.set_attr("api_version", Some(API_VERSION.to_string()));

    let mut defaults = Section::new("default_params");
    defaults.set("mid", Some(config.merchant_id.clone()));
    defaults.set("pid", Some(config.portal_id.clone()));
    defaults.set("bpsecure", Some(config.security_token.clone()));
    document.push_section(defaults);

    document
}

/// The shared contract of every operation: assemble the full request
/// document, name the endpoint it goes to, and wrap the raw reply in the
/// operation's response type together with the originating request.
pub trait GatewayRequest: Sized {
    type Response;

    fn build_document(&self) -> Result<Document>;

    fn endpoint(&self) -> String;

    fn into_response(self, reply: Reply) -> Self::Response;
}

/// Authorize/preauthorize: reserves the order with the gateway before the
/// merchant ships. Composes nearly every section.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub config: GatewayConfig,
    pub payment: PaymentRequest,
}

impl AuthorizeRequest {
    pub fn new(config: GatewayConfig, payment: PaymentRequest) -> Self {
        AuthorizeRequest { config, payment }
    }
}

impl GatewayRequest for AuthorizeRequest {
    type Response = AuthorizeResponse;

    fn build_document(&self) -> Result<Document> {
        let mut document = base_document(&self.config, &self.payment);
        append_customer_details(&mut document, &self.payment)?;
        append_shipping_details(&mut document, &self.payment)?;
        append_article_data(&mut document, &self.payment)?;
        append_total(&mut document, &self.payment)?;
        append_rate(&mut document, &self.payment)?;
        append_bank_account(&mut document, &self.payment)?;

        info!(
            "built preauthorize document for reference {}",
            self.payment.transaction_id().unwrap_or("<unset>")
        );
        Ok(document)
    }

    fn endpoint(&self) -> String {
        format!("{}/preauthorize", self.config.endpoint)
    }

    fn into_response(self, reply: Reply) -> AuthorizeResponse {
        AuthorizeResponse::new(self, reply)
    }
}

/// Capture: reports the invoice as created so the payment becomes due.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub config: GatewayConfig,
    pub payment: PaymentRequest,
}

impl CaptureRequest {
    pub fn new(config: GatewayConfig, payment: PaymentRequest) -> Self {
        CaptureRequest { config, payment }
    }
}

impl GatewayRequest for CaptureRequest {
    type Response = CaptureResponse;

    fn build_document(&self) -> Result<Document> {
        let mut document = base_document(&self.config, &self.payment);
        append_invoice(&mut document, &self.payment)?;
        debug!("built invoiceCreated document");
        Ok(document)
    }

    fn endpoint(&self) -> String {
        format!("{}/invoiceCreated", self.config.endpoint)
    }

    fn into_response(self, reply: Reply) -> CaptureResponse {
        CaptureResponse::new(self, reply)
    }
}

/// Refund/cancel: releases or refunds a previous authorization.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub config: GatewayConfig,
    pub payment: PaymentRequest,
}

impl RefundRequest {
    pub fn new(config: GatewayConfig, payment: PaymentRequest) -> Self {
        RefundRequest { config, payment }
    }
}

impl GatewayRequest for RefundRequest {
    type Response = RefundResponse;

    fn build_document(&self) -> Result<Document> {
        let mut document = base_document(&self.config, &self.payment);
        append_cancel(&mut document, &self.payment)?;
        debug!("built cancel document");
        Ok(document)
    }

    fn endpoint(&self) -> String {
        format!("{}/cancel", self.config.endpoint)
    }

    fn into_response(self, reply: Reply) -> RefundResponse {
        RefundResponse::new(self, reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Customer, Item};

    fn config() -> GatewayConfig {
        GatewayConfig::new("4441", "6021", "25d55ad283aa400af464c76d713c07ad")
    }

    fn authorize_payment() -> PaymentRequest {
        let mut payment = PaymentRequest {
            amount: Some("33.90".to_string()),
            currency: Some("EUR".to_string()),
            transaction_id: Some("Testbestellung123".to_string()),
            terms_accepted: true,
            card: Some(Card {
                first_name: Some("Max".to_string()),
                last_name: Some("Mustermann".to_string()),
                country: Some("DE".to_string()),
                ..Card::default()
            }),
            customer: Some(Customer {
                id: "123".to_string(),
                ..Customer::default()
            }),
            items: vec![Item {
                id: "SKU-1".to_string(),
                name: "Leselampe".to_string(),
                quantity: 2,
                price: "16.95".to_string(),
                total: "33.90".to_string(),
                ..Item::default()
            }],
            ..PaymentRequest::new()
        };
        payment.set_payment_method("invoice").unwrap();
        payment
    }

    #[test]
    fn authorize_composes_sections_in_schema_order() {
        let request = AuthorizeRequest::new(config(), authorize_payment());
        let document = request.build_document().unwrap();

        let names: Vec<&str> = document.sections().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "default_params",
                "customer_details",
                "shipping_details",
                "article_data",
                "total",
            ]
        );
        assert_eq!(document.attr("paymenttype"), Some("1"));
        assert_eq!(document.attr("api_version"), Some(API_VERSION));
    }

    #[test]
    fn authorize_without_card_fails_before_any_section_is_added() {
        let mut payment = authorize_payment();
        payment.card = None;
        let request = AuthorizeRequest::new(config(), payment);

        let err = request.build_document().unwrap_err();
        assert_eq!(err.to_string(), "Credit card object required.");
    }

    #[test]
    fn authorize_without_items_fails() {
        let mut payment = authorize_payment();
        payment.items.clear();
        let request = AuthorizeRequest::new(config(), payment);

        let err = request.build_document().unwrap_err();
        assert_eq!(err.to_string(), "This request requires items.");
    }

    #[test]
    fn endpoints_carry_the_operation_suffix() {
        let payment = authorize_payment();
        assert_eq!(
            AuthorizeRequest::new(config(), payment.clone()).endpoint(),
            "https://test-api.billpay.de/xml/preauthorize"
        );
        assert_eq!(
            CaptureRequest::new(config(), payment.clone()).endpoint(),
            "https://test-api.billpay.de/xml/invoiceCreated"
        );
        assert_eq!(
            RefundRequest::new(config(), payment).endpoint(),
            "https://test-api.billpay.de/xml/cancel"
        );
    }

    #[test]
    fn live_endpoint_can_be_selected() {
        let config = config().with_endpoint(LIVE_ENDPOINT);
        let request = RefundRequest::new(config, authorize_payment());
        assert_eq!(request.endpoint(), "https://api.billpay.de/xml/cancel");
    }

    #[test]
    fn refund_document_contains_only_default_and_cancel_params() {
        let request = RefundRequest::new(config(), authorize_payment());
        let document = request.build_document().unwrap();

        let names: Vec<&str> = document.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["default_params", "cancel_params"]);
    }

    #[test]
    fn capture_document_contains_invoice_params() {
        let request = CaptureRequest::new(config(), authorize_payment());
        let document = request.build_document().unwrap();

        let names: Vec<&str> = document.sections().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["default_params", "invoice_params"]);
        let invoice = document.section("invoice_params").unwrap();
        assert_eq!(invoice.attr("carttotalgross"), Some("3390"));
        assert_eq!(invoice.attr("delayindays"), Some("5"));
    }
}
