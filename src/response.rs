use crate::error::{BillPayError, Result};
use crate::request::{AuthorizeRequest, CaptureRequest, RefundRequest};

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// The gateway reply: the attribute set of the reply's root element. The
/// vendor returns all result fields as attributes on a single `data`
/// element.
#[derive(Debug, Clone)]
pub struct Reply {
    attributes: BTreeMap<String, String>,
}

impl Reply {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        loop {
            let event = reader
                .read_event()
                .map_err(|err| BillPayError::InvalidResponse(err.to_string()))?;
            match event {
                Event::Start(element) | Event::Empty(element) => {
                    let mut attributes = BTreeMap::new();
                    for attribute in element.attributes() {
                        let attribute = attribute
                            .map_err(|err| BillPayError::InvalidResponse(err.to_string()))?;
                        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                        let value = attribute
                            .unescape_value()
                            .map_err(|err| BillPayError::InvalidResponse(err.to_string()))?
                            .into_owned();
                        attributes.insert(key, value);
                    }
                    return Ok(Reply { attributes });
                }
                Event::Eof => {
                    return Err(BillPayError::InvalidResponse(
                        "reply contains no root element".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.get("error_code")
    }

    pub fn customer_message(&self) -> Option<&str> {
        self.get("customermessage")
    }

    pub fn merchant_message(&self) -> Option<&str> {
        self.get("merchantmessage")
    }

    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    /// The gateway-side transaction identifier, when present.
    pub fn transaction_reference(&self) -> Option<&str> {
        self.get("bptid")
    }

    /// A reply is successful unless it carries a non-zero error code.
    pub fn is_successful(&self) -> bool {
        self.error_code().map_or(true, |code| code == "0")
    }
}

/// Uniform read surface over all response wrappers.
pub trait GatewayResponse {
    fn is_successful(&self) -> bool;

    fn error_code(&self) -> Option<&str>;

    /// The customer-facing message, falling back to the merchant message.
    fn error_message(&self) -> Option<&str>;
}

macro_rules! response_wrapper {
    ($(#[$doc:meta])* $name:ident, $request:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            request: $request,
            reply: Reply,
        }

        impl $name {
            pub fn new(request: $request, reply: Reply) -> Self {
                $name { request, reply }
            }

            /// The request this reply answers.
            pub fn request(&self) -> &$request {
                &self.request
            }

            pub fn reply(&self) -> &Reply {
                &self.reply
            }
        }

        impl GatewayResponse for $name {
            fn is_successful(&self) -> bool {
                self.reply.is_successful()
            }

            fn error_code(&self) -> Option<&str> {
                self.reply.error_code()
            }

            fn error_message(&self) -> Option<&str> {
                self.reply
                    .customer_message()
                    .or_else(|| self.reply.merchant_message())
            }
        }
    };
}

response_wrapper!(
    /// Reply to a preauthorize call.
    AuthorizeResponse,
    AuthorizeRequest
);
response_wrapper!(
    /// Reply to an invoiceCreated call.
    CaptureResponse,
    CaptureRequest
);
response_wrapper!(
    /// Reply to a cancel call.
    RefundResponse,
    RefundRequest
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentRequest;
    use crate::request::{GatewayConfig, GatewayRequest, RefundRequest};

    #[test]
    fn successful_reply_has_no_error() {
        let reply =
            Reply::parse(r#"<data api_version="1.5.11" status="APPROVED" bptid="8650"/>"#).unwrap();
        assert!(reply.is_successful());
        assert_eq!(reply.status(), Some("APPROVED"));
        assert_eq!(reply.transaction_reference(), Some("8650"));
    }

    #[test]
    fn zero_error_code_counts_as_success() {
        let reply = Reply::parse(r#"<data error_code="0"/>"#).unwrap();
        assert!(reply.is_successful());
    }

    #[test]
    fn error_reply_surfaces_code_and_message() {
        let reply = Reply::parse(
            r#"<data error_code="1234" customermessage="Zahlung abgelehnt" merchantmessage="risk check failed"/>"#,
        )
        .unwrap();
        assert!(!reply.is_successful());
        assert_eq!(reply.error_code(), Some("1234"));
        assert_eq!(reply.customer_message(), Some("Zahlung abgelehnt"));
    }

    #[test]
    fn empty_input_is_an_invalid_response() {
        let err = Reply::parse("").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }

    #[test]
    fn malformed_xml_is_an_invalid_response() {
        // Stray end tag fails in the reader, bad entity in the unescaper,
        // unquoted value in the attribute iterator.
        let err = Reply::parse("</data>").unwrap_err();
        assert!(matches!(err, BillPayError::InvalidResponse(_)));

        let err = Reply::parse(r#"<data customermessage="&bogus;"/>"#).unwrap_err();
        assert!(matches!(err, BillPayError::InvalidResponse(_)));

        let err = Reply::parse("<data error_code=0/>").unwrap_err();
        assert!(matches!(err, BillPayError::InvalidResponse(_)));
    }

    #[test]
    fn wrapper_binds_reply_to_the_originating_request() {
        let config = GatewayConfig::new("4441", "6021", "secret");
        let payment = PaymentRequest {
            amount: Some("33.90".to_string()),
            currency: Some("EUR".to_string()),
            transaction_id: Some("Testbestellung123".to_string()),
            ..PaymentRequest::new()
        };
        let request = RefundRequest::new(config, payment);
        let reply = Reply::parse(r#"<data error_code="1234" merchantmessage="denied"/>"#).unwrap();

        let response = request.into_response(reply);
        assert!(!response.is_successful());
        assert_eq!(response.error_message(), Some("denied"));
        assert_eq!(
            response.request().payment.transaction_id.as_deref(),
            Some("Testbestellung123")
        );
    }
}
