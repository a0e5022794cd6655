use thiserror::Error;

pub type Result<T> = std::result::Result<T, BillPayError>;

/// Errors surfaced while assembling a request document or parsing a reply.
#[derive(Debug, Error)]
pub enum BillPayError {
    /// A local precondition failed before the document was submitted:
    /// missing card, missing items, missing customer, missing amount or
    /// reference, malformed amount, unknown payment method.
    #[error("{0}")]
    InvalidRequest(String),

    /// The gateway reply could not be mapped onto the expected shape.
    #[error("Unable to parse gateway reply: {0}")]
    InvalidResponse(String),

    /// XML serialization failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl BillPayError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        BillPayError::InvalidRequest(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_displays_message_verbatim() {
        let err = BillPayError::invalid_request("Credit card object required.");
        assert_eq!(err.to_string(), "Credit card object required.");
    }
}
