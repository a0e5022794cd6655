use crate::error::{BillPayError, Result};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment methods accepted by the BillPay XML API, with their numeric
/// wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Invoice,
    DirectDebit,
    TransactionCredit,
    PayLater,
    CollateralPromise,
}

impl PaymentMethod {
    pub fn code(self) -> u8 {
        match self {
            PaymentMethod::Invoice => 1,
            PaymentMethod::DirectDebit => 2,
            PaymentMethod::TransactionCredit => 3,
            PaymentMethod::PayLater => 4,
            PaymentMethod::CollateralPromise => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Invoice => "invoice",
            PaymentMethod::DirectDebit => "direct_debit",
            PaymentMethod::TransactionCredit => "transaction_credit",
            PaymentMethod::PayLater => "pay_later",
            PaymentMethod::CollateralPromise => "collateral_promise",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = BillPayError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "invoice" => Ok(PaymentMethod::Invoice),
            "direct_debit" => Ok(PaymentMethod::DirectDebit),
            "transaction_credit" => Ok(PaymentMethod::TransactionCredit),
            "pay_later" => Ok(PaymentMethod::PayLater),
            "collateral_promise" => Ok(PaymentMethod::CollateralPromise),
            other => Err(BillPayError::invalid_request(format!(
                "Unknown payment method '{other}' specified."
            ))),
        }
    }
}

/// Billing identity and address as collected at checkout, with optional
/// shipping overrides. Shipping accessors fall back to the billing value
/// when no override is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Card {
    pub gender: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,

    pub shipping_gender: Option<String>,
    pub shipping_title: Option<String>,
    pub shipping_first_name: Option<String>,
    pub shipping_last_name: Option<String>,
    pub shipping_address1: Option<String>,
    pub shipping_address2: Option<String>,
    pub shipping_postcode: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_phone: Option<String>,
}

impl Card {
    pub fn ship_gender(&self) -> Option<&str> {
        self.shipping_gender.as_deref().or(self.gender.as_deref())
    }

    pub fn ship_title(&self) -> Option<&str> {
        self.shipping_title.as_deref().or(self.title.as_deref())
    }

    pub fn ship_first_name(&self) -> Option<&str> {
        self.shipping_first_name
            .as_deref()
            .or(self.first_name.as_deref())
    }

    pub fn ship_last_name(&self) -> Option<&str> {
        self.shipping_last_name
            .as_deref()
            .or(self.last_name.as_deref())
    }

    pub fn ship_address1(&self) -> Option<&str> {
        self.shipping_address1
            .as_deref()
            .or(self.address1.as_deref())
    }

    pub fn ship_address2(&self) -> Option<&str> {
        self.shipping_address2
            .as_deref()
            .or(self.address2.as_deref())
    }

    pub fn ship_postcode(&self) -> Option<&str> {
        self.shipping_postcode
            .as_deref()
            .or(self.postcode.as_deref())
    }

    pub fn ship_city(&self) -> Option<&str> {
        self.shipping_city.as_deref().or(self.city.as_deref())
    }

    pub fn ship_country(&self) -> Option<&str> {
        self.shipping_country.as_deref().or(self.country.as_deref())
    }

    pub fn ship_phone(&self) -> Option<&str> {
        self.shipping_phone.as_deref().or(self.phone.as_deref())
    }

    /// True when no shipping override deviates from the billing address.
    pub fn ships_to_billing_address(&self) -> bool {
        fn same(field: &Option<String>, billing: &Option<String>) -> bool {
            field.is_none() || field == billing
        }

        same(&self.shipping_first_name, &self.first_name)
            && same(&self.shipping_last_name, &self.last_name)
            && same(&self.shipping_address1, &self.address1)
            && same(&self.shipping_address2, &self.address2)
            && same(&self.shipping_postcode, &self.postcode)
            && same(&self.shipping_city, &self.city)
            && same(&self.shipping_country, &self.country)
    }
}

/// Supplementary identity fields not carried by the card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub customer_type: Option<String>,
    pub language: Option<String>,
    pub group: Option<String>,
}

/// One cart line. `price` is the gross unit price and `total` the gross
/// line total, both as decimal strings in major currency units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub tax_rate: Option<String>,
    pub total: String,
}

/// Debit account details, required for the direct debit payment method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankAccount {
    pub holder: String,
    pub account_number: String,
    pub sort_code: Option<String>,
}

/// Installment plan selection for financed payment methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatePlan {
    pub id: String,
    pub term: Option<String>,
}

/// All parameters for one operation attempt. Constructed by the caller,
/// read-only during document assembly, discarded afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,
    pub client_ip: Option<String>,
    pub delay_in_days: Option<u32>,
    pub payment_method: Option<PaymentMethod>,
    pub terms_accepted: bool,
    pub expected_days_till_shipping: u32,
    pub capture_request_necessary: bool,
    pub card: Option<Card>,
    pub customer: Option<Customer>,
    pub items: Vec<Item>,
    pub bank_account: Option<BankAccount>,
    pub rate: Option<RatePlan>,
}

impl PaymentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payment method from its string code, rejecting anything
    /// outside the accepted enumeration.
    pub fn set_payment_method(&mut self, value: &str) -> Result<&mut Self> {
        self.payment_method = Some(value.parse()?);
        Ok(self)
    }

    pub fn amount(&self) -> Result<&str> {
        self.amount
            .as_deref()
            .ok_or_else(|| BillPayError::invalid_request("The amount parameter is required"))
    }

    pub fn currency(&self) -> Result<&str> {
        self.currency
            .as_deref()
            .ok_or_else(|| BillPayError::invalid_request("The currency parameter is required"))
    }

    pub fn transaction_id(&self) -> Result<&str> {
        self.transaction_id.as_deref().ok_or_else(|| {
            BillPayError::invalid_request("The transactionId parameter is required")
        })
    }

    /// Days added to the payment due date, e.g. for delayed shipping.
    pub fn delay_in_days(&self) -> u32 {
        self.delay_in_days.unwrap_or(5)
    }
}
