//! Section builders for the request document. Each builder validates its
//! preconditions, assembles a complete section locally and only then pushes
//! it onto the document, so a validation failure never leaves a partial
//! section behind. Attribute order within each section follows the vendor
//! schema and must not be changed.

use crate::country::country_alpha3;
use crate::document::{Document, Section};
use crate::error::Result;
use crate::format::{format_date, minor_units};
use crate::models::PaymentRequest;
use crate::validation::{require_card, require_customer, require_items};

use log::debug;

fn owned(value: Option<&str>) -> Option<String> {
    value.map(|v| v.to_string())
}

pub fn append_customer_details(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let card = require_card(request)?;
    let customer = require_customer(request)?;

    let mut section = Section::new("customer_details");
    section.set("customerid", Some(customer.id.clone()));
    section.set("customertype", customer.customer_type.clone());
    section.set("salutation", card.gender.clone());
    section.set("title", card.title.clone());
    section.set("firstName", card.first_name.clone());
    section.set("lastName", card.last_name.clone());
    section.set("street", card.address1.clone());
    section.set("streetNo", None);
    section.set("addressAddition", card.address2.clone());
    section.set("zip", card.postcode.clone());
    section.set("city", card.city.clone());
    section.set(
        "country",
        card.country
            .as_deref()
            .and_then(country_alpha3)
            .map(|c| c.to_string()),
    );
    section.set("email", card.email.clone());
    section.set("phone", card.phone.clone());
    section.set("cellPhone", None);
    section.set("birthday", card.birthday.map(format_date));
    section.set("language", customer.language.clone());
    section.set("ip", request.client_ip.clone());
    section.set("customerGroup", customer.group.clone());

    document.push_section(section);
    Ok(())
}

pub fn append_shipping_details(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let card = require_card(request)?;

    let use_billing = card.ships_to_billing_address();
    let mut section = Section::new("shipping_details");
    section.set(
        "useBillingAddress",
        Some(if use_billing { "1" } else { "0" }.to_string()),
    );
    section.set("salutation", owned(card.ship_gender()));
    section.set("title", owned(card.ship_title()));
    section.set("firstName", owned(card.ship_first_name()));
    section.set("lastName", owned(card.ship_last_name()));
    section.set("street", owned(card.ship_address1()));
    section.set("streetNo", None);
    section.set("addressAddition", owned(card.ship_address2()));
    section.set("zip", owned(card.ship_postcode()));
    section.set("city", owned(card.ship_city()));
    section.set(
        "country",
        card.ship_country()
            .and_then(country_alpha3)
            .map(|c| c.to_string()),
    );
    section.set("phone", owned(card.ship_phone()));
    section.set("cellPhone", None);

    document.push_section(section);
    Ok(())
}

pub fn append_article_data(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let items = require_items(request)?;

    let mut section = Section::new("article_data");
    for item in items {
        let mut article = Section::new("article");
        article.set("articleid", Some(item.id.clone()));
        article.set("articlequantity", Some(item.quantity.to_string()));
        article.set("articlename", Some(item.name.clone()));
        article.set("articledescription", item.description.clone());
        article.set("articleprice", Some(minor_units(&item.price)?));
        article.set("articletaxrate", item.tax_rate.clone());
        article.set("articlepricegross", Some(minor_units(&item.total)?));
        section.add_child(article);
    }

    document.push_section(section);
    Ok(())
}

/// The cart total is taken from the request amount as supplied by the
/// caller. It is not cross-checked against the item sum; a mismatch is a
/// caller error the gateway reports back.
pub fn append_total(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    require_items(request)?;

    let mut section = Section::new("total");
    section.set("carttotalgross", Some(minor_units(request.amount()?)?));
    section.set("currency", Some(request.currency()?.to_string()));
    section.set("reference", Some(request.transaction_id()?.to_string()));

    document.push_section(section);
    Ok(())
}

pub fn append_rate(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let Some(rate) = &request.rate else {
        debug!("no rate plan selected, skipping rate section");
        return Ok(());
    };

    let mut section = Section::new("rate");
    section.set("id", Some(rate.id.clone()));
    section.set("term", rate.term.clone());

    document.push_section(section);
    Ok(())
}

pub fn append_bank_account(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let Some(account) = &request.bank_account else {
        debug!("no bank account attached, skipping bank_account section");
        return Ok(());
    };

    let mut section = Section::new("bank_account");
    section.set("accountholder", Some(account.holder.clone()));
    section.set("accountnumber", Some(account.account_number.clone()));
    section.set("sortcode", account.sort_code.clone());

    document.push_section(section);
    Ok(())
}

pub fn append_cancel(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let mut section = Section::new("cancel_params");
    section.set("carttotalgross", Some(minor_units(request.amount()?)?));
    section.set("currency", Some(request.currency()?.to_string()));
    section.set("reference", Some(request.transaction_id()?.to_string()));

    document.push_section(section);
    Ok(())
}

pub fn append_invoice(document: &mut Document, request: &PaymentRequest) -> Result<()> {
    let mut section = Section::new("invoice_params");
    section.set("carttotalgross", Some(minor_units(request.amount()?)?));
    section.set("currency", Some(request.currency()?.to_string()));
    section.set("reference", Some(request.transaction_id()?.to_string()));
    section.set("delayindays", Some(request.delay_in_days().to_string()));

    document.push_section(section);
    Ok(())
}
