//! Request bodies and structured responses exchanged with the backend.

use crate::error::ValidationError;
use crate::ids::{CustomerId, FilmId, RecordId};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /addcustomer` and `PUT /updatecustomer/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Body of `POST /rentfilm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRequest {
    pub film_id: FilmId,
    pub customer_id: CustomerId,
}

/// Response of `GET /displaycustomers`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerPage {
    #[serde(default)]
    pub customers: Vec<Record>,
    #[serde(default = "one")]
    pub total_pages: u32,
}

fn one() -> u32 {
    1
}

/// Response of `GET /api/customer/{id}`: the customer plus rental history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub customer: Record,
    #[serde(default)]
    pub rentals: Vec<Record>,
}

impl CustomerDetails {
    pub fn open_rentals(&self) -> impl Iterator<Item = &Record> {
        self.rentals.iter().filter(|r| is_open_rental(r))
    }
}

/// A rental is open until the backend records a return date.
pub fn is_open_rental(rental: &Record) -> bool {
    rental.is_null("return_date")
}

/// Acknowledgement of a write call. The backend usually answers
/// `{"message": "..."}`; anything else is accepted as a bare success.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn from_value(value: &Value) -> Self {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { message }
    }
}

/// Validate the customer id typed into the rental form.
pub fn parse_customer_id(input: &str) -> Result<CustomerId, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidCustomerId {
        input: input.to_string(),
    };
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    match trimmed.parse::<i64>() {
        Ok(raw) if raw > 0 => Ok(CustomerId::new(raw)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn customer_page_defaults_total_to_one() {
        let page: CustomerPage = serde_json::from_value(json!({"customers": []})).unwrap();
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn rental_request_serializes_plain_ids() {
        let req = RentalRequest {
            film_id: FilmId::new(3),
            customer_id: CustomerId::new(9),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"film_id": 3, "customer_id": 9})
        );
    }

    #[test]
    fn open_rentals_have_no_return_date() {
        let details: CustomerDetails = serde_json::from_value(json!({
            "customer": {"customer_id": 1},
            "rentals": [
                {"rental_id": 1, "return_date": null},
                {"rental_id": 2, "return_date": "2005-05-26 22:04:30"},
                {"rental_id": 3}
            ]
        }))
        .unwrap();
        let open: Vec<_> = details.open_rentals().map(|r| r.text("rental_id")).collect();
        assert_eq!(open, vec!["1", "3"]);
    }

    #[test]
    fn ack_reads_message_when_present() {
        assert_eq!(
            Ack::from_value(&json!({"message": "Customer deleted"})).message.as_deref(),
            Some("Customer deleted")
        );
        assert_eq!(Ack::from_value(&json!([1, 2])), Ack::default());
    }

    #[test]
    fn customer_id_must_be_positive_digits() {
        assert_eq!(parse_customer_id(" 12 "), Ok(CustomerId::new(12)));
        assert!(parse_customer_id("").is_err());
        assert!(parse_customer_id("0").is_err());
        assert!(parse_customer_id("-4").is_err());
        assert!(parse_customer_id("12a").is_err());
        assert!(parse_customer_id("1.5").is_err());
    }
}
