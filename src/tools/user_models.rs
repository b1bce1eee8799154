//! User-record payloads exchanged with the user service.
//!
//! Deserializing into these types is how `add_user` and `update_user`
//! validate the model's arguments. Unknown keys are ignored, missing or
//! mistyped fields are rejected.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub street: String,
    pub flat_house: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub num: String,
    pub cvv: String,
    pub exp_date: String,
}

/// A new user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub about_me: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
}

/// A partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CreditCard>,
}

/// Search filters. Every filter is optional; unknown filters are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl UserSearch {
    /// Set filters as query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", self.name.as_deref()),
            ("surname", self.surname.as_deref()),
            ("email", self.email.as_deref()),
            ("gender", self.gender.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

fn address_schema() -> Value {
    json!({
        "type": "object",
        "title": "Address",
        "properties": {
            "country": {"type": "string"},
            "city": {"type": "string"},
            "street": {"type": "string"},
            "flat_house": {"type": "string"}
        },
        "required": ["country", "city", "street", "flat_house"]
    })
}

fn credit_card_schema() -> Value {
    json!({
        "type": "object",
        "title": "CreditCard",
        "properties": {
            "num": {"type": "string"},
            "cvv": {"type": "string"},
            "exp_date": {"type": "string"}
        },
        "required": ["num", "cvv", "exp_date"]
    })
}

fn user_properties() -> Value {
    json!({
        "name": {"type": "string", "description": "First name"},
        "surname": {"type": "string", "description": "Last name"},
        "email": {"type": "string", "description": "Email address"},
        "phone": {"type": "string", "description": "Phone number"},
        "date_of_birth": {"type": "string", "description": "Date of birth, YYYY-MM-DD"},
        "address": address_schema(),
        "gender": {"type": "string", "description": "Gender"},
        "company": {"type": "string", "description": "Employer"},
        "salary": {"type": "number", "description": "Yearly salary"},
        "about_me": {"type": "string", "description": "Short biography"},
        "credit_card": credit_card_schema()
    })
}

impl UserCreate {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "title": "UserCreate",
            "properties": user_properties(),
            "required": ["name", "surname", "email", "about_me"]
        })
    }
}

impl UserUpdate {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "title": "UserUpdate",
            "properties": user_properties()
        })
    }
}
