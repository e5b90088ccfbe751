use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Price or area as sent by the server, which uses numbers and strings
/// interchangeably for these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// A listing belonging to a project.
///
/// Fields the client does not display are kept in `extra` so the record
/// can be posted back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Property {
    pub fn price_text(&self) -> String {
        self.price.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    pub fn area_text(&self) -> String {
        self.area.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_listing_and_keeps_unknown_fields() {
        let property: Property = serde_json::from_value(json!({
            "_id": "a",
            "post_title": "Flat 1",
            "type_name": "Apartment",
            "address": "Main St",
            "price": 100000,
            "area": "50 sqm",
            "city": "Pune"
        }))
        .unwrap();

        assert_eq!(property.id, "a");
        assert_eq!(property.price_text(), "100000");
        assert_eq!(property.area_text(), "50 sqm");
        assert_eq!(property.extra.get("city"), Some(&json!("Pune")));

        let echoed = serde_json::to_value(&property).unwrap();
        assert_eq!(echoed["city"], json!("Pune"));
        assert_eq!(echoed["price"], json!(100000));
    }

    #[test]
    fn missing_amounts_render_blank() {
        let property: Property =
            serde_json::from_value(json!({ "_id": "b", "price": null })).unwrap();
        assert_eq!(property.price_text(), "");
        assert_eq!(property.area_text(), "");
    }
}
