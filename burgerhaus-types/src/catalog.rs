use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Burger {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Price in euros (decimal string)
    #[schema(value_type = String)]
    pub price: BigDecimal,
    /// Image filename under the burger upload directory
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatedBurger {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteBurgerResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Allergen {
    pub id: i32,
    pub acronym: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MenuEntry {
    pub id: i32,
    pub burger_id: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewMenuEntry {
    pub burger_id: i32,
    /// `YYYY-MM-DD` or `DD.MM.YYYY`
    #[serde(deserialize_with = "crate::dates::deserialize_date")]
    #[schema(value_type = String)]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpecialOffer {
    pub id: i32,
    pub offer_name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub burger_id: Option<i32>,
    pub filename: Option<String>,
}

/// Splits the comma separated ingredient field of the burger form.
///
/// Names are trimmed, blanks dropped and repeats collapsed keeping the first
/// occurrence, so a burger never links the same ingredient twice.
pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in text.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_list() {
        assert_eq!(
            parse_ingredient_list("Cheese, Tomato"),
            vec!["Cheese".to_string(), "Tomato".to_string()]
        );
        assert_eq!(
            parse_ingredient_list(" Bun ,, Cheese,Bun, "),
            vec!["Bun".to_string(), "Cheese".to_string()]
        );
        assert!(parse_ingredient_list("").is_empty());
    }

    #[test]
    fn test_new_menu_entry_accepts_dotted_dates() {
        let entry: NewMenuEntry =
            serde_json::from_str(r#"{"burger_id": 3, "date": "24.12.2024"}"#).unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());

        let bad = serde_json::from_str::<NewMenuEntry>(r#"{"burger_id": 3, "date": "tomorrow"}"#);
        assert!(bad.is_err());
    }
}
