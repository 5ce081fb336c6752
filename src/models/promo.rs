use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{null_as_default, RowId};
use crate::utils::error::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,
    #[serde(deserialize_with = "uppercase")]
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_uses: i32,
    pub expiry_date: NaiveDate,
}

fn uppercase<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|code| normalize_code(&code))
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl PromoCode {
    pub fn new(
        code: &str,
        discount_type: DiscountType,
        discount_value: Decimal,
        max_uses: i32,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            code: normalize_code(code),
            discount_type,
            discount_value,
            max_uses,
            expiry_date,
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.code.is_empty() {
            errors.push(FieldError::new("code", "Promo code is required"));
        }
        if self.discount_value <= Decimal::ZERO {
            errors.push(FieldError::new(
                "discount_value",
                "Discount must be greater than zero",
            ));
        } else if self.discount_type == DiscountType::Percentage
            && self.discount_value > Decimal::ONE_HUNDRED
        {
            errors.push(FieldError::new(
                "discount_value",
                "Percentage discount cannot exceed 100",
            ));
        }
        if self.max_uses < 0 {
            errors.push(FieldError::new("max_uses", "Maximum uses cannot be negative"));
        }

        errors
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Short label for listings, e.g. `10% off` or `500.00 off`.
    pub fn discount_label(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{}% off", self.discount_value.normalize()),
            DiscountType::Fixed => format!("{:.2} off", self.discount_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
    }

    #[test]
    fn test_code_is_upper_cased() {
        let promo =
            PromoCode::new(" early10 ", DiscountType::Percentage, Decimal::TEN, 50, expiry());
        assert_eq!(promo.code, "EARLY10");

        let hydrated: PromoCode = serde_json::from_value(json!({
            "id": 3,
            "code": "vip",
            "discount_type": "fixed",
            "discount_value": 500,
            "max_uses": 10,
            "expiry_date": "2026-12-31"
        }))
        .unwrap();
        assert_eq!(hydrated.code, "VIP");
        assert_eq!(hydrated.id, Some(RowId::new("3")));
    }

    #[test]
    fn test_validation_rules() {
        let valid = PromoCode::new("SAVE", DiscountType::Fixed, Decimal::new(500, 0), 0, expiry());
        assert!(valid.validate().is_empty());

        let too_much =
            PromoCode::new("HALF", DiscountType::Percentage, Decimal::new(150, 0), 1, expiry());
        assert_eq!(too_much.validate()[0].field, "discount_value");

        let blank = PromoCode::new("  ", DiscountType::Fixed, Decimal::ZERO, -1, expiry());
        let fields: Vec<_> = blank.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["code", "discount_value", "max_uses"]);
    }

    #[test]
    fn test_discount_label_and_expiry() {
        let promo =
            PromoCode::new("TEN", DiscountType::Percentage, Decimal::new(1000, 2), 5, expiry());
        assert_eq!(promo.discount_label(), "10% off");
        assert!(!promo.is_expired(expiry()));
        assert!(promo.is_expired(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()));
    }
}
