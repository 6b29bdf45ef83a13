use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::barcode::en::Isbn13;
use fake::faker::company::en::{CompanyName, Industry};
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::currency::en::CurrencyCode;
use fake::faker::finance::en::Bic;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::job::en::Position;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;

use crate::errors::GenerationError;

/// One synthetic cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn to_csv(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Stable string key used when grouping rows by this value.
    pub fn group_key(&self) -> String {
        match self {
            CellValue::Null => "<null>".to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Int(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
        }
    }
}

/// Generate one cell value for a catalog label.
pub fn value_for_label<R: Rng + ?Sized>(
    label: &str,
    rng: &mut R,
) -> Result<CellValue, GenerationError> {
    let value = match label {
        "int" => CellValue::Int(rng.random_range(0..=100_000)),
        "quantity" => CellValue::Int(rng.random_range(1..=1_000)),
        "float" => CellValue::Float(rng.random_range(0.0..10_000.0)),
        "price" => CellValue::Float(round2(rng.random_range(0.01..10_000.0))),
        "percent" => CellValue::Float(round2(rng.random_range(0.0..100.0))),
        "city" => CellValue::Text(CityName().fake_with_rng::<String, _>(rng)),
        "state" => CellValue::Text(StateName().fake_with_rng::<String, _>(rng)),
        "country" => CellValue::Text(CountryName().fake_with_rng::<String, _>(rng)),
        "industry" => CellValue::Text(Industry().fake_with_rng::<String, _>(rng)),
        "job_position" => CellValue::Text(Position().fake_with_rng::<String, _>(rng)),
        "currency_code" => CellValue::Text(CurrencyCode().fake_with_rng::<String, _>(rng)),
        "isbn" => CellValue::Text(Isbn13().fake_with_rng::<String, _>(rng)),
        "bic" => CellValue::Text(Bic().fake_with_rng::<String, _>(rng)),
        "zip_code" => CellValue::Text(ZipCode().fake_with_rng::<String, _>(rng)),
        "username" => CellValue::Text(Username().fake_with_rng::<String, _>(rng)),
        "phone_number" => CellValue::Text(PhoneNumber().fake_with_rng::<String, _>(rng)),
        "credit_card" => CellValue::Text(CreditCardNumber().fake_with_rng::<String, _>(rng)),
        "name" => CellValue::Text(Name().fake_with_rng::<String, _>(rng)),
        "email" => CellValue::Text(SafeEmail().fake_with_rng::<String, _>(rng)),
        "company" => CellValue::Text(CompanyName().fake_with_rng::<String, _>(rng)),
        "sentence" => CellValue::Text(Sentence(3..8).fake_with_rng::<String, _>(rng)),
        "street_name" => CellValue::Text(StreetName().fake_with_rng::<String, _>(rng)),
        other => return Err(GenerationError::UnknownLabel(other.to_string())),
    };
    Ok(value)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use lineagen_core::{Category, ColumnTypeCatalog};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn every_builtin_label_produces_a_value() {
        let catalog = ColumnTypeCatalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for label in catalog.all_labels() {
            let value = value_for_label(label, &mut rng)
                .unwrap_or_else(|_| panic!("label '{label}' has no generator"));
            assert!(!value.is_null());
        }
    }

    #[test]
    fn numeric_labels_produce_numeric_values() {
        let catalog = ColumnTypeCatalog::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for label in catalog.labels(Category::Numeric) {
            let value = value_for_label(label, &mut rng).expect("numeric label");
            assert!(value.as_f64().is_some(), "label '{label}' is not numeric");
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = value_for_label("not_a_label", &mut rng);
        assert!(matches!(result, Err(GenerationError::UnknownLabel(_))));
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.994999), 0.99);
    }
}
