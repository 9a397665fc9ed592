use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A scalar field as the model reports it: text, or a bare number when the
/// model ignores the keep-original-format instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Tariff category as printed on Argentine electricity bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TariffType {
    Residencial,
    Comercial,
    Industrial,
}

impl fmt::Display for TariffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TariffType::Residencial => write!(f, "Residencial"),
            TariffType::Comercial => write!(f, "Comercial"),
            TariffType::Industrial => write!(f, "Industrial"),
        }
    }
}

impl TariffType {
    /// Lenient match: the model is told to emit one of three values, but
    /// anything else degrades to None rather than failing the whole parse.
    pub fn from_str_loose(s: &str) -> Option<TariffType> {
        let lower = s.trim().to_lowercase();
        if lower.contains("residencial") {
            Some(TariffType::Residencial)
        } else if lower.contains("comercial") {
            Some(TariffType::Comercial)
        } else if lower.contains("industrial") {
            Some(TariffType::Industrial)
        } else {
            None
        }
    }
}

fn tariff_loose<'de, D>(deserializer: D) -> Result<Option<TariffType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(TariffType::from_str_loose))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub customer_name: Option<FieldValue>,
    #[serde(default)]
    pub supply_address: Option<FieldValue>,
    #[serde(default, deserialize_with = "tariff_loose")]
    pub tariff_type: Option<TariffType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(default)]
    pub issue_date: Option<FieldValue>,
    #[serde(default)]
    pub due_date: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterReadings {
    #[serde(default)]
    pub consumed_kwh: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub total_billed: Option<FieldValue>,
}

/// The fixed-schema object the extraction model returns.
///
/// Presence-of-JSON is the only validation: groups and fields the model
/// omits become defaults, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub customer_info: CustomerInfo,
    #[serde(default)]
    pub billing_info: BillingInfo,
    #[serde(default)]
    pub meter_readings: MeterReadings,
    #[serde(default)]
    pub totals: Totals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_object_deserializes() {
        let json = r#"{
            "customer_info": {
                "customer_name": "Juan Pérez",
                "supply_address": "Av. Corrientes 1234",
                "tariff_type": "Residencial"
            },
            "billing_info": {"issue_date": "01/03/2024", "due_date": "15/03/2024"},
            "meter_readings": {"consumed_kwh": "350"},
            "totals": {"total_billed": "12.345,67"}
        }"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.customer_info.customer_name,
            Some(FieldValue::Text("Juan Pérez".into()))
        );
        assert_eq!(result.customer_info.tariff_type, Some(TariffType::Residencial));
        assert_eq!(
            result.totals.total_billed,
            Some(FieldValue::Text("12.345,67".into()))
        );
    }

    #[test]
    fn nulls_and_missing_groups_tolerated() {
        let json = r#"{"customer_info": {"customer_name": null}}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert!(result.customer_info.customer_name.is_none());
        assert!(result.billing_info.issue_date.is_none());
        assert!(result.totals.total_billed.is_none());
    }

    #[test]
    fn bare_numbers_accepted() {
        let json = r#"{"meter_readings": {"consumed_kwh": 350}}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.meter_readings.consumed_kwh,
            Some(FieldValue::Number(350.0))
        );
        assert_eq!(result.meter_readings.consumed_kwh.unwrap().to_string(), "350");
    }

    #[test]
    fn unknown_tariff_degrades_to_none() {
        let json = r#"{"customer_info": {"tariff_type": "Rural"}}"#;
        let result: ExtractionResult = serde_json::from_str(json).unwrap();
        assert!(result.customer_info.tariff_type.is_none());
    }

    #[test]
    fn tariff_matching_is_case_insensitive() {
        assert_eq!(
            TariffType::from_str_loose("RESIDENCIAL"),
            Some(TariffType::Residencial)
        );
        assert_eq!(
            TariffType::from_str_loose(" comercial "),
            Some(TariffType::Comercial)
        );
        assert_eq!(TariffType::from_str_loose("T1"), None);
    }
}
