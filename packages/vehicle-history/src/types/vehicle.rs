//! Vehicle identity and descriptive attributes.

use serde::{Deserialize, Serialize};

/// Descriptive data about the vehicle a report covers.
///
/// The VIN is the identity key; everything else is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vin: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

impl VehicleInfo {
    pub fn new(vin: impl Into<String>) -> Self {
        Self {
            vin: vin.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = Some(make.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_trim(mut self, trim: impl Into<String>) -> Self {
        self.trim = Some(trim.into());
        self
    }

    /// Fill every empty attribute from `other`, keeping values already set.
    ///
    /// The VIN is only taken when this one is empty.
    pub fn fill_from(&mut self, other: &VehicleInfo) {
        if self.vin.is_empty() {
            self.vin = other.vin.clone();
        }
        if self.year.is_none() {
            self.year = other.year;
        }
        fill_text(&mut self.make, &other.make);
        fill_text(&mut self.model, &other.model);
        fill_text(&mut self.trim, &other.trim);
        fill_text(&mut self.body_style, &other.body_style);
        fill_text(&mut self.engine, &other.engine);
    }

    /// Attributes besides the VIN that are still missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.year.is_none() {
            missing.push("year");
        }
        if self.make.is_none() {
            missing.push("make");
        }
        if self.model.is_none() {
            missing.push("model");
        }
        missing
    }
}

fn fill_text(target: &mut Option<String>, source: &Option<String>) {
    let empty = target.as_deref().map_or(true, |t| t.trim().is_empty());
    if empty {
        if let Some(value) = source.as_deref().filter(|v| !v.trim().is_empty()) {
            *target = Some(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_from_keeps_existing_values() {
        let mut first = VehicleInfo::new("1HGCM82633A004352").with_make("Honda");
        let second = VehicleInfo::new("1HGCM82633A004352")
            .with_make("HONDA")
            .with_model("Accord")
            .with_year(2018);

        first.fill_from(&second);

        assert_eq!(first.make.as_deref(), Some("Honda"));
        assert_eq!(first.model.as_deref(), Some("Accord"));
        assert_eq!(first.year, Some(2018));
    }

    #[test]
    fn test_fill_from_treats_blank_as_missing() {
        let mut first = VehicleInfo::new("VIN").with_trim("  ");
        let second = VehicleInfo::new("VIN").with_trim("EX-L");

        first.fill_from(&second);

        assert_eq!(first.trim.as_deref(), Some("EX-L"));
    }

    #[test]
    fn test_missing_fields() {
        let info = VehicleInfo::new("VIN").with_year(2020);
        assert_eq!(info.missing_fields(), vec!["make", "model"]);
    }
}
