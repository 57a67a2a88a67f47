//! Domain types for the plant inventory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which language column a request operates on.
///
/// The editing UI shows one language at a time; update requests only carry
/// the active language's name/class fields, so repository calls need to know
/// which side of each bilingual pair may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ja" => Ok(Self::Ja),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Listing order for plant retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Creation order, `plant_id` ascending.
    #[default]
    Insertion,
    /// `plant_date` descending, ties broken by `plant_id` descending.
    ByDate,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insertion" => Ok(Self::Insertion),
            "by_date" => Ok(Self::ByDate),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// A fully joined plant record as read back from storage.
///
/// Dimension values (name, class, location) are denormalized into both
/// languages; callers pick the display language when shaping responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plant {
    pub plant_id: i64,
    pub plant_name_en: String,
    pub plant_name_ja: String,
    pub plant_class_en: String,
    pub plant_class_ja: String,
    pub location_en: String,
    pub location_ja: String,
    pub botanical_name: String,
    pub plant_date: NaiveDate,
    pub image_path: String,
}

/// Raw text fields collected from a multipart form submission.
///
/// Nothing here is trusted; the validation layer turns this into a
/// [`CreatePlant`] or [`UpdatePlant`] or rejects it.
#[derive(Debug, Clone, Default)]
pub struct PlantForm {
    pub plant_name_en: Option<String>,
    pub plant_name_ja: Option<String>,
    pub plant_class_en: Option<String>,
    pub plant_class_ja: Option<String>,
    pub location_en: Option<String>,
    pub location_ja: Option<String>,
    pub botanical_name: Option<String>,
    pub plant_date: Option<String>,
}

impl PlantForm {
    /// Assigns a form field by its wire name. Unknown names are ignored,
    /// matching how the original form endpoint treated extra fields.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "plant_name_en" => self.plant_name_en = Some(value),
            "plant_name_ja" => self.plant_name_ja = Some(value),
            "plant_class_en" => self.plant_class_en = Some(value),
            "plant_class_ja" => self.plant_class_ja = Some(value),
            "location_en" => self.location_en = Some(value),
            "location_ja" => self.location_ja = Some(value),
            "botanical_name" => self.botanical_name = Some(value),
            "plant_date" => self.plant_date = Some(value),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }
}

/// Validated input for the create operation. All dimension fields are
/// present and non-blank; `plant_date` defaults to today at insert time
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlant {
    pub plant_name_en: String,
    pub plant_name_ja: String,
    pub plant_class_en: String,
    pub plant_class_ja: String,
    pub location_en: String,
    pub location_ja: String,
    pub botanical_name: String,
    pub plant_date: Option<NaiveDate>,
}

/// Validated input for the update operation. Only supplied fields change;
/// the active language's fields are guaranteed present after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlant {
    pub plant_name_en: Option<String>,
    pub plant_name_ja: Option<String>,
    pub plant_class_en: Option<String>,
    pub plant_class_ja: Option<String>,
    pub location_en: Option<String>,
    pub location_ja: Option<String>,
    pub botanical_name: Option<String>,
    pub plant_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_known_codes() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!("ja".parse::<Language>(), Ok(Language::Ja));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn sort_order_parses_wire_names() {
        assert_eq!("insertion".parse::<SortOrder>(), Ok(SortOrder::Insertion));
        assert_eq!("by_date".parse::<SortOrder>(), Ok(SortOrder::ByDate));
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn form_ignores_unknown_fields() {
        let mut form = PlantForm::default();
        form.set_field("plant_name_en", "Rose".to_owned());
        form.set_field("csrf_token", "abc".to_owned());
        assert_eq!(form.plant_name_en.as_deref(), Some("Rose"));
        assert!(form.botanical_name.is_none());
    }
}
