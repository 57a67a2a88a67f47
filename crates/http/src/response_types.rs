//! JSON response shapes.

use chrono::NaiveDate;
use herbarium_core::{Language, Plant};
use serde::Serialize;

/// Wire shape of a plant record. `location` is rendered in the requested
/// display language; every other bilingual field ships both sides.
#[derive(Debug, Clone, Serialize)]
pub struct PlantResponse {
    pub plant_id: i64,
    pub plant_name_en: String,
    pub plant_name_ja: String,
    pub plant_class_en: String,
    pub plant_class_ja: String,
    pub botanical_name: String,
    pub location: String,
    pub plant_date: NaiveDate,
    pub image_path: String,
}

impl PlantResponse {
    pub fn from_plant(plant: Plant, lang: Language) -> Self {
        let location = match lang {
            Language::En => plant.location_en,
            Language::Ja => plant.location_ja,
        };
        Self {
            plant_id: plant.plant_id,
            plant_name_en: plant.plant_name_en,
            plant_name_ja: plant.plant_name_ja,
            plant_class_en: plant.plant_class_en,
            plant_class_ja: plant.plant_class_ja,
            botanical_name: plant.botanical_name,
            location,
            plant_date: plant.plant_date,
            image_path: plant.image_path,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationResponse {
    pub text_en: String,
    pub text_ja: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plant() -> Plant {
        Plant {
            plant_id: 1,
            plant_name_en: "Rose".to_owned(),
            plant_name_ja: "バラ".to_owned(),
            plant_class_en: "Flower".to_owned(),
            plant_class_ja: "花".to_owned(),
            location_en: "Garden".to_owned(),
            location_ja: "庭".to_owned(),
            botanical_name: "Rosa rubiginosa".to_owned(),
            plant_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            image_path: "abc.jpg".to_owned(),
        }
    }

    #[test]
    fn location_follows_requested_language() {
        let en = PlantResponse::from_plant(sample_plant(), Language::En);
        assert_eq!(en.location, "Garden");
        let ja = PlantResponse::from_plant(sample_plant(), Language::Ja);
        assert_eq!(ja.location, "庭");
        assert_eq!(ja.plant_name_en, "Rose");
    }

    #[test]
    fn plant_date_serializes_as_iso_date() {
        let response = PlantResponse::from_plant(sample_plant(), Language::En);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["plant_date"], "2024-04-15");
        assert_eq!(json["location"], "Garden");
    }
}
