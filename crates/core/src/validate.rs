//! Validation layer: required-field and date-format checks.
//!
//! Runs before any repository call. Create requires both languages of every
//! bilingual pair; update requires only the active language's fields because
//! the inactive language is read-only in the editing UI.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CreatePlant, Language, PlantForm, UpdatePlant};

/// File extensions accepted for plant images.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Whether the uploaded filename carries an accepted image extension.
pub fn allowed_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Parses a strict `YYYY-MM-DD` calendar date, naming `field` on failure.
pub fn parse_plant_date(raw: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    if raw.len() != 10 {
        return Err(ValidationError::InvalidDate { field: field.to_owned() });
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate { field: field.to_owned() })
}

fn required(value: Option<&str>, name: &str, missing: &mut Vec<String>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => {
            missing.push(name.to_owned());
            String::new()
        }
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

fn check_image(filename: Option<&str>, required: bool) -> Result<(), ValidationError> {
    match filename {
        None => {
            if required {
                Err(ValidationError::MissingImage)
            } else {
                Ok(())
            }
        }
        Some(name) if name.trim().is_empty() => {
            if required {
                Err(ValidationError::MissingImage)
            } else {
                Ok(())
            }
        }
        Some(name) if !allowed_image(name) => {
            Err(ValidationError::UnsupportedImage { filename: name.to_owned() })
        }
        Some(_) => Ok(()),
    }
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_plant_date(v, "plant_date").map(Some),
        None => Ok(None),
    }
}

/// Validates a create submission: both-language name/class/location pairs,
/// botanical name, and an image upload are all required.
pub fn validate_create(
    form: &PlantForm,
    image_filename: Option<&str>,
) -> Result<CreatePlant, ValidationError> {
    let mut missing = Vec::new();
    let plant_name_en = required(form.plant_name_en.as_deref(), "plant_name_en", &mut missing);
    let plant_name_ja = required(form.plant_name_ja.as_deref(), "plant_name_ja", &mut missing);
    let plant_class_en = required(form.plant_class_en.as_deref(), "plant_class_en", &mut missing);
    let plant_class_ja = required(form.plant_class_ja.as_deref(), "plant_class_ja", &mut missing);
    let location_en = required(form.location_en.as_deref(), "location_en", &mut missing);
    let location_ja = required(form.location_ja.as_deref(), "location_ja", &mut missing);
    let botanical_name = required(form.botanical_name.as_deref(), "botanical_name", &mut missing);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    check_image(image_filename, true)?;
    let plant_date = parse_optional_date(form.plant_date.as_deref())?;

    Ok(CreatePlant {
        plant_name_en,
        plant_name_ja,
        plant_class_en,
        plant_class_ja,
        location_en,
        location_ja,
        botanical_name,
        plant_date,
    })
}

/// Validates an update submission scoped to the active language.
///
/// The active language's name/class/location plus the botanical name are
/// required; everything else (the inactive language's fields, the date, a
/// replacement image) is optional and left untouched when absent.
pub fn validate_update(
    form: &PlantForm,
    lang: Language,
    image_filename: Option<&str>,
) -> Result<UpdatePlant, ValidationError> {
    let mut missing = Vec::new();
    let mut update = UpdatePlant::default();

    match lang {
        Language::En => {
            update.plant_name_en =
                Some(required(form.plant_name_en.as_deref(), "plant_name_en", &mut missing));
            update.plant_class_en =
                Some(required(form.plant_class_en.as_deref(), "plant_class_en", &mut missing));
            update.location_en =
                Some(required(form.location_en.as_deref(), "location_en", &mut missing));
            update.plant_name_ja = optional(form.plant_name_ja.as_deref());
            update.plant_class_ja = optional(form.plant_class_ja.as_deref());
            update.location_ja = optional(form.location_ja.as_deref());
        }
        Language::Ja => {
            update.plant_name_ja =
                Some(required(form.plant_name_ja.as_deref(), "plant_name_ja", &mut missing));
            update.plant_class_ja =
                Some(required(form.plant_class_ja.as_deref(), "plant_class_ja", &mut missing));
            update.location_ja =
                Some(required(form.location_ja.as_deref(), "location_ja", &mut missing));
            update.plant_name_en = optional(form.plant_name_en.as_deref());
            update.plant_class_en = optional(form.plant_class_en.as_deref());
            update.location_en = optional(form.location_en.as_deref());
        }
    }
    update.botanical_name =
        Some(required(form.botanical_name.as_deref(), "botanical_name", &mut missing));
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    check_image(image_filename, false)?;
    update.plant_date = parse_optional_date(form.plant_date.as_deref())?;

    Ok(update)
}
