//! Whole-record plant operations.
//!
//! Dimension rows are shared resources and commit independently of the
//! plant row; the image write is coupled to the plant insert by a
//! compensating delete, since the filesystem is outside the relational
//! transaction.

use std::sync::Arc;

use herbarium_core::{validate, Language, Plant, PlantForm, SortOrder};
use herbarium_storage::{Dimension, ImageStore, Storage, StorageError};

use crate::error::ServiceError;

/// An uploaded image: the client's suggested filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct PlantService {
    storage: Arc<Storage>,
    images: Arc<ImageStore>,
}

impl PlantService {
    pub fn new(storage: Arc<Storage>, images: Arc<ImageStore>) -> Self {
        Self { storage, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Validates, resolves dimensions, stores the image, and inserts the
    /// plant row. On insert failure the freshly stored artifact is deleted
    /// so no orphaned file survives a rejected create.
    pub fn create(
        &self,
        form: &PlantForm,
        image: Option<ImageUpload>,
    ) -> Result<Plant, ServiceError> {
        let input = validate::validate_create(form, image.as_ref().map(|i| i.filename.as_str()))?;
        let Some(image) = image else {
            return Err(herbarium_core::ValidationError::MissingImage.into());
        };

        let plant_name_id = self.storage.resolve_dimension(
            Dimension::PlantName,
            &input.plant_name_en,
            &input.plant_name_ja,
        )?;
        let family_id = self.storage.resolve_dimension(
            Dimension::Family,
            &input.plant_class_en,
            &input.plant_class_ja,
        )?;
        let location_id = self.storage.resolve_dimension(
            Dimension::Location,
            &input.location_en,
            &input.location_ja,
        )?;

        let image_path = self.images.store(&image.filename, &image.bytes)?;
        let plant_date = input.plant_date.unwrap_or_else(|| chrono::Local::now().date_naive());

        match self.storage.insert_plant(
            plant_name_id,
            family_id,
            location_id,
            &input.botanical_name,
            &image_path,
            plant_date,
        ) {
            Ok(plant_id) => self.fetch_row(plant_id),
            Err(err) => {
                if let Err(rm_err) = self.images.remove(&image_path) {
                    tracing::warn!(
                        key = %image_path,
                        error = %rm_err,
                        "failed to clean up artifact after rejected create"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Partial update scoped to the active language. Supplied fields are
    /// validated and applied; absent fields keep their stored values.
    ///
    /// A replacement image follows the same compensation rules as create;
    /// the previous artifact is removed only after the row commits.
    pub fn update(
        &self,
        plant_id: i64,
        lang: Language,
        form: &PlantForm,
        image: Option<ImageUpload>,
    ) -> Result<Plant, ServiceError> {
        let input =
            validate::validate_update(form, lang, image.as_ref().map(|i| i.filename.as_str()))?;
        let current = self
            .storage
            .get_plant(plant_id)?
            .ok_or(StorageError::NotFound { entity: "plant", id: plant_id })?;

        let plant_name_id = self.storage.resolve_dimension(
            Dimension::PlantName,
            input.plant_name_en.as_deref().unwrap_or(&current.plant_name_en),
            input.plant_name_ja.as_deref().unwrap_or(&current.plant_name_ja),
        )?;
        let family_id = self.storage.resolve_dimension(
            Dimension::Family,
            input.plant_class_en.as_deref().unwrap_or(&current.plant_class_en),
            input.plant_class_ja.as_deref().unwrap_or(&current.plant_class_ja),
        )?;
        let location_id = self.storage.resolve_dimension(
            Dimension::Location,
            input.location_en.as_deref().unwrap_or(&current.location_en),
            input.location_ja.as_deref().unwrap_or(&current.location_ja),
        )?;

        let new_key = match image {
            Some(upload) => Some(self.images.store(&upload.filename, &upload.bytes)?),
            None => None,
        };
        let image_path = new_key.clone().unwrap_or_else(|| current.image_path.clone());
        let botanical_name =
            input.botanical_name.as_deref().unwrap_or(&current.botanical_name);
        let plant_date = input.plant_date.unwrap_or(current.plant_date);

        match self.storage.update_plant(
            plant_id,
            plant_name_id,
            family_id,
            location_id,
            botanical_name,
            &image_path,
            plant_date,
        ) {
            Ok(()) => {
                if new_key.is_some() && image_path != current.image_path {
                    if let Err(rm_err) = self.images.remove(&current.image_path) {
                        tracing::warn!(
                            key = %current.image_path,
                            error = %rm_err,
                            "failed to remove replaced artifact"
                        );
                    }
                }
                self.fetch_row(plant_id)
            }
            Err(err) => {
                if let Some(key) = new_key {
                    if let Err(rm_err) = self.images.remove(&key) {
                        tracing::warn!(
                            key = %key,
                            error = %rm_err,
                            "failed to clean up artifact after rejected update"
                        );
                    }
                }
                Err(err.into())
            }
        }
    }

    /// Removes the plant row only. Dimension rows are shared, and artifact
    /// cleanup on delete is intentionally not performed.
    pub fn delete(&self, plant_id: i64) -> Result<(), ServiceError> {
        self.storage.delete_plant(plant_id)?;
        Ok(())
    }

    pub fn get(&self, plant_id: i64) -> Result<Plant, ServiceError> {
        self.fetch_row(plant_id)
    }

    pub fn list(&self, sort: SortOrder) -> Result<Vec<Plant>, ServiceError> {
        Ok(self.storage.list_plants(sort)?)
    }

    pub fn search(&self, query: &str, lang: Language) -> Result<Vec<Plant>, ServiceError> {
        Ok(self.storage.search_plants(query, lang)?)
    }

    pub fn fetch_image(&self, key: &str) -> Result<Vec<u8>, ServiceError> {
        Ok(self.images.fetch(key)?)
    }

    fn fetch_row(&self, plant_id: i64) -> Result<Plant, ServiceError> {
        Ok(self
            .storage
            .get_plant(plant_id)?
            .ok_or(StorageError::NotFound { entity: "plant", id: plant_id })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_service() -> (PlantService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::new(&temp_dir.path().join("test.db")).unwrap());
        let images = Arc::new(ImageStore::new(temp_dir.path().join("uploads")).unwrap());
        (PlantService::new(storage, images), temp_dir)
    }

    fn rose_form() -> PlantForm {
        let mut form = PlantForm::default();
        form.set_field("plant_name_en", "Rose".to_owned());
        form.set_field("plant_name_ja", "バラ".to_owned());
        form.set_field("plant_class_en", "Flower".to_owned());
        form.set_field("plant_class_ja", "花".to_owned());
        form.set_field("location_en", "Garden".to_owned());
        form.set_field("location_ja", "庭".to_owned());
        form.set_field("botanical_name", "Rosa rubiginosa".to_owned());
        form.set_field("plant_date", "2024-04-15".to_owned());
        form
    }

    fn upload(name: &str) -> Option<ImageUpload> {
        Some(ImageUpload { filename: name.to_owned(), bytes: b"fake image bytes".to_vec() })
    }

    fn artifact_count(service: &PlantService) -> usize {
        std::fs::read_dir(service.images().root()).unwrap().count()
    }

    #[test]
    fn create_persists_full_record() {
        let (service, _temp_dir) = create_test_service();
        let plant = service.create(&rose_form(), upload("rose.jpg")).unwrap();
        assert_eq!(plant.plant_name_ja, "バラ");
        assert_eq!(plant.location_en, "Garden");
        assert_eq!(plant.plant_date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        assert!(plant.image_path.ends_with(".jpg"));
        assert_eq!(service.fetch_image(&plant.image_path).unwrap(), b"fake image bytes");
    }

    #[test]
    fn create_reuses_shared_location_pair() {
        let (service, _temp_dir) = create_test_service();
        let rose = service.create(&rose_form(), upload("rose.jpg")).unwrap();

        let mut lily = rose_form();
        lily.set_field("plant_name_en", "Lily".to_owned());
        lily.set_field("plant_name_ja", "ユリ".to_owned());
        lily.set_field("botanical_name", "Lilium candidum".to_owned());
        let lily = service.create(&lily, upload("lily.jpg")).unwrap();

        // Same Garden/庭 pair resolves to the same location row.
        assert_eq!(rose.location_en, lily.location_en);
        assert_eq!(rose.location_ja, lily.location_ja);
        assert_ne!(rose.plant_id, lily.plant_id);
    }

    #[test]
    fn create_missing_fields_writes_nothing() {
        let (service, _temp_dir) = create_test_service();
        let mut form = rose_form();
        form.location_ja = None;
        let err = service.create(&form, upload("rose.jpg")).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list(SortOrder::Insertion).unwrap().is_empty());
        assert_eq!(artifact_count(&service), 0);
    }

    #[test]
    fn create_invalid_date_names_the_field() {
        let (service, _temp_dir) = create_test_service();
        let mut form = rose_form();
        form.set_field("plant_date", "2024-13-40".to_owned());
        let err = service.create(&form, upload("rose.jpg")).unwrap_err();
        assert!(err.to_string().contains("plant_date"), "error was: {err}");
        assert!(service.list(SortOrder::Insertion).unwrap().is_empty());
    }

    #[test]
    fn duplicate_botanical_name_removes_orphaned_artifact() {
        let (service, _temp_dir) = create_test_service();
        service.create(&rose_form(), upload("rose.jpg")).unwrap();

        let mut dup = rose_form();
        dup.set_field("plant_name_en", "Second Rose".to_owned());
        dup.set_field("plant_name_ja", "二番目のバラ".to_owned());
        let err = service.create(&dup, upload("dup.jpg")).unwrap_err();
        assert!(err.is_conflict());

        assert_eq!(service.list(SortOrder::Insertion).unwrap().len(), 1);
        // Compensation deleted the second upload.
        assert_eq!(artifact_count(&service), 1);
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let (service, _temp_dir) = create_test_service();
        let before = service.create(&rose_form(), upload("rose.jpg")).unwrap();

        let mut form = rose_form();
        form.set_field("plant_date", "2024-06-01".to_owned());
        let after = service.update(before.plant_id, Language::En, &form, None).unwrap();

        assert_eq!(after.plant_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(after.plant_name_en, before.plant_name_en);
        assert_eq!(after.plant_name_ja, before.plant_name_ja);
        assert_eq!(after.botanical_name, before.botanical_name);
        assert_eq!(after.image_path, before.image_path);
    }

    #[test]
    fn update_replacement_image_retires_old_artifact() {
        let (service, _temp_dir) = create_test_service();
        let before = service.create(&rose_form(), upload("rose.jpg")).unwrap();

        let mut replacement = upload("better.png");
        if let Some(img) = replacement.as_mut() {
            img.bytes = b"better bytes".to_vec();
        }
        let after = service
            .update(before.plant_id, Language::En, &rose_form(), replacement)
            .unwrap();

        assert_ne!(after.image_path, before.image_path);
        assert_eq!(service.fetch_image(&after.image_path).unwrap(), b"better bytes");
        assert!(service.fetch_image(&before.image_path).is_err());
        assert_eq!(artifact_count(&service), 1);
    }

    #[test]
    fn update_missing_plant_is_not_found() {
        let (service, _temp_dir) = create_test_service();
        let err = service.update(404, Language::En, &rose_form(), None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_keeps_dimensions_and_artifact() {
        let (service, _temp_dir) = create_test_service();
        let rose = service.create(&rose_form(), upload("rose.jpg")).unwrap();

        let mut lily = rose_form();
        lily.set_field("plant_name_en", "Lily".to_owned());
        lily.set_field("plant_name_ja", "ユリ".to_owned());
        lily.set_field("botanical_name", "Lilium candidum".to_owned());
        let lily = service.create(&lily, upload("lily.jpg")).unwrap();

        service.delete(rose.plant_id).unwrap();

        assert!(service.get(rose.plant_id).is_err());
        let survivor = service.get(lily.plant_id).unwrap();
        assert_eq!(survivor.location_en, "Garden");
        // Image cleanup on delete is out of scope; the artifact stays.
        assert!(service.fetch_image(&rose.image_path).is_ok());
    }

    #[test]
    fn delete_missing_plant_is_not_found() {
        let (service, _temp_dir) = create_test_service();
        let err = service.delete(404).unwrap_err();
        assert!(err.is_not_found());
    }
}
