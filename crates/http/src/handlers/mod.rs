pub mod plants;
pub mod translate;
pub mod uploads;
