pub mod propertymodel;
pub mod reportmodel;
pub mod settingsmodel;
pub mod usermodel;
