pub mod propertydtos;
pub mod reportdtos;
pub mod settingsdtos;
pub mod userdtos;
