pub mod analyticsdb;
pub mod db;
pub mod propertydb;
pub mod reportdb;
pub mod settingsdb;
pub mod userdb;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod memory;
