pub mod error;
pub mod migration;
pub mod params;
