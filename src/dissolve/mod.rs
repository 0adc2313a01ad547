pub mod dissolver;
pub mod error;
pub mod group;
pub mod repair;
