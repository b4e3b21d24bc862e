pub mod analyze;
pub mod complaints;
