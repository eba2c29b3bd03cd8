pub mod aggregation;
pub mod entities;
