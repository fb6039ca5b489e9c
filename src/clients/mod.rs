pub mod catalog;

pub use catalog::{CatalogClient, CatalogTitle, ClientError, NewPrediction};
