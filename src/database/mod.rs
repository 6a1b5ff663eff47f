pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{is_record_not_found, DatabaseError, DatabaseManager};
pub use models::{Brand, NewProduct, Product, ProductChanges};
pub use repository::{PgProductRepository, ProductRepository};
