pub mod collection;
pub mod payload;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::get as product_list;
pub use collection::post as product_create;
pub use record::delete as product_delete;
pub use record::get as product_get;
pub use record::patch as product_update;

pub(crate) const INVALID_PAYLOAD: &str = "Invalid product payload";
pub(crate) const NOT_FOUND: &str = "Product not found";
