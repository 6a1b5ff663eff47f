pub mod product;

pub use product::{Brand, NewProduct, Product, ProductChanges};
