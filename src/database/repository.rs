use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewProduct, Product, ProductChanges};

/// Storage contract for the product catalog.
///
/// Update and delete report a missing row as [`DatabaseError::RecordNotFound`]
/// so callers can classify it without knowing the backing store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, DatabaseError>;

    async fn create_product(&self, input: NewProduct) -> Result<Product, DatabaseError>;

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Product, DatabaseError>;

    async fn delete_product(&self, id: &str) -> Result<(), DatabaseError>;
}

// `price` travels as text in both directions so no float ever touches it.
const PRODUCT_COLUMNS: &str = "id, gear_id, title, description, brand, category, \
     price::text AS price, images, stock, created_at, updated_at";

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!("SELECT {} FROM products ORDER BY created_at ASC, id ASC", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, DatabaseError> {
        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO products (id, gear_id, title, description, brand, category, price, images, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7::numeric, $8, $9) \
             RETURNING {}",
            PRODUCT_COLUMNS
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&id)
            .bind(&input.gear_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.brand)
            .bind(&input.category)
            .bind(&input.price)
            .bind(&input.images)
            .bind(input.stock)
            .fetch_one(&self.pool)
            .await?;

        debug!("Inserted product {}", product.id);
        Ok(product)
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<Product, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE products SET updated_at = now()");

        if let Some(gear_id) = changes.gear_id {
            builder.push(", gear_id = ").push_bind(gear_id);
        }
        if let Some(title) = changes.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = changes.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(brand) = changes.brand {
            builder.push(", brand = ").push_bind(brand);
        }
        if let Some(category) = changes.category {
            builder.push(", category = ").push_bind(category);
        }
        if let Some(price) = changes.price {
            builder.push(", price = ").push_bind(price).push("::numeric");
        }
        if let Some(images) = changes.images {
            builder.push(", images = ").push_bind(images);
        }
        if let Some(stock) = changes.stock {
            builder.push(", stock = ").push_bind(stock);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());
        builder.push(" RETURNING ").push(PRODUCT_COLUMNS);

        builder
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::RecordNotFound(id.to_string()))
    }

    async fn delete_product(&self, id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }
}
