use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::movement::{Movement, NewMovement};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{CategoryId, MovementId, ProductId};

pub mod category;
pub mod errors;
pub mod movement;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Bounds applied with `SET LOCAL` to every ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTimeouts {
    /// Maximum wait for the product row lock, in milliseconds.
    pub lock_timeout_ms: u64,
    /// Maximum duration of any statement, in milliseconds.
    pub statement_timeout_ms: u64,
}

impl Default for LedgerTimeouts {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
            statement_timeout_ms: 15_000,
        }
    }
}

/// Repository implementation backed by Diesel and PostgreSQL.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    timeouts: LedgerTimeouts,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            timeouts: LedgerTimeouts::default(),
        }
    }

    /// Override the lock and statement timeouts of ledger transactions.
    pub fn with_timeouts(mut self, timeouts: LedgerTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products of a category.
    pub category_id: Option<CategoryId>,
}

impl ProductListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Query parameters used when listing movements.
#[derive(Debug, Clone, Default)]
pub struct MovementListQuery {
    /// Restrict to movements of a product.
    pub product_id: Option<ProductId>,
}

impl MovementListQuery {
    pub fn product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List every category ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return it.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Update name and description. Fails with [`RepositoryError::NotFound`] when absent.
    fn update_category(&self, id: CategoryId, update: &CategoryUpdate)
    -> RepositoryResult<Category>;
    /// Delete a category.
    ///
    /// Fails with [`RepositoryError::Conflict`] while any product references it.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products, with their category, ordered by name.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product, with its category, by identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
///
/// None of these change stock after creation; see [`MovementWriter`].
pub trait ProductWriter {
    /// Insert a product. Positive initial stock is recorded as an `entrada`
    /// movement in the same transaction.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Update the editable columns of a product.
    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<Product>;
    /// Delete a product.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the ledger holds movements for it.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<()>;
}

/// Read-only operations over the append-only movement ledger.
pub trait MovementReader {
    /// List movements newest first.
    fn list_movements(&self, query: MovementListQuery) -> RepositoryResult<Vec<Movement>>;
    /// Retrieve a movement with its product snapshot.
    fn get_movement_by_id(&self, id: MovementId) -> RepositoryResult<Option<Movement>>;
}

/// The stock ledger.
pub trait MovementWriter {
    /// Atomically append `movement` and apply its delta to the product stock.
    ///
    /// Either both the movement row and the stock update commit, or neither
    /// does. Fails with [`RepositoryError::NotFound`] for an unknown product
    /// and [`RepositoryError::InsufficientStock`] when a salida exceeds the
    /// stock read under the row lock.
    fn apply_movement(&self, movement: &NewMovement) -> RepositoryResult<Movement>;
}
