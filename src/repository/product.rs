use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::movement::{INITIAL_STOCK_REASON, NewMovement};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{MovementQuantity, MovementType, ProductId};
use crate::models::category::Category as DbCategory;
use crate::models::product::{
    self as db_product, NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::movement::{append_movement, set_local_timeouts};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};

fn load_products(
    conn: &mut PgConnection,
    id: Option<ProductId>,
    query: ProductListQuery,
) -> RepositoryResult<Vec<Product>> {
    use crate::schema::{categorias, productos};

    let mut items = productos::table
        .left_join(categorias::table)
        .select((productos::all_columns, categorias::all_columns.nullable()))
        .into_boxed();

    if let Some(id) = id {
        items = items.filter(productos::id.eq(id.get()));
    }

    if let Some(category_id) = query.category_id {
        items = items.filter(productos::categoria_id.eq(category_id.get()));
    }

    let items = items
        .order((productos::nombre.asc(), productos::id.asc()))
        .load::<(DbProduct, Option<DbCategory>)>(conn)?
        .into_iter()
        .map(|(product, category)| db_product::into_domain(product, category))
        .collect::<Result<Vec<Product>, _>>()?;

    Ok(items)
}

fn load_product(conn: &mut PgConnection, id: ProductId) -> RepositoryResult<Option<Product>> {
    Ok(load_products(conn, Some(id), ProductListQuery::default())?
        .into_iter()
        .next())
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;
        load_products(&mut conn, None, query)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;
        load_product(&mut conn, id)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::productos;

        let mut conn = self.conn()?;
        let timeouts = self.timeouts;

        let id = conn
            .build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;

                let id = diesel::insert_into(productos::table)
                    .values(DbNewProduct::from(product))
                    .returning(productos::id)
                    .get_result::<i32>(conn)?;
                let id = ProductId::new(id)?;

                if product.initial_stock.get() > 0 {
                    let opening = NewMovement {
                        product_id: id,
                        kind: MovementType::Entrada,
                        quantity: MovementQuantity::new(product.initial_stock.get())?,
                        reason: INITIAL_STOCK_REASON.to_string(),
                    };
                    append_movement(conn, &opening)?;
                }

                Ok(id)
            })?;

        load_product(&mut conn, id)?.ok_or(RepositoryError::NotFound)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<Product> {
        use crate::schema::productos;

        let mut conn = self.conn()?;
        let timeouts = self.timeouts;
        let changes: ProductChangeset = update.clone().into();

        conn.build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;

                let updated = diesel::update(productos::table.find(id.get()))
                    .set((changes, productos::updated_at.eq(diesel::dsl::now)))
                    .execute(conn)?;

                if updated == 0 {
                    return Err(RepositoryError::NotFound);
                }
                Ok(())
            })?;

        load_product(&mut conn, id)?.ok_or(RepositoryError::NotFound)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        use crate::schema::{movimientos_inventario, productos};

        let mut conn = self.conn()?;
        let timeouts = self.timeouts;

        conn.build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;

                productos::table
                    .find(id.get())
                    .select(productos::id)
                    .for_update()
                    .first::<i32>(conn)
                    .optional()?
                    .ok_or(RepositoryError::NotFound)?;

                let movements = movimientos_inventario::table
                    .filter(movimientos_inventario::producto_id.eq(id.get()))
                    .count()
                    .get_result::<i64>(conn)?;

                if movements > 0 {
                    return Err(RepositoryError::Conflict(format!(
                        "product {id} has {movements} ledger movement(s)"
                    )));
                }

                diesel::delete(productos::table.find(id.get())).execute(conn)?;
                Ok(())
            })
    }
}
