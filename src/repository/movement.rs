use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::movement::{Movement, NewMovement};
use crate::domain::types::{MovementId, ProductStock};
use crate::models::movement::{self as db_movement, MovementRow, NewMovement as DbNewMovement};
use crate::repository::{
    DieselRepository, LedgerTimeouts, MovementListQuery, MovementReader, MovementWriter,
    RepositoryError, RepositoryResult,
};

/// Bound lock waits and statements for the rest of the current transaction.
pub(crate) fn set_local_timeouts(
    conn: &mut PgConnection,
    timeouts: LedgerTimeouts,
) -> RepositoryResult<()> {
    // SET does not accept bind parameters; both values are integers.
    diesel::sql_query(format!(
        "SET LOCAL lock_timeout = {}",
        timeouts.lock_timeout_ms
    ))
    .execute(conn)?;
    diesel::sql_query(format!(
        "SET LOCAL statement_timeout = {}",
        timeouts.statement_timeout_ms
    ))
    .execute(conn)?;
    Ok(())
}

/// Ledger write. Must run inside an open transaction.
///
/// Locks the product row, re-validates the movement against the locked
/// stock, inserts the movement and applies the delta. Returns the new
/// movement id.
pub(crate) fn append_movement(
    conn: &mut PgConnection,
    movement: &NewMovement,
) -> RepositoryResult<i32> {
    use crate::schema::{movimientos_inventario, productos};

    let product_id = movement.product_id.get();

    let current = productos::table
        .find(product_id)
        .select(productos::stock)
        .for_update()
        .first::<i32>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    let next = movement.apply_to(ProductStock::new(current)?)?;

    let movement_id = diesel::insert_into(movimientos_inventario::table)
        .values(DbNewMovement::from(movement))
        .returning(movimientos_inventario::id)
        .get_result::<i32>(conn)?;

    // Delta update: the row lock and CHECK (stock >= 0) both guard this write.
    let updated = diesel::update(productos::table.find(product_id))
        .set((
            productos::stock.eq(productos::stock + movement.delta()),
            productos::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;

    if updated != 1 {
        return Err(RepositoryError::NotFound);
    }

    log::debug!(
        "Applied {} of {} to product {product_id}: stock {current} -> {next}",
        movement.kind,
        movement.quantity
    );

    Ok(movement_id)
}

fn load_movements(
    conn: &mut PgConnection,
    id: Option<i32>,
    query: MovementListQuery,
) -> RepositoryResult<Vec<Movement>> {
    use crate::schema::{categorias, movimientos_inventario, productos};

    let mut items = movimientos_inventario::table
        .left_join(productos::table.left_join(categorias::table))
        .select((
            movimientos_inventario::all_columns,
            productos::all_columns.nullable(),
            categorias::all_columns.nullable(),
        ))
        .into_boxed();

    if let Some(id) = id {
        items = items.filter(movimientos_inventario::id.eq(id));
    }

    if let Some(product_id) = query.product_id {
        items = items.filter(movimientos_inventario::producto_id.eq(product_id.get()));
    }

    let items = items
        .order((
            movimientos_inventario::created_at.desc(),
            movimientos_inventario::id.desc(),
        ))
        .load::<MovementRow>(conn)?
        .into_iter()
        .map(db_movement::into_domain)
        .collect::<Result<Vec<Movement>, _>>()?;

    Ok(items)
}

impl MovementReader for DieselRepository {
    fn list_movements(&self, query: MovementListQuery) -> RepositoryResult<Vec<Movement>> {
        let mut conn = self.conn()?;
        load_movements(&mut conn, None, query)
    }

    fn get_movement_by_id(&self, id: MovementId) -> RepositoryResult<Option<Movement>> {
        let mut conn = self.conn()?;
        let movement = load_movements(&mut conn, Some(id.get()), MovementListQuery::default())?;
        Ok(movement.into_iter().next())
    }
}

impl MovementWriter for DieselRepository {
    fn apply_movement(&self, movement: &NewMovement) -> RepositoryResult<Movement> {
        let mut conn = self.conn()?;
        let timeouts = self.timeouts;

        let movement_id = conn
            .build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;
                append_movement(conn, movement)
            })?;

        // Read back after commit so the product snapshot reflects the new stock.
        let created = load_movements(&mut conn, Some(movement_id), MovementListQuery::default())
            .and_then(|items| items.into_iter().next().ok_or(RepositoryError::NotFound));

        if let Err(e) = &created {
            log::error!("Movement {movement_id} was committed but could not be read back: {e}");
        }
        created
    }
}
