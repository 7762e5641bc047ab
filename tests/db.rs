use diesel::prelude::*;
use inventario::schema::productos;

mod common;

#[test]
fn test_creates_and_removes_database() {
    let Some(test_db) = common::TestDb::new() else {
        return;
    };
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn stock_check_constraint_rejects_negative_values() {
    let Some(test_db) = common::TestDb::new() else {
        return;
    };
    let mut conn = test_db.pool().get().expect("connection");

    let id: i32 = diesel::insert_into(productos::table)
        .values((
            productos::nombre.eq("Martillo"),
            productos::precio.eq(5.0_f64),
            productos::stock.eq(1),
        ))
        .returning(productos::id)
        .get_result(&mut conn)
        .expect("insert product");

    let result = diesel::update(productos::table.find(id))
        .set(productos::stock.eq(productos::stock - 2))
        .execute(&mut conn);

    assert!(matches!(
        result,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::CheckViolation,
            _
        ))
    ));

    let stock: i32 = productos::table
        .find(id)
        .select(productos::stock)
        .first(&mut conn)
        .expect("stock");
    assert_eq!(stock, 1);
}

#[test]
fn movement_type_is_constrained() {
    let Some(test_db) = common::TestDb::new() else {
        return;
    };
    let mut conn = test_db.pool().get().expect("connection");

    let id: i32 = diesel::insert_into(productos::table)
        .values((productos::nombre.eq("Clavo"), productos::precio.eq(0.1_f64)))
        .returning(productos::id)
        .get_result(&mut conn)
        .expect("insert product");

    let result = diesel::sql_query(format!(
        "INSERT INTO movimientos_inventario (producto_id, tipo, cantidad) VALUES ({id}, 'ajuste', 1)"
    ))
    .execute(&mut conn);

    assert!(result.is_err());
}
