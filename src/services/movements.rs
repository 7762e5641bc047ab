use crate::domain::movement::NewMovement;
use crate::domain::types::{MovementId, ProductId};
use crate::dto::movements::MovementDto;
use crate::forms::movements::MovementForm;
use crate::repository::{MovementListQuery, MovementReader, MovementWriter, RepositoryError};

use super::{ServiceError, ServiceResult};

const MOVEMENT_NOT_FOUND: &str = "Movimiento no encontrado";
const UNKNOWN_PRODUCT: &str = "El producto especificado no existe";

pub fn list_movements<R>(repo: &R) -> ServiceResult<Vec<MovementDto>>
where
    R: MovementReader,
{
    match repo.list_movements(MovementListQuery::default()) {
        Ok(movements) => Ok(movements.into_iter().map(MovementDto::from).collect()),
        Err(e) => Err(ServiceError::storage("Failed to list movements", e)),
    }
}

pub fn show_movement<R>(movement_id: i32, repo: &R) -> ServiceResult<MovementDto>
where
    R: MovementReader,
{
    let Ok(movement_id) = MovementId::new(movement_id) else {
        return Err(ServiceError::NotFound(MOVEMENT_NOT_FOUND.to_string()));
    };

    match repo.get_movement_by_id(movement_id) {
        Ok(Some(movement)) => Ok(movement.into()),
        Ok(None) => Err(ServiceError::NotFound(MOVEMENT_NOT_FOUND.to_string())),
        Err(e) => Err(ServiceError::storage("Failed to get movement", e)),
    }
}

/// Movements of one product, newest first. An unknown product simply has
/// no movements.
pub fn list_product_movements<R>(product_id: i32, repo: &R) -> ServiceResult<Vec<MovementDto>>
where
    R: MovementReader,
{
    let Ok(product_id) = ProductId::new(product_id) else {
        return Ok(Vec::new());
    };

    match repo.list_movements(MovementListQuery::default().product(product_id)) {
        Ok(movements) => Ok(movements.into_iter().map(MovementDto::from).collect()),
        Err(e) => Err(ServiceError::storage("Failed to list product movements", e)),
    }
}

/// Validate a movement request and append it to the stock ledger.
///
/// Shape errors are reported before storage is touched. Product existence
/// and stock sufficiency are decided by the ledger transaction itself, under
/// the product row lock.
pub fn create_movement<R>(form: MovementForm, repo: &R) -> ServiceResult<MovementDto>
where
    R: MovementWriter,
{
    let movement: NewMovement = form.try_into()?;

    match repo.apply_movement(&movement) {
        Ok(created) => {
            log::info!(
                "Recorded {} of {} for product {}",
                created.kind,
                created.quantity,
                created.product_id
            );
            Ok(created.into())
        }
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound(UNKNOWN_PRODUCT.to_string())),
        Err(RepositoryError::InsufficientStock {
            available,
            requested,
        }) => {
            log::info!(
                "Rejected salida of {requested} for product {}: {available} available",
                movement.product_id
            );
            Err(ServiceError::InsufficientStock {
                available,
                requested,
            })
        }
        Err(e) => Err(ServiceError::storage("Failed to apply movement", e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::domain::types::MovementType;
    use crate::repository::test::TestRepository;

    fn form(product_id: ProductId, tipo: &str, cantidad: i32) -> MovementForm {
        MovementForm {
            producto_id: product_id.get(),
            tipo: tipo.to_string(),
            cantidad,
            motivo: String::new(),
        }
    }

    #[test]
    fn salida_within_stock_decrements() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 10, None);

        let movement = create_movement(form(product.id, "salida", 4), &repo).unwrap();

        assert_eq!(movement.tipo, MovementType::Salida);
        assert_eq!(movement.cantidad, 4);
        assert_eq!(movement.producto.as_ref().unwrap().stock, 6);
        assert_eq!(repo.stock_of(product.id), 6);
        assert_eq!(repo.ledger_sum(product.id), 6);
    }

    #[test]
    fn entrada_increments() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 6, None);

        create_movement(form(product.id, "entrada", 7), &repo).unwrap();

        assert_eq!(repo.stock_of(product.id), 13);
        assert_eq!(repo.ledger_sum(product.id), 13);
    }

    #[test]
    fn oversized_salida_changes_nothing() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 3, None);
        let before = repo.movement_count(product.id);

        let err = create_movement(form(product.id, "salida", 5), &repo).unwrap_err();

        assert_eq!(
            err,
            ServiceError::InsufficientStock {
                available: 3,
                requested: 5
            }
        );
        assert_eq!(repo.stock_of(product.id), 3);
        assert_eq!(repo.movement_count(product.id), before);
    }

    #[test]
    fn failed_salida_can_be_repeated_without_effect() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 1, None);

        for _ in 0..3 {
            let err = create_movement(form(product.id, "salida", 4), &repo).unwrap_err();
            assert!(matches!(err, ServiceError::InsufficientStock { .. }));
        }

        assert_eq!(repo.stock_of(product.id), 1);
        assert_eq!(repo.movement_count(product.id), 1);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let repo = TestRepository::new();
        let product_id = ProductId::new(999).unwrap();

        let err = create_movement(form(product_id, "entrada", 1), &repo).unwrap_err();

        assert_eq!(err, ServiceError::NotFound(UNKNOWN_PRODUCT.to_string()));
    }

    #[test]
    fn invalid_type_never_reaches_storage() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 5, None);
        let calls = repo.calls();
        let ledger_calls = repo.ledger_calls();

        let err = create_movement(form(product.id, "transferencia", 1), &repo).unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(repo.calls(), calls);
        assert_eq!(repo.ledger_calls(), ledger_calls);
    }

    #[test]
    fn non_positive_quantity_is_invalid() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 5, None);
        let ledger_calls = repo.ledger_calls();

        for cantidad in [0, -3] {
            let err = create_movement(form(product.id, "entrada", cantidad), &repo).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }

        assert_eq!(repo.ledger_calls(), ledger_calls);
        assert_eq!(repo.stock_of(product.id), 5);
    }

    #[test]
    fn concurrent_salidas_never_oversell() {
        let repo = Arc::new(TestRepository::new());
        let product = repo.seed_product("Martillo", 5, None);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let product_id = product.id;
                thread::spawn(move || create_movement(form(product_id, "salida", 5), repo.as_ref()))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(ServiceError::InsufficientStock { .. })))
            .count();

        assert_eq!(succeeded, 1);
        assert_eq!(rejected, 1);
        assert_eq!(repo.stock_of(product.id), 0);
        assert_eq!(repo.ledger_sum(product.id), 0);
    }

    #[test]
    fn concurrent_salidas_succeed_only_while_stock_lasts() {
        let repo = Arc::new(TestRepository::new());
        let product = repo.seed_product("Martillo", 10, None);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let product_id = product.id;
                thread::spawn(move || create_movement(form(product_id, "salida", 3), repo.as_ref()))
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| r.is_ok())
            .count();

        assert_eq!(succeeded, 3);
        assert_eq!(repo.stock_of(product.id), 1);
        assert_eq!(repo.movement_count(product.id), 4);
    }

    #[test]
    fn concurrent_mixed_movements_keep_ledger_consistent() {
        let repo = Arc::new(TestRepository::new());
        let product = repo.seed_product("Martillo", 20, None);

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let product_id = product.id;
                let tipo = if i % 2 == 0 { "entrada" } else { "salida" };
                thread::spawn(move || create_movement(form(product_id, tipo, 3), repo.as_ref()))
            })
            .collect();

        for handle in handles {
            let _ = handle.join().unwrap();
        }

        let stock = repo.stock_of(product.id);
        assert!(stock >= 0);
        assert_eq!(stock, repo.ledger_sum(product.id));
    }

    #[test]
    fn lists_product_movements_newest_first() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 4, None);
        let other = repo.seed_product("Clavo", 1, None);
        create_movement(form(product.id, "salida", 1), &repo).unwrap();
        create_movement(form(product.id, "entrada", 2), &repo).unwrap();

        let movements = list_product_movements(product.id.get(), &repo).unwrap();

        assert_eq!(movements.len(), 3);
        assert!(movements.iter().all(|m| m.producto_id == product.id.get()));
        assert_eq!(movements[0].tipo, MovementType::Entrada);
        assert_eq!(movements[0].cantidad, 2);
        assert_eq!(movements[2].motivo, "Stock inicial");
        assert_eq!(list_movements(&repo).unwrap().len(), 4);
        assert_eq!(list_product_movements(other.id.get(), &repo).unwrap().len(), 1);
    }

    #[test]
    fn movements_of_missing_product_are_empty() {
        let repo = TestRepository::new();
        repo.seed_product("Martillo", 2, None);

        assert!(list_product_movements(42, &repo).unwrap().is_empty());
        assert!(list_product_movements(0, &repo).unwrap().is_empty());
        assert!(list_product_movements(-3, &repo).unwrap().is_empty());
    }

    #[test]
    fn shows_single_movement() {
        let repo = TestRepository::new();
        let product = repo.seed_product("Martillo", 4, None);
        let created = create_movement(form(product.id, "salida", 1), &repo).unwrap();

        let shown = show_movement(created.id, &repo).unwrap();
        assert_eq!(shown.id, created.id);
        assert_eq!(shown.producto.unwrap().nombre, "Martillo");

        assert!(matches!(
            show_movement(0, &repo),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            show_movement(created.id + 100, &repo),
            Err(ServiceError::NotFound(_))
        ));
    }
}
