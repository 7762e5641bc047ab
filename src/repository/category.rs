use diesel::prelude::*;

use crate::domain::category::{Category, CategoryUpdate, NewCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::movement::set_local_timeouts;
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categorias;

        let mut conn = self.conn()?;

        let items = categorias::table
            .order((categorias::nombre.asc(), categorias::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categorias;

        let mut conn = self.conn()?;

        let category = categorias::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categorias;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categorias::table)
            .values(db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        update: &CategoryUpdate,
    ) -> RepositoryResult<Category> {
        use crate::schema::categorias;

        let mut conn = self.conn()?;
        let timeouts = self.timeouts;
        let changes: DbNewCategory = update.clone().into();

        let updated = conn
            .build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;

                diesel::update(categorias::table.find(id.get()))
                    .set((changes, categorias::updated_at.eq(diesel::dsl::now)))
                    .get_result::<DbCategory>(conn)
                    .optional()?
                    .ok_or(RepositoryError::NotFound)
            })?;

        Ok(updated.try_into()?)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        use crate::schema::{categorias, productos};

        let mut conn = self.conn()?;
        let timeouts = self.timeouts;

        conn.build_transaction()
            .read_committed()
            .run::<_, RepositoryError, _>(|conn| {
                set_local_timeouts(conn, timeouts)?;

                // Locking the category blocks concurrent inserts that reference it.
                categorias::table
                    .find(id.get())
                    .select(categorias::id)
                    .for_update()
                    .first::<i32>(conn)
                    .optional()?
                    .ok_or(RepositoryError::NotFound)?;

                let referencing = productos::table
                    .filter(productos::categoria_id.eq(id.get()))
                    .count()
                    .get_result::<i64>(conn)?;

                if referencing > 0 {
                    return Err(RepositoryError::Conflict(format!(
                        "category {id} is referenced by {referencing} product(s)"
                    )));
                }

                diesel::delete(categorias::table.find(id.get())).execute(conn)?;
                Ok(())
            })
    }
}
