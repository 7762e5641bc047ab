use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<CategoryDto>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            nombre: value.name.into_inner(),
            descripcion: value.description,
            precio: value.price.get(),
            stock: value.stock.get(),
            categoria_id: value.category_id.map(|id| id.get()),
            categoria: value.category.map(CategoryDto::from),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::types::{ProductId, ProductPrice, ProductStock};

    fn product() -> Product {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Product {
            id: ProductId::new(7).unwrap(),
            name: "Tornillo".try_into().unwrap(),
            description: String::new(),
            price: ProductPrice::new(0.5).unwrap(),
            stock: ProductStock::new(40).unwrap(),
            category_id: None,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn omits_missing_category() {
        let json = serde_json::to_value(ProductDto::from(product())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["stock"], 40);
        assert!(json["categoria_id"].is_null());
        assert!(json.get("categoria").is_none());
    }
}
