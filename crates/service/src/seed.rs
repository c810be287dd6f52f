//! Deterministic catalog used to populate an empty store.
//!
//! Runs once at startup; the guard is "any category exists". Categories,
//! products and the test user are committed as three separate batches so the
//! ids assigned to categories are known before products reference them.

use argon2::{password_hash::{PasswordHasher, SaltString}, Argon2};
use models::{category, product, user};
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::{info, instrument};

use crate::errors::ServiceError;

pub struct SeedCategory {
    pub name: &'static str,
    pub description: &'static str,
}

pub struct SeedProduct {
    pub name: &'static str,
    pub description: &'static str,
    /// price in cents
    pub price_cents: i64,
    pub stock: i32,
    pub image_url: &'static str,
    /// index into `CATEGORIES`
    pub category: usize,
}

pub const CATEGORIES: &[SeedCategory] = &[
    SeedCategory { name: "Eletrônicos", description: "Produtos eletrônicos e gadgets" },
    SeedCategory { name: "Livros", description: "Livros físicos e digitais" },
    SeedCategory { name: "Roupas", description: "Vestuário masculino e feminino" },
    SeedCategory { name: "Casa e Decoração", description: "Itens para casa e decoração" },
];

pub const PRODUCTS: &[SeedProduct] = &[
    SeedProduct { name: "Smartphone XYZ", description: "Smartphone com 128GB de armazenamento", price_cents: 199_999, stock: 50, image_url: "https://via.placeholder.com/300x300?text=Smartphone", category: 0 },
    SeedProduct { name: "Notebook Pro", description: "Notebook i7, 16GB RAM, 512GB SSD", price_cents: 459_900, stock: 30, image_url: "https://via.placeholder.com/300x300?text=Notebook", category: 0 },
    SeedProduct { name: "Fone Bluetooth", description: "Fone de ouvido wireless com cancelamento de ruído", price_cents: 29_990, stock: 100, image_url: "https://via.placeholder.com/300x300?text=Fone", category: 0 },
    SeedProduct { name: "Clean Code", description: "Livro sobre código limpo por Robert Martin", price_cents: 8_990, stock: 75, image_url: "https://via.placeholder.com/300x300?text=CleanCode", category: 1 },
    SeedProduct { name: "Design Patterns", description: "Padrões de projeto em programação", price_cents: 9_500, stock: 60, image_url: "https://via.placeholder.com/300x300?text=DesignPatterns", category: 1 },
    SeedProduct { name: "Camiseta Básica", description: "Camiseta 100% algodão", price_cents: 4_990, stock: 200, image_url: "https://via.placeholder.com/300x300?text=Camiseta", category: 2 },
    SeedProduct { name: "Calça Jeans", description: "Calça jeans slim fit", price_cents: 15_990, stock: 150, image_url: "https://via.placeholder.com/300x300?text=Jeans", category: 2 },
    SeedProduct { name: "Luminária LED", description: "Luminária de mesa com controle de intensidade", price_cents: 12_990, stock: 80, image_url: "https://via.placeholder.com/300x300?text=Luminaria", category: 3 },
    SeedProduct { name: "Quadro Decorativo", description: "Quadro abstrato 60x40cm", price_cents: 7_990, stock: 45, image_url: "https://via.placeholder.com/300x300?text=Quadro", category: 3 },
];

pub const USER_NAME: &str = "João Silva";
pub const USER_EMAIL: &str = "joao@exemplo.com";
pub const USER_PHONE: &str = "(11) 98765-4321";
const USER_PASSWORD: &str = "senha-temporaria-123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Store already had categories; nothing written.
    Skipped,
    Seeded { categories: usize, products: usize, users: usize },
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::db(format!("password hash failed: {e}")))
}

/// Populate an empty store. Idempotent: a second call is a no-op.
#[instrument(skip(db))]
pub async fn initialize(db: &DatabaseConnection) -> Result<SeedOutcome, ServiceError> {
    if category::Entity::find().count(db).await? > 0 {
        info!("seed_skipped_store_not_empty");
        return Ok(SeedOutcome::Skipped);
    }

    let txn = db.begin().await?;
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for c in CATEGORIES {
        category_ids.push(category::create(&txn, c.name, c.description).await?.id);
    }
    txn.commit().await?;

    let txn = db.begin().await?;
    for p in PRODUCTS {
        let category_id = category_ids
            .get(p.category)
            .copied()
            .ok_or_else(|| ServiceError::Validation(format!("seed product {} has no category", p.name)))?;
        let fields = product::ProductFields {
            name: p.name,
            description: p.description,
            price: Decimal::new(p.price_cents, 2),
            stock: p.stock,
            image_url: p.image_url,
            category_id,
        };
        product::create(&txn, &fields).await?;
    }
    txn.commit().await?;

    let password_hash = hash_password(USER_PASSWORD)?;
    let txn = db.begin().await?;
    user::create(&txn, USER_NAME, USER_EMAIL, &password_hash, USER_PHONE).await?;
    txn.commit().await?;

    let outcome = SeedOutcome::Seeded { categories: CATEGORIES.len(), products: PRODUCTS.len(), users: 1 };
    info!(?outcome, "seed_completed");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use argon2::{PasswordHash, PasswordVerifier};
    use sea_orm::{EntityTrait, QueryOrder};

    #[tokio::test]
    async fn seeds_fixed_catalog_in_order() -> anyhow::Result<()> {
        let (_dir, db) = get_db().await?;
        let outcome = initialize(&db).await?;
        assert_eq!(outcome, SeedOutcome::Seeded { categories: 4, products: 9, users: 1 });

        let cats = category::Entity::find().order_by_asc(category::Column::Id).all(&db).await?;
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, CATEGORIES.iter().map(|c| c.name).collect::<Vec<_>>());

        let products = product::Entity::find().order_by_asc(product::Column::Id).all(&db).await?;
        assert_eq!(products.len(), PRODUCTS.len());
        for (row, expected) in products.iter().zip(PRODUCTS) {
            assert_eq!(row.name, expected.name);
            assert_eq!(row.category_id, cats[expected.category].id);
            assert_eq!(row.price, Decimal::new(expected.price_cents, 2));
        }
        Ok(())
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() -> anyhow::Result<()> {
        let (_dir, db) = get_db().await?;
        initialize(&db).await?;
        let before = (
            category::Entity::find().count(&db).await?,
            product::Entity::find().count(&db).await?,
            user::Entity::find().count(&db).await?,
        );
        assert_eq!(initialize(&db).await?, SeedOutcome::Skipped);
        let after = (
            category::Entity::find().count(&db).await?,
            product::Entity::find().count(&db).await?,
            user::Entity::find().count(&db).await?,
        );
        assert_eq!(before, (4, 9, 1));
        assert_eq!(before, after);
        Ok(())
    }

    #[tokio::test]
    async fn user_password_is_hashed() -> anyhow::Result<()> {
        let (_dir, db) = get_db().await?;
        initialize(&db).await?;
        let u = user::Entity::find().one(&db).await?.expect("seeded user");
        assert_eq!(u.email, USER_EMAIL);
        assert_ne!(u.password_hash, USER_PASSWORD);
        let parsed = PasswordHash::new(&u.password_hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        assert!(Argon2::default().verify_password(USER_PASSWORD.as_bytes(), &parsed).is_ok());
        Ok(())
    }
}
