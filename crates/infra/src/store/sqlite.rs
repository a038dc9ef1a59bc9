//! SQLite-backed drink store.
//!
//! One `drinks` table; the recipe column holds the serialized ingredient list.
//! Every operation is a single statement, so row-level atomicity comes from
//! SQLite itself.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection};

use coffeeshop_core::DrinkId;
use coffeeshop_drinks::{Drink, NewDrink, Recipe};

use super::{DrinkStore, StoreError, seed_drinks};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title  TEXT    NOT NULL UNIQUE,
        recipe TEXT    NOT NULL
    )
"#;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// SQLite-backed drink store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool (cheap to clone, Send + Sync).
#[derive(Debug, Clone)]
pub struct SqliteDrinkStore {
    pool: SqlitePool,
}

impl SqliteDrinkStore {
    /// Wrap an existing pool. Call [`SqliteDrinkStore::migrate`] before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database.
    ///
    /// Limited to one connection: every SQLite `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn decode(row: &SqliteRow) -> Result<Drink, StoreError> {
    let id = DrinkId::new(row.try_get::<i64, _>("id")?);
    let title: String = row.try_get("title")?;
    let raw: String = row.try_get("recipe")?;

    let recipe = Recipe::from_stored(&raw).map_err(|e| StoreError::Corrupt {
        id,
        reason: e.to_string(),
    })?;
    Ok(Drink::new(id, title, recipe))
}

async fn insert_row(conn: &mut SqliteConnection, drink: NewDrink) -> Result<Drink, StoreError> {
    let recipe = drink.recipe.to_stored()?;

    let result = sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
        .bind(&drink.title)
        .bind(&recipe)
        .execute(&mut *conn)
        .await?;

    Ok(Drink::new(
        DrinkId::new(result.last_insert_rowid()),
        drink.title,
        drink.recipe,
    ))
}

#[async_trait]
impl DrinkStore for SqliteDrinkStore {
    async fn all(&self) -> Result<Vec<Drink>, StoreError> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode).collect()
    }

    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode).transpose()
    }

    #[tracing::instrument(skip(self, drink), fields(title = %drink.title))]
    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let mut conn = self.pool.acquire().await?;
        insert_row(&mut conn, drink).await
    }

    #[tracing::instrument(skip(self, drink), fields(id = %drink.id()))]
    async fn update(&self, drink: &Drink) -> Result<(), StoreError> {
        let recipe = drink.recipe().to_stored()?;

        let result = sqlx::query("UPDATE drinks SET title = ?, recipe = ? WHERE id = ?")
            .bind(drink.title())
            .bind(&recipe)
            .bind(drink.id().get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: DrinkId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        for drink in seed_drinks() {
            insert_row(&mut tx, drink).await?;
        }

        tx.commit().await?;
        tracing::warn!("drinks table dropped and re-seeded");
        Ok(())
    }
}
