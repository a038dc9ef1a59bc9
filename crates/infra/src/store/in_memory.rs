use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use coffeeshop_core::DrinkId;
use coffeeshop_drinks::{Drink, NewDrink, Recipe};

use super::{DrinkStore, StoreError, seed_drinks};

/// Row as kept by the store: recipe in serialized form.
#[derive(Debug, Clone)]
struct Row {
    title: String,
    recipe: String,
}

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<DrinkId, Row>,
}

impl Table {
    fn decode(id: DrinkId, row: &Row) -> Result<Drink, StoreError> {
        let recipe = Recipe::from_stored(&row.recipe).map_err(|e| StoreError::Corrupt {
            id,
            reason: e.to_string(),
        })?;
        Ok(Drink::new(id, row.title.clone(), recipe))
    }

    fn title_taken(&self, title: &str, except: Option<DrinkId>) -> bool {
        self.rows
            .iter()
            .any(|(id, row)| Some(*id) != except && row.title == title)
    }

    fn insert(&mut self, drink: NewDrink) -> Result<Drink, StoreError> {
        if self.title_taken(&drink.title, None) {
            return Err(StoreError::Conflict(format!("title '{}' already exists", drink.title)));
        }

        let recipe = drink.recipe.to_stored()?;
        self.next_id += 1;
        let id = DrinkId::new(self.next_id);
        self.rows.insert(
            id,
            Row {
                title: drink.title.clone(),
                recipe,
            },
        );
        Ok(Drink::new(id, drink.title, drink.recipe))
    }
}

/// In-memory drink table for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDrinkStore {
    inner: RwLock<Table>,
}

impl InMemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl DrinkStore for InMemoryDrinkStore {
    async fn all(&self) -> Result<Vec<Drink>, StoreError> {
        let table = self.inner.read().map_err(poisoned)?;
        table
            .rows
            .iter()
            .map(|(id, row)| Table::decode(*id, row))
            .collect()
    }

    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        let table = self.inner.read().map_err(poisoned)?;
        table
            .rows
            .get(&id)
            .map(|row| Table::decode(id, row))
            .transpose()
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        let mut table = self.inner.write().map_err(poisoned)?;
        table.insert(drink)
    }

    async fn update(&self, drink: &Drink) -> Result<(), StoreError> {
        let mut table = self.inner.write().map_err(poisoned)?;
        if !table.rows.contains_key(&drink.id()) {
            return Err(StoreError::NotFound);
        }
        if table.title_taken(drink.title(), Some(drink.id())) {
            return Err(StoreError::Conflict(format!(
                "title '{}' already exists",
                drink.title()
            )));
        }

        let recipe = drink.recipe().to_stored()?;
        table.rows.insert(
            drink.id(),
            Row {
                title: drink.title().to_string(),
                recipe,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: DrinkId) -> Result<(), StoreError> {
        let mut table = self.inner.write().map_err(poisoned)?;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut table = self.inner.write().map_err(poisoned)?;
        *table = Table::default();
        for drink in seed_drinks() {
            table.insert(drink)?;
        }
        Ok(())
    }
}
