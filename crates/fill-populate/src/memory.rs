//! In-memory backend.
//!
//! `MemoryStore` holds the tables of every `MemoryModel` created from it and
//! checks rows the way a database would: unknown columns, NOT NULL, primary
//! key uniqueness and foreign-key existence are all enforced on insert.

use crate::error::BackendError;
use crate::introspect::{definition, BackendKind, ModelIntrospector};
use async_trait::async_trait;
use fill_core::{FieldValue, FieldValues, Instance, ModelDefinition, ModelId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

struct MemoryTable {
    rows: Vec<Instance>,
    next_id: i64,
}

struct MemoryState {
    tables: HashMap<ModelId, MemoryTable>,
    rng: StdRng,
}

/// Shared in-memory storage.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store; `seed` drives random row selection.
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                tables: HashMap::new(),
                rng: StdRng::seed_from_u64(seed),
            })),
        }
    }

    /// Adapter for one model backed by this store.
    pub fn model(&self, definition: ModelDefinition) -> MemoryModel {
        MemoryModel {
            store: self.clone(),
            definition,
        }
    }

    /// Snapshot of the rows of `model`, in insertion order.
    pub async fn rows(&self, model: &str) -> Vec<Instance> {
        let state = self.state.lock().await;
        state
            .tables
            .get(model)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Whether storage for `model` has been created.
    pub async fn has_table(&self, model: &str) -> bool {
        self.state.lock().await.tables.contains_key(model)
    }
}

/// `ModelIntrospector` over a `MemoryStore` table.
pub struct MemoryModel {
    store: MemoryStore,
    definition: ModelDefinition,
}

impl MemoryModel {
    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    fn constraint(&self, message: impl Into<String>) -> BackendError {
        BackendError::constraint(&self.definition.name, message)
    }

    fn missing_table(&self) -> BackendError {
        self.constraint(format!(
            "table '{}' does not exist",
            self.definition.name
        ))
    }

    /// Check NOT NULL and foreign keys, returning the stored field map.
    fn check_fields(
        &self,
        tables: &HashMap<ModelId, MemoryTable>,
        values: &mut FieldValues,
    ) -> Result<FieldValues, BackendError> {
        let mut fields = FieldValues::with_capacity(self.definition.fields.len());
        for field in &self.definition.fields {
            let value = values.remove(&field.name).unwrap_or(FieldValue::Null);
            if value.is_null() {
                if !field.nullable {
                    return Err(self.constraint(format!(
                        "null value in column '{}' violates not-null constraint",
                        field.name
                    )));
                }
            } else if let Some(target) = &field.references {
                let exists = tables
                    .get(target)
                    .is_some_and(|t| t.rows.iter().any(|row| same_key(&row.id, &value)));
                if !exists {
                    return Err(self.constraint(format!(
                        "'{}' = {value} violates foreign key to '{target}'",
                        field.name
                    )));
                }
            }
            fields.insert(field.name.clone(), value);
        }
        Ok(fields)
    }
}

/// Key equality that ignores integer width.
fn same_key(a: &FieldValue, b: &FieldValue) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

#[async_trait]
impl ModelIntrospector for MemoryModel {
    fn model(&self) -> &ModelId {
        &self.definition.name
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn fields(&self) -> Vec<String> {
        definition::fields(&self.definition)
    }

    fn is_reference_field(&self, name: &str) -> Result<bool, BackendError> {
        definition::is_reference_field(&self.definition, name)
    }

    fn referenced_model(&self, name: &str) -> Result<ModelId, BackendError> {
        definition::referenced_model(&self.definition, name)
    }

    async fn ensure_storage_exists(&self) -> Result<(), BackendError> {
        let mut state = self.store.state.lock().await;
        if !state.tables.contains_key(&self.definition.name) {
            debug!(model = %self.definition.name, "Creating in-memory table");
            state.tables.insert(
                self.definition.name.clone(),
                MemoryTable {
                    rows: Vec::new(),
                    next_id: 1,
                },
            );
        }
        Ok(())
    }

    async fn create_and_persist(&self, mut values: FieldValues) -> Result<Instance, BackendError> {
        definition::check_known_fields(&self.definition, &values)?;

        let mut state = self.store.state.lock().await;
        if !state.tables.contains_key(&self.definition.name) {
            return Err(self.missing_table());
        }
        let fields = self.check_fields(&state.tables, &mut values)?;

        let pk = &self.definition.primary_key;
        let table = state
            .tables
            .get_mut(&self.definition.name)
            .ok_or_else(|| self.missing_table())?;

        let id = match values.remove(&pk.name).unwrap_or(FieldValue::Null) {
            FieldValue::Null if pk.auto_increment => FieldValue::Int64(table.next_id),
            FieldValue::Null => {
                return Err(self.constraint(format!(
                    "null value in primary key column '{}'",
                    pk.name
                )))
            }
            id => id,
        };
        if table.rows.iter().any(|row| same_key(&row.id, &id)) {
            return Err(self.constraint(format!("duplicate primary key {id}")));
        }
        if let Some(key) = id.as_i64() {
            table.next_id = table.next_id.max(key.saturating_add(1));
        }

        let instance = Instance::new(self.definition.name.clone(), id, fields);
        table.rows.push(instance.clone());
        Ok(instance)
    }

    async fn random_existing(&self) -> Result<Option<Instance>, BackendError> {
        let mut state = self.store.state.lock().await;
        let MemoryState { tables, rng } = &mut *state;
        let table = tables
            .get(&self.definition.name)
            .ok_or_else(|| self.missing_table())?;
        if table.rows.is_empty() {
            return Ok(None);
        }
        let idx = rng.gen_range(0..table.rows.len());
        Ok(Some(table.rows[idx].clone()))
    }

    async fn count_existing(&self) -> Result<u64, BackendError> {
        let state = self.store.state.lock().await;
        let table = state
            .tables
            .get(&self.definition.name)
            .ok_or_else(|| self.missing_table())?;
        Ok(table.rows.len() as u64)
    }
}
