//! MySQL-backed models.

use crate::ddl::{self, ForeignKey};
use crate::error::MySQLPopulatorError;
use crate::values::{from_mysql, to_mysql};
use async_trait::async_trait;
use fill_core::{FieldValues, Instance, ModelDefinition, ModelId};
use fill_populate::introspect::definition;
use fill_populate::{BackendError, BackendKind, ModelIntrospector};
use mysql_async::prelude::*;
use mysql_async::{Conn, Params, Pool, Row, Value};
use std::collections::HashMap;
use tracing::{debug, info};

/// A MySQL connection pool shared by every model of a run.
#[derive(Clone)]
pub struct MySQLDatabase {
    pool: Pool,
}

impl MySQLDatabase {
    /// Create a pool for `connection_string` and check that it answers.
    pub async fn connect(connection_string: &str) -> Result<Self, MySQLPopulatorError> {
        let pool = Pool::from_url(connection_string)?;
        let mut conn = pool.get_conn().await?;
        conn.query_drop("SELECT 1").await?;
        info!("Connected to MySQL");
        Ok(Self { pool })
    }

    pub fn with_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Adapters for a set of models stored in this database.
    ///
    /// Foreign keys are resolved against the primary keys of `definitions`;
    /// a target outside the set is assumed to be keyed by `id`.
    pub fn models(&self, definitions: Vec<ModelDefinition>) -> Vec<MySQLModel> {
        let keys: HashMap<ModelId, String> = definitions
            .iter()
            .map(|d| (d.name.clone(), d.primary_key.name.clone()))
            .collect();

        definitions
            .into_iter()
            .map(|definition| {
                let foreign_keys = definition
                    .reference_fields()
                    .filter_map(|field| {
                        let table = field.references.clone()?;
                        let key = keys
                            .get(&table)
                            .cloned()
                            .unwrap_or_else(|| "id".to_string());
                        Some(ForeignKey {
                            column: field.name.clone(),
                            table,
                            key,
                        })
                    })
                    .collect();
                MySQLModel {
                    pool: self.pool.clone(),
                    definition,
                    foreign_keys,
                }
            })
            .collect()
    }

    /// Close the pool once every model is done with it.
    pub async fn disconnect(self) -> Result<(), MySQLPopulatorError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

/// `ModelIntrospector` over one MySQL table.
pub struct MySQLModel {
    pool: Pool,
    definition: ModelDefinition,
    foreign_keys: Vec<ForeignKey>,
}

impl MySQLModel {
    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    fn table(&self) -> &str {
        self.definition.name.as_str()
    }

    fn backend_error(&self, err: impl Into<MySQLPopulatorError>) -> BackendError {
        err.into().into_backend(&self.definition.name)
    }

    async fn conn(&self) -> Result<Conn, BackendError> {
        self.pool
            .get_conn()
            .await
            .map_err(|e| self.backend_error(e))
    }

    /// Columns and parameters for the non-null values, in declaration order.
    fn bind(&self, values: &FieldValues) -> Result<(Vec<&str>, Vec<Value>), MySQLPopulatorError> {
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for name in self.definition.field_names() {
            let (Some(value), Some(field_type)) =
                (values.get(name), self.definition.get_field_type(name))
            else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            params.push(to_mysql(name, field_type, value)?);
            columns.push(name);
        }
        Ok((columns, params))
    }

    /// Key of the row just inserted: the supplied value, or the generated one.
    fn inserted_key(&self, values: &FieldValues, conn: &Conn) -> Result<Value, MySQLPopulatorError> {
        let pk = &self.definition.primary_key;
        match values.get(&pk.name) {
            Some(value) if !value.is_null() => to_mysql(&pk.name, &pk.key_type, value),
            _ => conn
                .last_insert_id()
                .map(Value::UInt)
                .ok_or_else(|| MySQLPopulatorError::MissingKey(self.table().to_string())),
        }
    }

    fn to_instance(&self, mut row: Row) -> Result<Instance, MySQLPopulatorError> {
        let pk = &self.definition.primary_key;
        let id = from_mysql(&pk.name, &pk.key_type, take(&mut row, &pk.name))?;
        let mut fields = FieldValues::with_capacity(self.definition.fields.len());
        for field in &self.definition.fields {
            let value = from_mysql(&field.name, &field.field_type, take(&mut row, &field.name))?;
            fields.insert(field.name.clone(), value);
        }
        Ok(Instance::new(self.definition.name.clone(), id, fields))
    }
}

fn take(row: &mut Row, column: &str) -> Value {
    row.take::<Value, &str>(column).unwrap_or(Value::NULL)
}

#[async_trait]
impl ModelIntrospector for MySQLModel {
    fn model(&self) -> &ModelId {
        &self.definition.name
    }

    fn backend(&self) -> BackendKind {
        BackendKind::MySQL
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
        let sql = ddl::create_table(&self.definition, &self.foreign_keys);
        info!(model = %self.definition.name, "Ensuring table exists");
        debug!("DDL: {}", sql);
        let mut conn = self.conn().await?;
        conn.query_drop(sql).await.map_err(|e| self.backend_error(e))
    }

    async fn create_and_persist(&self, values: FieldValues) -> Result<Instance, BackendError> {
        definition::check_known_fields(&self.definition, &values)?;
        let (columns, params) = self.bind(&values).map_err(|e| self.backend_error(e))?;
        let sql = ddl::insert(self.table(), &columns);

        let mut conn = self.conn().await?;
        conn.exec_drop(sql.as_str(), Params::Positional(params))
            .await
            .map_err(|e| self.backend_error(e))?;
        let key = self
            .inserted_key(&values, &conn)
            .map_err(|e| self.backend_error(e))?;

        let select = ddl::select_by_key(self.table(), &self.definition.primary_key.name);
        let row: Option<Row> = conn
            .exec_first(select.as_str(), Params::Positional(vec![key]))
            .await
            .map_err(|e| self.backend_error(e))?;
        let row = row.ok_or_else(|| {
            self.backend_error(MySQLPopulatorError::MissingKey(self.table().to_string()))
        })?;

        self.to_instance(row).map_err(|e| self.backend_error(e))
    }

    async fn random_existing(&self) -> Result<Option<Instance>, BackendError> {
        let mut conn = self.conn().await?;
        let row: Option<Row> = conn
            .exec_first(ddl::select_random(self.table()).as_str(), ())
            .await
            .map_err(|e| self.backend_error(e))?;

        row.map(|row| self.to_instance(row))
            .transpose()
            .map_err(|e| self.backend_error(e))
    }

    async fn count_existing(&self) -> Result<u64, BackendError> {
        let mut conn = self.conn().await?;
        let count: Option<i64> = conn
            .exec_first(ddl::count_rows(self.table()).as_str(), ())
            .await
            .map_err(|e| self.backend_error(e))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }
}
