//! PostgreSQL-backed models.

use crate::ddl;
use crate::error::PostgreSQLPopulatorError;
use crate::values::{from_row, to_sql_param, SqlParam};
use async_trait::async_trait;
use fill_core::{FieldValues, Instance, ModelDefinition, ModelId};
use fill_populate::introspect::definition;
use fill_populate::{BackendError, BackendKind, ModelIntrospector};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, info};

/// A PostgreSQL connection shared by every model of a run.
#[derive(Clone)]
pub struct PostgreSQLDatabase {
    client: Arc<Mutex<Client>>,
}

impl PostgreSQLDatabase {
    /// Connect to PostgreSQL.
    ///
    /// # Arguments
    ///
    /// * `connection_string` - PostgreSQL connection string (e.g., "host=localhost user=postgres password=postgres dbname=testdb")
    pub async fn connect(connection_string: &str) -> Result<Self, PostgreSQLPopulatorError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| PostgreSQLPopulatorError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        client.simple_query("SELECT 1").await?;
        info!("Connected to PostgreSQL");

        Ok(Self::with_client(Arc::new(Mutex::new(client))))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Arc<Mutex<Client>>) -> Self {
        Self { client }
    }

    /// Adapter for one model stored in this database.
    pub fn model(&self, definition: ModelDefinition) -> PostgreSQLModel {
        PostgreSQLModel {
            client: self.client.clone(),
            definition,
        }
    }
}

/// `ModelIntrospector` over one PostgreSQL table.
pub struct PostgreSQLModel {
    client: Arc<Mutex<Client>>,
    definition: ModelDefinition,
}

impl PostgreSQLModel {
    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    fn table(&self) -> &str {
        self.definition.name.as_str()
    }

    fn backend_error(&self, err: impl Into<PostgreSQLPopulatorError>) -> BackendError {
        err.into().into_backend(&self.definition.name)
    }

    /// Columns and parameters for the non-null values, in declaration order.
    fn bind(&self, values: &FieldValues) -> Result<(Vec<&str>, Vec<SqlParam>), BackendError> {
        let mut columns = Vec::new();
        let mut params = Vec::new();
        for name in self.definition.field_names() {
            let value = match values.get(name) {
                Some(value) if !value.is_null() => value,
                _ => continue,
            };
            let field_type = self
                .definition
                .get_field_type(name)
                .ok_or_else(|| BackendError::UnknownField {
                    model: self.definition.name.clone(),
                    field: name.to_string(),
                })?;
            params.push(to_sql_param(name, field_type, value).map_err(|e| self.backend_error(e))?);
            columns.push(name);
        }
        Ok((columns, params))
    }

    fn to_instance(&self, row: &Row) -> Result<Instance, PostgreSQLPopulatorError> {
        let pk = &self.definition.primary_key;
        let id = from_row(row, &pk.name, &pk.key_type)?;
        let mut fields = FieldValues::with_capacity(self.definition.fields.len());
        for field in &self.definition.fields {
            fields.insert(
                field.name.clone(),
                from_row(row, &field.name, &field.field_type)?,
            );
        }
        Ok(Instance::new(self.definition.name.clone(), id, fields))
    }
}

#[async_trait]
impl ModelIntrospector for PostgreSQLModel {
    fn model(&self) -> &ModelId {
        &self.definition.name
    }

    fn backend(&self) -> BackendKind {
        BackendKind::PostgreSQL
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
        let sql = ddl::create_table(&self.definition);
        let client = self.client.lock().await;
        info!(model = %self.definition.name, "Ensuring table exists");
        debug!("DDL: {}", sql);
        client
            .batch_execute(&sql)
            .await
            .map_err(|e| self.backend_error(e))
    }

    async fn create_and_persist(&self, values: FieldValues) -> Result<Instance, BackendError> {
        definition::check_known_fields(&self.definition, &values)?;
        let (columns, params) = self.bind(&values)?;
        let sql = ddl::insert_returning(self.table(), &columns);

        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let client = self.client.lock().await;
        let row = client
            .query_one(&sql, &param_refs)
            .await
            .map_err(|e| self.backend_error(e))?;
        drop(client);

        self.to_instance(&row).map_err(|e| self.backend_error(e))
    }

    async fn random_existing(&self) -> Result<Option<Instance>, BackendError> {
        let client = self.client.lock().await;
        let row = client
            .query_opt(&ddl::select_random(self.table()), &[])
            .await
            .map_err(|e| self.backend_error(e))?;
        drop(client);

        row.map(|row| self.to_instance(&row))
            .transpose()
            .map_err(|e| self.backend_error(e))
    }

    async fn count_existing(&self) -> Result<u64, BackendError> {
        let client = self.client.lock().await;
        let row = client
            .query_one(&ddl::count_rows(self.table()), &[])
            .await
            .map_err(|e| self.backend_error(e))?;
        let count: i64 = row.try_get(0).map_err(|e| self.backend_error(e))?;
        Ok(count.max(0) as u64)
    }
}

