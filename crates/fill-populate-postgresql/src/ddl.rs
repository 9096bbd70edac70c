//! SQL generation for PostgreSQL.

use fill_core::{FieldType, ModelDefinition, PrimaryKeyDefinition};

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column type for a declared field type.
pub fn column_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Bool => "BOOLEAN".to_string(),
        FieldType::Int16 => "SMALLINT".to_string(),
        FieldType::Int32 => "INTEGER".to_string(),
        FieldType::Int64 => "BIGINT".to_string(),
        FieldType::Float32 => "REAL".to_string(),
        FieldType::Float64 => "DOUBLE PRECISION".to_string(),
        FieldType::Decimal { precision, scale } => format!("NUMERIC({precision},{scale})"),
        FieldType::Char { length } => format!("CHAR({length})"),
        FieldType::VarChar { length } => format!("VARCHAR({length})"),
        FieldType::Text => "TEXT".to_string(),
        FieldType::Bytes => "BYTEA".to_string(),
        FieldType::Date => "DATE".to_string(),
        FieldType::DateTime => "TIMESTAMP".to_string(),
        FieldType::TimestampTz => "TIMESTAMPTZ".to_string(),
        FieldType::Uuid => "UUID".to_string(),
        FieldType::Json => "JSONB".to_string(),
    }
}

fn primary_key_column(pk: &PrimaryKeyDefinition) -> String {
    let column_type = match (&pk.key_type, pk.auto_increment) {
        (FieldType::Int16, true) => "SMALLSERIAL".to_string(),
        (FieldType::Int32, true) => "SERIAL".to_string(),
        (FieldType::Int64, true) => "BIGSERIAL".to_string(),
        (other, _) => column_type(other),
    };
    format!("  {} {} NOT NULL", quote_ident(&pk.name), column_type)
}

/// `CREATE TABLE IF NOT EXISTS` for a model.
///
/// Reference fields become foreign keys on the referenced table's primary key.
pub fn create_table(definition: &ModelDefinition) -> String {
    let pk = &definition.primary_key;
    let mut column_defs = vec![primary_key_column(pk)];
    for field in &definition.fields {
        let null_clause = if field.nullable { "NULL" } else { "NOT NULL" };
        let mut column = format!(
            "  {} {} {}",
            quote_ident(&field.name),
            column_type(&field.field_type),
            null_clause
        );
        if let Some(target) = &field.references {
            column.push_str(&format!(" REFERENCES {}", quote_ident(target.as_str())));
        }
        column_defs.push(column);
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{},\n  PRIMARY KEY ({})\n)",
        quote_ident(definition.name.as_str()),
        column_defs.join(",\n"),
        quote_ident(&pk.name)
    )
}

/// Single-row INSERT returning the stored row.
///
/// With no columns the row is built entirely from column defaults.
pub fn insert_returning(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES RETURNING *", quote_ident(table));
    }
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        quote_ident(table),
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

/// Uniformly random row.
pub fn select_random(table: &str) -> String {
    format!("SELECT * FROM {} ORDER BY random() LIMIT 1", quote_ident(table))
}

pub fn count_rows(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(table))
}
