//! SQL generation for MySQL.

use fill_core::{FieldType, ModelDefinition, ModelId, PrimaryKeyDefinition};

/// Foreign key from a reference column to the referenced table's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub table: ModelId,
    pub key: String,
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Column type for a declared field type.
pub fn column_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Bool => "TINYINT(1)".to_string(),
        FieldType::Int16 => "SMALLINT".to_string(),
        FieldType::Int32 => "INT".to_string(),
        FieldType::Int64 => "BIGINT".to_string(),
        FieldType::Float32 => "FLOAT".to_string(),
        FieldType::Float64 => "DOUBLE".to_string(),
        FieldType::Decimal { precision, scale } => format!("DECIMAL({precision},{scale})"),
        FieldType::Char { length } => format!("CHAR({length})"),
        FieldType::VarChar { length } => format!("VARCHAR({length})"),
        FieldType::Text => "TEXT".to_string(),
        FieldType::Bytes => "BLOB".to_string(),
        FieldType::Date => "DATE".to_string(),
        FieldType::DateTime => "DATETIME(6)".to_string(),
        FieldType::TimestampTz => "TIMESTAMP(6)".to_string(),
        FieldType::Uuid => "CHAR(36)".to_string(),
        FieldType::Json => "JSON".to_string(),
    }
}

fn primary_key_column(pk: &PrimaryKeyDefinition) -> String {
    let auto_increment = if pk.auto_increment && pk.key_type.is_integer() {
        " AUTO_INCREMENT"
    } else {
        ""
    };
    format!(
        "  {} {} NOT NULL{}",
        quote_ident(&pk.name),
        column_type(&pk.key_type),
        auto_increment
    )
}

/// `CREATE TABLE IF NOT EXISTS` for a model.
pub fn create_table(definition: &ModelDefinition, foreign_keys: &[ForeignKey]) -> String {
    let pk = &definition.primary_key;
    let mut lines = vec![primary_key_column(pk)];
    for field in &definition.fields {
        let null_clause = if field.nullable { "NULL" } else { "NOT NULL" };
        lines.push(format!(
            "  {} {} {}",
            quote_ident(&field.name),
            column_type(&field.field_type),
            null_clause
        ));
    }
    lines.push(format!("  PRIMARY KEY ({})", quote_ident(&pk.name)));
    for fk in foreign_keys {
        lines.push(format!(
            "  FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_ident(&fk.column),
            quote_ident(fk.table.as_str()),
            quote_ident(&fk.key)
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n) ENGINE=InnoDB",
        quote_ident(definition.name.as_str()),
        lines.join(",\n")
    )
}

/// Single-row INSERT; with no columns every column takes its default.
pub fn insert(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

pub fn select_by_key(table: &str, key: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?",
        quote_ident(table),
        quote_ident(key)
    )
}

/// Uniformly random row.
pub fn select_random(table: &str) -> String {
    format!("SELECT * FROM {} ORDER BY RAND() LIMIT 1", quote_ident(table))
}

pub fn count_rows(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}", quote_ident(table))
}
