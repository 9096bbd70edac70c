//! Model definitions and fill plans.
//!
//! ## Type Hierarchy
//!
//! **Base types** (no generators), consumed by backend adapters:
//! - `FieldDefinition` - Single field metadata, optionally referencing a model
//! - `PrimaryKeyDefinition` - Primary key column metadata
//! - `ModelDefinition` - Model with primary key and fields
//!
//! **Plan types** (embed base types, include generators and counts):
//! - `PlanField` - Field with optional generator config
//! - `PlanPrimaryKey` - Primary key with optional generator config
//! - `PlanModel` - Model with generators and a row count
//! - `FillPlan` - Full plan loaded from YAML

use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for plan and model definition operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading plan file
    #[error("Failed to read plan file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Model not found in plan
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Same model declared twice
    #[error("Model '{0}' is declared more than once")]
    DuplicateModel(String),

    /// Same field declared twice on a model
    #[error("Field '{field}' is declared more than once on model '{model}'")]
    DuplicateField { model: String, field: String },

    /// Reference to a model that is not part of the plan
    #[error("Field '{field}' of model '{model}' references unknown model '{target}'")]
    UnknownReference {
        model: String,
        field: String,
        target: String,
    },

    /// Generators cannot be attached to reference fields
    #[error("Field '{field}' of model '{model}' is a reference and cannot have a generator")]
    GeneratorOnReference { model: String, field: String },

    /// Primary key has neither a generator nor an integer auto-increment type
    #[error("Primary key of model '{model}': {reason}")]
    InvalidPrimaryKey { model: String, reason: String },

    /// Negative or otherwise invalid row count
    #[error("Invalid count {count} for model '{model}': counts must be >= 0")]
    InvalidCount { model: String, count: i64 },
}

// ============================================================================
// Base Types
// ============================================================================

/// Identity of a model (its table or collection name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new model identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the model name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ModelId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&ModelId> for ModelId {
    fn from(id: &ModelId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for ModelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn default_pk_name() -> String {
    "id".to_string()
}

/// Primary key column of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyDefinition {
    /// Column name
    #[serde(default = "default_pk_name")]
    pub name: String,

    /// Key type
    #[serde(rename = "type")]
    pub key_type: FieldType,

    /// Whether the storage assigns the key (integer keys only)
    #[serde(default)]
    pub auto_increment: bool,
}

impl PrimaryKeyDefinition {
    /// Auto-increment 64-bit integer key named `id`.
    pub fn auto() -> Self {
        Self {
            name: default_pk_name(),
            key_type: FieldType::Int64,
            auto_increment: true,
        }
    }

    /// Key named `id` whose value is supplied by a generator.
    pub fn generated(key_type: FieldType) -> Self {
        Self {
            name: default_pk_name(),
            key_type,
            auto_increment: false,
        }
    }
}

/// Field of a model (primary key excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether this field is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Model referenced by this field (foreign key), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ModelId>,
}

impl FieldDefinition {
    /// Create a new non-nullable value field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            references: None,
        }
    }

    /// Create a new nullable value field.
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, field_type)
        }
    }

    /// Create a reference field pointing at `target`.
    pub fn reference(
        name: impl Into<String>,
        field_type: FieldType,
        target: impl Into<ModelId>,
    ) -> Self {
        Self {
            references: Some(target.into()),
            ..Self::new(name, field_type)
        }
    }

    /// Mark this field as nullable.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Check if this field references another model.
    pub fn is_reference(&self) -> bool {
        self.references.is_some()
    }
}

/// Model definition (no generators).
///
/// This is the declared schema a backend adapter introspects and creates
/// storage for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Model name
    pub name: ModelId,

    /// Primary key definition
    pub primary_key: PrimaryKeyDefinition,

    /// Field definitions (excluding primary key)
    pub fields: Vec<FieldDefinition>,
}

impl ModelDefinition {
    /// Create a new model definition.
    pub fn new(
        name: impl Into<ModelId>,
        primary_key: PrimaryKeyDefinition,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            primary_key,
            fields,
        }
    }

    /// Get a field by name (primary key excluded).
    pub fn get_field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if `name` is the primary key or a field of this model.
    pub fn has_field(&self, name: &str) -> bool {
        self.primary_key.name == name || self.get_field(name).is_some()
    }

    /// Get the type of a field or of the primary key.
    pub fn get_field_type(&self, name: &str) -> Option<&FieldType> {
        if self.primary_key.name == name {
            return Some(&self.primary_key.key_type);
        }
        self.get_field(name).map(|f| &f.field_type)
    }

    /// All field names, primary key first.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = vec![self.primary_key.name.as_str()];
        names.extend(self.fields.iter().map(|f| f.name.as_str()));
        names
    }

    /// Fields that reference other models.
    pub fn reference_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_reference())
    }

    /// Models referenced by this model (deduplicated, declaration order).
    pub fn referenced_models(&self) -> Vec<&ModelId> {
        let mut seen = HashSet::new();
        self.reference_fields()
            .filter_map(|f| f.references.as_ref())
            .filter(|target| seen.insert(*target))
            .collect()
    }
}

// ============================================================================
// Plan Types (With Generators)
// ============================================================================

/// Kinds of realistic fake values delegated to the fake-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FakerKind {
    Name,
    FirstName,
    LastName,
    Username,
    FreeEmail,
    SafeEmail,
    Ipv4,
    Ipv6,
    MacAddress,
    UserAgent,
    CompanyEmail,
    Url,
    Uri,
    MimeType,
    FileName,
    Word,
    Sentence,
    Paragraph,
    CompanyName,
    City,
    Country,
    PhoneNumber,
    JobTitle,
    Md5,
    Sha1,
    Sha256,
}

impl FakerKind {
    /// Name as written in fill plans.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::FreeEmail => "free_email",
            Self::SafeEmail => "safe_email",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::MacAddress => "mac_address",
            Self::UserAgent => "user_agent",
            Self::CompanyEmail => "company_email",
            Self::Url => "url",
            Self::Uri => "uri",
            Self::MimeType => "mime_type",
            Self::FileName => "file_name",
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::CompanyName => "company_name",
            Self::City => "city",
            Self::Country => "country",
            Self::PhoneNumber => "phone_number",
            Self::JobTitle => "job_title",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for FakerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locale of faked names, addresses, companies and text.
///
/// Accepts the bare language (`fr`) or language and region in either case
/// (`fr_FR`, `fr-fr`). English covers every `en_*` region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    En,
    FrFr,
    DeDe,
    PtBr,
    JaJp,
    ZhCn,
    ZhTw,
    ArSa,
}

impl Locale {
    pub const ALL: [Locale; 8] = [
        Self::En,
        Self::FrFr,
        Self::DeDe,
        Self::PtBr,
        Self::JaJp,
        Self::ZhCn,
        Self::ZhTw,
        Self::ArSa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::FrFr => "fr_FR",
            Self::DeDe => "de_DE",
            Self::PtBr => "pt_BR",
            Self::JaJp => "ja_JP",
            Self::ZhCn => "zh_CN",
            Self::ZhTw => "zh_TW",
            Self::ArSa => "ar_SA",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let locale = match normalized.as_str() {
            "en" => Self::En,
            other if other.starts_with("en_") => Self::En,
            "fr" | "fr_fr" => Self::FrFr,
            "de" | "de_de" => Self::DeDe,
            "pt" | "pt_br" => Self::PtBr,
            "ja" | "ja_jp" => Self::JaJp,
            "zh_cn" => Self::ZhCn,
            "zh_tw" => Self::ZhTw,
            "ar" | "ar_sa" => Self::ArSa,
            _ => {
                let known: Vec<&str> = Self::ALL.iter().map(Locale::as_str).collect();
                return Err(format!(
                    "unsupported locale '{s}' (expected one of {})",
                    known.join(", ")
                ));
            }
        };
        Ok(locale)
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.as_str().to_string()
    }
}

/// Generator configuration for a field.
///
/// This enum defines the different types of value generators available
/// for producing mock data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate random decimals in a range
    DecimalRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (ISO 8601)
        start: String,
        /// End timestamp (ISO 8601)
        end: String,
    },

    /// Generate the current timestamp at generation time (not deterministic)
    TimestampNow,

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },

    /// Generate null values (for nullable fields)
    Null,

    /// Generate realistic fake data
    Faker {
        /// What to fake
        kind: FakerKind,
        /// Lower bound for word/sentence counts
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        /// Upper bound (exclusive) for word/sentence counts
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
}

/// Field with optional generator config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanField {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether this field is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Model referenced by this field, if any
    #[serde(default)]
    pub references: Option<ModelId>,

    /// Generator for value fields; unset fields are left to the storage default
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

impl PlanField {
    /// Convert to base FieldDefinition (discarding generator info).
    pub fn to_field_definition(&self) -> FieldDefinition {
        FieldDefinition {
            name: self.name.clone(),
            field_type: self.field_type.clone(),
            nullable: self.nullable,
            references: self.references.clone(),
        }
    }
}

/// Primary key with optional generator config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPrimaryKey {
    /// Column name
    #[serde(default = "default_pk_name")]
    pub name: String,

    /// Key type
    #[serde(rename = "type")]
    pub key_type: FieldType,

    /// Whether the storage assigns the key
    #[serde(default)]
    pub auto_increment: bool,

    /// Generator for the key value
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

impl Default for PlanPrimaryKey {
    fn default() -> Self {
        Self {
            name: default_pk_name(),
            key_type: FieldType::Int64,
            auto_increment: true,
            generator: None,
        }
    }
}

impl PlanPrimaryKey {
    /// Convert to base PrimaryKeyDefinition (discarding generator info).
    pub fn to_primary_key_definition(&self) -> PrimaryKeyDefinition {
        PrimaryKeyDefinition {
            name: self.name.clone(),
            key_type: self.key_type.clone(),
            auto_increment: self.auto_increment,
        }
    }
}

/// Model with generators and a requested row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanModel {
    /// Model name
    pub name: ModelId,

    /// Number of instances to generate
    #[serde(default)]
    pub count: i64,

    /// Primary key (defaults to an auto-increment `id` big_int)
    #[serde(default)]
    pub id: PlanPrimaryKey,

    /// Field definitions with generators
    #[serde(default)]
    pub fields: Vec<PlanField>,

    /// Faker locale for this model (defaults to the plan's)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
}

impl PlanModel {
    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&PlanField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Convert to base ModelDefinition (discarding generator info).
    pub fn to_model_definition(&self) -> ModelDefinition {
        ModelDefinition {
            name: self.name.clone(),
            primary_key: self.id.to_primary_key_definition(),
            fields: self
                .fields
                .iter()
                .map(|f| f.to_field_definition())
                .collect(),
        }
    }

    /// Generators by field name, primary key included when it has one.
    pub fn generators(&self) -> Vec<(&str, &GeneratorConfig)> {
        let mut generators = Vec::new();
        if let Some(generator) = &self.id.generator {
            generators.push((self.id.name.as_str(), generator));
        }
        generators.extend(
            self.fields
                .iter()
                .filter_map(|f| f.generator.as_ref().map(|g| (f.name.as_str(), g))),
        );
        generators
    }
}

fn default_version() -> u32 {
    1
}

fn default_seed() -> u64 {
    42
}

/// Full fill plan.
///
/// The plan lists the models to populate in registration order, their
/// fields, value generators and row counts. It is loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillPlan {
    /// Plan version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Random seed for deterministic generation
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Default faker locale
    #[serde(default)]
    pub locale: Locale,

    /// Model definitions with generators
    pub models: Vec<PlanModel>,

    /// Cached model lookup (not serialized)
    #[serde(skip)]
    model_map: HashMap<ModelId, usize>,
}

impl FillPlan {
    /// Build a plan from models (registration order is preserved).
    pub fn new(seed: u64, models: Vec<PlanModel>) -> Result<Self, SchemaError> {
        let mut plan = Self {
            version: default_version(),
            seed,
            locale: Locale::default(),
            models,
            model_map: HashMap::new(),
        };
        plan.build_model_map();
        plan.validate()?;
        Ok(plan)
    }

    /// Load plan from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate plan from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut plan: FillPlan = serde_yaml::from_str(yaml)?;
        plan.build_model_map();
        plan.validate()?;
        Ok(plan)
    }

    fn build_model_map(&mut self) {
        self.model_map = self
            .models
            .iter()
            .enumerate()
            .map(|(idx, model)| (model.name.clone(), idx))
            .collect();
    }

    /// Check the plan for inconsistencies.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for model in &self.models {
            if !names.insert(model.name.as_str()) {
                return Err(SchemaError::DuplicateModel(model.name.to_string()));
            }
        }

        for model in &self.models {
            if model.count < 0 {
                return Err(SchemaError::InvalidCount {
                    model: model.name.to_string(),
                    count: model.count,
                });
            }
            validate_primary_key(model)?;

            let mut field_names = HashSet::from([model.id.name.as_str()]);
            for field in &model.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        model: model.name.to_string(),
                        field: field.name.clone(),
                    });
                }
                let Some(target) = &field.references else {
                    continue;
                };
                if !names.contains(target.as_str()) {
                    return Err(SchemaError::UnknownReference {
                        model: model.name.to_string(),
                        field: field.name.clone(),
                        target: target.to_string(),
                    });
                }
                if field.generator.is_some() {
                    return Err(SchemaError::GeneratorOnReference {
                        model: model.name.to_string(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a model by name.
    pub fn get_model(&self, name: &str) -> Option<&PlanModel> {
        self.model_map
            .get(name)
            .and_then(|&idx| self.models.get(idx))
    }

    /// Get a mutable model by name.
    pub fn get_model_mut(&mut self, name: &str) -> Option<&mut PlanModel> {
        self.model_map
            .get(name)
            .and_then(|&idx| self.models.get_mut(idx))
    }

    /// Override the requested count of one model.
    pub fn set_count(&mut self, name: &str, count: i64) -> Result<(), SchemaError> {
        if count < 0 {
            return Err(SchemaError::InvalidCount {
                model: name.to_string(),
                count,
            });
        }
        let model = self
            .get_model_mut(name)
            .ok_or_else(|| SchemaError::ModelNotFound(name.to_string()))?;
        model.count = count;
        Ok(())
    }

    /// Requested counts in registration order.
    pub fn counts(&self) -> Result<Vec<u64>, SchemaError> {
        self.models
            .iter()
            .map(|m| {
                u64::try_from(m.count).map_err(|_| SchemaError::InvalidCount {
                    model: m.name.to_string(),
                    count: m.count,
                })
            })
            .collect()
    }

    /// Faker locale of `model`: its own, else the plan's.
    pub fn locale_of(&self, model: &PlanModel) -> Locale {
        model.locale.unwrap_or(self.locale)
    }

    /// Convert to base model definitions (discarding generator info).
    pub fn model_definitions(&self) -> Vec<ModelDefinition> {
        self.models.iter().map(|m| m.to_model_definition()).collect()
    }
}

fn validate_primary_key(model: &PlanModel) -> Result<(), SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidPrimaryKey {
        model: model.name.to_string(),
        reason: reason.to_string(),
    };
    match (&model.id.generator, model.id.auto_increment) {
        (Some(_), true) => Err(invalid(
            "a key cannot be both auto-increment and generated",
        )),
        (None, false) => Err(invalid(
            "a key needs a generator unless it is auto-increment",
        )),
        (None, true) if !model.id.key_type.is_integer() => {
            Err(invalid("auto-increment keys must have an integer type"))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
