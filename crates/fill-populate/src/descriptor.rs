//! Per-model descriptors captured once at registration.

use crate::error::BackendError;
use crate::introspect::{BackendKind, ModelIntrospector};
use fill_core::ModelId;

/// Immutable snapshot of a model's fields and references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    model: ModelId,
    backend: BackendKind,
    fields: Vec<String>,
    /// Reference field -> referenced model, in field order
    references: Vec<(String, ModelId)>,
}

impl ModelDescriptor {
    /// Query the introspector for the model's shape.
    pub fn from_introspector(introspector: &dyn ModelIntrospector) -> Result<Self, BackendError> {
        let fields = introspector.fields();
        let mut references = Vec::new();
        for field in &fields {
            if introspector.is_reference_field(field)? {
                references.push((field.clone(), introspector.referenced_model(field)?));
            }
        }
        Ok(Self {
            model: introspector.model().clone(),
            backend: introspector.backend(),
            fields,
            references,
        })
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// All field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn is_reference(&self, name: &str) -> bool {
        self.references.iter().any(|(field, _)| field == name)
    }

    pub fn referenced_model(&self, name: &str) -> Option<&ModelId> {
        self.references
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, target)| target)
    }

    /// Reference fields with their targets.
    pub fn references(&self) -> impl Iterator<Item = (&str, &ModelId)> {
        self.references
            .iter()
            .map(|(field, target)| (field.as_str(), target))
    }

    /// Number of reference fields; models with more are scheduled later.
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Distinct models this one must wait for. Self-references are excluded.
    pub fn dependencies(&self) -> Vec<&ModelId> {
        let mut deps: Vec<&ModelId> = Vec::new();
        for (_, target) in &self.references {
            if *target != self.model && !deps.contains(&target) {
                deps.push(target);
            }
        }
        deps
    }

    #[cfg(test)]
    pub(crate) fn for_test(
        model: &str,
        fields: &[&str],
        references: &[(&str, &str)],
    ) -> Self {
        Self {
            model: ModelId::from(model),
            backend: BackendKind::Memory,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            references: references
                .iter()
                .map(|(field, target)| (field.to_string(), ModelId::from(*target)))
                .collect(),
        }
    }
}
