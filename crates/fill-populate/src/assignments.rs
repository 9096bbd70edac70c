//! Field assignment tables.

use crate::descriptor::ModelDescriptor;
use crate::error::PopulateError;
use fill_core::{ModelId, ValueSpec};
use std::fmt;

#[derive(Debug, Clone)]
enum Slot {
    Value(Option<ValueSpec>),
    Reference(ModelId),
}

/// Value specifications assigned to the fields of one model.
///
/// Every field starts unset. Unset value fields are left to the storage
/// default; reference fields cannot be assigned and always resolve to an
/// existing row of the referenced model.
#[derive(Debug, Clone)]
pub struct FieldAssignments {
    model: ModelId,
    slots: Vec<(String, Slot)>,
}

impl FieldAssignments {
    /// Empty table covering every field of `descriptor`.
    pub fn new(descriptor: &ModelDescriptor) -> Self {
        let slots = descriptor
            .fields()
            .iter()
            .map(|field| {
                let slot = match descriptor.referenced_model(field) {
                    Some(target) => Slot::Reference(target.clone()),
                    None => Slot::Value(None),
                };
                (field.clone(), slot)
            })
            .collect();
        Self {
            model: descriptor.model().clone(),
            slots,
        }
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    fn slot_mut(&mut self, field: &str) -> Result<&mut Option<ValueSpec>, PopulateError> {
        let model = &self.model;
        let (_, slot) = self
            .slots
            .iter_mut()
            .find(|(name, _)| name == field)
            .ok_or_else(|| PopulateError::UnknownField {
                model: model.clone(),
                field: field.to_string(),
            })?;
        match slot {
            Slot::Value(spec) => Ok(spec),
            Slot::Reference(_) => Err(PopulateError::ReferenceFieldAssignment {
                model: model.clone(),
                field: field.to_string(),
            }),
        }
    }

    /// Assign `spec` to `field`, returning the previous assignment.
    pub fn set(
        &mut self,
        field: &str,
        spec: ValueSpec,
    ) -> Result<Option<ValueSpec>, PopulateError> {
        Ok(self.slot_mut(field)?.replace(spec))
    }

    /// Builder-style `set`.
    pub fn with(mut self, field: &str, spec: ValueSpec) -> Result<Self, PopulateError> {
        self.set(field, spec)?;
        Ok(self)
    }

    /// Unset `field`, returning the previous assignment.
    pub fn clear(&mut self, field: &str) -> Result<Option<ValueSpec>, PopulateError> {
        Ok(self.slot_mut(field)?.take())
    }

    /// Assigned specification of `field`, if any.
    pub fn get(&self, field: &str) -> Option<&ValueSpec> {
        self.slots.iter().find_map(|(name, slot)| match slot {
            Slot::Value(Some(spec)) if name == field => Some(spec),
            _ => None,
        })
    }

    /// Assignable fields and their specifications, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ValueSpec>)> {
        self.slots.iter().filter_map(|(name, slot)| match slot {
            Slot::Value(spec) => Some((name.as_str(), spec.as_ref())),
            Slot::Reference(_) => None,
        })
    }

    pub fn assigned_count(&self) -> usize {
        self.iter().filter(|(_, spec)| spec.is_some()).count()
    }
}

impl fmt::Display for FieldAssignments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.model)?;
        for (i, (name, slot)) in self.slots.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            match slot {
                Slot::Value(Some(spec)) => write!(f, "{sep}{name}: {spec}")?,
                Slot::Value(None) => write!(f, "{sep}{name}: unset")?,
                Slot::Reference(target) => write!(f, "{sep}{name}: -> {target}")?,
            }
        }
        if self.slots.is_empty() {
            f.write_str("}")
        } else {
            f.write_str(" }")
        }
    }
}
