//! Instance generation for one model.

use crate::assignments::FieldAssignments;
use crate::descriptor::ModelDescriptor;
use crate::error::PopulateError;
use crate::introspect::ModelIntrospector;
use crate::metrics::ModelReport;
use fill_core::{FieldValue, FieldValues, Instance, ModelId, ValueContext};
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Introspectors of every registered model, by identity.
pub type IntrospectorMap = HashMap<ModelId, Arc<dyn ModelIntrospector>>;

/// Generates and persists the instances of one model.
pub struct InstanceGenerator<'a> {
    descriptor: &'a ModelDescriptor,
    assignments: &'a FieldAssignments,
    introspectors: &'a IntrospectorMap,
}

impl<'a> InstanceGenerator<'a> {
    pub fn new(
        descriptor: &'a ModelDescriptor,
        assignments: &'a FieldAssignments,
        introspectors: &'a IntrospectorMap,
    ) -> Self {
        Self {
            descriptor,
            assignments,
            introspectors,
        }
    }

    fn introspector(
        &self,
        model: &ModelId,
        field: &str,
    ) -> Result<&'a Arc<dyn ModelIntrospector>, PopulateError> {
        self.introspectors
            .get(model)
            .ok_or_else(|| PopulateError::UnregisteredReference {
                model: self.descriptor.model().clone(),
                field: field.to_string(),
                target: model.clone(),
            })
    }

    /// Persist exactly `count` new instances, numbering them from
    /// `*next_index` on.
    ///
    /// `next_index` advances once per persisted instance. The first failure
    /// aborts the run; instances persisted before it stay.
    pub async fn generate(
        &self,
        count: u64,
        next_index: &mut u64,
        rng: &mut StdRng,
    ) -> Result<ModelReport, PopulateError> {
        let model = self.descriptor.model();
        let start_time = Instant::now();
        let introspector = self
            .introspectors
            .get(model)
            .ok_or_else(|| PopulateError::UnknownModel(model.to_string()))?;

        info!(
            model = %model,
            count,
            first_index = *next_index,
            assigned = self.assignments.assigned_count(),
            "Generating instances"
        );

        let mut rows_inserted = 0;
        while rows_inserted < count {
            let index = *next_index;
            let values = self.compose(index, rng).await?;
            let instance = introspector.create_and_persist(values).await?;
            debug!(model = %model, index, id = %instance.id, "Persisted instance");
            *next_index += 1;
            rows_inserted += 1;
        }

        let report = ModelReport {
            model: model.clone(),
            rows_requested: count,
            rows_inserted,
            duration: start_time.elapsed(),
        };
        info!(
            model = %model,
            rows = report.rows_inserted,
            "Generated {} rows in {:?} ({:.2} rows/sec)",
            report.rows_inserted,
            report.duration,
            report.rows_per_second()
        );
        Ok(report)
    }

    /// Field values of the `index`-th instance.
    async fn compose(&self, index: u64, rng: &mut StdRng) -> Result<FieldValues, PopulateError> {
        let model = self.descriptor.model();
        let mut values = FieldValues::with_capacity(self.descriptor.fields().len());

        for field in self.descriptor.fields() {
            let value = match self.descriptor.referenced_model(field) {
                Some(target) => self.pick_reference(field, target).await?,
                None => match self.assignments.get(field) {
                    Some(spec) => spec
                        .resolve(&mut ValueContext::new(rng, model, index))
                        .map_err(|source| PopulateError::Value {
                            model: model.clone(),
                            field: field.clone(),
                            source,
                        })?,
                    None => FieldValue::Null,
                },
            };
            values.insert(field.clone(), value);
        }
        Ok(values)
    }

    /// Identity of a random persisted row of `target`.
    ///
    /// A self-reference with no rows yet resolves to null.
    async fn pick_reference(
        &self,
        field: &str,
        target: &ModelId,
    ) -> Result<FieldValue, PopulateError> {
        let model = self.descriptor.model();
        match self.introspector(target, field)?.random_existing().await? {
            Some(Instance { id, .. }) => Ok(id),
            None if target == model => {
                debug!(model = %model, field, "No rows yet for self-reference, using null");
                Ok(FieldValue::Null)
            }
            None => Err(PopulateError::EmptyReferenceTarget {
                model: model.clone(),
                field: field.to_string(),
                target: target.clone(),
            }),
        }
    }
}
