//! The caller-facing model registry.

use crate::assignments::FieldAssignments;
use crate::descriptor::ModelDescriptor;
use crate::error::PopulateError;
use crate::instance::{InstanceGenerator, IntrospectorMap};
use crate::introspect::{BackendKind, ModelIntrospector};
use crate::metrics::GenerationReport;
use crate::scheduler::{planned_order, ProcessingQueue, ProcessingState};
use fill_core::{ModelId, ValueSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 42;

struct RegisteredModel {
    descriptor: ModelDescriptor,
    assignments: FieldAssignments,
    /// Instance index of the next row; starts at the rows found in storage.
    next_index: u64,
}

/// Registered models, their field assignments and the generation entry point.
///
/// ```ignore
/// let mut registry = ModelRegistry::register(vec![users, posts]).await?;
/// registry.assign("users", "name", provider::name())?;
/// let report = registry.generate(&[3, 5]).await?;
/// ```
pub struct ModelRegistry {
    models: Vec<RegisteredModel>,
    positions: HashMap<ModelId, usize>,
    introspectors: IntrospectorMap,
    backend: Option<BackendKind>,
    rng: StdRng,
}

impl ModelRegistry {
    /// Register models (in the order counts will be given) and create their
    /// storage.
    ///
    /// All models must share one backend and every reference must point at a
    /// registered model. Storage is created in dependency order. Instance
    /// indices continue after the rows each model already holds.
    pub async fn register(
        adapters: Vec<Arc<dyn ModelIntrospector>>,
    ) -> Result<Self, PopulateError> {
        let backend = adapters.first().map(|a| a.backend());
        let mut models = Vec::with_capacity(adapters.len());
        let mut positions = HashMap::with_capacity(adapters.len());
        let mut introspectors = IntrospectorMap::with_capacity(adapters.len());

        for adapter in adapters {
            let model = adapter.model().clone();
            if let Some(expected) = backend {
                if adapter.backend() != expected {
                    return Err(PopulateError::InconsistentBackend {
                        model,
                        expected,
                        found: adapter.backend(),
                    });
                }
            }
            if positions.contains_key(&model) {
                return Err(PopulateError::DuplicateModel(model));
            }

            let descriptor = ModelDescriptor::from_introspector(&*adapter)?;
            let assignments = FieldAssignments::new(&descriptor);
            positions.insert(model.clone(), models.len());
            introspectors.insert(model, adapter);
            models.push(RegisteredModel {
                descriptor,
                assignments,
                next_index: 0,
            });
        }

        for registered in &models {
            let descriptor = &registered.descriptor;
            for (field, target) in descriptor.references() {
                if !positions.contains_key(target) {
                    return Err(PopulateError::UnregisteredReference {
                        model: descriptor.model().clone(),
                        field: field.to_string(),
                        target: target.clone(),
                    });
                }
            }
        }

        let mut registry = Self {
            models,
            positions,
            introspectors,
            backend,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        };
        registry.ensure_storage().await?;
        registry.load_existing_counts().await?;

        info!(
            models = registry.models.len(),
            backend = registry.backend.map(|b| b.as_str()).unwrap_or("none"),
            "Registered models"
        );
        Ok(registry)
    }

    async fn ensure_storage(&self) -> Result<(), PopulateError> {
        let order = match self.planned_order() {
            Ok(order) => order,
            Err(e) => {
                warn!("Creating storage in registration order: {e}");
                self.model_ids().cloned().collect()
            }
        };
        for model in &order {
            debug!(model = %model, "Ensuring storage exists");
            self.introspectors[model].ensure_storage_exists().await?;
        }
        Ok(())
    }

    async fn load_existing_counts(&mut self) -> Result<(), PopulateError> {
        for registered in &mut self.models {
            let model = registered.descriptor.model();
            let existing = self.introspectors[model].count_existing().await?;
            if existing > 0 {
                debug!(model = %model, existing, "Continuing after existing rows");
            }
            registered.next_index = existing;
        }
        Ok(())
    }

    /// Reseed the RNG handed to value specifications.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn backend(&self) -> Option<BackendKind> {
        self.backend
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered models in registration order.
    pub fn model_ids(&self) -> impl Iterator<Item = &ModelId> {
        self.models.iter().map(|m| m.descriptor.model())
    }

    fn position(&self, model: &str) -> Result<usize, PopulateError> {
        self.positions
            .get(model)
            .copied()
            .ok_or_else(|| PopulateError::UnknownModel(model.to_string()))
    }

    pub fn descriptor(&self, model: &str) -> Result<&ModelDescriptor, PopulateError> {
        Ok(&self.models[self.position(model)?].descriptor)
    }

    /// Field assignments of `model`.
    pub fn model(&self, model: &str) -> Result<&FieldAssignments, PopulateError> {
        Ok(&self.models[self.position(model)?].assignments)
    }

    /// Instance index the next generated row of `model` gets.
    pub fn next_index(&self, model: &str) -> Result<u64, PopulateError> {
        Ok(self.models[self.position(model)?].next_index)
    }

    /// Mutable field assignments of `model`.
    pub fn model_mut(&mut self, model: &str) -> Result<&mut FieldAssignments, PopulateError> {
        let idx = self.position(model)?;
        Ok(&mut self.models[idx].assignments)
    }

    /// Shorthand for `model_mut(model)?.set(field, spec)`.
    pub fn assign(
        &mut self,
        model: &str,
        field: &str,
        spec: ValueSpec,
    ) -> Result<Option<ValueSpec>, PopulateError> {
        self.model_mut(model)?.set(field, spec)
    }

    /// Introspector of `model`.
    pub fn introspector(&self, model: &str) -> Result<&Arc<dyn ModelIntrospector>, PopulateError> {
        self.introspectors
            .get(model)
            .ok_or_else(|| PopulateError::UnknownModel(model.to_string()))
    }

    /// Order `generate()` would process the models in.
    pub fn planned_order(&self) -> Result<Vec<ModelId>, PopulateError> {
        planned_order(&self.descriptors())
    }

    fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.models.iter().map(|m| m.descriptor.clone()).collect()
    }

    /// Persist `counts[i]` new instances of the i-th registered model.
    ///
    /// Referenced models are fully generated before the models referencing
    /// them. Rows persisted before a failure are kept.
    pub async fn generate(&mut self, counts: &[u64]) -> Result<GenerationReport, PopulateError> {
        if counts.len() != self.models.len() {
            return Err(PopulateError::ArgumentCountMismatch {
                expected: self.models.len(),
                actual: counts.len(),
            });
        }

        let start_time = Instant::now();
        let descriptors = self.descriptors();
        let mut queue = ProcessingQueue::new(&descriptors)?;
        let mut state = ProcessingState::new(descriptors.len());
        let mut report = GenerationReport::default();

        info!(
            models = descriptors.len(),
            rows = counts.iter().sum::<u64>(),
            "Starting generation"
        );

        while let Some(idx) = queue.next_ready(&state)? {
            let RegisteredModel {
                descriptor,
                assignments,
                next_index,
            } = &mut self.models[idx];
            let generator = InstanceGenerator::new(descriptor, assignments, &self.introspectors);
            report
                .models
                .push(generator.generate(counts[idx], next_index, &mut self.rng).await?);
            state.mark_processed(idx);
        }

        report.total_duration = start_time.elapsed();
        info!(
            "Generation complete: {} rows in {:?} ({:.2} rows/sec)",
            report.rows_inserted(),
            report.total_duration,
            report.rows_per_second()
        );
        Ok(report)
    }
}
