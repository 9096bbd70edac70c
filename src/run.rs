//! Populate and check command runners.

use crate::backends::{AdapterRegistry, BackendSession, PopulateTarget};
use anyhow::{anyhow, Context};
use fill_core::{FillPlan, ModelId, SchemaError};
use fill_generator::model_specs;
use fill_populate::{
    planned_order, CommonPopulateArgs, CountOverride, GenerationReport, MemoryStore,
    ModelDescriptor, ModelIntrospector, ModelRegistry, PopulateError,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load and validate a fill plan.
pub fn load_plan(path: &Path) -> anyhow::Result<FillPlan> {
    FillPlan::from_file(path).with_context(|| format!("Failed to load fill plan from {path:?}"))
}

/// Apply command-line count overrides to `plan` and return its per-model
/// counts in registration order.
pub fn resolve_counts(
    plan: &mut FillPlan,
    overrides: &[CountOverride],
) -> anyhow::Result<Vec<u64>> {
    for o in overrides {
        plan.set_count(&o.model, o.count).map_err(|e| match e {
            SchemaError::ModelNotFound(model) => {
                anyhow!("--count refers to unknown model '{model}'")
            }
            SchemaError::InvalidCount { model, count } => {
                anyhow::Error::new(PopulateError::InvalidArgument(format!(
                    "count for model '{model}' must be >= 0, got {count}"
                )))
            }
            other => other.into(),
        })?;
    }
    Ok(plan.counts()?)
}

/// Register the plan's models on the target backend, assign their
/// generators and generate `counts` instances.
///
/// The backend connection is closed afterwards, whether or not generation
/// succeeded.
pub async fn populate_plan(
    adapters: &AdapterRegistry,
    target: &PopulateTarget,
    plan: &FillPlan,
    seed: u64,
    counts: &[u64],
) -> anyhow::Result<GenerationReport> {
    let factory = adapters.get(target.kind())?;
    let BackendSession {
        adapters: introspectors,
        connection,
    } = factory
        .open(target, seed, plan.model_definitions())
        .await?;

    let result = generate(introspectors, target, plan, seed, counts).await;

    if let Some(connection) = connection {
        if let Err(e) = connection.close().await {
            warn!(backend = %target.kind(), "{e:#}");
        }
    }
    result
}

async fn generate(
    introspectors: Vec<Arc<dyn ModelIntrospector>>,
    target: &PopulateTarget,
    plan: &FillPlan,
    seed: u64,
    counts: &[u64],
) -> anyhow::Result<GenerationReport> {
    let mut registry = ModelRegistry::register(introspectors)
        .await
        .context("Failed to register models")?
        .with_seed(seed);

    for model in &plan.models {
        for (field, spec) in model_specs(model, plan.locale_of(model))? {
            registry.assign(model.name.as_str(), &field, spec)?;
        }
    }

    info!(
        backend = %target.kind(),
        seed,
        "Populating {} models",
        plan.models.len()
    );
    let report = registry.generate(counts).await?;
    for model in &report.models {
        info!(
            "Populated {}: {} rows in {:?}",
            model.model, model.rows_inserted, model.duration
        );
    }
    Ok(report)
}

/// Run the populate command.
pub async fn run_populate(
    adapters: &AdapterRegistry,
    target: PopulateTarget,
    common: &CommonPopulateArgs,
) -> anyhow::Result<GenerationReport> {
    let mut plan = load_plan(&common.plan)?;
    if let Some(locale) = common.locale {
        plan.locale = locale;
    }
    let seed = common.seed.unwrap_or(plan.seed);
    let counts = resolve_counts(&mut plan, &common.counts)?;
    populate_plan(adapters, &target, &plan, seed, &counts).await
}

/// Validate a plan without touching any database and return the order its
/// models would be generated in.
pub fn check_plan(plan: &FillPlan) -> anyhow::Result<Vec<ModelId>> {
    for model in &plan.models {
        model_specs(model, plan.locale_of(model))?;
    }

    let store = MemoryStore::new(plan.seed);
    let mut descriptors = Vec::with_capacity(plan.models.len());
    for definition in plan.model_definitions() {
        let introspector: Arc<dyn ModelIntrospector> = Arc::new(store.model(definition));
        descriptors.push(ModelDescriptor::from_introspector(&*introspector)?);
    }
    Ok(planned_order(&descriptors)?)
}
