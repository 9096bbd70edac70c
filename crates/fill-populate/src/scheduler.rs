//! Dependency scheduling.
//!
//! Models are processed from a queue. A model whose dependencies are not all
//! processed yet goes back to the end of the queue; a full pass over the
//! queue without progress means the remaining models form (or wait on) a
//! cycle.

use crate::descriptor::ModelDescriptor;
use crate::error::PopulateError;
use fill_core::ModelId;
use std::collections::{HashMap, VecDeque};

/// Per-model "processed" flags for one generation run, by registration index.
#[derive(Debug, Clone)]
pub struct ProcessingState {
    processed: Vec<bool>,
}

impl ProcessingState {
    pub fn new(model_count: usize) -> Self {
        Self {
            processed: vec![false; model_count],
        }
    }

    pub fn is_processed(&self, index: usize) -> bool {
        self.processed.get(index).copied().unwrap_or(false)
    }

    pub fn mark_processed(&mut self, index: usize) {
        if let Some(flag) = self.processed.get_mut(index) {
            *flag = true;
        }
    }

    pub fn all_processed(&self) -> bool {
        self.processed.iter().all(|p| *p)
    }
}

/// Queue of registration indices still waiting to be processed.
#[derive(Debug, Clone)]
pub struct ProcessingQueue {
    queue: VecDeque<usize>,
    models: Vec<ModelId>,
    /// Registration indices each model waits on (self excluded)
    dependencies: Vec<Vec<usize>>,
    /// Deferrals since the last model was handed out
    stalled: usize,
}

impl ProcessingQueue {
    /// Build the queue. Models with fewer reference fields come first; ties
    /// keep registration order.
    pub fn new(descriptors: &[ModelDescriptor]) -> Result<Self, PopulateError> {
        let positions: HashMap<&ModelId, usize> = descriptors
            .iter()
            .enumerate()
            .map(|(idx, d)| (d.model(), idx))
            .collect();

        let mut dependencies = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let mut deps = Vec::new();
            for (field, target) in descriptor.references() {
                if target == descriptor.model() {
                    continue;
                }
                let idx = *positions.get(target).ok_or_else(|| {
                    PopulateError::UnregisteredReference {
                        model: descriptor.model().clone(),
                        field: field.to_string(),
                        target: target.clone(),
                    }
                })?;
                if !deps.contains(&idx) {
                    deps.push(idx);
                }
            }
            dependencies.push(deps);
        }

        let mut order: Vec<usize> = (0..descriptors.len()).collect();
        order.sort_by_key(|&idx| descriptors[idx].reference_count());

        Ok(Self {
            queue: order.into(),
            models: descriptors.iter().map(|d| d.model().clone()).collect(),
            dependencies,
            stalled: 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    fn is_ready(&self, index: usize, state: &ProcessingState) -> bool {
        self.dependencies[index]
            .iter()
            .all(|&dep| state.is_processed(dep))
    }

    /// Next model whose dependencies are all processed, or `None` once the
    /// queue is drained.
    ///
    /// The caller must mark the returned model processed before asking for
    /// the next one.
    pub fn next_ready(&mut self, state: &ProcessingState) -> Result<Option<usize>, PopulateError> {
        while let Some(index) = self.queue.pop_front() {
            if self.is_ready(index, state) {
                self.stalled = 0;
                return Ok(Some(index));
            }

            self.queue.push_back(index);
            self.stalled += 1;
            if self.stalled >= self.queue.len() {
                let mut models: Vec<ModelId> =
                    self.queue.iter().map(|&i| self.models[i].clone()).collect();
                models.sort();
                return Err(PopulateError::CyclicDependency { models });
            }
        }
        Ok(None)
    }
}

/// Processing order the scheduler would follow, without generating anything.
pub fn planned_order(descriptors: &[ModelDescriptor]) -> Result<Vec<ModelId>, PopulateError> {
    let mut queue = ProcessingQueue::new(descriptors)?;
    let mut state = ProcessingState::new(descriptors.len());
    let mut order = Vec::with_capacity(descriptors.len());
    while let Some(index) = queue.next_ready(&state)? {
        state.mark_processed(index);
        order.push(descriptors[index].model().clone());
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(descriptors: &[ModelDescriptor]) -> Vec<String> {
        planned_order(descriptors)
            .unwrap()
            .into_iter()
            .map(|m| m.to_string())
            .collect()
    }

    #[test]
    fn test_dependencies_come_first() {
        let descriptors = vec![
            ModelDescriptor::for_test("comments", &["id", "post", "author"], &[
                ("post", "posts"),
                ("author", "users"),
            ]),
            ModelDescriptor::for_test("posts", &["id", "author"], &[("author", "users")]),
            ModelDescriptor::for_test("users", &["id", "name"], &[]),
        ];

        assert_eq!(order(&descriptors), vec!["users", "posts", "comments"]);
    }

    #[test]
    fn test_deferred_models_are_retried() {
        // Same reference count, so "b" is attempted before its dependency "c".
        let descriptors = vec![
            ModelDescriptor::for_test("a", &["id"], &[]),
            ModelDescriptor::for_test("b", &["id", "c"], &[("c", "c")]),
            ModelDescriptor::for_test("c", &["id", "a"], &[("a", "a")]),
        ];

        assert_eq!(order(&descriptors), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let descriptors = vec![
            ModelDescriptor::for_test("tags", &["id"], &[]),
            ModelDescriptor::for_test("users", &["id"], &[]),
            ModelDescriptor::for_test("colors", &["id"], &[]),
        ];

        assert_eq!(order(&descriptors), vec!["tags", "users", "colors"]);
    }

    #[test]
    fn test_self_reference_does_not_block() {
        let descriptors = vec![ModelDescriptor::for_test(
            "categories",
            &["id", "parent"],
            &[("parent", "categories")],
        )];

        assert_eq!(order(&descriptors), vec!["categories"]);
    }

    #[test]
    fn test_two_model_cycle_detected() {
        let descriptors = vec![
            ModelDescriptor::for_test("a", &["id", "b"], &[("b", "b")]),
            ModelDescriptor::for_test("b", &["id", "a"], &[("a", "a")]),
        ];

        let err = planned_order(&descriptors).unwrap_err();
        match err {
            PopulateError::CyclicDependency { models } => {
                assert_eq!(models, vec![ModelId::from("a"), ModelId::from("b")]);
            }
            other => panic!("Expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_reported_after_independent_models() {
        let descriptors = vec![
            ModelDescriptor::for_test("users", &["id"], &[]),
            ModelDescriptor::for_test("a", &["id", "b"], &[("b", "b")]),
            ModelDescriptor::for_test("b", &["id", "a"], &[("a", "a")]),
            ModelDescriptor::for_test("c", &["id", "a", "u"], &[("a", "a"), ("u", "users")]),
        ];

        let mut queue = ProcessingQueue::new(&descriptors).unwrap();
        let mut state = ProcessingState::new(descriptors.len());

        assert_eq!(queue.next_ready(&state).unwrap(), Some(0));
        state.mark_processed(0);

        let err = queue.next_ready(&state).unwrap_err();
        assert!(matches!(
            err,
            PopulateError::CyclicDependency { ref models } if models.len() == 3
        ));
        assert!(!state.all_processed());
    }

    #[test]
    fn test_unregistered_reference() {
        let descriptors = vec![ModelDescriptor::for_test(
            "posts",
            &["id", "author"],
            &[("author", "users")],
        )];

        assert!(matches!(
            ProcessingQueue::new(&descriptors),
            Err(PopulateError::UnregisteredReference { .. })
        ));
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = ProcessingQueue::new(&[]).unwrap();
        assert!(queue.is_empty());
        assert_eq!(queue.next_ready(&ProcessingState::new(0)).unwrap(), None);
    }
}
