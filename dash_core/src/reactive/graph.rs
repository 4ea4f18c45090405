//! Declared widget bindings re-evaluated when their inputs change.
//!
//! Each binding names one output widget, the input widgets it reads and a
//! recompute function. Bindings run in topological order (declaration order
//! breaks ties), so a change is seen by every downstream binding exactly once
//! and only after all of that binding's upstream outputs are current.
//!
//! A failing callback does not stop the pass: the other bindings still run,
//! the failed output keeps its previous value, and the binding is retried on
//! the next call even when the input it reads did not change.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, warn};
use serde_json::Value;

use super::store::WidgetStore;
use crate::common::dash_exception::{DashError, DashResult, ErrCode};

pub type Recompute = Box<dyn Fn(&[&Value]) -> DashResult<Value>>;

pub struct Binding {
    pub output: String,
    pub inputs: Vec<String>,
    recompute: Recompute,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ReactiveGraph {
    store: WidgetStore,
    bindings: Vec<Binding>,
    order: Vec<usize>,
    failed: BTreeSet<usize>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&mut self, output: &str, inputs: &[&str], recompute: F) -> DashResult<()>
    where
        F: Fn(&[&Value]) -> DashResult<Value> + 'static,
    {
        if self.bindings.iter().any(|b| b.output == output) {
            return Err(DashError::new(
                format!("{} already has a binding", output),
                ErrCode::ConfigError,
            ));
        }
        if inputs.iter().any(|i| *i == output) {
            return Err(DashError::new(
                format!("{} cannot be an input of its own binding", output),
                ErrCode::ConfigError,
            ));
        }

        self.bindings.push(Binding {
            output: output.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            recompute: Box::new(recompute),
        });

        match topo_order(&self.bindings) {
            Some(order) => {
                self.order = order;
                Ok(())
            }
            None => {
                self.bindings.pop();
                Err(DashError::new(
                    format!("binding {} would create a cycle", output),
                    ErrCode::ConfigError,
                ))
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.store.get(id)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.order.iter().map(move |&i| &self.bindings[i])
    }

    /// Store `value` for widget `id` and recompute everything downstream.
    ///
    /// Returns the ids of the outputs whose value changed, in evaluation order.
    /// If any callback fails the error names every failed output; outputs
    /// that did compute are kept.
    pub fn set_input(&mut self, id: &str, value: Value) -> DashResult<Vec<String>> {
        let changed = self.store.set(id, value);
        if !changed && self.failed.is_empty() {
            debug!("{} unchanged, nothing to recompute", id);
            return Ok(Vec::new());
        }
        let mut dirty = HashSet::new();
        if changed {
            dirty.insert(id.to_string());
        }
        self.propagate(dirty, false)
    }

    /// Compute every binding whose inputs are available
    pub fn evaluate_all(&mut self) -> DashResult<Vec<String>> {
        self.propagate(HashSet::new(), true)
    }

    fn propagate(&mut self, mut dirty: HashSet<String>, all: bool) -> DashResult<Vec<String>> {
        let mut updated = Vec::new();
        let mut errors = Vec::new();
        for &idx in &self.order {
            let binding = &self.bindings[idx];
            let retry = self.failed.contains(&idx);
            if !all && !retry && !binding.inputs.iter().any(|i| dirty.contains(i)) {
                continue;
            }

            let result = {
                let Some(args) = self.store.gather(&binding.inputs) else {
                    debug!("skipping {}: inputs not ready", binding.output);
                    continue;
                };
                debug!("recomputing {} from {:?}", binding.output, binding.inputs);
                (binding.recompute)(&args)
            };

            match result {
                Ok(new_value) => {
                    self.failed.remove(&idx);
                    if self.store.set(&binding.output, new_value) {
                        dirty.insert(binding.output.clone());
                        updated.push(binding.output.clone());
                    }
                }
                Err(e) => {
                    warn!("callback for {} failed: {}", binding.output, e);
                    self.failed.insert(idx);
                    errors.push(format!("{}: {}", binding.output, e));
                }
            }
        }

        if errors.is_empty() {
            Ok(updated)
        } else {
            Err(DashError::new(
                format!("callback failed for {}", errors.join("; ")),
                ErrCode::CallbackError,
            ))
        }
    }
}

/// Kahn's algorithm over "output feeds input" edges, lowest index first
fn topo_order(bindings: &[Binding]) -> Option<Vec<usize>> {
    let producer: HashMap<&str, usize> = bindings
        .iter()
        .enumerate()
        .map(|(i, b)| (b.output.as_str(), i))
        .collect();

    let mut indegree = vec![0usize; bindings.len()];
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); bindings.len()];
    for (i, b) in bindings.iter().enumerate() {
        for input in &b.inputs {
            if let Some(&p) = producer.get(input.as_str()) {
                downstream[p].push(i);
                indegree[i] += 1;
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..bindings.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(bindings.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &d in &downstream[i] {
            indegree[d] -= 1;
            if indegree[d] == 0 {
                ready.insert(d);
            }
        }
    }

    (order.len() == bindings.len()).then_some(order)
}
