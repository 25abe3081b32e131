use ark_ff::PrimeField;

use crate::gate::Gate;

/// A node in the circuit DAG: a gate plus back-references to its inputs.
///
/// `inputs` may repeat a wire (a gate can use the same source twice); `gate`
/// for an input wire is always `Gate::Identity`, assigned purely so downstream
/// code can treat every wire uniformly.
#[derive(Clone)]
pub struct Wire<F: PrimeField> {
    pub gate: Gate<F>,
    pub inputs: Vec<usize>,
    pub(crate) nb_unique_outputs: usize,
}

impl<F: PrimeField> Wire<F> {
    pub fn new(gate: Gate<F>, inputs: Vec<usize>) -> Self {
        Self {
            gate,
            inputs,
            nb_unique_outputs: 0,
        }
    }

    pub fn input() -> Self {
        Self::new(Gate::Identity, Vec::new())
    }

    pub fn is_input(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn is_output(&self) -> bool {
        self.nb_unique_outputs == 0
    }

    pub fn nb_unique_outputs(&self) -> usize {
        self.nb_unique_outputs
    }

    pub fn nb_claims(&self) -> usize {
        if self.is_output() {
            1
        } else {
            self.nb_unique_outputs
        }
    }

    pub fn no_proof(&self) -> bool {
        self.is_input() && self.nb_claims() == 1
    }

    /// Distinct input wire indices, in first-seen order.
    pub fn distinct_inputs(&self) -> Vec<usize> {
        let mut seen = std::collections::HashSet::new();
        self.inputs
            .iter()
            .copied()
            .filter(|i| seen.insert(*i))
            .collect()
    }
}
