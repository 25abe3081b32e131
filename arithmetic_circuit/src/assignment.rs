use ark_ff::PrimeField;
use polynomials::MultiLin;

use crate::circuit::Circuit;

/// A mapping from wire index to the `MultiLin` of that wire's values across
/// all `N = 2^logN` parallel instances. Input wires are set directly by the
/// caller; `complete` derives the rest.
pub struct WireAssignment<F: PrimeField> {
    values: Vec<Option<MultiLin<F>>>,
}

impl<F: PrimeField> WireAssignment<F> {
    pub fn new(circuit_len: usize) -> Self {
        Self {
            values: vec![None; circuit_len],
        }
    }

    pub fn set(&mut self, wire_index: usize, assignment: MultiLin<F>) {
        self.values[wire_index] = Some(assignment);
    }

    pub fn get(&self, wire_index: usize) -> &MultiLin<F> {
        self.values[wire_index]
            .as_ref()
            .unwrap_or_else(|| panic!("wire {wire_index} has no assignment"))
    }

    pub fn is_set(&self, wire_index: usize) -> bool {
        self.values[wire_index].is_some()
    }

    /// Evaluates every non-input wire from its already-set inputs, in
    /// topological order, so each wire's inputs are available by the time
    /// it is reached.
    pub fn complete(&mut self, circuit: &Circuit<F>) {
        for (i, wire) in circuit.wires().iter().enumerate() {
            if wire.is_input() {
                assert!(self.is_set(i), "input wire {i} has no assignment");
                continue;
            }

            let n = self.get(wire.inputs[0]).len();
            let inputs: Vec<&MultiLin<F>> = wire.inputs.iter().map(|&u| self.get(u)).collect();

            let mut args = vec![F::zero(); inputs.len()];
            let evals: Vec<F> = (0..n)
                .map(|k| {
                    for (slot, input) in args.iter_mut().zip(inputs.iter()) {
                        *slot = input.evaluations()[k];
                    }
                    wire.gate.evaluate(&args)
                })
                .collect();

            self.values[i] = Some(MultiLin::from_evaluations(evals));
        }
    }
}
