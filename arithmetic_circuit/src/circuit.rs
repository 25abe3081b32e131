use std::collections::{BTreeSet, HashSet};

use ark_ff::PrimeField;

use crate::wire::Wire;

/// A static DAG of wires, stored in topological order: every wire appears
/// after all of its inputs. `Circuit::new` derives this order (and each
/// wire's `nb_unique_outputs`) from whatever order the caller supplies and
/// remaps input indices accordingly.
pub struct Circuit<F: PrimeField> {
    wires: Vec<Wire<F>>,
}

impl<F: PrimeField> Circuit<F> {
    pub fn new(wires: Vec<Wire<F>>) -> Self {
        let mut wires = wires;
        let order = topological_sort(&mut wires);

        let mut new_pos = vec![0usize; wires.len()];
        for (new_i, &old_i) in order.iter().enumerate() {
            new_pos[old_i] = new_i;
        }

        let mut slots: Vec<Option<Wire<F>>> = wires.into_iter().map(Some).collect();
        let sorted = order
            .iter()
            .map(|&old_i| {
                let mut w = slots[old_i].take().expect("topological order visits each wire once");
                w.inputs = w.inputs.iter().map(|&i| new_pos[i]).collect();
                w
            })
            .collect();

        Self { wires: sorted }
    }

    pub fn wires(&self) -> &[Wire<F>] {
        &self.wires
    }

    pub fn len(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    pub fn wire(&self, index: usize) -> &Wire<F> {
        &self.wires[index]
    }

    /// Wire indices in reverse topological order: every wire appears before
    /// all of its inputs. This is the order `GkrDriver` proves/verifies in.
    pub fn reverse_topological_order(&self) -> impl Iterator<Item = usize> {
        (0..self.wires.len()).rev()
    }
}

/// Kahn's algorithm keyed by a wire's raw input count, breaking ties by
/// smallest index so an already-sorted input keeps its relative order.
/// Also populates `nb_unique_outputs` on each wire, counting only distinct
/// downstream consumers (duplicated inputs to one gate count once).
fn topological_sort<F: PrimeField>(wires: &mut [Wire<F>]) -> Vec<usize> {
    let n = wires.len();

    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, w) in wires.iter().enumerate() {
        for &u in &w.inputs {
            consumers[u].push(i);
        }
    }

    let mut distinct_consumers: Vec<HashSet<usize>> = vec![HashSet::new(); n];
    for (i, w) in wires.iter().enumerate() {
        for u in w.distinct_inputs() {
            distinct_consumers[u].insert(i);
        }
    }
    for (i, consumers) in distinct_consumers.into_iter().enumerate() {
        wires[i].nb_unique_outputs = consumers.len();
    }

    let mut status: Vec<i64> = wires.iter().map(|w| w.inputs.len() as i64).collect();
    let mut ready: BTreeSet<usize> = status
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(&i) = ready.iter().next() {
        ready.remove(&i);
        order.push(i);
        status[i] = -1;
        for &c in &consumers[i] {
            status[c] -= 1;
            if status[c] == 0 {
                ready.insert(c);
            }
        }
    }

    assert_eq!(
        order.len(),
        n,
        "circuit has a cycle or a wire references an input outside the circuit"
    );
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;
    use ark_bn254::Fq;

    #[test]
    fn topological_order_places_every_wire_after_its_inputs() {
        // w2 = w0 * w1, built with inputs listed out of order on purpose.
        let circuit: Circuit<Fq> = Circuit::new(vec![
            Wire::new(Gate::Mul, vec![1, 2]),
            Wire::input(),
            Wire::input(),
        ]);

        for (pos, w) in circuit.wires().iter().enumerate() {
            for &input in &w.inputs {
                assert!(input < pos, "wire {pos} references input at or after itself");
            }
        }
    }

    #[test]
    fn nb_unique_outputs_counts_distinct_consumers_once() {
        // sq(x) = x * x, single wire used twice by the same gate.
        let circuit: Circuit<Fq> = Circuit::new(vec![Wire::input(), Wire::new(Gate::Mul, vec![0, 0])]);

        let input_wire = circuit.wire(0);
        assert_eq!(input_wire.nb_unique_outputs(), 1);
    }

    #[test]
    fn output_wire_has_no_consumers() {
        let circuit: Circuit<Fq> =
            Circuit::new(vec![Wire::input(), Wire::input(), Wire::new(Gate::Add, vec![0, 1])]);

        let output = circuit.wires().last().unwrap();
        assert!(output.is_output());
    }
}
