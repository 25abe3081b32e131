use std::collections::HashMap;

use ark_ff::PrimeField;

use arithmetic_circuit::{Circuit, Gate, Wire, WireAssignment};
use polynomials::{BufferPool, MultiLin};
use sumcheck::{Claims, LazyClaims, SumCheckError};

/// For a wire's gate, the distinct input wires it reads from (in first-seen
/// order) and, for each position in `wire.inputs` (duplicates included), the
/// index into that distinct list. Input wires have no real inputs, but their
/// own sum-check still needs exactly one "input": themselves.
fn resolve_inputs<F: PrimeField>(wire_index: usize, wire: &Wire<F>) -> (Vec<usize>, Vec<usize>) {
    if wire.is_input() {
        return (vec![wire_index], vec![0]);
    }

    let distinct = wire.distinct_inputs();
    let mut position_of = HashMap::with_capacity(distinct.len());
    for (i, &w) in distinct.iter().enumerate() {
        position_of.insert(w, i);
    }
    let positions = wire.inputs.iter().map(|w| position_of[w]).collect();
    (distinct, positions)
}

/// `Σ_j (point[j]*r[j] + (1-point[j])*(1-r[j]))`, the `eq` extension
/// evaluated directly at a point rather than materialized into a table.
///
/// `r` is a round-challenge sequence as drawn (round 0 first), but each round
/// folds away the *current* highest-indexed variable, so round 0's challenge
/// ends up bound to the highest variable, not the lowest. `r` must therefore
/// be read back to front to line up with `point`'s `point[j] -> variable j`
/// convention.
fn eq_eval<F: PrimeField>(point: &[F], r: &[F]) -> F {
    point
        .iter()
        .zip(r.iter().rev())
        .fold(F::one(), |acc, (&x, &y)| acc * (x * y + (F::one() - x) * (F::one() - y)))
}

struct ClaimBundle<F: PrimeField> {
    points: Vec<Vec<F>>,
    values: Vec<F>,
}

impl<F: PrimeField> ClaimBundle<F> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }
}

/// Collects, per wire, the claims its consumers push down during the
/// reverse-topological walk, and hands back prover/verifier views ready to
/// drive a generic sum-check instance.
pub struct ClaimsManager<'a, F: PrimeField> {
    circuit: &'a Circuit<F>,
    assignment: &'a WireAssignment<F>,
    pool: &'a BufferPool<F>,
    bundles: Vec<Option<ClaimBundle<F>>>,
}

impl<'a, F: PrimeField> ClaimsManager<'a, F> {
    pub fn new(circuit: &'a Circuit<F>, assignment: &'a WireAssignment<F>, pool: &'a BufferPool<F>) -> Self {
        let len = circuit.len();
        Self {
            circuit,
            assignment,
            pool,
            bundles: (0..len).map(|_| None).collect(),
        }
    }

    pub fn add(&mut self, wire_index: usize, point: Vec<F>, value: F) {
        let capacity = self.circuit.wire(wire_index).nb_claims();
        let bundle = self.bundles[wire_index].get_or_insert_with(|| ClaimBundle::with_capacity(capacity));
        bundle.points.push(point);
        bundle.values.push(value);
    }

    /// Pushes claims onto `wire`'s distinct inputs, one per entry in
    /// `resolve_inputs`, using `wire`'s own point `r` and the evaluations
    /// `prove_final_eval` returned. A no-op for input wires: they have
    /// nothing further downstream to register claims on.
    ///
    /// `r` is the round-challenge sequence as drawn, which (per `eq_eval`'s
    /// doc comment) binds variable `j` to `r[n-1-j]`, not `r[j]`. Every point
    /// stored in a claim bundle must conform to the `point[j] -> variable j`
    /// convention `eq`/`evaluate` use, so `r` is reversed before it's stored.
    pub fn add_for_input(&mut self, wire_index: usize, r: &[F], evaluations: &[F]) {
        let wire = self.circuit.wire(wire_index);
        if wire.is_input() {
            return;
        }

        let distinct = wire.distinct_inputs();
        assert_eq!(
            distinct.len(),
            evaluations.len(),
            "wire {wire_index}: final-eval proof length must match its distinct input count"
        );
        let point: Vec<F> = r.iter().rev().copied().collect();
        for (&input_index, &value) in distinct.iter().zip(evaluations) {
            self.add(input_index, point.clone(), value);
        }
    }

    pub fn delete_claim(&mut self, wire_index: usize) {
        self.bundles[wire_index] = None;
    }

    pub fn has_claim(&self, wire_index: usize) -> bool {
        self.bundles[wire_index].is_some()
    }

    /// Direct check for a `noProof` wire (an input wire with exactly one
    /// claim): no sum-check was run for it, so the verifier compares the
    /// claimed value against the wire's own assignment at the claim's point.
    pub fn verify_direct(&self, wire_index: usize) -> bool {
        let bundle = self.bundles[wire_index]
            .as_ref()
            .unwrap_or_else(|| panic!("wire {wire_index} has no claim to verify directly"));
        debug_assert_eq!(bundle.points.len(), 1, "noProof wires carry exactly one claim");
        self.assignment.get(wire_index).evaluate(&bundle.points[0]) == bundle.values[0]
    }

    /// Builds the prover-side sum-check instance for `wire_index`, cloning
    /// (via the pool) the current assignment of each distinct input.
    pub fn get_claim(&mut self, wire_index: usize) -> ActiveClaim<'a, F> {
        let wire = self.circuit.wire(wire_index);
        let (distinct, input_positions) = resolve_inputs(wire_index, wire);
        let input_preprocessors: Vec<MultiLin<F>> = distinct
            .iter()
            .map(|&i| self.pool.clone(self.assignment.get(i)))
            .collect();

        let bundle = self.bundles[wire_index]
            .take()
            .unwrap_or_else(|| panic!("wire {wire_index} has no claims to prove"));

        ActiveClaim {
            pool: self.pool,
            gate: wire.gate.clone(),
            input_positions,
            input_preprocessors,
            eq: None,
            points: bundle.points,
            values: bundle.values,
        }
    }

    /// Builds the verifier-side view for `wire_index`. Borrows the bundle and
    /// the circuit/assignment rather than cloning anything: the verifier
    /// never materializes per-round state.
    pub fn get_lazy_claim(&self, wire_index: usize) -> LazyClaimView<'_, F> {
        let wire = self.circuit.wire(wire_index);
        let bundle = self.bundles[wire_index]
            .as_ref()
            .unwrap_or_else(|| panic!("wire {wire_index} has no claims to verify"));

        LazyClaimView {
            wire_index,
            wire,
            points: &bundle.points,
            values: &bundle.values,
            assignment: self.assignment,
        }
    }
}

/// Prover-side sum-check instance for one wire: the gate, a running `eq`
/// table combining the wire's claims, and a clone of each distinct input's
/// assignment, folded in lockstep round by round.
pub struct ActiveClaim<'a, F: PrimeField> {
    pool: &'a BufferPool<F>,
    gate: Gate<F>,
    input_positions: Vec<usize>,
    input_preprocessors: Vec<MultiLin<F>>,
    eq: Option<MultiLin<F>>,
    points: Vec<Vec<F>>,
    values: Vec<F>,
}

impl<'a, F: PrimeField> ActiveClaim<'a, F> {
    fn degree_value(&self) -> usize {
        1 + self.gate.degree()
    }

    fn eq_table(&self) -> &MultiLin<F> {
        self.eq.as_ref().expect("combine() must run before next()/prove_final_eval()")
    }

    /// Hands the `eq` table and input preprocessors back to the pool. Call
    /// once a wire's sum-check (and `prove_final_eval`) is complete.
    pub fn into_buffers(self) -> Vec<MultiLin<F>> {
        let mut bufs = self.input_preprocessors;
        if let Some(eq) = self.eq {
            bufs.push(eq);
        }
        bufs
    }

    fn round_poly(&self) -> Vec<F> {
        let eq = self.eq_table();
        let k = eq.len() / 2;
        let deg = self.degree_value();

        let eq_ev = eq.evaluations();
        let eq_step: Vec<F> = (0..k).map(|i| eq_ev[k + i] - eq_ev[i]).collect();
        let mut running_eq: Vec<F> = eq_ev[k..].to_vec();

        let pre_ev: Vec<&[F]> = self.input_preprocessors.iter().map(|p| p.evaluations()).collect();
        let pre_steps: Vec<Vec<F>> = pre_ev
            .iter()
            .map(|ev| (0..k).map(|i| ev[k + i] - ev[i]).collect())
            .collect();
        let mut running_pre: Vec<Vec<F>> = pre_ev.iter().map(|ev| ev[k..].to_vec()).collect();

        let mut evaluations = Vec::with_capacity(deg);
        for d in 0..deg {
            if d > 0 {
                for i in 0..k {
                    running_eq[i] += eq_step[i];
                }
                for (p, step) in running_pre.iter_mut().zip(pre_steps.iter()) {
                    for i in 0..k {
                        p[i] += step[i];
                    }
                }
            }
            evaluations.push(sum_over_hypercube(&running_eq, &running_pre, &self.input_positions, &self.gate));
        }
        evaluations
    }

    /// Builds `Σ_i alpha^i * eq(points[i], ·)` into a fresh pool buffer.
    fn combine_eq(&self, alpha: F) -> MultiLin<F> {
        let n = self.points[0].len();
        let size = 1usize << n;

        let mut combined = self.pool.make(size);
        combined.evaluations_mut()[0] = F::one();
        combined.eq(&self.points[0]);

        let mut alpha_pow = alpha;
        for point in &self.points[1..] {
            let mut term = self.pool.make(size);
            term.evaluations_mut()[0] = alpha_pow;
            term.eq(point);
            for (c, t) in combined.evaluations_mut().iter_mut().zip(term.evaluations()) {
                *c += *t;
            }
            self.pool.dump([term]);
            alpha_pow *= alpha;
        }

        combined
    }
}

/// Sums `eq[i] * gate.evaluate(inputs at i)` over the half-sized hypercube,
/// splitting the index range across two threads once it's large enough that
/// the split pays for itself.
fn sum_over_hypercube<F: PrimeField>(
    running_eq: &[F],
    running_pre: &[Vec<F>],
    input_positions: &[usize],
    gate: &Gate<F>,
) -> F {
    const PARALLEL_THRESHOLD: usize = 1024;
    let k = running_eq.len();

    if k >= PARALLEL_THRESHOLD {
        let half = k / 2;
        std::thread::scope(|s| {
            let handle = s.spawn(|| partial_sum(&running_eq[..half], running_pre, 0, input_positions, gate));
            let second_half = partial_sum(&running_eq[half..], running_pre, half, input_positions, gate);
            handle.join().expect("hypercube summation thread panicked") + second_half
        })
    } else {
        partial_sum(running_eq, running_pre, 0, input_positions, gate)
    }
}

fn partial_sum<F: PrimeField>(
    eq_slice: &[F],
    running_pre: &[Vec<F>],
    offset: usize,
    input_positions: &[usize],
    gate: &Gate<F>,
) -> F {
    let mut acc = F::zero();
    let mut args = vec![F::zero(); input_positions.len()];
    for (local_i, &eq_val) in eq_slice.iter().enumerate() {
        let i = offset + local_i;
        for (slot, &pos) in args.iter_mut().zip(input_positions.iter()) {
            *slot = running_pre[pos][i];
        }
        acc += eq_val * gate.evaluate(&args);
    }
    acc
}

impl<'a, F: PrimeField> Claims<F> for ActiveClaim<'a, F> {
    fn vars_num(&self) -> usize {
        self.points[0].len()
    }

    fn claims_num(&self) -> usize {
        self.points.len()
    }

    fn degree(&self, _round: usize) -> usize {
        self.degree_value()
    }

    fn combine(&mut self, alpha: F) -> Vec<F> {
        self.eq = Some(self.combine_eq(alpha));
        self.round_poly()
    }

    fn next(&mut self, r: F) -> Vec<F> {
        self.eq.as_mut().expect("combine() must run first").fold(r);
        for p in self.input_preprocessors.iter_mut() {
            p.fold(r);
        }
        self.round_poly()
    }

    fn prove_final_eval(&mut self, r: &[F]) -> Vec<F> {
        debug_assert_eq!(r.len(), self.vars_num());
        self.input_preprocessors.iter().map(|p| p.evaluations()[0]).collect()
    }
}

/// Verifier-side view of the claim bundle for one wire: no preprocessors, no
/// running state, everything recomputed directly from `points`/`values`.
pub struct LazyClaimView<'a, F: PrimeField> {
    wire_index: usize,
    wire: &'a Wire<F>,
    points: &'a [Vec<F>],
    values: &'a [F],
    assignment: &'a WireAssignment<F>,
}

impl<'a, F: PrimeField> LazyClaims<F> for LazyClaimView<'a, F> {
    fn vars_num(&self) -> usize {
        self.points[0].len()
    }

    fn claims_num(&self) -> usize {
        self.points.len()
    }

    fn degree(&self, _round: usize) -> usize {
        1 + self.wire.gate.degree()
    }

    fn combined_sum(&self, alpha: F) -> F {
        let mut sum = F::zero();
        let mut alpha_pow = F::one();
        for &v in self.values {
            sum += alpha_pow * v;
            alpha_pow *= alpha;
        }
        sum
    }

    fn verify_final_eval(&self, r: &[F], alpha: F, claimed_value: F, proof: &[F]) -> Result<(), SumCheckError> {
        let mut eq_sum = F::zero();
        let mut alpha_pow = F::one();
        for point in self.points {
            eq_sum += alpha_pow * eq_eval(point, r);
            alpha_pow *= alpha;
        }

        let actual = if self.wire.is_input() {
            // `r` binds variable `j` to `r[n-1-j]` (see `eq_eval`); reverse it
            // before handing it to `evaluate`, which expects `point[j] ->
            // variable j`.
            let point: Vec<F> = r.iter().rev().copied().collect();
            self.assignment.get(self.wire_index).evaluate(&point)
        } else {
            let (distinct, input_positions) = resolve_inputs(self.wire_index, self.wire);
            assert_eq!(distinct.len(), proof.len(), "final-eval proof arity mismatch");
            let args: Vec<F> = input_positions.iter().map(|&pos| proof[pos]).collect();
            self.wire.gate.evaluate(&args)
        };

        if eq_sum * actual == claimed_value {
            Ok(())
        } else {
            Err(SumCheckError::final_eval_mismatch())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;
    use sumcheck::{SumcheckProver, SumcheckVerifier};
    use fiat_shamir::Transcript;

    fn square_circuit() -> Circuit<Fq> {
        // w1 = w0 * w0
        Circuit::new(vec![Wire::input(), Wire::new(Gate::Mul, vec![0, 0])])
    }

    #[test]
    fn single_wire_sumcheck_round_trips() {
        let circuit = square_circuit();
        let mut assignment = WireAssignment::new(circuit.len());
        assignment.set(
            0,
            MultiLin::from_evaluations(vec![Fq::from(2), Fq::from(3), Fq::from(5), Fq::from(7)]),
        );
        assignment.complete(&circuit);
        let pool: BufferPool<Fq> = BufferPool::new();

        let output_wire = 1;
        let point = vec![Fq::from(9), Fq::from(11)];
        let value = assignment.get(output_wire).evaluate(&point);

        let mut manager = ClaimsManager::new(&circuit, &assignment, &pool);
        manager.add(output_wire, point, value);

        let mut claim = manager.get_claim(output_wire);
        let mut transcript = Transcript::<Fq>::new();
        let (proof, r) = SumcheckProver::prove(&mut claim, &mut transcript, "w1.");
        pool.dump(claim.into_buffers());
        assert_eq!(pool.outstanding(), 0);

        let lazy = manager.get_lazy_claim(output_wire);
        let mut verify_transcript = Transcript::<Fq>::new();
        let verified_r = SumcheckVerifier::verify(&lazy, &proof, &mut verify_transcript, "w1.").unwrap();
        assert_eq!(verified_r, r);
    }

    #[test]
    fn add_for_input_registers_claim_on_distinct_input_once() {
        let circuit = square_circuit();
        let mut assignment = WireAssignment::new(circuit.len());
        assignment.set(0, MultiLin::from_evaluations(vec![Fq::from(2), Fq::from(3), Fq::from(5), Fq::from(7)]));
        assignment.complete(&circuit);
        let pool: BufferPool<Fq> = BufferPool::new();

        let mut manager = ClaimsManager::new(&circuit, &assignment, &pool);
        let r = vec![Fq::from(4), Fq::from(6)];
        manager.add_for_input(1, &r, &[Fq::from(42)]);

        assert!(manager.has_claim(0));
        let lazy = manager.get_lazy_claim(0);
        assert_eq!(lazy.claims_num(), 1);
    }
}
