use ark_ff::PrimeField;

use arithmetic_circuit::{Circuit, WireAssignment};
use fiat_shamir::Transcript;
use polynomials::BufferPool;
use sumcheck::{SumCheckProof, SumcheckProver, SumcheckVerifier};

use crate::claims_manager::ClaimsManager;
use crate::error::GkrError;
use crate::proof::GkrProof;

/// Proves/verifies a circuit's parallel instances one sum-check per wire, in
/// reverse topological order. The label prefix namespaces this instance's
/// transcript challenges, so multiple `GkrDriver`s sharing one larger
/// protocol never collide on labels.
pub struct GkrDriver<'a> {
    label_prefix: &'a str,
}

impl<'a> GkrDriver<'a> {
    pub fn new(label_prefix: &'a str) -> Self {
        Self { label_prefix }
    }

    fn nb_vars(num_instances: usize) -> Result<usize, GkrError> {
        if !num_instances.is_power_of_two() {
            return Err(GkrError::InvalidInstanceCount(num_instances));
        }
        Ok(num_instances.trailing_zeros() as usize)
    }

    fn first_challenge<F: PrimeField>(&self, transcript: &mut Transcript<F>, nb_vars: usize) -> Vec<F> {
        (0..nb_vars)
            .map(|j| transcript.challenge(&format!("{}fC.{j}", self.label_prefix)))
            .collect()
    }

    /// Proves every wire's claim in reverse topological order, seeding the
    /// output wires' claims at the circuit's own output point and pushing
    /// each wire's final-eval values down onto its inputs as it completes.
    pub fn prove<F: PrimeField>(
        &self,
        circuit: &Circuit<F>,
        assignment: &WireAssignment<F>,
        num_instances: usize,
        transcript: &mut Transcript<F>,
    ) -> Result<GkrProof<F>, GkrError> {
        let nb_vars = Self::nb_vars(num_instances)?;
        let pool: BufferPool<F> = BufferPool::new();
        let mut manager = ClaimsManager::new(circuit, assignment, &pool);

        let first_point = self.first_challenge(transcript, nb_vars);
        for (wire_index, wire) in circuit.wires().iter().enumerate() {
            if wire.is_output() {
                let value = assignment.get(wire_index).evaluate(&first_point);
                manager.add(wire_index, first_point.clone(), value);
            }
        }

        let mut per_wire = vec![SumCheckProof::empty(); circuit.len()];
        for wire_index in circuit.reverse_topological_order() {
            let wire = circuit.wire(wire_index);
            if !manager.has_claim(wire_index) {
                log::trace!("gkr: wire {wire_index} has no claims, skipping");
                continue;
            }

            if wire.no_proof() {
                log::trace!("gkr: wire {wire_index} is a no-proof input, emitting empty proof");
                manager.delete_claim(wire_index);
                continue;
            }

            log::debug!("gkr: proving wire {wire_index}");
            let mut claim = manager.get_claim(wire_index);
            let label = format!("{}w{wire_index}.", self.label_prefix);
            let (proof, r) = SumcheckProver::prove(&mut claim, transcript, &label);
            let final_eval = proof.final_eval_proof.clone();

            pool.dump(claim.into_buffers());
            manager.add_for_input(wire_index, &r, &final_eval);
            per_wire[wire_index] = proof;
        }

        debug_assert_eq!(pool.outstanding(), 0, "gkr prover leaked a pool buffer");
        Ok(GkrProof::new(per_wire))
    }

    /// Mirrors `prove`'s walk exactly; registers a deferred input claim only
    /// after its wire's sum-check verifies, so a proof about to be rejected
    /// never pollutes the claims registry.
    pub fn verify<F: PrimeField>(
        &self,
        circuit: &Circuit<F>,
        assignment: &WireAssignment<F>,
        num_instances: usize,
        proof: &GkrProof<F>,
        transcript: &mut Transcript<F>,
    ) -> Result<(), GkrError> {
        let nb_vars = Self::nb_vars(num_instances)?;
        if proof.len() != circuit.len() {
            return Err(GkrError::MalformedProof(format!(
                "expected one sum-check per wire ({}), got {}",
                circuit.len(),
                proof.len()
            )));
        }

        let pool: BufferPool<F> = BufferPool::new();
        let mut manager = ClaimsManager::new(circuit, assignment, &pool);

        let first_point = self.first_challenge(transcript, nb_vars);
        for (wire_index, wire) in circuit.wires().iter().enumerate() {
            if wire.is_output() {
                let value = assignment.get(wire_index).evaluate(&first_point);
                manager.add(wire_index, first_point.clone(), value);
            }
        }

        for wire_index in circuit.reverse_topological_order() {
            let wire = circuit.wire(wire_index);
            if !manager.has_claim(wire_index) {
                continue;
            }

            if wire.no_proof() {
                if !manager.verify_direct(wire_index) {
                    return Err(GkrError::InputClaimMismatch { wire_index });
                }
                manager.delete_claim(wire_index);
                continue;
            }

            let wire_proof = &proof.0[wire_index];
            let label = format!("{}w{wire_index}.", self.label_prefix);
            let lazy = manager.get_lazy_claim(wire_index);
            let r = SumcheckVerifier::verify(&lazy, wire_proof, transcript, &label)
                .map_err(|e| GkrError::sum_check_reject(wire_index, e))?;

            let final_eval = wire_proof.final_eval_proof.clone();
            manager.delete_claim(wire_index);
            manager.add_for_input(wire_index, &r, &final_eval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arithmetic_circuit::{Gate, Wire};
    use ark_bn254::Fq;
    use polynomials::MultiLin;

    /// out = (a + b) * c, 4 parallel instances (2 instance-selector vars).
    fn add_mul_circuit() -> Circuit<Fq> {
        Circuit::new(vec![
            Wire::input(),
            Wire::input(),
            Wire::input(),
            Wire::new(Gate::Add, vec![0, 1]),
            Wire::new(Gate::Mul, vec![3, 2]),
        ])
    }

    fn evaluated_assignment(circuit: &Circuit<Fq>) -> WireAssignment<Fq> {
        let mut assignment = WireAssignment::new(circuit.len());
        assignment.set(0, MultiLin::from_evaluations(vec![Fq::from(1), Fq::from(2), Fq::from(3), Fq::from(4)]));
        assignment.set(1, MultiLin::from_evaluations(vec![Fq::from(5), Fq::from(6), Fq::from(7), Fq::from(8)]));
        assignment.set(2, MultiLin::from_evaluations(vec![Fq::from(2), Fq::from(2), Fq::from(2), Fq::from(2)]));
        assignment.complete(circuit);
        assignment
    }

    #[test]
    fn honest_proof_is_accepted_and_leaks_no_buffers() {
        let circuit = add_mul_circuit();
        let assignment = evaluated_assignment(&circuit);
        let driver = GkrDriver::new("t.");

        let mut prove_transcript = Transcript::<Fq>::new();
        let proof = driver.prove(&circuit, &assignment, 4, &mut prove_transcript).unwrap();

        let mut verify_transcript = Transcript::<Fq>::new();
        driver.verify(&circuit, &assignment, 4, &proof, &mut verify_transcript).unwrap();
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let circuit = add_mul_circuit();
        let assignment = evaluated_assignment(&circuit);
        let driver = GkrDriver::new("t.");

        let mut prove_transcript = Transcript::<Fq>::new();
        let mut proof = driver.prove(&circuit, &assignment, 4, &mut prove_transcript).unwrap();

        let tampered_wire = proof.0.iter().position(|sc| !sc.is_empty()).unwrap();
        proof.0[tampered_wire].final_eval_proof[0] += Fq::from(1);

        let mut verify_transcript = Transcript::<Fq>::new();
        let result = driver.verify(&circuit, &assignment, 4, &proof, &mut verify_transcript);
        assert!(result.is_err());
    }

    #[test]
    fn non_power_of_two_instance_count_is_rejected() {
        let circuit = add_mul_circuit();
        let assignment = evaluated_assignment(&circuit);
        let driver = GkrDriver::new("t.");
        let mut transcript = Transcript::<Fq>::new();

        let result = driver.prove(&circuit, &assignment, 3, &mut transcript);
        assert_eq!(result, Err(GkrError::InvalidInstanceCount(3)));
    }
}
