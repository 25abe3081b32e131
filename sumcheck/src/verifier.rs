use ark_ff::PrimeField;
use fiat_shamir::Transcript;

use crate::claims::LazyClaims;
use crate::error::SumCheckError;
use crate::proof::SumCheckProof;
use crate::prover::bind_final_eval;

pub struct SumcheckVerifier;

impl SumcheckVerifier {
    /// Mirrors `SumcheckProver::prove`'s transcript walk exactly, so an
    /// honest prover and verifier derive identical challenges. Returns the
    /// final challenge point `r` on acceptance; the caller registers
    /// deferred input claims only after seeing `Ok`, per the rule that a
    /// proof about to be rejected should never pollute the claims registry.
    pub fn verify<F: PrimeField, C: LazyClaims<F>>(
        claims: &C,
        proof: &SumCheckProof<F>,
        transcript: &mut Transcript<F>,
        label_prefix: &str,
    ) -> Result<Vec<F>, SumCheckError> {
        let n = claims.vars_num();
        assert!(n > 0, "sum-check over zero variables is degenerate");
        let k = claims.claims_num();
        assert!(k > 0, "sum-check requires at least one claim");

        if proof.partial_sum_polys.len() != n {
            return Err(SumCheckError::sum_mismatch());
        }

        let alpha = if k > 1 {
            transcript.challenge(&format!("{label_prefix}comb"))
        } else {
            F::one()
        };

        let mut claimed_sum = claims.combined_sum(alpha);
        let mut r = Vec::with_capacity(n);

        for (j, poly) in proof.partial_sum_polys.iter().enumerate() {
            let label = format!("{label_prefix}pSP.{j}");
            transcript.bind(&label, &poly.to_bytes());
            let rj = transcript.challenge(&label);
            r.push(rj);
            claimed_sum = poly.evaluate_at(rj, claimed_sum);
        }

        bind_final_eval(transcript, label_prefix, &proof.final_eval_proof);

        claims.verify_final_eval(&r, alpha, claimed_sum, &proof.final_eval_proof)?;
        Ok(r)
    }
}
