use ark_ff::{BigInteger, PrimeField};
use fiat_shamir::Transcript;

use crate::claims::Claims;
use crate::proof::{RoundPoly, SumCheckProof};

pub struct SumcheckProver;

impl SumcheckProver {
    /// Runs the sum-check prover to completion, returning the proof and the
    /// final challenge point `r`. The caller (the `gkr` driver) uses `r`
    /// together with `proof.final_eval_proof` to register deferred claims on
    /// the wire's inputs — this crate never reaches back into a claims
    /// registry itself.
    pub fn prove<F: PrimeField, C: Claims<F>>(
        claims: &mut C,
        transcript: &mut Transcript<F>,
        label_prefix: &str,
    ) -> (SumCheckProof<F>, Vec<F>) {
        let n = claims.vars_num();
        assert!(n > 0, "sum-check over zero variables is degenerate");
        let k = claims.claims_num();
        assert!(k > 0, "sum-check requires at least one claim");

        let alpha = if k > 1 {
            transcript.challenge(&format!("{label_prefix}comb"))
        } else {
            F::one()
        };

        let mut poly = RoundPoly::new(claims.combine(alpha));
        let mut partial_sum_polys = Vec::with_capacity(n);
        let mut r = Vec::with_capacity(n);

        for j in 0..n {
            let label = format!("{label_prefix}pSP.{j}");
            transcript.bind(&label, &poly.to_bytes());
            let rj = transcript.challenge(&label);
            r.push(rj);

            partial_sum_polys.push(poly);
            poly = RoundPoly::new(claims.next(rj));
        }

        let final_eval_proof = claims.prove_final_eval(&r);
        bind_final_eval(transcript, label_prefix, &final_eval_proof);

        (
            SumCheckProof {
                partial_sum_polys,
                final_eval_proof,
            },
            r,
        )
    }
}

pub(crate) fn bind_final_eval<F: PrimeField>(
    transcript: &mut Transcript<F>,
    label_prefix: &str,
    evaluations: &[F],
) {
    let bytes: Vec<u8> = evaluations
        .iter()
        .flat_map(|e| e.into_bigint().to_bytes_le())
        .collect();
    transcript.bind(&format!("{label_prefix}finalEval"), &bytes);
}
