use ark_ff::PrimeField;

use crate::error::SumCheckError;

/// Prover-side view of the claim(s) a single sum-check instance reduces.
///
/// Implemented per-wire by the `gkr` crate's `ActiveClaim`, which folds its
/// `eq` table and gate-input preprocessors as rounds progress.
pub trait Claims<F: PrimeField> {
    fn vars_num(&self) -> usize;
    fn claims_num(&self) -> usize;
    fn degree(&self, round: usize) -> usize;

    /// Collapses the `claims_num()` stored claims into one via `alpha`,
    /// returning the first round polynomial's evaluations at `1..=degree(0)`.
    fn combine(&mut self, alpha: F) -> Vec<F>;

    /// Folds internal state by `r` and returns the next round polynomial's
    /// evaluations at `1..=degree(round+1)`. Called once per round including
    /// the last, whose returned polynomial the caller discards.
    fn next(&mut self, r: F) -> Vec<F>;

    /// After all rounds, the evaluations of each distinct gate input's
    /// multilinear extension at `r`, in the gate's input order.
    fn prove_final_eval(&mut self, r: &[F]) -> Vec<F>;
}

/// Verifier-side mirror of `Claims`: no input preprocessors, no running `eq`
/// state, everything recomputed directly from the claim bundle.
pub trait LazyClaims<F: PrimeField> {
    fn vars_num(&self) -> usize;
    fn claims_num(&self) -> usize;
    fn degree(&self, round: usize) -> usize;

    /// `Σ_i alpha^i * value_i`, the claimed sum entering round 0.
    fn combined_sum(&self, alpha: F) -> F;

    /// Checks `(Σ_i alpha^i * eq(point_i, r)) * gate.evaluate(proof)` (or the
    /// direct wire assignment, for input wires) equals `claimed_value`.
    fn verify_final_eval(
        &self,
        r: &[F],
        alpha: F,
        claimed_value: F,
        proof: &[F],
    ) -> Result<(), SumCheckError>;
}
