use ark_ff::{BigInteger, PrimeField};
use polynomials::UnivariatePolynomial;

/// A single round's polynomial, carried as its evaluations at `1..=degree`.
///
/// The value at `0` is never transmitted: for an honest prover it always
/// equals `claimed_sum - g(1)`, so the verifier derives it rather than
/// checking it as a separate step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPoly<F: PrimeField> {
    pub evaluations: Vec<F>,
}

impl<F: PrimeField> RoundPoly<F> {
    pub fn new(evaluations: Vec<F>) -> Self {
        Self { evaluations }
    }

    pub fn degree(&self) -> usize {
        self.evaluations.len()
    }

    pub fn at_one(&self) -> F {
        self.evaluations[0]
    }

    fn implicit_zero(&self, claimed_sum: F) -> F {
        claimed_sum - self.at_one()
    }

    /// Interpolates the degree-`deg` polynomial from `{0, implicit_zero}`
    /// and the transmitted `{1..=deg, evaluations}` points, then evaluates
    /// it at `x`.
    pub fn evaluate_at(&self, x: F, claimed_sum: F) -> F {
        let deg = self.degree();
        let mut x_points = Vec::with_capacity(deg + 1);
        let mut y_points = Vec::with_capacity(deg + 1);

        x_points.push(F::zero());
        y_points.push(self.implicit_zero(claimed_sum));
        for (i, &y) in self.evaluations.iter().enumerate() {
            x_points.push(F::from((i + 1) as u64));
            y_points.push(y);
        }

        UnivariatePolynomial::interpolate(&x_points, &y_points).evaluate(x)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.evaluations
            .iter()
            .flat_map(|e| e.into_bigint().to_bytes_le())
            .collect()
    }
}

/// One sum-check's worth of proof data: a round polynomial per variable plus
/// the final-evaluation values for the gate's inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumCheckProof<F: PrimeField> {
    pub partial_sum_polys: Vec<RoundPoly<F>>,
    pub final_eval_proof: Vec<F>,
}

impl<F: PrimeField> SumCheckProof<F> {
    /// The proof for a `noProof` wire: an input wire with exactly one claim.
    pub fn empty() -> Self {
        Self {
            partial_sum_polys: Vec::new(),
            final_eval_proof: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partial_sum_polys.is_empty() && self.final_eval_proof.is_empty()
    }
}
