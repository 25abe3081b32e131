use std::sync::Arc;

use ark_ff::PrimeField;

/// Escape hatch for gate shapes the closed `Gate` enum doesn't cover.
pub trait CustomGate<F: PrimeField>: Send + Sync {
    fn evaluate(&self, inputs: &[F]) -> F;
    fn degree(&self) -> usize;
}

/// A stateless gate: `evaluate(&[F]) -> F` and `degree() -> usize`.
///
/// `Identity`, `Add`, `Mul` and `Sub` are the fixed-arity shapes every wire in
/// practice needs; `Linear` covers a weighted sum over a known arity;
/// `Dynamic` is the only variant that allocates, reserved for gate shapes a
/// caller defines at runtime.
#[derive(Clone)]
pub enum Gate<F: PrimeField> {
    Identity,
    Add,
    Mul,
    Sub,
    Linear(Vec<F>),
    Dynamic(Arc<dyn CustomGate<F>>),
}

impl<F: PrimeField> Gate<F> {
    pub fn evaluate(&self, inputs: &[F]) -> F {
        match self {
            Gate::Identity => {
                assert_eq!(inputs.len(), 1, "Identity gate takes exactly one input");
                inputs[0]
            }
            Gate::Add => {
                assert_eq!(inputs.len(), 2, "Add gate takes exactly two inputs");
                inputs[0] + inputs[1]
            }
            Gate::Mul => {
                assert_eq!(inputs.len(), 2, "Mul gate takes exactly two inputs");
                inputs[0] * inputs[1]
            }
            Gate::Sub => {
                assert_eq!(inputs.len(), 2, "Sub gate takes exactly two inputs");
                inputs[0] - inputs[1]
            }
            Gate::Linear(coefficients) => {
                assert_eq!(
                    inputs.len(),
                    coefficients.len(),
                    "Linear gate arity mismatch"
                );
                coefficients
                    .iter()
                    .zip(inputs)
                    .fold(F::zero(), |acc, (c, x)| acc + *c * *x)
            }
            Gate::Dynamic(g) => g.evaluate(inputs),
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            Gate::Identity => 1,
            Gate::Add => 1,
            Gate::Mul => 2,
            Gate::Sub => 1,
            Gate::Linear(_) => 1,
            Gate::Dynamic(g) => g.degree(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;

    struct Square;
    impl CustomGate<Fq> for Square {
        fn evaluate(&self, inputs: &[Fq]) -> Fq {
            inputs[0] * inputs[0]
        }
        fn degree(&self) -> usize {
            2
        }
    }

    #[test]
    fn identity_returns_its_argument() {
        let g: Gate<Fq> = Gate::Identity;
        assert_eq!(g.evaluate(&[Fq::from(9)]), Fq::from(9));
        assert_eq!(g.degree(), 1);
    }

    #[test]
    fn mul_has_degree_two() {
        let g: Gate<Fq> = Gate::Mul;
        assert_eq!(g.evaluate(&[Fq::from(3), Fq::from(4)]), Fq::from(12));
        assert_eq!(g.degree(), 2);
    }

    #[test]
    fn linear_combines_with_coefficients() {
        let g: Gate<Fq> = Gate::Linear(vec![Fq::from(2), Fq::from(3)]);
        assert_eq!(
            g.evaluate(&[Fq::from(5), Fq::from(7)]),
            Fq::from(2) * Fq::from(5) + Fq::from(3) * Fq::from(7)
        );
    }

    #[test]
    fn dynamic_gate_dispatches_to_custom_impl() {
        let g: Gate<Fq> = Gate::Dynamic(Arc::new(Square));
        assert_eq!(g.evaluate(&[Fq::from(6)]), Fq::from(36));
        assert_eq!(g.degree(), 2);
    }
}
