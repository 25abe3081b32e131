use ark_ff::{BigInteger, PrimeField};

/// A multilinear polynomial of `n` variables, stored as its `2^n` evaluations
/// over the boolean hypercube. Bit `j` of an index corresponds to variable `j`
/// (little-endian): index `0` is `m(0,0,...,0)`, index `1` is `m(1,0,...,0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLin<T: PrimeField>(Vec<T>);

impl<T: PrimeField> MultiLin<T> {
    pub fn from_evaluations(evaluations: Vec<T>) -> Self {
        assert!(
            evaluations.len().is_power_of_two(),
            "MultiLin: evaluation table length {} is not a power of two",
            evaluations.len()
        );
        Self(evaluations)
    }

    /// Constructs a `MultiLin` over an already-sized buffer without the
    /// power-of-two check — only used by `BufferPool`, which guarantees the
    /// invariant by construction.
    pub(crate) fn from_pool_buffer(buffer: Vec<T>) -> Self {
        Self(buffer)
    }

    pub(crate) fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn evaluations(&self) -> &[T] {
        &self.0
    }

    pub fn evaluations_mut(&mut self) -> &mut [T] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn num_vars(&self) -> usize {
        self.0.len().ilog2() as usize
    }

    /// Replaces `m` (length `2k`) with the length-`k` polynomial
    /// `m'(x) = (1-r)*m(x,0) + r*m(x,1)`, folding away the highest-indexed variable.
    pub fn fold(&mut self, r: T) {
        let k = self.0.len() / 2;
        for i in 0..k {
            let diff = self.0[k + i] - self.0[i];
            self.0[i] += r * diff;
        }
        self.0.truncate(k);
    }

    /// Initializes `self` (length `2^n`, `n = point.len()`) to the `eq`
    /// extension scaled by whatever constant is held in `self[0]` on entry:
    /// on exit, `self[w] = self[0]_initial * prod_j (w_j*point_j + (1-w_j)(1-point_j))`.
    pub fn eq(&mut self, point: &[T]) {
        let n = point.len();
        assert_eq!(
            self.0.len(),
            1usize << n,
            "MultiLin::eq: buffer length must be 2^|point|"
        );

        let mut filled = 1usize;
        for &p in point {
            let one_minus_p = T::one() - p;
            for w in 0..filled {
                let hi = self.0[w] * p;
                self.0[w] *= one_minus_p;
                self.0[w | filled] = hi;
            }
            filled <<= 1;
        }
    }

    /// Evaluates `self` at a fully-specified point (`point.len() == num_vars()`)
    /// by folding a clone of the evaluation table coordinate by coordinate.
    ///
    /// `fold` always eats the *current* highest-indexed remaining variable, so
    /// to bind `point[j]` to variable `j` (the struct's own bit convention,
    /// matching `eq`) the point must be consumed highest-index-first.
    pub fn evaluate(&self, point: &[T]) -> T {
        assert_eq!(
            point.len(),
            self.num_vars(),
            "MultiLin::evaluate requires a fully-specified point"
        );

        let mut scratch = self.clone();
        for &r in point.iter().rev() {
            scratch.fold(r);
        }
        scratch.0[0]
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0
            .iter()
            .flat_map(|e| e.into_bigint().to_bytes_le())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;

    fn poly() -> MultiLin<Fq> {
        // 3 variables; m(a,b,c) with values indexed little-endian (a = bit 0).
        MultiLin::from_evaluations(vec![
            Fq::from(1),
            Fq::from(2),
            Fq::from(3),
            Fq::from(4),
            Fq::from(5),
            Fq::from(6),
            Fq::from(7),
            Fq::from(8),
        ])
    }

    #[test]
    fn fold_then_evaluate_are_consistent() {
        let m = poly();
        let point = vec![Fq::from(3), Fq::from(5), Fq::from(11)];

        // `fold` eats the current highest-indexed variable each call, so
        // matching `evaluate`'s `point[j] -> variable j` convention means
        // folding highest-index-first.
        let mut folded = m.clone();
        for &r in point.iter().rev() {
            folded.fold(r);
        }

        assert_eq!(folded.len(), 1);
        assert_eq!(folded.evaluations()[0], m.evaluate(&point));
    }

    #[test]
    fn eq_extension_matches_boolean_hypercube_law() {
        let point = vec![Fq::from(2), Fq::from(3)];
        let mut table = MultiLin::from_evaluations(vec![Fq::from(0); 4]);
        table.evaluations_mut()[0] = Fq::from(1);
        table.eq(&point);

        for w in 0..4u32 {
            let w0 = Fq::from((w & 1) as u64);
            let w1 = Fq::from(((w >> 1) & 1) as u64);
            let expected = (w0 * point[0] + (Fq::from(1) - w0) * (Fq::from(1) - point[0]))
                * (w1 * point[1] + (Fq::from(1) - w1) * (Fq::from(1) - point[1]));
            assert_eq!(table.evaluations()[w as usize], expected);
        }
    }

    #[test]
    fn eq_extension_respects_leading_scalar() {
        let point = vec![Fq::from(7)];
        let mut table = MultiLin::from_evaluations(vec![Fq::from(0); 2]);
        table.evaluations_mut()[0] = Fq::from(5);
        table.eq(&point);

        assert_eq!(table.evaluations()[0], Fq::from(5) * (Fq::from(1) - Fq::from(7)));
        assert_eq!(table.evaluations()[1], Fq::from(5) * Fq::from(7));
    }

    #[test]
    #[should_panic(expected = "not a power of two")]
    fn rejects_non_power_of_two_length() {
        let _ = MultiLin::from_evaluations(vec![Fq::from(1), Fq::from(2), Fq::from(3)]);
    }
}
