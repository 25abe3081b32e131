use ark_ff::{BigInteger, PrimeField};
use std::ops::{Add, Mul};
use std::{cmp, mem};

/// A univariate polynomial in dense coefficient form, lowest degree first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnivariatePolynomial<T: PrimeField> {
    pub coefficients: Vec<T>,
}

impl<T: PrimeField> UnivariatePolynomial<T> {
    pub fn new(coefficients: Vec<T>) -> Self {
        Self { coefficients }
    }

    pub fn evaluate(&self, x: T) -> T {
        let mut result = T::zero();
        let mut running_x = T::one();

        for c in &self.coefficients {
            result += *c * running_x;
            running_x *= x;
        }

        result
    }

    /// Lagrange-interpolates the unique polynomial of degree `< x_points.len()`
    /// passing through `(x_points[i], y_points[i])`.
    pub fn interpolate(x_points: &[T], y_points: &[T]) -> Self {
        let n = x_points.len();
        let mut res = UnivariatePolynomial {
            coefficients: vec![T::zero(); n],
        };

        for i in 0..n {
            let mut denominator = T::one();
            let mut numerator = UnivariatePolynomial {
                coefficients: vec![T::one()],
            };

            for j in 0..n {
                if i == j {
                    continue;
                }

                let linear = UnivariatePolynomial {
                    coefficients: vec![-x_points[j], T::one()],
                };

                denominator *= x_points[i] - x_points[j];
                numerator = numerator.mul_poly(&linear);
            }

            res = res.add_poly(&numerator.scalar_mul(y_points[i] / denominator));
        }

        res
    }

    pub fn scalar_mul(&self, scalar: T) -> Self {
        UnivariatePolynomial {
            coefficients: self.coefficients.iter().map(|c| *c * scalar).collect(),
        }
    }

    pub fn mul_poly(&self, other: &Self) -> Self {
        let (len_1, len_2) = (self.coefficients.len(), other.coefficients.len());
        if len_1 == 0 || len_2 == 0 {
            return UnivariatePolynomial { coefficients: vec![] };
        }

        let mut greater = &self.coefficients;
        let mut lesser = &other.coefficients;
        if len_2 > len_1 {
            mem::swap(&mut greater, &mut lesser);
        }

        let mut coefficients = vec![T::zero(); len_1 + len_2 - 1];
        for (i, g) in greater.iter().enumerate() {
            for (j, l) in lesser.iter().enumerate() {
                coefficients[i + j] += *g * *l;
            }
        }

        UnivariatePolynomial { coefficients }
    }

    pub fn add_poly(&self, other: &Self) -> Self {
        let max_len = cmp::max(self.coefficients.len(), other.coefficients.len());
        let mut coefficients = vec![T::zero(); max_len];

        for (i, c) in coefficients.iter_mut().enumerate() {
            if i < self.coefficients.len() {
                *c += self.coefficients[i];
            }
            if i < other.coefficients.len() {
                *c += other.coefficients[i];
            }
        }

        UnivariatePolynomial { coefficients }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.coefficients
            .iter()
            .flat_map(|c| c.into_bigint().to_bytes_le())
            .collect()
    }
}

impl<T: PrimeField> Add for UnivariatePolynomial<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.add_poly(&other)
    }
}

impl<T: PrimeField> Mul for UnivariatePolynomial<T> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.mul_poly(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;

    #[test]
    fn evaluate_matches_horner() {
        let poly = UnivariatePolynomial::new(vec![Fq::from(20), Fq::from(10), Fq::from(3)]);
        assert_eq!(poly.evaluate(Fq::from(2)), Fq::from(52));
    }

    #[test]
    fn mul_convolves_coefficients() {
        let a = UnivariatePolynomial::new(vec![Fq::from(0), Fq::from(0), Fq::from(2)]);
        let b = UnivariatePolynomial::new(vec![Fq::from(0), Fq::from(0), Fq::from(0), Fq::from(4)]);
        assert_eq!(
            (a * b).coefficients,
            vec![
                Fq::from(0),
                Fq::from(0),
                Fq::from(0),
                Fq::from(0),
                Fq::from(0),
                Fq::from(8)
            ]
        );
    }

    #[test]
    fn interpolate_recovers_known_points() {
        let poly = UnivariatePolynomial::interpolate(
            &[Fq::from(0), Fq::from(1), Fq::from(2)],
            &[Fq::from(8), Fq::from(10), Fq::from(16)],
        );
        assert_eq!(poly.coefficients, vec![Fq::from(8), Fq::from(0), Fq::from(2)]);
    }

    #[test]
    fn interpolate_then_evaluate_is_consistent_at_new_points() {
        let poly = UnivariatePolynomial::interpolate(
            &[Fq::from(0), Fq::from(1), Fq::from(2), Fq::from(3)],
            &[Fq::from(1), Fq::from(4), Fq::from(9), Fq::from(16)],
        );
        // matches x -> (x+1)^2
        assert_eq!(poly.evaluate(Fq::from(10)), Fq::from(121));
    }
}
