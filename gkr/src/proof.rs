use ark_ff::{BigInteger, PrimeField};

use sumcheck::{RoundPoly, SumCheckProof};

use crate::error::GkrError;

/// One sum-check proof per wire, in the same reverse-topological order the
/// driver walks the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GkrProof<F: PrimeField>(pub Vec<SumCheckProof<F>>);

impl<F: PrimeField> GkrProof<F> {
    pub fn new(per_wire: Vec<SumCheckProof<F>>) -> Self {
        Self(per_wire)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `u32 nbWires`, then per wire `u32 nbRoundPolys`, then per round poly
    /// `u32 deg, F[deg]`, then `u32 finalEvalLen, F[finalEvalLen]`. An empty
    /// (`noProof`) sum-check serializes as `0, 0`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.0.len() as u32).to_le_bytes());
        for sc in &self.0 {
            out.extend_from_slice(&(sc.partial_sum_polys.len() as u32).to_le_bytes());
            for round_poly in &sc.partial_sum_polys {
                out.extend_from_slice(&(round_poly.degree() as u32).to_le_bytes());
                for e in &round_poly.evaluations {
                    out.extend_from_slice(&e.into_bigint().to_bytes_le());
                }
            }
            out.extend_from_slice(&(sc.final_eval_proof.len() as u32).to_le_bytes());
            for e in &sc.final_eval_proof {
                out.extend_from_slice(&e.into_bigint().to_bytes_le());
            }
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GkrError> {
        let elem_width = F::zero().into_bigint().to_bytes_le().len();
        let mut cursor = Cursor { bytes, pos: 0 };

        let nb_wires = cursor.read_u32()? as usize;
        let mut per_wire = Vec::with_capacity(nb_wires);
        for _ in 0..nb_wires {
            let nb_round_polys = cursor.read_u32()? as usize;
            let mut partial_sum_polys = Vec::with_capacity(nb_round_polys);
            for _ in 0..nb_round_polys {
                let deg = cursor.read_u32()? as usize;
                let evaluations = cursor.read_field_elements::<F>(deg, elem_width)?;
                partial_sum_polys.push(RoundPoly::new(evaluations));
            }
            let final_eval_len = cursor.read_u32()? as usize;
            let final_eval_proof = cursor.read_field_elements::<F>(final_eval_len, elem_width)?;
            per_wire.push(SumCheckProof {
                partial_sum_polys,
                final_eval_proof,
            });
        }

        Ok(Self(per_wire))
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn read_u32(&mut self) -> Result<u32, GkrError> {
        let end = self.pos + 4;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| GkrError::MalformedProof("truncated length prefix".to_string()))?;
        self.pos = end;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }

    fn read_field_elements<F: PrimeField>(
        &mut self,
        count: usize,
        elem_width: usize,
    ) -> Result<Vec<F>, GkrError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let end = self.pos + elem_width;
            let slice = self
                .bytes
                .get(self.pos..end)
                .ok_or_else(|| GkrError::MalformedProof("truncated field element".to_string()))?;
            self.pos = end;
            out.push(F::from_le_bytes_mod_order(slice));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fq;

    #[test]
    fn empty_proof_round_trips() {
        let proof = GkrProof::<Fq>::new(vec![SumCheckProof::empty()]);
        let bytes = proof.to_bytes();
        let decoded = GkrProof::<Fq>::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, proof);
    }

    #[test]
    fn nonempty_proof_round_trips() {
        let round_poly = RoundPoly::new(vec![Fq::from(5), Fq::from(7)]);
        let sc = SumCheckProof {
            partial_sum_polys: vec![round_poly],
            final_eval_proof: vec![Fq::from(3)],
        };
        let proof = GkrProof::new(vec![sc]);
        let bytes = proof.to_bytes();
        let decoded = GkrProof::<Fq>::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, proof);
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let proof = GkrProof::<Fq>::new(vec![SumCheckProof::empty()]);
        let bytes = proof.to_bytes();
        let result = GkrProof::<Fq>::from_bytes(&bytes[..bytes.len() - 2]);
        assert!(result.is_err());
    }
}
