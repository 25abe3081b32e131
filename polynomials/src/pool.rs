use std::collections::HashSet;
use std::sync::Mutex;

use ark_ff::PrimeField;

use crate::multilinear_polynomial::evaluation_form::MultiLin;

/// Buffers up to this many elements are recycled from the small free list.
pub const MAX_SMALL: usize = 256;
/// Buffers larger than `MAX_SMALL` (up to this many elements) come from the large free list.
/// Requesting a buffer bigger than this is a programmer error: the caller sized a round wrong.
pub const MAX_LARGE: usize = 1 << 24;

struct PoolInner<F: PrimeField> {
    small: Vec<Vec<F>>,
    large: Vec<Vec<F>>,
    outstanding: HashSet<usize>,
}

impl<F: PrimeField> PoolInner<F> {
    fn new() -> Self {
        Self {
            small: Vec::new(),
            large: Vec::new(),
            outstanding: HashSet::new(),
        }
    }
}

/// Recycles `2^n`-sized field-element buffers across sum-check rounds.
///
/// One pool is constructed per proof (see `gkr::GkrDriver`) rather than shared
/// process-wide, so leak-freedom (`outstanding() == 0` after a proof is dropped)
/// is a property of a single call, not of global state shared across tests.
pub struct BufferPool<F: PrimeField> {
    inner: Mutex<PoolInner<F>>,
}

impl<F: PrimeField> Default for BufferPool<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> BufferPool<F> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PoolInner::new()),
        }
    }

    fn class_max(n: usize) -> usize {
        if n <= MAX_SMALL {
            MAX_SMALL
        } else {
            MAX_LARGE
        }
    }

    /// Returns a buffer of length `n`; contents are unspecified.
    pub fn make(&self, n: usize) -> MultiLin<F> {
        if n > MAX_LARGE {
            panic!("BufferPool::make: requested size {n} exceeds the large-class maximum {MAX_LARGE}");
        }

        let class_max = Self::class_max(n);
        let mut inner = self.inner.lock().unwrap();
        let free_list = if class_max == MAX_SMALL {
            &mut inner.small
        } else {
            &mut inner.large
        };

        let mut buf = free_list.pop().unwrap_or_else(|| {
            log::trace!("BufferPool: growing {class_max}-element free list (none available for reuse)");
            vec![F::zero(); class_max]
        });
        buf.truncate(n);
        if buf.len() < n {
            buf.resize(n, F::zero());
        }

        inner.outstanding.insert(ptr_identity(&buf));
        MultiLin::from_pool_buffer(buf)
    }

    /// Returns a buffer of the same length as `src`, with identical content.
    pub fn clone(&self, src: &MultiLin<F>) -> MultiLin<F> {
        let mut out = self.make(src.len());
        out.evaluations_mut().copy_from_slice(src.evaluations());
        out
    }

    /// Returns buffers to the pool. A buffer this pool did not issue is a no-op.
    pub fn dump(&self, bufs: impl IntoIterator<Item = MultiLin<F>>) {
        let mut inner = self.inner.lock().unwrap();
        for buf in bufs {
            let mut raw = buf.into_inner();
            let id = ptr_identity(&raw);
            if inner.outstanding.remove(&id) {
                let class_max = Self::class_max(raw.capacity().max(raw.len()));
                raw.resize(class_max, F::zero());
                if class_max == MAX_SMALL {
                    inner.small.push(raw);
                } else {
                    inner.large.push(raw);
                }
            }
            // else: not ours, or already dumped once — ignore per contract.
        }
    }

    /// Number of buffers currently checked out and not yet dumped.
    pub fn outstanding(&self) -> usize {
        self.inner.lock().unwrap().outstanding.len()
    }

    /// Drains the outstanding registry. Used between proofs in tests to reset
    /// leak bookkeeping; does not attempt to reclaim the leaked memory itself.
    pub fn clear_all(&self) {
        self.inner.lock().unwrap().outstanding.clear();
    }
}

fn ptr_identity<F>(buf: &[F]) -> usize {
    buf.as_ptr() as usize
}
