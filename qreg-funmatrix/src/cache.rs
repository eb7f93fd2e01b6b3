//! Element memoization for operator nodes

use crate::matrix::FunMatrix;
use ahash::AHashMap;
use num_complex::Complex64;
use parking_lot::Mutex;

/// Remembers the elements of `source` that have been evaluated so far
pub(crate) struct Memo {
    source: FunMatrix,
    values: Mutex<AHashMap<(usize, usize), Complex64>>,
}

impl Memo {
    pub(crate) fn new(source: FunMatrix) -> Self {
        tracing::debug!(rows = source.rows(), cols = source.cols(), "memoizing operator");
        Self {
            source,
            values: Mutex::new(AHashMap::new()),
        }
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> Complex64 {
        if let Some(value) = self.values.lock().get(&(i, j)) {
            return *value;
        }
        // Lock released while the source evaluates
        let value = self.source.eval(i, j);
        self.values.lock().insert((i, j), value);
        value
    }

    pub(crate) fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub(crate) fn memory_size(&self) -> usize {
        let entry = std::mem::size_of::<((usize, usize), Complex64)>();
        self.source.memory_size() + self.len() * entry
    }
}
