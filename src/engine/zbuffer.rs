use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a sample in the render grid (row-major: `j * n_re + i`).
pub type SampleId = u64;

const EMPTY: u64 = 0;

/// Per-pixel winner table shared by all render workers.
///
/// Each slot holds the id of the sample currently owning the pixel, offset by
/// one so that zero means "nothing drawn". Keys are never stored: they are
/// recomputed from the sample id, so a slot can never pair one sample's key
/// with another sample's color.
pub struct ZBuffer {
    width: usize,
    slots: Vec<AtomicU64>,
}

impl ZBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let slots = (0..width * height).map(|_| AtomicU64::new(EMPTY)).collect();
        Self { width, slots }
    }

    fn slot(&self, x: usize, y: usize) -> Option<&AtomicU64> {
        if x >= self.width {
            return None;
        }
        self.slots.get(y.checked_mul(self.width)?.checked_add(x)?)
    }

    /// Try to claim pixel `(x, y)` for `sample`.
    ///
    /// The sample wins if its key is strictly greater than the current
    /// owner's. On equal keys the lower sample id wins, which is the sample a
    /// sequential row-major scan reaches first. Lost compare-exchange races are
    /// retried against the new owner. Returns whether `sample` owns the pixel
    /// afterwards.
    pub fn offer<K>(&self, x: usize, y: usize, sample: SampleId, key_of: K) -> bool
    where
        K: Fn(SampleId) -> f64,
    {
        let Some(slot) = self.slot(x, y) else {
            return false;
        };

        let key = key_of(sample);
        let mut current = slot.load(Ordering::Acquire);
        loop {
            if current != EMPTY {
                let owner = current - 1;
                if !precedes((key, sample), (key_of(owner), owner)) {
                    return false;
                }
            }
            match slot.compare_exchange_weak(current, sample + 1, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Consume the buffer, yielding the owner of every pixel in row-major order.
    pub fn into_winners(self) -> Vec<Option<SampleId>> {
        self.slots
            .into_iter()
            .map(|slot| match slot.into_inner() {
                EMPTY => None,
                tagged => Some(tagged - 1),
            })
            .collect()
    }
}

/// Strict total order on `(key, id)`: larger key first, then smaller id.
#[allow(clippy::float_cmp)]
fn precedes(candidate: (f64, SampleId), owner: (f64, SampleId)) -> bool {
    candidate.0 > owner.0 || (candidate.0 == owner.0 && candidate.1 < owner.1)
}
