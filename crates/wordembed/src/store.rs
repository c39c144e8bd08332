//! # Weight Store
//!
//! A flat, row-major ``f32`` matrix with one row per id, and a parallel
//! arena of [`RowRecord`]s describing each row.
//!
//! Rows loaded from disk are [`RowRecord::Plain`]. Rows appended for
//! composed ids are [`RowRecord::Composed`]: their values are derived from
//! their constituent rows, and materialized on demand.
//!
//! ## Materialization and Flush
//!
//! * [`WeightStore::ensure_materialized`] fills a stale composed row with the
//!   mean of its constituents, snapshots it, and marks it active.
//! * [`WeightStore::read_row`] is a pure read; it never materializes.
//! * [`WeightStore::flush`] takes whatever an optimizer wrote into active
//!   composed rows, spreads ``(row - snapshot) / count`` over their
//!   constituents, and marks them stale again.

use crate::{
    errors::{WEResult, WordembedError},
    types::{IdType, try_id},
};

/// Cached state of a composed row.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition<T: IdType> {
    /// Constituent ids; sorted, unique, non-empty.
    subforms: Vec<T>,

    /// The row value as of the last materialization.
    snapshot: Vec<f32>,

    /// Does the row currently hold a materialized mean?
    fresh: bool,
}

impl<T: IdType> Composition<T> {
    /// The constituent ids.
    pub fn subforms(&self) -> &[T] {
        &self.subforms
    }

    /// The row value as of the last materialization.
    pub fn snapshot(&self) -> &[f32] {
        &self.snapshot
    }

    /// Is the cached row current?
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}

/// Per-row record.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRecord<T: IdType> {
    /// A row owned by the loaded matrix.
    Plain,

    /// A row derived from constituent rows.
    Composed(Composition<T>),
}

/// Append-only matrix of rows plus per-row records.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore<T: IdType> {
    dimension: usize,
    weights: Vec<f32>,
    records: Vec<RowRecord<T>>,
    active: Vec<T>,
}

impl<T: IdType> WeightStore<T> {
    /// Build a store from a loaded matrix; every row is [`RowRecord::Plain`].
    ///
    /// ## Arguments
    /// * `dimension` - the row width; must be non-zero.
    /// * `weights` - row-major values; length must be a multiple of `dimension`.
    pub fn from_matrix(
        dimension: usize,
        weights: Vec<f32>,
    ) -> WEResult<Self> {
        if dimension == 0 {
            return Err(WordembedError::Malformed(
                "embedding dimension must be non-zero".to_string(),
            ));
        }
        if weights.len() % dimension != 0 {
            return Err(WordembedError::Malformed(format!(
                "{} weights do not form rows of width {dimension}",
                weights.len()
            )));
        }
        let rows = weights.len() / dimension;

        Ok(Self {
            dimension,
            weights,
            records: vec![RowRecord::Plain; rows],
            active: Vec::new(),
        })
    }

    /// The row width.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The number of rows (plain and composed).
    pub fn rows(&self) -> usize {
        debug_assert_eq!(self.records.len() * self.dimension, self.weights.len());
        self.records.len()
    }

    /// The whole row-major matrix, as currently stored.
    pub fn matrix(&self) -> &[f32] {
        &self.weights
    }

    /// The composed ids materialized since the last flush.
    pub fn active_ids(&self) -> &[T] {
        &self.active
    }

    /// Count the active composed rows whose value has moved off its snapshot.
    ///
    /// Values are compared bitwise, so a NaN copied in by materialization
    /// is not an update.
    pub fn pending_updates(&self) -> usize {
        self.active
            .iter()
            .filter(|&&id| {
                let (Some(comp), Some(row)) = (self.composition(id), self.read_row(id)) else {
                    return false;
                };
                row.iter()
                    .zip(&comp.snapshot)
                    .any(|(v, prev)| v.to_bits() != prev.to_bits())
            })
            .count()
    }

    /// The record for an id.
    pub fn record(
        &self,
        id: T,
    ) -> Option<&RowRecord<T>> {
        self.records.get(id.to_usize()?)
    }

    /// The composition of a composed id.
    pub fn composition(
        &self,
        id: T,
    ) -> Option<&Composition<T>> {
        match self.record(id)? {
            RowRecord::Composed(comp) => Some(comp),
            RowRecord::Plain => None,
        }
    }

    fn index(
        &self,
        id: T,
    ) -> Option<usize> {
        id.to_usize().filter(|&idx| idx < self.records.len())
    }

    fn span(
        &self,
        idx: usize,
    ) -> core::ops::Range<usize> {
        idx * self.dimension..(idx + 1) * self.dimension
    }

    /// Append a composed row.
    ///
    /// The row starts zeroed and stale; the first
    /// [`ensure_materialized`](Self::ensure_materialized) fills it in.
    ///
    /// ## Arguments
    /// * `subforms` - constituent ids; sorted, unique, non-empty, all in range.
    ///
    /// ## Returns
    /// The new id; or [`WordembedError::IdOverflow`] if the id space is exhausted.
    pub fn push_composed(
        &mut self,
        subforms: Vec<T>,
    ) -> WEResult<T> {
        debug_assert!(!subforms.is_empty());
        debug_assert!(subforms.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(subforms.iter().all(|&s| self.index(s).is_some()));

        let id: T = try_id(self.records.len())?;

        self.weights
            .resize(self.weights.len() + self.dimension, 0.0);
        self.records.push(RowRecord::Composed(Composition {
            subforms,
            snapshot: vec![0.0; self.dimension],
            fresh: false,
        }));

        Ok(id)
    }

    /// Make sure the row for `id` is readable and current.
    ///
    /// For a composed id with a stale cache this zeros the row, sums the
    /// constituent rows into it, divides by the constituent count, snapshots
    /// the result, marks it fresh, and adds `id` to the active set.
    /// Plain and fresh ids are left untouched.
    ///
    /// ## Returns
    /// `false` if `id` is out of range.
    pub fn ensure_materialized(
        &mut self,
        id: T,
    ) -> bool {
        let Some(idx) = self.index(id) else {
            return false;
        };
        let dim = self.dimension;

        let RowRecord::Composed(comp) = &mut self.records[idx] else {
            return true;
        };
        if comp.fresh {
            return true;
        }

        let (head, row) = self.weights.split_at_mut(idx * dim);
        let row = &mut row[..dim];
        row.fill(0.0);
        for &sub in &comp.subforms {
            // Constituents always precede the composed row.
            let Some(s) = sub.to_usize() else {
                continue;
            };
            debug_assert!(s < idx);
            let Some(src) = head.get(s * dim..(s + 1) * dim) else {
                continue;
            };
            for (acc, v) in row.iter_mut().zip(src) {
                *acc += v;
            }
        }

        let normalize = 1.0 / comp.subforms.len() as f32;
        for acc in row.iter_mut() {
            *acc *= normalize;
        }

        comp.snapshot.copy_from_slice(row);
        comp.fresh = true;
        self.active.push(id);

        true
    }

    /// Read the row for `id`, exactly as stored.
    ///
    /// This never materializes; a stale composed row reads as whatever it
    /// last held.
    pub fn read_row(
        &self,
        id: T,
    ) -> Option<&[f32]> {
        let idx = self.index(id)?;
        Some(&self.weights[self.span(idx)])
    }

    /// Mutable access to the row for `id`, exactly as stored.
    pub fn row_mut(
        &mut self,
        id: T,
    ) -> Option<&mut [f32]> {
        let idx = self.index(id)?;
        let span = self.span(idx);
        Some(&mut self.weights[span])
    }

    /// Redistribute changes on active composed rows into their constituents.
    ///
    /// ## Returns
    /// The number of composed rows flushed.
    pub fn flush(&mut self) -> usize {
        let dim = self.dimension;
        let active = core::mem::take(&mut self.active);
        let mut delta = vec![0.0f32; dim];

        for &id in &active {
            let Some(idx) = self.index(id) else {
                continue;
            };
            let RowRecord::Composed(comp) = &mut self.records[idx] else {
                continue;
            };

            let normalize = 1.0 / comp.subforms.len() as f32;
            let row = &self.weights[idx * dim..(idx + 1) * dim];
            for ((d, v), prev) in delta.iter_mut().zip(row).zip(&comp.snapshot) {
                *d = (v - prev) * normalize;
            }

            for &sub in &comp.subforms {
                let Some(s) = sub.to_usize() else {
                    continue;
                };
                let Some(dst) = self.weights.get_mut(s * dim..(s + 1) * dim) else {
                    continue;
                };
                for (w, d) in dst.iter_mut().zip(&delta) {
                    *w += d;
                }
            }

            comp.fresh = false;
        }

        active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WeightStore<u32> {
        WeightStore::from_matrix(2, vec![1.0, 0.0, 0.0, 1.0, 4.0, 4.0]).unwrap()
    }

    #[test]
    fn test_from_matrix() {
        let store = store();
        assert_eq!(store.rows(), 3);
        assert_eq!(store.read_row(2), Some(&[4.0, 4.0][..]));
        assert_eq!(store.read_row(3), None);
        assert_eq!(store.record(0), Some(&RowRecord::Plain));

        assert!(WeightStore::<u32>::from_matrix(0, vec![]).is_err());
        assert!(WeightStore::<u32>::from_matrix(2, vec![1.0]).is_err());
    }

    #[test]
    fn test_materialize_mean() {
        let mut store = store();
        let id = store.push_composed(vec![0, 2]).unwrap();
        assert_eq!(id, 3);
        assert_eq!(store.read_row(id), Some(&[0.0, 0.0][..]));
        assert!(!store.composition(id).unwrap().is_fresh());

        assert!(store.ensure_materialized(id));
        assert_eq!(store.read_row(id), Some(&[2.5, 2.0][..]));
        assert_eq!(store.active_ids(), &[3]);

        let comp = store.composition(id).unwrap();
        assert!(comp.is_fresh());
        assert_eq!(comp.snapshot(), store.read_row(id).unwrap());

        // Fresh rows are not re-activated.
        assert!(store.ensure_materialized(id));
        assert_eq!(store.active_ids(), &[3]);

        // Plain rows are untouched.
        assert!(store.ensure_materialized(0));
        assert_eq!(store.active_ids(), &[3]);
        assert!(!store.ensure_materialized(9));
    }

    #[test]
    fn test_flush_redistributes() {
        let mut store = store();
        let id = store.push_composed(vec![0, 1]).unwrap();
        assert!(store.ensure_materialized(id));
        assert_eq!(store.read_row(id), Some(&[0.5, 0.5][..]));
        assert_eq!(store.pending_updates(), 0);

        store.row_mut(id).unwrap().copy_from_slice(&[1.5, -0.5]);
        assert_eq!(store.pending_updates(), 1);
        assert_eq!(store.flush(), 1);
        assert_eq!(store.pending_updates(), 0);

        assert_eq!(store.read_row(0), Some(&[1.5, -0.5][..]));
        assert_eq!(store.read_row(1), Some(&[0.5, 0.5][..]));
        assert_eq!(store.read_row(2), Some(&[4.0, 4.0][..]));
        assert!(store.active_ids().is_empty());
        assert!(!store.composition(id).unwrap().is_fresh());

        assert!(store.ensure_materialized(id));
        assert_eq!(store.read_row(id), Some(&[1.0, 0.0][..]));
    }

    #[test]
    fn test_nan_constituent_is_not_pending() {
        let mut store = WeightStore::<u32>::from_matrix(1, vec![f32::NAN, 2.0]).unwrap();
        let id = store.push_composed(vec![0, 1]).unwrap();
        assert!(store.ensure_materialized(id));
        assert!(store.read_row(id).unwrap()[0].is_nan());
        assert_eq!(store.pending_updates(), 0);

        store.row_mut(id).unwrap()[0] = 1.0;
        assert_eq!(store.pending_updates(), 1);
    }

    #[test]
    fn test_flush_untouched_is_noop() {
        let mut store = store();
        let id = store.push_composed(vec![1, 2]).unwrap();
        assert!(store.ensure_materialized(id));
        let before = store.matrix()[..6].to_vec();

        assert_eq!(store.flush(), 1);
        assert_eq!(&store.matrix()[..6], &before[..]);
        assert_eq!(store.flush(), 0);
    }
}
