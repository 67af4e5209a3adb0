//! Deferred, chunked signal data.
//!
//! `LazyData` holds a tiling of a `(traces, channels)` array where every tile
//! is a deferred computation. Nothing is computed until
//! [`LazyData::materialize`] is called, and then only the tiles intersecting
//! the requested slice run. Materialization is synchronous and always
//! returns a fresh array; the deferred sources are never modified.

use crate::error::{Result, VoigtError};
use ndarray::{s, Array2};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A deferred computation producing one tile of data
pub type ChunkFn = Arc<dyn Fn() -> Result<Array2<f64>> + Send + Sync>;

#[derive(Clone)]
struct Chunk {
    rows: Range<usize>,
    cols: Range<usize>,
    compute: ChunkFn,
}

impl Chunk {
    fn intersection(&self, rows: &Range<usize>, cols: &Range<usize>) -> Option<(Range<usize>, Range<usize>)> {
        let r0 = rows.start.max(self.rows.start);
        let r1 = rows.end.min(self.rows.end);
        let c0 = cols.start.max(self.cols.start);
        let c1 = cols.end.min(self.cols.end);
        (r0 < r1 && c0 < c1).then(|| (r0..r1, c0..c1))
    }
}

/// Chunked, deferred `(traces, channels)` data
#[derive(Clone)]
pub struct LazyData {
    shape: (usize, usize),
    chunks: Vec<Chunk>,
}

impl fmt::Debug for LazyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyData")
            .field("shape", &self.shape)
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

impl LazyData {
    /// Build lazy data from a generator called once per tile
    ///
    /// The array of shape `shape` is cut into tiles of `chunk_shape` (the last
    /// tile along each axis may be smaller). `f(rows, cols)` must return an
    /// array of exactly `(rows.len(), cols.len())`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::Array2;
    /// use voigt_rs::signal::LazyData;
    ///
    /// let lazy = LazyData::from_fn((4, 10), (1, 10), |rows, cols| {
    ///     Ok(Array2::from_shape_fn((rows.len(), cols.len()), |(r, c)| {
    ///         (rows.start + r) as f64 * 100.0 + (cols.start + c) as f64
    ///     }))
    /// })
    /// .unwrap();
    ///
    /// let slice = lazy.materialize(2..3, 5..7).unwrap();
    /// assert_eq!(slice[[0, 0]], 205.0);
    /// assert_eq!(slice[[0, 1]], 206.0);
    /// ```
    pub fn from_fn<F>(shape: (usize, usize), chunk_shape: (usize, usize), f: F) -> Result<Self>
    where
        F: Fn(Range<usize>, Range<usize>) -> Result<Array2<f64>> + Send + Sync + 'static,
    {
        if chunk_shape.0 == 0 || chunk_shape.1 == 0 {
            return Err(VoigtError::InvalidInput(format!(
                "Chunk shape must be non-zero, got {:?}",
                chunk_shape
            )));
        }

        let f = Arc::new(f);
        let mut chunks = Vec::new();
        for r0 in (0..shape.0).step_by(chunk_shape.0) {
            let rows = r0..(r0 + chunk_shape.0).min(shape.0);
            for c0 in (0..shape.1).step_by(chunk_shape.1) {
                let cols = c0..(c0 + chunk_shape.1).min(shape.1);
                let f = Arc::clone(&f);
                let (r, c) = (rows.clone(), cols.clone());
                chunks.push(Chunk {
                    rows: rows.clone(),
                    cols,
                    compute: Arc::new(move || f(r.clone(), c.clone())),
                });
            }
        }

        Ok(Self { shape, chunks })
    }

    /// Wrap an in-memory array as lazy data
    ///
    /// The array is shared, not copied, until tiles are materialized.
    pub fn from_array(data: Array2<f64>, chunk_shape: (usize, usize)) -> Result<Self> {
        let shape = data.dim();
        let data = Arc::new(data);
        Self::from_fn(shape, chunk_shape, move |rows, cols| {
            Ok(data.slice(s![rows, cols]).to_owned())
        })
    }

    /// Concatenate lazy data along the trace axis
    pub(crate) fn stack(parts: &[LazyData]) -> Result<Self> {
        let channels = match parts.first() {
            Some(first) => first.shape.1,
            None => {
                return Err(VoigtError::InvalidInput(
                    "Cannot stack an empty list of signals".to_string(),
                ))
            }
        };

        let mut chunks = Vec::new();
        let mut row_offset = 0;
        for part in parts {
            if part.shape.1 != channels {
                return Err(VoigtError::DimensionMismatch(format!(
                    "Expected {} channels, got {}",
                    channels, part.shape.1
                )));
            }
            for chunk in &part.chunks {
                chunks.push(Chunk {
                    rows: chunk.rows.start + row_offset..chunk.rows.end + row_offset,
                    cols: chunk.cols.clone(),
                    compute: Arc::clone(&chunk.compute),
                });
            }
            row_offset += part.shape.0;
        }

        Ok(Self {
            shape: (row_offset, channels),
            chunks,
        })
    }

    /// Shape `(traces, channels)` of the full array
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Total number of tiles
    pub fn n_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Number of tiles a materialization of `rows x cols` would compute
    pub fn chunks_touched(&self, rows: &Range<usize>, cols: &Range<usize>) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.intersection(rows, cols).is_some())
            .count()
    }

    /// Compute the `rows x cols` slice, running only the intersecting tiles
    pub fn materialize(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Array2<f64>> {
        if rows.start > rows.end || rows.end > self.shape.0 || cols.start > cols.end || cols.end > self.shape.1 {
            return Err(VoigtError::InvalidInput(format!(
                "Slice [{:?}, {:?}] is outside data of shape {:?}",
                rows, cols, self.shape
            )));
        }

        let mut out = Array2::zeros((rows.len(), cols.len()));
        let mut computed = 0;

        for chunk in &self.chunks {
            let (r, c) = match chunk.intersection(&rows, &cols) {
                Some(overlap) => overlap,
                None => continue,
            };

            let block = (chunk.compute)()?;
            if block.dim() != (chunk.rows.len(), chunk.cols.len()) {
                return Err(VoigtError::Materialization(format!(
                    "Chunk at [{:?}, {:?}] produced shape {:?}, expected {:?}",
                    chunk.rows,
                    chunk.cols,
                    block.dim(),
                    (chunk.rows.len(), chunk.cols.len())
                )));
            }
            computed += 1;

            let src = block.slice(s![
                r.start - chunk.rows.start..r.end - chunk.rows.start,
                c.start - chunk.cols.start..c.end - chunk.cols.start
            ]);
            out.slice_mut(s![
                r.start - rows.start..r.end - rows.start,
                c.start - cols.start..c.end - cols.start
            ])
            .assign(&src);
        }

        log::debug!(
            "materialized [{:?}, {:?}] from {} of {} chunks",
            rows,
            cols,
            computed,
            self.chunks.len()
        );

        Ok(out)
    }

    /// Compute the full array
    pub fn compute(&self) -> Result<Array2<f64>> {
        self.materialize(0..self.shape.0, 0..self.shape.1)
    }
}
