//! Cell-parallel matrix filling.
//!
//! Every (experiment, application) cell reads shared immutable inputs and
//! writes its own slot, so cells can be evaluated on rayon's work-stealing
//! pool without any synchronisation.

use rayon::prelude::*;
use nalgebra::Scalar;
use sensim_core::Matrix;

use crate::config::ParallelConfig;
use crate::error::Result;

/// Evaluate `f(row, col)` for every cell of a `rows x cols` matrix.
///
/// Runs sequentially when parallelism is disabled, the matrix is smaller than
/// `config.min_cells_for_parallel`, or only one rayon thread is available.
/// The first error encountered is returned.
pub fn fill_matrix<T, F>(rows: usize, cols: usize, config: &ParallelConfig, f: F) -> Result<Matrix<T>>
where
    T: Scalar + Send,
    F: Fn(usize, usize) -> Result<T> + Sync,
{
    let cells = rows * cols;
    let cell = |k: usize| f(k / cols, k % cols);

    let data: Vec<T> = if config.use_parallel(cells) {
        log::debug!(
            "filling {}x{} matrix on {} threads",
            rows,
            cols,
            rayon::current_num_threads()
        );
        (0..cells).into_par_iter().map(cell).collect::<Result<_>>()?
    } else {
        (0..cells).map(cell).collect::<Result<_>>()?
    };
    Ok(Matrix::from_row_vec(rows, cols, data)?)
}

/// Map `f` over `items`, on the pool when there are enough of them.
pub fn map_items<I, T, F>(items: &[I], config: &ParallelConfig, f: F) -> Result<Vec<T>>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<T> + Sync + Send,
{
    if config.use_parallel(items.len()) {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}
