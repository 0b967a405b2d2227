//! Parallel kernel tests: every `*_par` operation must agree with its
//! sequential counterpart, whichever executor runs it.
//!
//! Within one output row the accumulation order is the same in both paths,
//! so results are compared exactly; the random matrices are seeded so runs
//! are reproducible.

#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowsparse::{
    ExecOptions, Executor, MatError, MatShape, RayonPool, RowMajorMatrix, RowView, Sequential,
    SparseMatrix, UniverseExecutor,
};

fn random_sparse(nrows: usize, ncols: usize, density: f64, seed: u64) -> SparseMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = SparseMatrix::new(nrows, ncols);
    for i in 0..nrows {
        for j in 0..ncols {
            if rng.gen_bool(density) {
                m.set(i, j, rng.gen_range(-1.0..1.0)).unwrap();
            }
        }
    }
    m
}

fn pool(threads: usize) -> RayonPool {
    RayonPool::with_options(&ExecOptions::with_threads(threads)).unwrap()
}

/// Sequential and parallel sparse × sparse products are identical.
#[test]
fn multiply_par_matches_sequential() {
    let a = random_sparse(40, 30, 0.15, 10);
    let b = random_sparse(30, 25, 0.2, 11);

    let mut seq = SparseMatrix::<f64>::new(40, 25);
    a.multiply(&b, &mut seq).unwrap();

    let mut par = SparseMatrix::<f64>::new(40, 25);
    a.multiply_par(&b, &mut par, &pool(4)).unwrap();
    assert_eq!(seq, par);

    let mut inline = SparseMatrix::<f64>::new(40, 25);
    a.multiply_par(&b, &mut inline, &Sequential).unwrap();
    assert_eq!(seq, inline);
}

/// The parallel product can target a dense row-major matrix.
#[test]
fn multiply_par_into_dense_rows() {
    let a = random_sparse(16, 12, 0.3, 12);
    let b = random_sparse(12, 9, 0.3, 13);

    let mut seq = RowMajorMatrix::<f64>::zeros(16, 9);
    a.multiply(&b, &mut seq).unwrap();
    let mut par = RowMajorMatrix::<f64>::zeros(16, 9);
    a.multiply_par(&b, &mut par, &pool(3)).unwrap();
    assert_eq!(seq, par);
}

/// The parallel 3×3 example: A·A with a pre-zeroed target.
#[test]
fn multiply_par_example() {
    let a = SparseMatrix::from_triplets(
        3,
        3,
        &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0), (2, 0, 4.0), (2, 2, 5.0)],
    )
    .unwrap();
    let mut c = RowMajorMatrix::<f64>::zeros(3, 3);
    a.multiply_par(&a, &mut c, &pool(2)).unwrap();
    assert_eq!(c.as_slice(), &[9.0, 0.0, 12.0, 0.0, 9.0, 0.0, 24.0, 0.0, 33.0]);
}

/// Parallel scaled add, scalar add and scale agree with the sequential forms.
#[test]
fn additive_par_matches_sequential() {
    let a = random_sparse(25, 20, 0.2, 14);
    let b = random_sparse(25, 20, 0.2, 15);
    let exec = pool(4);

    let mut seq = a.clone();
    seq.mutable_add(1.5, &b).unwrap();
    let mut par = a.clone();
    par.mutable_add_par(1.5, &b, &exec).unwrap();
    assert_eq!(seq, par);

    seq.mutable_add_scalar(0.25);
    par.mutable_add_scalar_par(0.25, &exec).unwrap();
    assert_eq!(seq, par);

    seq.mutable_multiply(-3.0);
    par.mutable_multiply_par(-3.0, &exec).unwrap();
    assert_eq!(seq, par);

    par.mutable_multiply_par(0.0, &exec).unwrap();
    assert_eq!(par.nnz(), 0);
}

/// A shape mismatch is reported before any unit is submitted.
#[test]
fn mutable_add_par_rejects_mismatch() {
    let mut a = random_sparse(5, 5, 0.5, 16);
    let before = a.clone();
    let b = SparseMatrix::<f64>::new(5, 4);
    assert!(matches!(
        a.mutable_add_par(1.0, &b, &pool(2)),
        Err(MatError::DimensionMismatch { op: "mutable_add_par", .. })
    ));
    assert_eq!(a, before);
}

/// Parallel matrix–vector product agrees with the sequential one.
#[test]
fn multiply_vec_par_matches_sequential() {
    let a = random_sparse(50, 20, 0.2, 17);
    let b: Vec<f64> = (0..20).map(|i| (i as f64).sin()).collect();
    let mut seq = vec![1.0; 50];
    let mut par = vec![1.0; 50];
    a.multiply_vec(&b, -0.5, &mut seq).unwrap();
    a.multiply_vec_par(&b, -0.5, &mut par, &pool(4)).unwrap();
    assert_eq!(seq, par);
}

/// Parallel transpose-multiply agrees with the sequential kernel.
#[test]
fn transpose_multiply_par_matches_sequential() {
    let a = random_sparse(30, 18, 0.2, 18);
    let b = random_sparse(30, 11, 0.25, 19);
    let mut seq = SparseMatrix::<f64>::new(18, 11);
    a.transpose_multiply(&b, &mut seq).unwrap();
    let mut par = SparseMatrix::<f64>::new(18, 11);
    a.transpose_multiply_par(&b, &mut par, &pool(4)).unwrap();
    assert_eq!(seq, par);

    let mut bad = SparseMatrix::<f64>::new(11, 18);
    assert!(a.transpose_multiply_par(&b, &mut bad, &pool(2)).is_err());
}

/// LU and QR fail regardless of contents or executor.
#[test]
fn decompositions_unsupported_in_parallel() {
    let a = random_sparse(4, 4, 0.9, 20);
    let exec = pool(2);
    assert!(matches!(a.lup_par(&exec), Err(MatError::Unsupported(_))));
    assert!(matches!(a.qr_par(&exec), Err(MatError::Unsupported(_))));
    let empty = SparseMatrix::<f64>::new(3, 3);
    assert!(matches!(empty.lup(), Err(MatError::Unsupported(_))));
}

/// Row source that panics when one particular row is read.
struct PoisonedRows {
    inner: RowMajorMatrix<f64>,
    poisoned: usize,
}

impl MatShape for PoisonedRows {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }
}

impl RowView<f64> for PoisonedRows {
    type Row<'a>
        = &'a [f64]
    where
        Self: 'a;

    fn row(&self, i: usize) -> &[f64] {
        if i == self.poisoned {
            panic!("row {i} is poisoned");
        }
        self.inner.row(i)
    }
}

/// A unit that panics mid fan-out is reported as an interruption, not swallowed,
/// whether the units run on the pool or inline.
#[test]
fn panicking_unit_surfaces_as_interrupted() {
    fn check<E: Executor>(exec: &E) {
        let mut a = SparseMatrix::<f64>::new(6, 6);
        for i in 0..6 {
            a.set(i, i, 1.0).unwrap();
        }
        let b = PoisonedRows {
            inner: RowMajorMatrix::from_fn(6, 6, |i, j| (i + j) as f64),
            poisoned: 4,
        };
        let mut c = SparseMatrix::<f64>::new(6, 6);
        match a.multiply_par(&b, &mut c, exec) {
            Err(MatError::Interrupted(msg)) => assert!(msg.contains("poisoned")),
            other => panic!("expected Interrupted, got {other:?}"),
        }
    }
    check(&pool(2));
    check(&Sequential);
}

/// A wrong-shaped product target is reported before any unit is submitted.
#[test]
fn multiply_par_rejects_bad_target() {
    let a = random_sparse(5, 5, 0.5, 22);
    let b = random_sparse(5, 5, 0.5, 23);
    let mut c = SparseMatrix::<f64>::new(5, 4);
    c.set(0, 0, 3.0).unwrap();
    let before = c.clone();
    assert_eq!(
        a.multiply_par(&b, &mut c, &pool(2)),
        Err(MatError::DimensionMismatch { op: "multiply_par", expected: (5, 5), found: (5, 4) })
    );
    assert_eq!(c, before);
}

/// A wrong-length output vector is reported before any unit is submitted.
#[test]
fn multiply_vec_par_rejects_bad_target() {
    let a = random_sparse(6, 4, 0.5, 24);
    let b = vec![1.0; 4];
    let mut c = vec![2.0; 5];
    assert_eq!(
        a.multiply_vec_par(&b, 1.0, &mut c, &pool(2)),
        Err(MatError::DimensionMismatch { op: "multiply_vec_par", expected: (6, 1), found: (5, 1) })
    );
    assert_eq!(c, vec![2.0; 5]);
}

/// The feature-selected executor runs the same kernels.
#[test]
fn universe_executor_runs_kernels() {
    let exec = UniverseExecutor::from_options(&ExecOptions::with_threads(2)).unwrap();
    assert_eq!(exec.size(), 2);
    let a = random_sparse(12, 12, 0.3, 21);
    let mut seq = SparseMatrix::<f64>::new(12, 12);
    a.multiply(&a, &mut seq).unwrap();
    let mut par = SparseMatrix::<f64>::new(12, 12);
    a.multiply_par(&a, &mut par, &exec).unwrap();
    assert_eq!(seq, par);
}
