use approx::assert_abs_diff_eq;
use ndarray::prelude::*;
use proptest::prelude::*;

use gev_descent::{
    norm::NormalizeColumns,
    rayleigh::{NormalizeEnergy, Rayleigh},
    triangular::IntoTriangular,
};

mod common;

fn run_normalize_test(a: Array2<f64>, b: Array2<f64>) {
    let n = a.nrows();
    let mut u = Array2::from_shape_fn((n, n), |(i, j)| 1. + (i * n + j) as f64 / 10.);

    u.normalize_energy_inplace(&b).unwrap();
    assert_abs_diff_eq!(u.energies(&b), Array1::ones(n), epsilon = 1e-8);

    // the quotients are the diagonal of the projected pencil
    let quotients = u.rayleigh_quotients(&a, &b).unwrap();
    let projected = u.t().dot(&a.dot(&u));
    assert_abs_diff_eq!(quotients, projected.diag(), epsilon = 1e-8);

    // and do not depend on the scale of the columns
    let mut v = u.clone();
    v.normalize_columns_inplace().unwrap();
    assert_abs_diff_eq!(v.rayleigh_quotients(&a, &b).unwrap(), quotients, epsilon = 1e-8);
}

fn run_triangular_test(arr: Array2<f64>) {
    let diag = Array2::from_diag(&arr.diag());
    assert_abs_diff_eq!(arr.triu(1) + arr.tril(-1) + &diag, arr);
    assert_abs_diff_eq!(arr.triu(0) - arr.triu(1), diag.clone());
    assert_abs_diff_eq!(arr.t().triu(0), arr.tril(0).t());

    // masking in place agrees with the copying methods
    for k in -2..=2 {
        assert_abs_diff_eq!(arr.clone().into_triu(k), arr.triu(k));
        assert_abs_diff_eq!(arr.clone().into_tril(k), arr.tril(k));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn normalize_test((a, b) in common::pencil()) {
        run_normalize_test(a, b)
    }

    #[test]
    fn triangular_test(arr in common::square_arr()) {
        run_triangular_test(arr)
    }

    #[test]
    fn spd_energies_are_positive(b in common::spd_arr()) {
        let n = b.nrows();
        let u = Array2::<f64>::eye(n);
        prop_assert!(u.energies(&b).iter().all(|&x| x > 0.));
    }
}
