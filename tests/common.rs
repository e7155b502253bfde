#![allow(unused)]

use std::ops::RangeInclusive;

use ndarray::prelude::*;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

const FLOAT_RANGE: RangeInclusive<f64> = -1.0..=1.0;
const DIM_RANGE: RangeInclusive<usize> = 1..=8;

#[derive(Debug, Arbitrary)]
struct Layout {
    invert_rows: bool,
    invert_cols: bool,
    transpose: bool,
}

impl Layout {
    fn apply(&self, mut arr: Array2<f64>) -> Array2<f64> {
        if self.invert_rows {
            arr.invert_axis(Axis(0));
        }
        if self.invert_cols {
            arr.invert_axis(Axis(1));
        }
        if self.transpose {
            arr.reversed_axes()
        } else {
            arr
        }
    }
}

fn to_symm(arr: &Array2<f64>) -> Array2<f64> {
    (arr + &arr.t()) / 2.
}

fn to_spd(arr: &Array2<f64>) -> Array2<f64> {
    arr.t().dot(arr) + Array2::<f64>::eye(arr.nrows())
}

prop_compose! {
    pub fn square_arr()(dim in DIM_RANGE)
        (data in prop::collection::vec(FLOAT_RANGE, dim*dim), dim in Just(dim), layout in any::<Layout>()) -> Array2<f64> {
        layout.apply(Array2::from_shape_vec((dim, dim), data).unwrap())
    }
}

prop_compose! {
    pub fn spd_arr()(arr in square_arr()) -> Array2<f64> {
        to_spd(&arr)
    }
}

prop_compose! {
    /// Symmetric `a` and positive definite `b` of equal dimension
    pub fn pencil()(dim in DIM_RANGE)
        (a in prop::collection::vec(FLOAT_RANGE, dim*dim),
         b in prop::collection::vec(FLOAT_RANGE, dim*dim),
         dim in Just(dim),
         layout in any::<Layout>()) -> (Array2<f64>, Array2<f64>) {
        let a = layout.apply(Array2::from_shape_vec((dim, dim), a).unwrap());
        let b = Array2::from_shape_vec((dim, dim), b).unwrap();
        (to_symm(&a), to_spd(&b))
    }
}

/// Cosine of the angle between two vectors
pub fn cosine(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    x.dot(&y) / (x.dot(&x).sqrt() * y.dot(&y).sqrt())
}
