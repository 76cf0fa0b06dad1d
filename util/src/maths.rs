//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Return `num` evenly spaced samples over the closed interval `[start, stop]`.
///
/// A single sample gives `[start]`, zero samples give an empty vector.
pub fn linspace<T>(start: T, stop: T, num: usize) -> Vec<T>
where
    T: Float
{
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = T::from(num - 1).unwrap_or_else(T::nan);
            (0..num)
                .map(|i| lin_map((T::zero(), last), (start, stop), T::from(i).unwrap_or_else(T::nan)))
                .collect()
        }
    }
}

/// Apply polynomial coefficients to a value
///
/// Coefficients are highest power first.
pub fn poly_val<T>(value: &T, coeffs: &[T]) -> T
where
    T: Float + std::ops::AddAssign
{
    let mut res = T::zero();

    for (i, c) in coeffs.iter().enumerate() {
        res += value.powi((coeffs.len() - 1 - i) as i32) * *c;
    }

    res
}

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}
