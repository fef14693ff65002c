//! Epsilon-tolerant comparisons for generic floating point scalars.
//!
//! Every predicate compares against a tolerance that scales with the
//! magnitude of its operands: `max(eps, eps * max(|a|, |b|))`, where `eps`
//! is the machine epsilon of the scalar type. The absolute floor keeps
//! comparisons against zero meaningful.

use approx::AbsDiffEq;
use nalgebra::RealField;

/// Machine epsilon of `T`.
#[inline]
pub fn epsilon<T: RealField + Copy>() -> T {
    T::default_epsilon()
}

/// Returns the most negative finite value of `T`.
///
/// Used as the "no intersection" sentinel by the sentinel-style APIs.
#[inline]
pub fn lowest<T: RealField + Copy>() -> T {
    T::min_value().unwrap_or_else(|| -T::one())
}

/// Returns the largest finite value of `T`.
#[inline]
pub fn highest<T: RealField + Copy>() -> T {
    T::max_value().unwrap_or_else(T::one)
}

/// Tolerance used when comparing `a` and `b`.
#[inline]
fn tolerance<T: RealField + Copy>(a: T, b: T) -> T {
    let eps = epsilon::<T>();
    eps.max(eps * a.abs().max(b.abs()))
}

/// Checks if `a` is greater than `b` by more than the tolerance.
#[inline]
pub fn is_more<T: RealField + Copy>(a: T, b: T) -> bool {
    a - b > tolerance(a, b)
}

/// Checks if `a` is less than `b` by more than the tolerance.
#[inline]
pub fn is_less<T: RealField + Copy>(a: T, b: T) -> bool {
    a - b < -tolerance(a, b)
}

/// Checks if `a` and `b` are equal within the tolerance.
#[inline]
pub fn is_equal<T: RealField + Copy>(a: T, b: T) -> bool {
    (a - b).abs() <= tolerance(a, b)
}

/// Checks if `value` is zero within the tolerance.
#[inline]
pub fn is_zero<T: RealField + Copy>(value: T) -> bool {
    is_equal(value, T::zero())
}

/// Checks if `value` is greater than zero by more than the tolerance.
#[inline]
pub fn is_positive<T: RealField + Copy>(value: T) -> bool {
    is_more(value, T::zero())
}

/// Checks if `value` is less than zero by more than the tolerance.
#[inline]
pub fn is_negative<T: RealField + Copy>(value: T) -> bool {
    is_less(value, T::zero())
}

/// Checks if `value` lies in `[low, high]`, boundaries included with tolerance.
#[inline]
pub fn in_range<T: RealField + Copy>(value: T, low: T, high: T) -> bool {
    !is_less(value, low) && !is_more(value, high)
}
