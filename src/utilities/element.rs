use std::fmt::Debug;

use num_traits::{Float, NumCast, ToPrimitive};

/// Largest coordinate magnitude that is converted to an index. Beyond 2^53 an
/// `f64` no longer resolves neighbouring integers, and keeping indices this
/// small leaves the boundary arithmetic free of `i64` overflow.
pub(crate) const INDEX_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Convert an already integral floating point value into an index.
#[inline]
pub(crate) fn clamp_index<W: Float>(value: W) -> i64
{
    let v = value.to_f64().unwrap_or(0.0);
    if v.is_nan()
    {
        0
    }
    else
    {
        v.clamp(-INDEX_LIMIT, INDEX_LIMIT) as i64
    }
}

/// Value type of the sampled array (input and output).
pub trait Element : Copy + Send + Sync + ToPrimitive + Debug + 'static
{
    /// Integer element types get their blended result rounded before the cast.
    const IS_INTEGER: bool;

    /// Only `f32` values are accumulated in single precision, and only together with
    /// `f32` coordinates.
    const SINGLE_PRECISION: bool;

    /// Coerce the fill value into this type. `None` when it cannot be represented.
    fn from_fill(value: f64) -> Option<Self>;

    /// Cast an accumulated result back into this type. Integer targets truncate and
    /// saturate, NaN becomes zero.
    fn from_accumulated<W: Float>(value: W) -> Self;

    #[inline]
    fn to_accumulator<W: Float>(self) -> W
    {
        <W as NumCast>::from(self).unwrap_or_else(W::nan)
    }
}

macro_rules! impl_integer_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t
            {
                const IS_INTEGER: bool = true;
                const SINGLE_PRECISION: bool = false;

                #[inline]
                fn from_fill(value: f64) -> Option<Self>
                {
                    num_traits::cast::<f64, $t>(value)
                }

                #[inline]
                fn from_accumulated<W: Float>(value: W) -> Self
                {
                    value.to_f64().unwrap_or(0.0) as $t
                }
            }
        )*
    };
}

macro_rules! impl_float_element {
    ($($t:ty => $single:expr),*) => {
        $(
            impl Element for $t
            {
                const IS_INTEGER: bool = false;
                const SINGLE_PRECISION: bool = $single;

                #[inline]
                fn from_fill(value: f64) -> Option<Self>
                {
                    Some(value as $t)
                }

                #[inline]
                fn from_accumulated<W: Float>(value: W) -> Self
                {
                    value.to_f64().unwrap_or(f64::NAN) as $t
                }
            }
        )*
    };
}

impl_integer_element!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_float_element!(f32 => true, f64 => false);

/// Value type of a coordinate array. The coordinate type decides the precision of
/// the interpolation weights; the sum is accumulated in `f64` unless both the
/// coordinates and the sampled values are `f32`.
pub trait Coordinate : Copy + Send + Sync + Debug + 'static
{
    type Weight: Float + Send + Sync + Debug;

    const SINGLE_PRECISION: bool;

    /// Nearest index, ties rounded away from zero.
    fn round_index(self) -> i64;

    /// `floor(self)` as an index together with the fractional remainder.
    fn floor_index(self) -> (i64, Self::Weight);
}

macro_rules! impl_float_coordinate {
    ($($t:ty => $single:expr),*) => {
        $(
            impl Coordinate for $t
            {
                type Weight = $t;
                const SINGLE_PRECISION: bool = $single;

                #[inline]
                fn round_index(self) -> i64
                {
                    clamp_index(self.round())
                }

                #[inline]
                fn floor_index(self) -> (i64, Self::Weight)
                {
                    let lower = self.floor();
                    (clamp_index(lower), self - lower)
                }
            }
        )*
    };
}

macro_rules! impl_integer_coordinate {
    ($($t:ty),*) => {
        $(
            impl Coordinate for $t
            {
                type Weight = f64;
                const SINGLE_PRECISION: bool = false;

                #[inline]
                fn round_index(self) -> i64
                {
                    clamp_index(self as f64)
                }

                #[inline]
                fn floor_index(self) -> (i64, Self::Weight)
                {
                    (clamp_index(self as f64), 0.0)
                }
            }
        )*
    };
}

impl_float_coordinate!(f32 => true, f64 => false);
impl_integer_coordinate!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

#[test]
fn integer_elements_saturate()
{
    assert_eq!(i32::from_accumulated(2.75_f64), 2);
    assert_eq!(i32::from_accumulated(-2.75_f64), -2);
    assert_eq!(u8::from_accumulated(300.0_f64), 255);
    assert_eq!(u8::from_accumulated(-4.0_f32), 0);
    assert_eq!(i16::from_accumulated(f64::NAN), 0);
    assert_eq!(f32::from_accumulated(0.5_f64), 0.5);
    assert_eq!(7_u16.to_accumulator::<f32>(), 7.0);
}

#[test]
fn fill_values_are_coerced_to_the_element_type()
{
    assert_eq!(u8::from_fill(7.9), Some(7));
    assert_eq!(u8::from_fill(-1.0), None);
    assert_eq!(i32::from_fill(f64::NAN), None);
    assert_eq!(f32::from_fill(0.25), Some(0.25));
    assert!(f64::from_fill(f64::NAN).unwrap().is_nan());
}

#[test]
fn coordinates_round_and_floor()
{
    assert_eq!(0.5_f64.round_index(), 1);
    assert_eq!((-0.5_f64).round_index(), -1);
    assert_eq!(1.5_f32.round_index(), 2);
    assert_eq!(2.5_f64.round_index(), 3);
    assert_eq!((-1.25_f64).floor_index(), (-2, 0.75));
    assert_eq!(3_i32.floor_index(), (3, 0.0));
    assert_eq!((-7_i64).round_index(), -7);
    assert_eq!(f64::NAN.round_index(), 0);
    assert_eq!(f64::INFINITY.round_index(), INDEX_LIMIT as i64);
    assert_eq!(f64::NEG_INFINITY.floor_index().0, -(INDEX_LIMIT as i64));
}

#[test]
fn only_f32_runs_in_single_precision()
{
    assert!(<f32 as Element>::SINGLE_PRECISION && <f32 as Coordinate>::SINGLE_PRECISION);
    assert!(!<f64 as Element>::SINGLE_PRECISION && !<f64 as Coordinate>::SINGLE_PRECISION);
    assert!(!<i32 as Element>::SINGLE_PRECISION && !<u8 as Coordinate>::SINGLE_PRECISION);
}
