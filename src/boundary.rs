use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MapError;

/// Policy for indices that fall outside of `[0, size)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode
{
    /// Samples outside the array take the fill value.
    #[default]
    Constant,
    /// Clamp to the edge sample.
    Nearest,
    /// Periodic continuation.
    Wrap,
    /// Reflect about the edge sample, which is not repeated (`d c b | a b c d | c b a`).
    Mirror,
    /// Reflect about the edge of the array, the edge sample is repeated (`c b a | a b c d | d c b`).
    Reflect,
}

impl BoundaryMode
{
    pub const ALL: [BoundaryMode; 5] = [BoundaryMode::Constant, BoundaryMode::Nearest, BoundaryMode::Wrap, BoundaryMode::Mirror, BoundaryMode::Reflect];

    pub fn name(&self) -> &'static str
    {
        match self
        {
            BoundaryMode::Constant => "constant",
            BoundaryMode::Nearest => "nearest",
            BoundaryMode::Wrap => "wrap",
            BoundaryMode::Mirror => "mirror",
            BoundaryMode::Reflect => "reflect",
        }
    }

    ///
    /// Map a raw index onto an index usable for gathering. For every mode except
    /// `Constant` the result lies in `[0, size-1]`; `Constant` passes the index through
    /// and leaves range checks to [`BoundaryMode::is_valid`].
    ///
    #[inline]
    pub fn fix(self, index: i64, size: usize) -> i64
    {
        let size = size as i64;
        match self
        {
            BoundaryMode::Constant => index,
            BoundaryMode::Nearest => index.clamp(0, size - 1),
            BoundaryMode::Wrap => index.rem_euclid(size),
            BoundaryMode::Mirror => mirror(index, size),
            BoundaryMode::Reflect => reflect(index, size),
        }
    }

    /// Whether the unfixed `index` may contribute a sample. Only `Constant` ever rejects one.
    #[inline]
    pub fn is_valid(self, index: i64, size: usize) -> bool
    {
        match self
        {
            BoundaryMode::Constant => index >= 0 && index < size as i64,
            _ => true,
        }
    }

    /// True when no index can be invalid under this mode, so gathers need no mask.
    #[inline]
    pub fn always_valid(self) -> bool
    {
        self != BoundaryMode::Constant
    }

    /// Apply [`BoundaryMode::fix`] to every element of a flattened index array.
    pub fn fix_indices(self, indices: &[i64], size: usize) -> Vec<i64>
    {
        indices.iter().map(|&index| self.fix(index, size)).collect()
    }
}

/// Triangular wave with half period `size - 1`.
#[inline]
fn mirror(index: i64, size: i64) -> i64
{
    let s = size - 1;
    if s == 0
    {
        return 0;
    }
    ((index + s).rem_euclid(2 * s) - s).abs()
}

/// Triangular wave with half period `size`, the edge sample repeated.
#[inline]
fn reflect(index: i64, size: i64) -> i64
{
    (mirror(2 * index + 1, 2 * size + 1) - 1).div_euclid(2)
}

impl Display for BoundaryMode
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for BoundaryMode
{
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoundaryMode::ALL.into_iter().find(|mode| mode.name() == s).ok_or_else(|| MapError::UnsupportedMode(s.to_string()))
    }
}

#[cfg(test)]
const SAMPLE_INDICES: [i64; 12] = [i64::MIN / 4, -1_000_000_007, -65, -17, -5, -2, -1, 0, 3, 64, 1_000_000_009, i64::MAX / 4];

#[test]
fn fixed_indices_stay_in_range()
{
    for mode in [BoundaryMode::Nearest, BoundaryMode::Wrap, BoundaryMode::Mirror, BoundaryMode::Reflect]
    {
        for size in [1_usize, 2, 3, 7, 64]
        {
            for index in SAMPLE_INDICES.into_iter().chain(-40..40)
            {
                let fixed = mode.fix(index, size);
                assert!(fixed >= 0 && fixed < size as i64, "{mode} fixed {index} to {fixed} for size {size}");
            }
        }
    }
}

#[test]
fn mirror_and_reflect_are_periodic()
{
    for size in [1_usize, 2, 3, 5, 8]
    {
        let reflect_period = 2 * size as i64;
        let mirror_period = 2 * (size as i64 - 1);
        for index in -30..30
        {
            assert_eq!(BoundaryMode::Reflect.fix(index, size), BoundaryMode::Reflect.fix(index + reflect_period, size));
            if mirror_period > 0
            {
                assert_eq!(BoundaryMode::Mirror.fix(index, size), BoundaryMode::Mirror.fix(index + mirror_period, size));
            }
        }
    }
}

#[test]
fn boundary_sequences()
{
    let fixed = |mode: BoundaryMode| -> Vec<i64> { (-4..8).map(|i| mode.fix(i, 4)).collect() };
    assert_eq!(fixed(BoundaryMode::Constant), (-4..8).collect::<Vec<_>>());
    assert_eq!(fixed(BoundaryMode::Nearest), vec![0, 0, 0, 0, 0, 1, 2, 3, 3, 3, 3, 3]);
    assert_eq!(fixed(BoundaryMode::Wrap), vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
    assert_eq!(fixed(BoundaryMode::Mirror), vec![2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0, 1]);
    assert_eq!(fixed(BoundaryMode::Reflect), vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);
}

#[test]
fn only_constant_mode_rejects_indices()
{
    assert!(BoundaryMode::Constant.is_valid(0, 4));
    assert!(BoundaryMode::Constant.is_valid(3, 4));
    assert!(!BoundaryMode::Constant.is_valid(-1, 4));
    assert!(!BoundaryMode::Constant.is_valid(4, 4));
    assert!(!BoundaryMode::Constant.always_valid());
    for mode in [BoundaryMode::Nearest, BoundaryMode::Wrap, BoundaryMode::Mirror, BoundaryMode::Reflect]
    {
        assert!(mode.always_valid());
        assert!(mode.is_valid(-100, 4));
    }
}

#[test]
fn fix_indices_maps_every_element()
{
    let indices = [-1_i64, 0, 4, 9];
    assert_eq!(BoundaryMode::Wrap.fix_indices(&indices, 4), vec![3, 0, 0, 1]);
    assert_eq!(BoundaryMode::Reflect.fix_indices(&indices, 4), vec![0, 0, 3, 1]);
    assert_eq!(BoundaryMode::Constant.fix_indices(&indices, 4), indices.to_vec());
}

#[test]
fn parse_modes()
{
    for mode in BoundaryMode::ALL
    {
        assert_eq!(mode.to_string().parse::<BoundaryMode>(), Ok(mode));
    }
    assert_eq!("grid-wrap".parse::<BoundaryMode>(), Err(MapError::UnsupportedMode("grid-wrap".to_string())));
}
