// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap tiling strategies.
//!
//! A tiling strategy divides one rectangle among a sequence of sibling values.
//! Every strategy here is a pure function of its inputs and preserves the
//! order of the values it is given.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use kurbo::Rect;

use crate::error::LayoutError;

/// The golden ratio, the default target aspect ratio for [`TileStrategy::Squarify`].
pub const PHI: f64 = 1.618_033_988_749_895;

/// How a treemap divides a node's rectangle among its children.
///
/// With the `serde` feature, strategies deserialize from any name
/// [`from_name`](Self::from_name) accepts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(try_from = "String"))]
pub enum TileStrategy {
    /// Recursively bisect into two groups of roughly equal value, splitting
    /// along the longer side.
    #[default]
    Binary,
    /// Rows and columns with aspect ratios close to the golden ratio.
    Squarify,
    /// Stack children top to bottom.
    Slice,
    /// Lay children out left to right.
    Dice,
    /// Slice at odd depths, dice at even depths.
    SliceDice,
}

/// Accepted names for each strategy, canonical name first.
const NAMES: &[(&str, TileStrategy)] = &[
    ("binary", TileStrategy::Binary),
    ("squarify", TileStrategy::Squarify),
    ("slice", TileStrategy::Slice),
    ("dice", TileStrategy::Dice),
    ("slice-dice", TileStrategy::SliceDice),
    ("treemapBinary", TileStrategy::Binary),
    ("treemapSquarify", TileStrategy::Squarify),
    ("treemapSlice", TileStrategy::Slice),
    ("treemapDice", TileStrategy::Dice),
    ("treemapSliceDice", TileStrategy::SliceDice),
];

impl TileStrategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Binary,
        Self::Squarify,
        Self::Slice,
        Self::Dice,
        Self::SliceDice,
    ];

    /// Looks a strategy up by name.
    ///
    /// Both the short names (`"binary"`, `"slice-dice"`, ...) and the
    /// `treemapBinary`-style names are accepted.
    ///
    /// ```rust
    /// use understory_hierarchy_layout::{LayoutError, TileStrategy};
    ///
    /// assert_eq!(TileStrategy::from_name("squarify"), Ok(TileStrategy::Squarify));
    /// assert_eq!(TileStrategy::from_name("treemapSliceDice"), Ok(TileStrategy::SliceDice));
    /// assert!(matches!(
    ///     TileStrategy::from_name("spiral"),
    ///     Err(LayoutError::UnknownTileStrategy(_))
    /// ));
    /// ```
    pub fn from_name(name: &str) -> Result<Self, LayoutError> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, strategy)| strategy)
            .ok_or_else(|| LayoutError::UnknownTileStrategy(name.into()))
    }

    /// The canonical short name of this strategy.
    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Squarify => "squarify",
            Self::Slice => "slice",
            Self::Dice => "dice",
            Self::SliceDice => "slice-dice",
        }
    }

    /// Divides `rect` among `values`, appending one rectangle per value to `out`.
    ///
    /// `depth` is the depth of the node whose children are being tiled; only
    /// [`SliceDice`](Self::SliceDice) looks at it. Each rectangle's area is
    /// proportional to its value's share of the total. If the total is zero,
    /// every rectangle is degenerate.
    ///
    /// Values must be non-negative.
    pub fn tile(self, depth: usize, values: &[f64], rect: Rect, out: &mut Vec<Rect>) {
        debug_assert!(
            values.iter().all(|v| *v >= 0.0),
            "tile values must be non-negative"
        );
        let start = out.len();
        out.extend(core::iter::repeat_n(rect, values.len()));
        let cells = &mut out[start..];
        match self {
            Self::Binary => binary(values, rect, cells),
            Self::Squarify => squarify_ratio(PHI, values, rect, cells),
            Self::Slice => slice(values, rect, cells),
            Self::Dice => dice(values, rect, cells),
            Self::SliceDice if depth % 2 == 1 => slice(values, rect, cells),
            Self::SliceDice => dice(values, rect, cells),
        }
    }
}

impl fmt::Display for TileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TileStrategy {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for TileStrategy {
    type Error = LayoutError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_name(&name)
    }
}

/// Left to right, widths proportional to value.
fn dice(values: &[f64], rect: Rect, cells: &mut [Rect]) {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { rect.width() / total } else { 0.0 };
    let mut x = rect.x0;
    for (cell, value) in cells.iter_mut().zip(values) {
        let x0 = x;
        x += value * k;
        *cell = Rect::new(x0, rect.y0, x, rect.y1);
    }
}

/// Top to bottom, heights proportional to value.
fn slice(values: &[f64], rect: Rect, cells: &mut [Rect]) {
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { rect.height() / total } else { 0.0 };
    let mut y = rect.y0;
    for (cell, value) in cells.iter_mut().zip(values) {
        let y0 = y;
        y += value * k;
        *cell = Rect::new(rect.x0, y0, rect.x1, y);
    }
}

fn binary(values: &[f64], rect: Rect, cells: &mut [Rect]) {
    if values.is_empty() {
        return;
    }
    let mut sums = Vec::with_capacity(values.len() + 1);
    let mut running = 0.0;
    sums.push(running);
    for value in values {
        running += value;
        sums.push(running);
    }
    if running > 0.0 {
        partition(&sums, 0, values.len(), running, rect, cells);
    } else {
        cells.fill(Rect::new(rect.x0, rect.y0, rect.x0, rect.y1));
    }
}

/// Assigns `cells[i..j]` within `rect`, given the total `value` of that range.
fn partition(sums: &[f64], i: usize, j: usize, value: f64, rect: Rect, cells: &mut [Rect]) {
    if i + 1 >= j {
        cells[i] = rect;
        return;
    }

    let offset = sums[i];
    let target = value / 2.0 + offset;
    // First split point whose prefix sum reaches the halfway mark.
    let mut k = i + 1;
    let mut hi = j - 1;
    while k < hi {
        let mid = (k + hi) / 2;
        if sums[mid] < target {
            k = mid + 1;
        } else {
            hi = mid;
        }
    }
    if target - sums[k - 1] < sums[k] - target && i + 1 < k {
        k -= 1;
    }

    let left = sums[k] - offset;
    let right = value - left;
    if rect.width() > rect.height() {
        let xk = if value > 0.0 {
            (rect.x0 * right + rect.x1 * left) / value
        } else {
            rect.x1
        };
        partition(sums, i, k, left, Rect::new(rect.x0, rect.y0, xk, rect.y1), cells);
        partition(sums, k, j, right, Rect::new(xk, rect.y0, rect.x1, rect.y1), cells);
    } else {
        let yk = if value > 0.0 {
            (rect.y0 * right + rect.y1 * left) / value
        } else {
            rect.y1
        };
        partition(sums, i, k, left, Rect::new(rect.x0, rect.y0, rect.x1, yk), cells);
        partition(sums, k, j, right, Rect::new(rect.x0, yk, rect.x1, rect.y1), cells);
    }
}

/// Squarified tiling with a custom target aspect `ratio` (`>= 1`).
///
/// Children are grouped greedily into rows; a row grows while adding the next
/// value does not worsen its worst aspect ratio. Rows run along the shorter
/// side of the remaining space.
pub fn squarify_ratio(ratio: f64, values: &[f64], rect: Rect, cells: &mut [Rect]) {
    let n = values.len().min(cells.len());
    let mut remaining: f64 = values[..n].iter().sum();
    let mut area = rect;
    let mut i0 = 0;
    let mut i1 = 0;

    while i0 < n {
        let dx = area.width();
        let dy = area.height();

        // The first non-empty value starts the row; empty ones ride along.
        let mut sum;
        loop {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum;
        let mut max_value = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let value = values[i1];
            sum += value;
            min_value = min_value.min(value);
            max_value = max_value.max(value);
            beta = sum * sum * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum -= value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &values[i0..i1];
        let row_cells = &mut cells[i0..i1];
        if dx < dy {
            let y = if remaining > 0.0 {
                area.y0 + dy * sum / remaining
            } else {
                area.y1
            };
            dice(row, Rect::new(area.x0, area.y0, area.x1, y), row_cells);
            area.y0 = y;
        } else {
            let x = if remaining > 0.0 {
                area.x0 + dx * sum / remaining
            } else {
                area.x1
            };
            slice(row, Rect::new(area.x0, area.y0, x, area.y1), row_cells);
            area.x0 = x;
        }
        remaining -= sum;
        i0 = i1;
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn tiles(strategy: TileStrategy, depth: usize, values: &[f64], rect: Rect) -> Vec<Rect> {
        let mut out = Vec::new();
        strategy.tile(depth, values, rect, &mut out);
        out
    }

    fn close(a: Rect, b: Rect) -> bool {
        (a.x0 - b.x0).abs() < 1e-9
            && (a.y0 - b.y0).abs() < 1e-9
            && (a.x1 - b.x1).abs() < 1e-9
            && (a.y1 - b.y1).abs() < 1e-9
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for strategy in TileStrategy::ALL {
            assert_eq!(TileStrategy::from_name(strategy.name()), Ok(strategy));
            assert_eq!(strategy.to_string().parse::<TileStrategy>(), Ok(strategy));
        }
        assert_eq!(
            "treemapSlice".parse::<TileStrategy>(),
            Ok(TileStrategy::Slice)
        );
        assert_eq!(
            TileStrategy::from_name("Binary"),
            Err(LayoutError::UnknownTileStrategy("Binary".into()))
        );
    }

    #[test]
    fn dice_and_slice_split_one_axis() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let out = tiles(TileStrategy::Dice, 0, &[1.0, 3.0], rect);
        assert!(close(out[0], Rect::new(0.0, 0.0, 25.0, 50.0)));
        assert!(close(out[1], Rect::new(25.0, 0.0, 100.0, 50.0)));

        let out = tiles(TileStrategy::Slice, 0, &[1.0, 3.0], rect);
        assert!(close(out[0], Rect::new(0.0, 0.0, 100.0, 12.5)));
        assert!(close(out[1], Rect::new(0.0, 12.5, 100.0, 50.0)));
    }

    #[test]
    fn slice_dice_alternates_by_depth() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let even = tiles(TileStrategy::SliceDice, 2, &[1.0, 1.0], rect);
        assert!(close(even[0], Rect::new(0.0, 0.0, 5.0, 10.0)));
        let odd = tiles(TileStrategy::SliceDice, 1, &[1.0, 1.0], rect);
        assert!(close(odd[0], Rect::new(0.0, 0.0, 10.0, 5.0)));
    }

    #[test]
    fn binary_splits_longer_side_at_balanced_point() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let out = tiles(TileStrategy::Binary, 0, &[3.0, 1.0], rect);
        assert!(close(out[0], Rect::new(0.0, 0.0, 75.0, 40.0)));
        assert!(close(out[1], Rect::new(75.0, 0.0, 100.0, 40.0)));

        // Four equal values on a square: halves first, then quarters.
        let out = tiles(TileStrategy::Binary, 0, &[1.0; 4], Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(close(out[0], Rect::new(0.0, 0.0, 4.0, 4.0)));
        assert!(close(out[1], Rect::new(4.0, 0.0, 8.0, 4.0)));
        assert!(close(out[2], Rect::new(0.0, 4.0, 4.0, 8.0)));
        assert!(close(out[3], Rect::new(4.0, 4.0, 8.0, 8.0)));
    }

    #[test]
    fn squarify_keeps_cells_near_square() {
        let rect = Rect::new(0.0, 0.0, 600.0, 400.0);
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let out = tiles(TileStrategy::Squarify, 0, &values, rect);
        let total: f64 = values.iter().sum();
        for (cell, value) in out.iter().zip(values) {
            assert!((cell.area() - value / total * rect.area()).abs() < 1e-6);
            let aspect = (cell.width() / cell.height()).max(cell.height() / cell.width());
            assert!(aspect < 4.0, "aspect {aspect} for {cell:?}");
        }
    }

    #[test]
    fn zero_total_gives_degenerate_cells() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        for strategy in TileStrategy::ALL {
            let out = tiles(strategy, 0, &[0.0, 0.0, 0.0], rect);
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|r| r.area() == 0.0), "{strategy}: {out:?}");
        }
    }

    #[test]
    fn empty_values_produce_nothing() {
        for strategy in TileStrategy::ALL {
            assert!(tiles(strategy, 0, &[], Rect::new(0.0, 0.0, 1.0, 1.0)).is_empty());
        }
        let mut out = vec![Rect::ZERO];
        TileStrategy::Dice.tile(0, &[1.0], Rect::new(0.0, 0.0, 2.0, 2.0), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Rect::ZERO);
    }
}
