//! Board geometry
//!
//! Pure mapping from (row count, risk, viewport) to peg, bucket and
//! separator placement. No state, no randomness; recomputed only between
//! rounds when rows, risk or the viewport change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::outcome::{RiskLevel, multiplier_table};
use crate::consts::*;

/// A single peg in the triangular field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub row: usize,
    pub col: usize,
}

/// A terminal scoring zone below the last peg row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub multiplier: f32,
    pub index: usize,
}

impl Bucket {
    /// Horizontal center of the zone
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

/// A thin vertical wall at a bucket boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Static board geometry shared read-only by the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f32,
    pub height: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// Top of the bucket band; crossing it ends the peg phase
    pub bucket_top: f32,
    /// Bucket interior floor the ball settles on
    pub floor_y: f32,
    pub pegs: Vec<Peg>,
    pub buckets: Vec<Bucket>,
    pub separators: Vec<Separator>,
}

impl Geometry {
    /// Placeholder geometry for a viewport that cannot hold the board
    pub fn degenerate(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            spacing_x: 0.0,
            spacing_y: 0.0,
            bucket_top: 0.0,
            floor_y: 0.0,
            pegs: Vec::new(),
            buckets: Vec::new(),
            separators: Vec::new(),
        }
    }

    /// True when there is nothing to simulate against
    pub fn is_degenerate(&self) -> bool {
        self.pegs.is_empty() || self.buckets.is_empty()
    }

    /// Y coordinate of a peg row's centers
    pub fn row_y(&self, row: usize) -> f32 {
        PADDING_TOP + row as f32 * self.spacing_y
    }

    /// Bucket whose zone strictly contains `x`
    pub fn bucket_index_at(&self, x: f32) -> Option<usize> {
        self.buckets
            .iter()
            .position(|b| x >= b.x && x < b.x + b.w)
            .or_else(|| {
                // Right edge of the last bucket belongs to it
                self.buckets.last().and_then(|b| {
                    (x == b.x + b.w).then_some(b.index)
                })
            })
    }

    /// Nearest bucket column to `x`, clamped into range. A ball pinned
    /// against an outer wall resolves to the adjacent outer bucket.
    pub fn bucket_index_nearest(&self, x: f32) -> usize {
        let count = self.buckets.len();
        if count == 0 {
            return 0;
        }
        let start = self.buckets[0].x;
        let idx = ((x - start) / self.spacing_x).floor();
        (idx.max(0.0) as usize).min(count - 1)
    }
}

/// Compute peg, bucket and separator placement for the given board.
///
/// Row `r` holds `r + 3` pegs centered on the board; the last row's
/// `rows + 2` pegs leave `rows + 1` gaps, one per bucket. Returns a
/// degenerate geometry when the viewport cannot hold the board.
pub fn compute_layout(rows: usize, risk: RiskLevel, viewport: (f32, f32)) -> Geometry {
    let (width, height) = viewport;
    let available_height = height - PADDING_TOP - PADDING_BOTTOM;
    if width <= 0.0 || available_height <= 0.0 {
        return Geometry::degenerate(width, height);
    }

    let multipliers = multiplier_table(rows, risk);
    let spacing_y = available_height / rows as f32;
    let spacing_x = width / (rows + 4) as f32;

    let mut pegs = Vec::new();
    for r in 0..rows {
        let pegs_in_row = r + 3;
        let row_width = (pegs_in_row - 1) as f32 * spacing_x;
        let start_x = (width - row_width) / 2.0;
        let y = PADDING_TOP + r as f32 * spacing_y;
        for c in 0..pegs_in_row {
            pegs.push(Peg {
                pos: Vec2::new(start_x + c as f32 * spacing_x, y),
                row: r,
                col: c,
            });
        }
    }

    let bucket_count = rows + 1;
    let total_bucket_width = bucket_count as f32 * spacing_x;
    let buckets_start_x = (width - total_bucket_width) / 2.0;
    let bucket_top = PADDING_TOP + rows as f32 * spacing_y + BUCKET_DROP_GAP;

    let mut buckets = Vec::with_capacity(bucket_count);
    let mut separators = Vec::with_capacity(bucket_count + 1);
    for i in 0..bucket_count {
        let bx = buckets_start_x + i as f32 * spacing_x;
        buckets.push(Bucket {
            x: bx,
            y: bucket_top,
            w: spacing_x,
            h: BUCKET_HEIGHT,
            multiplier: multipliers[i],
            index: i,
        });
        separators.push(Separator {
            x: bx,
            y: bucket_top - SEPARATOR_LIP,
            w: SEPARATOR_WIDTH,
            h: BUCKET_HEIGHT + SEPARATOR_LIP,
        });
    }
    // Outer wall closing the last bucket
    separators.push(Separator {
        x: buckets_start_x + bucket_count as f32 * spacing_x,
        y: bucket_top - SEPARATOR_LIP,
        w: SEPARATOR_WIDTH,
        h: BUCKET_HEIGHT + SEPARATOR_LIP,
    });

    Geometry {
        width,
        height,
        spacing_x,
        spacing_y,
        bucket_top,
        floor_y: bucket_top + FLOOR_DEPTH,
        pegs,
        buckets,
        separators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    #[test]
    fn test_peg_counts_per_row() {
        for rows in MIN_ROWS..=MAX_ROWS {
            let geo = compute_layout(rows, RiskLevel::Medium, VIEWPORT);
            let expected: usize = (0..rows).map(|r| r + 3).sum();
            assert_eq!(geo.pegs.len(), expected);
            for r in 0..rows {
                let in_row = geo.pegs.iter().filter(|p| p.row == r).count();
                assert_eq!(in_row, r + 3);
            }
        }
    }

    #[test]
    fn test_rows_are_centered() {
        let geo = compute_layout(8, RiskLevel::Low, VIEWPORT);
        for r in 0..8 {
            let row: Vec<_> = geo.pegs.iter().filter(|p| p.row == r).collect();
            let left = row.first().unwrap().pos.x;
            let right = row.last().unwrap().pos.x;
            assert!(((left + right) / 2.0 - 400.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_bucket_count_and_annotation() {
        for rows in MIN_ROWS..=MAX_ROWS {
            for risk in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
                let geo = compute_layout(rows, risk, VIEWPORT);
                let table = multiplier_table(rows, risk);
                assert_eq!(geo.buckets.len(), rows + 1);
                for (i, bucket) in geo.buckets.iter().enumerate() {
                    assert_eq!(bucket.index, i);
                    assert_eq!(bucket.multiplier, table[i]);
                    assert!((bucket.w - geo.spacing_x).abs() < 0.001);
                }
            }
        }
    }

    #[test]
    fn test_separators_fence_every_boundary() {
        let geo = compute_layout(10, RiskLevel::High, VIEWPORT);
        // One per bucket left edge plus the closing outer wall
        assert_eq!(geo.separators.len(), geo.buckets.len() + 1);
        for sep in &geo.separators {
            assert!((geo.bucket_top - sep.y - SEPARATOR_LIP).abs() < 0.001);
            assert_eq!(sep.w, SEPARATOR_WIDTH);
        }
        // Separators sit exactly on bucket edges
        for bucket in &geo.buckets {
            assert!(geo.separators.iter().any(|s| (s.x - bucket.x).abs() < 0.001));
        }
        let last = geo.buckets.last().unwrap();
        assert!(
            geo.separators
                .iter()
                .any(|s| (s.x - (last.x + last.w)).abs() < 0.001)
        );
    }

    #[test]
    fn test_floor_sits_inside_separator_span() {
        // A resting ball must still be fenced by the separators
        let geo = compute_layout(9, RiskLevel::Medium, VIEWPORT);
        let sep_bottom = geo.separators[0].y + geo.separators[0].h;
        assert!(geo.floor_y < sep_bottom);
    }

    #[test]
    fn test_degenerate_viewport() {
        assert!(compute_layout(8, RiskLevel::Low, (0.0, 600.0)).is_degenerate());
        assert!(compute_layout(8, RiskLevel::Low, (-5.0, 600.0)).is_degenerate());
        assert!(compute_layout(8, RiskLevel::Low, (800.0, 100.0)).is_degenerate());
    }

    #[test]
    fn test_bucket_resolution() {
        let geo = compute_layout(8, RiskLevel::Low, VIEWPORT);
        for bucket in &geo.buckets {
            assert_eq!(geo.bucket_index_at(bucket.center_x()), Some(bucket.index));
            assert_eq!(geo.bucket_index_nearest(bucket.center_x()), bucket.index);
        }
        // Outside the bucket span resolves to the nearest outer column
        assert_eq!(geo.bucket_index_at(5.0), None);
        assert_eq!(geo.bucket_index_nearest(5.0), 0);
        assert_eq!(geo.bucket_index_nearest(795.0), geo.buckets.len() - 1);
    }
}
