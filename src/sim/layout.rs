//! Board layout generation
//!
//! Pegs form a triangle that widens by one peg per row. Bins split the full
//! board width into equal slots along the bottom. Layout is a pure function
//! of the board size and config: no randomness.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bin, BinTier, Peg};

/// One entry of the payout table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub multiplier: f64,
    pub tier: BinTier,
}

impl Payout {
    pub const fn new(multiplier: f64, tier: BinTier) -> Self {
        Self { multiplier, tier }
    }
}

/// Used when the payout table is empty
const FALLBACK_PAYOUT: Payout = Payout::new(0.9, BinTier::Blue);

/// Symmetric table: rich edges, poor center
pub const DEFAULT_PAYOUTS: [Payout; 8] = [
    Payout::new(12.0, BinTier::Red),
    Payout::new(5.0, BinTier::Orange),
    Payout::new(2.0, BinTier::Green),
    Payout::new(0.9, BinTier::Blue),
    Payout::new(0.9, BinTier::Blue),
    Payout::new(2.0, BinTier::Green),
    Payout::new(5.0, BinTier::Orange),
    Payout::new(12.0, BinTier::Red),
];

/// Shape of the peg triangle and bin row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub top_row_pegs: u32,
    pub bottom_row_pegs: u32,
    pub bin_count: u32,
    /// Fraction of board height taken by the bin row
    pub bin_area_ratio: f32,
    /// Peg radius as a fraction of board width
    pub peg_radius_ratio: f32,
    /// Ball radius as a fraction of board width
    pub ball_radius_ratio: f32,
    /// Fraction of height above the first peg row
    pub top_margin_ratio: f32,
    /// Fraction of height spanned from the first to the last peg row
    pub peg_area_ratio: f32,
    pub payouts: Vec<Payout>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_row_pegs: 3,
            bottom_row_pegs: 9,
            bin_count: 8,
            bin_area_ratio: 0.05,
            peg_radius_ratio: 1.0 / 35.0,
            ball_radius_ratio: 1.0 / 45.0,
            top_margin_ratio: 0.10,
            peg_area_ratio: 0.60,
            payouts: DEFAULT_PAYOUTS.to_vec(),
        }
    }
}

impl LayoutConfig {
    /// Number of peg rows (0 if the bottom row is narrower than the top)
    pub fn rows(&self) -> u32 {
        self.bottom_row_pegs.saturating_add(1).saturating_sub(self.top_row_pegs)
    }

    /// Payout for bin `index`, reusing the last entry past the table end
    pub fn payout_for(&self, index: usize) -> Payout {
        self.payouts
            .get(index)
            .or_else(|| self.payouts.last())
            .copied()
            .unwrap_or(FALLBACK_PAYOUT)
    }
}

/// Build pegs and bins for a board, or `None` if a dimension is not positive
pub fn layout(width: f32, height: f32, config: &LayoutConfig) -> Option<(Vec<Peg>, Vec<Bin>)> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    Some((
        generate_pegs(width, height, config),
        generate_bins(width, height, config),
    ))
}

/// Peg triangle, ids dense in row-major, left-to-right order
pub fn generate_pegs(width: f32, height: f32, config: &LayoutConfig) -> Vec<Peg> {
    let rows = config.rows();
    let peg_radius = width * config.peg_radius_ratio;

    let top_margin = height * config.top_margin_ratio;
    let vertical_spacing = (height * config.peg_area_ratio) / rows.saturating_sub(1).max(1) as f32;

    // Spacing comes from the widest row and is shared by all rows
    let gaps = config.bottom_row_pegs.saturating_sub(1).max(1) as f32;
    let spacing = (width - peg_radius * 4.0) / gaps;

    let mut pegs = Vec::new();
    for row in 0..rows {
        let in_row = config.top_row_pegs + row;
        let y = top_margin + row as f32 * vertical_spacing;

        if in_row == 1 {
            // A lone apex peg is always kept, centered
            pegs.push(Peg::new(pegs.len() as u32, Vec2::new(width / 2.0, y), peg_radius));
            continue;
        }

        let start_x = (width - (in_row - 1) as f32 * spacing) / 2.0;
        for col in 0..in_row {
            let x = start_x + col as f32 * spacing;
            if x >= peg_radius && x <= width - peg_radius {
                pegs.push(Peg::new(pegs.len() as u32, Vec2::new(x, y), peg_radius));
            }
        }
    }
    pegs
}

/// Equal-width bins tiling `[0, width)` left to right
pub fn generate_bins(width: f32, height: f32, config: &LayoutConfig) -> Vec<Bin> {
    let count = config.bin_count;
    if count == 0 {
        return Vec::new();
    }

    let bin_height = height * config.bin_area_ratio;
    let y_start = height * (1.0 - config.bin_area_ratio);

    // Shared edges, so neighbors meet exactly and the last bin ends at width
    let edge = |i: u32| -> f32 {
        if i >= count {
            width
        } else {
            width * i as f32 / count as f32
        }
    };

    (0..count)
        .map(|i| {
            let payout = config.payout_for(i as usize);
            Bin {
                id: i,
                x_start: edge(i),
                x_end: edge(i + 1),
                y_start,
                height: bin_height,
                label: format!("x{:?}", payout.multiplier),
                multiplier: payout.multiplier,
                tier: payout.tier,
            }
        })
        .collect()
}
