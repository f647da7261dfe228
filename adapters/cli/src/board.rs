//! Coordinate parsing and seeded obstacle generation.

use anyhow::{bail, Context, Result};
use pursuit_core::CellCoord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parses an `X,Y` pair into a cell coordinate.
pub(crate) fn parse_cell(value: &str) -> Result<CellCoord> {
    let Some((column, row)) = value.split_once(',') else {
        bail!("expected a cell as `X,Y`, got `{value}`");
    };
    let column = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column in `{value}`"))?;
    let row = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row in `{value}`"))?;
    Ok(CellCoord::new(column, row))
}

/// Scatters walls over the grid, each cell independently with probability `density`.
///
/// Cells listed in `keep_clear` never receive a wall. The same seed always
/// yields the same layout.
pub(crate) fn random_walls(
    columns: u32,
    rows: u32,
    density: f64,
    seed: u64,
    keep_clear: &[CellCoord],
) -> Result<Vec<CellCoord>> {
    if !(0.0..1.0).contains(&density) {
        bail!("wall density must be in [0, 1), got {density}");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut walls = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if rng.gen_bool(density) && !keep_clear.contains(&cell) {
                walls.push(cell);
            }
        }
    }
    Ok(walls)
}
