//! ASCII rendering of the grid for terminal output.

use std::fmt::Write as _;

use rail_defence_core::{CellCoord, CellSnapshot};

const OCCUPIED: char = '#';
const UNPLACEABLE: char = 'x';
const FREE: char = '.';
const MOVER: char = 'M';

/// Draws the grid with the highest row on top so that north points up.
pub(crate) fn render_grid(
    dimensions: (u32, u32),
    cells: &[CellSnapshot],
    mover: Option<CellCoord>,
) -> String {
    let (columns, rows) = dimensions;
    let mut output = String::with_capacity((columns as usize + 1) * rows as usize);

    for row in (0..rows).rev() {
        for column in 0..columns {
            let coord = CellCoord::new(column, row);
            let glyph = if mover == Some(coord) {
                MOVER
            } else {
                cells
                    .iter()
                    .find(|cell| cell.coord == coord)
                    .map_or(FREE, glyph_for)
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    let _ = write!(
        output,
        "legend: {OCCUPIED} track  {UNPLACEABLE} blocked  {FREE} free  {MOVER} mover"
    );
    output
}

fn glyph_for(cell: &CellSnapshot) -> char {
    if cell.occupied {
        OCCUPIED
    } else if !cell.placeable {
        UNPLACEABLE
    } else {
        FREE
    }
}
