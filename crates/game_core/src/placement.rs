use host_integration::RandomSource;
use shared::domain::{Position, Size};

pub const FLOW_GAP: u32 = 8;

pub fn flow_layout(footprints: &[Size], container: Size) -> Vec<Position> {
    let mut positions = Vec::with_capacity(footprints.len());
    let mut cursor_x = 0u32;
    let mut row_top = 0u32;
    let mut row_height = 0u32;

    for footprint in footprints {
        let fits = cursor_x.saturating_add(footprint.width) <= container.width;
        if cursor_x > 0 && !fits {
            row_top = row_top.saturating_add(row_height).saturating_add(FLOW_GAP);
            cursor_x = 0;
            row_height = 0;
        }

        positions.push(Position::new(cursor_x, row_top));
        cursor_x = cursor_x
            .saturating_add(footprint.width)
            .saturating_add(FLOW_GAP);
        row_height = row_height.max(footprint.height);
    }

    positions
}

/// Uniform position keeping the footprint inside the container. Axes where the token is larger
/// than the container pin to 0.
pub fn random_position(
    rng: &mut dyn RandomSource,
    container: Size,
    footprint: Size,
) -> Position {
    let max_x = container.width.saturating_sub(footprint.width);
    let max_y = container.height.saturating_sub(footprint.height);
    Position::new(rng.sample_coordinate(max_x), rng.sample_coordinate(max_y))
}

#[cfg(test)]
#[path = "tests/placement_tests.rs"]
mod tests;
