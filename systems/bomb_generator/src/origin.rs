use match3_core::{GameRng, Position};

/// Picks the bomb origin for a chosen shape's cells, per the rule:
/// exactly one focus inside -> that cell; multiple foci inside ->
/// uniform random among them; otherwise sort by (y asc, x asc) and pick
/// uniform random, falling back to the first cell when no RNG is
/// available.
pub(crate) fn pick_origin(
    cells: &[Position],
    foci: &[Position],
    rng: Option<&mut GameRng>,
) -> Position {
    let foci_in_shape: Vec<Position> = cells
        .iter()
        .copied()
        .filter(|c| foci.contains(c))
        .collect();

    if foci_in_shape.len() == 1 {
        return foci_in_shape[0];
    }
    if foci_in_shape.len() > 1 {
        return match rng {
            Some(rng) => {
                let idx = rng.pick_index(foci_in_shape.len()).unwrap_or(0);
                foci_in_shape[idx]
            }
            None => foci_in_shape[0],
        };
    }

    let mut sorted = cells.to_vec();
    sorted.sort_unstable_by_key(|p| (p.y, p.x));
    match rng {
        Some(rng) => {
            let idx = rng.pick_index(sorted.len()).unwrap_or(0);
            sorted[idx]
        }
        None => sorted[0],
    }
}
