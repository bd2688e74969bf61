use std::collections::{HashMap, HashSet};

use match3_core::Position;
use match3_shape_detector::ShapeKind;

pub(crate) struct ChosenShape {
    pub(crate) kind: ShapeKind,
    pub(crate) cells: Vec<Position>,
    pub(crate) weight: u32,
}

/// Absorbs component scraps into the chosen shapes per the rules in
/// §4.6.3: Simple3/Line4/Line5 never absorb; Square absorbs
/// transitively through orthogonal adjacency; T/L/Plus absorb only
/// collinear, contiguous extensions of their crossing runs. Returns the
/// final cell list per chosen shape (same order as `chosen`) plus any
/// cell left unclaimed.
pub(crate) fn absorb_scraps(
    chosen: &[ChosenShape],
    component: &HashSet<Position>,
) -> (Vec<Vec<Position>>, Vec<Position>) {
    let mut claimed: HashMap<Position, usize> = HashMap::new();
    let mut accumulated: Vec<HashSet<Position>> = chosen
        .iter()
        .map(|shape| shape.cells.iter().copied().collect())
        .collect();

    for (idx, shape) in chosen.iter().enumerate() {
        for &cell in &shape.cells {
            let _ = claimed.entry(cell).or_insert(idx);
        }
    }

    let mut order: Vec<usize> = (0..chosen.len()).collect();
    order.sort_by(|&a, &b| chosen[b].weight.cmp(&chosen[a].weight));

    for &idx in &order {
        match chosen[idx].kind {
            ShapeKind::Square => absorb_orthogonal(idx, component, &mut claimed, &mut accumulated),
            ShapeKind::TL | ShapeKind::Plus => {
                absorb_collinear(idx, component, &mut claimed, &mut accumulated)
            }
            ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical | ShapeKind::Line5 => {}
        }
    }

    let mut unclaimed = Vec::new();
    for &cell in component {
        if !claimed.contains_key(&cell) {
            unclaimed.push(cell);
        }
    }
    unclaimed.sort_unstable_by_key(|p| (p.y, p.x));

    let positions = accumulated
        .into_iter()
        .map(|set| {
            let mut cells: Vec<Position> = set.into_iter().collect();
            cells.sort_unstable_by_key(|p| (p.y, p.x));
            cells
        })
        .collect();
    (positions, unclaimed)
}

fn absorb_orthogonal(
    idx: usize,
    component: &HashSet<Position>,
    claimed: &mut HashMap<Position, usize>,
    accumulated: &mut [HashSet<Position>],
) {
    loop {
        let frontier: Vec<Position> = accumulated[idx].iter().copied().collect();
        let mut grew = false;
        for cell in frontier {
            for neighbor in orthogonal_neighbors(cell) {
                if component.contains(&neighbor) && !claimed.contains_key(&neighbor) {
                    let _ = claimed.insert(neighbor, idx);
                    let _ = accumulated[idx].insert(neighbor);
                    grew = true;
                }
            }
        }
        if !grew {
            break;
        }
    }
}

fn absorb_collinear(
    idx: usize,
    component: &HashSet<Position>,
    claimed: &mut HashMap<Position, usize>,
    accumulated: &mut [HashSet<Position>],
) {
    let row = mode_value(accumulated[idx].iter().map(|p| p.y));
    let col = mode_value(accumulated[idx].iter().map(|p| p.x));

    loop {
        let frontier: Vec<Position> = accumulated[idx].iter().copied().collect();
        let mut grew = false;
        for cell in frontier {
            for neighbor in orthogonal_neighbors(cell) {
                let collinear = Some(neighbor.y) == row || Some(neighbor.x) == col;
                if collinear && component.contains(&neighbor) && !claimed.contains_key(&neighbor) {
                    let _ = claimed.insert(neighbor, idx);
                    let _ = accumulated[idx].insert(neighbor);
                    grew = true;
                }
            }
        }
        if !grew {
            break;
        }
    }
}

fn orthogonal_neighbors(pos: Position) -> [Position; 4] {
    [
        Position::new(pos.x + 1, pos.y),
        Position::new(pos.x - 1, pos.y),
        Position::new(pos.x, pos.y + 1),
        Position::new(pos.x, pos.y - 1),
    ]
}

fn mode_value(values: impl Iterator<Item = i32>) -> Option<i32> {
    let mut counts: HashMap<i32, u32> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .map(|(value, _)| value)
}
