//! Chooses an optimal, non-overlapping subset of shape candidates
//! inside a matched component (weight-maximising), absorbs leftover
//! scraps into the winning shapes, and assigns each winning shape a
//! bomb origin.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod absorb;
mod origin;
mod partition;

use std::collections::HashSet;

use match3_core::{GameRng, MatchGroup, MatchShape, Position, TileType};
use match3_shape_detector::{detect_shapes, has_any_run, DetectedShape};

use absorb::{absorb_scraps, ChosenShape};
use partition::{exact_max_weight_subset, greedy_subset, Disjointness};

const EXACT_SOLVE_CAP: usize = 25;
const LOCAL_SEARCH_PASSES: usize = 10;

/// Generates the final match groups for one connected component.
///
/// `component` is every cell in the component; `kind` is the resolved
/// color assigned to the resulting groups; `foci` are cells touched by
/// the triggering move, used for affinity tie-breaks and bomb-origin
/// selection.
pub fn generate_groups(
    component: &HashSet<Position>,
    kind: TileType,
    foci: &[Position],
    mut rng: Option<&mut GameRng>,
) -> Vec<MatchGroup> {
    if component.len() < 3 {
        return Vec::new();
    }

    let shapes = detect_shapes(component);
    if shapes.is_empty() {
        if has_any_run(component) {
            return vec![simple3_group(kind, component.iter().copied().collect())];
        }
        return Vec::new();
    }

    let universe: Vec<Position> = component.iter().copied().collect();
    let disjointness = Disjointness::build(&universe, &shapes);
    let weights: Vec<u32> = shapes.iter().map(|s| s.weight).collect();

    let rainbow: Vec<usize> = indices_with(&shapes, |s| s.weight >= 100);
    let tnt_rocket: Vec<usize> = indices_with(&shapes, |s| s.weight == 40 || s.weight == 60);
    let ufo: Vec<usize> = indices_with(&shapes, |s| s.weight == 20);

    let chosen_rainbow = solve_rainbow_layer(&rainbow, &shapes, &weights, foci, &disjointness);

    let tnt_survivors: Vec<usize> = tnt_rocket
        .into_iter()
        .filter(|&i| disjointness.disjoint_from_all(i, &chosen_rainbow))
        .collect();
    let chosen_tnt = solve_tnt_rocket_layer(&tnt_survivors, &shapes, &weights, foci, &disjointness);

    let already: Vec<usize> = chosen_rainbow
        .iter()
        .chain(chosen_tnt.iter())
        .copied()
        .collect();
    let ufo_survivors: Vec<usize> = ufo
        .into_iter()
        .filter(|&i| disjointness.disjoint_from_all(i, &already))
        .collect();
    let chosen_ufo = solve_ufo_layer(&ufo_survivors, &shapes, foci, &disjointness);

    let mut chosen: Vec<usize> = chosen_rainbow
        .into_iter()
        .chain(chosen_tnt)
        .chain(chosen_ufo)
        .collect();

    refine_local_search(&mut chosen, &shapes, &weights, foci, &disjointness);

    let chosen_shapes: Vec<ChosenShape> = chosen
        .iter()
        .map(|&i| ChosenShape {
            kind: shapes[i].kind,
            cells: shapes[i].cells.clone(),
            weight: shapes[i].weight,
        })
        .collect();

    let (expanded_positions, unclaimed) = absorb_scraps(&chosen_shapes, component);

    let mut groups: Vec<MatchGroup> = chosen_shapes
        .iter()
        .zip(expanded_positions)
        .map(|(shape, positions)| {
            let origin = origin::pick_origin(&positions, foci, rng.as_deref_mut());
            MatchGroup {
                kind,
                positions,
                shape: shape.kind.match_shape(),
                spawn_bomb_type: shape.kind.spawn_bomb_type(),
                bomb_origin: Some(origin),
            }
        })
        .collect();

    if !unclaimed.is_empty() {
        groups.push(simple3_group(kind, unclaimed));
    }

    groups
}

fn indices_with(shapes: &[DetectedShape], predicate: impl Fn(&DetectedShape) -> bool) -> Vec<usize> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, s)| predicate(s))
        .map(|(i, _)| i)
        .collect()
}

fn affinity(shape: &DetectedShape, foci: &[Position]) -> bool {
    shape.cells.iter().any(|c| foci.contains(c))
}

fn sort_by_tiebreak(indices: &mut [usize], shapes: &[DetectedShape], foci: &[Position]) {
    indices.sort_by(|&a, &b| {
        let sa = &shapes[a];
        let sb = &shapes[b];
        sb.weight
            .cmp(&sa.weight)
            .then_with(|| affinity(sb, foci).cmp(&affinity(sa, foci)))
            .then_with(|| sb.cells.len().cmp(&sa.cells.len()))
    });
}

fn solve_rainbow_layer(
    rainbow: &[usize],
    shapes: &[DetectedShape],
    weights: &[u32],
    foci: &[Position],
    disjointness: &Disjointness,
) -> Vec<usize> {
    let mut ordered = rainbow.to_vec();
    sort_by_tiebreak(&mut ordered, shapes, foci);
    if ordered.len() <= EXACT_SOLVE_CAP {
        exact_max_weight_subset(&ordered, weights, disjointness)
    } else {
        ordered.sort_by(|&a, &b| shapes[b].cells.len().cmp(&shapes[a].cells.len()));
        greedy_subset(&ordered, disjointness)
    }
}

fn solve_tnt_rocket_layer(
    survivors: &[usize],
    shapes: &[DetectedShape],
    weights: &[u32],
    foci: &[Position],
    disjointness: &Disjointness,
) -> Vec<usize> {
    let mut ordered = survivors.to_vec();
    sort_by_tiebreak(&mut ordered, shapes, foci);
    if ordered.len() <= EXACT_SOLVE_CAP {
        exact_max_weight_subset(&ordered, weights, disjointness)
    } else {
        ordered.sort_by(|&a, &b| {
            shapes[b]
                .weight
                .cmp(&shapes[a].weight)
                .then_with(|| shapes[a].cells.len().cmp(&shapes[b].cells.len()))
        });
        greedy_subset(&ordered, disjointness)
    }
}

fn solve_ufo_layer(
    survivors: &[usize],
    shapes: &[DetectedShape],
    foci: &[Position],
    disjointness: &Disjointness,
) -> Vec<usize> {
    let mut ordered = survivors.to_vec();
    sort_by_tiebreak(&mut ordered, shapes, foci);
    greedy_subset(&ordered, disjointness)
}

fn refine_local_search(
    chosen: &mut Vec<usize>,
    shapes: &[DetectedShape],
    weights: &[u32],
    foci: &[Position],
    disjointness: &Disjointness,
) {
    for _ in 0..LOCAL_SEARCH_PASSES {
        let mut improved = false;
        for i in 0..chosen.len() {
            let mut without: Vec<usize> = chosen
                .iter()
                .copied()
                .enumerate()
                .filter(|&(idx, _)| idx != i)
                .map(|(_, v)| v)
                .collect();

            let mut candidates: Vec<usize> = (0..shapes.len())
                .filter(|idx| !without.contains(idx))
                .collect();
            sort_by_tiebreak(&mut candidates, shapes, foci);
            for candidate in candidates {
                if disjointness.disjoint_from_all(candidate, &without) {
                    without.push(candidate);
                }
            }

            let old_weight: u64 = chosen.iter().map(|&idx| u64::from(weights[idx])).sum();
            let new_weight: u64 = without.iter().map(|&idx| u64::from(weights[idx])).sum();
            if new_weight > old_weight {
                *chosen = without;
                improved = true;
                break;
            }
        }
        if !improved {
            break;
        }
    }
}

fn simple3_group(kind: TileType, mut positions: Vec<Position>) -> MatchGroup {
    positions.sort_unstable_by_key(|p| (p.y, p.x));
    MatchGroup {
        kind,
        positions,
        shape: MatchShape::Simple3,
        spawn_bomb_type: match3_core::BombType::None,
        bomb_origin: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cells: &[(i32, i32)]) -> HashSet<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn corner_l_is_a_single_square5x5_group() {
        let component = set(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]);
        let groups = generate_groups(&component, TileType::Red, &[], None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shape, MatchShape::TL);
        assert_eq!(groups[0].spawn_bomb_type, match3_core::BombType::Square5x5);
        assert_eq!(groups[0].positions.len(), component.len());
    }

    #[test]
    fn pure_four_line_spawns_one_bomb_with_no_absorption() {
        let component = set(&[(0, 1), (1, 1), (2, 1), (3, 1)]);
        let groups = generate_groups(&component, TileType::Blue, &[], None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].positions.len(), 4);
        assert_eq!(groups[0].shape, MatchShape::Line4);
    }

    #[test]
    fn square_absorbs_orthogonal_chain() {
        let component = set(&[
            (2, 1),
            (3, 1),
            (2, 2),
            (3, 2),
            (1, 1),
            (1, 0),
            (0, 0),
        ]);
        let groups = generate_groups(&component, TileType::Green, &[], None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shape, MatchShape::Square);
        assert_eq!(groups[0].positions.len(), 7);
    }

    #[test]
    fn outputs_are_disjoint_and_within_component() {
        let component = set(&[
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 0),
            (4, 0),
            (1, 1),
            (1, 2),
        ]);
        let groups = generate_groups(&component, TileType::Yellow, &[], None);
        let mut seen = HashSet::new();
        for group in &groups {
            for pos in &group.positions {
                assert!(component.contains(pos));
                assert!(seen.insert(*pos), "duplicate position across groups");
            }
        }
    }

    #[test]
    fn too_small_component_yields_nothing() {
        let component = set(&[(0, 0), (1, 0)]);
        assert!(generate_groups(&component, TileType::Red, &[], None).is_empty());
    }
}
