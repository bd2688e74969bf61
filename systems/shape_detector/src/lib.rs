//! Enumerates line / square / intersection shape candidates inside a
//! matched component. Pure geometry: the detector only sees a set of
//! cells, never colors, bombs, or covers.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

use std::collections::{HashMap, HashSet};

use match3_core::{BombType, MatchShape, Position};

/// Which geometric rule produced a candidate. Distinct from
/// `MatchShape` only in that a line candidate still carries its
/// orientation, needed to pick `Horizontal` vs `Vertical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A 4-in-a-row.
    Line4Horizontal,
    /// A 4-in-a-column.
    Line4Vertical,
    /// A 5-in-a-line (orientation irrelevant; always spawns Color).
    Line5,
    /// A 2x2 block.
    Square,
    /// An intersection crossing at the endpoint of at least one run.
    TL,
    /// An intersection interior to both crossing runs.
    Plus,
}

impl ShapeKind {
    /// The `MatchShape` this candidate becomes once selected.
    pub fn match_shape(self) -> MatchShape {
        match self {
            ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical => MatchShape::Line4,
            ShapeKind::Line5 => MatchShape::Line5,
            ShapeKind::Square => MatchShape::Square,
            ShapeKind::TL => MatchShape::TL,
            ShapeKind::Plus => MatchShape::Plus,
        }
    }

    /// The bomb type this candidate spawns once selected.
    pub fn spawn_bomb_type(self) -> BombType {
        match self {
            ShapeKind::Line4Horizontal => BombType::Horizontal,
            ShapeKind::Line4Vertical => BombType::Vertical,
            ShapeKind::Line5 => BombType::Color,
            ShapeKind::Square => BombType::Ufo,
            ShapeKind::TL => BombType::Square5x5,
            ShapeKind::Plus => BombType::Ufo,
        }
    }

    /// The preference weight from spec (Rainbow 130 > Plus/T/L 60 >
    /// Line4 40 > Square 20).
    pub fn weight(self) -> u32 {
        match self {
            ShapeKind::Line5 => 130,
            ShapeKind::TL | ShapeKind::Plus => 60,
            ShapeKind::Line4Horizontal | ShapeKind::Line4Vertical => 40,
            ShapeKind::Square => 20,
        }
    }
}

/// A proposed shape inside a component, with its weight already
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedShape {
    /// Cells this candidate covers.
    pub cells: Vec<Position>,
    /// Geometric rule that produced it.
    pub kind: ShapeKind,
    /// Preference weight for partitioning.
    pub weight: u32,
}

/// A maximal axis-aligned run of length >= 3.
#[derive(Debug, Clone)]
struct Run {
    cells: Vec<Position>,
    horizontal: bool,
}

/// Detects every shape candidate in `cells`. Candidates may overlap;
/// the bomb generator resolves overlaps via weighted partitioning.
pub fn detect_shapes(cells: &HashSet<Position>) -> Vec<DetectedShape> {
    let horizontal_runs = maximal_runs(cells, true);
    let vertical_runs = maximal_runs(cells, false);

    let mut shapes = Vec::new();
    shapes.extend(line_candidates(&horizontal_runs, true));
    shapes.extend(line_candidates(&vertical_runs, false));
    shapes.extend(square_candidates(cells));
    shapes.extend(intersection_candidates(&horizontal_runs, &vertical_runs));
    shapes
}

/// True if `cells` contains at least one axis-aligned run of length
/// `>= 3`; components failing this produce no match at all.
pub fn has_any_run(cells: &HashSet<Position>) -> bool {
    !maximal_runs(cells, true).is_empty() || !maximal_runs(cells, false).is_empty()
}

fn maximal_runs(cells: &HashSet<Position>, horizontal: bool) -> Vec<Run> {
    let mut lines: HashMap<i32, Vec<i32>> = HashMap::new();
    for pos in cells {
        let (line, ordinate) = if horizontal {
            (pos.y, pos.x)
        } else {
            (pos.x, pos.y)
        };
        lines.entry(line).or_default().push(ordinate);
    }

    let mut runs = Vec::new();
    for (line, mut ordinates) in lines {
        ordinates.sort_unstable();
        ordinates.dedup();
        let mut i = 0;
        while i < ordinates.len() {
            let mut j = i;
            while j + 1 < ordinates.len() && ordinates[j + 1] == ordinates[j] + 1 {
                j += 1;
            }
            let len = j - i + 1;
            if len >= 3 {
                let run_cells = ordinates[i..=j]
                    .iter()
                    .map(|&ordinate| {
                        if horizontal {
                            Position::new(ordinate, line)
                        } else {
                            Position::new(line, ordinate)
                        }
                    })
                    .collect();
                runs.push(Run {
                    cells: run_cells,
                    horizontal,
                });
            }
            i = j + 1;
        }
    }
    runs
}

fn line_candidates(runs: &[Run], horizontal: bool) -> Vec<DetectedShape> {
    let mut out = Vec::new();
    for run in runs {
        let len = run.cells.len();
        if len == 4 {
            let kind = if horizontal {
                ShapeKind::Line4Horizontal
            } else {
                ShapeKind::Line4Vertical
            };
            out.push(DetectedShape {
                cells: run.cells.clone(),
                kind,
                weight: kind.weight(),
            });
        } else if len >= 5 {
            for start in 0..=(len - 5) {
                out.push(DetectedShape {
                    cells: run.cells[start..start + 5].to_vec(),
                    kind: ShapeKind::Line5,
                    weight: ShapeKind::Line5.weight(),
                });
            }
        }
    }
    out
}

fn square_candidates(cells: &HashSet<Position>) -> Vec<DetectedShape> {
    let mut out = Vec::new();
    for &pos in cells {
        let block = [
            pos,
            Position::new(pos.x + 1, pos.y),
            Position::new(pos.x, pos.y + 1),
            Position::new(pos.x + 1, pos.y + 1),
        ];
        if block.iter().all(|c| cells.contains(c)) {
            out.push(DetectedShape {
                cells: block.to_vec(),
                kind: ShapeKind::Square,
                weight: ShapeKind::Square.weight(),
            });
        }
    }
    out
}

fn intersection_candidates(horizontal_runs: &[Run], vertical_runs: &[Run]) -> Vec<DetectedShape> {
    let mut out = Vec::new();
    for h in horizontal_runs {
        for v in vertical_runs {
            let Some(&crossing) = h.cells.iter().find(|c| v.cells.contains(c)) else {
                continue;
            };
            let h_interior = is_interior(&h.cells, crossing);
            let v_interior = is_interior(&v.cells, crossing);
            let kind = if h_interior && v_interior {
                ShapeKind::Plus
            } else {
                ShapeKind::TL
            };
            let mut cells: Vec<Position> = h.cells.clone();
            for &c in &v.cells {
                if !cells.contains(&c) {
                    cells.push(c);
                }
            }
            out.push(DetectedShape {
                cells,
                kind,
                weight: kind.weight(),
            });
        }
    }
    out
}

fn is_interior(run: &[Position], cell: Position) -> bool {
    run.first() != Some(&cell) && run.last() != Some(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cells: &[(i32, i32)]) -> HashSet<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn corner_l_is_an_endpoint_intersection() {
        let cells = set(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]);
        let shapes = detect_shapes(&cells);
        let intersection = shapes
            .iter()
            .find(|s| s.kind == ShapeKind::TL)
            .expect("expected a T/L candidate");
        assert_eq!(intersection.cells.len(), 5);
    }

    #[test]
    fn pure_four_line_detected_once() {
        let cells = set(&[(0, 1), (1, 1), (2, 1), (3, 1)]);
        let shapes = detect_shapes(&cells);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].kind, ShapeKind::Line4Horizontal);
        assert_eq!(shapes[0].cells.len(), 4);
    }

    #[test]
    fn t_shape_is_endpoint_intersection() {
        let cells = set(&[(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)]);
        let shapes = detect_shapes(&cells);
        let intersection = shapes
            .iter()
            .find(|s| s.kind == ShapeKind::TL)
            .expect("expected a T/L candidate");
        assert_eq!(intersection.cells.len(), 5);
    }

    #[test]
    fn plus_shape_is_interior_intersection() {
        let cells = set(&[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]);
        let shapes = detect_shapes(&cells);
        let intersection = shapes
            .iter()
            .find(|s| s.kind == ShapeKind::Plus)
            .expect("expected a Plus candidate");
        assert_eq!(intersection.cells.len(), 5);
    }

    #[test]
    fn long_run_yields_sliding_line5_windows() {
        let cells = set(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
        let shapes = detect_shapes(&cells);
        let windows: Vec<_> = shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Line5)
            .collect();
        assert_eq!(windows.len(), 2);
    }
}
