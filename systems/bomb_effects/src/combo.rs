use match3_core::{BombType, TileType};

/// The effect produced when a swap combines two bomb-charged tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboEffect {
    /// Union of a horizontal and vertical line through both origins.
    Cross,
    /// The non-Rainbow bomb's shape applied once per tile of the
    /// Rainbow's chosen color.
    ColorBlast(TileType),
    /// Every tile on the board is destroyed.
    ClearAll,
}

/// Resolves the composite effect of swapping two bomb-charged tiles
/// together, per the swap-triggered combo rule: line+line crosses,
/// bomb+Rainbow repeats that bomb per tile of the other's color,
/// Rainbow+Rainbow clears everything.
pub fn resolve_combo(a: BombType, b: BombType, other_color: TileType) -> ComboEffect {
    match (a, b) {
        (BombType::Color, BombType::Color) => ComboEffect::ClearAll,
        (BombType::Color, other) | (other, BombType::Color) if other != BombType::Color => {
            ComboEffect::ColorBlast(other_color)
        }
        _ => ComboEffect::Cross,
    }
}
