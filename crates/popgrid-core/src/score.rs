//! Scoring rules: selection scores and the fixed progression tables.

/// Score thresholds per level; the target for level L is entry L-1
pub const LEVEL_TARGETS: [u32; 20] = [
    1000, 3100, 6500, 11500, 18300, 27100, 38100, 51500, 67500, 86300, 108100, 133100, 161500,
    193500, 229300, 269100, 308900, 352900, 401300, 500000,
];

/// Bonus for ending a level with few units left; entry N is the bonus for
/// N remaining units. 15 or more remaining award nothing.
pub const CLEAR_BOARD_BONUS: [u32; 15] = [
    20000, 13000, 10400, 8200, 6300, 4800, 3600, 2600, 1800, 1200, 820, 510, 300, 160, 80,
];

/// Points for bursting a group of `units` same-type units.
///
/// Quadratic base with a stepped multiplier, so one large cluster is worth
/// far more than the same cells burst as several small groups. Groups
/// smaller than two never reach scoring; the fallthrough arm covers them
/// anyway.
pub fn selection_score(units: usize) -> u32 {
    let base = (units * units) as u32;
    let multiplier = match units {
        2..=5 => 5,
        6..=8 => 10,
        9..=11 => 15,
        12..=14 => 20,
        15..=17 => 25,
        _ => 30,
    };
    base * multiplier
}

/// Clear-board bonus for `remaining` units under the given table
pub fn clear_board_bonus(remaining: usize, table: &[u32]) -> u32 {
    table.get(remaining).copied().unwrap_or(0)
}
