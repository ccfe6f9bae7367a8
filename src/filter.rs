// Cleans up a hand-scribbled object map.
// Visual expectation: stray single dots left by an imprecise brush disappear,
// and pin-holes inside a filled region close up.

use log::debug;

use crate::types::ObjectMap;

/// Neighbourhood thresholds for [`filter_object_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// A set cell with fewer set neighbours (of 8) than this is cleared.
    pub min_neighbors: u8,
    /// An empty cell with at least this many set neighbours is filled.
    /// `None` turns hole filling off.
    pub fill_neighbors: Option<u8>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { min_neighbors: 2, fill_neighbors: Some(7) }
    }
}

/// What one filter pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub removed: usize,
    pub filled: usize,
}

impl FilterStats {
    pub fn changed(&self) -> bool {
        self.removed + self.filled > 0
    }
}

/// Count set cells among the 8 neighbours of (x,y); cells past the edge count as empty.
fn set_neighbors(snapshot: &ObjectMap, x: u32, y: u32) -> u8 {
    let mut n = 0u8;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 {
                continue;
            }
            // get() is None past the right/bottom edge
            if snapshot.get(nx as u32, ny as u32).is_some_and(|c| c > 0) {
                n += 1;
            }
        }
    }
    n
}

/// One in-place filter pass over `map`.
///
/// Decisions are made against a snapshot of the input, so the result does not
/// depend on scan order. Surviving cells keep their value; filled cells get 1.
/// Running it again may shrink thin regions further.
pub fn filter_object_map(map: &mut ObjectMap, cfg: &FilterConfig) -> FilterStats {
    let mut stats = FilterStats::default();
    if map.cells().is_empty() {
        return stats;
    }

    // Scratch copy of the input (read-only during the pass)
    let snapshot = map.clone();

    for y in 0..snapshot.height() {
        for x in 0..snapshot.width() {
            let Some(cell) = snapshot.get(x, y) else {
                continue;
            };
            let n = set_neighbors(&snapshot, x, y);

            if cell > 0 {
                if n < cfg.min_neighbors {
                    map.set(x, y, 0);
                    stats.removed += 1;
                }
            } else if cfg.fill_neighbors.is_some_and(|fill| n >= fill) {
                map.set(x, y, 1);
                stats.filled += 1;
            }
        }
    }

    debug!(
        "filter: {}x{} map, removed {}, filled {}",
        map.width(), map.height(), stats.removed, stats.filled
    );
    stats
}
