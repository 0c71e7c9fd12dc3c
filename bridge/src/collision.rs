//! Metatile grid → passability and minimap codes.
//!
//! Pure function of `(tiles, width, behaviors, player_elevation,
//! player_surfing)`. Two passes: unpack every cell, then tag it. The tag
//! priority is strict and ordered; in particular explicit collision bits can
//! only be overridden by ledge/waterfall behaviors, never by water or
//! edge-blocked refinements (invisible ocean barriers stay walls).

use crate::behavior::{self, BehaviorTables};
use crate::schema::{
    MAPGRID_COLLISION_MASK, MAPGRID_COLLISION_SHIFT, MAPGRID_ELEVATION_MASK,
    MAPGRID_ELEVATION_SHIFT, MAPGRID_METATILE_ID_MASK, MAPGRID_UNDEFINED,
};
use crate::tiles::Tile;

/// Elevation nibble used by bridges: the cell inherits the player's level.
const ELEVATION_TRANSITION: u8 = 0;
const ELEVATION_SURFABLE: u8 = 3;
const ELEVATION_BRIDGE: u8 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    metatile_id: u16,
    collision: u8,
    elevation: u8,
    behavior: u16,
}

fn unpack(raw: u16, behaviors: &[u16]) -> Cell {
    let metatile_id = raw & MAPGRID_METATILE_ID_MASK;
    Cell {
        metatile_id,
        collision: ((raw & MAPGRID_COLLISION_MASK) >> MAPGRID_COLLISION_SHIFT) as u8,
        elevation: ((raw & MAPGRID_ELEVATION_MASK) >> MAPGRID_ELEVATION_SHIFT) as u8,
        behavior: behaviors.get(metatile_id as usize).copied().unwrap_or(0),
    }
}

/// Classified map: a tile tag and a stable wire code per cell, row-major.
pub struct ClassifiedMap {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
    pub codes: Vec<u16>,
    /// Behavior id per cell, kept for the overlay composer.
    pub behaviors: Vec<u16>,
    /// Metatile id per cell, kept for the locked-door overlay.
    pub metatile_ids: Vec<u16>,
}

impl ClassifiedMap {
    #[must_use]
    pub fn tile_at(&self, x: usize, y: usize) -> Option<Tile> {
        (x < self.width && y < self.height).then(|| self.tiles[y * self.width + x])
    }

    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.tiles[idx] = tile;
            self.codes[idx] = tile.code();
        }
    }
}

fn elevation_passable(cell: Cell, player_elevation: u8, player_surfing: bool) -> bool {
    cell.elevation == ELEVATION_TRANSITION
        || player_elevation == ELEVATION_TRANSITION
        || cell.elevation == player_elevation
        || cell.elevation == ELEVATION_BRIDGE
        || (cell.elevation == ELEVATION_SURFABLE && player_surfing)
}

fn refine_walkable(cell: Cell, tables: &BehaviorTables) -> Tile {
    let b = cell.behavior;
    if let Some(tile) = tables.currents.get(b) {
        return tile;
    }
    if tables.diveable_water.contains(b) {
        return Tile::DiveWater;
    }
    if tables.surfable_water.contains(b) {
        return Tile::Water;
    }
    if tables.grass.contains(b) {
        return Tile::Grass;
    }
    if tables.red_carpet.contains(b) {
        return Tile::RedCarpet;
    }
    if tables.strength_switch.contains(b) {
        return Tile::StrengthSwitch;
    }
    if let Some(tile) = tables.spinners.get(b) {
        return tile;
    }
    if let Some(tile) = tables.forced_arrows.get(b) {
        return tile;
    }
    if tables.thin_ice.contains(b) {
        return Tile::ThinIce;
    }
    if tables.cracked_ice.contains(b) {
        return Tile::CrackedIce;
    }
    if tables.cracked_floor.contains(b) {
        return Tile::CrackedFloor;
    }
    if let Some(tile) = tables.edge_blocked.get(b) {
        return tile;
    }
    // Unknown behavior on a walkable cell downgrades to plain walkable.
    Tile::Walkable
}

/// Classify a row-major grid of raw map cells.
///
/// `behaviors` is the per-metatile behavior table (primary + secondary
/// tilesets concatenated), indexed by metatile id.
#[must_use]
pub fn classify(
    raw_tiles: &[u16],
    width: usize,
    behaviors: &[u16],
    player_elevation: u8,
    player_surfing: bool,
) -> ClassifiedMap {
    let height = if width == 0 { 0 } else { raw_tiles.len() / width };
    let tables = behavior::tables();
    let cells: Vec<Cell> = raw_tiles.iter().map(|&raw| unpack(raw, behaviors)).collect();

    let mut tiles = Vec::with_capacity(cells.len());
    for y in 0..height {
        for x in 0..width {
            let cell = cells[y * width + x];
            tiles.push(classify_cell(
                cell,
                x,
                y,
                width,
                height,
                &cells,
                tables,
                player_elevation,
                player_surfing,
            ));
        }
    }

    let codes = tiles.iter().map(|t| t.code()).collect();
    ClassifiedMap {
        width,
        height,
        tiles,
        codes,
        behaviors: cells.iter().map(|c| c.behavior).collect(),
        metatile_ids: cells.iter().map(|c| c.metatile_id).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn classify_cell(
    cell: Cell,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    cells: &[Cell],
    tables: &BehaviorTables,
    player_elevation: u8,
    player_surfing: bool,
) -> Tile {
    // 1. Undefined cell.
    if cell.metatile_id == MAPGRID_UNDEFINED {
        return Tile::Wall;
    }

    // 2. Ledges and waterfalls beat everything, collision included.
    if let Some(ledge) = tables.ledges.get(cell.behavior) {
        return ledge;
    }
    if cell.behavior == behavior::MB_WATERFALL {
        return Tile::Waterfall;
    }

    // 3. Explicit collision.
    if cell.collision != 0 {
        return Tile::Wall;
    }

    // 4. Elevation-based passability.
    if !elevation_passable(cell, player_elevation, player_surfing) {
        // The cell belongs to another level. If an orthogonal neighbor sits
        // at the cell's elevation with no collision, the cell is genuinely
        // reachable only from that level, so from here it reads as a wall.
        let neighbor_matches = orthogonal_neighbors(x, y, width, height).any(|(nx, ny)| {
            let n = cells[ny * width + nx];
            n.elevation == cell.elevation && n.collision == 0
        });
        if neighbor_matches {
            return Tile::Wall;
        }
        return Tile::Walkable;
    }

    // 5. Behavior refinement of walkable cells.
    refine_walkable(cell, tables)
}

fn orthogonal_neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let (x, y) = (x as i64, y as i64);
    [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
        .into_iter()
        .filter_map(move |(nx, ny)| {
            (nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height)
                .then_some((nx as usize, ny as usize))
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::behavior::{
        MB_EASTWARD_CURRENT, MB_IMPASSABLE_NORTH, MB_JUMP_SOUTH, MB_OCEAN_WATER, MB_TALL_GRASS,
        MB_WATERFALL,
    };

    /// Build a behavior table where metatile id == behavior id.
    fn identity_behaviors() -> Vec<u16> {
        (0..0x200u16).collect()
    }

    fn cell(metatile: u16, collision: u16, elevation: u16) -> u16 {
        metatile | (collision << 10) | (elevation << 12)
    }

    #[test]
    fn collision_beats_behavior_refinement() {
        // Metatile 1 tagged TALL_GRASS via a tiny behavior table.
        let behaviors = vec![0, MB_TALL_GRASS];
        // Cell value 0x0C01: metatile 1, collision 3, elevation 0.
        let raw = [cell(1, 3, 0)];
        assert_eq!(raw[0], 0x0C01);
        let map = classify(&raw, 1, &behaviors, 0, false);
        assert_eq!(map.tiles, vec![Tile::Wall]);
        assert_eq!(map.codes, vec![0]);
    }

    #[test]
    fn ledges_and_waterfalls_override_collision() {
        let behaviors = identity_behaviors();
        let raw = [
            cell(MB_JUMP_SOUTH, 1, 3),
            cell(MB_WATERFALL, 1, 3),
        ];
        let map = classify(&raw, 2, &behaviors, 3, false);
        assert_eq!(map.tiles, vec![Tile::LedgeSouth, Tile::Waterfall]);
    }

    #[test]
    fn undefined_cells_are_walls() {
        let behaviors = identity_behaviors();
        let raw = [cell(MAPGRID_UNDEFINED, 0, 0)];
        let map = classify(&raw, 1, &behaviors, 3, false);
        assert_eq!(map.tiles, vec![Tile::Wall]);
    }

    #[test]
    fn walkable_refinements() {
        let behaviors = identity_behaviors();
        let raw = [
            cell(MB_TALL_GRASS, 0, 3),
            cell(MB_OCEAN_WATER, 0, 3),
            cell(MB_EASTWARD_CURRENT, 0, 3),
            cell(MB_IMPASSABLE_NORTH, 0, 3),
            cell(0, 0, 3),
        ];
        let map = classify(&raw, 5, &behaviors, 3, true);
        assert_eq!(
            map.tiles,
            vec![
                Tile::Grass,
                Tile::Water,
                Tile::CurrentEast,
                Tile::BlockedNorth,
                Tile::Walkable,
            ]
        );
    }

    #[test]
    fn water_refinement_never_overwrites_collision() {
        // Invisible ocean barrier: water behavior with collision bits set.
        let behaviors = identity_behaviors();
        let raw = [cell(MB_OCEAN_WATER, 1, 3)];
        let map = classify(&raw, 1, &behaviors, 3, true);
        assert_eq!(map.tiles, vec![Tile::Wall]);
    }

    #[test]
    fn mismatched_elevation_with_reachable_neighbor_is_wall() {
        let behaviors = identity_behaviors();
        // Player at elevation 3. Middle cell is elevation 4 (a cliff top)
        // flanked by a same-elevation open cell, so it reads as a wall.
        let raw = [cell(0, 0, 4), cell(0, 0, 4), cell(0, 0, 3)];
        let map = classify(&raw, 3, &behaviors, 3, false);
        assert_eq!(map.tiles[1], Tile::Wall);
        // An isolated off-elevation cell with no reachable neighbor stays
        // walkable (conservative default).
        let raw = [cell(0, 0, 4), cell(0, 0, 3), cell(0, 0, 3)];
        let map = classify(&raw, 3, &behaviors, 3, false);
        assert_eq!(map.tiles[0], Tile::Walkable);
    }

    #[test]
    fn bridge_elevation_inherits_player_level() {
        let behaviors = identity_behaviors();
        let raw = [cell(0, 0, 15)];
        let map = classify(&raw, 1, &behaviors, 5, false);
        assert_eq!(map.tiles, vec![Tile::Walkable]);
    }

    #[test]
    fn surf_elevation_passable_only_while_surfing() {
        let behaviors = identity_behaviors();
        let raw = [cell(MB_OCEAN_WATER, 0, 3)];
        let on_foot = classify(&raw, 1, &behaviors, 4, false);
        assert_eq!(on_foot.tiles, vec![Tile::Walkable]); // isolated, no neighbor
        let surfing = classify(&raw, 1, &behaviors, 4, true);
        assert_eq!(surfing.tiles, vec![Tile::Water]);
    }
}
