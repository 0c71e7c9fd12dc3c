//! Metatile behavior semantics.
//!
//! Each metatile carries a 9-bit behavior tag from the current tileset pair.
//! The id → name mapping below is the target ROM's behavior catalog; the
//! semantic tables the classifier consumes (grass set, ledge map, warp
//! visuals, …) are derived from the names once at init, so the hot loop only
//! does dense array lookups.

use once_cell::sync::Lazy;

use crate::tiles::Tile;

pub const BEHAVIOR_SPACE: usize = 512;

pub const MB_NORMAL: u16 = 0x00;
pub const MB_SECRET_BASE_WALL: u16 = 0x01;
pub const MB_TALL_GRASS: u16 = 0x02;
pub const MB_LONG_GRASS: u16 = 0x03;
pub const MB_DEEP_SAND: u16 = 0x06;
pub const MB_SHORT_GRASS: u16 = 0x07;
pub const MB_CAVE: u16 = 0x08;
pub const MB_POND_WATER: u16 = 0x10;
pub const MB_SEMI_DEEP_WATER: u16 = 0x11;
pub const MB_DEEP_WATER: u16 = 0x12;
pub const MB_WATERFALL: u16 = 0x13;
pub const MB_OCEAN_WATER: u16 = 0x15;
pub const MB_PUDDLE: u16 = 0x16;
pub const MB_SHALLOW_WATER: u16 = 0x17;
pub const MB_NO_SURFACING: u16 = 0x19;
pub const MB_ICE: u16 = 0x20;
pub const MB_SAND: u16 = 0x21;
pub const MB_SEAWEED: u16 = 0x22;
pub const MB_SPIN_RIGHT: u16 = 0x24;
pub const MB_SPIN_LEFT: u16 = 0x25;
pub const MB_SPIN_UP: u16 = 0x26;
pub const MB_SPIN_DOWN: u16 = 0x27;
pub const MB_STOP_SPINNING: u16 = 0x28;
pub const MB_IMPASSABLE_EAST: u16 = 0x30;
pub const MB_IMPASSABLE_WEST: u16 = 0x31;
pub const MB_IMPASSABLE_NORTH: u16 = 0x32;
pub const MB_IMPASSABLE_SOUTH: u16 = 0x33;
pub const MB_IMPASSABLE_NORTHEAST: u16 = 0x34;
pub const MB_IMPASSABLE_NORTHWEST: u16 = 0x35;
pub const MB_IMPASSABLE_SOUTHEAST: u16 = 0x36;
pub const MB_IMPASSABLE_SOUTHWEST: u16 = 0x37;
pub const MB_JUMP_EAST: u16 = 0x38;
pub const MB_JUMP_WEST: u16 = 0x39;
pub const MB_JUMP_NORTH: u16 = 0x3A;
pub const MB_JUMP_SOUTH: u16 = 0x3B;
pub const MB_WALK_EAST: u16 = 0x40;
pub const MB_WALK_WEST: u16 = 0x41;
pub const MB_WALK_NORTH: u16 = 0x42;
pub const MB_WALK_SOUTH: u16 = 0x43;
pub const MB_EASTWARD_CURRENT: u16 = 0x50;
pub const MB_WESTWARD_CURRENT: u16 = 0x51;
pub const MB_NORTHWARD_CURRENT: u16 = 0x52;
pub const MB_SOUTHWARD_CURRENT: u16 = 0x53;
pub const MB_THIN_ICE: u16 = 0x57;
pub const MB_CRACKED_ICE: u16 = 0x58;
pub const MB_CRACKED_FLOOR: u16 = 0x5A;
pub const MB_NON_ANIMATED_DOOR: u16 = 0x60;
pub const MB_LADDER: u16 = 0x61;
pub const MB_EAST_ARROW_WARP: u16 = 0x62;
pub const MB_WEST_ARROW_WARP: u16 = 0x63;
pub const MB_NORTH_ARROW_WARP: u16 = 0x64;
pub const MB_SOUTH_ARROW_WARP: u16 = 0x65;
pub const MB_FALL_WARP: u16 = 0x66;
pub const MB_ANIMATED_DOOR: u16 = 0x69;
pub const MB_UP_ESCALATOR: u16 = 0x6A;
pub const MB_DOWN_ESCALATOR: u16 = 0x6B;
pub const MB_WATER_DOOR: u16 = 0x6C;
pub const MB_WATER_SOUTH_ARROW_WARP: u16 = 0x6D;
pub const MB_DEEP_SOUTH_WARP: u16 = 0x6E;
pub const MB_WARP_PAD: u16 = 0x6F;
pub const MB_CAVE_ENTRANCE: u16 = 0x70;
pub const MB_RED_CARPET: u16 = 0x78;
pub const MB_PC: u16 = 0x83;
pub const MB_REGION_MAP: u16 = 0x85;
pub const MB_TELEVISION: u16 = 0x86;
pub const MB_TRASH_CAN: u16 = 0x87;
pub const MB_POKEMART_SHELF: u16 = 0x88;
pub const MB_BOOKSHELF: u16 = 0x89;
pub const MB_STRENGTH_BUTTON: u16 = 0x90;
pub const MB_UP_RIGHT_STAIR_WARP: u16 = 0xD0;
pub const MB_UP_LEFT_STAIR_WARP: u16 = 0xD1;
pub const MB_DOWN_RIGHT_STAIR_WARP: u16 = 0xD2;
pub const MB_DOWN_LEFT_STAIR_WARP: u16 = 0xD3;

const BEHAVIOR_NAMES: &[(u16, &str)] = &[
    (MB_NORMAL, "NORMAL"),
    (MB_SECRET_BASE_WALL, "SECRET_BASE_WALL"),
    (MB_TALL_GRASS, "TALL_GRASS"),
    (MB_LONG_GRASS, "LONG_GRASS"),
    (MB_DEEP_SAND, "DEEP_SAND"),
    (MB_SHORT_GRASS, "SHORT_GRASS"),
    (MB_CAVE, "CAVE"),
    (MB_POND_WATER, "POND_WATER"),
    (MB_SEMI_DEEP_WATER, "SEMI_DEEP_WATER"),
    (MB_DEEP_WATER, "DEEP_WATER"),
    (MB_WATERFALL, "WATERFALL"),
    (MB_OCEAN_WATER, "OCEAN_WATER"),
    (MB_PUDDLE, "PUDDLE"),
    (MB_SHALLOW_WATER, "SHALLOW_WATER"),
    (MB_NO_SURFACING, "NO_SURFACING"),
    (MB_ICE, "ICE"),
    (MB_SAND, "SAND"),
    (MB_SEAWEED, "SEAWEED"),
    (MB_SPIN_RIGHT, "SPIN_RIGHT"),
    (MB_SPIN_LEFT, "SPIN_LEFT"),
    (MB_SPIN_UP, "SPIN_UP"),
    (MB_SPIN_DOWN, "SPIN_DOWN"),
    (MB_STOP_SPINNING, "STOP_SPINNING"),
    (MB_IMPASSABLE_EAST, "IMPASSABLE_EAST"),
    (MB_IMPASSABLE_WEST, "IMPASSABLE_WEST"),
    (MB_IMPASSABLE_NORTH, "IMPASSABLE_NORTH"),
    (MB_IMPASSABLE_SOUTH, "IMPASSABLE_SOUTH"),
    (MB_IMPASSABLE_NORTHEAST, "IMPASSABLE_NORTHEAST"),
    (MB_IMPASSABLE_NORTHWEST, "IMPASSABLE_NORTHWEST"),
    (MB_IMPASSABLE_SOUTHEAST, "IMPASSABLE_SOUTHEAST"),
    (MB_IMPASSABLE_SOUTHWEST, "IMPASSABLE_SOUTHWEST"),
    (MB_JUMP_EAST, "JUMP_EAST"),
    (MB_JUMP_WEST, "JUMP_WEST"),
    (MB_JUMP_NORTH, "JUMP_NORTH"),
    (MB_JUMP_SOUTH, "JUMP_SOUTH"),
    (MB_WALK_EAST, "WALK_EAST"),
    (MB_WALK_WEST, "WALK_WEST"),
    (MB_WALK_NORTH, "WALK_NORTH"),
    (MB_WALK_SOUTH, "WALK_SOUTH"),
    (MB_EASTWARD_CURRENT, "EASTWARD_CURRENT"),
    (MB_WESTWARD_CURRENT, "WESTWARD_CURRENT"),
    (MB_NORTHWARD_CURRENT, "NORTHWARD_CURRENT"),
    (MB_SOUTHWARD_CURRENT, "SOUTHWARD_CURRENT"),
    (MB_THIN_ICE, "THIN_ICE"),
    (MB_CRACKED_ICE, "CRACKED_ICE"),
    (MB_CRACKED_FLOOR, "CRACKED_FLOOR"),
    (MB_NON_ANIMATED_DOOR, "NON_ANIMATED_DOOR"),
    (MB_LADDER, "LADDER"),
    (MB_EAST_ARROW_WARP, "EAST_ARROW_WARP"),
    (MB_WEST_ARROW_WARP, "WEST_ARROW_WARP"),
    (MB_NORTH_ARROW_WARP, "NORTH_ARROW_WARP"),
    (MB_SOUTH_ARROW_WARP, "SOUTH_ARROW_WARP"),
    (MB_FALL_WARP, "FALL_WARP"),
    (MB_ANIMATED_DOOR, "ANIMATED_DOOR"),
    (MB_UP_ESCALATOR, "UP_ESCALATOR"),
    (MB_DOWN_ESCALATOR, "DOWN_ESCALATOR"),
    (MB_WATER_DOOR, "WATER_DOOR"),
    (MB_WATER_SOUTH_ARROW_WARP, "WATER_SOUTH_ARROW_WARP"),
    (MB_DEEP_SOUTH_WARP, "DEEP_SOUTH_WARP"),
    (MB_WARP_PAD, "WARP_PAD"),
    (MB_CAVE_ENTRANCE, "CAVE_ENTRANCE"),
    (MB_RED_CARPET, "RED_CARPET"),
    (MB_PC, "PC"),
    (MB_REGION_MAP, "REGION_MAP"),
    (MB_TELEVISION, "TELEVISION"),
    (MB_TRASH_CAN, "TRASH_CAN"),
    (MB_POKEMART_SHELF, "POKEMART_SHELF"),
    (MB_BOOKSHELF, "BOOKSHELF"),
    (MB_STRENGTH_BUTTON, "STRENGTH_BUTTON"),
    (MB_UP_RIGHT_STAIR_WARP, "UP_RIGHT_STAIR_WARP"),
    (MB_UP_LEFT_STAIR_WARP, "UP_LEFT_STAIR_WARP"),
    (MB_DOWN_RIGHT_STAIR_WARP, "DOWN_RIGHT_STAIR_WARP"),
    (MB_DOWN_LEFT_STAIR_WARP, "DOWN_LEFT_STAIR_WARP"),
];

/// Name for a behavior id, if the catalog knows it.
#[must_use]
pub fn behavior_name(id: u16) -> Option<&'static str> {
    BEHAVIOR_NAMES
        .iter()
        .find(|&&(mb, _)| mb == id)
        .map(|&(_, name)| name)
}

/// Dense membership set over the 9-bit behavior space.
#[derive(Clone)]
pub struct BehaviorSet {
    bits: [u64; BEHAVIOR_SPACE / 64],
}

impl BehaviorSet {
    const fn new() -> Self {
        Self { bits: [0; BEHAVIOR_SPACE / 64] }
    }

    fn insert(&mut self, id: u16) {
        let id = id as usize;
        debug_assert!(id < BEHAVIOR_SPACE);
        self.bits[id / 64] |= 1 << (id % 64);
    }

    #[must_use]
    pub fn contains(&self, id: u16) -> bool {
        let id = id as usize;
        id < BEHAVIOR_SPACE && (self.bits[id / 64] >> (id % 64)) & 1 != 0
    }
}

/// Sparse behavior → tile map over the same space.
#[derive(Clone)]
pub struct BehaviorTileMap {
    slots: [Option<Tile>; BEHAVIOR_SPACE],
}

impl BehaviorTileMap {
    const fn new() -> Self {
        Self { slots: [None; BEHAVIOR_SPACE] }
    }

    fn insert(&mut self, id: u16, tile: Tile) {
        self.slots[id as usize] = tile.into();
    }

    #[must_use]
    pub fn get(&self, id: u16) -> Option<Tile> {
        self.slots.get(id as usize).copied().flatten()
    }
}

/// All semantic tables the classifier and the overlay composer consume.
pub struct BehaviorTables {
    pub grass: BehaviorSet,
    pub surfable_water: BehaviorSet,
    pub diveable_water: BehaviorSet,
    pub red_carpet: BehaviorSet,
    pub thin_ice: BehaviorSet,
    pub cracked_ice: BehaviorSet,
    pub cracked_floor: BehaviorSet,
    pub ledges: BehaviorTileMap,
    pub currents: BehaviorTileMap,
    pub forced_arrows: BehaviorTileMap,
    pub spinners: BehaviorTileMap,
    pub edge_blocked: BehaviorTileMap,
    pub strength_switch: BehaviorSet,
    pub interactive: BehaviorTileMap,
    /// Behavior → the visual tile rendered for a warp of that kind.
    pub warp_visuals: BehaviorTileMap,
    /// Arrow-warp behavior → the direction the arrow points.
    pub arrow_warp_delta: Vec<(u16, (i32, i32))>,
    /// Stair-warp behavior → visual displacement of the stairs glyph.
    pub stair_warp_delta: Vec<(u16, (i32, i32))>,
}

fn build_tables() -> BehaviorTables {
    let mut t = BehaviorTables {
        grass: BehaviorSet::new(),
        surfable_water: BehaviorSet::new(),
        diveable_water: BehaviorSet::new(),
        red_carpet: BehaviorSet::new(),
        thin_ice: BehaviorSet::new(),
        cracked_ice: BehaviorSet::new(),
        cracked_floor: BehaviorSet::new(),
        ledges: BehaviorTileMap::new(),
        currents: BehaviorTileMap::new(),
        forced_arrows: BehaviorTileMap::new(),
        spinners: BehaviorTileMap::new(),
        edge_blocked: BehaviorTileMap::new(),
        strength_switch: BehaviorSet::new(),
        interactive: BehaviorTileMap::new(),
        warp_visuals: BehaviorTileMap::new(),
        arrow_warp_delta: Vec::new(),
        stair_warp_delta: Vec::new(),
    };

    for &(id, name) in BEHAVIOR_NAMES {
        match name {
            "TALL_GRASS" | "LONG_GRASS" => t.grass.insert(id),
            "RED_CARPET" => t.red_carpet.insert(id),
            "THIN_ICE" => t.thin_ice.insert(id),
            "CRACKED_ICE" => t.cracked_ice.insert(id),
            "CRACKED_FLOOR" => t.cracked_floor.insert(id),
            "STRENGTH_BUTTON" => t.strength_switch.insert(id),

            "JUMP_EAST" => t.ledges.insert(id, Tile::LedgeEast),
            "JUMP_WEST" => t.ledges.insert(id, Tile::LedgeWest),
            "JUMP_NORTH" => t.ledges.insert(id, Tile::LedgeNorth),
            "JUMP_SOUTH" => t.ledges.insert(id, Tile::LedgeSouth),

            "EASTWARD_CURRENT" => t.currents.insert(id, Tile::CurrentEast),
            "WESTWARD_CURRENT" => t.currents.insert(id, Tile::CurrentWest),
            "NORTHWARD_CURRENT" => t.currents.insert(id, Tile::CurrentNorth),
            "SOUTHWARD_CURRENT" => t.currents.insert(id, Tile::CurrentSouth),

            "WALK_EAST" => t.forced_arrows.insert(id, Tile::ArrowRight),
            "WALK_WEST" => t.forced_arrows.insert(id, Tile::ArrowLeft),
            "WALK_NORTH" => t.forced_arrows.insert(id, Tile::ArrowUp),
            "WALK_SOUTH" => t.forced_arrows.insert(id, Tile::ArrowDown),

            "SPIN_RIGHT" => t.spinners.insert(id, Tile::SpinnerRight),
            "SPIN_LEFT" => t.spinners.insert(id, Tile::SpinnerLeft),
            "SPIN_UP" => t.spinners.insert(id, Tile::SpinnerUp),
            "SPIN_DOWN" => t.spinners.insert(id, Tile::SpinnerDown),
            "STOP_SPINNING" => t.spinners.insert(id, Tile::SpinnerStop),

            "IMPASSABLE_NORTH" => t.edge_blocked.insert(id, Tile::BlockedNorth),
            "IMPASSABLE_SOUTH" => t.edge_blocked.insert(id, Tile::BlockedSouth),
            "IMPASSABLE_EAST" => t.edge_blocked.insert(id, Tile::BlockedEast),
            "IMPASSABLE_WEST" => t.edge_blocked.insert(id, Tile::BlockedWest),
            "IMPASSABLE_NORTHEAST" => t.edge_blocked.insert(id, Tile::BlockedNortheast),
            "IMPASSABLE_NORTHWEST" => t.edge_blocked.insert(id, Tile::BlockedNorthwest),
            "IMPASSABLE_SOUTHEAST" => t.edge_blocked.insert(id, Tile::BlockedSoutheast),
            "IMPASSABLE_SOUTHWEST" => t.edge_blocked.insert(id, Tile::BlockedSouthwest),

            "PC" => t.interactive.insert(id, Tile::Pc),
            "REGION_MAP" => t.interactive.insert(id, Tile::RegionMap),
            "TELEVISION" => t.interactive.insert(id, Tile::Television),
            "TRASH_CAN" => t.interactive.insert(id, Tile::TrashCan),
            "POKEMART_SHELF" => t.interactive.insert(id, Tile::ShopShelf),
            "BOOKSHELF" => t.interactive.insert(id, Tile::Bookshelf),

            "NON_ANIMATED_DOOR" | "ANIMATED_DOOR" | "WATER_DOOR" => {
                t.warp_visuals.insert(id, Tile::Door);
            }
            "UP_ESCALATOR" | "DOWN_ESCALATOR" => t.warp_visuals.insert(id, Tile::Escalator),
            "LADDER" => t.warp_visuals.insert(id, Tile::Ladder),
            "FALL_WARP" => t.warp_visuals.insert(id, Tile::Hole),
            "CAVE_ENTRANCE" => t.warp_visuals.insert(id, Tile::Entrance),
            "WARP_PAD" => t.warp_visuals.insert(id, Tile::WarpPad),
            "DEEP_SOUTH_WARP" => t.warp_visuals.insert(id, Tile::Warp),
            _ => {}
        }

        // Water kinds by name family. Explicit door/waterfall kinds are
        // handled above and in the classifier respectively.
        if (name.ends_with("_WATER") || name.ends_with("_CURRENT"))
            && !name.contains("SHALLOW")
            && name != "WATER_DOOR"
        {
            t.surfable_water.insert(id);
        }
        if name == "DEEP_WATER" || name == "SEMI_DEEP_WATER" {
            t.diveable_water.insert(id);
        }

        if name.ends_with("_ARROW_WARP") {
            t.warp_visuals.insert(id, Tile::WarpArrow);
            let delta = match name {
                "EAST_ARROW_WARP" => (1, 0),
                "WEST_ARROW_WARP" => (-1, 0),
                "NORTH_ARROW_WARP" => (0, -1),
                _ => (0, 1),
            };
            t.arrow_warp_delta.push((id, delta));
        }

        if name.ends_with("_STAIR_WARP") {
            t.warp_visuals.insert(id, Tile::Stairs);
            let delta = match name {
                "UP_RIGHT_STAIR_WARP" | "DOWN_RIGHT_STAIR_WARP" => (1, 0),
                _ => (-1, 0),
            };
            t.stair_warp_delta.push((id, delta));
        }
    }

    t
}

static TABLES: Lazy<BehaviorTables> = Lazy::new(build_tables);

/// Process-wide behavior tables, built on first use.
#[must_use]
pub fn tables() -> &'static BehaviorTables {
    &TABLES
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_round_trip() {
        assert_eq!(behavior_name(MB_TALL_GRASS), Some("TALL_GRASS"));
        assert_eq!(behavior_name(MB_WATERFALL), Some("WATERFALL"));
        assert_eq!(behavior_name(0x1FF), None);
    }

    #[test]
    fn derived_sets_cover_the_classifier_inputs() {
        let t = tables();
        assert!(t.grass.contains(MB_TALL_GRASS));
        assert!(t.surfable_water.contains(MB_OCEAN_WATER));
        assert!(t.surfable_water.contains(MB_EASTWARD_CURRENT));
        assert!(!t.surfable_water.contains(MB_SHALLOW_WATER));
        assert!(!t.surfable_water.contains(MB_WATER_DOOR));
        assert!(t.diveable_water.contains(MB_DEEP_WATER));
        assert_eq!(t.ledges.get(MB_JUMP_SOUTH), Some(Tile::LedgeSouth));
        assert_eq!(t.spinners.get(MB_STOP_SPINNING), Some(Tile::SpinnerStop));
        assert_eq!(t.edge_blocked.get(MB_IMPASSABLE_NORTHWEST), Some(Tile::BlockedNorthwest));
        assert_eq!(t.interactive.get(MB_PC), Some(Tile::Pc));
        assert_eq!(t.warp_visuals.get(MB_ANIMATED_DOOR), Some(Tile::Door));
        assert_eq!(t.warp_visuals.get(MB_NORTH_ARROW_WARP), Some(Tile::WarpArrow));
    }

    #[test]
    fn arrow_warp_deltas_point_out_of_the_map() {
        let t = tables();
        let north = t
            .arrow_warp_delta
            .iter()
            .find(|&&(id, _)| id == MB_NORTH_ARROW_WARP)
            .unwrap()
            .1;
        assert_eq!(north, (0, -1));
    }
}
