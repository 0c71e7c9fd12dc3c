//! Minimap tile catalog.
//!
//! Every classified map cell is reported twice: as a glyph (human-readable
//! map rows) and as a numeric minimap code (the wire value automation
//! clients persist). Codes are stable forever; new tiles take fresh numbers
//! and existing numbers never move.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Glyph used for cells the client has never observed (fog of war).
pub const FOG_GLYPH: char = '❓';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tile {
    Wall,
    Walkable,
    Grass,
    Water,
    Waterfall,
    LedgeEast,
    LedgeWest,
    LedgeNorth,
    LedgeSouth,
    Warp,
    Npc,
    Interactive,
    Pc,
    RegionMap,
    Television,
    Bookshelf,
    TrashCan,
    ShopShelf,
    RedCarpet,
    OobWalkable,
    OobCollision,
    Door,
    Ladder,
    Escalator,
    Hole,
    Stairs,
    Entrance,
    WarpArrow,
    WarpPad,
    Boulder,
    CutTree,
    SmashRock,
    CurrentEast,
    CurrentWest,
    CurrentNorth,
    CurrentSouth,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    SpinnerRight,
    SpinnerLeft,
    SpinnerUp,
    SpinnerDown,
    SpinnerStop,
    ThinIce,
    CrackedIce,
    ItemBall,
    DiveWater,
    StrengthSwitch,
    TemporaryWall,
    LockedDoor,
    BlockedNorth,
    BlockedSouth,
    BlockedEast,
    BlockedWest,
    BlockedNortheast,
    BlockedNorthwest,
    BlockedSoutheast,
    BlockedSouthwest,
    CrackedFloor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileInfo {
    pub code: u16,
    pub glyph: char,
    pub label: &'static str,
    pub passable: bool,
    /// Base terrain comes straight from the classifier; overlays (NPCs,
    /// doors, interactives) are composited on top of it.
    pub is_base_terrain: bool,
    pub show_in_legend: bool,
}

macro_rules! tile_table {
    ($(($tile:ident, $code:literal, $glyph:literal, $label:literal, $passable:literal, $base:literal, $legend:literal)),+ $(,)?) => {
        const TILE_TABLE: &[(Tile, TileInfo)] = &[
            $((
                Tile::$tile,
                TileInfo {
                    code: $code,
                    glyph: $glyph,
                    label: $label,
                    passable: $passable,
                    is_base_terrain: $base,
                    show_in_legend: $legend,
                },
            )),+
        ];
    };
}

tile_table![
    (Wall, 0, '#', "wall", false, true, true),
    (Walkable, 1, '.', "free ground", true, true, true),
    (Grass, 2, '"', "tall grass", true, true, true),
    (Water, 3, '~', "water", false, true, true),
    (Waterfall, 4, 'F', "waterfall", false, true, true),
    (LedgeEast, 5, '>', "ledge (hop east)", true, true, true),
    (LedgeWest, 6, '<', "ledge (hop west)", true, true, true),
    (LedgeNorth, 7, '^', "ledge (hop north)", true, true, true),
    (LedgeSouth, 8, 'v', "ledge (hop south)", true, true, true),
    (Warp, 9, 'W', "warp", true, false, true),
    (Npc, 10, '@', "NPC", false, false, true),
    (Interactive, 11, '!', "interactive object", false, false, true),
    (Pc, 14, 'P', "PC", false, false, true),
    (RegionMap, 15, 'M', "wall map", false, false, true),
    (Television, 16, 'T', "television", false, false, true),
    (Bookshelf, 18, 'B', "bookshelf", false, false, true),
    (TrashCan, 21, 'c', "trash can", false, false, true),
    (ShopShelf, 22, 's', "shop shelf", false, false, true),
    (RedCarpet, 23, ',', "red carpet", true, true, true),
    (OobWalkable, 24, ':', "out-of-bounds ground", true, true, false),
    (OobCollision, 25, 'X', "out-of-bounds wall", false, true, false),
    (Door, 26, 'D', "door", true, false, true),
    (Ladder, 27, 'H', "ladder", true, false, true),
    (Escalator, 28, 'E', "escalator", true, false, true),
    (Hole, 29, 'O', "hole", true, false, true),
    (Stairs, 30, 'S', "stairs", true, false, true),
    (Entrance, 31, 'n', "entrance", true, false, true),
    (WarpArrow, 32, 'A', "warp arrow", true, false, true),
    (WarpPad, 34, 'p', "warp pad", true, false, true),
    (Boulder, 33, 'o', "pushable boulder", false, false, true),
    (CutTree, 35, 't', "cuttable tree", false, false, true),
    (SmashRock, 36, 'r', "smashable rock", false, false, true),
    (CurrentEast, 40, '6', "water current (east)", false, true, true),
    (CurrentWest, 41, '4', "water current (west)", false, true, true),
    (CurrentNorth, 42, '8', "water current (north)", false, true, true),
    (CurrentSouth, 43, '2', "water current (south)", false, true, true),
    (ArrowLeft, 44, 'l', "forced move left", true, true, true),
    (ArrowRight, 45, 'f', "forced move right", true, true, true),
    (ArrowUp, 46, 'u', "forced move up", true, true, true),
    (ArrowDown, 47, 'd', "forced move down", true, true, true),
    (SpinnerRight, 48, 'R', "spinner (right)", true, true, true),
    (SpinnerLeft, 49, 'L', "spinner (left)", true, true, true),
    (SpinnerUp, 50, 'U', "spinner (up)", true, true, true),
    (SpinnerDown, 51, 'N', "spinner (down)", true, true, true),
    (SpinnerStop, 52, '+', "spinner stop", true, true, true),
    (ThinIce, 53, 'i', "thin ice", true, true, true),
    (CrackedIce, 54, 'I', "cracked ice", true, true, true),
    (ItemBall, 55, '$', "item ball", false, false, true),
    (DiveWater, 56, '=', "diveable water", false, true, true),
    (StrengthSwitch, 57, '%', "strength switch", true, true, true),
    (TemporaryWall, 66, 'x', "temporary wall", false, false, true),
    (LockedDoor, 67, 'K', "locked door", false, false, true),
    (BlockedNorth, 68, '1', "floor (no entry from north)", true, true, true),
    (BlockedSouth, 69, '3', "floor (no entry from south)", true, true, true),
    (BlockedEast, 70, '5', "floor (no entry from east)", true, true, true),
    (BlockedWest, 71, '7', "floor (no entry from west)", true, true, true),
    (BlockedNortheast, 72, '9', "floor (no entry from north/east)", true, true, true),
    (BlockedNorthwest, 73, '0', "floor (no entry from north/west)", true, true, true),
    (BlockedSoutheast, 74, 'a', "floor (no entry from south/east)", true, true, true),
    (BlockedSouthwest, 75, 'b', "floor (no entry from south/west)", true, true, true),
    (CrackedFloor, 140, '_', "cracked floor", true, true, true),
];

static BY_CODE: Lazy<HashMap<u16, Tile>> =
    Lazy::new(|| TILE_TABLE.iter().map(|&(tile, info)| (info.code, tile)).collect());

impl Tile {
    #[must_use]
    pub fn info(self) -> &'static TileInfo {
        // The table covers every variant; the panic is unreachable.
        &TILE_TABLE
            .iter()
            .find(|(tile, _)| *tile == self)
            .expect("tile missing from catalog")
            .1
    }

    #[must_use]
    pub fn code(self) -> u16 {
        self.info().code
    }

    #[must_use]
    pub fn glyph(self) -> char {
        self.info().glyph
    }

    #[must_use]
    pub fn passable(self) -> bool {
        self.info().passable
    }

    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        BY_CODE.get(&code).copied()
    }

    /// All catalogued tiles, in code order.
    pub fn all() -> impl Iterator<Item = Self> {
        TILE_TABLE.iter().map(|&(tile, _)| tile)
    }
}

/// Whether a wire code names a passable cell. Unknown codes count as
/// impassable so stale clients fail safe.
#[must_use]
pub fn code_is_passable(code: u16) -> bool {
    Tile::from_code(code).is_some_and(Tile::passable)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn wire_codes_are_stable() {
        assert_eq!(Tile::Wall.code(), 0);
        assert_eq!(Tile::Walkable.code(), 1);
        assert_eq!(Tile::Grass.code(), 2);
        assert_eq!(Tile::Water.code(), 3);
        assert_eq!(Tile::Waterfall.code(), 4);
        assert_eq!(Tile::LedgeEast.code(), 5);
        assert_eq!(Tile::LedgeSouth.code(), 8);
        assert_eq!(Tile::Warp.code(), 9);
        assert_eq!(Tile::Npc.code(), 10);
        assert_eq!(Tile::Interactive.code(), 11);
        assert_eq!(Tile::CrackedFloor.code(), 140);
    }

    #[test]
    fn code_round_trip_is_identity() {
        for tile in Tile::all() {
            assert_eq!(Tile::from_code(tile.code()), Some(tile));
        }
    }

    #[test]
    fn codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for tile in Tile::all() {
            assert!(seen.insert(tile.code()), "duplicate code {}", tile.code());
        }
    }

    #[test]
    fn passability_matches_legend_expectations() {
        assert!(!code_is_passable(0));
        assert!(code_is_passable(1));
        assert!(code_is_passable(2));
        assert!(!code_is_passable(10));
        assert!(!code_is_passable(9999));
    }
}
