//! Address and struct-layout catalog for the target ROM.
//!
//! Logical names are resolved against the symbol table exactly once, at
//! startup; a missing symbol aborts init ([`crate::error::SchemaError`]).
//! Struct offsets live here as named constants so every decoder reads the
//! same layout.

use serde::Serialize;

use crate::error::SchemaError;
use crate::symbols::SymbolTable;

/// Padding ring around the backup (VMap) grid, in metatiles.
pub const MAP_OFFSET: usize = 7;

/// Bytes per map-grid cell.
pub const BYTES_PER_TILE: usize = 2;

/// Map-grid cell packing.
pub const MAPGRID_METATILE_ID_MASK: u16 = 0x03FF;
pub const MAPGRID_COLLISION_MASK: u16 = 0x0C00;
pub const MAPGRID_COLLISION_SHIFT: u16 = 10;
pub const MAPGRID_ELEVATION_MASK: u16 = 0xF000;
pub const MAPGRID_ELEVATION_SHIFT: u16 = 12;
/// Metatile id marking an undefined cell.
pub const MAPGRID_UNDEFINED: u16 = 0x03FF;

/// Tileset metatile budget: attributes are indexed by metatile id, primary
/// tileset first.
pub const PRIMARY_TILESET_METATILE_COUNT: usize = 640;
pub const SECONDARY_TILESET_METATILE_COUNT: usize = 384;
pub const TOTAL_METATILE_COUNT: usize =
    PRIMARY_TILESET_METATILE_COUNT + SECONDARY_TILESET_METATILE_COUNT;

/// Metatile attribute entries are u32; the behavior tag is the low 9 bits.
pub const METATILE_ATTR_SIZE: usize = 4;
pub const METATILE_ATTR_BEHAVIOR_MASK: u32 = 0x1FF;

/// Full-screen viewport, in metatiles.
pub const MAX_VIEWPORT_WIDTH: usize = 15;
pub const MAX_VIEWPORT_HEIGHT: usize = 10;

/// Party/storage sizes.
pub const PARTY_SIZE: usize = 6;
pub const POKEMON_SIZE: usize = 100;
pub const BOX_POKEMON_SIZE: usize = 80;
pub const PC_BOX_COUNT: usize = 14;
pub const PC_BOX_CAPACITY: usize = 30;
pub const NICKNAME_LENGTH: usize = 10;

/// Offsets inside the 100-byte party mon (the 80-byte box mon is a prefix).
pub mod mon {
    pub const PID: usize = 0x00;
    pub const OT_ID: usize = 0x04;
    pub const NICKNAME: usize = 0x08;
    pub const CHECKSUM: usize = 0x1C;
    pub const ENCRYPTED: usize = 0x20;
    pub const ENCRYPTED_LEN: usize = 48;
    pub const SUBSTRUCT_LEN: usize = 12;
    // Party-only computed stat block.
    pub const STATUS: usize = 0x50;
    pub const LEVEL: usize = 0x54;
    pub const CURRENT_HP: usize = 0x56;
    pub const MAX_HP: usize = 0x58;
}

/// SaveBlock1 (location, money, flags, object-event templates).
pub mod sb1 {
    pub const POS_X: u32 = 0x0000;
    pub const POS_Y: u32 = 0x0002;
    pub const LOCATION: u32 = 0x0004;
    pub const FLASH_LEVEL: u32 = 0x0030;
    pub const MONEY: u32 = 0x0290;
    pub const OBJECT_EVENT_TEMPLATES: u32 = 0x08E0;
    pub const OBJECT_EVENT_TEMPLATE_COUNT: usize = 64;
    pub const FLAGS: u32 = 0x0EE0;
    pub const FLAGS_SIZE: usize = 0x120;
}

/// SaveBlock2 (options, trainer id, encryption key).
pub mod sb2 {
    pub const PLAYER_NAME: u32 = 0x0000;
    pub const PLAYER_GENDER: u32 = 0x0008;
    pub const TRAINER_ID: u32 = 0x000A;
    pub const PYRAMID_LIGHT_RADIUS: u32 = 0x0E68;
    pub const ENCRYPTION_KEY: u32 = 0x0F20;
}

/// Current map header (`gMapHeader`).
pub mod map_header {
    pub const MAP_LAYOUT: u32 = 0x00;
    pub const EVENTS: u32 = 0x04;
    pub const CONNECTIONS: u32 = 0x0C;
    pub const MAP_LAYOUT_ID: u32 = 0x12;
    pub const REGION_MAP_SECTION_ID: u32 = 0x14;
    pub const CAVE: u32 = 0x15;
}

/// Map layout referenced by the header.
pub mod map_layout {
    pub const WIDTH: u32 = 0x00;
    pub const HEIGHT: u32 = 0x04;
    pub const MAP_GRID: u32 = 0x0C;
    pub const PRIMARY_TILESET: u32 = 0x10;
    pub const SECONDARY_TILESET: u32 = 0x14;
}

/// Tileset struct.
pub mod tileset {
    pub const METATILE_ATTRIBUTES: u32 = 0x14;
}

/// Backup map layout (`gBackupMapLayout`, the VMap).
pub mod backup_map {
    pub const WIDTH: u32 = 0x00;
    pub const HEIGHT: u32 = 0x04;
    pub const DATA: u32 = 0x08;
}

/// Live object-event slots (`gObjectEvents`).
pub mod object_event {
    pub const COUNT: usize = 16;
    pub const SIZE: usize = 0x24;
    pub const PLAYER_INDEX: usize = 0;

    pub const FLAGS: usize = 0x00;
    pub const FLAGS2: usize = 0x04;
    pub const GRAPHICS_ID: usize = 0x09;
    pub const MOVEMENT_TYPE: usize = 0x0A;
    pub const LOCAL_ID: usize = 0x0C;
    pub const MAP_NUM: usize = 0x0D;
    pub const MAP_GROUP: usize = 0x0E;
    pub const ELEVATION: usize = 0x0F;
    pub const CURRENT_X: usize = 0x14;
    pub const CURRENT_Y: usize = 0x16;
    pub const FACING: usize = 0x1C;

    /// Bit 0 of the first flag word.
    pub const FLAG_ACTIVE: u32 = 1 << 0;
    /// Off-screen bit inside the second flag word.
    pub const FLAG2_OFFSCREEN: u32 = 1 << 6;
    pub const CURRENT_ELEVATION_MASK: u8 = 0x0F;
}

/// Object-event templates stored in saveblock-1.
pub mod obj_template {
    pub const SIZE: usize = 0x18;
    pub const LOCAL_ID: usize = 0x00;
    pub const GRAPHICS_ID: usize = 0x01;
    pub const X: usize = 0x04;
    pub const Y: usize = 0x06;
    pub const ELEVATION: usize = 0x08;
    pub const MOVEMENT_TYPE: usize = 0x09;
    pub const MOVEMENT_RANGE: usize = 0x0A;
    pub const FLAG_ID: usize = 0x14;
}

/// `gMapHeader.events` target.
pub mod map_events {
    pub const OBJECT_EVENT_COUNT: usize = 0x00;
    pub const WARP_COUNT: usize = 0x01;
    pub const BG_EVENT_COUNT: usize = 0x03;
    pub const OBJECT_EVENTS: usize = 0x04;
    pub const WARPS: usize = 0x08;
    pub const BG_EVENTS: usize = 0x10;
}

pub mod warp_event {
    pub const SIZE: usize = 0x08;
    pub const X: usize = 0x00;
    pub const Y: usize = 0x02;
    pub const ELEVATION: usize = 0x04;
    pub const WARP_ID: usize = 0x05;
    pub const MAP_NUM: usize = 0x06;
    pub const MAP_GROUP: usize = 0x07;
}

pub mod bg_event {
    pub const SIZE: usize = 0x0C;
    pub const X: usize = 0x00;
    pub const Y: usize = 0x02;
    pub const ELEVATION: usize = 0x04;
    pub const KIND: usize = 0x05;

    /// Sign kinds 5 and 6 plus the dedicated hidden-item kind carry hidden
    /// items and are never surfaced.
    pub const KIND_HIDDEN_ITEM_FIRST: u8 = 5;
    pub const KIND_HIDDEN_ITEM_SECOND: u8 = 6;
    pub const KIND_HIDDEN_ITEM: u8 = 7;
    pub const KIND_SECRET_BASE: u8 = 8;
}

pub mod connection {
    pub const HEADER_COUNT: u32 = 0x00;
    pub const HEADER_LIST: u32 = 0x04;
    pub const SIZE: usize = 0x0C;
    pub const DIRECTION: usize = 0x00;
    pub const OFFSET: usize = 0x04;
    pub const MAP_GROUP: usize = 0x08;
    pub const MAP_NUM: usize = 0x09;
}

/// Cooperative task array (`gTasks`).
pub mod task {
    pub const COUNT: usize = 16;
    pub const SIZE: usize = 0x28;
    pub const FUNC: usize = 0x00;
    pub const IS_ACTIVE: usize = 0x04;
    pub const DATA: usize = 0x08;
    /// Task data slot holding the active multichoice id.
    pub const MULTICHOICE_ID_DATA_INDEX: usize = 5;
}

/// Text printer array (`sTextPrinters`).
pub mod text_printer {
    pub const COUNT: usize = 33;
    pub const SIZE: usize = 0x24;
    pub const CURRENT_CHAR: usize = 0x00;
    pub const WINDOW_ID: usize = 0x04;
    pub const ACTIVE: usize = 0x1B;
}

/// Menu-state struct (`sMenu`): cursor bookkeeping for standard menus.
pub mod menu {
    pub const CURSOR_POS: u32 = 0x02;
    pub const MIN_CURSOR_POS: u32 = 0x03;
    pub const MAX_CURSOR_POS: u32 = 0x04;
}

/// Battle-time per-battler struct (`gBattleMons`).
pub mod battle_mon {
    pub const COUNT: usize = 4;
    pub const SIZE: usize = 0x58;
    pub const SPECIES: usize = 0x00;
    pub const ABILITY: usize = 0x20;
    pub const TYPE1: usize = 0x21;
    pub const TYPE2: usize = 0x22;
    pub const HP: usize = 0x28;
    pub const LEVEL: usize = 0x2A;
    pub const MAX_HP: usize = 0x2C;
    pub const STATUS1: usize = 0x4C;

    /// Bit 0 of `gBattlerPositions[n]`: 0 = player side, 1 = enemy side.
    pub const POSITION_SIDE_MASK: u8 = 0x01;
}

/// `gMain` layout.
pub mod g_main {
    pub const CALLBACK2: u32 = 0x04;
    pub const IN_BATTLE_BYTE: u32 = 0x439;
    pub const IN_BATTLE_MASK: u8 = 0x02;
}

/// `gPaletteFade` packed bitfield.
pub mod palette_fade {
    pub const BITFIELDS: u32 = 0x04;
    pub const ACTIVE_MASK32: u32 = 0x8000_0000;
}

/// Global script context (mode + native wait pointer).
pub mod script_ctx {
    pub const MODE: usize = 0x00;
    pub const NATIVE_PTR: usize = 0x04;
    pub const MODE_STOPPED: u8 = 0;
    pub const MODE_NATIVE: u8 = 2;
}

/// Bag pocket descriptors (`gBagPockets`): `{ item_slots*, capacity }`.
pub mod bag {
    pub const POCKET_COUNT: usize = 5;
    pub const POCKET_DESCRIPTOR_SIZE: usize = 0x08;
    pub const POCKET_SLOTS_PTR: usize = 0x00;
    pub const POCKET_CAPACITY: usize = 0x04;
    pub const ITEM_SLOT_SIZE: usize = 0x04;
    /// A pocket ends on the third consecutive empty slot (fragmentation is
    /// legal, a single hole is not an end marker).
    pub const EMPTY_RUN_LIMIT: usize = 3;
}

/// PC storage (`gPokemonStoragePtr` target).
pub mod storage {
    pub const CURRENT_BOX: u32 = 0x0000;
    pub const BOXES: u32 = 0x0004;
}

/// ROM name tables.
pub mod rom_names {
    pub const SPECIES_NAME_LENGTH: usize = 11;
    pub const MOVE_NAME_LENGTH: usize = 13;
    pub const ABILITY_NAME_LENGTH: usize = 13;
    /// `gItems` entry: 44 bytes, charmap name at offset 0.
    pub const ITEM_SIZE: usize = 44;
    pub const ITEM_NAME_LENGTH: usize = 14;
    /// Species info (base stats) entry.
    pub const SPECIES_INFO_SIZE: usize = 28;
    pub const SPECIES_INFO_TYPE1: usize = 6;
    pub const SPECIES_INFO_TYPE2: usize = 7;
    pub const SPECIES_INFO_ABILITY1: usize = 22;
    pub const SPECIES_INFO_ABILITY2: usize = 23;
    /// Region-map entry: `{ x, y, w, h, name* }`, name pointer at +4.
    pub const REGION_MAP_ENTRY_SIZE: usize = 8;
    pub const REGION_MAP_ENTRY_NAME: usize = 4;
    /// First region-map section id used by this ROM.
    pub const MAPSEC_FIRST: u8 = 0x58;
    pub const MAP_NAME_LENGTH: usize = 20;
}

/// Multichoice table (`sMultichoiceLists`): `{ actions*, count }` entries;
/// each action is `{ text*, func* }`.
pub mod multichoice {
    pub const LIST_ENTRY_SIZE: usize = 0x08;
    pub const LIST_ACTIONS_PTR: usize = 0x00;
    pub const LIST_COUNT: usize = 0x04;
    pub const ACTION_SIZE: usize = 0x08;
    pub const ACTION_TEXT_PTR: usize = 0x00;
    pub const OPTION_TEXT_MAX: usize = 32;
    pub const MAX_OPTIONS: usize = 16;
}

/// Saveblock flag ids. Flags are bit offsets into `sb1::FLAGS`.
pub mod flags {
    pub const SYS_POKEMON_GET: u16 = 0x828;
    pub const SYS_POKEDEX_GET: u16 = 0x829;
    pub const SYS_GAME_CLEAR: u16 = 0x82C;
    pub const SYS_SAFARI_MODE: u16 = 0x836;
    pub const SYS_USE_FLASH: u16 = 0x888;
    pub const SYS_USE_STRENGTH: u16 = 0x889;

    pub const BADGE01_GET: u16 = 0x820;
    pub const BADGE02_GET: u16 = 0x821;
    pub const BADGE03_GET: u16 = 0x822;
    pub const BADGE04_GET: u16 = 0x823;
    pub const BADGE05_GET: u16 = 0x824;
    pub const BADGE06_GET: u16 = 0x825;
    pub const BADGE07_GET: u16 = 0x826;
    pub const BADGE08_GET: u16 = 0x827;

    pub const DEFEATED_LORELEI: u16 = 0x4B0;
    pub const DEFEATED_BRUNO: u16 = 0x4B1;
    pub const DEFEATED_AGATHA: u16 = 0x4B2;
    pub const DEFEATED_LANCE: u16 = 0x4B3;
    pub const DEFEATED_CHAMP: u16 = 0x4B4;

    pub const HIDE_SS_ANNE: u16 = 0x298;
    pub const HIDE_HIDEOUT_GIOVANNI: u16 = 0x2A4;
    pub const HIDE_SAFFRON_ROCKETS: u16 = 0x2B0;
    pub const GOT_HM03: u16 = 0x250;
    pub const GOT_POKE_FLUTE: u16 = 0x24C;
}

/// Gym badges: `(key, label, flag id)`.
pub const BADGES: [(&str, &str, u16); 8] = [
    ("badge1", "BOULDER_BADGE", flags::BADGE01_GET),
    ("badge2", "CASCADE_BADGE", flags::BADGE02_GET),
    ("badge3", "THUNDER_BADGE", flags::BADGE03_GET),
    ("badge4", "RAINBOW_BADGE", flags::BADGE04_GET),
    ("badge5", "SOUL_BADGE", flags::BADGE05_GET),
    ("badge6", "MARSH_BADGE", flags::BADGE06_GET),
    ("badge7", "VOLCANO_BADGE", flags::BADGE07_GET),
    ("badge8", "EARTH_BADGE", flags::BADGE08_GET),
];

/// Player avatar state flags (`gPlayerAvatar.flags`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvatarFlags(u8);

bitflags::bitflags! {
    impl AvatarFlags: u8 {
        const ON_FOOT = 1 << 0;
        const MACH_BIKE = 1 << 1;
        const ACRO_BIKE = 1 << 2;
        const SURFING = 1 << 3;
        const UNDERWATER = 1 << 4;
        const CONTROLLABLE = 1 << 5;
        const FORCED_MOVE = 1 << 6;
        const DASH = 1 << 7;
    }
}

impl AvatarFlags {
    #[must_use]
    pub const fn biking(self) -> bool {
        self.intersects(Self::MACH_BIKE.union(Self::ACRO_BIKE))
    }
}

/// Facing nibble of the player object event → compass word.
#[must_use]
pub fn facing_name(raw: u8) -> &'static str {
    match raw & 0x07 {
        1 => "down",
        2 => "up",
        3 => "left",
        4 => "right",
        _ => "unknown",
    }
}

/// Flash radius by flash level, in pixels.
pub const FLASH_LEVEL_TO_RADIUS_PX: [u16; 9] = [200, 72, 64, 56, 48, 40, 32, 24, 0];

/// Map layouts with pyramid-style limited light.
pub const PYRAMID_LAYOUT_IDS: [u16; 2] = [0x0169, 0x016A];

/// Menu classification kinds resolvable from the symbol table, used to
/// populate the dialog dispatch tables (callback2 value → kind, task
/// function → kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuKind {
    Dialog,
    YesNo,
    Multichoice,
    StartMenu,
    BagMenu,
    ItemStorageList,
    ItemStorageMenu,
    PokemonStorage,
    PokemonStoragePcMenu,
    PlayerPcMenu,
    SummaryScreen,
    ShopBuy,
    PartyMenu,
    NamingScreen,
    TitleScreen,
    MainMenu,
    OptionMenu,
    Pokedex,
    FlyMap,
    RegionMap,
    QuestLogRecap,
}

/// Main-callback symbols that uniquely identify a UI state.
const CALLBACK_MENU_SYMBOLS: [(&str, MenuKind); 12] = [
    ("CB2_BagMenuRun", MenuKind::BagMenu),
    ("CB2_PokeStorage", MenuKind::PokemonStorage),
    ("CB2_UpdatePartyMenu", MenuKind::PartyMenu),
    ("CB2_ShowPokemonSummaryScreen", MenuKind::SummaryScreen),
    ("CB2_LoadNamingScreen", MenuKind::NamingScreen),
    ("CB2_TitleScreenRun", MenuKind::TitleScreen),
    ("CB2_MainMenu", MenuKind::MainMenu),
    ("CB2_OptionMenu", MenuKind::OptionMenu),
    ("CB2_OpenPokedexFromStartMenu", MenuKind::Pokedex),
    ("CB2_FlyMap", MenuKind::FlyMap),
    ("CB2_RegionMap", MenuKind::RegionMap),
    ("CB2_QuestLogRecap", MenuKind::QuestLogRecap),
];

/// Task-function symbols that identify menus running over the overworld.
/// `Task_TopMenuHandleInput` style homonyms are resolved `near=` the start
/// menu handler; everything else must be unique.
const TASK_MENU_SYMBOLS: [(&str, MenuKind); 8] = [
    ("Task_StartMenuHandleInput", MenuKind::StartMenu),
    ("Task_YesNoMenu_HandleInput", MenuKind::YesNo),
    ("Task_HandleMultichoiceInput", MenuKind::Multichoice),
    ("Task_BuyMenu", MenuKind::ShopBuy),
    ("Task_ItemStorage_ProcessInput", MenuKind::ItemStorageList),
    ("Task_ItemStorageMenuProcessInput", MenuKind::ItemStorageMenu),
    ("Task_PlayerPcMenu", MenuKind::PlayerPcMenu),
    ("Task_PCMainMenu", MenuKind::PokemonStoragePcMenu),
];

/// Every address the bridge reads, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AddressCatalog {
    // Saveblocks and player state.
    pub save_block1_ptr: u32,
    pub save_block2_ptr: u32,
    pub player_avatar: u32,
    pub object_events: u32,
    pub safari_zone_step_counter: u32,

    // Party and storage.
    pub player_party: u32,
    pub player_party_count: u32,
    pub pokemon_storage_ptr: u32,
    pub bag_pockets: u32,

    // Map model.
    pub map_header: u32,
    pub backup_map_layout: u32,

    // Engine dispatch state.
    pub g_main: u32,
    pub palette_fade: u32,
    pub global_script_context: u32,
    pub lock_field_controls: u32,
    pub tasks: u32,
    pub text_printers: u32,
    pub menu_state: u32,
    pub string_var4: u32,

    // Battle.
    pub battle_mons: u32,
    pub battler_positions: u32,
    pub battler_party_indexes: u32,
    pub absent_battler_flags: u32,
    pub battlers_count: u32,

    // Transition callbacks used by the all-controls-locked heuristic.
    pub cb2_overworld: u32,
    pub cb2_load_map: u32,
    pub cb2_do_change_map: u32,
    pub wait_for_a_or_b_press: u32,
    pub is_field_message_box_hidden: u32,

    // ROM tables.
    pub species_names: u32,
    pub species_info: u32,
    pub move_names: u32,
    pub ability_names: u32,
    pub items: u32,
    pub region_map_entries: u32,
    pub multichoice_lists: u32,

    // Dialog dispatch tables.
    pub callback_menus: Vec<(u32, MenuKind)>,
    pub task_menus: Vec<(u32, MenuKind)>,
}

impl AddressCatalog {
    /// Resolve the whole catalog. Any missing or ambiguous symbol fails the
    /// entire init.
    pub fn resolve(syms: &SymbolTable) -> Result<Self, SchemaError> {
        let start_menu_task = syms.addr("Task_StartMenuHandleInput")?;

        let mut callback_menus = Vec::with_capacity(CALLBACK_MENU_SYMBOLS.len());
        for (name, kind) in CALLBACK_MENU_SYMBOLS {
            callback_menus.push((syms.addr(name)?, kind));
        }

        let mut task_menus = Vec::with_capacity(TASK_MENU_SYMBOLS.len());
        for (name, kind) in TASK_MENU_SYMBOLS {
            // Menu input handlers are frequently static homonyms; anchor
            // them near the start-menu handler rather than guessing.
            let addr = match syms.addr(name) {
                Ok(addr) => addr,
                Err(SchemaError::AmbiguousSymbol { .. }) => {
                    syms.addr_near(name, start_menu_task)?
                }
                Err(err) => return Err(err),
            };
            task_menus.push((addr, kind));
        }

        Ok(Self {
            save_block1_ptr: syms.addr("gSaveBlock1Ptr")?,
            save_block2_ptr: syms.addr("gSaveBlock2Ptr")?,
            player_avatar: syms.addr("gPlayerAvatar")?,
            object_events: syms.addr("gObjectEvents")?,
            safari_zone_step_counter: syms.addr("gSafariZoneStepCounter")?,

            player_party: syms.addr("gPlayerParty")?,
            player_party_count: syms.addr("gPlayerPartyCount")?,
            pokemon_storage_ptr: syms.addr("gPokemonStoragePtr")?,
            bag_pockets: syms.addr("gBagPockets")?,

            map_header: syms.addr("gMapHeader")?,
            backup_map_layout: syms.addr("gBackupMapLayout")?,

            g_main: syms.addr("gMain")?,
            palette_fade: syms.addr("gPaletteFade")?,
            global_script_context: syms.addr_or("sGlobalScriptContext", "sScriptContext1")?,
            lock_field_controls: syms.addr("sLockFieldControls")?,
            tasks: syms.addr("gTasks")?,
            text_printers: syms.addr("sTextPrinters")?,
            menu_state: syms.addr("sMenu")?,
            string_var4: syms.addr("gStringVar4")?,

            battle_mons: syms.addr("gBattleMons")?,
            battler_positions: syms.addr("gBattlerPositions")?,
            battler_party_indexes: syms.addr("gBattlerPartyIndexes")?,
            absent_battler_flags: syms.addr("gAbsentBattlerFlags")?,
            battlers_count: syms.addr("gBattlersCount")?,

            cb2_overworld: syms.addr("CB2_Overworld")?,
            cb2_load_map: syms.addr("CB2_LoadMap")?,
            cb2_do_change_map: syms.addr("CB2_DoChangeMap")?,
            wait_for_a_or_b_press: syms.addr("WaitForAorBPress")?,
            is_field_message_box_hidden: syms.addr("IsFieldMessageBoxHidden")?,

            species_names: syms.addr("gSpeciesNames")?,
            species_info: syms.addr_or("gSpeciesInfo", "gBaseStats")?,
            move_names: syms.addr("gMoveNames")?,
            ability_names: syms.addr("gAbilityNames")?,
            items: syms.addr("gItems")?,
            region_map_entries: syms.addr("gRegionMapEntries")?,
            multichoice_lists: syms.addr_or("sMultichoiceLists", "sScriptMultiChoiceMenus")?,

            callback_menus,
            task_menus,
        })
    }

    /// Kind for a callback2 value, ignoring the thumb bit.
    #[must_use]
    pub fn menu_for_callback(&self, callback2: u32) -> Option<MenuKind> {
        let masked = callback2 & !1;
        self.callback_menus
            .iter()
            .find(|(addr, _)| (addr & !1) == masked)
            .map(|&(_, kind)| kind)
    }

    /// Kind for a task function pointer, ignoring the thumb bit.
    #[must_use]
    pub fn menu_for_task(&self, func: u32) -> Option<MenuKind> {
        let masked = func & !1;
        self.task_menus
            .iter()
            .find(|(addr, _)| (addr & !1) == masked)
            .map(|&(_, kind)| kind)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A synthetic symbol listing covering every catalog entry, with all
    /// addresses spread out so tests can poke unique locations.
    #[must_use]
    pub fn listing() -> String {
        let names = [
            "gSaveBlock1Ptr",
            "gSaveBlock2Ptr",
            "gPlayerAvatar",
            "gObjectEvents",
            "gSafariZoneStepCounter",
            "gPlayerParty",
            "gPlayerPartyCount",
            "gPokemonStoragePtr",
            "gBagPockets",
            "gMapHeader",
            "gBackupMapLayout",
            "gMain",
            "gPaletteFade",
            "sGlobalScriptContext",
            "sLockFieldControls",
            "gTasks",
            "sTextPrinters",
            "sMenu",
            "gStringVar4",
            "gBattleMons",
            "gBattlerPositions",
            "gBattlerPartyIndexes",
            "gAbsentBattlerFlags",
            "gBattlersCount",
            "CB2_Overworld",
            "CB2_LoadMap",
            "CB2_DoChangeMap",
            "WaitForAorBPress",
            "IsFieldMessageBoxHidden",
            "gSpeciesNames",
            "gSpeciesInfo",
            "gMoveNames",
            "gAbilityNames",
            "gItems",
            "gRegionMapEntries",
            "sMultichoiceLists",
            "CB2_BagMenuRun",
            "CB2_PokeStorage",
            "CB2_UpdatePartyMenu",
            "CB2_ShowPokemonSummaryScreen",
            "CB2_LoadNamingScreen",
            "CB2_TitleScreenRun",
            "CB2_MainMenu",
            "CB2_OptionMenu",
            "CB2_OpenPokedexFromStartMenu",
            "CB2_FlyMap",
            "CB2_RegionMap",
            "CB2_QuestLogRecap",
            "Task_StartMenuHandleInput",
            "Task_YesNoMenu_HandleInput",
            "Task_HandleMultichoiceInput",
            "Task_BuyMenu",
            "Task_ItemStorage_ProcessInput",
            "Task_ItemStorageMenuProcessInput",
            "Task_PlayerPcMenu",
            "Task_PCMainMenu",
        ];
        let mut out = String::new();
        for (i, name) in names.iter().enumerate() {
            // 64 KiB apart, far from the zero page.
            let addr = 0x0200_0000u32 + (i as u32) * 0x1_0000;
            out.push_str(&format!("{addr:08X} g 00000004 {name}\n"));
        }
        out
    }

    #[must_use]
    pub fn catalog() -> AddressCatalog {
        let syms = SymbolTable::parse(&listing()).unwrap();
        AddressCatalog::resolve(&syms).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn resolves_full_catalog_from_listing() {
        let catalog = test_support::catalog();
        assert_eq!(catalog.save_block1_ptr, 0x0200_0000);
        assert_eq!(catalog.callback_menus.len(), 12);
        assert_eq!(catalog.task_menus.len(), 8);
    }

    #[test]
    fn missing_symbol_fails_init() {
        let mut listing = test_support::listing();
        listing = listing.replace("gBagPockets", "gSomethingElse");
        let syms = SymbolTable::parse(&listing).unwrap();
        assert_eq!(
            AddressCatalog::resolve(&syms).unwrap_err(),
            SchemaError::MissingSymbol("gBagPockets".to_owned())
        );
    }

    #[test]
    fn homonym_task_symbols_resolve_near_start_menu() {
        let mut listing = test_support::listing();
        // A far-away duplicate of the buy-menu task must not win.
        listing.push_str("08FF0000 l 000000A4 Task_BuyMenu\n");
        let syms = SymbolTable::parse(&listing).unwrap();
        let catalog = AddressCatalog::resolve(&syms).unwrap();
        let buy = catalog
            .task_menus
            .iter()
            .find(|&&(_, kind)| kind == MenuKind::ShopBuy)
            .unwrap()
            .0;
        assert!(buy < 0x08FF_0000);
    }

    #[test]
    fn callback_dispatch_ignores_thumb_bit() {
        let catalog = test_support::catalog();
        let (addr, kind) = catalog.callback_menus[0];
        assert_eq!(catalog.menu_for_callback(addr | 1), Some(kind));
        assert_eq!(catalog.menu_for_callback(0xDEAD_BEEE), None);
    }

    #[test]
    fn facing_names() {
        assert_eq!(facing_name(1), "down");
        assert_eq!(facing_name(2), "up");
        assert_eq!(facing_name(3), "left");
        assert_eq!(facing_name(4), "right");
        assert_eq!(facing_name(0x13), "left");
        assert_eq!(facing_name(7), "unknown");
    }

    #[test]
    fn avatar_flags() {
        let flags = AvatarFlags::from_bits_retain(0b0000_0110);
        assert!(flags.biking());
        assert!(flags.contains(AvatarFlags::MACH_BIKE));
        assert!(!AvatarFlags::SURFING.biking());
    }
}
