use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use log::{info, warn};
use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::persist;

pub type ColorValue = u8; // Color component (0-255)
pub type PaletteId = u32; // Unique within its collection
pub type CollectionId = Uuid; // Globally unique, names the collection's file

pub const DEFAULT_PALETTE_TITLE: &str = "Added";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: ColorValue,
    pub green: ColorValue,
    pub blue: ColorValue,
    pub alpha: ColorValue,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const CYAN: Color = Color::rgb(0x00, 0xFF, 0xFF);

    pub const fn rgb(red: ColorValue, green: ColorValue, blue: ColorValue) -> Self {
        Self::rgba(red, green, blue, 0xFF)
    }

    pub const fn rgba(
        red: ColorValue,
        green: ColorValue,
        blue: ColorValue,
        alpha: ColorValue,
    ) -> Self {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    /// Parses `#RRGGBB` or `#RRGGBBAA`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            bail!("invalid color {:?}: expected 6 or 8 hex digits", s);
        }
        let component = |i: usize| -> Result<ColorValue> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid color {:?}", s))
        };
        let alpha = if hex.len() == 8 { component(6)? } else { 0xFF };
        Ok(Color::rgba(component(0)?, component(2)?, component(4)?, alpha))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: PaletteId,
    pub title: String,
    pub colors: Vec<Color>,
}

#[derive(Deserialize)]
struct CollectionFields {
    id: CollectionId,
    title: String,
    palettes: Vec<Palette>,
}

/// A titled, ordered list of palettes. Palette order is section order.
///
/// Index-based operations take the section as it is *now*: any insert or
/// delete invalidates sections obtained before it. Use [`Collection::section_of`]
/// to re-resolve a palette by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "CollectionFields")]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    palettes: Vec<Palette>,
    #[serde(skip)]
    palettes_id_idx_map: HashMap<PaletteId, usize>,
}

impl From<CollectionFields> for Collection {
    fn from(fields: CollectionFields) -> Self {
        let mut collection = Collection {
            id: fields.id,
            title: fields.title,
            palettes: fields.palettes,
            palettes_id_idx_map: HashMap::new(),
        };
        collection.update_palette_index();
        collection
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.title == other.title && self.palettes == other.palettes
    }
}

impl Eq for Collection {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub title: String,
    pub palette_count: usize,
}

impl Collection {
    pub fn new(title: &str) -> Self {
        Collection {
            id: Uuid::new_v4(),
            title: title.to_string(),
            palettes: vec![],
            palettes_id_idx_map: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn count(&self) -> usize {
        self.palettes.len()
    }

    pub fn palette(&self, section: usize) -> Option<&Palette> {
        self.palettes.get(section)
    }

    pub fn palette_id(&self, section: usize) -> Option<PaletteId> {
        self.palette(section).map(|p| p.id)
    }

    pub fn section_of(&self, id: PaletteId) -> Option<usize> {
        self.palettes_id_idx_map.get(&id).copied()
    }

    /// # Panics
    /// If `section` is out of range.
    pub fn number_of_colors(&self, section: usize) -> usize {
        self.palettes[section].colors.len()
    }

    pub fn title_of_palette(&self, section: usize) -> &str {
        &self.palettes[section].title
    }

    pub fn set_title_of_palette(&mut self, section: usize, name: &str) {
        self.palettes[section].title = name.to_string();
    }

    pub fn color_of_palette(&self, section: usize, row: usize) -> Color {
        self.palettes[section].colors[row]
    }

    pub fn set_color_of_palette(&mut self, section: usize, row: usize, color: Color) {
        self.palettes[section].colors[row] = color;
    }

    /// A palette with the default title and colors, and an id not used by
    /// any palette currently in the collection.
    pub fn new_palette(&self) -> Palette {
        let id = match self.palettes.iter().map(|p| p.id).max() {
            None => 0,
            Some(max) => max
                .checked_add(1)
                .unwrap_or_else(|| self.lowest_unused_palette_id()),
        };
        Palette {
            id,
            title: DEFAULT_PALETTE_TITLE.to_string(),
            colors: vec![Color::BLACK, Color::CYAN],
        }
    }

    pub fn add_palette(&mut self, palette: Palette) {
        self.palettes.push(palette);
        self.update_palette_index();
    }

    /// Appends the default color and returns its row.
    pub fn add_color_to_palette(&mut self, section: usize) -> usize {
        let colors = &mut self.palettes[section].colors;
        colors.push(Color::default());
        colors.len() - 1
    }

    /// Removes the palette; every later section shifts down by one.
    pub fn delete_palette(&mut self, section: usize) -> Palette {
        let palette = self.palettes.remove(section);
        self.update_palette_index();
        palette
    }

    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            id: self.id,
            title: self.title.clone(),
            palette_count: self.palettes.len(),
        }
    }

    fn lowest_unused_palette_id(&self) -> PaletteId {
        (0..=PaletteId::MAX)
            .find(|id| !self.palettes_id_idx_map.contains_key(id))
            .unwrap_or(PaletteId::MAX)
    }

    fn update_palette_index(&mut self) {
        self.palettes_id_idx_map.clear();
        for (i, pal) in self.palettes.iter().enumerate() {
            if self.palettes_id_idx_map.insert(pal.id, i).is_some() {
                warn!("Duplicate palette id {} in collection {}", pal.id, self.id);
            }
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub collections_dir: Option<PathBuf>,
    pub last_opened: Option<CollectionId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialogue {
    CreateCollection { title: String },
    OpenCollection { collections: Vec<CollectionSummary> },
    SaveCollectionAs { title: String },
    RenameCollection { title: String },
    DeleteCollection,
    RenamePalette { id: PaletteId, name: String },
    DeletePalette { id: PaletteId },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Uninitialized,
    Ready,
}

pub struct EditorState {
    pub global_config_path: PathBuf,
    pub global_config: GlobalConfig,
    pub collections_dir: PathBuf,

    // The open collection, if any. Reopened through `last_opened` on startup.
    pub collection: Option<Collection>,

    // Short user-facing text about the outcome of the last message.
    pub alert: Option<String>,

    // Temporary editor state:
    pub dialogue: Option<Dialogue>,
    pub selected: Option<(PaletteId, usize)>,
    pub selected_color: Color,
}

impl EditorState {
    pub fn new(
        global_config_path: PathBuf,
        global_config: GlobalConfig,
        collections_dir: PathBuf,
    ) -> Self {
        EditorState {
            global_config_path,
            global_config,
            collections_dir,
            collection: None,
            alert: None,
            dialogue: None,
            selected: None,
            selected_color: Color::default(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        match self.collection {
            Some(_) => EditorMode::Ready,
            None => EditorMode::Uninitialized,
        }
    }

    /// Resolves `last_opened` through the collection files.
    pub fn reopen_last(&mut self) {
        let Some(id) = self.global_config.last_opened else {
            return;
        };
        match persist::get_decoded_collection(&self.collections_dir, id) {
            Some(collection) => {
                info!("Reopened collection \"{}\"", collection.title);
                self.collection = Some(collection);
            }
            None => {
                warn!("Last opened collection {} is unavailable", id);
                self.collection = None;
            }
        }
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "TintThat")
        .context("Unable to open global config directory.")
}

fn get_global_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

fn get_default_collections_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("Collections"))
}

/// Loads the global config and reopens the last collection. Either path may
/// be overridden; an overridden collections directory is not persisted.
pub fn get_initial_state(
    config_path: Option<PathBuf>,
    collections_dir: Option<PathBuf>,
) -> Result<EditorState> {
    let config_path = match config_path {
        Some(p) => p,
        None => get_global_config_path()?,
    };
    let mut editor_state = EditorState::new(config_path, GlobalConfig::default(), PathBuf::new());
    if editor_state.global_config_path.exists() {
        if let Err(e) = persist::load_global_config(&mut editor_state) {
            warn!("Ignoring unreadable global config: {:#}", e);
            editor_state.global_config = GlobalConfig::default();
        }
    }
    editor_state.collections_dir = match collections_dir {
        Some(dir) => dir,
        None => match &editor_state.global_config.collections_dir {
            Some(dir) => dir.clone(),
            None => get_default_collections_dir()?,
        },
    };
    editor_state.reopen_last();
    Ok(editor_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(id: PaletteId, n: usize) -> Palette {
        Palette {
            id,
            title: format!("Palette {id}"),
            colors: vec![Color::rgb(0xFF, 0x00, 0x00); n],
        }
    }

    #[test]
    fn test_parse_color() {
        assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(0xFF, 0x00, 0x00));
        assert_eq!("00ffff".parse::<Color>().unwrap(), Color::CYAN);
        assert_eq!(
            "#11223344".parse::<Color>().unwrap(),
            Color::rgba(0x11, 0x22, 0x33, 0x44)
        );
        assert!("#FFF".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
        assert!("#+F+F+F".parse::<Color>().is_err());
        assert!("#-1FFFF".parse::<Color>().is_err());
        assert!("#ÿÿÿ".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_color() {
        assert_eq!(Color::rgb(0x99, 0x66, 0x33).to_string(), "#996633FF");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_new_collection_is_empty() {
        let c = Collection::new("Vacation");
        assert!(c.is_empty());
        assert_eq!(c.count(), 0);
        assert_eq!(c.title, "Vacation");
    }

    #[test]
    fn test_add_palette() {
        let mut c = Collection::new("Vacation");
        c.add_palette(palette(0, 3));
        assert!(!c.is_empty());
        assert_eq!(c.count(), 1);
        assert_eq!(c.number_of_colors(0), 3);
        assert_eq!(c.section_of(0), Some(0));
    }

    #[test]
    fn test_delete_palette_shifts_later_sections() {
        let mut c = Collection::new("Shift");
        for id in 0..4 {
            c.add_palette(palette(id, 1));
        }
        let removed = c.delete_palette(1);
        assert_eq!(removed.id, 1);
        assert_eq!(c.count(), 3);
        assert_eq!((0..c.count()).map(|s| c.palette_id(s).unwrap()).collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(c.section_of(2), Some(1));
        assert_eq!(c.section_of(3), Some(2));
        assert_eq!(c.section_of(1), None);
    }

    #[test]
    fn test_delete_only_palette() {
        let mut c = Collection::new("One");
        c.add_palette(palette(0, 2));
        c.delete_palette(0);
        assert!(c.is_empty());
        assert_eq!(c.count(), 0);
    }

    #[test]
    fn test_add_color_to_palette() {
        let mut c = Collection::new("Colors");
        c.add_palette(palette(0, 3));
        let row = c.add_color_to_palette(0);
        assert_eq!(row, 3);
        assert_eq!(c.number_of_colors(0), 4);
        assert_eq!(c.color_of_palette(0, row), Color::default());
    }

    #[test]
    fn test_set_color_is_idempotent() {
        let mut c = Collection::new("Idem");
        c.add_palette(palette(0, 2));
        c.set_color_of_palette(0, 1, Color::rgb(0x99, 0x66, 0x33));
        let once = c.clone();
        c.set_color_of_palette(0, 1, Color::rgb(0x99, 0x66, 0x33));
        assert_eq!(c, once);
        assert_eq!(c.color_of_palette(0, 1), Color::rgb(0x99, 0x66, 0x33));
    }

    #[test]
    fn test_set_title_of_palette() {
        let mut c = Collection::new("Titles");
        c.add_palette(palette(0, 1));
        c.set_title_of_palette(0, "Sunset");
        assert_eq!(c.title_of_palette(0), "Sunset");
    }

    #[test]
    fn test_new_palette_ids_are_unique() {
        let mut c = Collection::new("Ids");
        let first = c.new_palette();
        c.add_palette(first);
        let second = c.new_palette();
        assert_eq!(second.id, 1);
        assert_eq!(second.title, "Added");
        assert_eq!(second.colors, vec![Color::BLACK, Color::CYAN]);
        c.add_palette(second);
        c.delete_palette(0);
        assert_eq!(c.new_palette().id, 2);
    }

    #[test]
    fn test_new_palette_after_max_id() {
        let mut c = Collection::new("Ids");
        c.add_palette(palette(0, 1));
        c.add_palette(palette(PaletteId::MAX, 1));
        c.add_palette(palette(1, 1));
        let pal = c.new_palette();
        assert_eq!(pal.id, 2);
        c.add_palette(pal);
        assert_eq!(c.section_of(2), Some(3));
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, b"{ broken").unwrap();
        let state =
            get_initial_state(Some(config_path), Some(dir.path().join("Collections"))).unwrap();
        assert_eq!(state.mode(), EditorMode::Uninitialized);
        assert!(state.global_config.last_opened.is_none());
        assert!(!state.global_config.modified);
    }

    #[test]
    fn test_json_round_trip() {
        let mut c = Collection::new("Round trip");
        c.add_palette(palette(3, 2));
        c.add_palette(Palette {
            id: 7,
            title: String::new(),
            colors: vec![Color::rgba(1, 2, 3, 4), Color::BLACK],
        });
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("palettes_id_idx_map"));
        let decoded: Collection = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, c);
        assert_eq!(decoded.section_of(7), Some(1));
    }
}
