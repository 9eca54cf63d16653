use crate::state::{Color, CollectionId, ColorValue, PaletteId};

// Palette-level messages address palettes by id rather than section, since a
// section captured before an insert or delete may point somewhere else after.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    CreateCollectionDialogue,
    CreateCollection(String),
    OpenCollectionDialogue,
    LoadCollection(CollectionId),
    SaveCollection,
    SaveCollectionAsDialogue,
    SaveCollectionAs(String),
    RenameCollectionDialogue,
    RenameCollection(String),
    DeleteCollectionDialogue,
    DeleteCollection,
    SetDialogueText(String),
    HideModal,
    AddPalette,
    RenamePaletteDialogue(PaletteId),
    RenamePalette {
        id: PaletteId,
        name: String,
    },
    DeletePaletteDialogue(PaletteId),
    DeletePalette(PaletteId),
    AddColor(PaletteId),
    SelectColor {
        palette_id: PaletteId,
        row: usize,
    },
    ChangeRed(ColorValue),
    ChangeGreen(ColorValue),
    ChangeBlue(ColorValue),
    ChangeAlpha(ColorValue),
    SetColor {
        palette_id: PaletteId,
        row: usize,
        color: Color,
    },
}
