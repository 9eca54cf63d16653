use log::{error, info, warn};
use uuid::Uuid;

use crate::{
    message::Message,
    persist,
    state::{Collection, Color, Dialogue, EditorMode, EditorState, PaletteId},
    view::TableUpdate,
};

const NOT_SAVED: &str = "Not saved, try again!";

/// Applies `message` to the editor. Every change to the open collection is
/// written through to disk before this returns. The result lists the table
/// changes needed to go from the old layout to the new one.
pub fn update(state: &mut EditorState, message: Message) -> Vec<TableUpdate> {
    state.alert = None;
    let updates = apply(state, message);
    clear_stale_selection(state);
    updates
}

fn apply(state: &mut EditorState, message: Message) -> Vec<TableUpdate> {
    match message {
        Message::CreateCollectionDialogue => {
            state.dialogue = Some(Dialogue::CreateCollection {
                title: String::new(),
            });
            vec![]
        }
        Message::OpenCollectionDialogue => {
            match persist::list_collections(&state.collections_dir) {
                Ok(collections) => {
                    state.dialogue = Some(Dialogue::OpenCollection { collections });
                }
                Err(e) => {
                    error!("Error listing collections: {}\n{}", e, e.backtrace());
                    alert(state, "Collections not available");
                }
            }
            vec![]
        }
        Message::SaveCollectionAsDialogue => {
            if require_open(state) {
                state.dialogue = Some(Dialogue::SaveCollectionAs {
                    title: String::new(),
                });
            }
            vec![]
        }
        Message::RenameCollectionDialogue => {
            if require_open(state) {
                let title = state
                    .collection
                    .as_ref()
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                state.dialogue = Some(Dialogue::RenameCollection { title });
            }
            vec![]
        }
        Message::DeleteCollectionDialogue => {
            if require_open(state) {
                state.dialogue = Some(Dialogue::DeleteCollection);
            }
            vec![]
        }
        Message::SetDialogueText(text) => {
            match &mut state.dialogue {
                Some(Dialogue::CreateCollection { title })
                | Some(Dialogue::SaveCollectionAs { title })
                | Some(Dialogue::RenameCollection { title })
                | Some(Dialogue::RenamePalette { name: title, .. }) => {
                    *title = text;
                }
                _ => {}
            }
            vec![]
        }
        Message::HideModal => {
            state.dialogue = None;
            vec![]
        }
        Message::CreateCollection(title) => {
            let Some(title) = valid_title(state, &title) else {
                return vec![];
            };
            info!("Creating collection \"{}\"", title);
            open_collection(state, Collection::new(&title));
            state.dialogue = None;
            if save_collection(state) {
                alert(state, "Created");
            } else {
                alert(state, "Not created, try again!");
            }
            vec![TableUpdate::ReloadAll]
        }
        Message::LoadCollection(id) => {
            match persist::get_decoded_collection(&state.collections_dir, id) {
                Some(collection) => {
                    info!("Opening collection \"{}\"", collection.title);
                    open_collection(state, collection);
                    state.dialogue = None;
                    vec![TableUpdate::ReloadAll]
                }
                None => {
                    warn!("Collection {} not found.", id);
                    alert(state, "Collection not found");
                    vec![]
                }
            }
        }
        Message::SaveCollection => {
            if require_open(state) && save_collection(state) {
                alert(state, "Saved");
            }
            vec![]
        }
        Message::SaveCollectionAs(title) => {
            if !require_open(state) {
                return vec![];
            }
            let Some(title) = valid_title(state, &title) else {
                return vec![];
            };
            let Some(mut copy) = state.collection.clone() else {
                return vec![];
            };
            copy.id = Uuid::new_v4();
            copy.title = title;
            if let Err(e) = persist::save_collection(&state.collections_dir, &copy) {
                error!("Error saving collection: {}\n{}", e, e.backtrace());
                alert(state, NOT_SAVED);
                return vec![];
            }
            open_collection(state, copy);
            state.dialogue = None;
            alert(state, "Saved");
            vec![]
        }
        Message::RenameCollection(title) => {
            if !require_open(state) {
                return vec![];
            }
            let Some(title) = valid_title(state, &title) else {
                return vec![];
            };
            if let Some(collection) = state.collection.as_mut() {
                collection.title = title;
            }
            state.dialogue = None;
            if save_collection(state) {
                alert(state, "Renamed");
            }
            vec![]
        }
        Message::DeleteCollection => {
            let Some(id) = state.collection.as_ref().map(|c| c.id) else {
                warn!("No collection is open.");
                alert(state, "No collection is open");
                return vec![];
            };
            if let Err(e) = persist::delete_collection_file(&state.collections_dir, id) {
                error!("Error deleting collection file: {}\n{}", e, e.backtrace());
                alert(state, "Not deleted, try again!");
                return vec![];
            }
            if state.global_config.last_opened == Some(id) {
                state.global_config.last_opened = None;
                state.global_config.modified = true;
                save_global_config(state);
            }
            state.collection = None;
            state.selected = None;
            state.dialogue = None;
            alert(state, "Deleted");
            vec![TableUpdate::ReloadAll]
        }
        Message::AddPalette => {
            if state.mode() == EditorMode::Uninitialized {
                info!("No collection is open, not adding a palette.");
                return vec![];
            }
            let Some(collection) = state.collection.as_mut() else {
                return vec![];
            };
            let was_empty = collection.is_empty();
            let pal = collection.new_palette();
            collection.add_palette(pal);
            let section = collection.count() - 1;
            if save_collection(state) {
                alert(state, "Added");
            }
            if was_empty {
                // The placeholder section goes away.
                vec![TableUpdate::ReloadAll]
            } else {
                vec![TableUpdate::InsertSection(section)]
            }
        }
        Message::RenamePaletteDialogue(id) => {
            let Some(section) = resolve_section(state, id) else {
                return vec![];
            };
            let name = state
                .collection
                .as_ref()
                .map(|c| c.title_of_palette(section).to_string())
                .unwrap_or_default();
            state.dialogue = Some(Dialogue::RenamePalette { id, name });
            vec![]
        }
        Message::DeletePaletteDialogue(id) => {
            if resolve_section(state, id).is_some() {
                state.dialogue = Some(Dialogue::DeletePalette { id });
            }
            vec![]
        }
        Message::RenamePalette { id, name } => {
            let Some(section) = resolve_section(state, id) else {
                return vec![];
            };
            let Some(name) = valid_title(state, &name) else {
                return vec![];
            };
            if let Some(collection) = state.collection.as_mut() {
                collection.set_title_of_palette(section, &name);
            }
            state.dialogue = None;
            save_collection(state);
            vec![TableUpdate::ReloadSection(section)]
        }
        Message::DeletePalette(id) => {
            let Some(section) = resolve_section(state, id) else {
                return vec![];
            };
            let Some(collection) = state.collection.as_mut() else {
                return vec![];
            };
            collection.delete_palette(section);
            let now_empty = collection.is_empty();
            state.dialogue = None;
            save_collection(state);
            if now_empty {
                vec![TableUpdate::ReloadAll]
            } else {
                vec![TableUpdate::DeleteSection(section)]
            }
        }
        Message::AddColor(id) => {
            let Some(section) = resolve_section(state, id) else {
                return vec![];
            };
            let Some(collection) = state.collection.as_mut() else {
                return vec![];
            };
            let row = collection.add_color_to_palette(section);
            save_collection(state);
            vec![TableUpdate::InsertRow { section, row }]
        }
        Message::SelectColor { palette_id, row } => {
            let Some(section) = resolve_section(state, palette_id) else {
                return vec![];
            };
            let Some(collection) = state.collection.as_ref() else {
                return vec![];
            };
            if row < collection.number_of_colors(section) {
                state.selected_color = collection.color_of_palette(section, row);
                state.selected = Some((palette_id, row));
            }
            vec![]
        }
        Message::ChangeRed(c) => change_selected_color(state, |color| color.red = c),
        Message::ChangeGreen(c) => change_selected_color(state, |color| color.green = c),
        Message::ChangeBlue(c) => change_selected_color(state, |color| color.blue = c),
        Message::ChangeAlpha(c) => change_selected_color(state, |color| color.alpha = c),
        Message::SetColor {
            palette_id,
            row,
            color,
        } => {
            let Some(section) = resolve_section(state, palette_id) else {
                return vec![];
            };
            let Some(collection) = state.collection.as_mut() else {
                return vec![];
            };
            if row >= collection.number_of_colors(section) {
                warn!("Palette {} has no color at row {}.", palette_id, row);
                alert(state, "Color not found");
                return vec![];
            }
            collection.set_color_of_palette(section, row, color);
            save_collection(state);
            vec![TableUpdate::ReloadRow { section, row }]
        }
    }
}

fn change_selected_color(
    state: &mut EditorState,
    edit: impl FnOnce(&mut Color),
) -> Vec<TableUpdate> {
    let Some((palette_id, row)) = state.selected else {
        return vec![];
    };
    let mut color = state.selected_color;
    edit(&mut color);
    state.selected_color = color;
    apply(
        state,
        Message::SetColor {
            palette_id,
            row,
            color,
        },
    )
}

fn clear_stale_selection(state: &mut EditorState) {
    let Some((palette_id, row)) = state.selected else {
        return;
    };
    let valid = state.collection.as_ref().is_some_and(|c| {
        c.section_of(palette_id)
            .is_some_and(|section| row < c.number_of_colors(section))
    });
    if !valid {
        state.selected = None;
    }
}

fn alert(state: &mut EditorState, text: &str) {
    state.alert = Some(text.to_string());
}

fn valid_title(state: &mut EditorState, title: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        warn!("Empty title is invalid.");
        alert(state, "Title can't be empty");
        return None;
    }
    Some(title.to_string())
}

fn require_open(state: &mut EditorState) -> bool {
    if state.collection.is_none() {
        warn!("No collection is open.");
        alert(state, "No collection is open");
        return false;
    }
    true
}

fn resolve_section(state: &mut EditorState, id: PaletteId) -> Option<usize> {
    let section = state.collection.as_ref().and_then(|c| c.section_of(id));
    if section.is_none() {
        warn!("Palette {} not found.", id);
        alert(state, "Palette not found");
    }
    section
}

/// Writes the whole open collection. In-memory state is kept on failure.
fn save_collection(state: &mut EditorState) -> bool {
    let Some(collection) = &state.collection else {
        return false;
    };
    if let Err(e) = persist::save_collection(&state.collections_dir, collection) {
        error!("Error saving collection: {}\n{}", e, e.backtrace());
        alert(state, NOT_SAVED);
        return false;
    }
    true
}

fn save_global_config(state: &mut EditorState) {
    if let Err(e) = persist::save_global_config(state) {
        error!("Error saving global config: {}\n{}", e, e.backtrace());
    }
}

fn open_collection(state: &mut EditorState, collection: Collection) {
    state.global_config.last_opened = Some(collection.id);
    state.global_config.modified = true;
    state.collection = Some(collection);
    state.selected = None;
    save_global_config(state);
}
