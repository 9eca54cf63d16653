// Table presentation of the editor: one section per palette, one row per color.
mod collection;
mod palette;

use collection::{
    create_collection_view, delete_collection_view, open_collection_view, rename_collection_view,
    save_collection_as_view, toolbar_view,
};
use iced::{
    widget::{
        center, column, container, mouse_area, opaque, scrollable, stack, text, Column,
    },
    Element, Length, Theme,
};
use itertools::Itertools;
use palette::{color_editor_view, delete_palette_view, rename_palette_view, section_view};

use crate::{
    message::Message,
    state::{Color, Dialogue, EditorState, PaletteId},
};

pub const EMPTY_COLLECTION_TEXT: &str = "Empty";
pub const NO_COLLECTION_TEXT: &str = "Create or load a collection";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty(&'static str),
    Color { row: usize, color: Color },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub palette_id: Option<PaletteId>,
    pub header: Option<String>,
    pub cells: Vec<Cell>,
    pub footer: bool,
}

/// Structural changes that bring a table showing the previous state in line
/// with the current one. Sections and rows are in the coordinates of the
/// table at the moment the update is applied, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableUpdate {
    InsertSection(usize),
    DeleteSection(usize),
    ReloadSection(usize),
    InsertRow { section: usize, row: usize },
    ReloadRow { section: usize, row: usize },
    ReloadAll,
}

fn placeholder(text: &'static str) -> Vec<SectionView> {
    vec![SectionView {
        palette_id: None,
        header: None,
        cells: vec![Cell::Empty(text)],
        footer: false,
    }]
}

pub fn layout(state: &EditorState) -> Vec<SectionView> {
    let collection = match &state.collection {
        Some(c) => c,
        None => return placeholder(NO_COLLECTION_TEXT),
    };
    if collection.is_empty() {
        return placeholder(EMPTY_COLLECTION_TEXT);
    }
    (0..collection.count())
        .map(|section| SectionView {
            palette_id: collection.palette_id(section),
            header: Some(collection.title_of_palette(section).to_string()),
            cells: (0..collection.number_of_colors(section))
                .map(|row| Cell::Color {
                    row,
                    color: collection.color_of_palette(section, row),
                })
                .collect(),
            footer: true,
        })
        .collect()
}

/// Renders the table as plain text, colors as `#RRGGBBAA`.
pub fn render_text(state: &EditorState, sections: &[SectionView]) -> String {
    let title = state
        .collection
        .as_ref()
        .map(|c| format!("{} ({})\n", c.title, c.id))
        .unwrap_or_default();
    let body = sections
        .iter()
        .enumerate()
        .map(|(section, view)| {
            let mut lines = vec![];
            if let Some(header) = &view.header {
                lines.push(format!("[{}] {}", section, header));
            }
            lines.extend(view.cells.iter().map(|cell| match cell {
                Cell::Empty(text) => format!("  {}", text),
                Cell::Color { row, color } => format!("  {:>3}  {}", row, color),
            }));
            if view.footer {
                lines.push(format!("  {}", "-".repeat(16)));
            }
            lines.join("\n") + "\n"
        })
        .join("\n");
    title + &body
}

fn modal<'a, Message>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| {
                container::Style {
                    background: Some(
                        iced::Color {
                            a: 0.5,
                            ..iced::Color::BLACK
                        }
                        .into(),
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}

pub fn modal_background_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.base.color.into()),
        border: iced::border::rounded(4)
            .color(palette.background.weak.color)
            .width(1.0),
        ..container::Style::default()
    }
}

pub fn view_dialogue<'a>(
    state: &'a EditorState,
    main_view: Element<'a, Message>,
) -> Element<'a, Message> {
    let Some(dialogue) = &state.dialogue else {
        return main_view;
    };
    let content = match dialogue {
        Dialogue::CreateCollection { title } => create_collection_view(title),
        Dialogue::OpenCollection { collections } => open_collection_view(collections),
        Dialogue::SaveCollectionAs { title } => save_collection_as_view(title),
        Dialogue::RenameCollection { title } => rename_collection_view(title),
        Dialogue::DeleteCollection => delete_collection_view(state),
        Dialogue::RenamePalette { id, name } => rename_palette_view(*id, name),
        Dialogue::DeletePalette { id } => delete_palette_view(state, *id),
    };
    modal(main_view, content, Message::HideModal)
}

pub fn view(state: &EditorState) -> Element<Message> {
    let mut table: Column<Message> = Column::new().spacing(16);
    for section in layout(state) {
        table = table.push(section_view(state, section));
    }

    let mut main_view = column![toolbar_view(state)].padding(10).spacing(10);
    if state.selected.is_some() {
        main_view = main_view.push(color_editor_view(state));
    }
    main_view = main_view.push(scrollable(table).height(Length::Fill));
    if let Some(alert) = &state.alert {
        main_view = main_view.push(text(alert.as_str()));
    }

    let main_view: Element<Message> = container(main_view)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();
    view_dialogue(state, main_view)
}
