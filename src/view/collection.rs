use iced::{
    alignment::Vertical,
    widget::{button, column, container, horizontal_space, row, scrollable, text, text_input, Column},
    Element, Length,
};

use crate::{
    message::Message,
    state::{CollectionSummary, EditorMode, EditorState},
};

use super::modal_background_style;

pub fn toolbar_view(state: &EditorState) -> Element<Message> {
    let ready = state.mode() == EditorMode::Ready;
    let when_ready = |msg: Message| if ready { Some(msg) } else { None };
    let title = state
        .collection
        .as_ref()
        .map(|c| c.title.as_str())
        .unwrap_or("");
    row![
        text(title).size(22),
        horizontal_space(),
        button(text("New")).on_press(Message::CreateCollectionDialogue),
        button(text("Open")).on_press(Message::OpenCollectionDialogue),
        button(text("Save")).on_press_maybe(when_ready(Message::SaveCollection)),
        button(text("Save as")).on_press_maybe(when_ready(Message::SaveCollectionAsDialogue)),
        button(text("\u{F4CB}").font(iced_fonts::BOOTSTRAP_FONT))
            .on_press_maybe(when_ready(Message::RenameCollectionDialogue)),
        button(text("Delete"))
            .style(button::danger)
            .on_press_maybe(when_ready(Message::DeleteCollectionDialogue)),
        button(text("\u{F64D}").font(iced_fonts::BOOTSTRAP_FONT))
            .style(button::success)
            .on_press_maybe(when_ready(Message::AddPalette)),
    ]
    .spacing(10)
    .align_y(Vertical::Center)
    .into()
}

fn title_dialogue_view<'a>(
    prompt: &'a str,
    title: &'a str,
    action: &'a str,
    submit: Message,
) -> Element<'a, Message> {
    container(
        column![
            text(prompt),
            text_input("", title)
                .id("DialogueText")
                .on_input(Message::SetDialogueText)
                .on_submit(submit.clone())
                .padding(5),
            button(text(action)).style(button::success).on_press(submit),
        ]
        .spacing(10),
    )
    .width(350)
    .padding(25)
    .style(modal_background_style)
    .into()
}

pub fn create_collection_view(title: &str) -> Element<Message> {
    title_dialogue_view(
        "Select a title for the new collection",
        title,
        "Create collection",
        Message::CreateCollection(title.to_string()),
    )
}

pub fn save_collection_as_view(title: &str) -> Element<Message> {
    title_dialogue_view(
        "Save a copy of the collection as",
        title,
        "Save collection",
        Message::SaveCollectionAs(title.to_string()),
    )
}

pub fn rename_collection_view(title: &str) -> Element<Message> {
    title_dialogue_view(
        "Rename collection",
        title,
        "Rename collection",
        Message::RenameCollection(title.to_string()),
    )
}

pub fn open_collection_view(collections: &[CollectionSummary]) -> Element<Message> {
    let mut col: Column<Message> = Column::new().spacing(5);
    if collections.is_empty() {
        col = col.push(text("No saved collections"));
    }
    for summary in collections {
        col = col.push(
            button(text(format!(
                "{} ({} palettes)",
                summary.title, summary.palette_count
            )))
            .style(button::secondary)
            .width(Length::Fill)
            .on_press(Message::LoadCollection(summary.id)),
        );
    }
    container(column![text("Open collection"), scrollable(col).height(300)].spacing(10))
        .width(350)
        .padding(25)
        .style(modal_background_style)
        .into()
}

pub fn delete_collection_view(state: &EditorState) -> Element<Message> {
    let title = state
        .collection
        .as_ref()
        .map(|c| c.title.as_str())
        .unwrap_or("");
    container(
        column![
            text(format!("Delete collection \"{}\"?", title)),
            text("This removes its file and cannot be undone."),
            button(text("Delete collection"))
                .style(button::danger)
                .on_press(Message::DeleteCollection),
        ]
        .spacing(10),
    )
    .width(350)
    .padding(25)
    .style(modal_background_style)
    .into()
}
