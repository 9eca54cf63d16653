use iced::{Task, Theme};
use log::{debug, error};
use tintthat::{
    message::Message,
    persist,
    state::{self, EditorState},
    update, view,
};

fn theme(_state: &EditorState) -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

fn update(state: &mut EditorState, message: Message) -> Task<Message> {
    let focus_text = matches!(
        message,
        Message::CreateCollectionDialogue
            | Message::SaveCollectionAsDialogue
            | Message::RenameCollectionDialogue
            | Message::RenamePaletteDialogue(_)
    );
    let updates = update::update(state, message);
    debug!("Table updates: {:?}", updates);
    if let Err(e) = persist::save_global_config(state) {
        error!("Error saving global config: {}\n{}", e, e.backtrace());
    }
    if focus_text && state.dialogue.is_some() {
        return iced::widget::text_input::focus("DialogueText");
    }
    Task::none()
}

fn initial_state() -> (EditorState, Task<Message>) {
    match state::get_initial_state(None, None) {
        Ok(state) => (state, Task::none()),
        Err(e) => {
            error!("Error initializing editor: {}\n{}", e, e.backtrace());
            std::process::exit(1);
        }
    }
}

pub fn main() -> iced::Result {
    env_logger::init();
    iced::application("TintThat", update, view::view)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .theme(theme)
        .run_with(initial_state)
}
