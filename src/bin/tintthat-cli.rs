use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tintthat::{
    message::Message,
    persist,
    state::{self, Color, CollectionId, EditorState, PaletteId},
    update, view,
};

#[derive(Parser, Debug)]
#[command(name = "tintthat-cli", about = "Create, edit, and keep collections of color palettes")]
struct Args {
    /// Global config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding collection files, for this run only
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved collections
    List,
    /// Create a new, empty collection and open it
    New { title: String },
    /// Open a saved collection
    Open { id: CollectionId },
    /// Show the open collection
    Show,
    /// Save the open collection
    Save,
    /// Save a copy of the open collection under a new title and open it
    SaveAs { title: String },
    /// Rename the open collection
    Rename { title: String },
    /// Delete the open collection and its file
    Delete,
    /// Append a palette with the default colors
    AddPalette,
    /// Rename the palette shown in a section
    RenamePalette { section: usize, name: String },
    /// Delete the palette shown in a section
    DeletePalette { section: usize },
    /// Append the default color to a palette
    AddColor { section: usize },
    /// Replace one color, given as #RRGGBB or #RRGGBBAA
    SetColor {
        section: usize,
        row: usize,
        color: Color,
    },
}

fn palette_at(state: &EditorState, section: usize) -> Result<PaletteId> {
    state
        .collection
        .as_ref()
        .context("No collection is open.")?
        .palette_id(section)
        .with_context(|| format!("No palette in section {}.", section))
}

fn to_message(state: &EditorState, command: Command) -> Result<Option<Message>> {
    let message = match command {
        Command::List | Command::Show => return Ok(None),
        Command::New { title } => Message::CreateCollection(title),
        Command::Open { id } => Message::LoadCollection(id),
        Command::Save => Message::SaveCollection,
        Command::SaveAs { title } => Message::SaveCollectionAs(title),
        Command::Rename { title } => Message::RenameCollection(title),
        Command::Delete => Message::DeleteCollection,
        Command::AddPalette => Message::AddPalette,
        Command::RenamePalette { section, name } => Message::RenamePalette {
            id: palette_at(state, section)?,
            name,
        },
        Command::DeletePalette { section } => Message::DeletePalette(palette_at(state, section)?),
        Command::AddColor { section } => Message::AddColor(palette_at(state, section)?),
        Command::SetColor {
            section,
            row,
            color,
        } => Message::SetColor {
            palette_id: palette_at(state, section)?,
            row,
            color,
        },
    };
    Ok(Some(message))
}

fn list(state: &EditorState) -> Result<()> {
    let summaries = persist::list_collections(&state.collections_dir)?;
    if summaries.is_empty() {
        println!("No collections in {}", state.collections_dir.display());
    }
    let open_id = state.collection.as_ref().map(|c| c.id);
    for s in summaries {
        let marker = if Some(s.id) == open_id { "*" } else { " " };
        println!("{} {}  {} ({} palettes)", marker, s.id, s.title, s.palette_count);
    }
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut state = state::get_initial_state(args.config, args.data_dir)?;

    if let Command::List = args.command {
        return list(&state);
    }
    if let Some(message) = to_message(&state, args.command)? {
        let updates = update::update(&mut state, message);
        info!("Table updates: {:?}", updates);
    }
    if let Some(alert) = &state.alert {
        println!("{}", alert);
    }
    print!("{}", view::render_text(&state, &view::layout(&state)));
    persist::save_global_config(&mut state)?;
    Ok(())
}
