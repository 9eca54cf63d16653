use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use json_pretty_compact::PrettyCompactFormatter;
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::state::{Collection, CollectionId, CollectionSummary, EditorState};

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)
        .with_context(|| format!("Unable to encode {}", path.display()))?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;

    // Write beside the target and rename over it, so a failed write never
    // leaves a truncated file behind.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &data_bytes)
        .with_context(|| format!("Unable to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Unable to replace {}", path.display()))?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)
        .with_context(|| format!("Unable to decode {}", path.display()))?;
    Ok(data)
}

pub fn load_global_config(state: &mut EditorState) -> Result<()> {
    state.global_config = load_json(&state.global_config_path)?;
    Ok(())
}

pub fn save_global_config(state: &mut EditorState) -> Result<()> {
    if state.global_config.modified {
        save_json(&state.global_config_path, &state.global_config)?;
        state.global_config.modified = false;
    }
    Ok(())
}

pub fn collection_path(dir: &Path, id: CollectionId) -> PathBuf {
    dir.join(format!("{}.json", id))
}

pub fn save_collection(dir: &Path, collection: &Collection) -> Result<()> {
    save_json(&collection_path(dir, collection.id), collection)
}

pub fn load_collection(dir: &Path, id: CollectionId) -> Result<Collection> {
    let collection: Collection = load_json(&collection_path(dir, id))?;
    anyhow::ensure!(
        collection.id == id,
        "collection file for {} contains id {}",
        id,
        collection.id
    );
    Ok(collection)
}

/// Reads the collection stored under `id`. Missing and corrupt files both
/// come back as `None`.
pub fn get_decoded_collection(dir: &Path, id: CollectionId) -> Option<Collection> {
    let path = collection_path(dir, id);
    if !path.exists() {
        info!("No collection file at {}", path.display());
        return None;
    }
    match load_collection(dir, id) {
        Ok(collection) => Some(collection),
        Err(e) => {
            warn!("Error loading collection {}: {:#}", id, e);
            None
        }
    }
}

pub fn delete_collection_file(dir: &Path, id: CollectionId) -> Result<()> {
    let path = collection_path(dir, id);
    info!("Deleting {}", path.display());
    fs::remove_file(&path).with_context(|| format!("Unable to delete {}", path.display()))?;
    Ok(())
}

pub fn list_collections(dir: &Path) -> Result<Vec<CollectionSummary>> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let pattern = format!("{}/*.json", glob::Pattern::escape(&dir.display().to_string()));
    let mut summaries = vec![];
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| CollectionId::parse_str(stem).ok());
        let Some(id) = id else {
            warn!("Skipping {}: not named by a collection id", path.display());
            continue;
        };
        match load_collection(dir, id) {
            Ok(collection) => summaries.push(collection.summary()),
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(summaries
        .into_iter()
        .sorted_by(|x, y| x.title.cmp(&y.title).then(x.id.cmp(&y.id)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Color, GlobalConfig, Palette};

    fn sample(title: &str) -> Collection {
        let mut c = Collection::new(title);
        c.add_palette(Palette {
            id: 0,
            title: "Beach".to_string(),
            colors: vec![Color::CYAN, Color::rgba(250, 230, 180, 200)],
        });
        let pal = c.new_palette();
        c.add_palette(pal);
        c
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let c = sample("Vacation");
        save_collection(dir.path(), &c).unwrap();
        assert_eq!(get_decoded_collection(dir.path(), c.id), Some(c.clone()));
        assert!(!dir.path().join(format!("{}.json.tmp", c.id)).exists());

        delete_collection_file(dir.path(), c.id).unwrap();
        assert_eq!(get_decoded_collection(dir.path(), c.id), None);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = sample("Before");
        save_collection(dir.path(), &c).unwrap();
        c.title = "After".to_string();
        c.delete_palette(0);
        save_collection(dir.path(), &c).unwrap();
        let loaded = get_decoded_collection(dir.path(), c.id).unwrap();
        assert_eq!(loaded.title, "After");
        assert_eq!(loaded.count(), 1);
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let c = sample("Corrupt");
        fs::write(collection_path(dir.path(), c.id), b"{ not json").unwrap();
        assert_eq!(get_decoded_collection(dir.path(), c.id), None);
    }

    #[test]
    fn test_mismatched_id_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let c = sample("Moved");
        let other = Collection::new("Other");
        let data = serde_json::to_vec(&c).unwrap();
        fs::write(collection_path(dir.path(), other.id), data).unwrap();
        assert_eq!(get_decoded_collection(dir.path(), other.id), None);
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(delete_collection_file(dir.path(), Collection::new("x").id).is_err());
    }

    #[test]
    fn test_list_collections() {
        let dir = tempfile::tempdir().unwrap();
        let b = sample("Beta");
        let a = sample("Alpha");
        save_collection(dir.path(), &b).unwrap();
        save_collection(dir.path(), &a).unwrap();
        fs::write(dir.path().join("broken.json"), b"[]").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let list = list_collections(dir.path()).unwrap();
        assert_eq!(list, vec![a.summary(), b.summary()]);
        assert_eq!(list[0].palette_count, 2);
    }

    #[test]
    fn test_listed_collections_can_be_opened() {
        let dir = tempfile::tempdir().unwrap();
        let kept = sample("Kept");
        save_collection(dir.path(), &kept).unwrap();
        // Same content under another file name: listed nowhere, since it
        // cannot be opened by its name.
        let other = Collection::new("Other");
        fs::copy(
            collection_path(dir.path(), kept.id),
            collection_path(dir.path(), other.id),
        )
        .unwrap();

        let list = list_collections(dir.path()).unwrap();
        assert_eq!(list, vec![kept.summary()]);
        for summary in list {
            assert!(get_decoded_collection(dir.path(), summary.id).is_some());
        }
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_collections(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_global_config_saved_only_when_modified() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config").join("config.json");
        let mut state = EditorState::new(
            config_path.clone(),
            GlobalConfig::default(),
            dir.path().join("Collections"),
        );
        save_global_config(&mut state).unwrap();
        assert!(!config_path.exists());

        let id = Collection::new("x").id;
        state.global_config.last_opened = Some(id);
        state.global_config.modified = true;
        save_global_config(&mut state).unwrap();
        assert!(!state.global_config.modified);

        state.global_config = GlobalConfig::default();
        load_global_config(&mut state).unwrap();
        assert_eq!(state.global_config.last_opened, Some(id));
    }
}
