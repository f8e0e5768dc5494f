use std::path::Path;

use crate::chara::CharaDocument;
use crate::error::Error;
use crate::save::SaveDocument;
use crate::scene::SceneDocument;

use super::error::{CoreError, CoreErrorCode};
use super::types::{BlockEntry, FileKind, ObjectCount, Snapshot};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadedDocument {
    Chara(Box<CharaDocument>),
    Scene(Box<SceneDocument>),
    Save(Box<SaveDocument>),
}

#[derive(Debug, Clone)]
pub struct Session {
    kind: FileKind,
    document: LoadedDocument,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<FileKind>,
    ) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();

        if let Some(kind) = hint {
            return parse_as(kind, bytes).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Parse,
                    format!("failed to parse as {}: {e}", kind.name()),
                )
            });
        }

        let mut parsed = Vec::new();
        let mut failures = Vec::new();
        for kind in FileKind::ALL {
            match parse_as(kind, bytes) {
                Ok(session) => parsed.push(session),
                Err(e) => failures.push(format!("{}: {e}", kind.name())),
            }
        }

        match parsed.len() {
            0 => Err(CoreError::new(
                CoreErrorCode::Parse,
                format!("failed to parse input: {}", failures.join("; ")),
            )),
            1 => Ok(parsed.remove(0)),
            _ => {
                let kinds: Vec<_> = parsed.iter().map(|s| s.kind.name()).collect();
                Err(CoreError::new(
                    CoreErrorCode::KindDetectionAmbiguous,
                    format!(
                        "input parsed as {}; supply a file kind hint",
                        kinds.join(" and ")
                    ),
                ))
            }
        }
    }

    pub fn open_path(
        &self,
        path: impl AsRef<Path>,
        hint: Option<FileKind>,
    ) -> Result<Session, CoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        self.open_bytes(bytes, hint)
    }
}

impl Session {
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn document(&self) -> &LoadedDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut LoadedDocument {
        &mut self.document
    }

    pub fn chara(&self) -> Option<&CharaDocument> {
        match &self.document {
            LoadedDocument::Chara(doc) => Some(doc.as_ref()),
            _ => None,
        }
    }

    pub fn scene(&self) -> Option<&SceneDocument> {
        match &self.document {
            LoadedDocument::Scene(doc) => Some(doc.as_ref()),
            _ => None,
        }
    }

    pub fn save(&self) -> Option<&SaveDocument> {
        match &self.document {
            LoadedDocument::Save(doc) => Some(doc.as_ref()),
            _ => None,
        }
    }

    pub fn chara_mut(&mut self) -> Result<&mut CharaDocument, CoreError> {
        match &mut self.document {
            LoadedDocument::Chara(doc) => Ok(doc.as_mut()),
            _ => Err(CoreError::new(
                CoreErrorCode::UnsupportedOperation,
                format!("a {} file has no top-level character", self.kind.name()),
            )),
        }
    }

    /// Summary computed from the current state of the document.
    pub fn snapshot(&self) -> Snapshot {
        match &self.document {
            LoadedDocument::Chara(doc) => chara_snapshot(doc),
            LoadedDocument::Scene(doc) => scene_snapshot(doc),
            LoadedDocument::Save(doc) => save_snapshot(doc),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let bytes = match &self.document {
            LoadedDocument::Chara(doc) => doc.to_bytes(),
            LoadedDocument::Scene(doc) => doc.to_bytes(),
            LoadedDocument::Save(doc) => doc.to_bytes(),
        };
        bytes.map_err(CoreError::from)
    }

    /// Re-encode and decode the document, reporting whether a second encode
    /// reproduces the first byte for byte.
    pub fn verify_round_trip(&self) -> Result<bool, CoreError> {
        let first = self.to_bytes()?;
        let reloaded = parse_as(self.kind, &first).map_err(CoreError::from)?;
        Ok(reloaded.to_bytes()? == first)
    }
}

fn parse_as(kind: FileKind, bytes: &[u8]) -> Result<Session, Error> {
    let document = match kind {
        FileKind::Chara => LoadedDocument::Chara(Box::new(CharaDocument::load(bytes)?)),
        FileKind::Scene => LoadedDocument::Scene(Box::new(SceneDocument::load(bytes)?)),
        FileKind::Save => LoadedDocument::Save(Box::new(SaveDocument::load(bytes)?)),
    };
    Ok(Session { kind, document })
}

fn block_entries(doc: &CharaDocument) -> Vec<BlockEntry> {
    let mut storage_index = vec![0; doc.blocks.len()];
    for (position, &index) in doc.storage_order.iter().enumerate() {
        if let Some(slot) = storage_index.get_mut(index) {
            *slot = position;
        }
    }

    doc.blocks
        .iter()
        .zip(storage_index)
        .map(|(block, storage_index)| BlockEntry {
            name: block.name.clone(),
            version: block.version.clone(),
            kind: block.data.kind_name().to_string(),
            storage_index,
        })
        .collect()
}

fn chara_snapshot(doc: &CharaDocument) -> Snapshot {
    Snapshot {
        has_thumbnail: doc.png.is_some(),
        character_name: doc.full_name(),
        blocks: block_entries(doc),
        ..Snapshot::empty(FileKind::Chara, doc.version.as_str())
    }
}

fn scene_snapshot(doc: &SceneDocument) -> Snapshot {
    Snapshot {
        has_thumbnail: true,
        object_count: doc.object_count(),
        objects_by_kind: doc
            .counts_by_kind()
            .into_iter()
            .map(|(kind, count)| ObjectCount {
                kind: kind.to_string(),
                count,
            })
            .collect(),
        ..Snapshot::empty(FileKind::Scene, doc.version.as_str())
    }
}

fn save_snapshot(doc: &SaveDocument) -> Snapshot {
    Snapshot {
        has_thumbnail: doc.player.chara.png.is_some(),
        character_name: doc.player.chara.full_name(),
        blocks: block_entries(&doc.player.chara),
        school_name: Some(doc.school_name.clone()),
        heroine_names: doc.heroine_names(),
        ..Snapshot::empty(FileKind::Save, doc.version.as_str())
    }
}
