use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Chara,
    Scene,
    Save,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Chara, FileKind::Scene, FileKind::Save];

    pub fn name(self) -> &'static str {
        match self {
            FileKind::Chara => "character",
            FileKind::Scene => "scene",
            FileKind::Save => "save",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockEntry {
    pub name: String,
    pub version: String,
    pub kind: String,
    /// Position of the block in the payload area.
    pub storage_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectCount {
    pub kind: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub kind: FileKind,
    pub version: String,
    pub has_thumbnail: bool,
    pub character_name: Option<String>,
    pub blocks: Vec<BlockEntry>,
    pub object_count: usize,
    pub objects_by_kind: Vec<ObjectCount>,
    pub school_name: Option<String>,
    pub heroine_names: Vec<String>,
}

impl Snapshot {
    pub(crate) fn empty(kind: FileKind, version: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
            has_thumbnail: false,
            character_name: None,
            blocks: Vec::new(),
            object_count: 0,
            objects_by_kind: Vec::new(),
            school_name: None,
            heroine_names: Vec::new(),
        }
    }
}
