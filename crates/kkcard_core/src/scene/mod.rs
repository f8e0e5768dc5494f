//! Studio scenes: a PNG thumbnail, then a versioned object graph, global
//! settings, a trailer string and optional plugin data.

pub mod character;
pub mod common;
pub mod item;
pub mod kinds;
pub mod object;
pub mod route;
pub mod schema;
pub mod settings;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::msgpack::{self, Value};
use crate::png;
use crate::reader::{ByteReader, Prefix};
use crate::version::Version;
use crate::writer::ByteWriter;

pub use character::{AnimeInfo, CharacterInfo, LookAtTarget, VoiceControl};
pub use common::{BoneInfo, ChangeAmount, ObjectBase, PatternInfo, Vector3};
pub use item::ItemInfo;
pub use kinds::{CameraInfo, FolderInfo, LightInfo, TextInfo, TextLine};
pub use object::{ObjectInfo, ObjectKind, read_object, write_object};
pub use route::{AidInfo, RouteInfo, RoutePoint};
pub use schema::SceneSchema;
pub use settings::SceneSettings;

pub const STUDIO_TRAILER: &str = "【KStudio】";

/// Plugin data appended after the trailer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneModData {
    pub header: String,
    /// Unexplained; carried through untouched.
    pub unknown: i32,
    pub data: Value,
    #[serde(serialize_with = "crate::b64::serialize")]
    pub rest: Vec<u8>,
}

impl SceneModData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            header: r.read_prefixed_string(Prefix::U8)?,
            unknown: r.read_i32()?,
            data: msgpack::decode(r.read_len_prefixed(Prefix::I32)?)?,
            rest: r.rest().to_vec(),
        })
    }

    fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_prefixed_string(Prefix::U8, &self.header)?;
        w.write_i32(self.unknown);
        w.write_len_prefixed(Prefix::I32, &msgpack::encode(&self.data)?)?;
        w.write_bytes(&self.rest);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDocument {
    #[serde(serialize_with = "crate::b64::serialize")]
    pub png: Vec<u8>,
    pub version: Version,
    /// Top-level objects keyed by their scene key, in file order.
    pub objects: Vec<(i32, ObjectInfo)>,
    pub settings: SceneSettings,
    pub trailer: String,
    pub mod_data: Option<SceneModData>,
}

impl SceneDocument {
    pub fn new(version: Version) -> Self {
        Self {
            png: png::placeholder_png(),
            version,
            objects: Vec::new(),
            settings: SceneSettings::default(),
            trailer: STUDIO_TRAILER.to_string(),
            mod_data: None,
        }
    }

    pub fn load(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let png = png::read_png(&mut r)?.to_vec();

        let version_offset = r.position();
        let version: Version = r.read_var_string()?.parse().map_err(|e| match e {
            Error::UnsupportedVersion { version, .. } => Error::UnsupportedVersion {
                context: format!("scene version at offset {version_offset:#x}"),
                version,
            },
            other => other,
        })?;
        let schema = SceneSchema::for_version(&version);

        let count = r.read_count()?;
        let mut objects = Vec::with_capacity(count.min(r.remaining()));
        for _ in 0..count {
            let key = r.read_i32()?;
            objects.push((key, read_object(&mut r, &schema)?));
        }

        let settings = SceneSettings::read(&mut r, &schema)?;
        let trailer = r.read_var_string()?;
        let mod_data = if r.is_at_end() {
            None
        } else {
            Some(SceneModData::read(&mut r)?)
        };

        Ok(Self {
            png,
            version,
            objects,
            settings,
            trailer,
            mod_data,
        })
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    pub fn schema(&self) -> SceneSchema {
        SceneSchema::for_version(&self.version)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let schema = self.schema();
        let mut w = ByteWriter::new();
        w.write_bytes(&self.png);
        w.write_var_string(self.version.as_str());
        w.write_count(self.objects.len())?;
        for (key, object) in &self.objects {
            w.write_i32(*key);
            write_object(&mut w, object, &schema)?;
        }
        self.settings.write(&mut w, &schema);
        w.write_var_string(&self.trailer);
        if let Some(mod_data) = &self.mod_data {
            mod_data.write(&mut w)?;
        }
        Ok(w.into_bytes())
    }

    /// Every object in the scene, depth first.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a ObjectInfo)) {
        for (_, object) in &self.objects {
            object.walk(&mut visit);
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.iter().map(|(_, o)| o.subtree_len()).sum()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        self.walk(|object| *counts.entry(object.kind().name()).or_insert(0) += 1);
        counts
    }
}
