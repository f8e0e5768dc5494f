//! Tagged dispatch over the scene object kinds.

use serde::Serialize;

use super::character::CharacterInfo;
use super::common::{ObjectBase, read_list, write_list};
use super::item::ItemInfo;
use super::kinds::{CameraInfo, FolderInfo, LightInfo, TextInfo};
use super::route::RouteInfo;
use super::schema::SceneSchema;
use crate::error::{Error, Result};
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectKind {
    Character,
    Item,
    Light,
    Folder,
    Route,
    Camera,
    Text,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 7] = [
        ObjectKind::Character,
        ObjectKind::Item,
        ObjectKind::Light,
        ObjectKind::Folder,
        ObjectKind::Route,
        ObjectKind::Camera,
        ObjectKind::Text,
    ];

    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::Character),
            1 => Some(Self::Item),
            2 => Some(Self::Light),
            3 => Some(Self::Folder),
            4 => Some(Self::Route),
            5 => Some(Self::Camera),
            7 => Some(Self::Text),
            _ => None,
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            Self::Character => 0,
            Self::Item => 1,
            Self::Light => 2,
            Self::Folder => 3,
            Self::Route => 4,
            Self::Camera => 5,
            Self::Text => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Item => "item",
            Self::Light => "light",
            Self::Folder => "folder",
            Self::Route => "route",
            Self::Camera => "camera",
            Self::Text => "text",
        }
    }
}

/// One node of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectInfo {
    Character(Box<CharacterInfo>),
    Item(ItemInfo),
    Light(LightInfo),
    Folder(FolderInfo),
    Route(RouteInfo),
    Camera(CameraInfo),
    Text(TextInfo),
}

impl ObjectInfo {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectInfo::Character(_) => ObjectKind::Character,
            ObjectInfo::Item(_) => ObjectKind::Item,
            ObjectInfo::Light(_) => ObjectKind::Light,
            ObjectInfo::Folder(_) => ObjectKind::Folder,
            ObjectInfo::Route(_) => ObjectKind::Route,
            ObjectInfo::Camera(_) => ObjectKind::Camera,
            ObjectInfo::Text(_) => ObjectKind::Text,
        }
    }

    pub fn base(&self) -> &ObjectBase {
        match self {
            ObjectInfo::Character(o) => &o.base,
            ObjectInfo::Item(o) => &o.base,
            ObjectInfo::Light(o) => &o.base,
            ObjectInfo::Folder(o) => &o.base,
            ObjectInfo::Route(o) => &o.base,
            ObjectInfo::Camera(o) => &o.base,
            ObjectInfo::Text(o) => &o.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            ObjectInfo::Character(o) => &mut o.base,
            ObjectInfo::Item(o) => &mut o.base,
            ObjectInfo::Light(o) => &mut o.base,
            ObjectInfo::Folder(o) => &mut o.base,
            ObjectInfo::Route(o) => &mut o.base,
            ObjectInfo::Camera(o) => &mut o.base,
            ObjectInfo::Text(o) => &mut o.base,
        }
    }

    /// Direct children, flattening a character's per-bone lists.
    pub fn children(&self) -> Vec<&ObjectInfo> {
        match self {
            ObjectInfo::Character(o) => o.children.iter().flat_map(|(_, list)| list).collect(),
            ObjectInfo::Item(o) => o.children.iter().collect(),
            ObjectInfo::Folder(o) => o.children.iter().collect(),
            ObjectInfo::Route(o) => o.children.iter().collect(),
            ObjectInfo::Light(_) | ObjectInfo::Camera(_) | ObjectInfo::Text(_) => Vec::new(),
        }
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ObjectInfo)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

/// Deepest parent/child chain accepted when reading a scene.
pub const MAX_OBJECT_DEPTH: usize = 128;

/// Read a type tag and the matching object body.
pub fn read_object(r: &mut ByteReader<'_>, schema: &SceneSchema) -> Result<ObjectInfo> {
    r.descend(MAX_OBJECT_DEPTH, "object graph")?;
    let object = read_tagged(r, schema);
    r.ascend();
    object
}

fn read_tagged(r: &mut ByteReader<'_>, schema: &SceneSchema) -> Result<ObjectInfo> {
    let offset = r.position();
    let tag = r.read_i32()?;
    let kind = ObjectKind::from_tag(tag).ok_or(Error::UnknownObjectType { offset, tag })?;
    let base = ObjectBase::read(r, schema)?;
    Ok(match kind {
        ObjectKind::Character => {
            ObjectInfo::Character(Box::new(CharacterInfo::read(r, base, schema)?))
        }
        ObjectKind::Item => ObjectInfo::Item(ItemInfo::read(r, base, schema)?),
        ObjectKind::Light => ObjectInfo::Light(LightInfo::read(r, base)?),
        ObjectKind::Folder => ObjectInfo::Folder(FolderInfo::read(r, base, schema)?),
        ObjectKind::Route => ObjectInfo::Route(RouteInfo::read(r, base, schema)?),
        ObjectKind::Camera => ObjectInfo::Camera(CameraInfo::read(r, base)?),
        ObjectKind::Text => ObjectInfo::Text(TextInfo::read(r, base)?),
    })
}

pub fn write_object(w: &mut ByteWriter, object: &ObjectInfo, schema: &SceneSchema) -> Result<()> {
    w.write_i32(object.kind().tag());
    object.base().write(w, schema);
    match object {
        ObjectInfo::Character(o) => o.write(w, schema),
        ObjectInfo::Item(o) => o.write(w, schema),
        ObjectInfo::Light(o) => {
            o.write(w);
            Ok(())
        }
        ObjectInfo::Folder(o) => o.write(w, schema),
        ObjectInfo::Route(o) => o.write(w, schema),
        ObjectInfo::Camera(o) => {
            o.write(w);
            Ok(())
        }
        ObjectInfo::Text(o) => o.write(w),
    }
}

/// `i32 count` followed by that many tagged objects.
pub fn read_children(r: &mut ByteReader<'_>, schema: &SceneSchema) -> Result<Vec<ObjectInfo>> {
    read_list(r, |r| read_object(r, schema))
}

pub fn write_children(
    w: &mut ByteWriter,
    children: &[ObjectInfo],
    schema: &SceneSchema,
) -> Result<()> {
    write_list(w, children, |w, child| write_object(w, child, schema))
}
