//! Records shared by several scene object kinds.

use serde::Serialize;

use super::schema::SceneSchema;
use crate::error::Result;
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let [x, y, z] = r.read_f32_array::<3>()?;
        Ok(Self { x, y, z })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_f32_slice(&[self.x, self.y, self.z]);
    }
}

/// Position, rotation and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeAmount {
    pub pos: Vector3,
    pub rot: Vector3,
    pub scale: Vector3,
}

impl Default for ChangeAmount {
    fn default() -> Self {
        Self {
            pos: Vector3::default(),
            rot: Vector3::default(),
            scale: Vector3 {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
        }
    }
}

impl ChangeAmount {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            pos: Vector3::read(r)?,
            rot: Vector3::read(r)?,
            scale: Vector3::read(r)?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        self.pos.write(w);
        self.rot.write(w);
        self.scale.write(w);
    }
}

/// Fields every scene object starts with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectBase {
    pub dic_key: i32,
    pub change_amount: ChangeAmount,
    pub tree_state: i32,
    pub visible: bool,
}

impl ObjectBase {
    pub fn new(dic_key: i32) -> Self {
        Self {
            dic_key,
            change_amount: ChangeAmount::default(),
            tree_state: 0,
            visible: true,
        }
    }

    pub fn read(r: &mut ByteReader<'_>, schema: &SceneSchema) -> Result<Self> {
        Ok(Self {
            dic_key: r.read_i32()?,
            change_amount: ChangeAmount::read(r)?,
            tree_state: r.read_i32()?,
            visible: if schema.object_visible {
                r.read_bool()?
            } else {
                true
            },
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) {
        w.write_i32(self.dic_key);
        self.change_amount.write(w);
        w.write_i32(self.tree_state);
        if schema.object_visible {
            w.write_bool(self.visible);
        }
    }
}

/// A posable bone or IK target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneInfo {
    pub dic_key: i32,
    pub change_amount: ChangeAmount,
}

impl BoneInfo {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            dic_key: r.read_i32()?,
            change_amount: ChangeAmount::read(r)?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_i32(self.dic_key);
        self.change_amount.write(w);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternInfo {
    pub color: String,
    pub key: i32,
    pub file_path: String,
    pub clamp: bool,
    pub uv: String,
    pub rot: f32,
}

impl Default for PatternInfo {
    fn default() -> Self {
        Self {
            color: String::new(),
            key: 0,
            file_path: String::new(),
            clamp: true,
            uv: String::new(),
            rot: 0.0,
        }
    }
}

impl PatternInfo {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            color: r.read_var_string()?,
            key: r.read_i32()?,
            file_path: r.read_var_string()?,
            clamp: r.read_bool()?,
            uv: r.read_var_string()?,
            rot: r.read_f32()?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_var_string(&self.color);
        w.write_i32(self.key);
        w.write_var_string(&self.file_path);
        w.write_bool(self.clamp);
        w.write_var_string(&self.uv);
        w.write_f32(self.rot);
    }
}

/// Read `i32 count` followed by `count` records.
pub fn read_list<'a, T>(
    r: &mut ByteReader<'a>,
    mut read: impl FnMut(&mut ByteReader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    let count = r.read_count()?;
    let mut items = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        items.push(read(r)?);
    }
    Ok(items)
}

pub fn write_list<T>(
    w: &mut ByteWriter,
    items: &[T],
    mut write: impl FnMut(&mut ByteWriter, &T) -> Result<()>,
) -> Result<()> {
    w.write_count(items.len())?;
    for item in items {
        write(w, item)?;
    }
    Ok(())
}

/// Read an `i32`-keyed map stored as `i32 count` then `(key, value)` pairs.
pub fn read_keyed<'a, T>(
    r: &mut ByteReader<'a>,
    mut read: impl FnMut(&mut ByteReader<'a>) -> Result<T>,
) -> Result<Vec<(i32, T)>> {
    read_list(r, |r| Ok((r.read_i32()?, read(r)?)))
}

pub fn write_keyed<T>(
    w: &mut ByteWriter,
    items: &[(i32, T)],
    mut write: impl FnMut(&mut ByteWriter, &T) -> Result<()>,
) -> Result<()> {
    write_list(w, items, |w, (key, value)| {
        w.write_i32(*key);
        write(w, value)
    })
}
