//! Object kinds with short, fixed layouts.

use serde::Serialize;

use super::common::{ObjectBase, read_list, write_list};
use super::object::{ObjectInfo, read_children, write_children};
use super::schema::SceneSchema;
use crate::error::Result;
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightInfo {
    pub base: ObjectBase,
    pub no: i32,
    pub color: String,
    pub intensity: f32,
    pub range: f32,
    pub spot_angle: f32,
    pub shadow: bool,
    pub enable: bool,
    pub draw_target: bool,
}

impl LightInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase) -> Result<Self> {
        Ok(Self {
            base,
            no: r.read_i32()?,
            color: r.read_var_string()?,
            intensity: r.read_f32()?,
            range: r.read_f32()?,
            spot_angle: r.read_f32()?,
            shadow: r.read_bool()?,
            enable: r.read_bool()?,
            draw_target: r.read_bool()?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_i32(self.no);
        w.write_var_string(&self.color);
        w.write_f32(self.intensity);
        w.write_f32(self.range);
        w.write_f32(self.spot_angle);
        w.write_bool(self.shadow);
        w.write_bool(self.enable);
        w.write_bool(self.draw_target);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderInfo {
    pub base: ObjectBase,
    pub name: String,
    pub children: Vec<ObjectInfo>,
}

impl FolderInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase, schema: &SceneSchema) -> Result<Self> {
        Ok(Self {
            base,
            name: r.read_var_string()?,
            children: read_children(r, schema)?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) -> Result<()> {
        w.write_var_string(&self.name);
        write_children(w, &self.children, schema)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraInfo {
    pub base: ObjectBase,
    pub name: String,
    pub active: bool,
}

impl CameraInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase) -> Result<Self> {
        Ok(Self {
            base,
            name: r.read_var_string()?,
            active: r.read_bool()?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write_var_string(&self.name);
        w.write_bool(self.active);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub font: String,
    pub size: i32,
    pub line_spacing: f32,
    pub alignment: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextInfo {
    pub base: ObjectBase,
    pub id: i32,
    pub color: String,
    pub outline_color: String,
    pub outline_size: f32,
    pub lines: Vec<TextLine>,
}

impl TextInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase) -> Result<Self> {
        Ok(Self {
            base,
            id: r.read_i32()?,
            color: r.read_var_string()?,
            outline_color: r.read_var_string()?,
            outline_size: r.read_f32()?,
            lines: read_list(r, |r| {
                Ok(TextLine {
                    font: r.read_var_string()?,
                    size: r.read_i32()?,
                    line_spacing: r.read_f32()?,
                    alignment: r.read_i32()?,
                    text: r.read_var_string()?,
                })
            })?,
        })
    }

    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        w.write_i32(self.id);
        w.write_var_string(&self.color);
        w.write_var_string(&self.outline_color);
        w.write_f32(self.outline_size);
        write_list(w, &self.lines, |w, line| {
            w.write_var_string(&line.font);
            w.write_i32(line.size);
            w.write_f32(line.line_spacing);
            w.write_i32(line.alignment);
            w.write_var_string(&line.text);
            Ok(())
        })
    }
}
