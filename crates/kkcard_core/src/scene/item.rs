use serde::Serialize;

use super::common::{BoneInfo, ObjectBase, PatternInfo, read_list, write_list};
use super::object::{ObjectInfo, read_children, write_children};
use super::schema::{ItemSchema, SceneSchema};
use crate::error::Result;
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

pub const ITEM_COLOR_SLOTS: usize = 8;

/// A prop placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInfo {
    pub base: ObjectBase,
    pub group: i32,
    pub category: i32,
    pub no: i32,
    pub anime_pattern: i32,
    pub anime_speed: f32,
    /// Slots the file version does not store are `None`.
    pub colors: [Option<String>; ITEM_COLOR_SLOTS],
    pub patterns: [PatternInfo; 3],
    pub alpha: f32,
    pub line_color: String,
    pub line_width: f32,
    pub emission_color: String,
    pub emission_power: f32,
    pub light_cancel: f32,
    pub panel: PatternInfo,
    pub enable_fk: bool,
    pub bones: Vec<(String, BoneInfo)>,
    pub enable_dynamic_bone: bool,
    pub anime_normalized_time: f32,
    pub children: Vec<ObjectInfo>,
}

impl ItemInfo {
    /// An item with default appearance, as the studio creates it.
    pub fn new(base: ObjectBase, group: i32, category: i32, no: i32) -> Self {
        Self {
            base,
            group,
            category,
            no,
            anime_pattern: 0,
            anime_speed: 1.0,
            colors: Default::default(),
            patterns: Default::default(),
            alpha: 1.0,
            line_color: String::new(),
            line_width: 1.0,
            emission_color: String::new(),
            emission_power: 0.0,
            light_cancel: 0.0,
            panel: PatternInfo::default(),
            enable_fk: false,
            bones: Vec::new(),
            enable_dynamic_bone: true,
            anime_normalized_time: 0.0,
            children: Vec::new(),
        }
    }

    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase, schema: &SceneSchema) -> Result<Self> {
        let fields: ItemSchema = schema.item;
        let group = r.read_i32()?;
        let category = r.read_i32()?;
        let no = r.read_i32()?;
        let anime_pattern = if fields.anime_pattern { r.read_i32()? } else { 0 };
        let anime_speed = r.read_f32()?;

        let mut colors: [Option<String>; ITEM_COLOR_SLOTS] = Default::default();
        for slot in colors.iter_mut().take(fields.colors.stored()) {
            *slot = Some(r.read_var_string()?);
        }
        let patterns = [
            PatternInfo::read(r)?,
            PatternInfo::read(r)?,
            PatternInfo::read(r)?,
        ];

        let alpha = r.read_f32()?;
        let line_color = r.read_var_string()?;
        let line_width = r.read_f32()?;
        let (emission_color, emission_power, light_cancel) = if fields.emission {
            (r.read_var_string()?, r.read_f32()?, r.read_f32()?)
        } else {
            (String::new(), 0.0, 0.0)
        };
        let panel = PatternInfo::read(r)?;
        let enable_fk = r.read_bool()?;
        let bones = read_list(r, |r| Ok((r.read_var_string()?, BoneInfo::read(r)?)))?;
        let enable_dynamic_bone = if fields.dynamic_bone {
            r.read_bool()?
        } else {
            true
        };
        let anime_normalized_time = r.read_f32()?;
        let children = read_children(r, schema)?;

        Ok(Self {
            base,
            group,
            category,
            no,
            anime_pattern,
            anime_speed,
            colors,
            patterns,
            alpha,
            line_color,
            line_width,
            emission_color,
            emission_power,
            light_cancel,
            panel,
            enable_fk,
            bones,
            enable_dynamic_bone,
            anime_normalized_time,
            children,
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) -> Result<()> {
        let fields = schema.item;
        w.write_i32(self.group);
        w.write_i32(self.category);
        w.write_i32(self.no);
        if fields.anime_pattern {
            w.write_i32(self.anime_pattern);
        }
        w.write_f32(self.anime_speed);
        for color in self.colors.iter().take(fields.colors.stored()) {
            w.write_var_string(color.as_deref().unwrap_or_default());
        }
        for pattern in &self.patterns {
            pattern.write(w);
        }
        w.write_f32(self.alpha);
        w.write_var_string(&self.line_color);
        w.write_f32(self.line_width);
        if fields.emission {
            w.write_var_string(&self.emission_color);
            w.write_f32(self.emission_power);
            w.write_f32(self.light_cancel);
        }
        self.panel.write(w);
        w.write_bool(self.enable_fk);
        write_list(w, &self.bones, |w, (key, bone)| {
            w.write_var_string(key);
            bone.write(w);
            Ok(())
        })?;
        if fields.dynamic_bone {
            w.write_bool(self.enable_dynamic_bone);
        }
        w.write_f32(self.anime_normalized_time);
        write_children(w, &self.children, schema)
    }
}
