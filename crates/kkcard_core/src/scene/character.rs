use serde::Serialize;

use super::common::{
    BoneInfo, ChangeAmount, ObjectBase, read_keyed, read_list, write_keyed, write_list,
};
use super::object::{ObjectInfo, read_children, write_children};
use super::schema::{ExpressionSchema, SceneSchema};
use crate::chara::CharaDocument;
use crate::error::Result;
use crate::reader::{ByteReader, Prefix};
use crate::writer::ByteWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnimeInfo {
    pub group: i32,
    pub category: i32,
    pub no: i32,
}

impl AnimeInfo {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let [group, category, no] = r.read_i32_array::<3>()?;
        Ok(Self {
            group,
            category,
            no,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.write_i32_slice(&[self.group, self.category, self.no]);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookAtTarget {
    pub dic_key: i32,
    pub change_amount: ChangeAmount,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VoiceControl {
    pub list: Vec<AnimeInfo>,
    pub repeat: i32,
}

/// A posed character placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterInfo {
    pub base: ObjectBase,
    pub sex: i32,
    pub chara: CharaDocument,
    pub bones: Vec<(i32, BoneInfo)>,
    pub ik_targets: Vec<(i32, BoneInfo)>,
    /// Children grouped by the bone they are attached to.
    pub children: Vec<(i32, Vec<ObjectInfo>)>,
    pub kinematic_mode: i32,
    pub anime: AnimeInfo,
    pub hand_pattern: [i32; 2],
    pub nipple: f32,
    /// Unexplained; carried through untouched.
    pub siru: [u8; 5],
    pub mouth_open: f32,
    pub lip_sync: bool,
    pub look_at: LookAtTarget,
    pub enable_ik: bool,
    pub active_ik: [bool; 5],
    pub enable_fk: bool,
    pub active_fk: [bool; 7],
    pub expression: Vec<bool>,
    pub anime_speed: f32,
    pub anime_pattern: f32,
    pub anime_option_visible: bool,
    pub is_anime_force_loop: bool,
    pub voice: VoiceControl,
    pub visible_son: bool,
    pub son_length: f32,
    pub visible_simple: bool,
    pub simple_color: String,
    pub anime_option_param: [f32; 2],
    #[serde(serialize_with = "crate::b64::serialize")]
    pub neck_byte_data: Vec<u8>,
    #[serde(serialize_with = "crate::b64::serialize")]
    pub eyes_byte_data: Vec<u8>,
    pub anime_normalized_time: f32,
    pub access_groups: Vec<(i32, i32)>,
    pub access_numbers: Vec<(i32, i32)>,
    /// Unexplained; carried through untouched.
    pub unknown_flag: bool,
}

fn read_bools<const N: usize>(r: &mut ByteReader<'_>) -> Result<[bool; N]> {
    let mut out = [false; N];
    for flag in &mut out {
        *flag = r.read_bool()?;
    }
    Ok(out)
}

fn read_pairs(r: &mut ByteReader<'_>) -> Result<Vec<(i32, i32)>> {
    read_list(r, |r| Ok((r.read_i32()?, r.read_i32()?)))
}

fn write_pairs(w: &mut ByteWriter, pairs: &[(i32, i32)]) -> Result<()> {
    write_list(w, pairs, |w, (a, b)| {
        w.write_i32(*a);
        w.write_i32(*b);
        Ok(())
    })
}

fn write_bone(w: &mut ByteWriter, bone: &BoneInfo) -> Result<()> {
    bone.write(w);
    Ok(())
}

impl CharacterInfo {
    pub fn read(r: &mut ByteReader<'_>, base: ObjectBase, schema: &SceneSchema) -> Result<Self> {
        let fields = schema.character;
        let sex = r.read_i32()?;
        let chara = CharaDocument::decode(r)?;
        let bones = read_keyed(r, BoneInfo::read)?;
        let ik_targets = read_keyed(r, BoneInfo::read)?;
        let children = read_keyed(r, |r| read_children(r, schema))?;
        let kinematic_mode = r.read_i32()?;
        let anime = AnimeInfo::read(r)?;
        let hand_pattern = r.read_i32_array::<2>()?;
        let nipple = r.read_f32()?;
        let siru = r.read_array::<5>()?;
        let mouth_open = r.read_f32()?;
        let lip_sync = r.read_bool()?;
        let look_at = LookAtTarget {
            dic_key: r.read_i32()?,
            change_amount: ChangeAmount::read(r)?,
        };
        let enable_ik = r.read_bool()?;
        let active_ik = read_bools::<5>(r)?;
        let enable_fk = r.read_bool()?;
        let active_fk = read_bools::<7>(r)?;
        let expression = r.read_bool_vec(fields.expression.len())?;
        let anime_speed = r.read_f32()?;
        let anime_pattern = if fields.anime_pattern { r.read_f32()? } else { 0.0 };
        let anime_option_visible = if fields.anime_option_visible {
            r.read_bool()?
        } else {
            true
        };
        let is_anime_force_loop = fields.anime_force_loop && r.read_bool()?;
        let voice = VoiceControl {
            list: read_list(r, AnimeInfo::read)?,
            repeat: r.read_i32()?,
        };
        let visible_son = r.read_bool()?;
        let son_length = r.read_f32()?;
        let visible_simple = r.read_bool()?;
        let simple_color = r.read_var_string()?;
        let anime_option_param = if fields.anime_option_param {
            r.read_f32_array::<2>()?
        } else {
            [0.0; 2]
        };
        let neck_byte_data = r.read_len_prefixed(Prefix::I32)?.to_vec();
        let eyes_byte_data = r.read_len_prefixed(Prefix::I32)?.to_vec();
        let anime_normalized_time = if fields.anime_normalized_time {
            r.read_f32()?
        } else {
            0.0
        };
        let (access_groups, access_numbers) = if fields.access_groups {
            (read_pairs(r)?, read_pairs(r)?)
        } else {
            (Vec::new(), Vec::new())
        };
        let unknown_flag = fields.unknown_flag && r.read_bool()?;

        Ok(Self {
            base,
            sex,
            chara,
            bones,
            ik_targets,
            children,
            kinematic_mode,
            anime,
            hand_pattern,
            nipple,
            siru,
            mouth_open,
            lip_sync,
            look_at,
            enable_ik,
            active_ik,
            enable_fk,
            active_fk,
            expression,
            anime_speed,
            anime_pattern,
            anime_option_visible,
            is_anime_force_loop,
            voice,
            visible_son,
            son_length,
            visible_simple,
            simple_color,
            anime_option_param,
            neck_byte_data,
            eyes_byte_data,
            anime_normalized_time,
            access_groups,
            access_numbers,
            unknown_flag,
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) -> Result<()> {
        let fields = schema.character;
        w.write_i32(self.sex);
        self.chara.encode(w)?;
        write_keyed(w, &self.bones, write_bone)?;
        write_keyed(w, &self.ik_targets, write_bone)?;
        write_keyed(w, &self.children, |w, list| write_children(w, list, schema))?;
        w.write_i32(self.kinematic_mode);
        self.anime.write(w);
        w.write_i32_slice(&self.hand_pattern);
        w.write_f32(self.nipple);
        w.write_bytes(&self.siru);
        w.write_f32(self.mouth_open);
        w.write_bool(self.lip_sync);
        w.write_i32(self.look_at.dic_key);
        self.look_at.change_amount.write(w);
        w.write_bool(self.enable_ik);
        w.write_bool_slice(&self.active_ik);
        w.write_bool(self.enable_fk);
        w.write_bool_slice(&self.active_fk);
        write_expression(w, &self.expression, fields.expression);
        w.write_f32(self.anime_speed);
        if fields.anime_pattern {
            w.write_f32(self.anime_pattern);
        }
        if fields.anime_option_visible {
            w.write_bool(self.anime_option_visible);
        }
        if fields.anime_force_loop {
            w.write_bool(self.is_anime_force_loop);
        }
        write_list(w, &self.voice.list, |w, voice| {
            voice.write(w);
            Ok(())
        })?;
        w.write_i32(self.voice.repeat);
        w.write_bool(self.visible_son);
        w.write_f32(self.son_length);
        w.write_bool(self.visible_simple);
        w.write_var_string(&self.simple_color);
        if fields.anime_option_param {
            w.write_f32_slice(&self.anime_option_param);
        }
        w.write_len_prefixed(Prefix::I32, &self.neck_byte_data)?;
        w.write_len_prefixed(Prefix::I32, &self.eyes_byte_data)?;
        if fields.anime_normalized_time {
            w.write_f32(self.anime_normalized_time);
        }
        if fields.access_groups {
            write_pairs(w, &self.access_groups)?;
            write_pairs(w, &self.access_numbers)?;
        }
        if fields.unknown_flag {
            w.write_bool(self.unknown_flag);
        }
        Ok(())
    }
}

/// Write exactly as many flags as the schema stores, padding with `false`.
fn write_expression(w: &mut ByteWriter, flags: &[bool], schema: ExpressionSchema) {
    for index in 0..schema.len() {
        w.write_bool(flags.get(index).copied().unwrap_or(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_is_padded_to_the_stored_width() {
        let mut w = ByteWriter::new();
        write_expression(&mut w, &[true, true], ExpressionSchema::Eight);
        assert_eq!(w.as_slice(), [1, 1, 0, 0, 0, 0, 0, 0]);

        let mut w = ByteWriter::new();
        write_expression(&mut w, &[true; 8], ExpressionSchema::Four);
        assert_eq!(w.as_slice(), [1, 1, 1, 1]);
    }

    #[test]
    fn pairs_round_trip() {
        let pairs = vec![(1, 2), (-3, 4)];
        let mut w = ByteWriter::new();
        write_pairs(&mut w, &pairs).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 4 + 2 * 8);
        assert_eq!(read_pairs(&mut ByteReader::new(&bytes)).unwrap(), pairs);
    }
}
