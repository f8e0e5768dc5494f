//! Scene-wide settings stored after the object graph.

use serde::Serialize;

use super::common::{ChangeAmount, Vector3};
use super::schema::{EffectSchema, SceneSchema, ShadingSchema};
use crate::error::Result;
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

pub const CAMERA_SLOTS: usize = 10;

/// Fields only the legacy effect layout stores. Their meaning is unknown;
/// they are kept so that old scenes re-save unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LegacyEffects {
    pub enable_ace: bool,
    pub ace_blend: f32,
    pub ace_flag: bool,
    pub bloom_flag: bool,
    pub vignette: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EffectSettings {
    pub ace_blend: f32,
    pub enable_aoe: bool,
    pub aoe_color: String,
    pub aoe_radius: f32,
    pub enable_bloom: bool,
    pub bloom_intensity: f32,
    pub bloom_blur: f32,
    pub bloom_threshold: f32,
    pub enable_depth: bool,
    pub depth_focal_size: f32,
    pub depth_aperture: f32,
    pub enable_vignette: bool,
    pub enable_fog: bool,
    pub fog_color: String,
    pub fog_height: f32,
    pub fog_start_distance: f32,
    pub enable_sun_shafts: bool,
    pub sun_threshold_color: String,
    pub sun_color: String,
    pub legacy: LegacyEffects,
}

impl EffectSettings {
    fn read(r: &mut ByteReader<'_>, schema: EffectSchema) -> Result<Self> {
        match schema {
            EffectSchema::Legacy => Self::read_legacy(r),
            EffectSchema::Current => Self::read_current(r),
        }
    }

    fn read_legacy(r: &mut ByteReader<'_>) -> Result<Self> {
        let mut fx = Self::default();
        fx.legacy.enable_ace = r.read_bool()?;
        fx.legacy.ace_blend = r.read_f32()?;
        fx.legacy.ace_flag = r.read_bool()?;
        fx.enable_aoe = r.read_bool()?;
        fx.enable_bloom = r.read_bool()?;
        fx.bloom_intensity = r.read_f32()?;
        fx.bloom_blur = r.read_f32()?;
        fx.legacy.bloom_flag = r.read_bool()?;
        fx.enable_depth = r.read_bool()?;
        fx.depth_focal_size = r.read_f32()?;
        fx.depth_aperture = r.read_f32()?;
        fx.enable_vignette = r.read_bool()?;
        fx.legacy.vignette = r.read_f32()?;
        fx.enable_fog = r.read_bool()?;
        fx.enable_sun_shafts = r.read_bool()?;
        Ok(fx)
    }

    fn read_current(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            ace_blend: r.read_f32()?,
            enable_aoe: r.read_bool()?,
            aoe_color: r.read_var_string()?,
            aoe_radius: r.read_f32()?,
            enable_bloom: r.read_bool()?,
            bloom_intensity: r.read_f32()?,
            bloom_blur: r.read_f32()?,
            bloom_threshold: r.read_f32()?,
            enable_depth: r.read_bool()?,
            depth_focal_size: r.read_f32()?,
            depth_aperture: r.read_f32()?,
            enable_vignette: r.read_bool()?,
            enable_fog: r.read_bool()?,
            fog_color: r.read_var_string()?,
            fog_height: r.read_f32()?,
            fog_start_distance: r.read_f32()?,
            enable_sun_shafts: r.read_bool()?,
            sun_threshold_color: r.read_var_string()?,
            sun_color: r.read_var_string()?,
            legacy: LegacyEffects::default(),
        })
    }

    fn write(&self, w: &mut ByteWriter, schema: EffectSchema) {
        match schema {
            EffectSchema::Legacy => self.write_legacy(w),
            EffectSchema::Current => self.write_current(w),
        }
    }

    fn write_legacy(&self, w: &mut ByteWriter) {
        w.write_bool(self.legacy.enable_ace);
        w.write_f32(self.legacy.ace_blend);
        w.write_bool(self.legacy.ace_flag);
        w.write_bool(self.enable_aoe);
        w.write_bool(self.enable_bloom);
        w.write_f32(self.bloom_intensity);
        w.write_f32(self.bloom_blur);
        w.write_bool(self.legacy.bloom_flag);
        w.write_bool(self.enable_depth);
        w.write_f32(self.depth_focal_size);
        w.write_f32(self.depth_aperture);
        w.write_bool(self.enable_vignette);
        w.write_f32(self.legacy.vignette);
        w.write_bool(self.enable_fog);
        w.write_bool(self.enable_sun_shafts);
    }

    fn write_current(&self, w: &mut ByteWriter) {
        w.write_f32(self.ace_blend);
        w.write_bool(self.enable_aoe);
        w.write_var_string(&self.aoe_color);
        w.write_f32(self.aoe_radius);
        w.write_bool(self.enable_bloom);
        w.write_f32(self.bloom_intensity);
        w.write_f32(self.bloom_blur);
        w.write_f32(self.bloom_threshold);
        w.write_bool(self.enable_depth);
        w.write_f32(self.depth_focal_size);
        w.write_f32(self.depth_aperture);
        w.write_bool(self.enable_vignette);
        w.write_bool(self.enable_fog);
        w.write_var_string(&self.fog_color);
        w.write_f32(self.fog_height);
        w.write_f32(self.fog_start_distance);
        w.write_bool(self.enable_sun_shafts);
        w.write_var_string(&self.sun_threshold_color);
        w.write_var_string(&self.sun_color);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShadingSettings {
    pub face_normal: bool,
    pub face_shadow: bool,
    pub line_color_g: f32,
    pub ambient_shadow: String,
    pub line_width_g: f32,
    pub ramp_g: i32,
    pub ambient_shadow_g: f32,
}

impl ShadingSettings {
    fn read(r: &mut ByteReader<'_>, schema: ShadingSchema) -> Result<Self> {
        let mut shading = Self::default();
        if schema == ShadingSchema::Absent {
            return Ok(shading);
        }
        shading.face_normal = r.read_bool()?;
        shading.face_shadow = r.read_bool()?;
        shading.line_color_g = r.read_f32()?;
        shading.ambient_shadow = r.read_var_string()?;
        if schema == ShadingSchema::Extended {
            shading.line_width_g = r.read_f32()?;
            shading.ramp_g = r.read_i32()?;
            shading.ambient_shadow_g = r.read_f32()?;
        }
        Ok(shading)
    }

    fn write(&self, w: &mut ByteWriter, schema: ShadingSchema) {
        if schema == ShadingSchema::Absent {
            return;
        }
        w.write_bool(self.face_normal);
        w.write_bool(self.face_shadow);
        w.write_f32(self.line_color_g);
        w.write_var_string(&self.ambient_shadow);
        if schema == ShadingSchema::Extended {
            w.write_f32(self.line_width_g);
            w.write_i32(self.ramp_g);
            w.write_f32(self.ambient_shadow_g);
        }
    }
}

/// A saved camera position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CameraData {
    pub format: i32,
    pub pos: Vector3,
    pub rot: Vector3,
    /// Only `z` is stored unless `format == 1`.
    pub distance: Vector3,
    pub fov: f32,
}

impl CameraData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let format = r.read_i32()?;
        let pos = Vector3::read(r)?;
        let rot = Vector3::read(r)?;
        let distance = if format == 1 {
            Vector3::read(r)?
        } else {
            Vector3 {
                z: r.read_f32()?,
                ..Vector3::default()
            }
        };
        Ok(Self {
            format,
            pos,
            rot,
            distance,
            fov: r.read_f32()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.write_i32(self.format);
        self.pos.write(w);
        self.rot.write(w);
        if self.format == 1 {
            self.distance.write(w);
        } else {
            w.write_f32(self.distance.z);
        }
        w.write_f32(self.fov);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightSettings {
    pub color: String,
    pub intensity: f32,
    pub rot: [f32; 2],
    pub shadow: bool,
    /// Stored for the map light from 0.0.3.
    pub light_type: i32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            color: String::new(),
            intensity: 1.0,
            rot: [0.0; 2],
            shadow: true,
            light_type: 0,
        }
    }
}

impl LightSettings {
    fn read(r: &mut ByteReader<'_>, with_type: bool) -> Result<Self> {
        Ok(Self {
            color: r.read_var_string()?,
            intensity: r.read_f32()?,
            rot: r.read_f32_array::<2>()?,
            shadow: r.read_bool()?,
            light_type: if with_type { r.read_i32()? } else { 0 },
        })
    }

    fn write(&self, w: &mut ByteWriter, with_type: bool) {
        w.write_var_string(&self.color);
        w.write_f32(self.intensity);
        w.write_f32_slice(&self.rot);
        w.write_bool(self.shadow);
        if with_type {
            w.write_i32(self.light_type);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AudioControl {
    pub no: i32,
    pub repeat: i32,
    pub play: bool,
}

impl AudioControl {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            no: r.read_i32()?,
            repeat: r.read_i32()?,
            play: r.read_bool()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.write_i32(self.no);
        w.write_i32(self.repeat);
        w.write_bool(self.play);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OutsideSound {
    pub file_name: String,
    pub repeat: i32,
    pub play: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSettings {
    pub map: i32,
    pub ca_map: ChangeAmount,
    pub sun_light_type: i32,
    pub map_option: bool,
    pub ace_no: i32,
    pub effects: EffectSettings,
    pub enable_shadow: bool,
    pub shading: ShadingSettings,
    pub shader_type: i32,
    pub skybox: i32,
    pub camera: CameraData,
    pub camera_slots: [CameraData; CAMERA_SLOTS],
    pub chara_light: LightSettings,
    pub map_light: LightSettings,
    pub bgm: AudioControl,
    pub env: AudioControl,
    pub outside_sound: OutsideSound,
    pub background: String,
    pub frame: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            map: -1,
            ca_map: ChangeAmount::default(),
            sun_light_type: 0,
            map_option: true,
            ace_no: 0,
            effects: EffectSettings::default(),
            enable_shadow: true,
            shading: ShadingSettings::default(),
            shader_type: 0,
            skybox: 0,
            camera: CameraData::default(),
            camera_slots: [CameraData::default(); CAMERA_SLOTS],
            chara_light: LightSettings::default(),
            map_light: LightSettings::default(),
            bgm: AudioControl::default(),
            env: AudioControl::default(),
            outside_sound: OutsideSound::default(),
            background: String::new(),
            frame: String::new(),
        }
    }
}

impl SceneSettings {
    pub fn read(r: &mut ByteReader<'_>, schema: &SceneSchema) -> Result<Self> {
        let map = r.read_i32()?;
        let ca_map = ChangeAmount::read(r)?;
        let sun_light_type = r.read_i32()?;
        let map_option = r.read_bool()?;
        let ace_no = r.read_i32()?;
        let effects = EffectSettings::read(r, schema.effects)?;
        let enable_shadow = if schema.enable_shadow {
            r.read_bool()?
        } else {
            true
        };
        let shading = ShadingSettings::read(r, schema.shading)?;
        let (shader_type, skybox) = if schema.shader_and_skybox {
            (r.read_i32()?, r.read_i32()?)
        } else {
            (0, 0)
        };
        let camera = CameraData::read(r)?;
        let mut camera_slots = [CameraData::default(); CAMERA_SLOTS];
        for slot in &mut camera_slots {
            *slot = CameraData::read(r)?;
        }
        let chara_light = LightSettings::read(r, false)?;
        let map_light = LightSettings::read(r, schema.map_light_type)?;
        let bgm = AudioControl::read(r)?;
        let env = AudioControl::read(r)?;
        let outside_sound = OutsideSound {
            file_name: r.read_var_string()?,
            repeat: r.read_i32()?,
            play: r.read_bool()?,
        };
        let background = r.read_var_string()?;
        let frame = r.read_var_string()?;

        Ok(Self {
            map,
            ca_map,
            sun_light_type,
            map_option,
            ace_no,
            effects,
            enable_shadow,
            shading,
            shader_type,
            skybox,
            camera,
            camera_slots,
            chara_light,
            map_light,
            bgm,
            env,
            outside_sound,
            background,
            frame,
        })
    }

    pub fn write(&self, w: &mut ByteWriter, schema: &SceneSchema) {
        w.write_i32(self.map);
        self.ca_map.write(w);
        w.write_i32(self.sun_light_type);
        w.write_bool(self.map_option);
        w.write_i32(self.ace_no);
        self.effects.write(w, schema.effects);
        if schema.enable_shadow {
            w.write_bool(self.enable_shadow);
        }
        self.shading.write(w, schema.shading);
        if schema.shader_and_skybox {
            w.write_i32(self.shader_type);
            w.write_i32(self.skybox);
        }
        self.camera.write(w);
        for slot in &self.camera_slots {
            slot.write(w);
        }
        self.chara_light.write(w, false);
        self.map_light.write(w, schema.map_light_type);
        self.bgm.write(w);
        self.env.write(w);
        w.write_var_string(&self.outside_sound.file_name);
        w.write_i32(self.outside_sound.repeat);
        w.write_bool(self.outside_sound.play);
        w.write_var_string(&self.background);
        w.write_var_string(&self.frame);
    }
}
