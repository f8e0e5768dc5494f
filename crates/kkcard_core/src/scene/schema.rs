use crate::version::{StaticVersion, Version};

pub const V0_0_2: StaticVersion = StaticVersion(&[0, 0, 2]);
pub const V0_0_3: StaticVersion = StaticVersion(&[0, 0, 3]);
pub const V0_0_4: StaticVersion = StaticVersion(&[0, 0, 4]);
pub const V0_0_5: StaticVersion = StaticVersion(&[0, 0, 5]);
pub const V0_0_6: StaticVersion = StaticVersion(&[0, 0, 6]);
pub const V0_0_9: StaticVersion = StaticVersion(&[0, 0, 9]);
pub const V1_0_1: StaticVersion = StaticVersion(&[1, 0, 1]);
pub const V1_0_3: StaticVersion = StaticVersion(&[1, 0, 3]);
pub const V1_0_4: StaticVersion = StaticVersion(&[1, 0, 4]);
pub const V1_0_4_1: StaticVersion = StaticVersion(&[1, 0, 4, 1]);
pub const V1_1_0: StaticVersion = StaticVersion(&[1, 1, 0]);

/// Post-processing effect block of the scene settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSchema {
    /// Up to 0.0.1.
    Legacy,
    /// 0.0.2 onwards: adds AOE color/radius, bloom threshold, fog and sun
    /// shaft colors.
    Current,
}

/// Toon shading controls of the scene settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingSchema {
    Absent,
    /// 0.0.2: face normal/shadow flags, line color, ambient shadow color.
    Basic,
    /// 0.0.3 onwards: adds line width, ramp and ambient shadow strength.
    Extended,
}

/// Number of stored expression flags on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionSchema {
    Four,
    Eight,
}

impl ExpressionSchema {
    pub fn len(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// Number of stored item color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColorSchema {
    Four,
    Seven,
    Eight,
}

impl ItemColorSchema {
    pub fn stored(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePointSchema {
    Basic,
    /// 1.0.3: connection index and aid record.
    WithAid,
    /// 1.0.4.1: adds the link flag.
    Linked,
}

/// Optional trailing fields of a character record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSchema {
    pub expression: ExpressionSchema,
    pub anime_pattern: bool,
    pub anime_option_visible: bool,
    pub anime_force_loop: bool,
    pub anime_option_param: bool,
    pub anime_normalized_time: bool,
    pub access_groups: bool,
    pub unknown_flag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSchema {
    pub colors: ItemColorSchema,
    pub anime_pattern: bool,
    pub emission: bool,
    pub dynamic_bone: bool,
}

/// Every layout decision a scene version implies, computed once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSchema {
    pub object_visible: bool,
    pub character: CharacterSchema,
    pub item: ItemSchema,
    pub route_extras: bool,
    pub route_point: RoutePointSchema,
    pub effects: EffectSchema,
    pub shading: ShadingSchema,
    pub enable_shadow: bool,
    pub shader_and_skybox: bool,
    pub map_light_type: bool,
}

impl SceneSchema {
    pub fn for_version(v: &Version) -> Self {
        Self {
            object_visible: v.at_least(V0_0_2),
            character: CharacterSchema {
                expression: if v.at_least(V0_0_9) {
                    ExpressionSchema::Eight
                } else {
                    ExpressionSchema::Four
                },
                anime_pattern: v.at_least(V0_0_3),
                anime_option_visible: v.at_least(V0_0_4),
                anime_force_loop: v.at_least(V0_0_5),
                anime_option_param: v.at_least(V0_0_6),
                anime_normalized_time: v.at_least(V1_0_3),
                access_groups: v.at_least(V1_0_4),
                unknown_flag: v.at_least(V1_1_0),
            },
            item: ItemSchema {
                colors: if v.at_least(V1_1_0) {
                    ItemColorSchema::Eight
                } else if v.at_least(V0_0_3) {
                    ItemColorSchema::Seven
                } else {
                    ItemColorSchema::Four
                },
                anime_pattern: v.at_least(V1_0_1),
                emission: v.at_least(V1_0_3),
                dynamic_bone: v.at_least(V0_0_5),
            },
            route_extras: v.at_least(V1_0_3),
            route_point: if v.at_least(V1_0_4_1) {
                RoutePointSchema::Linked
            } else if v.at_least(V1_0_3) {
                RoutePointSchema::WithAid
            } else {
                RoutePointSchema::Basic
            },
            effects: if v.at_least(V0_0_2) {
                EffectSchema::Current
            } else {
                EffectSchema::Legacy
            },
            shading: if v.at_least(V0_0_3) {
                ShadingSchema::Extended
            } else if v.at_least(V0_0_2) {
                ShadingSchema::Basic
            } else {
                ShadingSchema::Absent
            },
            enable_shadow: v.at_least(V0_0_4),
            shader_and_skybox: v.at_least(V1_1_0),
            map_light_type: v.at_least(V0_0_3),
        }
    }
}
