//! Fixture builders shared by the integration tests. No game files ship with
//! the repository, so every input is synthesized here.
#![allow(dead_code)]

use kkcard_core::chara::{
    Block, BlockData, CharaDocument, Coordinate, Custom, KkEx, NestedPaths, Outfit,
};
use kkcard_core::msgpack::{self, Value};
use kkcard_core::png;
use kkcard_core::save::{SaveDocument, SaveHeroine, SavePlayer};
use kkcard_core::scene::{
    AidInfo, AnimeInfo, BoneInfo, CameraInfo, ChangeAmount, CharacterInfo, FolderInfo, ItemInfo,
    LightInfo, LookAtTarget, ObjectBase, ObjectInfo, RouteInfo, RoutePoint, SceneDocument,
    TextInfo, TextLine, Vector3, VoiceControl,
};

pub const MATERIAL_EDITOR: &str = "com.deathweasel.bepinex.materialeditor";

pub fn block(name: &str, version: &str, data: BlockData) -> Block {
    Block {
        name: name.to_string(),
        version: version.to_string(),
        data,
    }
}

pub fn parameter(last: &str, first: &str) -> Value {
    Value::map([
        ("version", Value::str("0.0.5")),
        ("lastname", Value::str(last)),
        ("firstname", Value::str(first)),
        ("nickname", Value::str("")),
        ("sex", Value::UInt(1)),
        ("birthMonth", Value::UInt(4)),
        ("birthDay", Value::UInt(12)),
        ("personality", Value::Int(-3)),
        ("voiceRate", Value::F32(0.5)),
    ])
}

/// A `KKEx` root where the material editor plugin carries one nested
/// document per field in `fields`, each serialized into a `Bin`.
pub fn kkex_root(fields: &[(&str, Value)]) -> Value {
    let data = Value::Map(
        fields
            .iter()
            .map(|(name, value)| {
                let raw = msgpack::encode(value).unwrap();
                (Value::str(*name), Value::Bin(raw))
            })
            .collect(),
    );
    Value::map([
        (MATERIAL_EDITOR, Value::Array(vec![Value::UInt(0), data])),
        ("KKABMPlugin.ABMData", Value::Nil),
        (
            "com.example.plain",
            Value::Array(vec![Value::UInt(1), Value::map([("flag", Value::Bool(true))])]),
        ),
    ])
}

pub fn kkex(fields: &[(&str, Value)]) -> KkEx {
    let bytes = msgpack::encode(&kkex_root(fields)).unwrap();
    KkEx::decode(&bytes, NestedPaths::standard()).unwrap()
}

pub fn shader_list() -> Value {
    Value::Array(vec![Value::map([
        ("ObjectType", Value::UInt(2)),
        ("CoordinateIndex", Value::UInt(0)),
        ("MaterialName", Value::str("cf_m_body")),
        ("ShaderName", Value::str("xukmi/SkinPlus")),
    ])])
}

pub fn outfit(index: u64) -> Outfit {
    Outfit {
        clothes: Value::map([("parts", Value::Array(vec![Value::UInt(index); 3]))]),
        accessory: Value::map([("parts", Value::Array(Vec::new()))]),
        enable_makeup: index % 2 == 0,
        makeup: Value::map([("eyeshadowColor", Value::str("#aabbcc"))]),
    }
}

/// A character with every registered block plus one the registry does not
/// know, stored in a different order than declared.
pub fn chara_document() -> CharaDocument {
    let blocks = vec![
        block(
            "Custom",
            "0.0.0",
            BlockData::Custom(Custom {
                face: Value::map([("shapeValueFace", Value::Array(vec![Value::F32(0.5); 4]))]),
                body: Value::map([("skinMainColor", Value::str("#f0d0c0"))]),
                hair: Value::map([("hairId", Value::Array(vec![Value::UInt(1), Value::UInt(2)]))]),
            }),
        ),
        block(
            "Coordinate",
            "0.0.0",
            BlockData::Coordinate(Coordinate::Outfits {
                outfits: (0..3).map(outfit).collect(),
            }),
        ),
        block("Parameter", "0.0.5", BlockData::Parameter(parameter("Koi", "Kana"))),
        block(
            "Status",
            "0.0.0",
            BlockData::Status(Value::map([("clothesState", Value::Bin(vec![0; 9]))])),
        ),
        block(
            "KKEx",
            "3",
            BlockData::KKEx(kkex(&[("MaterialShaderList", shader_list())])),
        ),
        block("Mystery", "9.9.9", BlockData::Unknown(vec![0xca, 0xfe, 0xba, 0xbe])),
    ];
    CharaDocument {
        png: Some(png::placeholder_png()),
        product_no: 100,
        header: "【KoiKatuChara】".to_string(),
        version: "0.0.0".to_string(),
        face_png: png::placeholder_png(),
        storage_order: vec![5, 2, 0, 1, 3, 4],
        blocks,
    }
}

pub fn chara_bytes() -> Vec<u8> {
    chara_document().to_bytes().unwrap()
}

pub fn moved(x: f32, y: f32, z: f32) -> ChangeAmount {
    ChangeAmount {
        pos: Vector3 { x, y, z },
        rot: Vector3 {
            x: 0.0,
            y: 90.0,
            z: 0.0,
        },
        ..ChangeAmount::default()
    }
}

pub fn item(dic_key: i32, no: i32) -> ItemInfo {
    let mut base = ObjectBase::new(dic_key);
    base.change_amount = moved(dic_key as f32, 0.5, -1.0);
    let mut item = ItemInfo::new(base, 0, 1, no);
    for (index, slot) in item.colors.iter_mut().enumerate() {
        *slot = Some(format!("#ff00{index:02x}"));
    }
    item
}

pub fn folder(dic_key: i32, name: &str, children: Vec<ObjectInfo>) -> ObjectInfo {
    ObjectInfo::Folder(FolderInfo {
        base: ObjectBase::new(dic_key),
        name: name.to_string(),
        children,
    })
}

pub fn character(dic_key: i32, chara: CharaDocument) -> CharacterInfo {
    CharacterInfo {
        base: ObjectBase::new(dic_key),
        sex: 1,
        chara,
        bones: vec![(
            3,
            BoneInfo {
                dic_key: 40,
                change_amount: moved(0.0, 1.0, 0.0),
            },
        )],
        ik_targets: Vec::new(),
        children: vec![(0, vec![ObjectInfo::Item(item(dic_key + 1, 7))])],
        kinematic_mode: 0,
        anime: AnimeInfo {
            group: 0,
            category: 0,
            no: 1,
        },
        hand_pattern: [0, 0],
        nipple: 0.0,
        siru: [0, 1, 0, 2, 0],
        mouth_open: 0.25,
        lip_sync: true,
        look_at: LookAtTarget {
            dic_key: -1,
            change_amount: ChangeAmount::default(),
        },
        enable_ik: false,
        active_ik: [true; 5],
        enable_fk: false,
        active_fk: [false, true, false, true, false, true, false],
        expression: vec![true; 8],
        anime_speed: 1.0,
        anime_pattern: 0.0,
        anime_option_visible: true,
        is_anime_force_loop: false,
        voice: VoiceControl {
            list: vec![AnimeInfo {
                group: 1,
                category: 2,
                no: 3,
            }],
            repeat: 0,
        },
        visible_son: false,
        son_length: 1.0,
        visible_simple: false,
        simple_color: "#0000ff".to_string(),
        anime_option_param: [0.0, 0.0],
        neck_byte_data: vec![1, 2, 3],
        eyes_byte_data: vec![4, 5],
        anime_normalized_time: 0.0,
        access_groups: vec![(0, 1)],
        access_numbers: vec![(2, 3)],
        unknown_flag: false,
    }
}

/// A scene with a folder tree, a lone item and a posed character.
pub fn scene_document(version: &str) -> SceneDocument {
    let mut doc = SceneDocument::new(version.parse().unwrap());
    doc.objects.push((
        0,
        folder(
            0,
            "root",
            vec![
                ObjectInfo::Item(item(1, 10)),
                folder(2, "nested", vec![ObjectInfo::Item(item(3, 11))]),
            ],
        ),
    ));
    doc.objects.push((4, ObjectInfo::Item(item(4, 12))));
    let mut chara = chara_document();
    chara.png = None;
    doc.objects
        .push((5, ObjectInfo::Character(Box::new(character(5, chara)))));
    doc
}

pub fn route_point(dic_key: i32, x: f32) -> RoutePoint {
    RoutePoint {
        dic_key,
        change_amount: moved(x, 0.0, 2.0),
        speed: 2.5,
        ease_type: 1,
        connection: 0,
        aid: AidInfo::default(),
        link: false,
    }
}

/// A waypoint using the aid handle and link flag added in later versions.
pub fn linked_point(dic_key: i32, x: f32) -> RoutePoint {
    RoutePoint {
        connection: 1,
        aid: AidInfo {
            dic_key: dic_key + 100,
            change_amount: moved(x, 1.0, 2.0),
            is_init: true,
        },
        link: true,
        ..route_point(dic_key, x)
    }
}

/// A route carrying a light and a camera, with two waypoints.
pub fn route(dic_key: i32) -> ObjectInfo {
    let mut light_base = ObjectBase::new(dic_key + 1);
    light_base.change_amount = moved(0.0, 3.0, 0.0);
    let light = ObjectInfo::Light(LightInfo {
        base: light_base,
        no: 1,
        color: "#ffeecc".to_string(),
        intensity: 0.75,
        range: 10.0,
        spot_angle: 30.0,
        shadow: true,
        enable: true,
        draw_target: false,
    });
    let mut camera_base = ObjectBase::new(dic_key + 2);
    camera_base.change_amount = moved(-2.0, 1.5, 4.0);
    let camera = ObjectInfo::Camera(CameraInfo {
        base: camera_base,
        name: "tracking".to_string(),
        active: false,
    });

    let mut base = ObjectBase::new(dic_key);
    base.change_amount = moved(1.0, 0.0, 1.0);
    ObjectInfo::Route(RouteInfo {
        base,
        name: "walkway".to_string(),
        children: vec![light, camera],
        points: vec![route_point(100, 0.0), linked_point(101, 5.0)],
        active: true,
        is_loop: false,
        visible_line: true,
        orient: 0,
        color: String::new(),
    })
}

pub fn text(dic_key: i32) -> ObjectInfo {
    let mut base = ObjectBase::new(dic_key);
    base.change_amount = moved(0.0, 2.0, 0.0);
    ObjectInfo::Text(TextInfo {
        base,
        id: 0,
        color: "#ffffff".to_string(),
        outline_color: "#000000".to_string(),
        outline_size: 0.1,
        lines: vec![TextLine {
            font: "MS Gothic".to_string(),
            size: 32,
            line_spacing: 1.0,
            alignment: 4,
            text: "Stage left".to_string(),
        }],
    })
}

/// `scene_document` plus a route holding a light and a camera, and a text
/// label: one object of every kind.
pub fn staged_scene(version: &str) -> SceneDocument {
    let mut doc = scene_document(version);
    doc.objects.push((7, route(7)));
    doc.objects.push((10, text(10)));
    doc
}

pub fn save_document() -> SaveDocument {
    let mut player = chara_document();
    player.png = None;

    let heroines = ["Aoi", "Rin"]
        .iter()
        .enumerate()
        .map(|(index, first)| {
            let mut chara = chara_document();
            chara.png = None;
            if let Some(b) = chara.block_mut("Parameter") {
                b.data = BlockData::Parameter(parameter("Hero", first));
            }
            SaveHeroine {
                chara,
                state: Value::map([
                    ("favor", Value::UInt(index as u64 * 10)),
                    ("isDate", Value::Bool(index == 0)),
                ]),
            }
        })
        .collect();

    SaveDocument {
        version: "1.0.1".to_string(),
        school_name: "Koikatsu Academy".to_string(),
        emblem_id: 2,
        opening: false,
        week: 3,
        player: SavePlayer {
            chara: player,
            state: vec![0x10, 0x20, 0x30],
        },
        heroines,
        tail: vec![0xff, 0x00, 0x7f],
    }
}
