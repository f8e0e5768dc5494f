use kkcard_core::SceneDocument;
use kkcard_core::chara::{Block, BlockData, CharaDocument, KkEx, NestedPaths};
use kkcard_core::core_api::{Engine, Session};
use kkcard_core::msgpack::{self, Value};
use kkcard_core::png;
use kkcard_render::{JsonOptions, render_json, render_summary};

const MATERIAL_EDITOR: &str = "com.deathweasel.bepinex.materialeditor";

fn block(name: &str, version: &str, data: BlockData) -> Block {
    Block {
        name: name.to_string(),
        version: version.to_string(),
        data,
    }
}

fn kkex() -> KkEx {
    let shaders = Value::Array(vec![Value::map([
        ("MaterialName", Value::str("cf_m_body")),
        ("ShaderName", Value::str("xukmi/SkinPlus")),
    ])]);
    let data = Value::map([(
        "MaterialShaderList",
        Value::Bin(msgpack::encode(&shaders).expect("shader list should encode")),
    )]);
    let root = Value::map([
        (MATERIAL_EDITOR, Value::Array(vec![Value::UInt(0), data])),
        ("com.example.plain", Value::Nil),
    ]);
    let bytes = msgpack::encode(&root).expect("root should encode");
    KkEx::decode(&bytes, NestedPaths::standard()).expect("kkex should decode")
}

fn chara_session() -> Session {
    let parameter = Value::map([
        ("lastname", Value::str("Koi")),
        ("firstname", Value::str("Kana")),
    ]);
    let doc = CharaDocument {
        png: Some(png::placeholder_png()),
        product_no: 100,
        header: "【KoiKatuChara】".to_string(),
        version: "0.0.0".to_string(),
        face_png: png::placeholder_png(),
        blocks: vec![
            block("Parameter", "0.0.5", BlockData::Parameter(parameter)),
            block("KKEx", "3", BlockData::KKEx(kkex())),
            block("Mystery", "1.0.0", BlockData::Unknown(vec![1, 2, 3])),
        ],
        storage_order: vec![2, 0, 1],
    };
    let bytes = doc.to_bytes().expect("character should encode");
    Engine::new()
        .open_bytes(bytes, None)
        .expect("character should parse")
}

fn scene_session() -> Session {
    let doc = SceneDocument::new("1.1.0".parse().expect("version should parse"));
    let bytes = doc.to_bytes().expect("scene should encode");
    Engine::new()
        .open_bytes(bytes, None)
        .expect("scene should parse")
}

#[test]
fn json_uses_canonical_top_level_order() {
    let value = render_json(&chara_session(), JsonOptions::default());
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(keys, ["kind", "version", "summary", "document"]);
    assert_eq!(value["kind"], "character");
    assert_eq!(value["version"], "0.0.0");
    assert_eq!(value["summary"]["character_name"], "Koi Kana");
}

#[test]
fn images_are_dropped_by_default() {
    let session = chara_session();

    let value = render_json(&session, JsonOptions::default());
    let document = value["document"].as_object().expect("document object");
    assert!(!document.contains_key("png"));
    assert!(!document.contains_key("face_png"));
    assert!(document.contains_key("blocks"));

    let value = render_json(
        &session,
        JsonOptions {
            include_images: true,
            ..JsonOptions::default()
        },
    );
    assert!(value["document"]["png"].is_string());
    assert!(value["document"]["face_png"].is_string());
}

#[test]
fn blocks_can_be_left_out() {
    let value = render_json(
        &chara_session(),
        JsonOptions {
            include_images: false,
            include_blocks: false,
        },
    );
    let document = value["document"].as_object().expect("document object");
    assert!(!document.contains_key("blocks"));
    assert!(!document.contains_key("storage_order"));
    assert_eq!(document["header"], "【KoiKatuChara】");
    // The summary keeps its block table.
    assert_eq!(value["summary"]["blocks"].as_array().map(Vec::len), Some(3));
}

#[test]
fn unknown_block_is_base64() {
    let value = render_json(&chara_session(), JsonOptions::default());
    let mystery = value["document"]["blocks"]
        .as_array()
        .and_then(|blocks| blocks.iter().find(|b| b["name"] == "Mystery"))
        .expect("mystery block");
    assert_eq!(mystery["data"]["kind"], "Unknown");
    assert_eq!(mystery["data"]["data"], "AQID");
}

#[test]
fn summary_lists_blocks_in_declaration_order() {
    let text = render_summary(&chara_session());

    assert!(text.starts_with("File:         character (version 0.0.0)\n"));
    assert!(text.contains("Name:         Koi Kana\n"));
    assert!(text.contains(" ::: Blocks :::\n"));

    let parameter = text.find("  Parameter").expect("parameter row");
    let kkex = text.find("  KKEx").expect("kkex row");
    let mystery = text.find("  Mystery").expect("mystery row");
    assert!(parameter < kkex && kkex < mystery, "{text}");
    assert!(text.contains("unknown     #0\n"), "{text}");
}

#[test]
fn summary_names_plugins_and_nested_fields() {
    let text = render_summary(&chara_session());
    assert!(text.contains(" ::: Extended data :::\n"));
    assert!(
        text.contains(&format!("  {MATERIAL_EDITOR} [MaterialShaderList]\n")),
        "{text}"
    );
    assert!(text.contains("  com.example.plain\n"), "{text}");
}

#[test]
fn scene_summary_counts_objects() {
    let session = scene_session();
    let text = render_summary(&session);

    assert!(text.starts_with("File:         scene (version 1.1.0)\n"));
    assert!(text.contains("Objects:      0\n"));
    assert!(!text.contains(" ::: Blocks :::\n"));

    let value = render_json(&session, JsonOptions::default());
    assert_eq!(value["kind"], "scene");
    assert_eq!(value["summary"]["object_count"], 0);
    assert!(value["document"]["objects"].as_array().is_some_and(Vec::is_empty));
}
