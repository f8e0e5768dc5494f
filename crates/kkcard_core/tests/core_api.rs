mod common;

use kkcard_core::core_api::{CoreErrorCode, Engine, FileKind, LoadedDocument};

#[test]
fn engine_auto_detects_character() {
    let engine = Engine::new();
    let session = engine
        .open_bytes(common::chara_bytes(), None)
        .expect("failed to open character");

    assert_eq!(session.kind(), FileKind::Chara);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.kind, FileKind::Chara);
    assert_eq!(snapshot.version, "0.0.0");
    assert!(snapshot.has_thumbnail);
    assert_eq!(snapshot.character_name.as_deref(), Some("Koi Kana"));
    assert_eq!(snapshot.blocks.len(), 6);

    let mystery = snapshot.blocks.iter().find(|b| b.name == "Mystery").unwrap();
    assert_eq!(mystery.kind, "unknown");
    assert_eq!(mystery.storage_index, 0);
    let kkex = snapshot.blocks.iter().find(|b| b.name == "KKEx").unwrap();
    assert_eq!(kkex.kind, "kkex");
    assert_eq!(kkex.storage_index, 5);
}

#[test]
fn engine_auto_detects_scene() {
    let bytes = common::scene_document("1.1.0").to_bytes().unwrap();
    let session = Engine::new().open_bytes(&bytes, None).unwrap();

    assert_eq!(session.kind(), FileKind::Scene);
    assert!(session.scene().is_some());
    assert!(session.chara().is_none());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.version, "1.1.0");
    assert_eq!(snapshot.object_count, 7);
    let kinds: Vec<_> = snapshot
        .objects_by_kind
        .iter()
        .map(|c| (c.kind.as_str(), c.count))
        .collect();
    assert_eq!(kinds, [("character", 1), ("folder", 2), ("item", 4)]);
}

#[test]
fn engine_auto_detects_save() {
    let bytes = common::save_document().to_bytes().unwrap();
    let session = Engine::new().open_bytes(&bytes, None).unwrap();

    assert_eq!(session.kind(), FileKind::Save);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.school_name.as_deref(), Some("Koikatsu Academy"));
    assert_eq!(snapshot.heroine_names, ["Hero Aoi", "Hero Rin"]);
    assert!(!snapshot.has_thumbnail);
}

#[test]
fn hint_selects_decoder() {
    let engine = Engine::new();
    let bytes = common::chara_bytes();

    let session = engine.open_bytes(&bytes, Some(FileKind::Chara)).unwrap();
    assert!(matches!(session.document(), LoadedDocument::Chara(_)));

    let err = engine
        .open_bytes(&bytes, Some(FileKind::Scene))
        .expect_err("a character should not parse as a scene");
    assert_eq!(err.code, CoreErrorCode::Parse);
    assert!(err.message.starts_with("failed to parse as scene"));
}

#[test]
fn garbage_reports_every_decoder() {
    let err = Engine::new()
        .open_bytes([0u8; 16], None)
        .expect_err("garbage should not parse");

    assert_eq!(err.code, CoreErrorCode::Parse);
    for kind in ["character", "scene", "save"] {
        assert!(err.message.contains(kind), "{}", err.message);
    }
}

#[test]
fn session_resaves_identically() {
    let bytes = common::scene_document("1.0.3").to_bytes().unwrap();
    let session = Engine::new().open_bytes(&bytes, None).unwrap();

    assert_eq!(session.to_bytes().unwrap(), bytes);
    assert!(session.verify_round_trip().unwrap());
}

#[test]
fn chara_edits_flow_through_session() {
    let mut session = Engine::new()
        .open_bytes(common::chara_bytes(), None)
        .unwrap();
    let doc = session.chara_mut().unwrap();
    doc.block_mut("Parameter")
        .and_then(|b| match &mut b.data {
            kkcard_core::chara::BlockData::Parameter(p) => Some(p),
            _ => None,
        })
        .unwrap()
        .insert("lastname", kkcard_core::msgpack::Value::str("Ai"));

    assert_eq!(session.snapshot().character_name.as_deref(), Some("Ai Kana"));
    let reopened = Engine::new()
        .open_bytes(session.to_bytes().unwrap(), None)
        .unwrap();
    assert_eq!(reopened.snapshot().character_name.as_deref(), Some("Ai Kana"));
}

#[test]
fn chara_mut_is_unsupported_for_scenes() {
    let bytes = common::scene_document("1.1.0").to_bytes().unwrap();
    let mut session = Engine::new().open_bytes(&bytes, None).unwrap();
    let err = session.chara_mut().unwrap_err();
    assert_eq!(err.code, CoreErrorCode::UnsupportedOperation);
}

#[test]
fn open_path_reports_missing_files() {
    let path = std::env::temp_dir().join("kkcard-core-api-missing.png");
    let _ = std::fs::remove_file(&path);
    let err = Engine::new().open_path(&path, None).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Io);
}
