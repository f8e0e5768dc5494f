mod common;

use kkcard_core::chara::BlockData;
use kkcard_core::msgpack::Value;
use kkcard_core::{ErrorKind, SaveDocument};

#[test]
fn save_round_trips_byte_for_byte() {
    let doc = common::save_document();
    let bytes = doc.to_bytes().unwrap();

    let loaded = SaveDocument::load(&bytes).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(loaded.to_bytes().unwrap(), bytes);
}

#[test]
fn header_and_characters_decode() {
    let bytes = common::save_document().to_bytes().unwrap();
    let doc = SaveDocument::load(&bytes).unwrap();

    assert_eq!(doc.version, "1.0.1");
    assert_eq!(doc.school_name, "Koikatsu Academy");
    assert_eq!(doc.week, 3);
    assert!(doc.player.chara.png.is_none());
    assert_eq!(doc.player.chara.full_name().as_deref(), Some("Koi Kana"));
    assert_eq!(doc.player.state, [0x10, 0x20, 0x30]);
    assert_eq!(doc.heroine_names(), ["Hero Aoi", "Hero Rin"]);
    assert_eq!(doc.heroines[1].state.get("favor"), Some(&Value::UInt(10)));
    assert_eq!(doc.tail, [0xff, 0x00, 0x7f]);
}

#[test]
fn heroine_failure_names_the_heroine() {
    let mut doc = common::save_document();
    // 0xc1 is never a valid MessagePack marker
    doc.heroines[1].chara.block_mut("Parameter").unwrap().data = BlockData::Unknown(vec![0xc1]);
    let bytes = doc.to_bytes().unwrap();

    let err = SaveDocument::load(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("heroine 1"), "{err}");
}

#[test]
fn truncated_save_fails() {
    let bytes = common::save_document().to_bytes().unwrap();
    let err = SaveDocument::load(&bytes[..40]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
}
