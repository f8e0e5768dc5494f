#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use kkcard_core::SceneDocument;
use kkcard_core::chara::{Block, BlockData, CharaDocument};
use kkcard_core::msgpack::Value;
use kkcard_core::png;

pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kkcard"))
        .args(args)
        .output()
        .expect("failed to run kkcard CLI")
}

pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{extension}",
        std::process::id(),
        nanos
    ))
}

/// Writes `bytes` to a fresh temp file and returns its path as a string.
pub fn write_temp(prefix: &str, bytes: &[u8]) -> String {
    let path = temp_path(prefix, "png");
    std::fs::write(&path, bytes).expect("temp file should be writable");
    path.to_string_lossy().to_string()
}

pub fn chara_bytes() -> Vec<u8> {
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
            Block {
                name: "Parameter".to_string(),
                version: "0.0.5".to_string(),
                data: BlockData::Parameter(parameter),
            },
            Block {
                name: "Status".to_string(),
                version: "0.0.0".to_string(),
                data: BlockData::Status(Value::map([("coordinateType", Value::UInt(0))])),
            },
            Block {
                name: "Mystery".to_string(),
                version: "2.0".to_string(),
                data: BlockData::Unknown(vec![7; 5]),
            },
        ],
        storage_order: vec![2, 0, 1],
    };
    doc.to_bytes().expect("character should encode")
}

pub fn scene_bytes() -> Vec<u8> {
    let doc = SceneDocument::new("1.1.0".parse().expect("version should parse"));
    doc.to_bytes().expect("scene should encode")
}
