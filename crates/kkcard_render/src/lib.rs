use std::fmt::Write as _;

use kkcard_core::chara::CharaDocument;
use kkcard_core::core_api::{BlockEntry, LoadedDocument, Session, Snapshot};
use serde_json::{Map as JsonMap, Value as JsonValue};

const LABEL_WIDTH: usize = 14;
const BLOCK_NAME_WIDTH: usize = 14;
const BLOCK_VERSION_WIDTH: usize = 9;
const BLOCK_KIND_WIDTH: usize = 12;

/// Keys holding embedded PNG images anywhere in a document.
const IMAGE_KEYS: [&str; 2] = ["png", "face_png"];
/// Keys holding the block list of a character.
const BLOCK_KEYS: [&str; 2] = ["blocks", "storage_order"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Keep base64 PNG thumbnails in the output.
    pub include_images: bool,
    /// Keep the decoded block contents of every character.
    pub include_blocks: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            include_images: false,
            include_blocks: true,
        }
    }
}

/// One-way JSON export of a loaded file. Binary fields are base64 strings.
pub fn render_json(session: &Session, options: JsonOptions) -> JsonValue {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    out.insert(
        "kind".to_string(),
        JsonValue::String(snapshot.kind.name().to_string()),
    );
    out.insert(
        "version".to_string(),
        JsonValue::String(snapshot.version.clone()),
    );
    out.insert(
        "summary".to_string(),
        or_error(serde_json::to_value(&snapshot)),
    );

    let mut document = or_error(match session.document() {
        LoadedDocument::Chara(doc) => serde_json::to_value(doc),
        LoadedDocument::Scene(doc) => serde_json::to_value(doc),
        LoadedDocument::Save(doc) => serde_json::to_value(doc),
    });
    if !options.include_images {
        strip_keys(&mut document, &IMAGE_KEYS);
    }
    if !options.include_blocks {
        strip_keys(&mut document, &BLOCK_KEYS);
    }
    out.insert("document".to_string(), document);

    JsonValue::Object(out)
}

fn or_error(value: serde_json::Result<JsonValue>) -> JsonValue {
    value.unwrap_or_else(|e| {
        let mut err = JsonMap::new();
        err.insert("error".to_string(), JsonValue::String(e.to_string()));
        JsonValue::Object(err)
    })
}

fn strip_keys(value: &mut JsonValue, keys: &[&str]) {
    match value {
        JsonValue::Object(map) => {
            for key in keys {
                map.shift_remove(*key);
            }
            for child in map.values_mut() {
                strip_keys(child, keys);
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                strip_keys(item, keys);
            }
        }
        _ => {}
    }
}

/// Plain-text overview of a loaded file.
pub fn render_summary(session: &Session) -> String {
    let snapshot = session.snapshot();
    let mut out = String::new();

    write_field(
        &mut out,
        "File",
        &format!("{} (version {})", snapshot.kind.name(), snapshot.version),
    );
    write_field(
        &mut out,
        "Thumbnail",
        if snapshot.has_thumbnail { "yes" } else { "no" },
    );
    if let Some(name) = &snapshot.character_name {
        write_field(&mut out, "Name", name);
    }

    match session.document() {
        LoadedDocument::Chara(doc) => {
            write_chara_details(&mut out, doc);
            write_blocks(&mut out, &snapshot.blocks);
            write_plugins(&mut out, doc);
        }
        LoadedDocument::Scene(_) => write_objects(&mut out, &snapshot),
        LoadedDocument::Save(doc) => {
            write_field(
                &mut out,
                "School",
                snapshot.school_name.as_deref().unwrap_or_default(),
            );
            write_field(&mut out, "Week", &doc.week.to_string());
            write_blocks(&mut out, &snapshot.blocks);
            write_heroines(&mut out, &snapshot.heroine_names);
        }
    }

    out
}

fn write_field(out: &mut String, label: &str, value: &str) {
    writeln!(out, "{:<width$}{value}", format!("{label}:"), width = LABEL_WIDTH)
        .expect("writing to String cannot fail");
}

fn write_chara_details(out: &mut String, doc: &CharaDocument) {
    write_field(out, "Header", &doc.header);
    write_field(out, "Product", &doc.product_no.to_string());
}

fn write_blocks(out: &mut String, blocks: &[BlockEntry]) {
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, " ::: Blocks :::").expect("writing to String cannot fail");
    if blocks.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
        return;
    }
    for block in blocks {
        writeln!(
            out,
            "  {:<nw$}{:<vw$}{:<kw$}#{}",
            block.name,
            block.version,
            block.kind,
            block.storage_index,
            nw = BLOCK_NAME_WIDTH,
            vw = BLOCK_VERSION_WIDTH,
            kw = BLOCK_KIND_WIDTH,
        )
        .expect("writing to String cannot fail");
    }
}

fn write_plugins(out: &mut String, doc: &CharaDocument) {
    let Some(ext) = doc.kkex() else {
        return;
    };
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, " ::: Extended data :::").expect("writing to String cannot fail");

    let plugins: Vec<&str> = ext
        .root
        .as_map()
        .unwrap_or_default()
        .iter()
        .filter_map(|(key, _)| key.as_str())
        .collect();
    if plugins.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
    }
    for plugin in plugins {
        let nested: Vec<String> = ext
            .slots
            .iter()
            .filter(|slot| slot.path.plugin == plugin)
            .map(|slot| slot.path.field.to_string())
            .collect();
        if nested.is_empty() {
            writeln!(out, "  {plugin}").expect("writing to String cannot fail");
        } else {
            writeln!(out, "  {plugin} [{}]", nested.join(", "))
                .expect("writing to String cannot fail");
        }
    }
}

fn write_objects(out: &mut String, snapshot: &Snapshot) {
    write_field(out, "Objects", &snapshot.object_count.to_string());
    for count in &snapshot.objects_by_kind {
        writeln!(
            out,
            "  {:<width$}{}",
            count.kind,
            count.count,
            width = LABEL_WIDTH - 2
        )
        .expect("writing to String cannot fail");
    }
}

fn write_heroines(out: &mut String, names: &[String]) {
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, " ::: Heroines :::").expect("writing to String cannot fail");
    if names.is_empty() {
        writeln!(out, "  none").expect("writing to String cannot fail");
    }
    for (index, name) in names.iter().enumerate() {
        let name = if name.is_empty() { "(unnamed)" } else { name };
        writeln!(out, "  {:>2}. {name}", index + 1).expect("writing to String cannot fail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_keys_is_recursive() {
        let mut value = serde_json::json!({
            "png": "AAAA",
            "objects": [{"chara": {"png": null, "face_png": "BB", "header": "h"}}],
        });
        strip_keys(&mut value, &IMAGE_KEYS);
        assert_eq!(
            value,
            serde_json::json!({"objects": [{"chara": {"header": "h"}}]})
        );
    }

    #[test]
    fn fields_are_aligned() {
        let mut out = String::new();
        write_field(&mut out, "Name", "Koi Kana");
        assert_eq!(out, "Name:         Koi Kana\n");
    }
}
