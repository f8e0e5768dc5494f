use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use kkcard_core::core_api::{Engine, FileKind, Session};
use kkcard_render::{JsonOptions, render_json, render_summary};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    #[value(alias = "character", alias = "card")]
    Chara,
    Scene,
    Save,
}

impl From<KindArg> for FileKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Chara => FileKind::Chara,
            KindArg::Scene => FileKind::Scene,
            KindArg::Save => FileKind::Save,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "FILE")]
    path: PathBuf,
    /// Skip detection and decode as this kind.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
    #[arg(long)]
    json: bool,
    #[arg(long, requires = "json")]
    pretty: bool,
    /// Include embedded PNG images in JSON output.
    #[arg(long, requires = "json")]
    images: bool,
    /// Only report the block table.
    #[arg(long)]
    blocks: bool,
    /// Only report scene object counts.
    #[arg(long)]
    objects: bool,
    /// Re-encode the file and write it here.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Fail unless re-encoding reproduces the input bytes.
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldSelection {
    blocks: bool,
    objects: bool,
}

impl FieldSelection {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            blocks: cli.blocks,
            objects: cli.objects,
        }
    }

    fn is_field_mode(self) -> bool {
        self.blocks || self.objects
    }

    fn selected_json(self, session: &Session) -> JsonMap<String, JsonValue> {
        let snapshot = session.snapshot();
        let mut out = JsonMap::new();
        out.insert(
            "kind".to_string(),
            JsonValue::String(snapshot.kind.name().to_string()),
        );
        if self.blocks {
            let blocks = snapshot
                .blocks
                .iter()
                .map(|block| {
                    let mut entry = JsonMap::new();
                    entry.insert("name".to_string(), JsonValue::from(block.name.as_str()));
                    entry.insert(
                        "version".to_string(),
                        JsonValue::from(block.version.as_str()),
                    );
                    entry.insert("kind".to_string(), JsonValue::from(block.kind.as_str()));
                    entry.insert(
                        "storage_index".to_string(),
                        JsonValue::from(block.storage_index),
                    );
                    JsonValue::Object(entry)
                })
                .collect();
            out.insert("blocks".to_string(), JsonValue::Array(blocks));
        }
        if self.objects {
            let mut counts = JsonMap::new();
            for count in &snapshot.objects_by_kind {
                counts.insert(count.kind.clone(), JsonValue::from(count.count));
            }
            out.insert(
                "object_count".to_string(),
                JsonValue::from(snapshot.object_count),
            );
            out.insert("objects".to_string(), JsonValue::Object(counts));
        }
        out
    }

    fn selected_pairs(self, session: &Session) -> Vec<(String, String)> {
        let snapshot = session.snapshot();
        let mut pairs = Vec::new();
        if self.blocks {
            for block in &snapshot.blocks {
                pairs.push((
                    block.name.clone(),
                    format!("{} {} #{}", block.version, block.kind, block.storage_index),
                ));
            }
        }
        if self.objects {
            pairs.push(("objects".to_string(), snapshot.object_count.to_string()));
            for count in &snapshot.objects_by_kind {
                pairs.push((count.kind.clone(), count.count.to_string()));
            }
        }
        pairs
    }
}

fn main() {
    let cli = Cli::parse();
    let fields = FieldSelection::from_cli(&cli);

    if cli.check && cli.output.is_some() {
        eprintln!("--check and --output cannot be combined");
        process::exit(2);
    }

    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new();
    let session = engine
        .open_bytes(&bytes, cli.kind.map(FileKind::from))
        .unwrap_or_else(|e| {
            eprintln!("Error parsing file: {}", cli.path.display());
            eprintln!("  {e}");
            process::exit(1);
        });

    if cli.check {
        let resaved = session.to_bytes().unwrap_or_else(|e| {
            eprintln!("Error re-encoding {}: {e}", cli.path.display());
            process::exit(1);
        });
        if resaved != bytes {
            let offset = first_difference(&bytes, &resaved);
            eprintln!(
                "Round-trip mismatch in {}: {} bytes in, {} bytes out, first difference at {offset:#x}",
                cli.path.display(),
                bytes.len(),
                resaved.len()
            );
            process::exit(1);
        }
        println!("{}: round-trip ok", cli.path.display());
        return;
    }

    if let Some(out_path) = &cli.output {
        let resaved = session.to_bytes().unwrap_or_else(|e| {
            eprintln!("Error re-encoding {}: {e}", cli.path.display());
            process::exit(1);
        });
        fs::write(out_path, resaved).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        println!("Wrote {} to {}", session.kind().name(), out_path.display());
        return;
    }

    if cli.json {
        let json = if fields.is_field_mode() {
            JsonValue::Object(fields.selected_json(&session))
        } else {
            render_json(
                &session,
                JsonOptions {
                    include_images: cli.images,
                    ..JsonOptions::default()
                },
            )
        };
        let rendered = if cli.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        }
        .unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if fields.is_field_mode() {
        for (key, value) in fields.selected_pairs(&session) {
            println!("{key}={value}");
        }
        return;
    }

    print!("{}", render_summary(&session));
}

fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .unwrap_or(a.len().min(b.len()))
}
