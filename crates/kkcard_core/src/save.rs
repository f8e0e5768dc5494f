//! Game save data: a short header, the player, and every heroine, each as an
//! embedded character followed by per-character state.

use std::path::Path;

use serde::Serialize;

use crate::chara::CharaDocument;
use crate::error::{Error, Result};
use crate::msgpack::{self, Value};
use crate::reader::{ByteReader, Prefix};
use crate::writer::ByteWriter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePlayer {
    pub chara: CharaDocument,
    /// Player state in a format this crate does not interpret.
    #[serde(serialize_with = "crate::b64::serialize")]
    pub state: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveHeroine {
    pub chara: CharaDocument,
    pub state: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveDocument {
    pub version: String,
    pub school_name: String,
    pub emblem_id: i32,
    pub opening: bool,
    pub week: i32,
    pub player: SavePlayer,
    pub heroines: Vec<SaveHeroine>,
    /// Remaining data after the heroines, kept verbatim.
    #[serde(serialize_with = "crate::b64::serialize")]
    pub tail: Vec<u8>,
}

impl SaveDocument {
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let version = r.read_var_string()?;
        let school_name = r.read_var_string()?;
        let emblem_id = r.read_i32()?;
        let opening = r.read_bool()?;
        let week = r.read_i32()?;

        let player = SavePlayer {
            chara: CharaDocument::decode(&mut r).map_err(|e| e.in_block("player"))?,
            state: r.read_len_prefixed(Prefix::I32)?.to_vec(),
        };

        let count = r.read_count()?;
        let mut heroines = Vec::with_capacity(count.min(r.remaining()));
        for index in 0..count {
            let context = format!("heroine {index}");
            let chara = CharaDocument::decode(&mut r).map_err(|e| e.in_block(&context))?;
            let state_offset = r.position();
            let state = msgpack::decode(r.read_len_prefixed(Prefix::I32)?).map_err(|e| {
                Error::format(state_offset, format!("{context} state: {e}"))
            })?;
            heroines.push(SaveHeroine { chara, state });
        }

        Ok(Self {
            version,
            school_name,
            emblem_id,
            opening,
            week,
            player,
            heroines,
            tail: r.rest().to_vec(),
        })
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        w.write_var_string(&self.version);
        w.write_var_string(&self.school_name);
        w.write_i32(self.emblem_id);
        w.write_bool(self.opening);
        w.write_i32(self.week);

        self.player.chara.encode(&mut w)?;
        w.write_len_prefixed(Prefix::I32, &self.player.state)?;

        w.write_count(self.heroines.len())?;
        for heroine in &self.heroines {
            heroine.chara.encode(&mut w)?;
            w.write_len_prefixed(Prefix::I32, &msgpack::encode(&heroine.state)?)?;
        }

        w.write_bytes(&self.tail);
        Ok(w.into_bytes())
    }

    pub fn heroine_names(&self) -> Vec<String> {
        self.heroines
            .iter()
            .map(|h| h.chara.full_name().unwrap_or_default())
            .collect()
    }
}
