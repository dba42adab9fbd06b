#![allow(dead_code)]

use std::path::PathBuf;

use blockdoc_history::{
    Block, BlockDocument, BlockId, History, HistoryConfig, ManualClock, Payload,
};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Editor settings from `tests/fixtures/editor.toml`.
pub fn fixture_config() -> HistoryConfig {
    let path = fixture_path("editor.toml");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    HistoryConfig::from_toml_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

/// A history over a document holding one paragraph per entry of `texts`.
/// Block ids equal their initial text.
pub fn editor(texts: &[&str], config: HistoryConfig) -> (History<BlockDocument>, ManualClock) {
    let clock = ManualClock::new(0);
    let blocks = texts.iter().map(|t| Block::paragraph(*t, *t)).collect();
    let history = History::new(BlockDocument::from_blocks(blocks), config)
        .expect("valid config")
        .with_clock(clock.clone());
    (history, clock)
}

pub fn insert_block(index: usize, id: &str) -> Payload {
    Payload::InsertBlock {
        index,
        block: Block::paragraph(id, id),
    }
}

pub fn type_char(id: &str, offset: usize, ch: char) -> Payload {
    Payload::InsertText {
        id: BlockId::new(id),
        field: "text".to_string(),
        offset,
        text: ch.to_string(),
    }
}

/// Types `text` into block `id` starting at `offset`, one character every
/// `gap_ms` milliseconds.
pub fn type_text(
    history: &mut History<BlockDocument>,
    clock: &ManualClock,
    id: &str,
    offset: usize,
    text: &str,
    gap_ms: u64,
) {
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            clock.advance(gap_ms);
        }
        history
            .edit(type_char(id, offset + i, ch))
            .expect("typing applies");
    }
}

pub fn texts(history: &History<BlockDocument>) -> Vec<String> {
    history.document().texts()
}
