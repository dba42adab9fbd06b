//! Property tests for edit grouping and replay.
//!
//! 1. Each pause of at least `newGroupDelay` starts exactly one new undo step
//! 2. Undoing everything restores the initial document; redoing everything
//!    restores the final one
//! 3. The undo stack never holds more than `maxHistoryLength` steps

mod common;

use blockdoc_history::{Block, HistoryConfig, Payload};
use proptest::prelude::*;

use common::{editor, type_char};

const DELAY: u64 = 500;

fn config() -> HistoryConfig {
    HistoryConfig::default()
        .with_new_group_delay(DELAY)
        .with_history_debounce_time(1_000_000)
        .with_max_history_length(100)
}

#[derive(Debug, Clone)]
enum Step {
    Insert { slot: usize },
    Type { slot: usize, offset: usize, ch: char },
    Delete { slot: usize, offset: usize },
    Boundary,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => any::<usize>().prop_map(|slot| Step::Insert { slot }),
        4 => (any::<usize>(), any::<usize>(), prop::char::range('a', 'e'))
            .prop_map(|(slot, offset, ch)| Step::Type { slot, offset, ch }),
        2 => (any::<usize>(), any::<usize>())
            .prop_map(|(slot, offset)| Step::Delete { slot, offset }),
        1 => Just(Step::Boundary),
    ]
}

proptest! {
    #[test]
    fn pauses_split_groups(gaps in prop::collection::vec(0u64..1_200, 0..30)) {
        let (mut h, clock) = editor(&[""], config());
        h.edit(type_char("", 0, 'x')).unwrap();
        for (i, gap) in gaps.iter().enumerate() {
            clock.advance(*gap);
            h.edit(type_char("", i + 1, 'x')).unwrap();
        }
        h.stop_capturing();

        let pauses = gaps.iter().filter(|gap| **gap >= DELAY).count();
        prop_assert_eq!(h.undo_len(), 1 + pauses);
        // Caret-adjacent typing collapses to one operation per step.
        prop_assert!(h.state().undo_stack().all(|tx| tx.len() == 1));
    }

    #[test]
    fn undo_all_then_redo_all_round_trips(
        steps in prop::collection::vec((step(), 0u64..800), 1..40),
    ) {
        let (mut h, clock) = editor(&["seed"], config());
        let initial = h.document().to_json_string();
        let mut next_block = 0;

        for (step, gap) in steps {
            clock.advance(gap);
            let blocks = h.document().blocks.clone();
            let payload = match step {
                Step::Boundary => {
                    h.stop_capturing();
                    continue;
                }
                Step::Insert { slot } => {
                    next_block += 1;
                    Payload::InsertBlock {
                        index: slot % (blocks.len() + 1),
                        block: Block::paragraph(format!("b{next_block}"), ""),
                    }
                }
                Step::Type { slot, offset, ch } => {
                    let Some(block) = blocks.get(slot % blocks.len().max(1)) else { continue };
                    let len = h.document().texts()[slot % blocks.len()].chars().count();
                    Payload::InsertText {
                        id: block.id.clone(),
                        field: "text".to_string(),
                        offset: offset % (len + 1),
                        text: ch.to_string(),
                    }
                }
                Step::Delete { slot, offset } => {
                    let Some(block) = blocks.get(slot % blocks.len().max(1)) else { continue };
                    let text = h.document().texts()[slot % blocks.len()].clone();
                    let len = text.chars().count();
                    if len == 0 {
                        continue;
                    }
                    let at = offset % len;
                    Payload::DeleteText {
                        id: block.id.clone(),
                        field: "text".to_string(),
                        offset: at,
                        text: text.chars().nth(at).map(String::from).unwrap_or_default(),
                    }
                }
            };
            h.edit(payload).unwrap();
        }
        h.stop_capturing();
        let edited = h.document().to_json_string();

        while h.undo() {}
        prop_assert_eq!(h.document().to_json_string(), initial);
        while h.redo() {}
        prop_assert_eq!(h.document().to_json_string(), edited);
    }

    #[test]
    fn undo_stack_is_bounded(max in 1usize..8, commits in 0usize..20) {
        let (mut h, _clock) = editor(&[], config().with_max_history_length(max));
        for i in 0..commits {
            h.edit(common::insert_block(i, &format!("c{i}"))).unwrap();
            h.stop_capturing();
        }
        prop_assert_eq!(h.undo_len(), commits.min(max));

        let mut undone = 0;
        while h.undo() {
            undone += 1;
        }
        prop_assert_eq!(undone, commits.min(max));
        prop_assert_eq!(h.document().len(), commits - commits.min(max));
    }
}
