//! Process-wide topic bus.
//!
//! Readers register their cache under `(domain_id, topic)`; a write copies the
//! sample into every cache still alive under the same key. Entries are weak so
//! a dropped reader unsubscribes itself.

use crate::cache::{ReaderCache, Sample};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, Weak},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct TopicKey {
    pub domain_id: u32,
    pub topic: String,
}

#[derive(Debug, Default)]
pub(crate) struct Bus {
    topics: Mutex<HashMap<TopicKey, Vec<Weak<ReaderCache>>>>,
}

static BUS: OnceLock<Bus> = OnceLock::new();

impl Bus {
    pub fn global() -> &'static Bus {
        BUS.get_or_init(Bus::default)
    }

    pub fn subscribe(&self, key: TopicKey, cache: &Arc<ReaderCache>) {
        let mut topics = self.topics.lock();
        let readers = topics.entry(key).or_default();
        readers.retain(|r| r.strong_count() > 0);
        readers.push(Arc::downgrade(cache));
    }

    /// Deliver `sample` to every live reader of `key`. Returns how many got it.
    pub fn publish(&self, key: &TopicKey, sample: &Sample) -> usize {
        let readers: Vec<Arc<ReaderCache>> = {
            let mut topics = self.topics.lock();
            let Some(entry) = topics.get_mut(key) else {
                return 0;
            };
            entry.retain(|r| r.strong_count() > 0);
            entry.iter().filter_map(Weak::upgrade).collect()
        };

        for reader in &readers {
            reader.push(sample.clone());
        }
        readers.len()
    }
}
