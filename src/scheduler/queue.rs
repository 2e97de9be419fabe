use crate::scheduler::{WorkItem, WorkKind};
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// One admitted item plus its admission sequence number
#[derive(Debug)]
struct QueuedEntry {
    seq: u64,
    item: WorkItem,
}

/// Admission-controlled three-lane FIFO
///
/// Lanes:
/// - category: global FIFO of directory-discovery work
/// - product: one FIFO per directory path, held in insertion order so the
///   fallback scan over lanes is deterministic
/// - other: catch-all FIFO
///
/// A fingerprint is admitted at most once per queue lifetime; re-proposals
/// are rejected without side effects. Every admission gets a sequence
/// number so the no-preference dequeue can restore global admission order.
/// The queue is single-threaded on purpose: the owning scheduler serializes
/// access, so the membership check and the append cannot race.
#[derive(Debug, Default)]
pub struct WorkQueue {
    category: VecDeque<QueuedEntry>,
    product: IndexMap<String, VecDeque<QueuedEntry>>,
    other: VecDeque<QueuedEntry>,

    /// Every fingerprint ever admitted this session
    admitted: HashSet<String>,

    next_seq: u64,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits an item into its lane
    ///
    /// Returns `false` without touching any lane when the fingerprint has
    /// already been admitted this session.
    pub fn enqueue(&mut self, item: WorkItem) -> bool {
        if !self.admitted.insert(item.fingerprint().to_string()) {
            debug!(fingerprint = item.fingerprint(), "rejecting duplicate admission");
            return false;
        }

        let entry = QueuedEntry {
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;

        match entry.item.kind() {
            WorkKind::Category => {
                debug!(url = %entry.item.url(), "queued category work");
                self.category.push_back(entry);
            }
            WorkKind::Product { directory } => {
                debug!(url = %entry.item.url(), directory, "queued product work");
                let lane = self.product.entry(directory.clone()).or_default();
                lane.push_back(entry);
            }
            WorkKind::Other => {
                debug!(url = %entry.item.url(), "queued other work");
                self.other.push_back(entry);
            }
        }
        true
    }

    /// Pops the next item
    ///
    /// With a preferred directory the pop order is: preferred product lane,
    /// category lane, remaining product lanes in insertion order, other
    /// lane. With no preference the globally oldest admission wins,
    /// regardless of lane. `None` when all lanes are drained.
    pub fn dequeue(&mut self, preferred: Option<&str>) -> Option<WorkItem> {
        match preferred {
            Some(path) => self.dequeue_prioritized(path),
            None => self.dequeue_fifo(),
        }
    }

    fn dequeue_prioritized(&mut self, preferred: &str) -> Option<WorkItem> {
        if let Some(lane) = self.product.get_mut(preferred) {
            if let Some(entry) = lane.pop_front() {
                return Some(entry.item);
            }
        }

        if let Some(entry) = self.category.pop_front() {
            return Some(entry.item);
        }

        for (path, lane) in self.product.iter_mut() {
            if path == preferred {
                continue;
            }
            if let Some(entry) = lane.pop_front() {
                return Some(entry.item);
            }
        }

        self.other.pop_front().map(|entry| entry.item)
    }

    /// Pops the oldest admission across all lanes
    ///
    /// Per-lane order is FIFO, so the globally oldest entry is always at
    /// some lane head; scanning heads is enough.
    fn dequeue_fifo(&mut self) -> Option<WorkItem> {
        enum Lane {
            Category,
            Product(usize),
            Other,
        }

        let mut oldest: Option<(u64, Lane)> = None;

        if let Some(entry) = self.category.front() {
            oldest = Some((entry.seq, Lane::Category));
        }
        for (index, lane) in self.product.values().enumerate() {
            if let Some(entry) = lane.front() {
                if oldest.as_ref().is_none_or(|(seq, _)| entry.seq < *seq) {
                    oldest = Some((entry.seq, Lane::Product(index)));
                }
            }
        }
        if let Some(entry) = self.other.front() {
            if oldest.as_ref().is_none_or(|(seq, _)| entry.seq < *seq) {
                oldest = Some((entry.seq, Lane::Other));
            }
        }

        match oldest? {
            (_, Lane::Category) => self.category.pop_front().map(|entry| entry.item),
            (_, Lane::Product(index)) => self
                .product
                .get_index_mut(index)
                .and_then(|(_, lane)| lane.pop_front())
                .map(|entry| entry.item),
            (_, Lane::Other) => self.other.pop_front().map(|entry| entry.item),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Total items currently waiting across all lanes
    pub fn pending(&self) -> usize {
        self.category.len()
            + self.product.values().map(VecDeque::len).sum::<usize>()
            + self.other.len()
    }

    pub fn stats(&self) -> QueueStats {
        let product_pending: Vec<(String, usize)> = self
            .product
            .iter()
            .map(|(path, lane)| (path.clone(), lane.len()))
            .collect();
        let total_product_pending = product_pending.iter().map(|(_, n)| n).sum();

        QueueStats {
            category_pending: self.category.len(),
            product_pending,
            total_product_pending,
            other_pending: self.other.len(),
            total_pending: self.pending(),
            total_admitted: self.admitted.len() as u64,
        }
    }
}

/// Per-lane queue counters
#[derive(Debug, Clone)]
pub struct QueueStats {
    pub category_pending: usize,

    /// Pending product work per directory, in lane-creation order
    pub product_pending: Vec<(String, usize)>,

    pub total_product_pending: usize,
    pub other_pending: usize,
    pub total_pending: usize,

    /// Lifetime count of unique fingerprints admitted
    pub total_admitted: u64,
}
