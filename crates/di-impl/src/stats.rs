//! 容器统计

use di_abstractions::ContainerStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// 统计计数器
#[derive(Debug, Default)]
pub struct StatsCollector {
    transient_creations: AtomicU64,
    shared_creations: AtomicU64,
    shared_hits: AtomicU64,
    resolution_errors: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_transient_creation(&self) {
        self.transient_creations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shared_creation(&self) {
        self.shared_creations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shared_hit(&self) {
        self.shared_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resolution_error(&self) {
        self.resolution_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成快照
    pub fn snapshot(&self, active_shared_instances: usize) -> ContainerStats {
        ContainerStats {
            transient_creations: self.transient_creations.load(Ordering::Relaxed),
            shared_creations: self.shared_creations.load(Ordering::Relaxed),
            shared_hits: self.shared_hits.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
            active_shared_instances,
        }
    }
}
