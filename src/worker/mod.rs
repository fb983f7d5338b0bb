//! Worker-side registry replication.
//!
//! Registration happens on the main thread; worker threads never see
//! the builders or their closures. Instead every successful
//! registration appends a [`BlockDescriptor`] to a process-wide log in
//! finalize order, and each worker replays that ordered stream into its
//! own private [`BlockRegistries`]. Replay is idempotent, so a worker
//! that starts late simply catches up from the log.

mod descriptor;

pub use descriptor::{BlockDescriptor, ComponentData, PermutationData};

use crate::error::ForgeResult;
use crate::registry::{BlockRegistries, IdAllocator, FIRST_BLOCK_ID};
use crossbeam_channel::{unbounded, Sender};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::thread;

lazy_static! {
    /// Every successful registration, in finalize order.
    static ref DESCRIPTOR_LOG: RwLock<Vec<BlockDescriptor>> = RwLock::new(Vec::new());

    /// The running pool, if any.
    static ref POOL: RwLock<Option<WorkerPool>> = RwLock::new(None);
}

/// Appends a descriptor to the log and forwards it to running workers.
/// Called only after the registries accepted the registration.
pub(crate) fn enqueue(descriptor: BlockDescriptor) {
    // The log lock is released before touching the pool; a descriptor
    // racing with pool startup may land in both the backlog snapshot
    // and the broadcast, which replay's idempotence absorbs.
    DESCRIPTOR_LOG.write().push(descriptor.clone());
    if let Some(pool) = POOL.read().as_ref() {
        pool.broadcast(descriptor);
    }
}

/// Snapshot of the descriptor log.
pub fn descriptor_log() -> Vec<BlockDescriptor> {
    DESCRIPTOR_LOG.read().clone()
}

/// Replays the current log into the given registries, returning how
/// many descriptors were applied.
pub fn replay_log(registries: &mut BlockRegistries, ids: &IdAllocator) -> ForgeResult<usize> {
    let log = DESCRIPTOR_LOG.read();
    for descriptor in log.iter() {
        descriptor.replay(registries, ids)?;
    }
    Ok(log.len())
}

/// Starts the worker pool with one replica per available core.
pub fn start() {
    start_with(num_cpus::get().max(1));
}

/// Starts the worker pool with an explicit replica count. Each worker
/// first catches up on the existing log, then applies descriptors as
/// they arrive.
pub fn start_with(threads: usize) {
    let mut slot = POOL.write();
    if slot.is_some() {
        log::warn!("worker pool already running");
        return;
    }
    let backlog = DESCRIPTOR_LOG.read().clone();
    *slot = Some(WorkerPool::spawn(threads, backlog));
}

/// Stops the pool, draining in-flight descriptors first.
pub fn shutdown() {
    if let Some(pool) = POOL.write().take() {
        pool.join();
    }
}

struct WorkerPool {
    senders: Vec<Sender<BlockDescriptor>>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    fn spawn(threads: usize, backlog: Vec<BlockDescriptor>) -> WorkerPool {
        let mut senders = Vec::with_capacity(threads);
        let mut handles = Vec::with_capacity(threads);
        for index in 0..threads {
            let (sender, receiver) = unbounded::<BlockDescriptor>();
            let initial = backlog.clone();
            let handle = thread::Builder::new()
                .name(format!("block-replica-{index}"))
                .spawn(move || {
                    let mut registries = BlockRegistries::new();
                    let ids = IdAllocator::new(FIRST_BLOCK_ID);
                    for descriptor in initial {
                        apply(&mut registries, &ids, &descriptor);
                    }
                    while let Ok(descriptor) = receiver.recv() {
                        apply(&mut registries, &ids, &descriptor);
                    }
                    log::debug!(
                        "block replica stopping with {} documents",
                        registries.palette.document_count()
                    );
                })
                .unwrap_or_else(|e| panic!("failed to spawn block replica thread: {e}"));
            senders.push(sender);
            handles.push(handle);
        }
        log::info!("started {} block registry replicas", threads);
        WorkerPool {
            senders,
            handles,
        }
    }

    fn broadcast(&self, descriptor: BlockDescriptor) {
        for sender in &self.senders {
            // A closed channel means that replica already stopped.
            let _ = sender.send(descriptor.clone());
        }
    }

    fn join(self) {
        drop(self.senders);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn apply(registries: &mut BlockRegistries, ids: &IdAllocator, descriptor: &BlockDescriptor) {
    match descriptor.replay(registries, ids) {
        Ok(registered) => log::trace!(
            "replicated block '{}' ({} states)",
            registered.string_id,
            registered.state_count
        ),
        // The main thread already accepted this registration; a replica
        // failure indicates a codec/shape drift worth surfacing loudly.
        Err(e) => log::error!(
            "failed to replicate block '{}': {}",
            descriptor.string_id,
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::basic::BasicBlock;
    use crate::block::builder::BlockBuilder;
    use crate::block::instance::ShapeClass;
    use crate::block::recipes;

    fn descriptor(id: &str, numeric_id: u32) -> BlockDescriptor {
        let block = BasicBlock::new(ShapeClass::Crop { max_age: 3 });
        let mut builder = BlockBuilder::new(id).unwrap();
        builder.set_numeric_id(numeric_id);
        recipes::make_crop(&mut builder, &block).unwrap();
        BlockDescriptor::from_builder(&builder, &block, true).unwrap()
    }

    #[test]
    fn replayed_stream_matches_direct_replay() {
        let first = descriptor("forge:rice", 13000);
        let second = descriptor("forge:barley", 13001);

        let mut a = BlockRegistries::new();
        let ids_a = IdAllocator::new(FIRST_BLOCK_ID);
        first.replay(&mut a, &ids_a).unwrap();
        second.replay(&mut a, &ids_a).unwrap();

        let mut b = BlockRegistries::new();
        let ids_b = IdAllocator::new(FIRST_BLOCK_ID);
        for d in [&first, &second] {
            d.replay(&mut b, &ids_b).unwrap();
        }

        assert_eq!(a.palette.state_count(), b.palette.state_count());
        assert_eq!(a.palette.document_count(), b.palette.document_count());
        assert_eq!(a.upgrades.keys(), b.upgrades.keys());
        assert_eq!(a.creative.placements(), b.creative.placements());
    }

    #[test]
    fn pool_replicas_drain_before_shutdown() {
        let backlog = vec![descriptor("forge:oats", 13100)];
        let pool = WorkerPool::spawn(2, backlog);
        pool.broadcast(descriptor("forge:rye", 13101));
        // Join drains the channels; nothing to assert beyond a clean
        // exit without panics.
        pool.join();
    }
}
