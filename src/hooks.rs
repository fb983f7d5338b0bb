//! Registration hook chain.
//!
//! External listeners may contribute or veto default components before
//! built-in shape-family detection runs. Hooks run in registration
//! order and return a trinary outcome; `HandledStop` short-circuits the
//! rest of the chain and suppresses built-in detection.

use crate::block::builder::BlockBuilder;
use crate::block::instance::BlockInstance;
use crate::error::ForgeResult;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook does not apply to this definition.
    NotApplicable,
    /// The hook contributed but built-in detection may still run.
    HandledContinue,
    /// The hook fully claimed the definition.
    HandledStop,
}

pub trait BlockLoadHook: Send + Sync {
    fn name(&self) -> &str {
        "unnamed_hook"
    }

    fn on_load(
        &self,
        builder: &mut BlockBuilder,
        instance: &dyn BlockInstance,
    ) -> ForgeResult<HookOutcome>;
}

/// Ordered chain of load hooks.
#[derive(Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn BlockLoadHook>>,
}

impl HookChain {
    pub fn new() -> HookChain {
        HookChain::default()
    }

    pub fn register(&mut self, hook: Arc<dyn BlockLoadHook>) {
        log::info!("registered block load hook '{}'", hook.name());
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook in order. The first `HandledStop` wins; any
    /// `HandledContinue` downgrades the aggregate to handled without
    /// stopping later hooks.
    pub fn run(
        &self,
        builder: &mut BlockBuilder,
        instance: &dyn BlockInstance,
    ) -> ForgeResult<HookOutcome> {
        let mut aggregate = HookOutcome::NotApplicable;
        for hook in &self.hooks {
            match hook.on_load(builder, instance)? {
                HookOutcome::NotApplicable => {}
                HookOutcome::HandledContinue => aggregate = HookOutcome::HandledContinue,
                HookOutcome::HandledStop => return Ok(HookOutcome::HandledStop),
            }
        }
        Ok(aggregate)
    }
}

lazy_static! {
    /// Process-wide hook chain consulted by `BlockBuilder::register`.
    pub static ref LOAD_HOOKS: RwLock<HookChain> = RwLock::new(HookChain::new());
}

pub fn register_load_hook(hook: Arc<dyn BlockLoadHook>) {
    LOAD_HOOKS.write().register(hook);
}
