//! Process-wide build cache.
//!
//! [`build`] constructs and loads each loader type at most once per
//! process and hands out the same `&'static` instance afterwards.
//!
//! # Thread Safety
//!
//! Every loader type gets its own slot. Finding the slot takes a short
//! global lock; constructing and loading happens under the slot's own
//! mutex, so two racing callers never produce two instances and a slow
//! load of one dataset does not block builds of another. A failed build
//! leaves the slot empty and the next call starts over.

#![deny(unsafe_code)]

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, OnceLock, PoisonError};

use tracing::{debug, warn};

use crate::error::Result;
use crate::loader::{DatasetLoader, ensure_contract};

type Instance = &'static (dyn Any + Send + Sync);

#[derive(Default)]
struct Slot {
    guard: Mutex<()>,
    instance: OnceLock<Instance>,
}

impl Slot {
    fn get<L: DatasetLoader>(&self) -> Option<&'static L> {
        let instance: Instance = *self.instance.get()?;
        instance.downcast_ref::<L>()
    }
}

/// Slots are leaked so they can be used without holding the map lock.
static SLOTS: LazyLock<Mutex<HashMap<TypeId, &'static Slot>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn slot<L: DatasetLoader>() -> &'static Slot {
    let mut slots = SLOTS.lock().unwrap_or_else(PoisonError::into_inner);
    *slots
        .entry(TypeId::of::<L>())
        .or_insert_with(|| -> &'static Slot { Box::leak(Box::new(Slot::default())) })
}

/// Returns the process-wide, loaded instance of `L`.
///
/// The first call constructs `L`, loads it and stores it; later calls
/// return the identical instance without constructing or loading again.
///
/// # Errors
///
/// Propagates `ContractViolation`, `Unavailable` and `Format` errors from
/// the contract check and from [`DatasetLoader::load`]. Nothing is cached
/// on failure.
pub fn build<L: DatasetLoader>() -> Result<&'static L> {
    let slot = slot::<L>();
    if let Some(loader) = slot.get::<L>() {
        debug!(dataset = L::ID, "dataset build cache hit");
        return Ok(loader);
    }

    let _guard = slot.guard.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(loader) = slot.get::<L>() {
        debug!(dataset = L::ID, "dataset built by concurrent caller");
        return Ok(loader);
    }

    ensure_contract::<L>()?;
    let mut loader = L::default();
    if let Err(err) = loader.load() {
        warn!(dataset = L::ID, error = %err, "dataset build failed");
        return Err(err);
    }

    let loader: &'static L = Box::leak(Box::new(loader));
    if slot.instance.set(loader).is_err() {
        // Unreachable while the slot guard is held.
        warn!(dataset = L::ID, "dataset slot already populated");
    }
    Ok(loader)
}

/// Whether `L` has been built successfully in this process.
pub fn is_built<L: DatasetLoader>() -> bool {
    let slots = SLOTS.lock().unwrap_or_else(PoisonError::into_inner);
    slots
        .get(&TypeId::of::<L>())
        .is_some_and(|slot| slot.instance.get().is_some())
}
