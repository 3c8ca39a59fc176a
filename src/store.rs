//! Keyed construct-once storage and the process-wide ambient slots.
//!
//! An [`InstanceStore`] maps instance keys to lazily initialised cells. The map
//! lock is only held long enough to fetch or create a key's cell; the factory
//! runs against the cell, so a slow construction for one key never blocks
//! lookups of another.

use std::{
    any::{type_name, Any},
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, LazyLock, Mutex},
};

use once_cell::sync::OnceCell;

use crate::RegistryError;

/// Name of the ambient slot used by development-mode registries unless they
/// are configured with another one.
pub const DEFAULT_AMBIENT_SLOT: &str = "__SHARED_RESOURCE_INSTANCES__";

type Handle = Arc<dyn Any + Send + Sync>;
type Cell = Arc<OnceCell<Handle>>;

/// Process-wide table of named stores.
///
/// Lives outside every registry so that a registry rebuilt after a reload
/// finds the instances its predecessor constructed.
static AMBIENT_SLOTS: LazyLock<Mutex<HashMap<String, Arc<InstanceStore>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns the ambient store called `name`, creating it on first use.
///
/// Every call with the same name returns the same store for the lifetime of
/// the process.
pub fn ambient_slot(name: &str) -> Arc<InstanceStore> {
    AMBIENT_SLOTS
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .entry(name.to_owned())
        .or_default()
        .clone()
}

thread_local! {
    /// Keys this thread is currently constructing, tagged with their store's address.
    static CONSTRUCTING: RefCell<HashSet<(usize, String)>> = RefCell::new(HashSet::new());
}

/// Marks `key` as under construction on this thread until dropped.
struct ConstructionMarker {
    store: usize,
    key: String,
}

impl ConstructionMarker {
    fn enter(store: usize, key: &str) -> Self {
        CONSTRUCTING.with(|keys| keys.borrow_mut().insert((store, key.to_owned())));
        Self {
            store,
            key: key.to_owned(),
        }
    }

    fn is_active(store: usize, key: &str) -> bool {
        CONSTRUCTING.with(|keys| keys.borrow().contains(&(store, key.to_owned())))
    }
}

impl Drop for ConstructionMarker {
    fn drop(&mut self) {
        let entry = (self.store, std::mem::take(&mut self.key));
        CONSTRUCTING.with(|keys| keys.borrow_mut().remove(&entry));
    }
}

/// Holds a key's cell for one lookup and, on drop, evicts the cell from the map
/// if it is still empty and nobody else is holding it.
///
/// Runs on both the error path and during unwinding.
struct CellLease<'a> {
    store: &'a InstanceStore,
    key: &'a str,
    cell: Cell,
}

impl Drop for CellLease<'_> {
    fn drop(&mut self) {
        if self.cell.get().is_some() {
            return;
        }
        let mut cells = self.store.cells.lock().unwrap_or_else(|p| p.into_inner());
        // Cells are only cloned under the map lock: map + this lease means no other holder.
        let unshared = cells
            .get(self.key)
            .is_some_and(|c| Arc::ptr_eq(c, &self.cell) && Arc::strong_count(c) == 2);
        if unshared {
            cells.remove(self.key);
        }
    }
}

/// Outcome of a construct-or-reuse lookup.
pub(crate) struct Resolved<T> {
    pub instance: Arc<T>,
    /// `true` when this call ran the factory.
    pub constructed: bool,
}

/// Why a construct-or-reuse lookup produced no instance.
#[derive(Debug, PartialEq)]
pub(crate) enum Unresolved<E> {
    /// The factory ran and failed.
    Factory(E),
    /// The registry refused the request; no factory ran.
    Rejected(RegistryError),
}

/// Mapping from instance key to a construct-once cell.
#[derive(Default)]
pub struct InstanceStore {
    cells: Mutex<HashMap<String, Cell>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the cell for `key`, inserting an empty one if needed.
    ///
    /// Insertion is idempotent, so a poisoned lock is recovered.
    fn cell(&self, key: &str) -> Cell {
        self.cells
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(key.to_owned())
            .or_default()
            .clone()
    }

    fn downcast<T>(key: &str, handle: Handle) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        handle
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_owned(),
                type_name: type_name::<T>(),
            })
    }

    /// Returns the instance for `key`, running `factory` only if no instance
    /// has been constructed yet.
    ///
    /// Concurrent callers for the same key wait for the one running factory
    /// and then share its result. If the factory fails or panics, the cell
    /// stays empty and the next caller runs its own factory.
    ///
    /// A factory that requests its own key from this store gets
    /// [`RegistryError::Reentrant`] instead of waiting on itself.
    pub(crate) fn get_or_try_init<T, E, F>(
        &self,
        key: &str,
        factory: F,
    ) -> Result<Resolved<T>, Unresolved<E>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let store = self as *const Self as usize;
        let lease = CellLease {
            store: self,
            key,
            cell: self.cell(key),
        };
        let mut constructed = false;

        let handle = match lease.cell.get() {
            Some(handle) => handle.clone(),
            None if ConstructionMarker::is_active(store, key) => {
                return Err(Unresolved::Rejected(RegistryError::Reentrant {
                    key: key.to_owned(),
                }));
            }
            None => lease
                .cell
                .get_or_try_init(|| {
                    let _marker = ConstructionMarker::enter(store, key);
                    let value = factory().map_err(Unresolved::Factory)?;
                    constructed = true;
                    Ok::<Handle, Unresolved<E>>(Arc::new(value))
                })?
                .clone(),
        };

        let instance = Self::downcast::<T>(key, handle).map_err(Unresolved::Rejected)?;
        Ok(Resolved {
            instance,
            constructed,
        })
    }

    /// Looks up an already constructed instance without constructing one.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        let handle = self
            .cells
            .lock()
            .map_err(|_| RegistryError::RegistryLock)?
            .get(key)
            .and_then(|cell| cell.get().cloned());

        match handle {
            Some(handle) => Self::downcast::<T>(key, handle),
            None => Err(RegistryError::InstanceNotFound {
                key: key.to_owned(),
            }),
        }
    }

    /// Whether an instance has been constructed for `key`.
    ///
    /// A key whose factory failed is not considered present.
    pub fn contains(&self, key: &str) -> Result<bool, RegistryError> {
        self.cells
            .lock()
            .map(|cells| cells.get(key).is_some_and(|cell| cell.get().is_some()))
            .map_err(|_| RegistryError::RegistryLock)
    }

    /// Number of constructed instances.
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the store's references to every instance.
    ///
    /// `Arc`s already handed out stay valid. Intended for tests.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.cells
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

impl fmt::Debug for InstanceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceStore")
            .field("constructed", &self.len())
            .finish()
    }
}
