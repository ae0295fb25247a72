//! Host entry-point protocol
//!
//! A loadable module is handed control once through its entry routine. It
//! registers the callables it exports into a namespace owned by the host
//! and returns. The host may later call any registered name.

use heapless::Vec;

/// Namespace registration or call failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NamespaceError {
    /// No room for another entry
    Full,
    /// The name is already registered
    Duplicate,
    /// No entry with that name
    NotFound,
}

impl core::fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NamespaceError::Full => f.write_str("namespace full"),
            NamespaceError::Duplicate => f.write_str("name already registered"),
            NamespaceError::NotFound => f.write_str("name not registered"),
        }
    }
}

/// Callable exported by a module, run with the host's context
pub type Callable<C> = fn(&mut C);

/// Fixed-capacity table of named callables
pub struct Namespace<C, const N: usize> {
    entries: Vec<(&'static str, Callable<C>), N>,
}

impl<C, const N: usize> Default for Namespace<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, const N: usize> Namespace<C, N> {
    /// An empty namespace
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Export `callable` under `name`
    pub fn register(
        &mut self,
        name: &'static str,
        callable: Callable<C>,
    ) -> Result<(), NamespaceError> {
        if self.get(name).is_some() {
            return Err(NamespaceError::Duplicate);
        }
        self.entries
            .push((name, callable))
            .map_err(|_| NamespaceError::Full)
    }

    /// Look up the callable registered under `name`
    pub fn get(&self, name: &str) -> Option<Callable<C>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|&(_, callable)| callable)
    }

    /// Run the callable registered under `name`
    pub fn call(&self, name: &str, ctx: &mut C) -> Result<(), NamespaceError> {
        let callable = self.get(name).ok_or(NamespaceError::NotFound)?;
        callable(ctx);
        Ok(())
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }

    /// Number of registered callables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hand control to a module's entry routine
///
/// The module registers its exports into `namespace`; registration errors
/// are passed back to the host.
pub fn load<C, const N: usize>(
    namespace: &mut Namespace<C, N>,
    entry: fn(&mut Namespace<C, N>) -> Result<(), NamespaceError>,
) -> Result<(), NamespaceError> {
    entry(namespace)
}
