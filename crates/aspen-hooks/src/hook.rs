//! The ordered hook sequence held by each phase.
//!
//! [`Hook`] is a deliberately small list: entries go in through
//! [`Hook::register`] or [`Hook::insert`] and come out through
//! [`Hook::remove`] or [`Hook::pop`]. There is no `push`, `Extend` or
//! `FromIterator`, so every mutation names its intent at the call site.

use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::error::{HookError, HookResult};

/// Something with a name that shows up in logs and errors.
pub trait Named {
    /// The display name.
    fn hook_name(&self) -> &str;
}

/// Ordered sequence of hooks for one phase.
pub struct Hook<H: ?Sized> {
    entries: Vec<Arc<H>>,
}

impl<H: ?Sized> Hook<H> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `hook` after every entry already registered.
    pub fn register(&mut self, hook: Arc<H>) {
        self.entries.push(hook);
    }

    /// Inserts `hook` at `index`, shifting later entries back.
    ///
    /// `index` may equal the length, which appends.
    pub fn insert(&mut self, index: usize, hook: Arc<H>) -> HookResult<()> {
        let len = self.entries.len();
        if index > len {
            return Err(HookError::IndexOutOfRange { index, len });
        }
        self.entries.insert(index, hook);
        Ok(())
    }

    /// Removes and returns the entry at `index`.
    pub fn pop(&mut self, index: usize) -> HookResult<Arc<H>> {
        let len = self.entries.len();
        if index >= len {
            return Err(HookError::IndexOutOfRange { index, len });
        }
        Ok(self.entries.remove(index))
    }

    /// Returns the position of `hook`, compared by identity.
    pub fn position(&self, hook: &Arc<H>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| std::ptr::addr_eq(Arc::as_ptr(entry), Arc::as_ptr(hook)))
    }

    /// Returns whether `hook` is registered.
    pub fn contains(&self, hook: &Arc<H>) -> bool {
        self.position(hook).is_some()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<H>> {
        self.entries.get(index)
    }

    /// Iterates the entries in order. Each call starts a fresh traversal.
    pub fn iter(&self) -> slice::Iter<'_, Arc<H>> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: ?Sized + Named> Hook<H> {
    /// Removes the first entry identical to `hook`.
    pub fn remove(&mut self, hook: &Arc<H>) -> HookResult<()> {
        match self.position(hook) {
            Some(index) => {
                self.entries.remove(index);
                Ok(())
            }
            None => Err(HookError::NotFound {
                name: hook.hook_name().to_string(),
            }),
        }
    }

    /// Names of the entries, in order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.hook_name().to_string())
            .collect()
    }
}

impl<H: ?Sized> Default for Hook<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for Hook<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H: ?Sized + Named> fmt::Debug for Hook<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.hook_name()))
            .finish()
    }
}

impl<'a, H: ?Sized> IntoIterator for &'a Hook<H> {
    type Item = &'a Arc<H>;
    type IntoIter = slice::Iter<'a, Arc<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
