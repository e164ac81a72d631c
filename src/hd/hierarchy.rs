// In-memory tree of deterministic keys

use crate::hd::derivation::{derive_child_key, MAX_CHILD_DERIVATION_ATTEMPTS};
use crate::hd::{ChildNumber, DeterministicKey, HdError, HdPath};
use std::collections::HashMap;

/// Caches keys by path below a root key. Missing ancestors are derived on
/// demand, and the last derived child number is tracked per parent.
pub struct DeterministicHierarchy {
    keys: HashMap<Vec<ChildNumber>, DeterministicKey>,
    root_path: Vec<ChildNumber>,
    last_child_numbers: HashMap<Vec<ChildNumber>, ChildNumber>,
}

impl DeterministicHierarchy {
    /// Create a hierarchy rooted at `root_key`
    pub fn new(root_key: DeterministicKey) -> Self {
        let root_path = root_key.path().nodes().to_vec();
        let mut hierarchy = Self {
            keys: HashMap::new(),
            root_path,
            last_child_numbers: HashMap::new(),
        };
        hierarchy.put_key(root_key);
        hierarchy
    }

    /// Insert a key, recording it as the latest child of its parent
    pub fn put_key(&mut self, key: DeterministicKey) {
        let path = key.path().nodes().to_vec();
        if let Some((child, parent)) = path.split_last() {
            if self.keys.contains_key(parent) {
                self.last_child_numbers.insert(parent.to_vec(), *child);
            }
        }
        self.keys.insert(path, key);
    }

    fn absolute_path(&self, path: &[ChildNumber], relative: bool) -> Vec<ChildNumber> {
        if relative {
            let mut absolute = self.root_path.clone();
            absolute.extend_from_slice(path);
            absolute
        } else {
            path.to_vec()
        }
    }

    /// Key at `path`. With `relative` the path starts below the root key.
    /// With `create` any missing keys along the path are derived and cached.
    pub fn get(
        &mut self,
        path: &[ChildNumber],
        relative: bool,
        create: bool,
    ) -> Result<&DeterministicKey, HdError> {
        let absolute = self.absolute_path(path, relative);

        if !self.keys.contains_key(&absolute) {
            if !create {
                return Err(HdError::KeyNotFound(HdPath::from_nodes(&absolute)));
            }
            self.create_path(&absolute)?;
        }

        self.keys
            .get(&absolute)
            .ok_or_else(|| HdError::KeyNotFound(HdPath::from_nodes(&absolute)))
    }

    /// Derive every missing key from the nearest cached ancestor down to `absolute`
    fn create_path(&mut self, absolute: &[ChildNumber]) -> Result<(), HdError> {
        if absolute.is_empty() {
            return Err(HdError::NothingToDerive);
        }

        let mut depth = absolute.len();
        while !self.keys.contains_key(&absolute[..depth]) {
            if depth == 0 {
                return Err(HdError::NoAncestor(HdPath::from_nodes(absolute)));
            }
            depth -= 1;
        }

        for len in depth + 1..=absolute.len() {
            let parent = &self.keys[&absolute[..len - 1]];
            let child = derive_child_key(parent, absolute[len - 1])?;
            log::debug!("Derived {}", child.path());
            self.put_key(child);
        }

        Ok(())
    }

    /// Derive a specific child of the key at `parent_path` and cache it
    pub fn derive_child(
        &mut self,
        parent_path: &[ChildNumber],
        relative: bool,
        create_parent: bool,
        child: ChildNumber,
    ) -> Result<DeterministicKey, HdError> {
        let parent = self.get(parent_path, relative, create_parent)?;
        let key = derive_child_key(parent, child)?;
        self.put_key(key.clone());
        Ok(key)
    }

    /// Derive the next unused child of the key at `parent_path`. Child numbers
    /// that yield invalid keys are skipped.
    pub fn derive_next_child(
        &mut self,
        parent_path: &[ChildNumber],
        relative: bool,
        create_parent: bool,
        private_derivation: bool,
    ) -> Result<DeterministicKey, HdError> {
        self.derive_next_child_with(
            parent_path,
            relative,
            create_parent,
            private_derivation,
            derive_child_key,
        )
    }

    fn derive_next_child_with<F>(
        &mut self,
        parent_path: &[ChildNumber],
        relative: bool,
        create_parent: bool,
        private_derivation: bool,
        mut derive: F,
    ) -> Result<DeterministicKey, HdError>
    where
        F: FnMut(&DeterministicKey, ChildNumber) -> Result<DeterministicKey, HdError>,
    {
        let parent = self.get(parent_path, relative, create_parent)?.clone();

        for _ in 0..MAX_CHILD_DERIVATION_ATTEMPTS {
            let child = self.next_child_number_to_derive(parent.path().nodes(), private_derivation)?;
            match derive(&parent, child) {
                Ok(key) => {
                    self.put_key(key.clone());
                    return Ok(key);
                }
                Err(HdError::InvalidChild(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(HdError::TooManyAttempts)
    }

    fn next_child_number_to_derive(
        &mut self,
        parent_path: &[ChildNumber],
        private_derivation: bool,
    ) -> Result<ChildNumber, HdError> {
        let index = match self.last_child_numbers.get(parent_path) {
            Some(last) => last.index() + 1,
            None => 0,
        };
        let next = ChildNumber::new(index, private_derivation)?;
        self.last_child_numbers.insert(parent_path.to_vec(), next);
        Ok(next)
    }

    /// Cached key at an absolute path, without deriving anything
    pub fn find(&self, path: &[ChildNumber]) -> Option<&DeterministicKey> {
        self.keys.get(path)
    }

    /// Number of direct children derived so far under `parent_path`
    pub fn num_children(&self, parent_path: &[ChildNumber]) -> usize {
        self.keys
            .keys()
            .filter(|path| path.len() == parent_path.len() + 1 && path.starts_with(parent_path))
            .count()
    }

    pub fn root_key(&self) -> &DeterministicKey {
        &self.keys[&self.root_path]
    }

    /// Number of cached keys, root included
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
