//! Scope tree and chained-hash symbol table

use serde::Serialize;
use cminus_ast::{ExpType, ScopeId, SymbolId};
use crate::SymbolError;

/// Number of hash buckets per scope. Fixed for the lifetime of the
/// table; collisions are chained.
pub const BUCKET_COUNT: usize = 211;

/// Multiplier (as a power of two) of the string hash
const SHIFT: u32 = 4;

fn hash(name: &str) -> usize {
    let mut h: usize = 0;
    for byte in name.bytes() {
        h = ((h << SHIFT) + byte as usize) % BUCKET_COUNT;
    }
    h
}

/// What a symbol entry names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    Variable,
    Function,
}

/// A function parameter descriptor, recorded in declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamInfo {
    pub name: String,
    pub ty: ExpType,
    pub is_array: bool,
}

/// One declared name within one scope.
///
/// Entries are created by the builder pass and never deleted; the first
/// element of `lines` is the declaration line, later elements are
/// reference lines in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolEntry {
    pub id: SymbolId,
    pub scope: ScopeId,
    pub name: String,
    pub ty: ExpType,
    pub is_array: bool,
    pub kind: SymbolKind,
    /// Storage slot, sequential within the owning scope
    pub location: u32,
    pub lines: Vec<u32>,
    /// Parameter descriptors; only populated for functions
    pub params: Vec<ParamInfo>,
}

impl SymbolEntry {
    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// A lexical scope: a named region of the scope tree owning one hash
/// table of entries.
///
/// Children are linked through `first_child`/`next_sibling` with new
/// siblings appended at the tail, so walking the tree visits scopes in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    pub first_child: Option<ScopeId>,
    pub next_sibling: Option<ScopeId>,
    /// Hash buckets of entry handles, chained per bucket
    #[serde(skip)]
    buckets: Vec<Vec<SymbolId>>,
}

impl Scope {
    fn new(name: &str, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            first_child: None,
            next_sibling: None,
            buckets: vec![Vec::new(); BUCKET_COUNT],
        }
    }
}

/// The symbol table for one analysis session: an arena of scopes plus an
/// arena of entries, addressed by [`ScopeId`] and [`SymbolId`].
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope under `parent` (or a root scope if `None`),
    /// appended at the tail of the parent's child list.
    pub fn add_scope(&mut self, parent: Option<ScopeId>, name: &str) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(name, parent));

        if let Some(parent) = parent {
            let mut link = self.scopes[parent.0 as usize].first_child;
            match link {
                None => self.scopes[parent.0 as usize].first_child = Some(id),
                Some(_) => {
                    while let Some(sib) = link {
                        let next = self.scopes[sib.0 as usize].next_sibling;
                        if next.is_none() {
                            self.scopes[sib.0 as usize].next_sibling = Some(id);
                            break;
                        }
                        link = next;
                    }
                }
            }
        }
        id
    }

    /// Declare `name` in `scope`.
    ///
    /// Fails with [`SymbolError::DuplicateName`] if the name already
    /// exists in this scope; enclosing scopes are not consulted, so
    /// shadowing an outer name is legal. On success `location` becomes
    /// the entry's permanent storage slot and `line` its declaration
    /// line.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: ExpType,
        is_array: bool,
        kind: SymbolKind,
        line: u32,
        location: u32,
    ) -> Result<SymbolId, SymbolError> {
        if self.lookup_local(scope, name).is_some() {
            return Err(SymbolError::DuplicateName {
                name: name.to_string(),
            });
        }

        let id = SymbolId(self.entries.len() as u32);
        self.entries.push(SymbolEntry {
            id,
            scope,
            name: name.to_string(),
            ty,
            is_array,
            kind,
            location,
            lines: vec![line],
            params: Vec::new(),
        });
        self.scopes[scope.0 as usize].buckets[hash(name)].push(id);
        Ok(id)
    }

    /// Append `line` to the reference list of `name`, resolved through
    /// the parent chain from `scope`.
    pub fn add_reference_line(
        &mut self,
        scope: ScopeId,
        name: &str,
        line: u32,
    ) -> Result<SymbolId, SymbolError> {
        match self.lookup(scope, name) {
            Some(id) => {
                self.entries[id.0 as usize].lines.push(line);
                Ok(id)
            }
            None => Err(SymbolError::UndeclaredName {
                name: name.to_string(),
            }),
        }
    }

    /// Look up `name` starting at `scope` and walking the parent chain;
    /// the innermost match wins.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(scope) = current {
            if let Some(id) = self.lookup_local(scope, name) {
                return Some(id);
            }
            current = self.scopes[scope.0 as usize].parent;
        }
        None
    }

    /// Look up `name` in `scope` only, ignoring enclosing scopes
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0 as usize].buckets[hash(name)]
            .iter()
            .copied()
            .find(|id| self.entries[id.0 as usize].name == name)
    }

    /// Append a parameter descriptor to a function entry.
    ///
    /// Must be called in declaration order; positional argument checks
    /// rely on it.
    pub fn add_param(&mut self, func: SymbolId, name: &str, ty: ExpType, is_array: bool) {
        let entry = &mut self.entries[func.0 as usize];
        entry.params.push(ParamInfo {
            name: name.to_string(),
            ty,
            is_array,
        });
    }

    pub fn entry(&self, id: SymbolId) -> &SymbolEntry {
        &self.entries[id.0 as usize]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// All entries in creation order
    pub fn entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    /// Entries declared in one scope, in declaration order
    pub fn scope_entries(&self, scope: ScopeId) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter().filter(move |e| e.scope == scope)
    }

    /// Scope ids in depth-first preorder from `root`
    pub fn scope_preorder(&self, root: ScopeId) -> Vec<ScopeId> {
        let mut order = Vec::new();
        self.collect_preorder(root, &mut order);
        order
    }

    fn collect_preorder(&self, scope: ScopeId, order: &mut Vec<ScopeId>) {
        order.push(scope);
        let mut child = self.scopes[scope.0 as usize].first_child;
        while let Some(id) = child {
            self.collect_preorder(id, order);
            child = self.scopes[id.0 as usize].next_sibling;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_global() -> (SymbolTable, ScopeId) {
        let mut table = SymbolTable::new();
        let global = table.add_scope(None, "global");
        (table, global)
    }

    #[test]
    fn insert_then_lookup() {
        let (mut table, global) = table_with_global();
        let id = table
            .insert(global, "x", ExpType::Integer, false, SymbolKind::Variable, 3, 0)
            .unwrap();

        assert_eq!(table.lookup(global, "x"), Some(id));
        let entry = table.entry(id);
        assert_eq!(entry.lines, vec![3]);
        assert_eq!(entry.location, 0);
    }

    #[test]
    fn duplicate_in_same_scope_fails_and_first_wins() {
        let (mut table, global) = table_with_global();
        let first = table
            .insert(global, "a", ExpType::Integer, false, SymbolKind::Variable, 1, 0)
            .unwrap();
        let err = table
            .insert(global, "a", ExpType::Integer, true, SymbolKind::Variable, 2, 1)
            .unwrap_err();

        assert_eq!(err, SymbolError::DuplicateName { name: "a".into() });
        assert_eq!(table.lookup(global, "a"), Some(first));
        assert!(!table.entry(first).is_array);
    }

    #[test]
    fn shadowing_is_legal_and_inner_wins() {
        let (mut table, global) = table_with_global();
        let inner = table.add_scope(Some(global), "f");

        let outer_id = table
            .insert(global, "x", ExpType::Integer, false, SymbolKind::Variable, 1, 0)
            .unwrap();
        let inner_id = table
            .insert(inner, "x", ExpType::Integer, true, SymbolKind::Variable, 4, 0)
            .unwrap();

        assert_eq!(table.lookup(inner, "x"), Some(inner_id));
        assert_eq!(table.lookup(global, "x"), Some(outer_id));
        // A local hit always agrees with a full lookup from the same scope
        assert_eq!(table.lookup_local(inner, "x"), table.lookup(inner, "x"));
    }

    #[test]
    fn lookup_falls_back_to_parent_chain() {
        let (mut table, global) = table_with_global();
        let f = table.add_scope(Some(global), "f");
        let block = table.add_scope(Some(f), "compound");

        let id = table
            .insert(global, "g", ExpType::Void, false, SymbolKind::Function, 1, 0)
            .unwrap();

        assert_eq!(table.lookup(block, "g"), Some(id));
        assert_eq!(table.lookup_local(block, "g"), None);
    }

    #[test]
    fn reference_lines_accumulate_in_order() {
        let (mut table, global) = table_with_global();
        let id = table
            .insert(global, "x", ExpType::Integer, false, SymbolKind::Variable, 2, 0)
            .unwrap();

        table.add_reference_line(global, "x", 5).unwrap();
        table.add_reference_line(global, "x", 9).unwrap();

        assert_eq!(table.entry(id).lines, vec![2, 5, 9]);
    }

    #[test]
    fn reference_line_on_undeclared_name_fails() {
        let (mut table, global) = table_with_global();
        let err = table.add_reference_line(global, "ghost", 7).unwrap_err();
        assert_eq!(err, SymbolError::UndeclaredName { name: "ghost".into() });
    }

    #[test]
    fn sibling_scopes_keep_declaration_order() {
        let (mut table, global) = table_with_global();
        let f = table.add_scope(Some(global), "f");
        let g = table.add_scope(Some(global), "g");
        let h = table.add_scope(Some(global), "h");
        let f_block = table.add_scope(Some(f), "compound");

        assert_eq!(table.scope_preorder(global), vec![global, f, f_block, g, h]);
    }

    #[test]
    fn params_record_in_declaration_order() {
        let (mut table, global) = table_with_global();
        let func = table
            .insert(global, "f", ExpType::Integer, false, SymbolKind::Function, 1, 0)
            .unwrap();

        table.add_param(func, "a", ExpType::Integer, false);
        table.add_param(func, "b", ExpType::Integer, true);

        let entry = table.entry(func);
        assert_eq!(entry.param_count(), 2);
        assert_eq!(entry.params[0].name, "a");
        assert!(entry.params[1].is_array);
    }

    #[test]
    fn colliding_names_chain_within_one_bucket() {
        // Construct two distinct names that hash to the same bucket
        let (mut table, global) = table_with_global();
        let base = "a";
        let mut collider = None;
        for c in b'b'..=b'z' {
            for d in b'a'..=b'z' {
                let candidate = format!("{}{}", c as char, d as char);
                if super::hash(&candidate) == super::hash(base) {
                    collider = Some(candidate);
                    break;
                }
            }
            if collider.is_some() {
                break;
            }
        }
        let collider = collider.expect("no colliding name found");

        let a = table
            .insert(global, base, ExpType::Integer, false, SymbolKind::Variable, 1, 0)
            .unwrap();
        let b = table
            .insert(global, &collider, ExpType::Integer, false, SymbolKind::Variable, 2, 1)
            .unwrap();

        assert_eq!(table.lookup(global, base), Some(a));
        assert_eq!(table.lookup(global, &collider), Some(b));
    }
}
