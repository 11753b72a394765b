//! Glen/path arena.
//!
//! Glens and paths reference each other cyclically (a path knows both
//! endpoints, a glen lists its incident paths), so both live in one
//! arena and address each other through copyable handles.

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GlenId(u32);

impl GlenId {
    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathId(u32);

impl PathId {
    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Turns consumed per unit of path length, kept as a small rational.
/// Advisory for now: movement does not yet spend turns on traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade(pub u32, pub u32);

impl Grade {
    pub fn numer(self) -> u32 {
        self.0
    }

    pub fn denom(self) -> u32 {
        self.1
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / self.1.max(1) as f64
    }
}

impl Default for Grade {
    fn default() -> Self {
        Grade(1, 1)
    }
}

/// A resource node. Abundance moves; growth, identity, and lattice
/// placement are fixed at construction.
#[derive(Debug, Clone)]
pub struct Glen {
    identifier: String,
    abundance: i64,
    growth: i64,
    toward: Vec<PathId>,
    away: Vec<PathId>,
    lattice: Option<(u32, u32)>,
    position: Option<(f64, f64)>,
}

impl Glen {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn abundance(&self) -> i64 {
        self.abundance
    }

    pub fn growth(&self) -> i64 {
        self.growth
    }

    /// Raise (or debit) abundance. With no explicit amount the glen
    /// grows by its own rate. Negative amounts are accepted verbatim;
    /// callers that must not overdraw check first.
    pub fn increase(&mut self, amount: Option<i64>) -> i64 {
        self.abundance += amount.unwrap_or(self.growth);
        self.abundance
    }

    /// Paths that end at this glen.
    pub fn toward(&self) -> &[PathId] {
        &self.toward
    }

    /// Paths usable to leave this glen.
    pub fn away(&self) -> &[PathId] {
        &self.away
    }

    pub fn is_unlinked_to(&self, path: PathId) -> bool {
        !self.toward.contains(&path)
    }

    pub fn is_unlinked_from(&self, path: PathId) -> bool {
        !self.away.contains(&path)
    }

    pub fn lattice(&self) -> Option<(u32, u32)> {
        self.lattice
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }
}

/// An edge between two glens. Immutable once registered; registration
/// itself happens exactly once, inside [`CountyGraph::add_path`].
#[derive(Debug, Clone)]
pub struct Path {
    length: i64,
    grade: Grade,
    origin: GlenId,
    destination: GlenId,
    symmetrical: bool,
}

impl Path {
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn origin(&self) -> GlenId {
        self.origin
    }

    pub fn destination(&self) -> GlenId {
        self.destination
    }

    pub fn symmetrical(&self) -> bool {
        self.symmetrical
    }

    /// The endpoint on the far side of `from`, for walking a
    /// symmetrical path in either direction.
    pub fn far_end(&self, from: GlenId) -> GlenId {
        if self.origin == from {
            self.destination
        } else {
            self.origin
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountyGraph {
    glens: Vec<Glen>,
    paths: Vec<Path>,
}

impl CountyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_glen(&mut self, identifier: impl Into<String>, abundance: i64, growth: i64) -> GlenId {
        self.insert_glen(identifier.into(), abundance, growth, None, None)
    }

    pub fn add_lattice_glen(
        &mut self,
        identifier: impl Into<String>,
        abundance: i64,
        growth: i64,
        lattice: (u32, u32),
        position: (f64, f64),
    ) -> GlenId {
        self.insert_glen(identifier.into(), abundance, growth, Some(lattice), Some(position))
    }

    fn insert_glen(
        &mut self,
        identifier: String,
        abundance: i64,
        growth: i64,
        lattice: Option<(u32, u32)>,
        position: Option<(f64, f64)>,
    ) -> GlenId {
        let id = GlenId(self.glens.len() as u32);
        // Each glen gets its own freshly allocated link lists.
        self.glens.push(Glen {
            identifier,
            abundance,
            growth,
            toward: Vec::new(),
            away: Vec::new(),
            lattice,
            position,
        });
        id
    }

    /// Create a path and register it with both endpoints.
    ///
    /// Rejects self-loops, and duplicates of the same ordered pair (or
    /// unordered pair when either side of the comparison is
    /// symmetrical). The four link-list registrations all happen inside
    /// this one `&mut self` call, so no reader can observe a
    /// half-registered path.
    pub fn add_path(
        &mut self,
        origin: GlenId,
        destination: GlenId,
        symmetrical: bool,
        length: i64,
        grade: Grade,
    ) -> Result<PathId, StructuralError> {
        if !self.contains(origin) {
            return Err(StructuralError::ForeignGlen(origin));
        }
        if !self.contains(destination) {
            return Err(StructuralError::ForeignGlen(destination));
        }
        if origin == destination {
            return Err(StructuralError::SelfLoop(
                self.glens[origin.index()].identifier.clone(),
            ));
        }
        for existing in &self.paths {
            let same_ordered = existing.origin == origin && existing.destination == destination;
            let same_reversed = existing.origin == destination && existing.destination == origin;
            if same_ordered || ((existing.symmetrical || symmetrical) && same_reversed) {
                return Err(StructuralError::DuplicatePath(
                    self.glens[origin.index()].identifier.clone(),
                    self.glens[destination.index()].identifier.clone(),
                ));
            }
        }

        let id = PathId(self.paths.len() as u32);
        self.paths.push(Path {
            length,
            grade,
            origin,
            destination,
            symmetrical,
        });

        if self.glens[destination.index()].is_unlinked_to(id) {
            self.glens[destination.index()].toward.push(id);
            if symmetrical && self.glens[origin.index()].is_unlinked_to(id) {
                self.glens[origin.index()].toward.push(id);
            }
        }
        if self.glens[origin.index()].is_unlinked_from(id) {
            self.glens[origin.index()].away.push(id);
            if symmetrical && self.glens[destination.index()].is_unlinked_from(id) {
                self.glens[destination.index()].away.push(id);
            }
        }

        Ok(id)
    }

    pub fn contains(&self, id: GlenId) -> bool {
        id.index() < self.glens.len()
    }

    pub fn glen(&self, id: GlenId) -> Option<&Glen> {
        self.glens.get(id.index())
    }

    pub fn glen_mut(&mut self, id: GlenId) -> Option<&mut Glen> {
        self.glens.get_mut(id.index())
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.get(id.index())
    }

    pub fn glen_count(&self) -> usize {
        self.glens.len()
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn glen_ids(&self) -> impl Iterator<Item = GlenId> + '_ {
        (0..self.glens.len() as u32).map(GlenId)
    }

    pub fn glens(&self) -> impl Iterator<Item = (GlenId, &Glen)> {
        self.glens
            .iter()
            .enumerate()
            .map(|(index, glen)| (GlenId(index as u32), glen))
    }

    pub(crate) fn glens_mut(&mut self) -> impl Iterator<Item = &mut Glen> {
        self.glens.iter_mut()
    }

    pub fn paths(&self) -> impl Iterator<Item = (PathId, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(index, path)| (PathId(index as u32), path))
    }

    /// All (path, far endpoint) pairs usable to leave `from`.
    pub fn exits(&self, from: GlenId) -> Vec<(PathId, GlenId)> {
        match self.glen(from) {
            Some(glen) => glen
                .away
                .iter()
                .map(|&path_id| (path_id, self.paths[path_id.index()].far_end(from)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Is `to` already reachable from `from` along one of `from`'s
    /// outgoing paths?
    pub fn linked_away(&self, from: GlenId, to: GlenId) -> bool {
        self.exits(from).iter().any(|&(_, far)| far == to)
    }

    /// Plain enumerable edge snapshot for visualization collaborators.
    pub fn edge_list(&self) -> Vec<(String, String)> {
        self.paths
            .iter()
            .map(|path| {
                (
                    self.glens[path.origin.index()].identifier.clone(),
                    self.glens[path.destination.index()].identifier.clone(),
                )
            })
            .collect()
    }

    /// Plain enumerable (identifier, abundance) snapshot.
    pub fn abundance_list(&self) -> Vec<(String, i64)> {
        self.glens
            .iter()
            .map(|glen| (glen.identifier.clone(), glen.abundance))
            .collect()
    }

    /// Planar display coordinates, where the topology defines them.
    pub fn positions(&self) -> Vec<(String, Option<(f64, f64)>)> {
        self.glens
            .iter()
            .map(|glen| (glen.identifier.clone(), glen.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_defaults_to_growth() {
        let mut graph = CountyGraph::new();
        let id = graph.add_glen("meadow", 3, 10);
        assert_eq!(graph.glen_mut(id).unwrap().increase(None), 13);
        assert_eq!(graph.glen_mut(id).unwrap().increase(Some(-5)), 8);
    }

    #[test]
    fn far_end_walks_both_directions() {
        let mut graph = CountyGraph::new();
        let a = graph.add_glen("a", 0, 1);
        let b = graph.add_glen("b", 0, 1);
        let path = graph.add_path(a, b, true, 1, Grade::default()).unwrap();
        assert_eq!(graph.path(path).unwrap().far_end(a), b);
        assert_eq!(graph.path(path).unwrap().far_end(b), a);
        assert_eq!(graph.exits(b), vec![(path, a)]);
    }
}
