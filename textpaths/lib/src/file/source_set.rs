use std::path::Path;

use tracing::debug;

use crate::error::TextPathsError;
use crate::extract::{FieldPath, PathExtractor};
use crate::file::SourceFile;
use crate::pattern::Registry;
use crate::tree::TsNode;
use crate::typescript;
use crate::walker::{MatchResult, TreeWalker};

/// A collection of parsed source units, addressable by name.
///
/// Units keep their insertion order. Inserting a unit whose path is already
/// present replaces the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    units: Vec<SourceFile>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses every path, detecting each file's language.
    ///
    /// ## Errors
    /// Returns the first read, detection or parse failure.
    pub fn open<I, P>(paths: I) -> Result<Self, TextPathsError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for path in paths {
            set.insert(SourceFile::new(path)?);
        }

        debug!(units = set.len(), "opened source set");
        Ok(set)
    }

    pub fn insert(&mut self, unit: SourceFile) {
        match self.units.iter_mut().find(|existing| existing.file == unit.file) {
            Some(existing) => *existing = unit,
            None => self.units.push(unit),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Paths of every unit, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &Path> {
        self.units.iter().map(|unit| unit.file.as_path())
    }

    /// Looks a unit up by name.
    ///
    /// An exact path match wins; otherwise the first unit whose path ends
    /// with `name` (compared component-wise) is returned.
    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        let wanted = Path::new(name);

        self.units
            .iter()
            .find(|unit| unit.file == wanted)
            .or_else(|| self.units.iter().find(|unit| unit.file.ends_with(wanted)))
    }

    /// Walks the named unit with `registry` and returns its top-level matches.
    ///
    /// ## Errors
    /// Returns [`TextPathsError::UnitNotFound`] when no unit is called `name`.
    pub fn start(
        &self,
        name: &str,
        registry: &Registry,
    ) -> Result<Vec<MatchResult<TsNode<'_>>>, TextPathsError> {
        let unit = self.get(name).ok_or_else(|| TextPathsError::UnitNotFound {
            name: name.to_string(),
        })?;

        debug!(unit = %unit.file.display(), "starting walk");
        Ok(TreeWalker::new(registry).walk(unit.root()))
    }

    /// Textual field paths of the named unit, using the TypeScript scanners.
    ///
    /// ## Errors
    /// Returns [`TextPathsError::UnitNotFound`] when no unit is called `name`.
    pub fn field_paths(&self, name: &str) -> Result<Vec<FieldPath>, TextPathsError> {
        let registry = typescript::registry();
        let textual = typescript::textual_type();
        let forest = self.start(name, &registry)?;

        Ok(PathExtractor::new(&textual).extract_all(&forest).collect())
    }
}
