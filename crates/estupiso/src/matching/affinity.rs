use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Field-of-study groupings that earn an affinity bonus.
///
/// Keys are the candidate's field; values are the fields considered related to it. The
/// lookup is directional: `Medicine -> Nursing` does not imply `Nursing -> Medicine`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffinityTable {
    groups: BTreeMap<String, BTreeSet<String>>,
}

/// Errors raised while loading a table from disk.
#[derive(Debug, thiserror::Error)]
pub enum AffinityTableError {
    #[error("failed to read affinity table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("affinity table is not a JSON object of string arrays: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AffinityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in groupings used when no table is configured.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("Medicina", ["Enfermería", "Farmacia", "Biología"]);
        table.insert("Enfermería", ["Medicina", "Fisioterapia"]);
        table.insert("Ingeniería Informática", ["Matemáticas", "Telecomunicaciones", "Física"]);
        table.insert("Derecho", ["Administración y Dirección de Empresas", "Ciencias Políticas"]);
        table.insert("Administración y Dirección de Empresas", ["Economía", "Derecho", "Marketing"]);
        table.insert("Arquitectura", ["Ingeniería Civil", "Bellas Artes"]);
        table.insert("Psicología", ["Educación", "Trabajo Social"]);
        table
    }

    pub fn insert<I, S>(&mut self, field: impl Into<String>, related: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .entry(field.into())
            .or_default()
            .extend(related.into_iter().map(Into::into));
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AffinityTableError> {
        let table = serde_json::from_reader(reader)?;
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AffinityTableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AffinityTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// True when `other` appears in the group keyed by `field`.
    pub fn is_related(&self, field: &str, other: &str) -> bool {
        self.groups
            .get(field)
            .map(|related| related.contains(other))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
