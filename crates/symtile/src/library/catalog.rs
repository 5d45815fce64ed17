//! Ordered list of every built-in pattern.
//!
//! Keys have the form `"<Category>/<name>"`. [`BuiltinCatalog::global`]
//! builds each pattern once and hands out shared read-only copies.
use std::f64::consts::TAU;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{Error, Result};
use crate::library::frieze::create_frieze;
use crate::library::radial::{create_radial_simple, create_spiral};
use crate::library::uniform::create_uniform_coloring;
use crate::library::wallpaper::create_wallpaper;
use crate::tiling::Tiling;

pub const BUILTIN_TILINGS: [&str; 59] = [
    "Wallpaper/p1",
    "Wallpaper/p2",
    "Wallpaper/pm",
    "Wallpaper/pg",
    "Wallpaper/cm",
    "Wallpaper/pmm",
    "Wallpaper/pmg",
    "Wallpaper/pgg",
    "Wallpaper/cmm",
    "Wallpaper/p4",
    "Wallpaper/p4m",
    "Wallpaper/p4g",
    "Wallpaper/p3",
    "Wallpaper/p3m1",
    "Wallpaper/p31m",
    "Wallpaper/p6",
    "Wallpaper/p6m",
    "Circular/spiral",
    "Circular/r",
    "Circular/rm",
    "Frieze/11",
    "Frieze/1g",
    "Frieze/m1",
    "Frieze/12",
    "Frieze/mg",
    "Frieze/1m",
    "Frieze/mm",
    "Uniform Coloring/elongated triangular",
    "Uniform Coloring/hexagonal 1",
    "Uniform Coloring/hexagonal 2",
    "Uniform Coloring/hexagonal 3",
    "Uniform Coloring/rhombi trihexagonal",
    "Uniform Coloring/snub hexagonal",
    "Uniform Coloring/snub square 1",
    "Uniform Coloring/snub square 2",
    "Uniform Coloring/square 1",
    "Uniform Coloring/square 2",
    "Uniform Coloring/square 3",
    "Uniform Coloring/square 4",
    "Uniform Coloring/square 5",
    "Uniform Coloring/square 6",
    "Uniform Coloring/square 7",
    "Uniform Coloring/square 8",
    "Uniform Coloring/square 9",
    "Uniform Coloring/triangular 1",
    "Uniform Coloring/triangular 2",
    "Uniform Coloring/triangular 3",
    "Uniform Coloring/triangular 4",
    "Uniform Coloring/triangular 5",
    "Uniform Coloring/triangular 6",
    "Uniform Coloring/triangular 7",
    "Uniform Coloring/triangular 8",
    "Uniform Coloring/triangular 9",
    "Uniform Coloring/trihexagonal 1",
    "Uniform Coloring/trihexagonal 2",
    "Uniform Coloring/truncated hexagonal",
    "Uniform Coloring/truncated trihexagonal",
    "Uniform Coloring/truncated square 1",
    "Uniform Coloring/truncated square 2",
];

pub fn builtin_count() -> usize {
    BUILTIN_TILINGS.len()
}

pub fn builtin_key(index: usize) -> Option<&'static str> {
    BUILTIN_TILINGS.get(index).copied()
}

/// Icon lookup key of entry `index`: `/` becomes `__`, spaces become `_`.
pub fn builtin_icon_key(index: usize) -> Option<String> {
    builtin_key(index).map(|key| key.replace('/', "__").replace(' ', "_"))
}

/// Builds a fresh copy of entry `index`.
pub fn builtin_tiling(index: usize) -> Option<Tiling> {
    builtin_key(index).and_then(build_key)
}

/// Builds a fresh copy of the pattern named by `key`, matched case-insensitively.
pub fn builtin_by_key(key: &str) -> Result<Tiling> {
    let key = key.trim();
    BUILTIN_TILINGS
        .iter()
        .find(|k| k.eq_ignore_ascii_case(key))
        .and_then(|k| build_key(k))
        .ok_or_else(|| Error::UnknownPattern {
            name: key.to_owned(),
        })
}

fn build_key(key: &str) -> Option<Tiling> {
    let (category, name) = key.split_once('/')?;
    match category {
        "Wallpaper" => create_wallpaper(name),
        "Frieze" => create_frieze(name),
        "Uniform Coloring" => create_uniform_coloring(name),
        "Circular" => match name {
            "spiral" => create_spiral(0.0, 2.0 * TAU, 5.0, 3.0, 20),
            "r" => create_radial_simple(false, 10),
            "rm" => create_radial_simple(true, 5),
            _ => None,
        },
        _ => {
            debug!("Unknown pattern category '{}'.", category);
            None
        }
    }
}

/// Process-wide, lazily built set of every built-in pattern.
#[derive(Debug)]
pub struct BuiltinCatalog {
    entries: Vec<(&'static str, Arc<Tiling>)>,
}

impl BuiltinCatalog {
    pub fn global() -> &'static BuiltinCatalog {
        static CATALOG: OnceLock<BuiltinCatalog> = OnceLock::new();
        CATALOG.get_or_init(BuiltinCatalog::build)
    }

    fn build() -> Self {
        let entries = BUILTIN_TILINGS
            .iter()
            .filter_map(|&key| build_key(key).map(|tiling| (key, Arc::new(tiling))))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<Arc<Tiling>> {
        let key = key.trim();
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, tiling)| Arc::clone(tiling))
            .ok_or_else(|| Error::UnknownPattern {
                name: key.to_owned(),
            })
    }

    pub fn by_index(&self, index: usize) -> Option<Arc<Tiling>> {
        self.entries.get(index).map(|(_, tiling)| Arc::clone(tiling))
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Arc<Tiling>)> {
        self.entries.iter().map(|(k, tiling)| (*k, tiling))
    }
}
