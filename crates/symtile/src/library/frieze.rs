//! The 7 frieze groups, named in crystallographic short notation.
//!
//! A frieze reuses the base cells of a wallpaper group and repeats along a
//! single lattice axis.
use tracing::debug;

use crate::library::wallpaper::fill_wallpaper;
use crate::tiling::{RepeatAxes, Tiling};

/// Frieze names with the wallpaper group supplying their cells and the
/// axis they repeat along.
pub const FRIEZE_GROUPS: [(&str, &str, RepeatAxes); 7] = [
    ("11", "p1", RepeatAxes::X),
    ("1g", "pg", RepeatAxes::X),
    ("m1", "pm", RepeatAxes::X),
    ("12", "p2", RepeatAxes::X),
    ("mg", "pmg", RepeatAxes::Y),
    ("1m", "pm", RepeatAxes::Y),
    ("mm", "pmm", RepeatAxes::X),
];

/// Builds frieze group `group`, e.g. `"mg"`.
pub fn create_frieze(group: &str) -> Option<Tiling> {
    let group = group.trim();
    let Some(&(name, wallpaper, axes)) = FRIEZE_GROUPS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(group))
    else {
        debug!("Unknown frieze group '{}'.", group);
        return None;
    };

    let mut tiling = Tiling::new(name, "Frieze");
    if !fill_wallpaper(&mut tiling, wallpaper) {
        return None;
    }
    tiling.repeatable = axes;
    Some(tiling)
}
