//! Text format for [`Tiling`].
//!
//! ```text
//! name p2
//! category Wallpaper
//! repeatable x y
//! repeat_origin 0,0
//! repeat_x 1,0
//! repeat_y 0,1
//! basecell
//!   shearable
//!   flexible
//!   outline
//!     points 0,0 0.5,0 0.5,1 0,1
//!     closed
//!   transform matrix(1 0 0 1 0 0)
//!   clone
//!     transform matrix(-1 0 0 -1 1 1)
//!     traceable yes
//!     iterations 2
//!     conditions iterations
//!     max_size 0
//!     min_size 0
//! ```
//!
//! A destination that only differs from the defaults by its transform is
//! written as a bare `transform` line; anything else becomes a `clone` block.
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::affine::Affine2D;
use crate::geometry::polygon::Polygon;
use crate::tiling::attribute::{
    self, format_pair, parse_bool, parse_f64, parse_i64, parse_pair, Attribute,
};
use crate::tiling::dest::{StopConditions, TilingDest};
use crate::tiling::op::TilingOp;
use crate::tiling::{RepeatAxes, Tiling};

impl Tiling {
    /// Serializes into attribute-tree nodes.
    pub fn to_attributes(&self) -> Vec<Attribute> {
        let mut out = vec![
            Attribute::new("name", self.name.as_str()),
            Attribute::new("category", self.category.as_str()),
        ];
        if let Some(icon) = &self.icon_file {
            out.push(Attribute::new("icon_file", icon.as_str()));
        }
        out.push(Attribute::new("repeatable", self.repeatable.to_string()));
        let origin = self.repeat_origin();
        let x = self.repeat_x();
        let y = self.repeat_y();
        out.push(Attribute::new("repeat_origin", format_pair(origin.x, origin.y)));
        out.push(Attribute::new("repeat_x", format_pair(x.x, x.y)));
        out.push(Attribute::new("repeat_y", format_pair(y.x, y.y)));
        if self.radial_divisions > 0 {
            out.push(Attribute::new(
                "radial_divisions",
                self.radial_divisions.to_string(),
            ));
        }
        if !self.properties.is_empty() {
            let mut props = Attribute::flag("properties");
            for (key, value) in &self.properties {
                props.push(Attribute::new(key.as_str(), value.as_str()));
            }
            out.push(props);
        }
        if !self.required_interface.is_empty() {
            out.push(Attribute::new(
                "required_interface",
                self.required_interface.as_str(),
            ));
        }
        if !self.final_transform.is_identity() {
            out.push(Attribute::new(
                "final_transform",
                self.final_transform.to_string(),
            ));
        }
        out.extend(self.basecells.iter().map(basecell_to_attribute));
        out
    }

    /// Serializes into the attribute-tree text format.
    pub fn to_text(&self) -> String {
        attribute::write(&self.to_attributes())
    }

    /// Builds a tiling from parsed top-level nodes. Unknown keys are ignored.
    pub fn from_attributes(nodes: &[Attribute]) -> Result<Tiling> {
        let mut tiling = Tiling::new("", "");
        for node in nodes {
            match node.name.as_str() {
                "name" => tiling.name = node.value.clone(),
                "category" => tiling.category = node.value.clone(),
                "icon_file" => tiling.icon_file = Some(node.value.clone()),
                "repeatable" => tiling.repeatable = parse_repeatable(&node.value),
                "repeat_origin" => tiling.set_repeat_origin(parse_pair(&node.value, node.line)?),
                "repeat_x" => tiling.set_repeat_x(parse_pair(&node.value, node.line)?),
                "repeat_y" => tiling.set_repeat_y(parse_pair(&node.value, node.line)?),
                "radial_divisions" => {
                    tiling.radial_divisions = parse_i64(node)?.max(0) as u32;
                }
                "properties" => {
                    for prop in &node.children {
                        tiling
                            .properties
                            .insert(prop.name.clone(), prop.value.clone());
                    }
                }
                "required_interface" => tiling.required_interface = node.value.clone(),
                "final_transform" => {
                    tiling.final_transform = parse_matrix(&node.value, node.line)?;
                }
                "basecell" => tiling.basecells.push(basecell_from_attribute(node)?),
                other => debug!("Ignoring unknown tiling key '{}' at line {}.", other, node.line),
            }
        }
        Ok(tiling)
    }

    /// Parses the attribute-tree text format.
    pub fn from_text(text: &str) -> Result<Tiling> {
        Tiling::from_attributes(&attribute::parse(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Tiling> {
        Tiling::from_text(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }
}

impl FromStr for Tiling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tiling::from_text(s)
    }
}

/// Absent bits mean "no". A blank value means both axes; `yes` or `true`
/// means x only.
fn parse_repeatable(value: &str) -> RepeatAxes {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "" => RepeatAxes::BOTH,
        "yes" | "true" => RepeatAxes::X,
        _ => {
            let mut bits = 0;
            if value.contains('x') {
                bits |= 1;
            }
            if value.contains('y') {
                bits |= 2;
            }
            RepeatAxes::from_bits_truncate(bits)
        }
    }
}

/// Reads `matrix(a b c d tx ty)`; commas may separate the numbers.
pub fn parse_matrix(text: &str, line: usize) -> Result<Affine2D> {
    let err = || Error::parse(line, format!("expected 'matrix(a b c d tx ty)', got '{text}'"));
    let inner = text
        .trim()
        .strip_prefix("matrix(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(err)?;
    let nums = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| err())?;
    let [a, b, c, d, tx, ty] = nums[..] else {
        return Err(err());
    };
    Ok(Affine2D::from_matrix(a, b, c, d, tx, ty))
}

fn outline_to_attribute(outline: &Polygon) -> Attribute {
    let points = outline
        .points()
        .iter()
        .map(|p| format_pair(p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let mut node = Attribute::flag("outline").with_child(Attribute::new("points", points));
    if outline.is_closed() {
        node.push(Attribute::flag("closed"));
    }
    node
}

fn outline_from_attribute(node: &Attribute) -> Result<Polygon> {
    let mut outline = Polygon::new();
    let mut closed = false;
    for child in &node.children {
        match child.name.as_str() {
            "points" => {
                for pair in child.value.split_whitespace() {
                    outline.append_point(parse_pair(pair, child.line)?);
                }
            }
            "closed" => closed = parse_bool(child)?,
            other => debug!("Ignoring unknown outline key '{}' at line {}.", other, child.line),
        }
    }
    outline.set_closed(closed);
    Ok(outline)
}

fn basecell_to_attribute(op: &TilingOp) -> Attribute {
    let mut node = Attribute::flag("basecell");
    if op.shearable {
        node.push(Attribute::flag("shearable"));
    }
    if op.flexible_aspect {
        node.push(Attribute::flag("flexible"));
    }
    if !op.basecell_is_editable {
        node.push(Attribute::new("editable", "no"));
    }
    node.push(outline_to_attribute(&op.outline));
    for dest in &op.transforms {
        node.push(dest_to_attribute(dest));
    }
    node
}

fn basecell_from_attribute(node: &Attribute) -> Result<TilingOp> {
    let mut op = TilingOp::new(Polygon::new());
    for child in &node.children {
        match child.name.as_str() {
            "shearable" => op.shearable = parse_bool(child)?,
            "flexible" => op.flexible_aspect = parse_bool(child)?,
            "editable" => op.basecell_is_editable = parse_bool(child)?,
            "outline" => op.outline = outline_from_attribute(child)?,
            "transform" => {
                op.add_transform(parse_matrix(&child.value, child.line)?);
            }
            "clone" => {
                op.add_dest(dest_from_clone(child)?);
            }
            other => debug!("Ignoring unknown basecell key '{}' at line {}.", other, child.line),
        }
    }
    Ok(op)
}

fn dest_to_attribute(dest: &TilingDest) -> Attribute {
    if dest.is_plain() {
        return Attribute::new("transform", dest.transform.to_string());
    }
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut node = Attribute::flag("clone");
    node.push(Attribute::new("transform", dest.transform.to_string()))
        .push(Attribute::new("traceable", yes_no(dest.traceable)))
        .push(Attribute::new("iterations", dest.max_iterations.to_string()))
        .push(Attribute::new("conditions", dest.conditions.to_string()))
        .push(Attribute::new("max_size", dest.max_size.to_string()))
        .push(Attribute::new("min_size", dest.min_size.to_string()));
    if dest.is_progressive {
        node.push(Attribute::flag("progressive"));
    }
    if let Some(script) = &dest.scripted_condition {
        node.push(Attribute::new("scripted_condition", script.as_str()));
    }
    node
}

fn dest_from_clone(node: &Attribute) -> Result<TilingDest> {
    let mut dest = TilingDest::default();
    let mut conditions = None;
    for child in &node.children {
        match child.name.as_str() {
            "transform" => dest.transform = parse_matrix(&child.value, child.line)?,
            "traceable" => dest.traceable = parse_bool(child)?,
            "iterations" => {
                dest.max_iterations = i32::try_from(parse_i64(child)?).map_err(|_| {
                    Error::parse(child.line, "iteration count out of range")
                })?;
            }
            "conditions" => {
                conditions = Some(StopConditions::from_names(&child.value).ok_or_else(|| {
                    Error::parse(child.line, format!("unknown condition in '{}'", child.value))
                })?);
            }
            "max_size" => dest.max_size = parse_f64(child)?,
            "min_size" => dest.min_size = parse_f64(child)?,
            "progressive" => dest.is_progressive = parse_bool(child)?,
            "scripted_condition" => dest.scripted_condition = Some(child.value.clone()),
            other => debug!("Ignoring unknown clone key '{}' at line {}.", other, child.line),
        }
    }
    dest.conditions = conditions.unwrap_or_else(|| inferred_conditions(&dest));
    Ok(dest)
}

/// Conditions for blocks written without an explicit `conditions` line.
fn inferred_conditions(dest: &TilingDest) -> StopConditions {
    let mut c = StopConditions::ITERATIONS;
    if dest.max_size > 0.0 {
        c.insert(StopConditions::MAX_SIZE);
    }
    if dest.min_size > 0.0 {
        c.insert(StopConditions::MIN_SIZE);
    }
    if dest.scripted_condition.is_some() {
        c.insert(StopConditions::SCRIPTED);
    }
    c
}
