use std::collections::HashMap;
use std::f64::consts::PI;

use symtile::prelude::*;

#[test]
fn every_builtin_renders_a_default_range() {
    let renderer = TilingRenderer::try_new(RenderConfig::default()).unwrap();
    let request = RenderRequest::default().with_range(0, 3, 0, 3);
    for (key, tiling) in BuiltinCatalog::global().iter() {
        let output = renderer
            .render(tiling, &request, &())
            .unwrap_or_else(|e| panic!("{key}: {e}"));
        assert!(output.instance_count() > 0, "{key} rendered nothing");
        assert_eq!(
            output.trace.as_ref().map(CloneGroup::len),
            Some(output.instance_count()),
            "{key}"
        );
    }
}

#[test]
fn wallpaper_instances_stay_finite() {
    let request = RenderRequest::default().with_range(-2, 2, -2, 2);
    for index in 0..17 {
        let tiling = builtin_tiling(index).unwrap();
        let output = render(&tiling, &request, &()).unwrap();
        for instance in &output.clones {
            let outline = instance.placed_outline(&tiling).unwrap();
            assert!(outline.points().iter().all(|p| p.is_finite()), "{}", tiling.name);
        }
    }
}

#[test]
fn p1_square_lattice_contains_nine_cells() {
    let tiling = create_wallpaper("p1").unwrap();
    assert_eq!(tiling.basecells.len(), 1);
    assert_eq!(tiling.basecells[0].transforms.len(), 1);
    assert!(tiling.basecells[0].transforms[0].transform.is_identity());

    let output = render(&tiling, &RenderRequest::default().with_range(0, 2, 0, 2), &()).unwrap();
    assert_eq!(output.instance_count(), 9);
    assert_eq!(output.cells_visited, 9);
}

#[test]
fn p6m_has_twelve_destinations() {
    let tiling = create_wallpaper("p6m").unwrap();
    assert_eq!(tiling.basecells.len(), 1);
    assert_eq!(tiling.basecells[0].transforms.len(), 12);
    let reflections = tiling.basecells[0]
        .transforms
        .iter()
        .filter(|d| d.transform.determinant() < 0.0)
        .count();
    assert_eq!(reflections, 6);
}

#[test]
fn boundary_outside_every_cell_is_empty_success() {
    let tiling = create_wallpaper("pmg").unwrap();
    let boundary = Polygon::rect(0.1, 0.1, 0.2, 0.2);
    let output = render(&tiling, &RenderRequest::default().with_boundary(boundary), &()).unwrap();
    assert_eq!(output.instance_count(), 0);
    assert_eq!(output.cells_visited, 0);
}

#[test]
fn parallel_repeat_vectors_fail_without_output() {
    let mut tiling = create_wallpaper("p2").unwrap();
    tiling.set_repeat_x([1.0, 1.0]);
    tiling.set_repeat_y([1.0, 1.0]);
    let mut target = CloneGroup::new();
    let renderer = TilingRenderer::try_new(RenderConfig::default()).unwrap();
    let result = renderer.render_into(&tiling, &RenderRequest::default(), &(), &mut target);
    assert!(matches!(result, Err(Error::DegenerateLattice)));
    assert!(target.is_empty());
}

#[test]
fn source_clone_carries_local_transform() {
    let tiling = create_wallpaper("p4").unwrap();
    let local = Affine2D::from_matrix(0.5, 0.0, 0.0, 2.0, 0.1, 0.2);
    let objects = HashMap::from([(ObjectId(3), local)]);
    let request = RenderRequest::default()
        .with_trace_cells(false)
        .with_source(0, ObjectId(3));
    let output = render(&tiling, &request, &objects).unwrap();
    let dests = &tiling.basecells[0].transforms;
    assert_eq!(output.instance_count(), dests.len());
    for (instance, dest) in output.clones.iter().zip(dests) {
        assert!(instance
            .transform
            .abs_diff_eq(&local.then(&dest.transform), 1e-12));
    }
}

#[test]
fn spiral_shrinks_toward_its_centre() {
    let tiling = create_spiral(0.0, 4.0 * PI, 5.0, 3.0, 8).unwrap();
    let output = render(&tiling, &RenderRequest::default(), &()).unwrap();
    let sizes: Vec<f64> = output
        .clones
        .iter()
        .filter(|i| i.destination == 0)
        .map(|i| i.transform.determinant().abs())
        .collect();
    assert!(sizes.len() > 1);
    assert!(sizes.windows(2).all(|w| w[1] < w[0]));
}
