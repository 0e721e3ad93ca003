use approx::assert_relative_eq;
use tesseroids::constants::{G, MEAN_EARTH_RADIUS, SI2EOTVOS, SI2MGAL};
use tesseroids::forward::params::GravityParams;
use tesseroids::forward::TessGravity;
use tesseroids::glq::GlqRule;
use tesseroids::grid::Grid;
use tesseroids::kernels::{
    FieldComponent, Gx, Gxx, Gxy, Gxz, Gy, Gyy, Gyz, Gz, Gzz, Kernel, Potential,
};
use tesseroids::tesseroid::Tesseroid;

mod common;
use common::{assert_fields_close, degree_block, relative_error, small_block};

const HEIGHTS: [f64; 6] = [10e3, 20e3, 50e3, 100e3, 200e3, 400e3];

fn vertical_profile() -> Grid {
    let n = HEIGHTS.len();
    Grid::from_arrays(vec![0.0; n], vec![0.0; n], HEIGHTS.to_vec()).unwrap()
}

fn modeler(order: usize) -> TessGravity {
    TessGravity::new(GravityParams::builder().orders(order).build().unwrap()).unwrap()
}

#[test]
fn test_vertical_profile_of_small_block() {
    let fwd = TessGravity::default_orders().unwrap();
    let grid = vertical_profile();
    let model = small_block();

    let gz = fwd.calculate::<Gz>(&model, &grid).unwrap();
    assert_fields_close(
        &gz,
        &[
            15.49125202,
            4.889953277,
            0.8552331641,
            0.2178918367,
            0.05487053068,
            0.01375989094,
        ],
        1e-8,
    );
    assert!(gz.windows(2).all(|w| w[0] > w[1]));

    let gzz = fwd.calculate::<Gzz>(&model, &grid).unwrap();
    assert_fields_close(
        &gzz,
        &[
            22.53307645,
            4.437201668,
            0.3346463875,
            0.04322922751,
            0.00546914497,
            0.0006870012705,
        ],
        1e-8,
    );

    let pot = fwd.calculate::<Potential>(&model, &grid).unwrap();
    assert_fields_close(
        &pot,
        &[
            1.930154055,
            1.051430734,
            0.4353758816,
            0.2194288797,
            0.1100723404,
            0.05511560616,
        ],
        1e-8,
    );
}

#[test]
fn test_point_mass_limit() {
    let fwd = TessGravity::default_orders().unwrap();
    let model = small_block();
    let height = 400e3;
    let grid = Grid::point(0.0, 0.0, height);

    // Distance to the radial center of mass of the block
    let (r1, r2) = model[0].radii();
    let rc = 0.75 * (r2.powi(4) - r1.powi(4)) / (r2.powi(3) - r1.powi(3));
    let d = MEAN_EARTH_RADIUS + height - rc;
    let gm = G * model[0].mass();

    let gz = fwd.calculate::<Gz>(&model, &grid).unwrap()[0];
    let gzz = fwd.calculate::<Gzz>(&model, &grid).unwrap()[0];
    let pot = fwd.calculate::<Potential>(&model, &grid).unwrap()[0];

    assert_relative_eq!(gz, gm / (d * d) * SI2MGAL, max_relative = 1e-3);
    assert_relative_eq!(gzz, 2.0 * gm / d.powi(3) * SI2EOTVOS, max_relative = 1e-3);
    assert_relative_eq!(pot, gm / d, max_relative = 1e-3);
}

#[test]
fn test_horizontal_components_vanish_above_center() {
    let fwd = modeler(4);
    let grid = Grid::point(0.0, 0.0, 30e3);
    let model = degree_block();
    let gz = fwd.calculate::<Gz>(&model, &grid).unwrap()[0];
    let gzz = fwd.calculate::<Gzz>(&model, &grid).unwrap()[0];

    for component in [
        FieldComponent::Gx,
        FieldComponent::Gy,
        FieldComponent::Gxy,
        FieldComponent::Gxz,
        FieldComponent::Gyz,
    ] {
        let value = fwd.calculate_component(component, &model, &grid).unwrap().field[0];
        let scale = if component.is_tensor() { gzz } else { gz };
        assert!(
            value.abs() < 1e-10 * scale.abs(),
            "{component} = {value} above the center"
        );
    }
}

#[test]
fn test_horizontal_signs_point_to_the_mass() {
    let fwd = modeler(8);
    let grid = Grid::point(0.3, 0.2, 20e3);
    let model = degree_block();

    // North-east of the block: attraction towards south-west
    let gx = fwd.calculate::<Gx>(&model, &grid).unwrap()[0];
    let gy = fwd.calculate::<Gy>(&model, &grid).unwrap()[0];
    assert_relative_eq!(gx, -5.78083960876677, max_relative = 1e-7);
    assert_relative_eq!(gy, -9.965615865969456, max_relative = 1e-7);
}

fn check_2d_against_3d<K: Kernel>(fwd: &TessGravity, grid: &Grid) {
    let model = degree_block();
    let result = fwd.calculate_with_stats::<K>(&model, grid).unwrap();
    let reference = fwd.calculate_3d::<K>(&model, grid).unwrap();

    assert_eq!(result.stats.fallbacks, 0, "{}", K::COMPONENT);
    assert_eq!(result.stats.evaluations, grid.len());
    for (a, b) in result.field.iter().zip(&reference) {
        assert_relative_eq!(*a, *b, max_relative = 1e-6);
    }
}

#[test]
fn test_2d_and_3d_quadratures_agree_at_high_order() {
    let fwd = modeler(8);
    let grid = Grid::from_arrays(vec![0.3, 1.5], vec![0.2, -1.0], vec![20e3, 5e3]).unwrap();

    check_2d_against_3d::<Potential>(&fwd, &grid);
    check_2d_against_3d::<Gx>(&fwd, &grid);
    check_2d_against_3d::<Gy>(&fwd, &grid);
    check_2d_against_3d::<Gz>(&fwd, &grid);
    check_2d_against_3d::<Gxx>(&fwd, &grid);
    check_2d_against_3d::<Gxy>(&fwd, &grid);
    check_2d_against_3d::<Gxz>(&fwd, &grid);
    check_2d_against_3d::<Gyy>(&fwd, &grid);
    check_2d_against_3d::<Gyz>(&fwd, &grid);
    check_2d_against_3d::<Gzz>(&fwd, &grid);
}

#[test]
fn test_tensor_is_traceless_outside_the_mass() {
    let fwd = modeler(8);
    let grid = Grid::from_arrays(vec![0.3, 1.5], vec![0.2, -1.0], vec![20e3, 5e3]).unwrap();
    let model = degree_block();

    let gxx = fwd.calculate::<Gxx>(&model, &grid).unwrap();
    let gyy = fwd.calculate::<Gyy>(&model, &grid).unwrap();
    let gzz = fwd.calculate::<Gzz>(&model, &grid).unwrap();

    for i in 0..grid.len() {
        let trace = gxx[i] + gyy[i] + gzz[i];
        assert!(
            trace.abs() < 1e-6 * gzz[i].abs(),
            "trace {trace} at point {i}"
        );
    }
}

fn check_node_fallback<K: Kernel>(fwd: &TessGravity, grid: &Grid) {
    let model = degree_block();
    let result = fwd.calculate_with_stats::<K>(&model, grid).unwrap();
    let reference = fwd.calculate_3d::<K>(&model, grid).unwrap();

    assert_eq!(result.stats.evaluations, 1, "{}", K::COMPONENT);
    assert_eq!(result.stats.fallbacks, 1, "{}", K::COMPONENT);
    assert!(result.field[0].is_finite(), "{}", K::COMPONENT);
    assert_relative_eq!(result.field[0], reference[0], max_relative = 1e-6);
}

#[test]
fn test_point_above_a_node_uses_the_3d_quadrature() {
    for order in [3, 4] {
        let fwd = modeler(order);

        // First GLQ node of the block, away from its center
        let node = 0.5 * GlqRule::new(order).unwrap().abscissas().unscaled()[0];
        for height in [10e3, 0.0] {
            let grid = Grid::point(node, node, height);

            check_node_fallback::<Potential>(&fwd, &grid);
            check_node_fallback::<Gx>(&fwd, &grid);
            check_node_fallback::<Gy>(&fwd, &grid);
            check_node_fallback::<Gz>(&fwd, &grid);
            check_node_fallback::<Gxx>(&fwd, &grid);
            check_node_fallback::<Gxy>(&fwd, &grid);
            check_node_fallback::<Gxz>(&fwd, &grid);
            check_node_fallback::<Gyy>(&fwd, &grid);
            check_node_fallback::<Gyz>(&fwd, &grid);
            check_node_fallback::<Gzz>(&fwd, &grid);
        }

        let grid = Grid::point(node, node, 10e3);
        let gzz = fwd.calculate::<Gzz>(&degree_block(), &grid).unwrap();
        assert!(gzz[0] > 0.0);
    }
}

#[test]
fn test_close_to_a_node_matches_the_3d_quadrature() {
    let fwd = modeler(3);
    let model = degree_block();
    let node = 0.5 * GlqRule::new(3).unwrap().abscissas().unscaled()[0];

    // 1e-4° from the node the 3-D path is used, 1e-3° away the closed forms are accurate
    for (offset, fallbacks) in [(1e-4, 1), (1e-3, 0)] {
        let grid = Grid::point(node + offset, node + offset, 10e3);
        for component in [
            FieldComponent::Potential,
            FieldComponent::Gx,
            FieldComponent::Gy,
            FieldComponent::Gz,
        ] {
            let result = fwd.calculate_component(component, &model, &grid).unwrap();
            assert_eq!(result.stats.fallbacks, fallbacks, "{component} at {offset}°");

            let reference = match component {
                FieldComponent::Potential => fwd.calculate_3d::<Potential>(&model, &grid),
                FieldComponent::Gx => fwd.calculate_3d::<Gx>(&model, &grid),
                FieldComponent::Gy => fwd.calculate_3d::<Gy>(&model, &grid),
                _ => fwd.calculate_3d::<Gz>(&model, &grid),
            }
            .unwrap();
            assert_relative_eq!(result.field[0], reference[0], max_relative = 1e-6);
        }
    }
}

fn check_pole<K: Kernel>(fwd: &TessGravity, model: &[Tesseroid], grid: &Grid) {
    let result = fwd.calculate_with_stats::<K>(model, grid).unwrap();
    let reference = fwd.calculate_3d::<K>(model, grid).unwrap();
    assert_eq!(result.stats.fallbacks, 0, "{}", K::COMPONENT);
    assert_relative_eq!(result.field[0], reference[0], max_relative = 1e-8);
}

#[test]
fn test_observation_point_at_the_pole() {
    let fwd = modeler(8);
    let model = vec![Tesseroid::new(0.0, 10.0, 85.0, 86.0, 0.0, 10_000.0, 2670.0).unwrap()];

    // Off the symmetry meridian of the block, every component is non zero
    let grid = Grid::point(2.0, 90.0, 10e3);
    check_pole::<Potential>(&fwd, &model, &grid);
    check_pole::<Gx>(&fwd, &model, &grid);
    check_pole::<Gy>(&fwd, &model, &grid);
    check_pole::<Gz>(&fwd, &model, &grid);
    check_pole::<Gxx>(&fwd, &model, &grid);
    check_pole::<Gxy>(&fwd, &model, &grid);
    check_pole::<Gxz>(&fwd, &model, &grid);
    check_pole::<Gyy>(&fwd, &model, &grid);
    check_pole::<Gyz>(&fwd, &model, &grid);
    check_pole::<Gzz>(&fwd, &model, &grid);

    // On the symmetry meridian the east components vanish
    let grid = Grid::point(5.0, 90.0, 10e3);
    check_pole::<Gyy>(&fwd, &model, &grid);
    let gxx = fwd.calculate::<Gxx>(&model, &grid).unwrap()[0];
    for component in [FieldComponent::Gxy, FieldComponent::Gyz] {
        let value = fwd.calculate_component(component, &model, &grid).unwrap().field[0];
        assert!(value.abs() < 1e-12 * gxx.abs(), "{component} = {value}");
    }
}

#[test]
fn test_calculate_component_dispatch() {
    let fwd = modeler(3);
    let grid = Grid::from_arrays(vec![0.3, -1.0], vec![0.2, 0.7], vec![20e3, 80e3]).unwrap();
    let model = degree_block();

    let by_type = [
        fwd.calculate::<Potential>(&model, &grid).unwrap(),
        fwd.calculate::<Gx>(&model, &grid).unwrap(),
        fwd.calculate::<Gy>(&model, &grid).unwrap(),
        fwd.calculate::<Gz>(&model, &grid).unwrap(),
        fwd.calculate::<Gxx>(&model, &grid).unwrap(),
        fwd.calculate::<Gxy>(&model, &grid).unwrap(),
        fwd.calculate::<Gxz>(&model, &grid).unwrap(),
        fwd.calculate::<Gyy>(&model, &grid).unwrap(),
        fwd.calculate::<Gyz>(&model, &grid).unwrap(),
        fwd.calculate::<Gzz>(&model, &grid).unwrap(),
    ];
    for (component, expected) in FieldComponent::ALL.iter().zip(&by_type) {
        let by_name = fwd
            .calculate_component(component.name().parse().unwrap(), &model, &grid)
            .unwrap();
        assert_eq!(&by_name.field, expected, "{component}");
    }
}

#[test]
fn test_density_scales_the_field() {
    let fwd = TessGravity::default_orders().unwrap();
    let grid = vertical_profile();
    let light = vec![Tesseroid::new(10.0, 11.0, 20.0, 21.0, 0.0, 5000.0, 1000.0).unwrap()];
    let heavy = vec![Tesseroid::new(10.0, 11.0, 20.0, 21.0, 0.0, 5000.0, 3000.0).unwrap()];
    let negative = vec![Tesseroid::new(10.0, 11.0, 20.0, 21.0, 0.0, 5000.0, -1000.0).unwrap()];

    let gz_light = fwd.calculate::<Gz>(&light, &grid).unwrap();
    let gz_heavy = fwd.calculate::<Gz>(&heavy, &grid).unwrap();
    let gz_negative = fwd.calculate::<Gz>(&negative, &grid).unwrap();
    for i in 0..grid.len() {
        assert_relative_eq!(gz_heavy[i], 3.0 * gz_light[i], max_relative = 1e-12);
        assert_relative_eq!(gz_negative[i], -gz_light[i], max_relative = 1e-12);
    }
}

#[test]
fn test_model_is_additive() {
    let fwd = modeler(3);
    let grid = Grid::from_arrays(vec![0.0, 2.0], vec![0.0, 1.0], vec![50e3, 10e3]).unwrap();
    let a = Tesseroid::new(-1.0, 0.0, -1.0, 1.0, 0.0, 2000.0, 2670.0).unwrap();
    let b = Tesseroid::new(5.0, 6.0, -1.0, 1.0, 2000.0, 6000.0, -300.0).unwrap();

    let both = fwd.calculate::<Gz>(&[a.clone(), b.clone()], &grid).unwrap();
    let only_a = fwd.calculate::<Gz>(&[a], &grid).unwrap();
    let only_b = fwd.calculate::<Gz>(&[b], &grid).unwrap();
    for i in 0..grid.len() {
        assert_relative_eq!(both[i], only_a[i] + only_b[i], max_relative = 1e-12);
    }
}

#[test]
fn test_wraparound_model_matches_shifted_model() {
    let fwd = TessGravity::default_orders().unwrap();
    let across = vec![Tesseroid::new(179.0, -179.0, -1.0, 1.0, 0.0, 1000.0, 2670.0).unwrap()];
    let centered = vec![Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, 1000.0, 2670.0).unwrap()];

    let at_dateline =
        Grid::from_arrays(vec![180.0, -180.0, 179.5], vec![0.3; 3], vec![50e3; 3]).unwrap();
    let at_greenwich =
        Grid::from_arrays(vec![0.0, 0.0, -0.5], vec![0.3; 3], vec![50e3; 3]).unwrap();

    for component in [FieldComponent::Gz, FieldComponent::Gx, FieldComponent::Gyy] {
        let a = fwd.calculate_component(component, &across, &at_dateline).unwrap();
        let b = fwd.calculate_component(component, &centered, &at_greenwich).unwrap();
        assert_fields_close(&a.field, &b.field, 1e-8);
    }
}

#[test]
fn test_adaptive_discretization_near_the_block() {
    let model = vec![Tesseroid::new(-0.1, 0.1, -0.1, 0.1, 0.0, 5000.0, 2670.0).unwrap()];
    let grid = Grid::point(0.0, 0.0, 3000.0);

    let plain = TessGravity::default_orders().unwrap();
    let adaptive =
        TessGravity::new(GravityParams::builder().adaptive(true).build().unwrap()).unwrap();
    let reference = modeler(30);

    for component in [FieldComponent::Gz, FieldComponent::Gzz] {
        let exact = reference.calculate_component(component, &model, &grid).unwrap().field[0];
        let coarse = plain.calculate_component(component, &model, &grid).unwrap().field[0];
        let refined = adaptive.calculate_component(component, &model, &grid).unwrap();

        assert!(relative_error(coarse, exact) > 0.1, "{component}");
        assert!(relative_error(refined.field[0], exact) < 1e-3, "{component}");
        assert!(refined.stats.evaluations > 1);
    }
}

#[test]
fn test_adaptive_without_splits_matches_plain() {
    let model = degree_block();
    let grid = Grid::from_arrays(vec![0.0, 0.7], vec![0.0, -0.2], vec![2e3, 10e3]).unwrap();
    let plain = TessGravity::default_orders().unwrap();
    let expected = plain.calculate::<Gz>(&model, &grid).unwrap();

    for params in [
        GravityParams::builder().adaptive(true).max_split_depth(0),
        GravityParams::builder().adaptive(true).size_ratio(1e-9),
    ] {
        let fwd = TessGravity::new(params.build().unwrap()).unwrap();
        let result = fwd.calculate_with_stats::<Gz>(&model, &grid).unwrap();
        assert_eq!(result.field, expected);
        assert_eq!(result.stats.evaluations, 2);
    }
}

#[test]
fn test_point_inside_a_tesseroid_is_finite() {
    let model = vec![Tesseroid::new(-0.1, 0.1, -0.1, 0.1, 0.0, 5000.0, 2670.0).unwrap()];
    let grid = Grid::point(0.0, 0.0, -2500.0);

    for adaptive in [true, false] {
        let params = GravityParams::builder().adaptive(adaptive).build().unwrap();
        let fwd = TessGravity::new(params).unwrap();

        let pot = fwd.calculate_with_stats::<Potential>(&model, &grid).unwrap();
        let gz = fwd.calculate_with_stats::<Gz>(&model, &grid).unwrap();
        assert!(pot.field[0].is_finite() && pot.field[0] > 0.0);
        assert!(gz.field[0].is_finite());
        assert_eq!(pot.stats.inside, 1, "adaptive = {adaptive}");
        assert_eq!(gz.stats.inside, 1, "adaptive = {adaptive}");

        let above = Grid::point(0.0, 0.0, 1000.0);
        let result = fwd.calculate_with_stats::<Gz>(&model, &above).unwrap();
        assert_eq!(result.stats.inside, 0);
    }
}
