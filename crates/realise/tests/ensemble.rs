use rand::SeedableRng;
use rand::rngs::StdRng;
use tomos2n_healpix::{Nside, SphericalMap};
use tomos2n_realise::{
    DrawScheme, RunParams, ScaleSelection, WaveletBridge, build_ensemble,
};

fn input_map(nside: Nside) -> SphericalMap {
    let data = (0..nside.npix())
        .map(|pix| {
            let (theta, phi) = nside.pix2ang(pix).unwrap();
            let speckle = ((pix * 7919) % 97) as f64 / 97.0;
            theta.cos() + theta.sin().powi(2) * (2.0 * phi).cos() + speckle
        })
        .collect();
    SphericalMap::new(nside, data).unwrap()
}

#[test]
fn nside_one_ensemble_has_four_members() {
    let params = RunParams::new(
        Nside::new(1).unwrap(),
        4,
        2.0,
        0,
        &ScaleSelection::new(vec![-1]),
    )
    .unwrap()
    .with_nmaps(3)
    .with_seed(11);
    let map = input_map(params.nside());
    let bridge = WaveletBridge::new(&params).unwrap();
    let decomposition = bridge.analyze(&map, &params).unwrap();
    let mut rng = StdRng::seed_from_u64(params.seed().unwrap());

    let ensemble =
        build_ensemble(&map, &decomposition, &bridge, &params, &mut rng, false).unwrap();
    assert_eq!(ensemble.dim(), (4, 12));
    assert_eq!(ensemble.row(3).to_vec(), map.as_slice());
    assert!(ensemble.iter().all(|v| v.is_finite()));
}

#[test]
fn draw_scheme_changes_realisations() {
    let base = RunParams::new(
        Nside::new(4).unwrap(),
        8,
        2.0,
        1,
        &ScaleSelection::new(vec![-1, -2]),
    )
    .unwrap()
    .with_nmaps(2);
    let map = input_map(base.nside());
    let bridge = WaveletBridge::new(&base).unwrap();
    let decomposition = bridge.analyze(&map, &base).unwrap();

    let reference = build_ensemble(
        &map,
        &decomposition,
        &bridge,
        &base,
        &mut StdRng::seed_from_u64(5),
        false,
    )
    .unwrap();
    let gaussian_params = base.clone().with_draw_scheme(DrawScheme::Gaussian);
    let gaussian = build_ensemble(
        &map,
        &decomposition,
        &bridge,
        &gaussian_params,
        &mut StdRng::seed_from_u64(5),
        false,
    )
    .unwrap();

    assert_ne!(reference.row(0), gaussian.row(0));
    assert_eq!(reference.row(2), gaussian.row(2));
}

#[test]
fn different_seeds_differ() {
    let params = RunParams::new(
        Nside::new(4).unwrap(),
        8,
        2.0,
        0,
        &ScaleSelection::default(),
    )
    .unwrap()
    .with_nmaps(1);
    let map = input_map(params.nside());
    let bridge = WaveletBridge::new(&params).unwrap();
    let decomposition = bridge.analyze(&map, &params).unwrap();
    let a = build_ensemble(
        &map,
        &decomposition,
        &bridge,
        &params,
        &mut StdRng::seed_from_u64(1),
        false,
    )
    .unwrap();
    let b = build_ensemble(
        &map,
        &decomposition,
        &bridge,
        &params,
        &mut StdRng::seed_from_u64(2),
        false,
    )
    .unwrap();
    assert_ne!(a.row(0), b.row(0));
}
