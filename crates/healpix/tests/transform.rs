//! Integration tests: direct transform accuracy on band-limited fields.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use tomos2n_healpix::{
    Alm, AlmLayout, Complex64, DirectTransform, Nside, SphericalMap, SphericalTransform,
};

/// Random real-field coefficients with unit variance up to `layout.lmax()`.
fn random_alm(layout: AlmLayout, seed: u64) -> Alm {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut alm = Alm::zeros(layout);
    for (i, (_, m)) in layout.iter().enumerate() {
        let re: f64 = StandardNormal.sample(&mut rng);
        let im: f64 = if m == 0 {
            0.0
        } else {
            StandardNormal.sample(&mut rng)
        };
        alm.as_mut_slice()[i] = Complex64::new(re, im);
    }
    alm
}

#[test]
fn band_limited_round_trip() {
    let nside = Nside::new(16).unwrap();
    let layout = AlmLayout::new(5).unwrap();
    let transform = DirectTransform::new(nside, layout);

    let alm = random_alm(layout, 7);
    let map = transform.alm2map(&alm, nside).unwrap();
    let back = transform.map2alm(&map, layout).unwrap();

    for (a, b) in alm.as_slice().iter().zip(back.as_slice()) {
        assert_abs_diff_eq!(a.re, b.re, epsilon = 2e-2);
        assert_abs_diff_eq!(a.im, b.im, epsilon = 2e-2);
    }
}

#[test]
fn synthesis_of_single_mode_matches_spherical_harmonic() {
    let nside = Nside::new(4).unwrap();
    let layout = AlmLayout::new(3).unwrap();
    let transform = DirectTransform::new(nside, layout);

    // a_10 = 1 gives f = sqrt(3 / 4 pi) cos(theta).
    let mut alm = Alm::zeros(layout);
    alm.set(1, 0, Complex64::new(1.0, 0.0)).unwrap();
    let map = transform.alm2map(&alm, nside).unwrap();

    for pix in 0..nside.npix() {
        let (theta, _) = nside.pix2ang(pix).unwrap();
        let expected = (3.0 / (4.0 * PI)).sqrt() * theta.cos();
        assert_abs_diff_eq!(map.as_slice()[pix], expected, epsilon = 1e-12);
    }
}

#[test]
fn real_part_of_m_mode_gives_cosine_pattern() {
    let nside = Nside::new(4).unwrap();
    let layout = AlmLayout::new(3).unwrap();
    let transform = DirectTransform::new(nside, layout);

    // a_11 = 1: f = 2 * lambda_11(z) cos(phi), lambda_11 = -sqrt(3 / 8 pi) sin(theta).
    let mut alm = Alm::zeros(layout);
    alm.set(1, 1, Complex64::new(1.0, 0.0)).unwrap();
    let map = transform.alm2map(&alm, nside).unwrap();

    for pix in 0..nside.npix() {
        let (theta, phi) = nside.pix2ang(pix).unwrap();
        let expected = -2.0 * (3.0 / (8.0 * PI)).sqrt() * theta.sin() * phi.cos();
        assert_abs_diff_eq!(map.as_slice()[pix], expected, epsilon = 1e-12);
    }
}

#[test]
fn anafast_concentrates_power_at_injected_degree() {
    let nside = Nside::new(16).unwrap();
    let layout = AlmLayout::new(6).unwrap();
    let transform = DirectTransform::new(nside, layout);

    let mut alm = Alm::zeros(layout);
    alm.set(3, 0, Complex64::new(2.0, 0.0)).unwrap();
    alm.set(3, 2, Complex64::new(1.0, -1.0)).unwrap();
    let map = transform.alm2map(&alm, nside).unwrap();

    let cl = transform.anafast(&map, layout).unwrap();
    let expected = alm.power_spectrum()[3];
    assert_abs_diff_eq!(cl[3], expected, epsilon = 0.05 * expected);
    for (l, &c) in cl.iter().enumerate() {
        if l != 3 {
            assert!(c < 0.01 * expected, "leakage at l = {l}: {c}");
        }
    }
}

#[test]
fn map_length_must_match_transform() {
    let nside = Nside::new(2).unwrap();
    let layout = AlmLayout::new(3).unwrap();
    let transform = DirectTransform::new(nside, layout);
    let small = SphericalMap::filled(Nside::new(1).unwrap(), 1.0);
    assert!(transform.map2alm(&small, layout).is_err());
}
