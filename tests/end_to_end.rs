//! End-to-end tests: run the binary on small maps.

use std::path::{Path, PathBuf};
use std::process::Command;

use tomos2n_healpix::{Nside, SphericalMap};
use tomos2n_io::{S2nFormat, WriterConfig, read_map, read_s2n, write_map};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tomos2n"))
}

fn write_input(path: &Path, shift: f64) {
    let nside = Nside::new(1).unwrap();
    let data = (0..nside.npix())
        .map(|p| {
            let (theta, phi) = nside.pix2ang(p).unwrap();
            theta.cos() + (phi + shift).sin() + 0.1 * ((p * 31) % 7) as f64
        })
        .collect();
    let map = SphericalMap::new(nside, data).unwrap();
    write_map(path, &map, &WriterConfig::default()).unwrap();
}

/// Lays out an input map, one tile mask and a config in `dir`.
fn setup(dir: &Path) -> PathBuf {
    write_input(&dir.join("map.parquet"), 0.0);

    let masks = dir.join("masks");
    std::fs::create_dir_all(&masks).unwrap();
    std::fs::write(
        masks.join("manifest.toml"),
        "[[region]]\nname = \"8_tile_0001\"\ntile_size = 8\n",
    )
    .unwrap();
    let mask_data = (0..12).map(|p| if p < 6 { 0.0 } else { 1.0 }).collect();
    let mask = SphericalMap::new(Nside::new(1).unwrap(), mask_data).unwrap();
    write_map(&masks.join("8_tile_0001.parquet"), &mask, &WriterConfig::default()).unwrap();

    let config = dir.join("tomos2n.toml");
    std::fs::write(
        &config,
        format!(
            r#"
seed = 5
inputs = ["{input}"]

[transform]
l = 4
b = 2.0
j_min = 0
simscales = [-1]

[ensemble]
nmaps = 3

[regions]
mask_dir = "{masks}"
tile_size = 8

[output]
dir = "{out}"
"#,
            input = dir.join("map.parquet").display(),
            masks = masks.display(),
            out = dir.join("out").display(),
        ),
    )
    .unwrap();
    config
}

#[test]
fn single_map_produces_all_outputs() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = setup(dir.path());

    let status = bin().arg("run").arg("-c").arg(&config).status().unwrap();
    assert!(status.success());

    let out = dir.path().join("out");
    let global = read_s2n(&out.join("global_1"), S2nFormat::Binary).unwrap();
    assert_eq!(global.len(), 4);
    assert_eq!(std::fs::metadata(out.join("global_1")).unwrap().len(), 32);
    assert_eq!(read_map(&out.join("mean_1.parquet")).unwrap().npix(), 12);
    assert_eq!(read_map(&out.join("error_1.parquet")).unwrap().npix(), 12);

    let tile = read_s2n(&out.join("8_tile_0001_1"), S2nFormat::Binary).unwrap();
    assert_eq!(tile.len(), 4);
    assert!(tile.iter().all(|v| v.is_finite()));
}

#[test]
fn text_flag_writes_one_value_per_line() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = setup(dir.path());

    let status = bin()
        .args(["run", "--text", "-c"])
        .arg(&config)
        .status()
        .unwrap();
    assert!(status.success());

    let path = dir.path().join("out").join("global_1");
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().all(|line| line.contains('e')));
    assert_eq!(read_s2n(&path, S2nFormat::Text).unwrap().len(), 4);
}

#[test]
fn seeded_runs_are_reproducible() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = setup(dir.path());
    let global = dir.path().join("out").join("global_1");

    assert!(bin().arg("run").arg("-c").arg(&config).status().unwrap().success());
    let first = std::fs::read(&global).unwrap();
    assert!(bin().arg("run").arg("-c").arg(&config).status().unwrap().success());
    assert_eq!(std::fs::read(&global).unwrap(), first);
}

#[test]
fn missing_input_fails_with_exit_code_one() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = setup(dir.path());

    let output = bin()
        .arg("run")
        .arg("-c")
        .arg(&config)
        .arg(dir.path().join("absent.parquet"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 1 input files failed"), "stderr: {stderr}");
    assert!(!dir.path().join("out").join("global_1").exists());
}

#[test]
fn parallel_run_keeps_siblings_going() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = setup(dir.path());
    let second = dir.path().join("second.parquet");
    write_input(&second, 1.0);

    let status = bin()
        .args(["run", "-P", "-j", "2", "-c"])
        .arg(&config)
        .arg(dir.path().join("map.parquet"))
        .arg(&second)
        .status()
        .unwrap();
    assert!(status.success());

    let out = dir.path().join("out");
    for i in 1..=2 {
        let global = read_s2n(&out.join(format!("global_{i}")), S2nFormat::Binary).unwrap();
        assert_eq!(global.len(), 4);
        assert!(out.join(format!("8_tile_0001_{i}")).exists());
    }
}

#[test]
fn pixelise_grids_samples() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("samples.txt");
    std::fs::write(&input, "# lon lat value\n0 0 1.5\n0 0 2.5\n180 -60 4.0\n").unwrap();
    let output = dir.path().join("grid.parquet");

    let status = bin()
        .args(["pixelise", "--nside", "1", "-o"])
        .arg(&output)
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());

    let map = read_map(&output).unwrap();
    assert_eq!(map.npix(), 12);
    assert_eq!(map.n_unseen(), 10);
    let pix = Nside::new(1).unwrap().lonlat2pix(0.0, 0.0);
    assert_eq!(map.as_slice()[pix], 2.0);
}
