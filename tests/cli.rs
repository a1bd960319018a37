use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ehrenfest-plot"))
        .args(args)
        .output()
        .expect("run ehrenfest-plot")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn write_data(dir: &Path, name: &str) -> String {
    write_file(dir, name, "4 10 1 2 1\n6 14 0 3 1\n5 12 2 1 1\n")
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path.to_str().expect("utf8 path").to_string()
}

fn assert_written(out: &Output, outfile: &Path) {
    assert!(out.status.success(), "stderr:\n{}", stderr(out));
    let len = std::fs::metadata(outfile).expect("outfile exists").len();
    assert!(len > 0, "{} is empty", outfile.display());
}

#[test]
fn no_arguments_prints_usage() {
    let out = run(&[]);
    assert!(out.status.success(), "stderr:\n{}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("@Equilibrium"));
    assert!(stdout.contains("@Distribution"));
}

#[test]
fn mode_help_lists_options() {
    let out = run(&["@Poincare", "-h"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("resolution"));
    assert!(stdout.contains("outfile"));
}

#[test]
fn unknown_mode_exits_with_one() {
    let out = run(&["@Bogus", "a.dat"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Bogus"));
}

#[test]
fn unrecognized_option_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let out = run(&["@Equilibrium", &data, "foo=bar", "outfile=x.png"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("foo"));
}

#[test]
fn distribution_with_two_files_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = write_data(dir.path(), "a.dat");
    let b = write_data(dir.path(), "b.dat");
    let outfile = dir.path().join("d.png");
    let outfile_arg = format!("outfile={}", outfile.display());

    let out = run(&["@Distribution", &a, &b, &outfile_arg]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("exactly one"));
    assert!(!outfile.exists());
}

#[test]
fn missing_outfile_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let out = run(&["@Distribution", &data]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("outfile"));
}

#[test]
fn unreadable_data_file_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.dat");
    let outfile = dir.path().join("p.svg");
    let out = run(&[
        "@Poincare",
        missing.to_str().unwrap(),
        &format!("outfile={}", outfile.display()),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("missing.dat"));
    assert!(!outfile.exists());
}

#[test]
fn unsupported_extension_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let outfile = dir.path().join("figure.pdf");
    let out = run(&[
        "@Equilibrium",
        &data,
        &format!("outfile={}", outfile.display()),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unsupported output format"));
    assert!(!outfile.exists());
}

#[test]
fn poincare_scaling_over_two_files_writes_svg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let small = write_data(dir.path(), "n2.dat");
    let large = write_file(
        dir.path(),
        "n3.dat",
        "# equilibrium poincare h_0..h_3\n3 20 1 4 3 2\n5 26 0 6 5 1\n",
    );
    let outfile = dir.path().join("poincare.svg");

    let out = run(&[
        "@Poincare",
        &large,
        &small,
        "marker=k--s",
        &format!("outfile={}", outfile.display()),
    ]);
    assert_written(&out, &outfile);
    let svg = std::fs::read_to_string(&outfile).expect("read svg");
    assert!(svg.contains("<svg"));
}

#[test]
fn equilibrium_histogram_on_log_axis_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let outfile = dir.path().join("equilibrium.png");

    let out = run(&[
        "@Equilibrium",
        &data,
        "yscale=log",
        "title=$\\tau_{eq}$",
        &format!("outfile={}", outfile.display()),
    ]);
    assert_written(&out, &outfile);
    let bytes = std::fs::read(&outfile).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn distribution_with_point_marker_writes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let outfile = dir.path().join("distribution.png");

    let out = run(&[
        "@Distribution",
        &data,
        "marker=ro",
        "usetex=False",
        &format!("outfile={}", outfile.display()),
    ]);
    assert_written(&out, &outfile);
}

#[test]
fn gif_output_is_supported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let outfile = dir.path().join("poincare.gif");

    let out = run(&["@Poincare", &data, "xscale=log", &format!("outfile={}", outfile.display())]);
    assert_written(&out, &outfile);
}

#[test]
fn oversized_fontsize_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_data(dir.path(), "a.dat");
    let outfile = dir.path().join("d.png");

    let out = run(&[
        "@Distribution",
        &data,
        "fontsize=4000000000",
        &format!("outfile={}", outfile.display()),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("fontsize"));
    assert!(!outfile.exists());
}

#[test]
fn huge_step_counts_still_plot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = write_file(dir.path(), "big.dat", "0 10 1 2 1\n1e20 14 0 3 1\n");
    let outfile = dir.path().join("big.png");

    let out = run(&["@Equilibrium", &data, &format!("outfile={}", outfile.display())]);
    assert_written(&out, &outfile);
}
