use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn command_cover_first() -> anyhow::Result<()> {
    let mut cmd = cargo_bin_cmd!("alnrng");
    cmd.arg("cover").arg("0:100:10").arg("20:150:10");
    cmd.assert().success().stdout("1-10,21-30\n");
    Ok(())
}

#[test]
fn command_cover_second() -> anyhow::Result<()> {
    let mut cmd = cargo_bin_cmd!("alnrng");
    cmd.arg("cover")
        .arg("0:100:10")
        .arg("20:150:10")
        .arg("--axis")
        .arg("second")
        .arg("--backend")
        .arg("list");
    cmd.assert().success().stdout("101-110,151-160\n");
    Ok(())
}

#[test]
fn command_cover_merged() -> anyhow::Result<()> {
    let mut cmd = cargo_bin_cmd!("alnrng");
    cmd.arg("cover")
        .arg("10:110:10")
        .arg("0:100:10")
        .arg("30:300:1");
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("1-20,31\n"));
    Ok(())
}
