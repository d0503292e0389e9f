use assert_cmd::cargo::cargo_bin_cmd;

fn lift(args: &[&str]) -> anyhow::Result<String> {
    let mut cmd = cargo_bin_cmd!("alnrng");
    let output = cmd.arg("lift").args(args).output()?;
    assert!(output.status.success());
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn command_lift_to_second() -> anyhow::Result<()> {
    for backend in ["array", "list"] {
        let stdout = lift(&[
            "0:100:10", "20:150:10", "--backend", backend, "--pos", "5", "25", "15",
        ])?;
        assert_eq!(stdout, "5\t105\n25\t155\n15\t-\n");
    }
    Ok(())
}

#[test]
fn command_lift_with_direction() -> anyhow::Result<()> {
    let stdout = lift(&["0:100:10", "20:150:10", "--pos", "15", "--dir", "forward"])?;
    assert_eq!(stdout, "15\t150\n");

    let stdout = lift(&["0:100:10", "20:150:10", "--pos", "15", "--dir", "backward"])?;
    assert_eq!(stdout, "15\t109\n");

    let stdout = lift(&["0:100:10", "20:150:10", "--pos", "50", "--dir", "right"])?;
    assert_eq!(stdout, "50\t-\n");
    Ok(())
}

#[test]
fn command_lift_to_first_reversed() -> anyhow::Result<()> {
    for backend in ["array", "list"] {
        let stdout = lift(&[
            "0:120:10:-",
            "20:100:10:-",
            "--backend",
            backend,
            "--to",
            "first",
            "--pos",
            "129",
            "115",
            "--dir",
            "backward",
        ])?;
        assert_eq!(stdout, "129\t0\n115\t9\n");

        let stdout = lift(&[
            "0:120:10:-",
            "20:100:10:-",
            "--backend",
            backend,
            "--to",
            "first",
            "--pos",
            "129",
            "115",
            "105",
        ])?;
        assert_eq!(stdout, "129\t0\n115\t-\n105\t24\n");
    }
    Ok(())
}
