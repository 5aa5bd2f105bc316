use assert_cmd::Command;

fn paramsync() -> Command {
    Command::cargo_bin("paramsync").unwrap()
}

#[test]
fn help_works() {
    paramsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Sync AWS SSM parameters into Kubernetes secrets",
        ));
}

#[test]
fn no_parameters_fails_before_any_network_use() {
    paramsync()
        .assert()
        .failure()
        .stderr(predicates::str::contains("no parameter names provided"));
}

#[test]
fn empty_parameter_list_fails() {
    paramsync()
        .args(["--params", " , "])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no parameter names provided"));
}

#[test]
fn malformed_descriptor_fails() {
    paramsync()
        .args(["--param", ":Opaque"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid parameter descriptor"));
}

#[test]
fn unknown_decode_policy_is_rejected() {
    paramsync()
        .args(["--params", "/app/a", "--decode", "yaml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown decode policy"));
}

#[test]
fn unknown_conflict_mode_is_rejected() {
    paramsync()
        .args(["--params", "/app/a", "--on-conflict", "merge"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown conflict mode"));
}
