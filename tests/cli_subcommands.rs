use predicates::str::diff;

#[test]
fn show_config_prints_the_effective_configuration() {
    let expected = concat!(
        "Windows: 1\n",
        "Hours: 06:00-18:00\n",
        "Priority tickets: VIP\n",
        "Priority threshold: 7 min\n",
        "Non-priority threshold: 20 min\n",
        "Optimization interval: 5 min\n",
        "Forced skips per pass: 1\n",
        "Skip ceiling: 3\n",
        "Grace period: 60 min\n",
        "Service times:\n",
        "- Regular: 10 min\n",
        "- VIP: 5 min\n",
        "Arrivals: 3 listed\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args([
        "show-config",
        "--windows",
        "1",
        "--service-time",
        "Regular:10",
        "--service-time",
        "VIP:5",
        "--priority",
        "VIP",
        "--arrive",
        "0:Regular",
        "--arrive",
        "1:VIP",
        "--arrive",
        "2:Regular",
        "--p-threshold",
        "7",
        "--interval",
        "5",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_config_reports_poisson_plans() {
    let config = concat!(
        "windows = 2\n",
        "[[service_times]]\n",
        "ticket_type = \"P\"\n",
        "minutes = 4.0\n",
        "[arrivals]\n",
        "rates = [\n",
        "  { ticket_type = \"P\", weekday = \"monday\", hour = 9, per_hour = 6.0 },\n",
        "]\n",
    );
    let path = std::env::temp_dir().join(format!(
        "clinic-show-config-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, config).expect("config write should succeed");

    let expected = concat!(
        "Windows: 2\n",
        "Hours: 06:00-18:00\n",
        "Priority tickets: none\n",
        "Priority threshold: 10 min\n",
        "Non-priority threshold: 20 min\n",
        "Optimization interval: 10 min\n",
        "Forced skips per pass: 1\n",
        "Skip ceiling: 3\n",
        "Grace period: 60 min\n",
        "Service times:\n",
        "- P: 4 min\n",
        "Arrivals: poisson (1 rate rows)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert().success().stdout(diff(expected));
}
