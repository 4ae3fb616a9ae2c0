use predicates::str::{contains, diff};

#[test]
fn summary_output_is_stable_for_listed_arrivals() {
    let expected = concat!(
        "Metadata:\n",
        "date: 2025-05-12\n",
        "hours: 06:00-18:00\n",
        "Summary:\n",
        "arrived: 3\n",
        "served: 3\n",
        "left unserved: 0\n",
        "service rate: 100.0%\n",
        "avg wait: 7.33 min\n",
        "max wait: 13.00 min\n",
        "waits over 20 min: 0 (0.0%)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args([
        "run",
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
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn human_output_shows_the_vip_overtaking_a_waiting_regular() {
    let expected = concat!(
        "Metadata:\n",
        "date: 2025-05-12\n",
        "hours: 06:00-18:00\n",
        "Timeline:\n",
        "customer 0 (Regular) arrived 06:00 served 06:00-06:10\n",
        "customer 1 (Regular) arrived 06:01 served 06:15-06:25\n",
        "customer 2 (VIP) arrived 06:02 served 06:10-06:15\n",
        "Summary:\n",
        "arrived: 3\n",
        "served: 3\n",
        "left unserved: 0\n",
        "service rate: 100.0%\n",
        "avg wait: 7.33 min\n",
        "max wait: 14.00 min\n",
        "waits over 20 min: 0 (0.0%)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args([
        "run",
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
        "1:Regular",
        "--arrive",
        "2:VIP",
        "--p-threshold",
        "7",
        "--interval",
        "1",
        "--format",
        "human",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn closing_time_splits_served_and_unserved() {
    let expected = concat!(
        "Metadata:\n",
        "date: 2025-05-12\n",
        "hours: 06:00-07:00\n",
        "Summary:\n",
        "arrived: 3\n",
        "served: 2\n",
        "left unserved: 1\n",
        "service rate: 66.7%\n",
        "avg wait: 14.50 min\n",
        "max wait: 29.00 min\n",
        "waits over 20 min: 1 (50.0%)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args([
        "run",
        "--windows",
        "1",
        "--close",
        "7",
        "--service-time",
        "P:30",
        "--arrive",
        "0:P",
        "--arrive",
        "1:P",
        "--arrive",
        "2:P",
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn json_output_carries_summary_and_customer_entries() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
    cmd.args([
        "run",
        "--windows",
        "2",
        "--service-time",
        "P:5",
        "--arrive",
        "0:P",
        "--arrive",
        "1:P",
        "--arrive",
        "2:P",
        "--format",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(contains("\"served\": 3"))
        .stdout(contains("\"service_rate_pct\": 100.0"))
        .stdout(contains("\"customers\""));
}

#[test]
fn seeded_poisson_day_is_reproducible() {
    let config = concat!(
        "windows = 2\n",
        "[[service_times]]\n",
        "ticket_type = \"P\"\n",
        "minutes = 4.0\n",
        "[arrivals]\n",
        "rates = [\n",
        "  { ticket_type = \"P\", weekday = \"monday\", hour = 9, per_hour = 6.0 },\n",
        "  { ticket_type = \"P\", weekday = \"monday\", hour = 10, per_hour = 6.0 },\n",
        "]\n",
    );
    let path = std::env::temp_dir().join(format!(
        "clinic-poisson-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, config).expect("config write should succeed");

    let run = |seed: &str| {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("clinic-sim");
        cmd.args([
            "run",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            seed,
            "--format",
            "summary",
        ]);
        let output = cmd.output().expect("binary should run");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("stdout should be utf-8")
    };

    assert_eq!(run("42"), run("42"));
}
