use assert_cmd::Command;
use predicates::prelude::*;

fn parking() -> Command {
    Command::cargo_bin("parking-cli").unwrap()
}

#[test]
fn park_and_leave_a_car() {
    parking()
        .write_stdin("1\n1\nABCDEF\n2\nABCDEF\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to Parking System!"))
        .stdout(predicate::str::contains("Please park your vehicle in spot number:1"))
        .stdout(predicate::str::contains("Please pay the parking fare:0.00"))
        .stdout(predicate::str::contains("Exiting from the system!"));
}

#[test]
fn bikes_start_after_car_spots() {
    parking()
        .write_stdin("1\n2\nMOTO\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please park your vehicle in spot number:4"));
}

#[test]
fn inline_layout_fills_up() {
    parking()
        .args(["--layout", "CAR:1"])
        .write_stdin("1\n1\nAAA\n1\n1\nBBB\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Parking slots are full for CAR"));
}

#[test]
fn unknown_ticket_is_reported() {
    parking()
        .write_stdin("2\nGHOST\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Unable to update ticket information: no open ticket for vehicle GHOST",
        ));
}

#[test]
fn invalid_utf8_line_does_not_end_the_session() {
    let mut stdin = b"\xff\n".to_vec();
    stdin.extend_from_slice(b"1\n1\nABCDEF\n3\n");
    parking()
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout(predicate::str::contains("unsupported option"))
        .stdout(predicate::str::contains("Please park your vehicle in spot number:1"))
        .stdout(predicate::str::contains("Exiting from the system!"));
}

#[test]
fn eof_ends_the_session_cleanly() {
    parking()
        .write_stdin("1\n1\nABCDEF\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("spot number:1"));
}

#[test]
fn state_file_carries_parked_vehicles_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("parking.bin");

    parking()
        .arg("--state-file")
        .arg(&state)
        .write_stdin("1\n1\nABCDEF\n3\n")
        .assert()
        .success();
    assert!(state.exists());

    // второй запуск: место 1 всё ещё занято, повторный въезд отклонён
    parking()
        .arg("--state-file")
        .arg(&state)
        .write_stdin("1\n1\nOTHER\n1\n1\nABCDEF\n2\nABCDEF\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("spot number:2"))
        .stdout(predicate::str::contains("vehicle ABCDEF is already parked"))
        .stdout(predicate::str::contains("Please pay the parking fare:"));
}

#[test]
fn invalid_rate_is_rejected() {
    parking()
        .arg("--bike-rate=-3")
        .write_stdin("3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bike-rate must be a non-negative number"));
}

#[test]
fn conflicting_layout_sources_are_rejected() {
    parking()
        .args(["--layout", "CAR:1", "--layout-file", "layout.txt"])
        .assert()
        .failure();
}
