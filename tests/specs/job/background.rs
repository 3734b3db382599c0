//! Background job specs

use crate::prelude::*;

#[test]
fn bg_job_can_be_waited_on() {
    cli()
        .lines(&["bg 'print from the background'", "job wait 1"])
        .passes()
        .stdout_eq("[1]\nfrom the background\n");
}

#[test]
fn job_list_shows_finished_jobs() {
    cli()
        .lines(&["bg 'print x'", "job wait 1", "jobs"])
        .passes()
        .stdout_has("completed");
}

#[test]
fn killed_job_reports_on_wait() {
    cli()
        .lines(&["bg 'sleep 60000'", "job kill 1", "job wait 1"])
        .fails()
        .stdout_eq("[1]\n[1] killed\n")
        .stderr_has("job wait: killed");
}

#[test]
fn spawn_streams_process_output() {
    cli()
        .lines(&["spawn 'echo one; echo two'", "job wait 1"])
        .passes()
        .stdout_eq("[1]\none\ntwo\n");
}

#[test]
fn exit_stops_running_jobs() {
    let started = std::time::Instant::now();
    cli()
        .lines(&["bg 'sleep 60000'", "print leaving"])
        .passes()
        .stdout_eq("[1]\nleaving\n");
    assert!(started.elapsed() < std::time::Duration::from_secs(20));
}
