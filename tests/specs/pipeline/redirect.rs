//! Output redirection specs

use crate::prelude::*;

#[test]
fn redirect_writes_the_file() {
    let project = Project::empty();
    project
        .sk()
        .lines(&["print saved > out.txt"])
        .passes()
        .stdout_eq("saved\n");
    assert_eq!(project.read("out.txt"), "saved\n");
}

#[test]
fn append_keeps_existing_content() {
    let project = Project::empty();
    project.file("log.txt", "first\n");
    project
        .sk()
        .lines(&["print second >> log.txt", "print third >> log.txt"])
        .passes();
    assert_eq!(project.read("log.txt"), "first\nsecond\nthird\n");
}

#[test]
fn truncate_replaces_existing_content() {
    let project = Project::empty();
    project.file("out.txt", "old\nlines\n");
    project.sk().lines(&["print new > out.txt"]).passes();
    assert_eq!(project.read("out.txt"), "new\n");
}

#[test]
fn unwritable_target_fails() {
    let project = Project::empty();
    project
        .sk()
        .lines(&["print x > no/such/dir/out.txt"])
        .fails()
        .stderr_has("cannot write");
}
