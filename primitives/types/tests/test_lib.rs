use types::*;

#[test]
fn test_run_result_success_and_combined() {
    let ok = RunResult::new("out\n", "err\n", 0);
    assert!(ok.success());
    assert_eq!(ok.combined(), "out\nerr\n");

    let failed = RunResult::new("", "boom", 2);
    assert!(!failed.success());
    assert_eq!(failed.combined(), "boom");
}

#[test]
fn test_generated_file_keeps_kind() {
    let file = GeneratedFile::new("out/user_pb2.pyi", FileKind::Stub);
    assert_eq!(file.kind, FileKind::Stub);
    assert_eq!(file.kind.extension(), "pyi");
    assert_eq!(FileKind::Primary.to_string(), "primary");
}

#[test]
fn test_targets_are_visited_go_first() {
    assert_eq!(Target::ALL, [Target::Go, Target::Python]);
    assert_eq!(Target::Python.display_name(), "Python");
}
