use std::fs;
use std::path::Path;

use protobridge_path::{find_files_with_extension, DiscoveryError, SourceDiscovery};

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("create parent dirs");
    fs::write(path, "syntax = \"proto3\";\n").expect("write file");
}

fn rel(path: &str) -> String { Path::new(".").join(path).to_string_lossy().into_owned() }

#[test]
fn test_discovery_skips_excluded_subtree() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    touch(&root.join("astral_proto/users/user.proto"));
    touch(&root.join("astral_proto/orders/order.proto"));
    touch(&root.join("astral_proto/google/protobuf/empty.proto"));
    touch(&root.join("astral_proto/google/api/http.proto"));
    touch(&root.join("astral_proto/README.md"));

    let mut found: Vec<String> = SourceDiscovery::new(root, root.join("astral_proto"))
        .exclude(Some("google"))
        .discover()
        .expect("discovery succeeds")
        .into_iter()
        .map(|f| f.relative)
        .collect();
    found.sort();

    assert_eq!(
        found,
        vec![rel("astral_proto/orders/order.proto"), rel("astral_proto/users/user.proto")]
    );
}

#[test]
fn test_discovery_without_exclusion_returns_everything() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    touch(&root.join("schemas/a.proto"));
    touch(&root.join("schemas/google/b.proto"));

    let found = SourceDiscovery::new(root, root.join("schemas"))
        .exclude(None)
        .discover()
        .expect("discovery succeeds");
    assert_eq!(found.len(), 2);

    // An empty marker would match every path; it is treated as "no exclusion".
    let found = SourceDiscovery::new(root, root.join("schemas"))
        .exclude(Some(""))
        .discover()
        .expect("discovery succeeds");
    assert_eq!(found.len(), 2);
}

#[test]
fn test_discovery_only_matches_exact_extension() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    touch(&root.join("schemas/a.proto"));
    touch(&root.join("schemas/a.proto.bak"));
    touch(&root.join("schemas/aproto"));

    let found = SourceDiscovery::new(root, root.join("schemas")).discover().expect("discovery");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].relative, rel("schemas/a.proto"));
    assert_eq!(found[0].path, root.join("schemas/a.proto"));
}

#[test]
fn test_missing_source_root_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let result = SourceDiscovery::new(temp.path(), temp.path().join("nope")).discover();
    assert!(matches!(result, Err(DiscoveryError::MissingRoot(_))));
}

#[test]
fn test_find_files_distinguishes_py_and_pyi() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    touch(&root.join("out/pkg/a_pb2.py"));
    touch(&root.join("out/pkg/a_pb2.pyi"));
    touch(&root.join("out/pkg/sub/b_pb2.py"));

    let py = find_files_with_extension(&root.join("out"), "py").expect("walk");
    let pyi = find_files_with_extension(&root.join("out"), "pyi").expect("walk");
    assert_eq!(py.len(), 2);
    assert_eq!(pyi, vec![root.join("out/pkg/a_pb2.pyi")]);
}
