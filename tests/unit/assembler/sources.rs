use super::*;

#[test]
fn builtin_sources_include_skeleton_and_every_family() {
    let store = MemorySources::builtin();
    let names = store.list().unwrap();
    for expected in [
        "fragment.glsl",
        "vertex.glsl",
        "common.glsl",
        "fractal/scalar.glsl",
        "warp/swirl.glsl",
        "blend/replace.glsl",
        "color/grayscale.glsl",
        "noise/perlin_3d.glsl",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn missing_fragment_names_the_identifier() {
    let err = MemorySources::builtin().load("warp/nope.glsl").unwrap_err();
    assert!(matches!(err, PlasmaError::Assembly(_)));
    assert!(err.to_string().contains("warp/nope.glsl"));
}

#[test]
fn insert_overrides_builtin() {
    let mut store = MemorySources::builtin();
    let before = store.len();
    store.insert("common.glsl", "// patched\n");
    assert_eq!(store.len(), before);
    assert_eq!(store.load("common.glsl").unwrap(), "// patched\n");
}

#[test]
fn dir_sources_list_nested_glsl_files() {
    let root = std::env::temp_dir().join(format!("plasma_sources_{}", std::process::id()));
    std::fs::create_dir_all(root.join("warp")).unwrap();
    std::fs::write(root.join("main.glsl"), "void main() {}\n").unwrap();
    std::fs::write(root.join("warp/wobble.glsl"), "// wobble\n").unwrap();
    std::fs::write(root.join("README.md"), "skip").unwrap();

    let dir = DirSources::new(&root);
    assert_eq!(dir.list().unwrap(), vec!["main.glsl", "warp/wobble.glsl"]);
    assert_eq!(dir.load("warp/wobble.glsl").unwrap(), "// wobble\n");
    assert!(dir.load("warp/missing.glsl").is_err());
    assert!(dir.load("../etc/passwd").is_err());

    let mem = MemorySources::from_dir(&root).unwrap();
    assert_eq!(mem.len(), 2);

    std::fs::remove_dir_all(&root).unwrap();
}
