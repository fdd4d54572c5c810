use std::fs;
use std::path::Path;

use templatize::compiler::{compile, compile_tree};
use templatize::config::{Config, Replacement};
use templatize::constants::TEMPLATE_DIR;
use templatize::error::{Error, MarkerBlockError};
use tempfile::TempDir;

fn write<P: AsRef<Path>>(root: &Path, relative: P, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn output(root: &Path) -> std::path::PathBuf {
    root.join(TEMPLATE_DIR)
}

#[test_log::test]
fn test_package_manifest_is_templated_and_renamed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "packages/placeholder-package/package.json",
        r#"{"name": "placeholder-package", "author": "Package Author <author@example.com>"}"#,
    );

    compile(root, &Config::default()).unwrap();

    let templated = output(root).join("packages/[[ package_name ]]/package.json.jinja");
    let content = fs::read_to_string(&templated).unwrap();
    assert_eq!(
        content,
        r#"{"name": "[[ package_name ]]", "author": "[[ author_name ]] <[[ author_email ]]>"}"#
    );
    assert!(!content.contains("placeholder-package"));
    assert!(!content.contains("Package Author"));
    assert!(!output(root).join("packages/placeholder-package").exists());
    assert!(!output(root).join("packages/[[ package_name ]]/package.json").exists());
}

#[test]
fn test_stale_output_is_removed() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/index.ts", "export {};\n");
    write(&output(root), "stale.txt", "left over from an earlier run");

    compile(root, &Config::default()).unwrap();

    assert!(!output(root).join("stale.txt").exists());
    assert!(output(root).join("src/index.ts").exists());
}

#[test]
fn test_binary_files_are_copied_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    // Contains a replacement literal, which must survive untouched.
    let mut bytes = vec![0x89u8, b'P', b'N', b'G', 0xff, 0x00];
    bytes.extend_from_slice(b"placeholder-org");
    write(root, "assets/Logo.PNG", &bytes);
    write(root, "assets/icon.svg", "<svg>placeholder-org</svg>");

    compile(root, &Config::default()).unwrap();

    assert_eq!(fs::read(output(root).join("assets/Logo.PNG")).unwrap(), bytes);
    assert_eq!(
        fs::read_to_string(output(root).join("assets/icon.svg")).unwrap(),
        "<svg>placeholder-org</svg>"
    );
    assert!(!output(root).join("assets/icon.svg.jinja").exists());
}

#[test]
fn test_undecodable_text_falls_back_to_copy() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let bytes = [0xc3, 0x28, b'p', b'l', b'a', b'c', b'e'];
    write(root, "data/blob.bin", bytes);

    compile(root, &Config::default()).unwrap();

    assert_eq!(fs::read(output(root).join("data/blob.bin")).unwrap(), bytes);
}

#[test]
fn test_suffix_only_for_changed_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/plain.ts", "export const answer = 42;\n");
    write(root, "src/named.ts", "// placeholder-repo\n");
    write(root, "src/admin.ts", "a\n// ADMIN-ONLY-START\nb\n// ADMIN-ONLY-END\n");

    compile(root, &Config::default()).unwrap();

    let out = output(root);
    assert_eq!(fs::read_to_string(out.join("src/plain.ts")).unwrap(), "export const answer = 42;\n");
    assert!(!out.join("src/plain.ts.jinja").exists());
    assert_eq!(fs::read_to_string(out.join("src/named.ts.jinja")).unwrap(), "// [[ repo_name ]]\n");
    assert_eq!(fs::read_to_string(out.join("src/admin.ts.jinja")).unwrap(), "a\n");
    assert!(!out.join("src/admin.ts").exists());
}

#[test]
fn test_exclusions() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, ".git/config", "[core]\n");
    write(root, "CLAUDE.md", "notes\n");
    write(root, "attic/old.ts", "old\n");
    write(root, "node_modules/pkg/index.js", "x\n");
    write(root, "packages/placeholder-package/node_modules/dep/index.js", "x\n");
    write(root, "packages/placeholder-package/dist/index.js", "x\n");
    write(root, "docs/CLAUDE.md", "nested copies are kept\n");
    write(root, "src/attic/kept.ts", "kept\n");

    compile(root, &Config::default()).unwrap();

    let out = output(root);
    assert!(!out.join(".git").exists());
    assert!(!out.join("CLAUDE.md").exists());
    assert!(!out.join("attic").exists());
    assert!(!out.join("node_modules").exists());
    assert!(!out.join("packages/[[ package_name ]]/node_modules").exists());
    assert!(!out.join("packages/[[ package_name ]]/dist").exists());
    assert!(out.join("docs/CLAUDE.md").exists());
    assert!(out.join("src/attic/kept.ts").exists());
    // The destination itself lives under the excluded admin directory.
    assert!(!out.join("admin").exists());
}

#[test]
fn test_rename_only_under_packages() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "apps/placeholder-package/main.ts", "main\n");
    write(root, "placeholder-package/root.ts", "root\n");

    compile(root, &Config::default()).unwrap();

    assert!(output(root).join("apps/placeholder-package/main.ts").exists());
    assert!(output(root).join("placeholder-package/root.ts").exists());
}

#[test]
fn test_empty_directories_are_not_copied() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("empty/inner")).unwrap();
    write(root, "src/index.ts", "x\n");

    compile(root, &Config::default()).unwrap();

    assert!(!output(root).join("empty").exists());
}

#[test]
fn test_auxiliary_files_replace_source_versions() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "LICENSE", "Copyright the working project\n");
    write(root, "README.md", "# placeholder-repo\n");

    let summary = compile(root, &Config::default()).unwrap();

    let out = output(root);
    let license = fs::read_to_string(out.join("LICENSE")).unwrap();
    assert!(license.starts_with("TODO: Add your license here."));
    let readme = fs::read_to_string(out.join("README.md.jinja")).unwrap();
    assert!(readme.starts_with("# [[ repo_name ]]\n\n[[ package_description ]]\n"));
    assert!(!out.join("README.md").exists());
    let answers = fs::read_to_string(out.join("[[ _copier_conf.answers_file ]].jinja")).unwrap();
    assert!(answers.contains("[[ _copier_conf | to_yaml ]]"));

    assert_eq!(summary.files, 3);
    assert_eq!(summary.templated, 2);
    assert_eq!(summary.symlinks, 0);
}

#[test]
fn test_summary_counts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.ts", "placeholder-org\n");
    write(root, "b.ts", "plain\n");
    write(root, "c.png", [0u8, 1, 2]);

    let summary = compile(root, &Config::default()).unwrap();

    // Three source files plus three auxiliary files.
    assert_eq!(summary.files, 6);
    assert_eq!(summary.templated, 3);
    assert_eq!(summary.destination, Path::new(TEMPLATE_DIR));
}

#[test]
fn test_malformed_marker_block_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/broken.ts", "x\n// ADMIN-ONLY-START\ny\n");

    let result = compile(root, &Config::default());

    match result {
        Err(Error::MarkerBlockError { path, source }) => {
            assert_eq!(Path::new(&path), Path::new("src/broken.ts"));
            assert_eq!(source, MarkerBlockError::UnterminatedBlock { line: 2 });
        }
        other => panic!("Expected MarkerBlockError, got {other:?}"),
    }
}

#[test]
fn test_overlapping_literals_in_custom_config() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "README.txt", "my-package-cli wraps my-package\n");

    let mut config = Config::default();
    config.replacements = vec![
        Replacement { literal: "my-package-cli".into(), variable: "cli_name".into() },
        Replacement { literal: "my-package".into(), variable: "package_name".into() },
    ];
    config.validate().unwrap();
    compile(root, &config).unwrap();

    assert_eq!(
        fs::read_to_string(output(root).join("README.txt.jinja")).unwrap(),
        "[[ cli_name ]] wraps [[ package_name ]]\n"
    );
}

#[test]
fn test_output_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("project");
    write(&source, "packages/placeholder-package/src/index.ts", "export const name = 'placeholder-package';\n");
    write(&source, "packages/placeholder-package/logo.png", [7u8, 8, 9]);
    write(&source, "tsconfig.json", "{}\n");

    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");
    compile_tree(&source, &first, &Config::default()).unwrap();
    compile_tree(&source, &second, &Config::default()).unwrap();

    assert!(!dir_diff::is_different(&first, &second).unwrap());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "packages/placeholder-package/AGENTS.md", "agents\n");
    std::os::unix::fs::symlink("AGENTS.md", root.join("packages/placeholder-package/CLAUDE.md"))
        .unwrap();
    std::os::unix::fs::symlink("../does/not/exist", root.join("dangling")).unwrap();
    fs::create_dir_all(root.join("node_modules")).unwrap();
    std::os::unix::fs::symlink("../x", root.join("node_modules/excluded-link")).unwrap();

    let summary = compile(root, &Config::default()).unwrap();

    let out = output(root);
    let link = out.join("packages/[[ package_name ]]/CLAUDE.md");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("AGENTS.md"));
    assert_eq!(fs::read_link(out.join("dangling")).unwrap(), Path::new("../does/not/exist"));
    assert!(fs::symlink_metadata(out.join("node_modules")).is_err());
    assert_eq!(summary.symlinks, 2);
}

#[cfg(unix)]
#[test]
fn test_binary_copy_keeps_permissions_and_mtime() {
    use filetime::FileTime;
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let source = root.join("assets/run.png");
    write(root, "assets/run.png", [1u8, 2, 3]);
    fs::set_permissions(&source, fs::Permissions::from_mode(0o755)).unwrap();
    filetime::set_file_mtime(&source, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    compile(root, &Config::default()).unwrap();

    let metadata = fs::metadata(output(root).join("assets/run.png")).unwrap();
    assert_eq!(metadata.permissions().mode() & 0o777, 0o755);
    assert_eq!(FileTime::from_last_modification_time(&metadata).unix_seconds(), 1_000_000);
}

#[cfg(unix)]
#[test]
fn test_auxiliary_files_replace_colliding_symlinks() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    let outside = temp_dir.path().join("outside.md");
    fs::write(&outside, "untouched\n").unwrap();
    fs::create_dir_all(&root).unwrap();
    std::os::unix::fs::symlink(&outside, root.join("README.md.jinja")).unwrap();

    let summary = compile(&root, &Config::default()).unwrap();

    assert_eq!(fs::read_to_string(&outside).unwrap(), "untouched\n");
    let readme = output(&root).join("README.md.jinja");
    assert!(fs::symlink_metadata(&readme).unwrap().file_type().is_file());
    assert!(fs::read_to_string(&readme).unwrap().starts_with("# [[ repo_name ]]"));
    assert_eq!(summary.symlinks, 0);
}

#[test]
fn test_write_failure_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/index.ts", "x\n");

    let mut config = Config::default();
    let mut files = indexmap::IndexMap::new();
    files.insert("notes.txt".to_string(), "a file".to_string());
    files.insert("notes.txt/inner.txt".to_string(), "needs notes.txt as a directory".to_string());
    config.auxiliary_files = Some(files);

    match compile(root, &config) {
        Err(Error::FileError { path, .. }) => {
            assert_eq!(Path::new(&path), Path::new("notes.txt/inner.txt"));
        }
        other => panic!("Expected FileError, got {other:?}"),
    }
}
