//! Common constants used throughout templatize.

/// Directory holding the tool's configuration and output, relative to the anchor.
pub const ADMIN_DIR: &str = "admin";

/// Destination of the compiled template, relative to the anchor.
pub const TEMPLATE_DIR: &str = "admin/template";

/// Supported configuration file names, looked up inside [`ADMIN_DIR`].
pub const CONFIG_FILES: [&str; 3] = ["templatize.json", "templatize.yml", "templatize.yaml"];

pub const DEFAULT_VARIABLE_START: &str = "[[";
pub const DEFAULT_VARIABLE_END: &str = "]]";

/// Suffix appended to files whose content was changed.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".jinja";

pub const DEFAULT_BLOCK_START: &str = "ADMIN-ONLY-START";
pub const DEFAULT_BLOCK_END: &str = "ADMIN-ONLY-END";

/// Working value -> variable name, longest first.
pub const DEFAULT_REPLACEMENTS: [(&str, &str); 7] = [
    ("A modern TypeScript package", "package_description"),
    ("author@example.com", "author_email"),
    ("Package Author", "author_name"),
    ("placeholder-workspace", "workspace_name"),
    ("placeholder-package", "package_name"),
    ("placeholder-repo", "repo_name"),
    ("placeholder-org", "github_org"),
];

/// (parent, name, variable)
pub const DEFAULT_DIRECTORY_RENAMES: [(&str, &str, &str); 1] =
    [("packages", "placeholder-package", "package_name")];

pub const DEFAULT_EXCLUDED_ROOT_PATHS: [&str; 13] = [
    "admin",
    "copier.yml",
    "README.md",
    "LICENSE",
    "CLAUDE.md",
    "AGENTS.md",
    ".claude",
    ".tbd",
    ".tbd-sync",
    "attic",
    "pnpm-lock.yaml",
    ".git",
    ".gitattributes",
];

/// Directory names skipped at any depth (build artifacts, dependencies).
pub const DEFAULT_EXCLUDED_DIR_NAMES: [&str; 2] = ["node_modules", "dist"];

pub const DEFAULT_BINARY_EXTENSIONS: [&str; 20] = [
    "png", "jpg", "jpeg", "gif", "ico", "webp", "svg", "woff", "woff2", "ttf", "eot", "zip",
    "tar", "gz", "bz2", "pdf", "exe", "dll", "so", "dylib",
];
