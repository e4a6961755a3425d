//! Crate-wide constants.

/// Application name, used for the Lua global and default file names.
pub const APP_NAME: &str = "solgen";

/// Default declaration file evaluated by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "solgen.lua";

/// Environment variable overriding the `[root]` template variable.
pub const ROOT_ENV_VAR: &str = "SOLGEN_ROOT";

/// Length of the truncated composition hash.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Metatable `__type` marker of project references returned to Lua.
pub const PROJECT_REF_TYPE: &str = "project_ref";

/// File suffix of emitted project descriptions.
pub const PROJECT_FILE_SUFFIX: &str = ".project.json";

/// File suffix of emitted solution descriptions.
pub const SOLUTION_FILE_SUFFIX: &str = ".solution.json";
