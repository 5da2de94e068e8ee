//! Names shared across the pipeline.

/// Section of `scrapy.cfg` that maps project keys to settings modules.
pub const SETTINGS_SECTION: &str = "settings";

/// Key used when no project-specific entry exists in the settings section.
pub const DEFAULT_SETTINGS_KEY: &str = "default";

/// Build descriptor consumed by setuptools.
pub const SETUP_PY: &str = "setup.py";

/// Prefix of per-build temporary workspaces.
pub const WORKSPACE_PREFIX: &str = "eggpack-deploy-";

/// File extension of the built archive.
pub const ARCHIVE_EXTENSION: &str = "egg";

/// Interpreter used when neither `--python` nor `EGGPACK_PYTHON` is set.
pub const DEFAULT_PYTHON: &str = "python3";

/// Environment variable overriding the interpreter.
pub const PYTHON_ENV: &str = "EGGPACK_PYTHON";
