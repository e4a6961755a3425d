mod generate;
mod info;
mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use solgen_lib::eval::{EvalOptions, evaluate_config};
use solgen_lib::manifest::Composition;

pub use generate::cmd_generate;
pub use info::cmd_info;
pub use plan::cmd_plan;

/// Evaluate and compose a declaration file.
fn compose_file(file: &Path, root: Option<PathBuf>, solutions: Vec<String>) -> Result<Composition> {
  let options = EvalOptions { root, solutions };
  evaluate_config(file, &options).with_context(|| format!("Failed to compose {}", file.display()))
}
