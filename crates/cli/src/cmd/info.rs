use anyhow::Result;
use serde::Serialize;

use solgen_lib::target::{Optimization, Platform, Toolchain};
use solgen_lib::template::Variable;

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Debug, Serialize)]
struct Info {
  version: &'static str,
  host: Option<&'static str>,
  platforms: Vec<&'static str>,
  toolchains: Vec<&'static str>,
  optimizations: Vec<&'static str>,
  variables: Vec<&'static str>,
}

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let info = Info {
    version: env!("CARGO_PKG_VERSION"),
    host: Platform::host().map(|p| p.as_str()),
    platforms: Platform::ALL.iter().map(|p| p.as_str()).collect(),
    toolchains: Toolchain::ALL.iter().map(|t| t.as_str()).collect(),
    optimizations: Optimization::ALL.iter().map(|o| o.as_str()).collect(),
    variables: Variable::ALL.iter().map(|v| v.name()).collect(),
  };

  if output.is_json() {
    return print_json(&info);
  }

  println!("solgen {}", info.version);
  match info.host {
    Some(host) => print_stat("Platform", host),
    None => print_stat("Platform", "unknown"),
  }
  print_stat("Platforms", &info.platforms.join(", "));
  print_stat("Toolchains", &info.toolchains.join(", "));
  print_stat("Optimizations", &info.optimizations.join(", "));
  println!();
  println!("Template variables:");
  for variable in &info.variables {
    println!("  [{}]", variable);
  }

  Ok(())
}
