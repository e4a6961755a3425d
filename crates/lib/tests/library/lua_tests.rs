//! Composition of Lua declarations.

use mlua::prelude::*;
use solgen_lib::compose::ConfigurationError;
use solgen_lib::project::{OutputKind, RuntimeLibrary, Visibility, WarningLevel};
use solgen_lib::target::Optimization;

use super::common::{compose_script, create_test_runtime, win64};

const ENGINE_WORKSPACE: &str = r#"
  local targets = {
    platforms = { "win64" },
    toolchains = { "vs2019" },
    optimizations = { "Debug", "Release", "Retail" },
  }

  local gui = solgen.project {
    name = "EngineGUI",
    source_root = "[root]/EngineGUI/src",
    targets = targets,
    configure = function(conf, target)
      conf.output = "lib"
      conf.project_path = "[root]/EngineGUI"
      conf.target_path = "[root]/EngineGUI/binaries/[target.platform]/[target.optimization]"
      conf.language_standard = "c++17"
      conf:add_include_path("[root]/extern/ultralight/include")
      conf:add_library_path("[root]/extern/ultralight/lib")
      conf:add_library("Ultralight", "UltralightCore", "WebCore", "AppCore")
    end,
  }

  local render_test = solgen.project {
    name = "RenderTest",
    source_root = "[root]/RenderTest/src",
    targets = targets,
    overrides = {
      { when = { optimization = "Retail" }, option = "warning_level=level4" },
    },
    configure = function(conf, target)
      conf.output = "exe"
      conf.project_path = "[root]/RenderTest"
      conf:add_define("GLEW_STATIC")
      conf:add_library("glew32s", "opengl32")
      conf:add_private_dependency(gui)
    end,
  }

  solgen.solution {
    name = "Engine-Workspace",
    targets = targets,
    configure = function(conf, target)
      conf:add_project(gui)
      conf:add_project(render_test)
      conf:set_startup_project(render_test)
    end,
  }
"#;

#[test]
fn engine_workspace_from_lua() -> LuaResult<()> {
  let composition = compose_script(ENGINE_WORKSPACE)?.map_err(LuaError::external)?;

  for optimization in Optimization::ALL {
    let cell = win64(optimization);

    let gui = composition.project_record("EngineGUI", &cell).unwrap();
    assert_eq!(gui.output, OutputKind::Library);
    assert_eq!(gui.source_root, "/work/engine/EngineGUI/src");
    assert_eq!(
      gui.target_path,
      format!("/work/engine/EngineGUI/binaries/win64/{optimization}")
    );
    assert_eq!(gui.library_paths, vec!["/work/engine/extern/ultralight/lib"]);
    assert_eq!(gui.libraries.len(), 4);

    let render_test = composition.project_record("RenderTest", &cell).unwrap();
    assert_eq!(render_test.output, OutputKind::Executable);
    assert_eq!(
      render_test.intermediate_path,
      format!("/work/engine/obj/win64/{optimization}")
    );
    assert_eq!(
      render_test.options.runtime_library,
      optimization.is_debug().then_some(RuntimeLibrary::MultiThreadedDebug)
    );
    assert_eq!(
      render_test.options.warning_level,
      (optimization == Optimization::Retail).then_some(WarningLevel::Level4)
    );

    let solution = composition.solution_record("Engine-Workspace", &cell).unwrap();
    assert_eq!(solution.startup_project, "RenderTest");
    assert_eq!(
      solution.edge("RenderTest", "EngineGUI").map(|e| e.visibility),
      Some(Visibility::Private)
    );
  }
  Ok(())
}

#[test]
fn multiple_startups_are_rejected() -> LuaResult<()> {
  let script = ENGINE_WORKSPACE.replace(
    "conf:set_startup_project(render_test)",
    "conf:set_startup_project(render_test)\n      conf:set_startup_project(gui)",
  );
  let err = compose_script(&script)?.unwrap_err();
  assert!(matches!(
    err.as_configuration(),
    Some(ConfigurationError::MultipleStartupProjects { projects, .. }) if projects.len() == 2
  ));
  Ok(())
}

#[test]
fn missing_startup_is_rejected() -> LuaResult<()> {
  let script = ENGINE_WORKSPACE.replace("conf:set_startup_project(render_test)", "");
  let err = compose_script(&script)?.unwrap_err();
  assert!(matches!(
    err.as_configuration(),
    Some(ConfigurationError::NoStartupProject { .. })
  ));
  Ok(())
}

#[test]
fn unknown_template_variable_in_source_root_fails_registration() -> LuaResult<()> {
  let (lua, _registry) = create_test_runtime()?;
  let err = lua
    .load(
      r#"
      solgen.project {
        name = "Broken",
        source_root = "[workspace]/src",
        targets = { platforms = { "linux" }, toolchains = { "make" } },
        configure = function() end,
      }
    "#,
    )
    .exec()
    .unwrap_err();

  assert!(err.to_string().contains("[workspace]"), "{err}");
  Ok(())
}

#[test]
fn unavailable_variable_fails_composition() -> LuaResult<()> {
  let script = ENGINE_WORKSPACE.replace(
    "conf:add_project(gui)",
    "conf.solution_path = \"[root]/[project.name]\"\n      conf:add_project(gui)",
  );
  let err = compose_script(&script)?.unwrap_err();
  assert!(err.as_template().is_some(), "{err}");
  assert!(err.to_string().contains("solution_path"), "{err}");
  Ok(())
}
