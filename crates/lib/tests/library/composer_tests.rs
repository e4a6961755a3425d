//! Composition through the Rust API.

use std::collections::BTreeSet;

use solgen_lib::compose::{ComposeSettings, ConfigurationError, compose};
use solgen_lib::emit::{Layout, render};
use solgen_lib::project::{
  CompilerOption, Dependency, OptionOverride, OutputKind, ProjectDef, RuntimeLibrary, Visibility, WarningLevel,
};
use solgen_lib::registry::Registry;
use solgen_lib::solution::SolutionDef;
use solgen_lib::target::{Optimization, Platform, TargetFilter, TargetSet, Toolchain};
use solgen_lib::util::hash::Hashable;

use super::common::{ROOT, win64};

fn matrix() -> TargetSet {
  TargetSet::single(Platform::Win64, Toolchain::Vs2019, Optimization::ALL).unwrap()
}

/// EngineGUI (static library over Ultralight) and RenderTest (executable
/// linking EngineGUI), composed into one workspace solution.
fn engine_workspace() -> Registry {
  let mut registry = Registry::new();

  registry
    .register_project(
      ProjectDef::new("EngineGUI", "[root]/EngineGUI/src", matrix(), |config, _| {
        config
          .set_output(OutputKind::Library)
          .set_project_path("[root]/EngineGUI")
          .set_target_path("[root]/EngineGUI/binaries/[target.platform]/[target.optimization]")
          .set_intermediate_path("[root]/EngineGUI/intermediate/[target.platform]/[target.optimization]")
          .add_include_path("[root]/EngineGUI/src")
          .add_include_path("[root]/extern/ultralight/include")
          .add_library_path("[root]/extern/ultralight/lib")
          .add_libraries(["Ultralight", "UltralightCore", "WebCore", "AppCore"]);
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();

  registry
    .register_project(
      ProjectDef::new("RenderTest", "[root]/RenderTest/src", matrix(), |config, _| {
        config
          .set_output(OutputKind::Executable)
          .set_project_path("[root]/RenderTest")
          .set_target_path("[root]/RenderTest/binaries/[target.platform]/[target.optimization]")
          .add_include_path("[root]/RenderTest/src")
          .add_include_path("[root]/EngineGUI/src")
          .add_library_path("[root]/extern/glew/lib")
          .add_libraries(["glew32s", "opengl32"])
          .add_define("GLEW_STATIC")
          .add_private_dependency("EngineGUI");
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();

  registry
    .register_solution(SolutionDef::new("Engine-Workspace", matrix(), |config, _| {
      config
        .add_project("EngineGUI")
        .add_project("RenderTest")
        .set_startup_project("RenderTest");
      Ok(())
    }))
    .unwrap();

  registry
}

#[test]
fn engine_workspace_resolves_every_cell() {
  let composition = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();

  assert_eq!(composition.record_count(), 6);

  for optimization in Optimization::ALL {
    let cell = win64(optimization);
    let gui = composition.project_record("EngineGUI", &cell).unwrap();
    assert_eq!(
      gui.target_path,
      format!("/work/engine/EngineGUI/binaries/win64/{optimization}")
    );
    assert_eq!(gui.output, OutputKind::Library);
    assert!(gui.libraries.contains("UltralightCore"));

    let render_test = composition.project_record("RenderTest", &cell).unwrap();
    assert!(render_test.defines.contains("GLEW_STATIC"));
    assert!(render_test.depends_on("EngineGUI"));

    let solution = composition.solution_record("Engine-Workspace", &cell).unwrap();
    assert_eq!(solution.startup_project, "RenderTest");
    assert_eq!(
      solution.edge("RenderTest", "EngineGUI").map(|e| e.visibility),
      Some(Visibility::Private)
    );
  }
}

#[test]
fn output_path_carries_exactly_its_optimization() {
  let composition = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();

  for optimization in Optimization::ALL {
    let path = &composition
      .project_record("RenderTest", &win64(optimization))
      .unwrap()
      .target_path;
    for other in Optimization::ALL {
      assert_eq!(path.contains(other.as_str()), other == optimization, "{path}");
    }
  }
}

#[test]
fn debug_runtime_only_in_debug() {
  let composition = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();

  for optimization in Optimization::ALL {
    let runtime = composition
      .project_record("EngineGUI", &win64(optimization))
      .unwrap()
      .options
      .runtime_library;
    let expected = optimization.is_debug().then_some(RuntimeLibrary::MultiThreadedDebug);
    assert_eq!(runtime, expected);
  }
}

#[test]
fn settings_override_applies_per_axis() {
  let settings = ComposeSettings::new(ROOT).with_override(OptionOverride::new(
    TargetFilter::optimization(Optimization::Retail),
    CompilerOption::WarningLevel(WarningLevel::All),
  ));
  let composition = compose(&engine_workspace(), &settings).unwrap();

  let retail = composition.project_record("EngineGUI", &win64(Optimization::Retail)).unwrap();
  assert_eq!(retail.options.warning_level, Some(WarningLevel::All));
  let release = composition.project_record("EngineGUI", &win64(Optimization::Release)).unwrap();
  assert_eq!(release.options.warning_level, None);
}

#[test]
fn dependency_declared_for_one_cell_stays_in_that_cell() {
  let mut registry = Registry::new();
  registry
    .register_project(ProjectDef::new("Profiler", "[root]", matrix(), |_, _| Ok(())).unwrap())
    .unwrap();
  registry
    .register_project(
      ProjectDef::new("Game", "[root]", matrix(), |config, target| {
        if target.optimization == Optimization::Release {
          config.add_private_dependency("Profiler");
        }
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_solution(SolutionDef::new("Game", matrix(), |config, _| {
      config.add_project("Game").set_startup_project("Game");
      Ok(())
    }))
    .unwrap();

  let composition = compose(&registry, &ComposeSettings::new(ROOT)).unwrap();

  for optimization in Optimization::ALL {
    let cell = win64(optimization);
    let game = composition.project_record("Game", &cell).unwrap();
    let solution = composition.solution_record("Game", &cell).unwrap();
    let expected = optimization == Optimization::Release;
    assert_eq!(game.depends_on("Profiler"), expected, "{cell}");
    assert_eq!(solution.projects.contains("Profiler"), expected, "{cell}");
    assert_eq!(solution.edge("Game", "Profiler").is_some(), expected, "{cell}");
  }

  let profiler = &composition.projects["Profiler"];
  assert_eq!(
    profiler.configurations.keys().collect::<Vec<_>>(),
    vec!["win64-vs2019-Release"]
  );
}

#[test]
fn dependency_bound_to_another_cell_keeps_its_target() {
  let debug = win64(Optimization::Debug);
  let release = win64(Optimization::Release);

  let mut registry = Registry::new();
  registry
    .register_project(
      ProjectDef::new("Lib", "[root]", matrix(), |config, _| {
        config.set_output(OutputKind::Library);
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_project(
      ProjectDef::new("App", "[root]", matrix(), move |config, target| {
        if target.optimization == Optimization::Debug {
          config
            .add_dependency(Dependency::public("Lib"))
            .add_dependency(Dependency::private("Lib").on_target(release));
        }
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_solution(SolutionDef::new("Main", matrix(), |config, _| {
      config.add_project("Lib").add_project("App").set_startup_project("App");
      Ok(())
    }))
    .unwrap();

  let composition = compose(&registry, &ComposeSettings::new(ROOT)).unwrap();
  let solution = composition.solution_record("Main", &debug).unwrap();

  assert_eq!(solution.build_order, vec!["Lib", "App"]);
  assert_eq!(solution.dependencies.len(), 2);

  let local = solution.edge("App", "Lib").unwrap();
  assert_eq!(local.to_target, debug);
  assert_eq!(local.visibility, Visibility::Public);

  let bound = solution.edge_to("App", "Lib", &release).unwrap();
  assert_eq!(bound.from_target, debug);
  assert_eq!(bound.visibility, Visibility::Private);

  let json = serde_json::to_value(solution).unwrap();
  let targets: Vec<&str> = json["dependencies"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["to_target"]["optimization"].as_str().unwrap())
    .collect();
  assert_eq!(targets, vec!["Debug", "Release"]);

  let release_solution = composition.solution_record("Main", &release).unwrap();
  assert!(release_solution.dependencies.is_empty());
}

#[test]
fn public_dependencies_are_reexported() {
  let mut registry = Registry::new();
  registry
    .register_project(ProjectDef::new("Core", "[root]", matrix(), |_, _| Ok(())).unwrap())
    .unwrap();
  registry
    .register_project(ProjectDef::new("Math", "[root]", matrix(), |_, _| Ok(())).unwrap())
    .unwrap();
  registry
    .register_project(
      ProjectDef::new("Render", "[root]", matrix(), |config, _| {
        config.add_public_dependency("Core").add_private_dependency("Math");
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_project(
      ProjectDef::new("App", "[root]", matrix(), |config, _| {
        config.add_private_dependency("Render");
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_solution(SolutionDef::new("Main", matrix(), |config, _| {
      config.add_project("App").set_startup_project("App");
      Ok(())
    }))
    .unwrap();

  let composition = compose(&registry, &ComposeSettings::new(ROOT)).unwrap();
  let app = composition.project_record("App", &win64(Optimization::Debug)).unwrap();

  assert_eq!(
    app.visible_dependencies,
    BTreeSet::from(["Core".to_string(), "Render".to_string()])
  );

  let solution = composition.solution_record("Main", &win64(Optimization::Debug)).unwrap();
  assert_eq!(solution.projects.len(), 4);
}

#[test]
fn cycles_are_rejected_naming_members() {
  let mut registry = Registry::new();
  for (name, dep) in [("A", "B"), ("B", "C"), ("C", "A")] {
    registry
      .register_project(
        ProjectDef::new(name, "[root]", matrix(), move |config, _| {
          config.add_dependency(Dependency::public(dep));
          Ok(())
        })
        .unwrap(),
      )
      .unwrap();
  }
  registry
    .register_solution(SolutionDef::new("Loop", matrix(), |config, _| {
      config.add_project("A").set_startup_project("A");
      Ok(())
    }))
    .unwrap();

  let err = compose(&registry, &ComposeSettings::new(ROOT)).unwrap_err();
  match err.as_configuration() {
    Some(ConfigurationError::DependencyCycle { projects, .. }) => {
      assert_eq!(projects, &vec!["A".to_string(), "B".to_string(), "C".to_string()]);
    }
    other => panic!("expected a dependency cycle, got {other:?}"),
  }
}

#[test]
fn unknown_dependency_is_rejected() {
  let mut registry = Registry::new();
  registry
    .register_project(
      ProjectDef::new("App", "[root]", matrix(), |config, _| {
        config.add_private_dependency("Missing");
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_solution(SolutionDef::new("Main", matrix(), |config, _| {
      config.add_project("App").set_startup_project("App");
      Ok(())
    }))
    .unwrap();

  let err = compose(&registry, &ComposeSettings::new(ROOT)).unwrap_err();
  assert!(matches!(
    err.as_configuration(),
    Some(ConfigurationError::UnknownProject { project, .. }) if project == "Missing"
  ));
}

#[test]
fn unsupported_dependency_cell_is_rejected() {
  let mut registry = Registry::new();
  let debug_only = TargetSet::single(Platform::Win64, Toolchain::Vs2019, [Optimization::Debug]).unwrap();
  registry
    .register_project(ProjectDef::new("DebugTools", "[root]", debug_only, |_, _| Ok(())).unwrap())
    .unwrap();
  registry
    .register_project(
      ProjectDef::new("App", "[root]", matrix(), |config, _| {
        config.add_private_dependency("DebugTools");
        Ok(())
      })
      .unwrap(),
    )
    .unwrap();
  registry
    .register_solution(SolutionDef::new("Main", matrix(), |config, _| {
      config.add_project("App").set_startup_project("App");
      Ok(())
    }))
    .unwrap();

  let err = compose(&registry, &ComposeSettings::new(ROOT)).unwrap_err();
  assert!(matches!(
    err.as_configuration(),
    Some(ConfigurationError::UnsupportedTarget { project, target, .. })
      if project == "DebugTools" && target.optimization == Optimization::Release
  ));
}

#[test]
fn composition_is_deterministic() {
  let first = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();
  let second = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();

  assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
  assert_eq!(
    render(&first, &Layout::RecordPaths).unwrap(),
    render(&second, &Layout::RecordPaths).unwrap()
  );
}

#[test]
fn artifacts_land_next_to_resolved_paths() {
  let composition = compose(&engine_workspace(), &ComposeSettings::new(ROOT)).unwrap();
  let artifacts = render(&composition, &Layout::RecordPaths).unwrap();

  let paths: Vec<String> = artifacts
    .iter()
    .map(|a| a.path.to_string_lossy().replace('\\', "/"))
    .collect();
  assert_eq!(
    paths,
    vec![
      "/work/engine/Engine-Workspace.solution.json",
      "/work/engine/EngineGUI/EngineGUI.project.json",
      "/work/engine/RenderTest/RenderTest.project.json",
    ]
  );
}
