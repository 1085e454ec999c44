//! Sequencing contracts of the stage: assembly before the loop, patches
//! only after their load resolves, fatal assembly errors.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use instant::Duration;
use diorama::scene::Scene;
use diorama::scene::node::{Select, Shape};
use diorama::scene::patch::ScenePatch;
use diorama::scenes::PhysicalMaterials;
use diorama::stage::{Out, SceneBuilder, StageSettings, run_headless};

mod common;
use common::test_utils::TempAssets;

/// Records the order of its lifecycle hooks into a shared log.
struct Probe {
    log: Arc<Mutex<Vec<&'static str>>>,
    node_counts: Arc<Mutex<Vec<usize>>>,
}

impl SceneBuilder for Probe {
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out> {
        scene.spawn("marker", Shape::Cube { size: 1.0 });
        self.log.lock().unwrap().push("assemble");
        Ok(Out::Empty)
    }

    fn on_frame(&mut self, scene: &mut Scene, _dt: Duration) -> Out {
        self.log.lock().unwrap().push("frame");
        self.node_counts.lock().unwrap().push(scene.node_count());
        Out::Empty
    }
}

#[test]
fn frames_tick_only_after_assembly_returned() {
    let assets = TempAssets::new("ordering");
    let log = Arc::new(Mutex::new(Vec::new()));
    let node_counts = Arc::new(Mutex::new(Vec::new()));
    let probe = Probe {
        log: Arc::clone(&log),
        node_counts: Arc::clone(&node_counts),
    };

    let settings = StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    };
    run_headless(vec![Box::new(probe)], settings, 5).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0], "assemble");
    assert_eq!(log.len(), 6, "one assembly plus five frames: {log:?}");
    assert!(log[1..].iter().all(|entry| *entry == "frame"));

    // Every frame saw the node assembly created.
    assert!(node_counts.lock().unwrap().iter().all(|count| *count == 1));
}

#[test]
fn assembly_errors_abort_the_stage() {
    struct Failing;
    impl SceneBuilder for Failing {
        fn assemble(&mut self, _scene: &mut Scene) -> anyhow::Result<Out> {
            anyhow::bail!("no environment for you")
        }
    }

    let assets = TempAssets::new("fatal");
    let settings = StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    };
    let error = run_headless(vec![Box::new(Failing)], settings, 3).unwrap_err();
    assert!(error.to_string().contains("no environment"));
}

#[test]
fn missing_environment_is_fatal_for_scenes_that_need_one() {
    // No sky.env written into this root.
    let assets = TempAssets::new("no-sky");
    let settings = StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    };
    assert!(run_headless(vec![Box::new(PhysicalMaterials)], settings, 1).is_err());
}

/// A builder whose continuation asserts the load-then-configure contract:
/// the patch is built only from a resolved, non-empty import stand-in.
struct DeferredSpawn {
    saw_nodes: Arc<Mutex<Option<usize>>>,
}

impl SceneBuilder for DeferredSpawn {
    fn assemble(&mut self, _scene: &mut Scene) -> anyhow::Result<Out> {
        let saw_nodes = Arc::clone(&self.saw_nodes);
        let patch = async move {
            // Stand-in for an import resolving off the loop.
            tokio::time::sleep(Duration::from_millis(5)).await;
            let loaded = vec!["wall_left", "wall_right"];
            anyhow::ensure!(!loaded.is_empty(), "configuration ran before the load");
            *saw_nodes.lock().unwrap() = Some(loaded.len());

            let mut patch = ScenePatch::new();
            for name in loaded {
                patch.spawn(
                    name,
                    Shape::Cube { size: 1.0 },
                    cgmath::Vector3::new(0.0, 0.0, 0.0),
                    None,
                );
            }
            patch.receive_shadows(Select::prefix("wall"), true);
            Ok(patch)
        }
        .boxed();
        Ok(Out::Patches(vec![patch]))
    }
}

#[test]
fn configuration_runs_strictly_after_resolution() {
    let assets = TempAssets::new("deferred");
    let saw_nodes = Arc::new(Mutex::new(None));
    let builder = DeferredSpawn {
        saw_nodes: Arc::clone(&saw_nodes),
    };

    let settings = StageSettings {
        assets: assets.root(),
        ..StageSettings::default()
    };
    let scene = run_headless(vec![Box::new(builder)], settings, 2).unwrap();

    // The continuation observed the resolved node list, and its whole patch
    // landed: nodes exist and carry the flag set by the later op.
    assert_eq!(*saw_nodes.lock().unwrap(), Some(2));
    let walls = scene.select(&Select::prefix("wall"));
    assert_eq!(walls.len(), 2);
    for id in walls {
        assert!(scene.node(id).unwrap().receives_shadows);
    }
}
