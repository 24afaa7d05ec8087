//! Hierarchy demo application
//!
//! Builds a small solar-system style hierarchy (sun -> planet -> moon),
//! drives the transform system for a few frames, and logs the resulting
//! world positions as the sun drifts and the planet orbits.

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

const FRAME_COUNT: u32 = 120;
const FRAME_DT: f32 = 1.0 / 60.0;
const SUN_DRIFT_PER_FRAME: f32 = 0.01;
const PLANET_SPIN_PER_FRAME: f32 = 0.05;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut scene = Scene::new();
    scene.add_system(Box::new(TransformSystem::new()));

    let root = scene.root();
    let sun = scene.new_entity(root, "sun")?;
    let planet = scene.new_entity(sun, "planet")?;
    let moon = scene.new_entity(planet, "moon")?;

    scene.add_component(sun, Transform::identity())?;
    scene.add_component(planet, Transform::from_position(Vec3::new(4.0, 0.0, 0.0)))?;
    scene.add_component(moon, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))?;

    for frame in 0..FRAME_COUNT {
        scene
            .component_mut::<Transform>(sun)?
            .translate(Vec3::new(SUN_DRIFT_PER_FRAME, 0.0, 0.0));
        scene
            .component_mut::<Transform>(planet)?
            .rotate(Vec3::new(0.0, PLANET_SPIN_PER_FRAME, 0.0));

        scene.update(FRAME_DT);

        if frame % 30 == 0 {
            let moon_position = scene.component::<Transform>(moon)?.world_position();
            log::info!(
                "frame {frame:3}: moon at ({:+.2}, {:+.2}, {:+.2})",
                moon_position.x,
                moon_position.y,
                moon_position.z
            );
        }
    }

    let stats = scene.stats();
    log::info!(
        "done: {} entities, {} components, {:.0} fps avg, last frame {:.2}ms ({} systems)",
        stats.entity_count,
        stats.component_count,
        stats.fps,
        stats.frame_time_ms,
        stats.system_count
    );
    Ok(())
}
