//! Render-loop demo for the Remix bridge
//!
//! Draws a single triangle lit by a sphere light until the window closes.
//! An optional argument names a `.toml` or `.ron` bridge configuration.

mod window;

use std::time::Instant;

use nalgebra::Vector3;
use remix_bridge::prelude::*;

use window::Window;

const MATERIAL_HASH: u64 = 0x1;
const MESH_HASH: u64 = 0x2;
const LIGHT_HASH: u64 = 0x3;

fn triangle() -> Surface {
    let normal = [0.0, 0.0, -1.0];
    Surface::new(
        vec![
            Vertex::new([5.0, -5.0, 10.0], normal, [0.0, 0.0], Vertex::WHITE),
            Vertex::new([0.0, 5.0, 10.0], normal, [0.5, 1.0], Vertex::WHITE),
            Vertex::new([-5.0, -5.0, 10.0], normal, [1.0, 0.0], Vertex::WHITE),
        ],
        vec![0, 1, 2],
    )
}

fn load_config() -> Result<BridgeConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading bridge configuration from {path}");
            Ok(BridgeConfig::load_from_file(path)?)
        }
        None => Ok(BridgeConfig::default()),
    }
}

struct Scene {
    material: MaterialHandle,
    mesh: MeshHandle,
    light: LightHandle,
}

impl Scene {
    fn create(bridge: &mut RemixBridge) -> BridgeResult<Self> {
        let material = bridge.create_material(&MaterialDesc::opaque(
            MATERIAL_HASH,
            OpaqueParams {
                albedo_constant: Vec3::new(0.8, 0.2, 0.2),
                roughness_constant: 0.4,
                ..OpaqueParams::default()
            },
        ))?;

        let mesh = bridge.create_mesh(&MeshDesc::new(MESH_HASH).with_surface(triangle().with_material(material)))?;

        let light = bridge.create_light(&LightDesc::sphere(
            LIGHT_HASH,
            Vec3::new(100.0, 200.0, 100.0),
            Vec3::new(0.0, -1.0, 0.0),
        ))?;

        Ok(Self { material, mesh, light })
    }

    fn destroy(self, bridge: &mut RemixBridge) -> BridgeResult<()> {
        bridge.destroy_light(self.light)?;
        bridge.destroy_mesh(self.mesh)?;
        bridge.destroy_material(self.material)
    }
}

fn run(window: &mut Window, bridge: &mut RemixBridge) -> BridgeResult<()> {
    let scene = Scene::create(bridge)?;
    let start = Instant::now();
    let mut frames: u64 = 0;

    while !window.should_close() {
        window.poll_events();

        let sway = start.elapsed().as_secs_f32().sin() * 2.0;
        let camera = ParameterizedCamera::looking_along(
            Vector3::new(sway, 0.0, 0.0),
            Vector3::z(),
            Vector3::y(),
            75.0,
            window.aspect(),
        );
        bridge.setup_camera(&Camera::parameterized(camera))?;
        bridge.draw_instance(&InstanceSubmission::new(scene.mesh))?;
        bridge.draw_light_instance(scene.light)?;
        bridge.present(None)?;
        frames += 1;
    }

    log::info!(
        "Rendered {frames} frames in {:.1}s",
        start.elapsed().as_secs_f32()
    );
    scene.destroy(bridge)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Remix bridge demo");

    let config = load_config()?;
    let startup = config.startup.clone();
    let mut window = Window::new("Remix Bridge Demo", 1600, 900)?;
    let mut bridge = RemixBridge::new(config);

    bridge.init(&StartupParams::from_config(window.native(), &startup))?;

    let result = run(&mut window, &mut bridge);
    if let Err(e) = &result {
        log::error!("Render loop failed: {e}");
    }

    bridge.destroy()?;
    log::info!("Demo finished");
    Ok(result?)
}
