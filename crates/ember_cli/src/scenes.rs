//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use ember_math::AffineTransform;
use ember_renderer::{
    Background, BvhNode, Camera, CheckerTexture, Color, Dielectric, DiffuseLight, Hittable,
    HittableList, ImageTexture, Lambertian, Material, Metal, Quad, Sphere, Texture, Transform,
    Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::settings::{RenderSettings, SceneKind};

/// A world ready to render, with the view and environment it was made for.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub background: Background,
}

/// Build the selected scene and apply the camera and background overrides.
pub fn build(settings: &RenderSettings) -> Scene {
    let mut scene = match settings.scene {
        SceneKind::Spheres => random_spheres(settings.seed),
        SceneKind::Cornell => cornell_box(),
        SceneKind::Checker => checkered_spheres(),
        SceneKind::Earth => earth(settings.texture.as_deref()),
    };

    let mut camera = scene
        .camera
        .clone()
        .with_resolution(settings.width, settings.height);
    if settings.look_from.is_some() || settings.look_at.is_some() {
        let (look_from, look_at) = camera.position();
        camera = camera.with_position(
            settings.look_from.map_or(look_from, Vec3::from),
            settings.look_at.map_or(look_at, Vec3::from),
            Vec3::Y,
        );
    }
    if settings.vfov.is_some() || settings.defocus_angle.is_some() || settings.focus_dist.is_some()
    {
        let (vfov, defocus_angle, focus_dist) = camera.lens();
        camera = camera.with_lens(
            settings.vfov.unwrap_or(vfov),
            settings.defocus_angle.unwrap_or(defocus_angle),
            settings.focus_dist.unwrap_or(focus_dist),
        );
    }
    camera.initialize();
    scene.camera = camera;

    if let Some(background) = settings.background {
        scene.background = background.into();
    }

    log::info!(
        "Built {:?} scene, bounds {:?} to {:?}",
        settings.scene,
        scene.world.bounding_box().min(),
        scene.world.bounding_box().max()
    );
    scene
}

/// Ground sphere, a 22x22 grid of small random spheres and three large ones.
pub fn random_spheres(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                // Glass
                Arc::new(Dielectric::new(1.5))
            };
            objects.push(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    log::debug!("Created {} spheres", objects.len());

    Scene {
        world: BvhNode::new(objects),
        camera: Camera::new()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.6, 10.0),
        background: Background::SkyGradient,
    }
}

fn random_color(rng: &mut StdRng, min: f32, max: f32) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// The six faces of the box spanned by two opposite corners.
pub fn box_quads(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    let mut sides = HittableList::new();
    for (corner, side1, side2) in faces {
        sides.add(Arc::new(Quad::new(corner, side1, side2, material.clone())));
    }
    sides
}

/// Five walls, a ceiling light and two rotated blocks.
pub fn cornell_box() -> Scene {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let quad = |corner: Vec3, side1: Vec3, side2: Vec3, material: &Arc<dyn Material>| {
        Arc::new(Quad::new(corner, side1, side2, material.clone())) as Arc<dyn Hittable>
    };

    let mut objects = vec![
        quad(
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 555.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &green,
        ),
        quad(
            Vec3::ZERO,
            Vec3::new(0.0, 555.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &red,
        ),
        quad(
            Vec3::new(343.0, 554.0, 332.0),
            Vec3::new(-130.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -105.0),
            &light,
        ),
        quad(
            Vec3::ZERO,
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 555.0),
            &white,
        ),
        quad(
            Vec3::splat(555.0),
            Vec3::new(-555.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -555.0),
            &white,
        ),
        quad(
            Vec3::new(0.0, 0.0, 555.0),
            Vec3::new(555.0, 0.0, 0.0),
            Vec3::new(0.0, 555.0, 0.0),
            &white,
        ),
    ];

    let tall = box_quads(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    objects.push(Arc::new(Transform::new(
        Arc::new(tall),
        AffineTransform::from_rotation_y_degrees(15.0).with_translation(Vec3::new(265.0, 0.0, 295.0)),
    )));

    let short = box_quads(Vec3::ZERO, Vec3::splat(165.0), white);
    objects.push(Arc::new(Transform::new(
        Arc::new(short),
        AffineTransform::from_rotation_y_degrees(-18.0).with_translation(Vec3::new(130.0, 0.0, 65.0)),
    )));

    Scene {
        world: BvhNode::new(objects),
        camera: Camera::new()
            .with_position(
                Vec3::new(278.0, 278.0, -800.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_lens(40.0, 0.0, 10.0),
        background: Background::Solid(Color::ZERO),
    }
}

fn checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Two large spheres sharing one checker texture.
pub fn checkered_spheres() -> Scene {
    let material: Arc<dyn Material> = Arc::new(Lambertian::from_texture(checker()));

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())),
        Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)),
    ];

    Scene {
        world: BvhNode::new(objects),
        camera: Camera::new()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        background: Background::SkyGradient,
    }
}

/// A globe textured from `texture`, or with a checker when it cannot be loaded.
pub fn earth(texture: Option<&Path>) -> Scene {
    let surface: Arc<dyn Texture> = match texture {
        Some(path) => match ImageTexture::load(path) {
            Ok(image) => Arc::new(image),
            Err(err) => {
                log::warn!(
                    "Failed to load texture {}: {}, using a checker instead",
                    path.display(),
                    err
                );
                checker()
            }
        },
        None => {
            log::warn!("No texture given for the earth scene, using a checker instead");
            checker()
        }
    };

    let globe: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::from_texture(surface)),
    ));

    Scene {
        world: BvhNode::new(vec![globe]),
        camera: Camera::new()
            .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        background: Background::SkyGradient,
    }
}
