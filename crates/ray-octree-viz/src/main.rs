use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use ray_octree::{Aabb, Octree, Ray, Refinement, Tracer};
use ray_octree_viz::{draw_aabb, draw_ray, ray_fan, to_vec3, OctreeNavigator, Viewpoint};

const WORLD_HALF: f32 = 16.0;
const NUM_RAYS: usize = 24;
const FAN_SPREAD: f32 = 1.2;
const MIN_POWER: f32 = 0.5;
const MAX_POWER: f32 = 16.0;

fn world() -> Aabb<f32> {
    Aabb::from_center(
        Point3::origin(),
        Vector3::new(WORLD_HALF, WORLD_HALF, WORLD_HALF),
    )
}

/// A fan of rays entering the world from the -x side.
fn spark_rays() -> Vec<Ray<f32>> {
    ray_fan(
        Point3::new(-WORLD_HALF - 4.0, 3.0, 1.5),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        NUM_RAYS,
        FAN_SPREAD,
    )
}

fn rebuild(tracer: &Tracer<f32>, rays: &[Ray<f32>]) -> Octree<(), f32> {
    let mut tree = Octree::new(world());
    for ray in rays {
        tracer.build(&mut tree, ray);
    }
    tree
}

#[macroquad::main("Ray Octree")]
async fn main() {
    let rays = spark_rays();
    let mut power = 2.0;
    let mut refinement = Refinement::EntryOctant;
    let mut tracer = Tracer::new(power).with_refinement(refinement);

    println!("Building octree from {} rays...", rays.len());
    let mut tree = rebuild(&tracer, &rays);
    println!(
        "Octree built: {} nodes, depth {}",
        tree.node_count(),
        tree.depth()
    );

    let mut camera = Viewpoint::new(60.0, 0.6, 0.4).with_zoom(3.0, 10.0, 150.0);
    let mut navigator = OctreeNavigator::new();

    loop {
        camera.update();
        navigator.update(&tree);

        let mut dirty = false;
        if is_key_pressed(KeyCode::Equal) {
            power = (power / 2.0).max(MIN_POWER);
            dirty = true;
        }
        if is_key_pressed(KeyCode::Minus) {
            power = (power * 2.0).min(MAX_POWER);
            dirty = true;
        }
        if is_key_pressed(KeyCode::A) {
            refinement = match refinement {
                Refinement::EntryOctant => Refinement::AllOctants,
                Refinement::AllOctants => Refinement::EntryOctant,
            };
            dirty = true;
        }
        if is_key_pressed(KeyCode::X) {
            for ray in &rays {
                tracer.burn(&mut tree, ray);
            }
            navigator.revalidate(&tree);
        }
        if is_key_pressed(KeyCode::B) {
            dirty = true;
        }
        if dirty {
            tracer = Tracer::new(power).with_refinement(refinement);
            tree = rebuild(&tracer, &rays);
            navigator.revalidate(&tree);
        }

        let view = camera.view_ray();
        let hit = view.and_then(|ray| tracer.cast(&tree, &ray));

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.camera());

        navigator.render(&tree);
        for ray in &rays {
            draw_ray(ray, 2.0 * WORLD_HALF + 8.0, Color::from_rgba(255, 200, 60, 120));
        }
        if let Some(hit) = &hit {
            draw_aabb(&hit.shape, RED);
            draw_sphere(to_vec3(&hit.reflect.pos()), 0.2, None, RED);
            draw_ray(&hit.reflect, 4.0, PINK);
        }

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(8.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 8.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 8.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("Ray Octree - {} nodes, depth {}", tree.node_count(), tree.depth()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!("Power: {:.2} | Refinement: {:?}", tracer.power(), tracer.refinement()),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        let cast = match &hit {
            Some(hit) => format!(
                "Cast: distance {:.2}, box diagonal {:.2}",
                hit.distance,
                hit.shape.diagonal()
            ),
            None => "Cast: miss".to_string(),
        };
        draw_text(&cast, 10.0, 155.0, 16.0, LIGHTGRAY);
        draw_text(
            "[+/-] Power | [A] Refinement | [B] Rebuild | [X] Burn",
            10.0,
            175.0,
            16.0,
            DARKGRAY,
        );
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 195.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 215.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
