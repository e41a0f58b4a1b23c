//! Fit-to-view: normalizes a spawned model and frames the camera on it.

use bevy::ecs::message::MessageReader;
use bevy::camera::primitives::MeshAabb;
use bevy::math::Affine3A;
use bevy::prelude::*;

use super::bounds::{Bounds, Framing, GroundFit};
use super::session::{ModelRoot, PendingFit, SessionSlot};
use super::{ResetView, ViewerStatus};
use crate::camera::OrbitController;
use crate::config::ConfigLoaded;

/// Scene nodes below a model root. Cameras and model roots are excluded so
/// their transforms can be written in the same system.
pub type ModelNodes<'w, 's> = Query<
  'w,
  's,
  (&'static Transform, Option<&'static Mesh3d>),
  (Without<ModelRoot>, Without<OrbitController>),
>;

/// Walks the scene below `root`, collecting mesh entities and the bounds of
/// their geometry in the space described by `root_affine`.
pub fn measure_model(
  root: Entity,
  root_affine: Affine3A,
  children: &Query<&Children>,
  nodes: &ModelNodes,
  meshes: &Assets<Mesh>,
  mesh_entities: &mut Vec<Entity>,
) -> Option<Bounds> {
  let mut bounds = None;
  if let Ok(kids) = children.get(root) {
    for &child in &**kids {
      visit(child, root_affine, children, nodes, meshes, &mut bounds, mesh_entities);
    }
  }
  bounds
}

fn visit(
  entity: Entity,
  parent: Affine3A,
  children: &Query<&Children>,
  nodes: &ModelNodes,
  meshes: &Assets<Mesh>,
  bounds: &mut Option<Bounds>,
  mesh_entities: &mut Vec<Entity>,
) {
  let Ok((transform, mesh)) = nodes.get(entity) else {
    return;
  };
  let affine = parent * transform.compute_affine();

  if let Some(mesh) = mesh {
    mesh_entities.push(entity);
    if let Some(aabb) = meshes.get(&mesh.0).and_then(|m| m.compute_aabb()) {
      let local = Bounds {
        min: Vec3::from(aabb.min()),
        max: Vec3::from(aabb.max()),
      };
      let world = local.transformed(&affine);
      *bounds = Some(match *bounds {
        Some(b) => b.union(world),
        None => world,
      });
    }
  }

  if let Ok(kids) = children.get(entity) {
    for &child in &**kids {
      visit(child, affine, children, nodes, meshes, bounds, mesh_entities);
    }
  }
}

/// Flattens materials, rests the model on the ground at the target size and
/// frames the camera on the result.
pub fn fit_loaded_models(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  meshes: Res<Assets<Mesh>>,
  mut slot: ResMut<SessionSlot>,
  pending: Query<(Entity, &ModelRoot), With<PendingFit>>,
  children: Query<&Children>,
  nodes: ModelNodes,
  mut roots: Query<&mut Transform, With<ModelRoot>>,
  mut cameras: Query<(&mut OrbitController, &mut Transform), Without<ModelRoot>>,
) {
  for (entity, model) in &pending {
    commands.entity(entity).remove::<PendingFit>();

    let Some(session) = slot.current_mut() else {
      continue;
    };
    if session.generation != model.generation {
      continue;
    }
    let Ok(mut root_transform) = roots.get_mut(entity) else {
      continue;
    };

    // Bounds in root space with the root's rotation applied
    let rotation = Affine3A::from_quat(root_transform.rotation);
    let mut mesh_entities = Vec::new();
    let raw = measure_model(entity, rotation, &children, &nodes, &meshes, &mut mesh_entities);

    if let Some(material) = &session.material {
      for mesh_entity in &mesh_entities {
        commands
          .entity(*mesh_entity)
          .insert(MeshMaterial3d(material.clone()));
      }
    }

    let fit = raw.map_or(GroundFit::identity(), |b| {
      GroundFit::compute(&b, config.framing.target_size)
    });
    root_transform.scale = Vec3::splat(fit.scale);
    root_transform.translation = fit.translation;

    let fitted = measure_model(
      entity,
      root_transform.compute_affine(),
      &children,
      &nodes,
      &meshes,
      &mut Vec::new(),
    );
    session.bounds = fitted;
    session.status = ViewerStatus::Ready;
    info!(
      "Session {}: model ready ({} meshes)",
      session.generation,
      mesh_entities.len()
    );

    frame_cameras(&mut cameras, fitted.as_ref(), &config);
  }
}

/// Reframes the camera from the current model on request.
pub fn reset_view(
  mut requests: MessageReader<ResetView>,
  config: Res<ConfigLoaded>,
  meshes: Res<Assets<Mesh>>,
  slot: Res<SessionSlot>,
  children: Query<&Children>,
  nodes: ModelNodes,
  roots: Query<&Transform, With<ModelRoot>>,
  mut cameras: Query<(&mut OrbitController, &mut Transform), Without<ModelRoot>>,
) {
  if requests.read().count() == 0 {
    return;
  }
  let bounds = slot
    .current()
    .and_then(|s| s.model)
    .and_then(|model| {
      let root = roots.get(model).ok()?;
      measure_model(
        model,
        root.compute_affine(),
        &children,
        &nodes,
        &meshes,
        &mut Vec::new(),
      )
    });
  frame_cameras(&mut cameras, bounds.as_ref(), &config);
}

/// Snaps every session camera to the framing for `bounds`, or back to the
/// configured start position when there is nothing to frame.
fn frame_cameras(
  cameras: &mut Query<(&mut OrbitController, &mut Transform), Without<ModelRoot>>,
  bounds: Option<&Bounds>,
  config: &ConfigLoaded,
) {
  let framing = match bounds {
    Some(bounds) => Framing::for_bounds(bounds, &config.framing),
    None => Framing {
      eye: Vec3::from(config.camera.start_position),
      target: Vec3::ZERO,
    },
  };
  for (mut controller, mut transform) in cameras.iter_mut() {
    controller.snap_to(framing.eye, framing.target);
    *transform = controller.transform();
  }
}
