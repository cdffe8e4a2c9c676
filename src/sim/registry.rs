//! Scene registry
//!
//! Classifies the host's nodes into roles once at setup, so per-tick code
//! only compares `EntityId`s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::host::EntityId;
use crate::consts::{BALL_NODE_NAME, CAMERA_RIG_NODE_NAME};
use crate::error::{SetupError, SetupResult};

/// What a node means to the control core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Ball,
    CameraRig,
    Obstacle,
    /// Anything the core does not react to (ground, walls, lights)
    Scenery,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ball => "ball",
            Role::CameraRig => "camera rig",
            Role::Obstacle => "obstacle",
            Role::Scenery => "scenery",
        }
    }
}

/// Host description of one scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: EntityId,
    pub name: String,
    /// Physics category bitmask (0 for nodes without a body)
    pub category: u32,
}

impl NodeDescriptor {
    pub fn new(id: u32, name: impl Into<String>, category: u32) -> Self {
        Self {
            id: EntityId(id),
            name: name.into(),
            category,
        }
    }
}

/// Role lookup resolved from the scene description
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    ball: EntityId,
    rig: EntityId,
    /// Sorted ascending
    obstacles: Vec<EntityId>,
    obstacle_category: u32,
    roles: HashMap<EntityId, Role>,
}

impl SceneRegistry {
    /// Resolve roles; fails if the ball or rig is missing or duplicated
    pub fn resolve(nodes: &[NodeDescriptor], obstacle_category: u32) -> SetupResult<Self> {
        let mut ball = None;
        let mut rig = None;
        let mut obstacles = Vec::new();
        let mut roles = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let role = if node.name == BALL_NODE_NAME {
                if ball.replace(node.id).is_some() {
                    return Err(SetupError::DuplicateRole(Role::Ball.as_str()));
                }
                Role::Ball
            } else if node.name == CAMERA_RIG_NODE_NAME {
                if rig.replace(node.id).is_some() {
                    return Err(SetupError::DuplicateRole(Role::CameraRig.as_str()));
                }
                Role::CameraRig
            } else if node.category & obstacle_category != 0 {
                obstacles.push(node.id);
                Role::Obstacle
            } else {
                Role::Scenery
            };
            roles.insert(node.id, role);
        }

        let ball = ball.ok_or(SetupError::MissingNode(BALL_NODE_NAME))?;
        let rig = rig.ok_or(SetupError::MissingNode(CAMERA_RIG_NODE_NAME))?;
        obstacles.sort();

        log::info!(
            "Scene resolved: ball={:?} rig={:?} obstacles={} nodes={}",
            ball,
            rig,
            obstacles.len(),
            nodes.len()
        );

        Ok(Self {
            ball,
            rig,
            obstacles,
            obstacle_category,
            roles,
        })
    }

    pub fn ball(&self) -> EntityId {
        self.ball
    }

    pub fn rig(&self) -> EntityId {
        self.rig
    }

    pub fn obstacles(&self) -> &[EntityId] {
        &self.obstacles
    }

    /// Category bitmask obstacles were classified with
    pub fn obstacle_category(&self) -> u32 {
        self.obstacle_category
    }

    /// Unknown ids are scenery
    pub fn role_of(&self, id: EntityId) -> Role {
        self.roles.get(&id).copied().unwrap_or(Role::Scenery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CATEGORY_OBSTACLE;

    fn course() -> Vec<NodeDescriptor> {
        vec![
            NodeDescriptor::new(1, "floor", 1),
            NodeDescriptor::new(7, "tree", CATEGORY_OBSTACLE),
            NodeDescriptor::new(2, "ball", 4),
            NodeDescriptor::new(3, "selfieStick", 0),
            NodeDescriptor::new(5, "tree", CATEGORY_OBSTACLE | 1),
        ]
    }

    #[test]
    fn test_resolve_roles() {
        let reg = SceneRegistry::resolve(&course(), CATEGORY_OBSTACLE).unwrap();
        assert_eq!(reg.ball(), EntityId(2));
        assert_eq!(reg.rig(), EntityId(3));
        assert_eq!(reg.obstacles(), &[EntityId(5), EntityId(7)]);
        assert_eq!(reg.role_of(EntityId(1)), Role::Scenery);
        assert_eq!(reg.role_of(EntityId(7)), Role::Obstacle);
        assert_eq!(reg.role_of(EntityId(99)), Role::Scenery);
        assert_eq!(reg.obstacle_category(), CATEGORY_OBSTACLE);
    }

    #[test]
    fn test_custom_obstacle_category() {
        let reg = SceneRegistry::resolve(&course(), 1).unwrap();
        assert_eq!(reg.obstacles(), &[EntityId(1), EntityId(5)]);
        assert_eq!(reg.obstacle_category(), 1);
    }

    #[test]
    fn test_missing_ball_fails_fast() {
        let nodes: Vec<_> = course().into_iter().filter(|n| n.name != "ball").collect();
        assert!(matches!(
            SceneRegistry::resolve(&nodes, CATEGORY_OBSTACLE),
            Err(SetupError::MissingNode("ball"))
        ));
    }

    #[test]
    fn test_missing_rig_fails_fast() {
        let nodes: Vec<_> = course()
            .into_iter()
            .filter(|n| n.name != "selfieStick")
            .collect();
        assert!(matches!(
            SceneRegistry::resolve(&nodes, CATEGORY_OBSTACLE),
            Err(SetupError::MissingNode("selfieStick"))
        ));
    }

    #[test]
    fn test_duplicate_ball_rejected() {
        let mut nodes = course();
        nodes.push(NodeDescriptor::new(9, "ball", 4));
        assert!(matches!(
            SceneRegistry::resolve(&nodes, CATEGORY_OBSTACLE),
            Err(SetupError::DuplicateRole("ball"))
        ));
    }

    #[test]
    fn test_duplicate_rig_rejected() {
        let mut nodes = course();
        nodes.push(NodeDescriptor::new(8, "selfieStick", 0));
        assert!(matches!(
            SceneRegistry::resolve(&nodes, CATEGORY_OBSTACLE),
            Err(SetupError::DuplicateRole("camera rig"))
        ));
    }
}
