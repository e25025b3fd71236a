//! Built-in template set (когда startup parameter `url` не задан)

use super::{
    AttachPoint, BulletSpec, Dimensions, ModelSpec, PropTemplate, TransformLike, TriggerSpec,
    Vector3Like,
};

/// Revolver (left-hand, в меню) + confetti cannon (world-spawned)
pub fn default_templates() -> Vec<PropTemplate> {
    vec![revolver(), confetti()]
}

fn revolver() -> PropTemplate {
    PropTemplate {
        name: "revolver".into(),
        attach_point: Some(AttachPoint::LeftHand),
        transform: None,
        dimensions: Some(Dimensions::new(0.04, 0.1, 0.25)),
        model: ModelSpec {
            resource_id: "artifact:2044161675715674908".into(),
            transform: Some(TransformLike {
                position: Vector3Like::new(0.0445, 0.0, 0.2255),
                rotation: Vector3Like::new(0.0, 0.0, -90.0),
                scale: None,
            }),
        },
        trigger: TriggerSpec::default(),
        bullet: BulletSpec {
            resource_id: "artifact:2044161675061363483".into(),
            transform: TransformLike::at(Vector3Like::new(0.0, 0.0447, 0.1548)),
            ttl: Some(10.0),
        },
    }
}

fn confetti() -> PropTemplate {
    PropTemplate {
        name: "confetti".into(),
        attach_point: None,
        transform: Some(TransformLike::at(Vector3Like::new(-1.0, 0.0, 0.0))),
        dimensions: None,
        model: ModelSpec {
            resource_id: "artifact:2044223538646221085".into(),
            transform: Some(TransformLike::default()),
        },
        trigger: TriggerSpec {
            dimensions: Dimensions::new(0.05, 0.05, 0.05),
            transform: Some(TransformLike::default()),
        },
        bullet: BulletSpec {
            resource_id: "artifact:2044223538260345116".into(),
            transform: TransformLike::at(Vector3Like::new(0.0, 0.0, 0.06)),
            ttl: Some(10.0),
        },
    }
}
