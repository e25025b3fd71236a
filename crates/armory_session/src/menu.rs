//! MenuLayout — одна ячейка на attachable template, в один ряд
//!
//! Ячейка = preview модели + невидимый box collider (child модели).
//! Клик по collider → `ClickBinding::MenuCell { template }` → toggle equip.
//! Геометрию grid считает движок (`SceneHost::layout_row`).

use bevy::prelude::*;
use std::sync::Arc;

use crate::host::{
    box_mesh, invisible_material, ActorId, ActorSpec, Appearance, ClickBinding, ColliderShape,
    ColliderSpec, GridCell, SceneHost,
};
use crate::template::{Dimensions, PropTemplate};

/// Collider ячейки, когда шаблон не задал `dimensions`
pub const DEFAULT_CELL_DIMENSIONS: Dimensions = Dimensions::new(0.4, 0.7, 0.2);

#[derive(Clone, Debug, PartialEq)]
pub struct MenuCell {
    pub template: String,
    pub model: ActorId,
    pub collider: ActorId,
}

#[derive(Resource, Debug, Default)]
pub struct MenuLayout {
    anchor: Option<ActorId>,
    cells: Vec<MenuCell>,
}

impl MenuLayout {
    /// Построить меню из attachable шаблонов (порядок сохраняется)
    pub fn build<'a>(
        host: &mut dyn SceneHost,
        templates: impl IntoIterator<Item = &'a Arc<PropTemplate>>,
    ) -> Self {
        let anchor = host.create_actor(ActorSpec {
            name: Some("menu".into()),
            ..Default::default()
        });
        let material = invisible_material(host);

        let mut cells = Vec::new();
        let mut grid = Vec::new();

        for (column, template) in templates.into_iter().enumerate() {
            let preview = template
                .model
                .transform
                .unwrap_or_default()
                .without_roll()
                .to_transform();
            let model = host.create_from_library(
                &template.model.resource_id,
                ActorSpec::child_of(anchor, preview),
            );

            let dimensions = template.dimensions.unwrap_or(DEFAULT_CELL_DIMENSIONS);
            let mesh = box_mesh(host, dimensions);
            let collider = host.create_actor(ActorSpec {
                parent: Some(model),
                appearance: Some(Appearance { mesh, material }),
                collider: Some(ColliderSpec::hologram(ColliderShape::Box)),
                ..Default::default()
            });

            grid.push(GridCell {
                column,
                width: dimensions.width,
                height: dimensions.height,
                contents: model,
            });
            cells.push(MenuCell {
                template: template.name.clone(),
                model,
                collider,
            });
        }

        host.layout_row(anchor, &grid);

        let menu = Self {
            anchor: Some(anchor),
            cells,
        };
        menu.bind(host);

        crate::logger::log_info(&format!("📋 Menu built with {} cells", menu.cells.len()));
        menu
    }

    /// Re-bind всех ячеек (idempotent, вызывается при reconciliation)
    pub fn bind(&self, host: &mut dyn SceneHost) {
        for cell in &self.cells {
            host.bind_click(
                cell.collider,
                ClickBinding::MenuCell {
                    template: cell.template.clone(),
                },
            );
        }
    }

    pub fn is_built(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<ActorId> {
        self.anchor
    }

    pub fn cells(&self) -> &[MenuCell] {
        &self.cells
    }

    pub fn cell(&self, template: &str) -> Option<&MenuCell> {
        self.cells.iter().find(|cell| cell.template == template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::template::TemplateSet;

    #[test]
    fn test_menu_has_cell_per_attachable_template() {
        let mut host = MemoryHost::new();
        let templates = TemplateSet::defaults();

        let menu = MenuLayout::build(&mut host, templates.attachable());

        assert_eq!(menu.cells().len(), 1);
        let cell = menu.cell("revolver").expect("revolver cell");
        let anchor = menu.anchor().expect("anchor");

        host.inspect(|graph| {
            let layout = graph.layout(anchor).expect("layout applied");
            assert_eq!(layout.len(), 1);
            assert_eq!(layout[0].contents, cell.model);
            assert_eq!(layout[0].width, 0.04);

            let collider = graph.actor(cell.collider).expect("collider");
            assert_eq!(collider.parent, Some(cell.model));
            assert_eq!(
                collider.binding,
                Some(ClickBinding::MenuCell { template: "revolver".into() })
            );
        });
    }

    #[test]
    fn test_rebind_is_idempotent() {
        let mut host = MemoryHost::new();
        let templates = TemplateSet::defaults();
        let menu = MenuLayout::build(&mut host, templates.attachable());
        let collider = menu.cells()[0].collider;

        menu.bind(&mut host);
        menu.bind(&mut host);

        host.inspect(|graph| {
            let node = graph.actor(collider).expect("collider");
            assert_eq!(node.bind_count, 3);
            assert_eq!(
                graph.click(collider, crate::host::UserId(1)).map(|e| e.binding),
                Some(ClickBinding::MenuCell { template: "revolver".into() })
            );
        });
    }

    #[test]
    fn test_default_cell_dimensions() {
        let json = r#"[{ "name": "wand", "attachPoint": "right-hand",
            "model": { "resourceId": "artifact:w" }, "bullet": { "resourceId": "artifact:s" } }]"#;
        let templates = TemplateSet::from_json(json).expect("json");
        let mut host = MemoryHost::new();

        let menu = MenuLayout::build(&mut host, templates.attachable());
        let anchor = menu.anchor().expect("anchor");

        host.inspect(|graph| {
            let layout = graph.layout(anchor).expect("layout");
            assert_eq!(layout[0].width, DEFAULT_CELL_DIMENSIONS.width);
            assert_eq!(layout[0].height, DEFAULT_CELL_DIMENSIONS.height);
        });
    }
}
