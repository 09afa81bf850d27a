//! Three horizontal lists on one canvas. A scripted long press drags a tile
//! from the first list into the second, then pushes a tile of the third
//! list against its right edge so it pages. Run with `RUST_LOG=debug` to
//! follow the session.

use std::rc::Rc;
use std::time::Duration;

use shuffle_core::*;
use shuffle_ui::*;

#[derive(Clone, Debug, PartialEq)]
struct Tile {
    label: String,
    color: Color,
}

/// One list's tiles. Tiles keep their color when they move between lists.
struct Palette {
    tiles: Vec<Tile>,
}

impl Palette {
    fn new(list: usize, color: Color) -> Self {
        let tiles = (0..21)
            .map(|j| Tile {
                label: format!("{list}:{j}"),
                color,
            })
            .collect();
        Self { tiles }
    }

    fn labels(&self) -> Vec<&str> {
        self.tiles.iter().map(|t| t.label.as_str()).collect()
    }

    fn check(&self, index: usize, len: usize) -> Result<(), StoreError> {
        if index < len {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfBounds { index, len })
        }
    }
}

impl CollectionDataSource for Palette {
    type Item = Tile;

    fn len(&self) -> usize {
        self.tiles.len()
    }

    fn item_at(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).cloned()
    }

    fn insert_item(&mut self, item: Tile, index: usize) -> Result<(), StoreError> {
        self.check(index, self.tiles.len() + 1)?;
        self.tiles.insert(index, item);
        Ok(())
    }

    fn delete_item(&mut self, index: usize) -> Result<Tile, StoreError> {
        self.check(index, self.tiles.len())?;
        Ok(self.tiles.remove(index))
    }

    fn move_item(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.check(from, self.tiles.len())?;
        self.check(to, self.tiles.len())?;
        let tile = self.tiles.remove(from);
        self.tiles.insert(to, tile);
        Ok(())
    }

    fn is_draggable(&self, index: usize) -> bool {
        index % 2 == 0
    }

    fn style_representation(&self, representation: &mut Representation) {
        let size = representation.frame.size();
        representation.content.push(SceneNode::Border {
            rect: Rect::new(0.0, 0.0, size.width, size.height),
            color: Color::WHITE,
            width: 2.0,
            radius: 4.0,
        });
    }

    fn paint_cell(&self, index: usize, bounds: Rect) -> Vec<SceneNode> {
        let Some(tile) = self.tiles.get(index) else {
            return Vec::new();
        };
        vec![
            SceneNode::Rect {
                rect: bounds,
                color: tile.color,
                radius: 4.0,
            },
            SceneNode::Text {
                rect: bounds,
                text: format!("{index}\n\n{}", tile.label),
                color: Color::WHITE,
                size: 12.0,
            },
        ]
    }
}

type List = DragDropCollectionView<Palette>;

struct Demo {
    clock: Rc<ManualClock>,
    main_loop: Rc<MainLoop>,
    lists: Vec<Rc<List>>,
    manager: DragDropManager<Tile>,
}

impl Demo {
    fn new() -> Self {
        let clock = Rc::new(ManualClock::new());
        let main_loop = MainLoop::new(clock.clone());
        let tree = Rc::new(ViewTree::new());
        let canvas = tree.add_root(Rect::new(0.0, 0.0, 360.0, 640.0));
        let config = DragConfig::default();
        let layout = FlowLayout {
            spacing: 8.0,
            inset: 8.0,
            ..FlowLayout::horizontal(Size::new(76.0, 76.0))
        };

        let colors = ["#B15827", "#8A9556", "#356695"];
        let lists: Vec<Rc<List>> = colors
            .iter()
            .enumerate()
            .map(|(i, hex)| {
                DragDropCollectionView::new(
                    tree.clone(),
                    main_loop.clone(),
                    canvas,
                    Rect::new(0.0, 40.0 + 200.0 * i as f32, 360.0, 180.0),
                    layout,
                    Palette::new(i, Color::from_hex(hex)),
                    config.clone(),
                )
            })
            .collect();

        let participants = lists.iter().map(|l| Participant::both(l.clone())).collect();
        let manager = DragDropManager::new(tree, main_loop.clone(), canvas, participants, config);
        Self {
            clock,
            main_loop,
            lists,
            manager,
        }
    }

    /// Advances time by one 16ms frame and runs whatever became due.
    fn frame(&mut self) {
        self.clock.advance(Duration::from_millis(16));
        self.manager.tick();
        self.main_loop.run_due();
    }

    fn pointer(&mut self, event: PointerEventKind, x: f32, y: f32) {
        self.manager
            .handle_pointer(&PointerEvent::touch(event, Vec2::new(x, y)));
        self.frame();
    }

    fn long_press(&mut self, x: f32, y: f32) -> bool {
        self.pointer(PointerEventKind::Down, x, y);
        for _ in 0..20 {
            self.frame();
        }
        self.manager.phase() == DragPhase::Dragging
    }

    fn drag_along(&mut self, path: &[(f32, f32)]) {
        for &(x, y) in path {
            self.pointer(PointerEventKind::Move, x, y);
        }
    }

    fn settle(&mut self) {
        for _ in 0..90 {
            self.frame();
        }
    }

    fn scene(&self) -> Scene {
        let mut scene = Scene {
            clear_color: Color::from_hex("#121212"),
            nodes: Vec::new(),
        };
        for list in &self.lists {
            scene.nodes.extend(list.paint());
        }
        scene.nodes.extend(self.manager.paint_representation());
        scene
    }

    fn report(&self) {
        for (i, list) in self.lists.iter().enumerate() {
            let data = list.data();
            log::info!(
                "list {i}: {} tiles, offset {:?}, first {:?}",
                data.len(),
                list.content_offset(),
                &data.labels()[..data.len().min(4)]
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut demo = Demo::new();
    demo.report();

    // "0:2" sits at (92, 8) inside the first list, which starts at y = 40
    if !demo.long_press(130.0, 86.0) {
        anyhow::bail!("long press on 0:2 did not start a drag");
    }
    log::info!(
        "dragging {:?}; scene has {} nodes",
        demo.manager.session().map(|s| s.item().label.clone()),
        demo.scene().nodes.len()
    );
    demo.drag_along(&[(120.0, 140.0), (80.0, 220.0), (46.0, 286.0)]);
    demo.pointer(PointerEventKind::Up, 46.0, 286.0);
    demo.settle();
    demo.report();

    // "2:0" at the start of the third list, pushed past its right edge
    if !demo.long_press(46.0, 486.0) {
        anyhow::bail!("long press on 2:0 did not start a drag");
    }
    demo.drag_along(&[(150.0, 486.0), (260.0, 486.0), (338.0, 486.0)]);
    for _ in 0..3 {
        demo.settle();
        demo.drag_along(&[(340.0, 486.0), (338.0, 486.0)]);
    }
    demo.pointer(PointerEventKind::Up, 338.0, 486.0);
    demo.settle();
    demo.report();

    log::info!("final scene: {} nodes", demo.scene().nodes.len());
    Ok(())
}
