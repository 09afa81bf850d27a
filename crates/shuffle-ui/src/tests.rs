use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use shuffle_core::*;

use crate::*;

type List = DragDropCollectionView<VecDataSource<String>>;

const A: Rect = Rect::new(0.0, 0.0, 200.0, 300.0);
const B: Rect = Rect::new(250.0, 0.0, 200.0, 300.0);
const C: Rect = Rect::new(500.0, 0.0, 200.0, 300.0);

fn layout() -> FlowLayout {
    FlowLayout {
        spacing: 10.0,
        inset: 10.0,
        ..FlowLayout::vertical(Size::new(80.0, 80.0))
    }
}

fn items(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

/// Forwards to a list and logs every callback that changes state.
struct Recorder {
    name: &'static str,
    view: Rc<List>,
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn record(&self, what: &str, item: Option<&String>) {
        let line = match item {
            Some(item) => format!("{} {what} {item}", self.name),
            None => format!("{} {what}", self.name),
        };
        self.log.borrow_mut().push(line);
    }
}

impl ViewHandle for Recorder {
    fn view_id(&self) -> ViewId {
        self.view.id()
    }
}

impl Draggable<String> for Recorder {
    fn can_drag_at_point(&self, point: Vec2) -> bool {
        self.view.can_drag_at_point(point)
    }

    fn representation_at_point(&self, point: Vec2) -> Option<Representation> {
        self.view.representation_at_point(point)
    }

    fn styling_representation(&self, representation: Representation) -> Representation {
        self.view.styling_representation(representation)
    }

    fn data_item_at_point(&self, point: Vec2) -> Option<String> {
        self.view.data_item_at_point(point)
    }

    fn drag_data_item(&self, item: &String) {
        self.record("drag", Some(item));
        self.view.drag_data_item(item);
    }

    fn start_dragging_at_point(&self, point: Vec2) {
        self.record("start", None);
        self.view.start_dragging_at_point(point);
    }

    fn restore_data_item(&self, item: &String) {
        self.record("restore", Some(item));
        self.view.restore_data_item(item);
    }

    fn stop_dragging(&self) {
        self.record("stop", None);
        self.view.stop_dragging();
    }
}

impl Droppable<String> for Recorder {
    fn can_drop_at_rect(&self, rect: Rect) -> bool {
        self.view.can_drop_at_rect(rect)
    }

    fn will_move_item(&self, item: &String, rect: Rect) {
        self.record("will", Some(item));
        self.view.will_move_item(item, rect);
    }

    fn did_move_item(&self, item: &String, rect: Rect) {
        self.record("move", Some(item));
        self.view.did_move_item(item, rect);
    }

    fn did_move_out_item(&self, item: &String) {
        self.record("out", Some(item));
        self.view.did_move_out_item(item);
    }

    fn drop_data_item(&self, item: &String, rect: Rect) {
        self.record("drop", Some(item));
        self.view.drop_data_item(item, rect);
    }
}

struct World {
    clock: Rc<ManualClock>,
    main_loop: Rc<MainLoop>,
    tree: Rc<ViewTree>,
    lists: Vec<(&'static str, Rc<List>)>,
    manager: DragDropManager<String>,
    log: Rc<RefCell<Vec<String>>>,
}

impl World {
    /// Lists are registered in the order given.
    fn new(lists: Vec<(&'static str, Rect, Vec<String>)>) -> Self {
        let clock = Rc::new(ManualClock::new());
        let main_loop = MainLoop::new(clock.clone());
        let tree = Rc::new(ViewTree::new());
        let canvas = tree.add_root(Rect::new(0.0, 0.0, 700.0, 400.0));
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut views = Vec::new();
        let mut participants = Vec::new();
        for (name, frame, data) in lists {
            let view = DragDropCollectionView::new(
                tree.clone(),
                main_loop.clone(),
                canvas,
                frame,
                layout(),
                VecDataSource::new(data),
                DragConfig::default(),
            );
            participants.push(Participant::both(Rc::new(Recorder {
                name,
                view: view.clone(),
                log: log.clone(),
            })));
            views.push((name, view));
        }

        let manager = DragDropManager::new(
            tree.clone(),
            main_loop.clone(),
            canvas,
            participants,
            DragConfig::default(),
        );
        Self {
            clock,
            main_loop,
            tree,
            lists: views,
            manager,
            log,
        }
    }

    fn three(a: Vec<String>, b: Vec<String>, c: Vec<String>) -> Self {
        Self::new(vec![("A", A, a), ("B", B, b), ("C", C, c)])
    }

    fn list(&self, name: &str) -> &Rc<List> {
        self.lists
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .expect("known list")
    }

    fn items(&self, name: &str) -> Vec<String> {
        self.list(name).data().items().to_vec()
    }

    fn press(&mut self, x: f32, y: f32) -> bool {
        let down = self
            .manager
            .handle_pointer(&PointerEvent::touch(PointerEventKind::Down, Vec2::new(x, y)));
        self.clock.advance(Duration::from_millis(300));
        self.manager.tick();
        down
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.manager
            .handle_pointer(&PointerEvent::touch(PointerEventKind::Move, Vec2::new(x, y)));
    }

    fn release(&mut self, x: f32, y: f32) {
        self.manager
            .handle_pointer(&PointerEvent::touch(PointerEventKind::Up, Vec2::new(x, y)));
    }

    fn cancel_at(&mut self, x: f32, y: f32) {
        self.manager
            .handle_pointer(&PointerEvent::touch(PointerEventKind::Cancel, Vec2::new(x, y)));
    }

    fn settle(&self) {
        self.clock.advance(Duration::from_secs(1));
        self.main_loop.run_due();
    }

    fn log(&self) -> String {
        self.log.borrow().join("\n")
    }
}

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

// a1 sits at (100, 10) in A; the pointer grabs it 40pt inside the cell
const A1: (f32, f32) = (140.0, 50.0);

#[test]
fn drag_between_lists_moves_the_item() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(A1.0, A1.1));
    assert_eq!(w.manager.phase(), DragPhase::Dragging);
    assert_eq!(w.list("A").dragging_index(), Some(1));

    // representation lands at (300, 10): inside empty B
    w.move_to(340.0, 50.0);
    w.release(340.0, 50.0);
    w.settle();

    assert_eq!(w.items("A"), strs(&["a0", "a2"]));
    assert_eq!(w.items("B"), strs(&["a1"]));
    assert!(w.items("C").is_empty());
    assert_eq!(w.manager.phase(), DragPhase::Idle);
    assert!(w.manager.representation_view().is_none());
    for (_, list) in &w.lists {
        assert_eq!(list.dragging_index(), None);
        assert!(!list.is_animating());
    }
}

#[test]
fn reorder_within_one_list() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(50.0, 50.0));
    // a0's representation over cell 2 at (10, 100)
    w.move_to(50.0, 140.0);
    assert_eq!(w.list("A").dragging_index(), Some(2));
    w.release(50.0, 140.0);

    assert_eq!(w.items("A"), strs(&["a1", "a2", "a0"]));
    assert!(w.items("B").is_empty());
}

#[test]
fn self_drop_in_place_is_a_no_op() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(A1.0, A1.1));
    w.move_to(145.0, 55.0);
    w.release(145.0, 55.0);
    w.settle();
    assert_eq!(w.items("A"), items("a", 3));
    assert!(w.list("A").take_updates().is_empty());
}

#[test]
fn round_trip_restores_initial_state() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(A1.0, A1.1));
    w.move_to(340.0, 50.0);
    assert_eq!(w.items("A"), strs(&["a0", "a2"]));
    assert_eq!(w.items("B"), strs(&["a1"]));

    w.move_to(A1.0, A1.1);
    w.release(A1.0, A1.1);
    w.settle();

    assert_eq!(w.items("A"), items("a", 3));
    assert!(w.items("B").is_empty());
    insta::assert_snapshot!(w.log(), @r"
    A start
    A out a1
    B will a1
    B move a1
    B out a1
    A will a1
    A move a1
    A stop
    ");
}

#[test]
fn enter_and_exit_notifications_pair_up() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(A1.0, A1.1));
    for x in [340.0, 590.0, 340.0, 590.0, 340.0] {
        w.move_to(x, 50.0);
        w.move_to(x + 5.0, 55.0);
    }
    w.release(345.0, 55.0);

    let log = w.log.borrow();
    for name in ["A", "B", "C"] {
        let count = |what: &str| {
            log.iter()
                .filter(|l| l.starts_with(&format!("{name} {what} ")))
                .count()
        };
        let wills = count("will");
        let outs = count("out");
        assert!(wills.abs_diff(outs) <= 1, "{name}: {wills} wills, {outs} outs");
    }
    drop(log);
    assert_eq!(w.items("B"), strs(&["a1"]));
    assert!(w.items("C").is_empty());
    assert_eq!(w.items("A"), strs(&["a0", "a2"]));
}

#[test]
fn equal_overlap_goes_to_first_registered() {
    // B and C touch at x = 450; the representation straddles them evenly
    let adjacent = Rect::new(450.0, 0.0, 200.0, 300.0);
    let mut w = World::new(vec![
        ("A", A, items("a", 3)),
        ("B", B, vec![]),
        ("C", adjacent, vec![]),
    ]);
    assert!(w.press(A1.0, A1.1));
    w.move_to(450.0, 50.0);
    w.release(450.0, 50.0);
    assert_eq!(w.items("B"), strs(&["a1"]));
    assert!(w.items("C").is_empty());

    let mut w = World::new(vec![
        ("A", A, items("a", 3)),
        ("C", adjacent, vec![]),
        ("B", B, vec![]),
    ]);
    assert!(w.press(A1.0, A1.1));
    w.move_to(450.0, 50.0);
    w.release(450.0, 50.0);
    assert_eq!(w.items("C"), strs(&["a1"]));
    assert!(w.items("B").is_empty());
}

#[test]
fn paging_waits_for_the_cooldown() {
    let mut w = World::three(items("a", 3), items("b", 21), vec![]);
    assert!(w.press(A1.0, A1.1));

    // representation at (300, 250): crosses B's bottom edge
    w.move_to(340.0, 290.0);
    let b = w.list("B").clone();
    assert_eq!(b.content_offset(), Vec2::new(0.0, 150.0));
    assert!(b.is_paging());

    w.move_to(340.0, 290.0);
    assert_eq!(b.content_offset(), Vec2::new(0.0, 150.0));

    w.settle();
    assert!(!b.is_paging());
    w.move_to(340.0, 290.0);
    assert_eq!(b.content_offset(), Vec2::new(0.0, 300.0));

    w.release(340.0, 290.0);
    assert_eq!(w.items("B").len(), 22);
    assert_eq!(w.items("A").len(), 2);
}

#[test]
fn cancel_tears_down_without_committing() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    let baseline = w.tree.len();
    assert!(w.press(A1.0, A1.1));
    assert_eq!(w.tree.len(), baseline + 1);
    w.move_to(340.0, 50.0);
    assert_eq!(w.items("B"), strs(&["a1"]));
    w.cancel_at(340.0, 50.0);
    w.settle();

    assert_eq!(w.manager.phase(), DragPhase::Idle);
    assert_eq!(w.tree.len(), baseline);
    assert_eq!(w.items("A"), items("a", 3));
    assert!(w.items("B").is_empty());
    for (_, list) in &w.lists {
        assert_eq!(list.dragging_index(), None);
        assert_eq!(list.presented_len(), list.data().len());
    }
    insta::assert_snapshot!(w.log(), @r"
    A start
    A out a1
    B will a1
    B move a1
    B out a1
    A restore a1
    A stop
    ");
}

#[test]
fn cancel_after_reorder_restores_original_order() {
    let mut w = World::three(items("a", 3), vec![], vec![]);
    assert!(w.press(50.0, 50.0));
    w.move_to(50.0, 140.0);
    assert_eq!(w.items("A"), strs(&["a1", "a2", "a0"]));

    w.cancel_at(50.0, 140.0);
    w.settle();
    assert_eq!(w.items("A"), items("a", 3));
    assert!(w.items("B").is_empty());
    assert_eq!(w.list("A").dragging_index(), None);
    assert!(!w.log().contains("drag a0"));
}

#[test]
fn cancel_after_passing_through_another_list() {
    let mut w = World::three(items("a", 3), items("b", 2), vec![]);
    assert!(w.press(A1.0, A1.1));
    // over B, then on to empty C
    w.move_to(340.0, 50.0);
    w.move_to(590.0, 50.0);
    assert_eq!(w.items("C"), strs(&["a1"]));
    assert_eq!(w.items("B"), items("b", 2));

    w.cancel_at(590.0, 50.0);
    w.settle();
    assert_eq!(w.items("A"), items("a", 3));
    assert_eq!(w.items("B"), items("b", 2));
    assert!(w.items("C").is_empty());
}

#[test]
fn undraggable_positions_do_not_start_a_drag() {
    let data = VecDataSource::new(items("a", 3)).draggable_when(|i| i % 2 == 0);
    let clock = Rc::new(ManualClock::new());
    let main_loop = MainLoop::new(clock.clone());
    let tree = Rc::new(ViewTree::new());
    let canvas = tree.add_root(Rect::new(0.0, 0.0, 700.0, 400.0));
    let view = DragDropCollectionView::new(
        tree.clone(),
        main_loop.clone(),
        canvas,
        A,
        layout(),
        data,
        DragConfig::default(),
    );
    let mut manager: DragDropManager<String> = DragDropManager::new(
        tree,
        main_loop,
        canvas,
        vec![Participant::both(view)],
        DragConfig::default(),
    );
    assert!(!manager.should_receive_touch(Vec2::new(A1.0, A1.1)));
    assert!(manager.should_receive_touch(Vec2::new(50.0, 50.0)));
    assert_eq!(manager.phase(), DragPhase::Candidate);
}

#[derive(Clone, Debug)]
enum Op {
    Enter(f32, f32),
    Move(usize, f32, f32),
    Out(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0f32..250.0, 0f32..250.0).prop_map(|(x, y)| Op::Enter(x, y)),
        (0usize..16, 0f32..250.0, 0f32..250.0).prop_map(|(k, x, y)| Op::Move(k, x, y)),
        (0usize..16).prop_map(Op::Out),
    ]
}

proptest! {
    #[test]
    fn callbacks_keep_count_consistent(initial in 0usize..8, ops in prop::collection::vec(op(), 0..30)) {
        let w = World::three((0..initial).map(|i| i.to_string()).collect(), vec![], vec![]);
        let view = w.list("A").clone();
        let mut expected = initial;
        let mut next = 100;

        for op in ops {
            let pick = |k: usize| {
                let items = view.data().items().to_vec();
                (!items.is_empty()).then(|| items[k % items.len()].clone())
            };
            match op {
                Op::Enter(x, y) => {
                    let item = next.to_string();
                    next += 1;
                    view.will_move_item(&item, Rect::new(x, y, 80.0, 80.0));
                    if view.data().index_of(&item).is_some() {
                        expected += 1;
                    }
                }
                Op::Move(k, x, y) => {
                    if let Some(item) = pick(k) {
                        view.did_move_item(&item, Rect::new(x, y, 80.0, 80.0));
                    }
                }
                Op::Out(k) => {
                    if let Some(item) = pick(k) {
                        view.did_move_out_item(&item);
                        expected -= 1;
                    }
                }
            }
            let mut seen = view.data().items().to_vec();
            prop_assert_eq!(seen.len(), expected);
            prop_assert_eq!(view.presented_len(), expected);
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), expected);
        }
    }
}
