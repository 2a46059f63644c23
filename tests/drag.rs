use std::cell::RefCell;
use std::rc::Rc;

use floem::kurbo::Point;
use floem_swatch::{
    Bindings, ColorInstance, ControlKind, DocumentId, DragHost, DragSession, ElementId,
    ElementRole, ParentFrame, PickerConfig, PointerSample,
};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Frames {
    log: Vec<String>,
}

impl DragHost for Frames {
    fn capture_pointer(&mut self, control: ControlKind) {
        self.log.push(format!("capture {control:?}"));
    }
    fn release_pointer(&mut self) {
        self.log.push("release".into());
    }
    fn attach_drag_listeners(&mut self, document: DocumentId) {
        self.log.push(format!("attach {}", document.0));
    }
    fn detach_drag_listeners(&mut self, document: DocumentId) {
        self.log.push(format!("detach {}", document.0));
    }
}

/// Control origin on the page, and the distance from it to the pad.
const CONTROL: Point = Point::new(200.0, 200.0);
const EDGE: f64 = 13.0;

fn press(local: Point) -> PointerSample {
    let relative = Point::new(local.x + EDGE, local.y + EDGE);
    PointerSample {
        absolute: CONTROL + relative.to_vec2(),
        relative,
    }
}

#[test]
fn a_pad_drag_follows_the_pointer_into_the_parent_frame() {
    let events = Rc::new(RefCell::new(Vec::<&str>::new()));
    let (inputs, changes) = (events.clone(), events.clone());
    let mut inst = ColorInstance::builder(
        PickerConfig::default(),
        Bindings::for_target(ElementId(1), ElementRole::TextInput),
    )
    .value_text("#FF0000")
    .on_input(move |_| inputs.borrow_mut().push("input"))
    .on_change(move |_| changes.borrow_mut().push("change"))
    .build()
    .unwrap();
    events.borrow_mut().clear();

    let mut host = Frames::default();
    let parent = ParentFrame {
        document: DocumentId(7),
        frame_origin: Point::new(100.0, 50.0),
    };
    let session = DragSession::begin(
        &mut inst,
        ControlKind::Pad,
        press(Point::new(60.0, 50.0)),
        Some(parent),
        &mut host,
    );
    assert_eq!(session.origin(), CONTROL);
    assert_eq!(inst.channels().h, Some(120.0));
    assert_eq!(inst.channels().s, 50.0);

    // the parent document sees the frame shifted by its origin
    let top_right = Point::new(100.0 + 200.0 + EDGE + 180.0, 50.0 + 200.0 + EDGE);
    assert!(session.pointer_move(&mut inst, DocumentId(7), top_right));
    assert_eq!(inst.channels().h, Some(360.0));
    assert_eq!(inst.channels().s, 100.0);

    assert!(!session.pointer_move(&mut inst, DocumentId(3), Point::ZERO));
    assert_eq!(inst.channels().h, Some(360.0));

    session.end(&mut inst, &mut host);
    assert_eq!(
        host.log,
        vec!["capture Pad", "attach 0", "attach 7", "detach 0", "detach 7", "release"]
    );
    assert_eq!(*events.borrow(), vec!["input", "input", "input", "change"]);
}

#[test]
fn pressing_the_pad_lifts_a_black_color() {
    let mut inst = ColorInstance::builder(
        PickerConfig::default(),
        Bindings::for_target(ElementId(1), ElementRole::TextInput),
    )
    .value_text("#000000")
    .build()
    .unwrap();
    let mut host = Frames::default();

    let session = DragSession::begin(
        &mut inst,
        ControlKind::Pad,
        press(Point::new(0.0, 0.0)),
        None,
        &mut host,
    );
    assert_eq!(inst.channels().v, 100.0);
    assert_eq!(inst.to_hex_string(), "#FF0000");
    session.end(&mut inst, &mut host);
    assert_eq!(host.log, vec!["capture Pad", "attach 0", "detach 0", "release"]);
}

#[test]
fn the_slider_ignores_horizontal_movement() {
    let mut inst = ColorInstance::builder(
        PickerConfig::default(),
        Bindings::for_target(ElementId(1), ElementRole::TextInput),
    )
    .value_text("#FF0000")
    .build()
    .unwrap();
    let mut host = Frames::default();

    let session = DragSession::begin(
        &mut inst,
        ControlKind::Slider,
        press(Point::new(4.0, 25.0)),
        None,
        &mut host,
    );
    assert_eq!(inst.channels().v, 75.0);

    let far_left = Point::new(0.0, CONTROL.y + EDGE + 50.0);
    assert!(session.pointer_move(&mut inst, DocumentId::MAIN, far_left));
    assert_eq!(inst.channels().v, 50.0);
    assert_eq!(inst.channels().h, Some(0.0));
    session.end(&mut inst, &mut host);
}
