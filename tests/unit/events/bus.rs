use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn external_names_map_to_kinds() {
    assert_eq!(
        EventKind::from_external("mousedown"),
        Some(EventKind::MouseDown)
    );
    assert_eq!(
        EventKind::from_external("dblclick"),
        Some(EventKind::MouseDoubleClick)
    );
    assert_eq!(EventKind::from_external("keypress"), Some(EventKind::KeyPress));
    assert_eq!(EventKind::from_external("wheel"), None);
}

#[test]
fn kind_classification() {
    assert!(EventKind::MouseClick.is_pointer());
    assert!(EventKind::KeyUp.is_keyboard());
    assert!(EventKind::MouseMove.is_external());
    assert!(!EventKind::Draw.is_external());
    assert!(!EventKind::Play.is_external());
}

#[test]
fn subscribe_fire_unsubscribe() {
    let mut bus = Listeners::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen_a = Rc::clone(&seen);
    let a = bus.subscribe(EventKind::Play, move |e| {
        seen_a.borrow_mut().push(("a", e.kind));
    });
    let seen_b = Rc::clone(&seen);
    let _b = bus.subscribe(EventKind::Play, move |e| {
        seen_b.borrow_mut().push(("b", e.kind));
    });

    bus.fire(&Event::of(EventKind::Play));
    bus.fire(&Event::of(EventKind::Pause)); // nobody listens

    assert_eq!(
        *seen.borrow(),
        vec![("a", EventKind::Play), ("b", EventKind::Play)]
    );

    assert!(bus.unsubscribe(a));
    assert!(!bus.unsubscribe(a));
    bus.fire(&Event::of(EventKind::Play));
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(seen.borrow()[2].0, "b");
}

#[test]
fn clear_drops_every_subscription() {
    let mut bus = Listeners::new();
    let hits = Rc::new(RefCell::new(0u32));
    let hits_h = Rc::clone(&hits);
    bus.subscribe(EventKind::Draw, move |_| *hits_h.borrow_mut() += 1);

    assert!(bus.has_listeners(EventKind::Draw));
    bus.clear();
    assert!(!bus.has_listeners(EventKind::Draw));

    bus.fire(&Event::draw(0.0));
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn event_constructors_carry_payloads() {
    let e = Event::pointer(EventKind::MouseDown, Point::new(3.0, 4.0), Some(0));
    assert_eq!(e.kind, EventKind::MouseDown);
    assert_eq!(
        e.data,
        EventData::Pointer {
            pos: Point::new(3.0, 4.0),
            button: Some(0)
        }
    );

    let e = Event::draw(1.5);
    assert_eq!(e.data, EventData::Time { time: 1.5 });

    let e = Event::message(EventKind::ResourceLoad, "font.woff");
    assert_eq!(
        e.data,
        EventData::Message {
            text: "font.woff".to_string()
        }
    );
}
