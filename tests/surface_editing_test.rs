// Surface editing flow: keys, paste, focus and change notification

use std::cell::RefCell;
use std::rc::Rc;

use surface_wasm::renderers::display_list::RenderMode;
use surface_wasm::text::{Annotation, Selection, Span, ViewAnchor, ViewRange};
use surface_wasm::{Key, Surface, SurfaceError, SurfaceEvent, SurfaceOptions, SurfaceState};

fn recorded(surface: &mut Surface) -> Rc<RefCell<Vec<SurfaceEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    surface
        .events_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn test_typing_session_emits_one_change_on_blur() {
    let options = SurfaceOptions::from_json(
        r#"{"content":"Hello","annotations":[{"type":"bold","pos":[0,5]}]}"#,
    )
    .unwrap();
    let mut surface = Surface::new(options).unwrap();
    let events = recorded(&mut surface);

    surface.activate();
    let mut selection = Selection::caret(5);
    for ch in " world".chars() {
        selection = surface.handle_key(Key::Char(ch), selection).unwrap();
    }
    assert_eq!(selection, Selection::caret(11));
    assert_eq!(surface.get_content(), "Hello world");
    // Typing at the end of the bold run keeps extending it
    assert_eq!(surface.annotations().iter().next().unwrap().pos, Span::new(0, 11));
    assert!(events.borrow().is_empty());

    assert!(surface.commit());
    assert_eq!(
        *events.borrow(),
        vec![SurfaceEvent::ContentChanged {
            content: "Hello world".to_string(),
            previous: "Hello".to_string(),
        }]
    );
}

#[test]
fn test_blur_without_changes_is_silent() {
    let mut surface = Surface::from_text("static");
    let events = recorded(&mut surface);
    surface.activate();
    surface.select(0, Some(3));
    assert!(!surface.commit());
    assert!(events.borrow().is_empty());
}

#[test]
fn test_backspace_at_start_is_ignored() {
    let mut surface = Surface::from_text("abc");
    let selection = surface.handle_key(Key::Backspace, Selection::caret(0)).unwrap();
    assert_eq!(selection, Selection::caret(0));
    assert_eq!(surface.get_content(), "abc");
}

#[test]
fn test_edits_that_change_nothing_report_caret_at_edit_point() {
    let mut surface = Surface::from_text("abc");
    surface.apply_insert("X", 3).unwrap();
    assert_eq!(surface.selection(), Selection::caret(4));

    let selection = surface.handle_key(Key::Backspace, Selection::caret(0)).unwrap();
    assert_eq!(selection, Selection::caret(0));
    assert_eq!(surface.view_selection().start, ViewAnchor::Before(0));

    assert_eq!(surface.apply_insert("", 1).unwrap(), Selection::caret(1));
    assert_eq!(surface.apply_delete(2, 0).unwrap(), Selection::caret(2));

    // A negative start leaves the caret where it was
    assert_eq!(surface.apply_delete(-1, 1).unwrap(), Selection::caret(2));
    assert_eq!(surface.get_content(), "abcX");
}

#[test]
fn test_backspace_over_selection_deletes_it() {
    let mut surface = Surface::from_text("abcdef");
    let bold = surface.insert_annotation(Annotation::new("bold", 1, 4)).unwrap();
    surface.handle_key(Key::Backspace, Selection::new(2, 2)).unwrap();
    assert_eq!(surface.get_content(), "abef");
    assert_eq!(surface.annotations().get(bold).unwrap().pos, Span::new(1, 2));
}

#[test]
fn test_key_names_from_view() {
    let mut surface = Surface::from_text("ac");
    surface.handle_key(Key::from_name("b").unwrap(), Selection::caret(1)).unwrap();
    surface.handle_key(Key::from_name("enter").unwrap(), Selection::caret(3)).unwrap();
    assert_eq!(surface.get_content(), "abc\n");
    assert!(matches!(Key::from_name("tab"), Err(SurfaceError::InvalidKey(_))));
}

#[test]
fn test_typing_at_end_of_text_keeps_caret_after_last_element() {
    let mut surface = Surface::from_text("ab");
    let selection = surface.handle_key(Key::Char('c'), Selection::caret(2)).unwrap();
    assert_eq!(selection, Selection::caret(3));
    assert_eq!(surface.view_selection().start, ViewAnchor::AfterLast);

    // The view reports a caret past the end; it means "append"
    let reported = ViewRange {
        start: ViewAnchor::Before(7),
        end: ViewAnchor::Before(7),
    };
    let selection = surface.select_view(&reported);
    surface.handle_key(Key::Char('d'), selection).unwrap();
    assert_eq!(surface.get_content(), "abcd");
}

#[test]
fn test_paste_replaces_selection() {
    let mut surface = Surface::from_text("Hello cruel world");
    let link = surface.insert_annotation(Annotation::new("link", 12, 5)).unwrap();
    let events = recorded(&mut surface);
    surface.activate();

    let pending = surface.begin_paste(Selection::new(6, 6)).unwrap();
    assert_eq!(pending.index(), 6);
    assert_eq!(surface.get_content(), "Hello world");

    // Focus bounces while the staging element holds the paste
    assert!(!surface.commit());
    assert_eq!(surface.state(), SurfaceState::Editing);

    let selection = surface.resolve_paste(pending, "\n  kind\n ").unwrap();
    assert_eq!(surface.get_content(), "Hello kindworld");
    assert_eq!(selection, Selection::caret(10));
    // The link started exactly at the paste point and absorbed it
    assert_eq!(surface.annotations().get(link).unwrap().pos, Span::new(6, 9));

    assert!(surface.commit());
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn test_edits_rejected_while_paste_pending() {
    let mut surface = Surface::from_text("abc");
    let pending = surface.begin_paste(Selection::caret(1)).unwrap();

    assert_eq!(surface.apply_delete(0, 1), Err(SurfaceError::PasteInFlight));
    assert_eq!(surface.handle_key(Key::Char('x'), Selection::caret(0)), Err(SurfaceError::PasteInFlight));
    assert!(surface.begin_paste(Selection::caret(0)).is_err());

    surface.resolve_paste(pending, "Z").unwrap();
    assert_eq!(surface.get_content(), "aZbc");
    assert!(surface.apply_delete(0, 1).is_ok());
}

#[test]
fn test_empty_paste_keeps_caret_at_paste_point() {
    let mut surface = Surface::from_text("abcd");
    let selection = surface.paste(Selection::new(1, 2), "   ").unwrap();
    assert_eq!(surface.get_content(), "ad");
    assert_eq!(selection, Selection::caret(1));
}

#[test]
fn test_render_follows_focus() {
    let options = SurfaceOptions::with_content("ab").annotate(Annotation::new("em", 0, 1));
    let mut surface = Surface::new(options).unwrap();

    assert_eq!(surface.display_list().to_html(), "<span>a</span><span>b</span>");
    surface.activate();
    assert_eq!(
        surface.display_list().to_html(),
        "<span class=\"em\">a</span><span>b</span>"
    );
    surface.commit();
    assert_eq!(surface.display_list().mode, RenderMode::Static);
}

#[test]
fn test_render_annotations_on_load_option() {
    let options = SurfaceOptions::from_json(
        r#"{"content":"ab","annotations":[{"type":"em","pos":[1,1]}],"renderAnnotationsOnLoad":true}"#,
    )
    .unwrap();
    let surface = Surface::new(options).unwrap();
    assert_eq!(surface.display_list().mode, RenderMode::Annotated);
    assert_eq!(surface.display_list().elements[1].classes(), ["em"]);
}

#[test]
fn test_unsubscribed_listener_is_not_called() {
    let mut surface = Surface::from_text("a");
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let handle = surface.events_mut().subscribe(move |_| *counter.borrow_mut() += 1);

    surface.apply_insert("b", 1).unwrap();
    assert!(surface.commit());
    assert!(surface.events_mut().unsubscribe(handle));

    surface.apply_insert("c", 2).unwrap();
    assert!(surface.commit());
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_display_list_content_matches_buffer() {
    let mut surface = Surface::from_text("line one");
    surface.handle_key(Key::Enter, Selection::caret(4)).unwrap();
    assert_eq!(surface.display_list().content(), surface.get_content());
    assert_eq!(surface.get_content(), "line\n one");
}
