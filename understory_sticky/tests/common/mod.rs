// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated page for driving sticky elements end to end.
//!
//! Elements are `u32` ids laid out at fixed document offsets. Scrolling moves
//! every box up by the scroll offset, dispatches window listeners, and lets
//! the fake intersection watcher report enter/exit transitions against its
//! tolerance-adjusted viewport. Time only moves through [`Page::advance`].

#![allow(dead_code, reason = "Not every test file uses every helper")]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::Rect;
use understory_sticky::host::{
    DebounceScheduler, Geometry, ListenerId, Scheduler, TaskKey, ViewportTolerance,
    ViewportWatcher, WatcherSettings, WindowEvent, WindowEvents,
};
use understory_sticky::{DEBOUNCE_MS, StickyConfig, StickyElement, TriggerSentinel};

pub const TOP_SENTINEL: u32 = 1;
pub const LAYER: u32 = 2;
pub const BOTTOM_SENTINEL: u32 = 3;

/// Parent block spans `PARENT_TOP..PARENT_BOTTOM` in document space.
pub const PARENT_TOP: f64 = 1000.0;
pub const PARENT_BOTTOM: f64 = 1800.0;
pub const LAYER_HEIGHT: f64 = 100.0;
pub const LAYER_WIDTH: f64 = 300.0;
pub const VIEWPORT: f64 = 600.0;

type Callback = Rc<RefCell<Box<dyn FnMut()>>>;

struct Watched {
    element: u32,
    tolerance: ViewportTolerance,
    on_enter: Callback,
    on_exit: Callback,
    inside: Option<bool>,
}

pub struct Page {
    boxes: RefCell<BTreeMap<u32, Rect>>,
    scroll: Cell<f64>,
    viewport_height: Cell<f64>,
    listeners: RefCell<BTreeMap<u64, (WindowEvent, Rc<dyn Fn()>)>>,
    next_listener: Cell<u64>,
    scheduler: DebounceScheduler,
    watched: RefCell<Vec<Watched>>,
    settings: Cell<Option<WatcherSettings>>,
}

impl Page {
    /// Standard layout: sentinels at the parent's edges, layer at its top.
    pub fn new() -> Rc<Self> {
        let page = Rc::new(Self {
            boxes: RefCell::default(),
            scroll: Cell::new(0.0),
            viewport_height: Cell::new(VIEWPORT),
            listeners: RefCell::default(),
            next_listener: Cell::new(0),
            scheduler: DebounceScheduler::new(),
            watched: RefCell::default(),
            settings: Cell::new(None),
        });
        page.place(TOP_SENTINEL, PARENT_TOP, LAYER_WIDTH, 0.0);
        page.place(LAYER, PARENT_TOP, LAYER_WIDTH, LAYER_HEIGHT);
        page.place(BOTTOM_SENTINEL, PARENT_BOTTOM, LAYER_WIDTH, 0.0);
        page
    }

    /// Places `element` at a document offset.
    pub fn place(&self, element: u32, doc_top: f64, width: f64, height: f64) {
        self.boxes
            .borrow_mut()
            .insert(element, Rect::new(0.0, doc_top, width, doc_top + height));
    }

    /// Changes an element's size without dispatching anything.
    pub fn set_size(&self, element: u32, width: f64, height: f64) {
        let mut boxes = self.boxes.borrow_mut();
        if let Some(rect) = boxes.get_mut(&element) {
            *rect = Rect::new(rect.x0, rect.y0, rect.x0 + width, rect.y0 + height);
        }
    }

    /// Scrolls without any notification, as if the page loaded mid-scroll.
    pub fn jump_to(&self, scroll: f64) {
        self.scroll.set(scroll);
    }

    /// Scrolls, dispatches scroll listeners, and lets the watcher report.
    pub fn scroll_to(&self, scroll: f64) {
        self.scroll.set(scroll);
        self.dispatch(WindowEvent::Scroll);
        self.sync_watcher();
    }

    /// Resizes the viewport, dispatches resize listeners, and lets the
    /// watcher report.
    pub fn resize(&self, viewport_height: f64) {
        self.viewport_height.set(viewport_height);
        self.dispatch(WindowEvent::Resize);
        self.sync_watcher();
    }

    /// Moves the clock forward, running due debounced tasks.
    pub fn advance(&self, ms: u64) -> usize {
        self.scheduler.advance_to(self.scheduler.now() + ms)
    }

    /// Lets one debounce window elapse.
    pub fn settle(&self) -> usize {
        self.advance(DEBOUNCE_MS)
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn watched_count(&self) -> usize {
        self.watched.borrow().len()
    }

    pub fn watcher_settings(&self) -> Option<WatcherSettings> {
        self.settings.get()
    }

    pub fn tolerance_of(&self, element: u32) -> Option<ViewportTolerance> {
        self.watched
            .borrow()
            .iter()
            .find(|w| w.element == element)
            .map(|w| w.tolerance)
    }

    fn dispatch(&self, event: WindowEvent) {
        let targets: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .values()
            .filter(|(e, _)| *e == event)
            .map(|(_, l)| l.clone())
            .collect();
        for listener in targets {
            listener();
        }
    }

    /// Inside when the box overlaps the viewport shrunk by the tolerances.
    fn is_inside(&self, element: u32, tolerance: ViewportTolerance) -> bool {
        let rect = self.bounding_box(&element);
        let top_line = -tolerance.top;
        let bottom_line = self.viewport_height.get() + tolerance.bottom;
        rect.y1 > top_line && rect.y0 < bottom_line
    }

    /// Fires enter/exit for every watched element whose state changed.
    ///
    /// The first observation only reports an enter, like an intersection
    /// observer's initial callback.
    pub fn sync_watcher(&self) {
        let mut fire: Vec<Callback> = Vec::new();
        for watched in self.watched.borrow_mut().iter_mut() {
            let inside = self.is_inside(watched.element, watched.tolerance);
            match (watched.inside, inside) {
                (None | Some(false), true) => fire.push(watched.on_enter.clone()),
                (Some(true), false) => fire.push(watched.on_exit.clone()),
                _ => {}
            }
            watched.inside = Some(inside);
        }
        for callback in fire {
            (callback.borrow_mut())();
        }
    }
}

impl Geometry<u32> for Page {
    fn bounding_box(&self, element: &u32) -> Rect {
        let scroll = self.scroll.get();
        self.boxes
            .borrow()
            .get(element)
            .map_or(Rect::ZERO, |r| Rect::new(r.x0, r.y0 - scroll, r.x1, r.y1 - scroll))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height.get()
    }
}

impl WindowEvents for Page {
    fn add_listener(&self, event: WindowEvent, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().insert(id, (event, listener));
        ListenerId(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id.0);
    }
}

impl Scheduler for Page {
    fn schedule(&self, key: TaskKey, delay_ms: u64, task: Box<dyn FnOnce()>) {
        self.scheduler.schedule(key, delay_ms, task);
    }
}

impl ViewportWatcher<u32> for Page {
    fn configure(&self, settings: WatcherSettings) {
        self.settings.set(Some(settings));
    }

    fn watch(
        &self,
        element: &u32,
        tolerance: ViewportTolerance,
        on_enter: Box<dyn FnMut()>,
        on_exit: Box<dyn FnMut()>,
    ) {
        self.watched.borrow_mut().push(Watched {
            element: *element,
            tolerance,
            on_enter: Rc::new(RefCell::new(on_enter)),
            on_exit: Rc::new(RefCell::new(on_exit)),
            inside: None,
        });
    }

    fn stop_watching(&self, element: &u32) {
        self.watched.borrow_mut().retain(|w| w.element != *element);
    }
}

/// A sticky element mounted on a [`Page`] the way a rendering layer would.
///
/// Fields drop in declaration order: sentinels deregister before the handle
/// is destroyed.
pub struct Mounted {
    pub top: TriggerSentinel<u32, Page>,
    pub bottom: Option<TriggerSentinel<u32, Page>>,
    pub sticky: StickyElement<u32, Page>,
}

impl Mounted {
    /// Mounts in document order and delivers the watcher's initial report.
    pub fn new(page: &Rc<Page>, config: StickyConfig) -> Self {
        let sticky = StickyElement::new(config, page.clone());

        let top_args = sticky.controller().top_trigger_args();
        let mut top = TriggerSentinel::new(top_args, page.clone(), sticky.top_trigger_hooks());
        top.mount(TOP_SENTINEL);

        sticky.setup_element(LAYER);

        let bottom_args = sticky.controller().bottom_trigger_args();
        let bottom = bottom_args.map(|args| {
            let mut bottom =
                TriggerSentinel::new(args, page.clone(), sticky.bottom_trigger_hooks());
            bottom.mount(BOTTOM_SENTINEL);
            bottom
        });

        page.sync_watcher();
        Self {
            top,
            bottom,
            sticky,
        }
    }
}
