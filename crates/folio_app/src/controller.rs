//! Page controller
//!
//! One object per page, built once from a [`SiteConfig`]. It owns every
//! widget, rate limiter and timer, and the host drives it through four
//! entry points:
//!
//! ```text
//! dispatch(event) ──► binding table ──► handlers ──► page writes
//!                                           │
//!                                           ├──► timers ──► advance(now)
//!                                           └──► frames ──► run_frame(now)
//! ```
//!
//! Time is whatever the host says it is. Timers fire only from
//! [`PageController::advance`], in deadline order, each seeing the page
//! clock at its own deadline, so chained effects stay on schedule even
//! when the host jumps ahead.

use std::time::Duration;

use folio_core::{Debounce, FrameQueue, FrameThrottle, PageEvent, Throttle, TimerId, TimerQueue};
use folio_layout::nav_menu::NavigationMenu;
use folio_layout::page::{ElementId, LayoutSource, Page};
use folio_layout::reveal::RevealObserver;
use folio_layout::scroll_top::{FadeTicket, ScrollTopControl};
use folio_layout::sync::{ScrollSynchronizer, SyncOutcome};
use smallvec::SmallVec;

use crate::bindings::{BindingTable, HandlerKind};
use crate::config::{ScrollPolicy, SiteConfig};
use crate::effects::{anchor, Preloader, Typewriter};
use crate::error::{FolioError, Result};
use crate::form::FormValidator;
use crate::notify::{NotificationKind, NotificationTimer, Notifier};
use crate::submit::{
    PendingSubmission, SimulatedTransport, Submission, SubmissionTransport, SubmitGate,
    FAILURE_MESSAGE, INVALID_MESSAGE, SUCCESS_MESSAGE,
};

/// Work waiting on a timer
#[derive(Debug)]
enum Task {
    FinishFade(FadeTicket),
    ResizeSettled,
    Notification(NotificationTimer),
    CompleteSubmission(PendingSubmission),
    TypeNext,
    HidePreloader,
}

/// Work waiting on the next display refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameTask {
    ScrollSync,
}

/// Interactivity controller for one page
pub struct PageController {
    config: SiteConfig,
    bindings: BindingTable,

    // Scheduling
    timers: TimerQueue<Task>,
    frames: FrameQueue<FrameTask>,
    frame_throttle: FrameThrottle,
    scroll_throttle: Throttle,
    resize: Debounce,
    now: Duration,

    // Widgets
    sync: ScrollSynchronizer,
    menu: NavigationMenu,
    notifier: Notifier,
    validator: FormValidator,
    submit: SubmitGate,
    transport: Box<dyn SubmissionTransport>,
    typewriter: Typewriter,
    preloader: Preloader,
    navbar: ElementId,

    initialized: bool,
}

impl PageController {
    /// Build a controller around the simulated transport
    pub fn new(config: SiteConfig) -> Self {
        let transport = SimulatedTransport::new(config.form.submit_delay())
            .failing(config.form.simulate_failure);
        Self::with_transport(config, Box::new(transport))
    }

    pub fn with_transport(config: SiteConfig, transport: Box<dyn SubmissionTransport>) -> Self {
        let elements = &config.elements;

        let sync = ScrollSynchronizer::new(config.sync_config())
            .with_scroll_top(ScrollTopControl::new(
                elements.scroll_to_top.as_str(),
                config.scroll.scroll_top_threshold,
            ))
            .with_reveal(RevealObserver::new(config.reveal_config()));

        let menu = NavigationMenu::new(
            elements.nav_menu.as_str(),
            elements.hamburger.as_str(),
            elements.nav_link_class.as_str(),
        );

        let effects = &config.effects;
        let typewriter = Typewriter::new(
            elements.hero_name.as_str(),
            Duration::from_millis(effects.typing_start_ms),
            Duration::from_millis(effects.typing_char_ms),
        );
        let preloader = Preloader::new(
            elements.preloader.as_str(),
            Duration::from_millis(effects.preloader_fade_ms),
        );

        Self {
            bindings: BindingTable::for_config(&config),
            timers: TimerQueue::new(),
            frames: FrameQueue::new(),
            frame_throttle: FrameThrottle::new(),
            scroll_throttle: Throttle::new(config.scroll.throttle_interval()),
            resize: Debounce::new(config.scroll.resize_debounce()),
            now: Duration::ZERO,
            sync,
            menu,
            notifier: Notifier::new(&config.notifications),
            validator: FormValidator::from_config(elements.contact_form.as_str(), &config.form),
            submit: SubmitGate::new(elements.submit_button.as_str()),
            transport,
            typewriter,
            preloader,
            navbar: elements.navbar.as_str().into(),
            initialized: false,
            config,
        }
    }

    /// Parse a TOML config and build a controller from it
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(Self::new(SiteConfig::from_toml_str(input)?))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Page clock as of the last call
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn menu(&self) -> &NavigationMenu {
        &self.menu
    }

    pub fn synchronizer(&self) -> &ScrollSynchronizer {
        &self.sync
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn submit_gate(&self) -> &SubmitGate {
        &self.submit
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Earliest time `advance` has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether the host should call `run_frame` at the next refresh
    pub fn wants_frame(&self) -> bool {
        self.frames.has_pending()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the page; returns false if already attached
    pub fn initialize<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) -> bool {
        if self.initialized {
            tracing::trace!("controller already initialized");
            return false;
        }
        self.now = now;
        self.initialized = true;

        if let Some(control) = self.sync.scroll_top_mut() {
            control.mount(page);
        }
        if let Some(observer) = self.sync.reveal_mut() {
            for class in &self.config.elements.reveal_classes {
                for id in page.elements_with_class(class) {
                    observer.observe(id, page);
                }
            }
        }
        if self.config.effects.typing {
            if let Some(delay) = self.typewriter.start(page) {
                self.timers.schedule(now, delay, Task::TypeNext);
            }
        }
        self.sync_now(page, now);

        tracing::debug!(
            bindings = self.bindings.len(),
            policy = ?self.config.scroll.policy,
            "page controller initialized"
        );
        true
    }

    /// Detach from the page and drop all pending work
    ///
    /// Unlocks body scrolling, frees the submit control and finishes any
    /// running effect so the page is left in a settled state.
    pub fn teardown<P: Page + ?Sized>(&mut self, page: &mut P) {
        if !self.initialized {
            return;
        }
        self.resize.cancel(&mut self.timers);
        // An in-flight submission releases its lock as the task drops
        let dropped = self.timers.clear();
        tracing::trace!(timers = dropped.len(), "dropping pending timers");
        drop(dropped);
        self.submit.render(page);

        self.frames.clear();
        self.frame_throttle = FrameThrottle::new();
        self.scroll_throttle.reset();

        self.menu.close(page);
        page.set_body_scroll_locked(false);
        self.notifier.clear(page);
        self.typewriter.finish(page);
        if let Some(control) = self.sync.scroll_top_mut() {
            control.unmount(page);
        }
        if let Some(observer) = self.sync.reveal_mut() {
            observer.disconnect();
        }

        self.initialized = false;
        tracing::debug!("page controller torn down");
    }

    // =========================================================================
    // Event entry points
    // =========================================================================

    /// Route one event through the binding table
    ///
    /// Timers due before `now` fire first. Returns the handlers that ran.
    pub fn dispatch<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        now: Duration,
        event: &PageEvent,
    ) -> SmallVec<[HandlerKind; 4]> {
        self.advance(page, now);

        let mut handlers = self.bindings.handlers_for(event, &*page);
        if !self.initialized {
            handlers.retain(|h| *h == HandlerKind::Initialize);
        }
        for handler in &handlers {
            self.handle(*handler, event, page, now);
        }
        handlers
    }

    /// Fire every timer due at or before `now`
    pub fn advance<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= now) {
            self.now = self.now.max(deadline);
            for (id, task) in self.timers.drain_due(deadline) {
                self.run_task(id, task, page, deadline);
                fired += 1;
            }
        }
        self.now = self.now.max(now);
        fired
    }

    /// Display refresh: run frame-aligned work
    pub fn run_frame<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) {
        self.advance(page, now);
        for task in self.frames.take() {
            match task {
                FrameTask::ScrollSync => {
                    if self.frame_throttle.begin_frame() {
                        self.sync_now(page, now);
                    }
                }
            }
        }
    }

    /// Show a notification
    pub fn notify<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        now: Duration,
        message: &str,
        kind: NotificationKind,
    ) {
        for timer in self.notifier.notify(message, kind, page) {
            self.schedule_notification(now, timer);
        }
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn handle<P: Page + ?Sized>(
        &mut self,
        handler: HandlerKind,
        event: &PageEvent,
        page: &mut P,
        now: Duration,
    ) {
        match handler {
            HandlerKind::Initialize => {
                self.initialize(page, now);
            }
            HandlerKind::ScrollSync => self.on_scroll(page, now),
            HandlerKind::ResizeDebounce => {
                self.resize
                    .trigger(now, &mut self.timers, Task::ResizeSettled);
            }
            HandlerKind::PreloaderLoad => {
                if let Some(delay) = self.preloader.on_load(page) {
                    self.timers.schedule(now, delay, Task::HidePreloader);
                }
            }
            HandlerKind::MenuClick => {
                self.menu.handle_click(event, page);
            }
            HandlerKind::MenuEscape => {
                if let PageEvent::KeyDown { key } = event {
                    self.menu.handle_key(*key, page);
                }
            }
            HandlerKind::AnchorScroll => {
                if let Some(href) = fragment_href(event, &*page) {
                    anchor::scroll_to_anchor(page, &href, &self.navbar);
                }
            }
            HandlerKind::ScrollTopClick => {
                if let Some(control) = self.sync.scroll_top() {
                    control.on_click(page);
                }
            }
            HandlerKind::ScrollTopHover => {
                let Some(control) = self.sync.scroll_top() else {
                    return;
                };
                match event {
                    PageEvent::PointerEnter { .. } => control.on_pointer_enter(page),
                    PageEvent::PointerLeave { .. } => control.on_pointer_leave(page),
                    _ => {}
                }
            }
            HandlerKind::FormSubmit => self.submit_form(page, now),
            HandlerKind::FieldInput => {
                if let PageEvent::Input { field } = event {
                    if page.form_fields(self.validator.form()).contains(field) {
                        self.validator.clear_error(field, page);
                    }
                }
            }
            HandlerKind::NotificationDismiss => {
                if let Some(timer) = self.notifier.handle_click(event, page) {
                    self.schedule_notification(now, timer);
                }
            }
            HandlerKind::RevealIntersection => {
                if let (PageEvent::Intersection(entries), Some(observer)) =
                    (event, self.sync.reveal_mut())
                {
                    observer.process(entries, page);
                }
            }
        }
    }

    fn on_scroll<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) {
        match self.config.scroll.policy {
            ScrollPolicy::Frame => {
                if self.frame_throttle.request() {
                    self.frames.request(FrameTask::ScrollSync);
                }
            }
            ScrollPolicy::Throttle => {
                if self.scroll_throttle.try_fire(now) {
                    self.sync_now(page, now);
                }
            }
        }
    }

    fn sync_now<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) -> SyncOutcome {
        let outcome = self.sync.sync(page);
        if let Some(ticket) = outcome.fade {
            self.timers
                .schedule(now, self.config.scroll.fade(), Task::FinishFade(ticket));
        }
        outcome
    }

    fn submit_form<P: Page + ?Sized>(&mut self, page: &mut P, now: Duration) {
        if !page.exists(self.validator.form()) {
            tracing::trace!(form = %self.validator.form(), "submit for missing form");
            return;
        }
        if self.submit.is_locked() {
            tracing::debug!("submission already in flight");
            return;
        }
        if !self.validator.validate_form(page) {
            self.notify(page, now, INVALID_MESSAGE, NotificationKind::Error);
            return;
        }
        let Some(lock) = self.submit.try_acquire(page) else {
            return;
        };
        let submission = Submission::collect(&*page, self.validator.form());
        self.timers.schedule(
            now,
            self.transport.delay(),
            Task::CompleteSubmission(PendingSubmission { submission, lock }),
        );
    }

    fn complete_submission<P: Page + ?Sized>(
        &mut self,
        pending: PendingSubmission,
        page: &mut P,
        now: Duration,
    ) {
        let PendingSubmission { submission, lock } = pending;
        let result = self.deliver(&submission);
        self.submit.release(lock, page);

        match result {
            Ok(()) => {
                tracing::debug!(fields = submission.fields.len(), "submission delivered");
                self.validator.reset(page);
                self.notify(page, now, SUCCESS_MESSAGE, NotificationKind::Success);
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.notify(page, now, FAILURE_MESSAGE, NotificationKind::Error);
            }
        }
    }

    fn deliver(&mut self, submission: &Submission) -> Result<()> {
        self.transport
            .deliver(submission)
            .map_err(FolioError::from)
    }

    fn run_task<P: Page + ?Sized>(&mut self, id: TimerId, task: Task, page: &mut P, now: Duration) {
        match task {
            Task::FinishFade(ticket) => {
                if let Some(control) = self.sync.scroll_top_mut() {
                    control.finish_fade(ticket, page);
                }
            }
            Task::ResizeSettled => {
                if self.resize.acknowledge(id) {
                    tracing::trace!("resize settled, resyncing");
                    self.sync_now(page, now);
                }
            }
            Task::Notification(timer) => {
                if let Some(next) = self.notifier.on_timer(timer, page) {
                    self.schedule_notification(now, next);
                }
            }
            Task::CompleteSubmission(pending) => self.complete_submission(pending, page, now),
            Task::TypeNext => {
                if let Some(delay) = self.typewriter.tick(page) {
                    self.timers.schedule(now, delay, Task::TypeNext);
                }
            }
            Task::HidePreloader => self.preloader.finish(page),
        }
    }

    fn schedule_notification(&mut self, now: Duration, timer: NotificationTimer) {
        self.timers
            .schedule(now, timer.delay, Task::Notification(timer));
    }
}

/// `href` of the first in-page link on a click path
fn fragment_href<L: LayoutSource + ?Sized>(event: &PageEvent, layout: &L) -> Option<String> {
    let PageEvent::Click { path } = event else {
        return None;
    };
    path.iter()
        .filter_map(|id| layout.attribute(id, "href"))
        .find(|href| href.starts_with('#'))
}
