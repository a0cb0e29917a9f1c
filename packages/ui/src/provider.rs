//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] owns the process-wide [`PortalSession`] and mirrors its
//! snapshot into a signal, so any component can read the credential, profile,
//! unread count and avatar URL with [`use_session`] and re-render when they
//! change.

use std::rc::Rc;

use dioxus::prelude::*;
use session::{PollHandle, PortalConfig, SessionSnapshot};

use crate::PortalSession;

/// Current session state. Updates on login, logout, profile hydration and
/// every change of the unread count.
pub fn use_session() -> Signal<SessionSnapshot> {
    use_context::<Signal<SessionSnapshot>>()
}

/// The shared session object, for actions (login, logout, polling).
pub fn use_portal_session() -> PortalSession {
    use_context::<PortalSession>()
}

/// Keep the unread count fresh while the calling component is mounted.
///
/// Each caller gets its own poll loop; unmounting stops it without touching
/// other screens' loops.
pub fn use_notification_poll() -> Rc<PollHandle> {
    let session = use_portal_session();
    let handle = use_hook(|| {
        let (handle, task) = session.start_polling();
        spawn(task);
        Rc::new(handle)
    });

    let on_unmount = Rc::clone(&handle);
    use_drop(move || on_unmount.stop());

    handle
}

/// Provider component that owns the session.
/// Wrap your app with this component to enable the session hooks.
#[component]
pub fn SessionProvider(config: PortalConfig, children: Element) -> Element {
    let session = use_hook(|| crate::make_session(config.clone()));
    let snapshot = use_signal(|| session.snapshot());

    // Mirror every session change into the snapshot signal
    let _subscription = use_hook(|| {
        Rc::new(session.subscribe(move |state: &SessionSnapshot| {
            let mut signal = snapshot;
            signal.set(state.clone());
        }))
    });

    // Hydrate the profile of a session restored from storage
    use_hook(|| {
        let session = session.clone();
        spawn(async move {
            if session.is_authenticated() {
                session.hydrate_profile().await;
            }
        });
    });

    use_context_provider(|| session.clone());
    use_context_provider(|| snapshot);

    rsx! {
        {children}
    }
}
