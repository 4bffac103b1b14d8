//! API middleware and shared state.

#![allow(missing_docs)]

use chattr_core::{
    ChannelService, DirectMessageService, MessageService, NotificationService, PreferenceService,
    ProfileService, ThreadService,
};

/// Application state.
///
/// The acting profile is always explicit in paths and bodies: identity
/// is a client-side selection, and context flows through parameters
/// rather than ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub channel_service: ChannelService,
    pub message_service: MessageService,
    pub thread_service: ThreadService,
    pub direct_message_service: DirectMessageService,
    pub notification_service: NotificationService,
    pub preference_service: PreferenceService,
}
