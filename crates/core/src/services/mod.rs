//! Business logic services.

#![allow(missing_docs)]

pub mod channel;
pub mod direct_message;
pub mod message;
pub mod notification;
pub mod preference;
pub mod profile;
pub mod thread;

pub use channel::{ChannelService, CreateChannelInput, UpdateChannelInput};
pub use direct_message::{ConversationSummary, DirectMessageService, SendDirectMessageInput};
pub use message::{MessageService, SendMessageInput, UpdateMessageInput};
pub use notification::{CreateNotificationInput, NotificationService};
pub use preference::{NotificationToggle, PreferenceService, UpdatePreferencesInput};
pub use profile::{CreateProfileInput, ProfileService};
pub use thread::{SendThreadMessageInput, ThreadService};
