//! Database entities.

pub mod channel;
pub mod direct_message;
pub mod message;
pub mod notification;
pub mod preference;
pub mod profile;
pub mod thread_message;

pub use channel::Entity as Channel;
pub use direct_message::Entity as DirectMessage;
pub use message::Entity as Message;
pub use notification::Entity as Notification;
pub use preference::Entity as Preference;
pub use profile::Entity as Profile;
pub use thread_message::Entity as ThreadMessage;
