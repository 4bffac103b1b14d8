//! Database repositories.

pub mod channel;
pub mod direct_message;
pub mod message;
pub mod notification;
pub mod preference;
pub mod profile;
pub mod thread_message;

pub use channel::ChannelRepository;
pub use direct_message::DirectMessageRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use preference::PreferenceRepository;
pub use profile::ProfileRepository;
pub use thread_message::ThreadMessageRepository;
