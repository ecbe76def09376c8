//! Routing of script discussion comments to script authors.
//!
//! # Flow
//!
//! 1. [`event`] parses the inbound comment event and screens out events that
//!    should never notify anyone (bots, the hub discussion, missing data)
//! 2. [`dispatch`] looks the discussion title up in the author mapping and
//!    walks the authors one at a time
//! 3. [`channel`] finds or creates each author's notification discussion
//! 4. [`format`] renders the channel and notification text

pub mod channel;
pub mod dispatch;
pub mod event;
pub mod format;

pub use channel::{ChannelResolver, ChannelSettings, ResolveError};
pub use dispatch::{DispatchReport, Dispatcher, NotifySettings};
pub use event::{
    EventError, NotificationEvent, NotificationTarget, SkipReason, parse_event, read_event,
};
