//! Message templates for author channels and notifications.
//!
//! The channel title doubles as the natural key used to find an author's
//! channel again, so [`channel_title`] must never change for existing authors.

use crate::types::AuthorLogin;

use super::event::NotificationTarget;

/// Prefix of every author channel title.
pub const CHANNEL_TITLE_PREFIX: &str = "作者通知: ";

/// Title of an author's notification discussion.
pub fn channel_title(author: &AuthorLogin) -> String {
    format!("{}{}", CHANNEL_TITLE_PREFIX, author)
}

/// Opening post of a newly created author channel.
pub fn channel_body(author: &AuthorLogin) -> String {
    format!(
        "这是作者 @{author} 的专属通知讨论区。\n\n\
         当有用户对该作者的脚本进行评论时，系统会在此讨论区发送通知。\n\n\
         ---\n\n\
         *此讨论区由系统自动创建*"
    )
}

/// Notification comment posted to an author's channel.
///
/// The commenter's text is embedded verbatim.
pub fn notification_body(author: &AuthorLogin, target: &NotificationTarget) -> String {
    let link = match target.discussion_number {
        Some(number) => format!("[{}]({})", number, target.discussion_url),
        None => format!("<{}>", target.discussion_url),
    };
    format!(
        "🔔 **脚本评论通知**\n\n\
         @{author}\n\n\
         📁 **脚本路径：** \n`{path}`\n\n\
         💬 **评论内容：**\n{body}\n\n\
         👤 **评论者：** {commenter}\n\n\
         🔗 **评论区链接：** {link}",
        path = target.script_path,
        body = target.comment_body,
        commenter = target.commenter,
    )
}
