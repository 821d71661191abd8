use crate::InboundMessage;

/// Whether `target` names a channel rather than a single user.
pub fn is_channel_target(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}

/// Whether the sender is the configured owner account.
///
/// An unset or empty owner never matches.
pub fn is_owner(sender_account: Option<&str>, owner: Option<&str>) -> bool {
    match (sender_account, owner) {
        (Some(sender), Some(owner)) if !owner.is_empty() => sender == owner,
        _ => false,
    }
}

/// Channel messages are always handled; direct messages only from the owner.
pub fn should_handle(msg: &InboundMessage, owner: Option<&str>) -> bool {
    is_channel_target(&msg.target) || is_owner(msg.sender_account.as_deref(), owner)
}
